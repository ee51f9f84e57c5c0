pub mod ask;
pub mod diagnose;
pub mod enums;
pub mod history;
pub mod parse;
