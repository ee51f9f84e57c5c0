pub mod config;
pub mod diagnosis;
pub mod dispatch;
pub mod error;
pub mod parsers;
pub mod prompts;
pub mod report;
pub mod response;
pub mod server;
pub mod store;
pub mod tools;
pub mod types;
