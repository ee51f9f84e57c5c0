use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::AetherError;
use crate::types::{DiagnosisResult, UserRole};

/// Characters of the symptom text kept in a record summary.
const SUMMARY_CHARS: usize = 100;

/// Longest accepted user id.
pub const MAX_USER_ID_LEN: usize = 128;

const SESSIONS_FILE: &str = "sessions.jsonl";

/// One saved analysis, as written to the session log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisRecord {
    pub id: String,
    pub user_id: String,
    pub user_role: UserRole,
    pub symptoms: String,
    pub result: DiagnosisResult,
    pub created_at: String,
    pub status: String,
    pub summary: String,
}

/// Append-only per-user session log under `base_dir/<user_id>/sessions.jsonl`.
///
/// Writes are serialized through an internal Mutex so concurrent saves
/// never interleave within a line.
pub struct SessionStore {
    base_dir: PathBuf,
    write_lock: Mutex<()>,
    sequence: AtomicU64,
}

impl SessionStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            write_lock: Mutex::new(()),
            sequence: AtomicU64::new(0),
        }
    }

    fn sessions_path(&self, user_id: &str) -> PathBuf {
        self.base_dir.join(user_id).join(SESSIONS_FILE)
    }

    /// Build a completed-session record stamped with the current time.
    pub fn new_record(
        &self,
        user_id: &str,
        user_role: UserRole,
        symptoms: &str,
        result: DiagnosisResult,
    ) -> DiagnosisRecord {
        let created_at = iso_timestamp();
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);

        let mut hasher = Sha256::new();
        hasher.update(user_id.as_bytes());
        hasher.update(created_at.as_bytes());
        hasher.update(symptoms.as_bytes());
        hasher.update(seq.to_le_bytes());
        hasher.update(std::process::id().to_le_bytes());
        let id = hex::encode(&hasher.finalize()[..8]);

        let head: String = symptoms.chars().take(SUMMARY_CHARS).collect();

        DiagnosisRecord {
            id,
            user_id: user_id.to_string(),
            user_role,
            symptoms: symptoms.to_string(),
            result,
            created_at,
            status: "completed".to_string(),
            summary: format!("Analysis of symptoms: {head}..."),
        }
    }

    /// Append one record to its user's log. Returns the log path.
    pub async fn save(&self, record: &DiagnosisRecord) -> Result<PathBuf, AetherError> {
        validate_user_id(&record.user_id)?;

        let mut line = serde_json::to_string(record)
            .map_err(|e| AetherError::Store(format!("serialize record: {e}")))?;
        line.push('\n');

        let path = self.sessions_path(&record.user_id);
        let _lock = self.write_lock.lock().await;

        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| AetherError::Store(format!("create {}: {e}", dir.display())))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| AetherError::Store(format!("open {}: {e}", path.display())))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| AetherError::Store(format!("write {}: {e}", path.display())))?;
        file.flush()
            .await
            .map_err(|e| AetherError::Store(format!("flush {}: {e}", path.display())))?;

        tracing::debug!(id = %record.id, "saved diagnosis session");
        Ok(path)
    }

    /// Most recent records for a user, newest first. Unparseable lines are skipped.
    pub async fn recent(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<DiagnosisRecord>, AetherError> {
        validate_user_id(user_id)?;

        let path = self.sessions_path(user_id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AetherError::Store(format!("read {}: {e}", path.display())));
            }
        };

        let lines: Vec<&str> = content.lines().collect();
        let mut records = Vec::new();
        for (lineno, line) in lines.into_iter().enumerate().rev() {
            if records.len() >= limit {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<DiagnosisRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("skipping malformed session line {} in {}: {e}", lineno + 1, path.display());
                }
            }
        }
        Ok(records)
    }
}

/// User ids become directory names, so only `[A-Za-z0-9_-]` is accepted.
pub fn validate_user_id(user_id: &str) -> Result<(), AetherError> {
    if user_id.is_empty() {
        return Err(AetherError::InvalidInput("user_id must not be empty".to_string()));
    }
    if user_id.len() > MAX_USER_ID_LEN {
        return Err(AetherError::InvalidInput(format!(
            "user_id must be at most {MAX_USER_ID_LEN} characters"
        )));
    }
    if !user_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AetherError::InvalidInput(
            "user_id may only contain letters, digits, '_' and '-'".to_string(),
        ));
    }
    Ok(())
}

/// ISO timestamp string (YYYY-MM-DDTHH:MM:SSZ).
fn iso_timestamp() -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let days = now / 86400;
    let day_secs = now % 86400;
    let (year, month, day) = days_to_ymd(days);
    let hour = day_secs / 3600;
    let min = (day_secs % 3600) / 60;
    let sec = day_secs % 60;
    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{min:02}:{sec:02}Z")
}

/// Convert days since Unix epoch to (year, month, day).
fn days_to_ymd(mut days: u64) -> (u64, u64, u64) {
    // civil_from_days (Howard Hinnant)
    days += 719468;
    let era = days / 146097;
    let doe = days % 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}
