use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use crate::entry::AuditLogEntry;
use crate::error::LedgerError;

/// Destination for audit records. Append-only by construction: the trait
/// exposes no rewrite or delete operation.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), LedgerError>;

    async fn entry_count(&self) -> Result<u64, LedgerError>;

    /// All stored entries in append order, for verification and review.
    async fn read_all(&self) -> Result<Vec<AuditLogEntry>, LedgerError>;
}

/// In-memory sink for tests.
pub struct MemoryAuditSink {
    entries: RwLock<Vec<AuditLogEntry>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryAuditSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), LedgerError> {
        self.entries.write().push(entry.clone());
        Ok(())
    }

    async fn entry_count(&self) -> Result<u64, LedgerError> {
        Ok(self.entries.read().len() as u64)
    }

    async fn read_all(&self) -> Result<Vec<AuditLogEntry>, LedgerError> {
        Ok(self.entries.read().clone())
    }
}

/// File-backed sink: one self-describing JSON record per line, appended
/// to an append-only log.
///
/// Appends for a single log are serialized through a mutex so concurrent
/// requests queue briefly instead of racing, preserving append order and
/// preventing interleaved records.
pub struct FileAuditSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileAuditSink {
    pub async fn new(path: PathBuf) -> Result<Self, LedgerError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl AuditSink for FileAuditSink {
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), LedgerError> {
        let json = serde_json::to_string(entry)?;

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(json.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        Ok(())
    }

    async fn entry_count(&self) -> Result<u64, LedgerError> {
        Ok(self.read_all().await?.len() as u64)
    }

    async fn read_all(&self) -> Result<Vec<AuditLogEntry>, LedgerError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path).await?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();
        let mut entries = Vec::new();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let entry: AuditLogEntry = serde_json::from_str(&line)?;
            entries.push(entry);
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sentra_types::{
        AuditStatus, DecisionReason, EnforcementDecision, Outcome, SystemId, TenantId,
    };
    use uuid::Uuid;

    fn entry() -> AuditLogEntry {
        AuditLogEntry {
            id: Uuid::new_v4(),
            system_id: SystemId::new(),
            tenant_id: TenantId::new(),
            environment: "production".into(),
            timestamp: Utc::now(),
            decision: EnforcementDecision {
                id: Uuid::new_v4(),
                outcome: Outcome::Allowed,
                reason: DecisionReason::WithinPolicy,
                risk_score: 0.0,
                confidence: 0.4,
                threats: vec![],
                recommendations: vec![],
                controls_applied: vec![],
                regulatory_impact: None,
                audit_status: AuditStatus::Recorded,
                decided_at: Utc::now(),
            },
            signature: "00".repeat(32),
        }
    }

    #[tokio::test]
    async fn memory_sink_appends_in_order() {
        let sink = MemoryAuditSink::new();
        let first = entry();
        let second = entry();
        sink.append(&first).await.unwrap();
        sink.append(&second).await.unwrap();

        assert_eq!(sink.entry_count().await.unwrap(), 2);
        let all = sink.read_all().await.unwrap();
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[1].id, second.id);
    }

    #[tokio::test]
    async fn file_sink_round_trips_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = FileAuditSink::new(path.clone()).await.unwrap();

        let first = entry();
        sink.append(&first).await.unwrap();
        sink.append(&entry()).await.unwrap();

        let all = sink.read_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);

        // One self-describing record per line.
        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().count(), 2);
        for line in raw.lines() {
            let _: AuditLogEntry = serde_json::from_str(line).unwrap();
        }
    }

    #[tokio::test]
    async fn file_sink_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        {
            let sink = FileAuditSink::new(path.clone()).await.unwrap();
            sink.append(&entry()).await.unwrap();
        }
        {
            let sink = FileAuditSink::new(path.clone()).await.unwrap();
            sink.append(&entry()).await.unwrap();
            assert_eq!(sink.entry_count().await.unwrap(), 2);
        }
    }

    #[tokio::test]
    async fn concurrent_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = std::sync::Arc::new(FileAuditSink::new(path).await.unwrap());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let sink = sink.clone();
            handles.push(tokio::spawn(async move {
                sink.append(&entry()).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Every line must still parse as a complete record.
        let all = sink.read_all().await.unwrap();
        assert_eq!(all.len(), 16);
    }
}
