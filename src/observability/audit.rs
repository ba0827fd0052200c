//! Per-request audit log.
//!
//! One human-readable record per inbound request, appended to a single file
//! held open for the lifetime of the process:
//!
//! ```text
//! Request ID:<id>
//! Time:<RFC 1123, GMT>
//! Remote IP address:<ip:port>
//! HTTP Status:<code>
//!
//! ```
//!
//! Writers are serialized by an async mutex. A record is rendered in full
//! before the lock is taken and flushed before it is released, so records
//! from concurrent requests never interleave.

use std::io;
use std::net::SocketAddr;
use std::path::Path;

use chrono::{DateTime, Utc};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::http::request::CorrelationId;

/// What gets written for one request.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub request_id: CorrelationId,
    pub time: DateTime<Utc>,
    pub remote_addr: Option<SocketAddr>,
    pub status: u16,
}

impl AuditRecord {
    /// Record stamped with the current time.
    pub fn now(request_id: CorrelationId, remote_addr: Option<SocketAddr>, status: u16) -> Self {
        Self {
            request_id,
            time: Utc::now(),
            remote_addr,
            status,
        }
    }

    pub fn render(&self) -> String {
        let remote = self
            .remote_addr
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        format!(
            "Request ID:{}\nTime:{}\nRemote IP address:{}\nHTTP Status:{}\n\n",
            self.request_id,
            self.time.format("%a, %d %b %Y %H:%M:%S GMT"),
            remote,
            self.status
        )
    }
}

/// Append-only audit sink shared by all requests.
#[derive(Debug)]
pub struct AuditLog {
    sink: Option<Sink>,
}

#[derive(Debug)]
struct Sink {
    file: Mutex<File>,
}

impl AuditLog {
    /// Open (or create) the log file in append mode.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        options.mode(0o664);
        let file = options.open(path).await?;

        tracing::info!(path = %path.display(), "Audit log opened");
        Ok(Self {
            sink: Some(Sink {
                file: Mutex::new(file),
            }),
        })
    }

    /// A log that accepts and drops every record.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Log backed by a read-only handle; every append fails.
    #[cfg(test)]
    pub(crate) async fn read_only_for_tests(path: &Path) -> Self {
        let file = OpenOptions::new().read(true).open(path).await.unwrap();
        Self {
            sink: Some(Sink {
                file: Mutex::new(file),
            }),
        }
    }

    /// Append one record and flush it.
    pub async fn append(&self, record: &AuditRecord) -> io::Result<()> {
        let Some(sink) = &self.sink else {
            return Ok(());
        };
        let rendered = record.render();

        let mut file = sink.file.lock().await;
        file.write_all(rendered.as_bytes()).await?;
        file.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;

    #[test]
    fn test_record_format() {
        let record = AuditRecord {
            request_id: CorrelationId::from("abc123"),
            time: Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap(),
            remote_addr: Some("10.0.0.7:51234".parse().unwrap()),
            status: 200,
        };
        assert_eq!(
            record.render(),
            "Request ID:abc123\nTime:Tue, 05 Mar 2024 14:07:09 GMT\nRemote IP address:10.0.0.7:51234\nHTTP Status:200\n\n"
        );
    }

    #[test]
    fn test_unknown_remote() {
        let record = AuditRecord::now(CorrelationId::from("x"), None, 500);
        assert!(record.render().contains("Remote IP address:unknown\n"));
    }

    #[tokio::test]
    async fn test_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        std::fs::write(&path, "previous\n").unwrap();

        let log = AuditLog::open(&path).await.unwrap();
        log.append(&AuditRecord::now(CorrelationId::from("r1"), None, 404))
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("previous\nRequest ID:r1\n"));
        assert!(content.ends_with("HTTP Status:404\n\n"));
    }

    #[tokio::test]
    async fn test_concurrent_records_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        let log = Arc::new(AuditLog::open(&path).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..64 {
            let log = log.clone();
            handles.push(tokio::spawn(async move {
                let id = CorrelationId::from(format!("req-{}", i).as_str());
                log.append(&AuditRecord::now(id, None, 200)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let records: Vec<&str> = content.split_terminator("\n\n").collect();
        assert_eq!(records.len(), 64);
        for record in records {
            let lines: Vec<&str> = record.lines().collect();
            assert_eq!(lines.len(), 4, "malformed record: {:?}", record);
            assert!(lines[0].starts_with("Request ID:req-"));
            assert!(lines[1].starts_with("Time:"));
            assert_eq!(lines[3], "HTTP Status:200");
        }
    }

    #[tokio::test]
    async fn test_disabled_log_accepts_records() {
        let log = AuditLog::disabled();
        assert!(!log.is_enabled());
        log.append(&AuditRecord::now(CorrelationId::from("x"), None, 200))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_open_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("audit.log");
        assert!(AuditLog::open(&path).await.is_err());
    }
}
