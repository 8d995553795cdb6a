//! Bounded audit log of search requests. The buffer is the only mutable
//! process-wide state; appends are serialized behind a mutex and reaching the
//! configured limit flushes the whole batch to a timestamped file.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// One record per handled search request.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub request_time: String,
    pub request_host: String,
    pub search_request: String,
    pub search_category: Vec<String>,
    pub search_tags: Vec<String>,
    pub search_time: String,
}

/// The collector owned by the server state and shared by all handlers.
pub struct AuditLog {
    records: Mutex<Vec<LogRecord>>,
    limit: usize,
    app_name: String,
    directory: PathBuf,
}

impl AuditLog {
    pub fn new(app_name: &str, limit: usize) -> Self {
        Self::with_directory(app_name, limit, PathBuf::from("."))
    }

    pub fn with_directory(app_name: &str, limit: usize, directory: PathBuf) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            limit,
            app_name: app_name.to_string(),
            directory,
        }
    }

    /// Append one record, mirroring it to the live log. Hitting the limit
    /// writes the batch out and clears the buffer; on a write failure the
    /// records are kept for the next attempt.
    pub fn append(&self, record: LogRecord) {
        tracing::info!(
            host = %record.request_host,
            category = ?record.search_category,
            tags = ?record.search_tags,
            query = %record.search_request,
            elapsed = %record.search_time,
            "search"
        );
        let mut records = self.records.lock();
        records.push(record);
        if records.len() >= self.limit {
            match self.write_batch(&records) {
                Ok(path) => {
                    records.clear();
                    tracing::info!(file = %path.display(), "audit log flushed");
                }
                Err(error) => tracing::error!(%error, "audit log flush failed"),
            }
        }
    }

    /// Append-or-create `<RFC3339-timestamp>-<APP_NAME>.log`, mode 0644.
    fn write_batch(&self, records: &[LogRecord]) -> Result<PathBuf> {
        let stamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .context("cannot format audit timestamp")?;
        let path = self.directory.join(format!("{stamp}-{}.log", self.app_name));
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }
        let mut file = options
            .open(&path)
            .with_context(|| format!("cannot open audit log '{}'", path.display()))?;
        for record in records {
            writeln!(
                file,
                "{} - {} - {} - {} - {} - {}",
                record.request_time,
                record.request_host,
                record.search_category.join(","),
                record.search_tags.join(","),
                record.search_request,
                record.search_time,
            )?;
        }
        Ok(path)
    }

    #[cfg(test)]
    fn buffered(&self) -> usize {
        self.records.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(query: &str) -> LogRecord {
        LogRecord {
            request_time: "2024-01-01T00:00:00Z".into(),
            request_host: "127.0.0.1:1234".into(),
            search_request: query.into(),
            search_category: vec!["tech".into()],
            search_tags: Vec::new(),
            search_time: "1ms".into(),
        }
    }

    #[test]
    fn buffer_flushes_and_clears_at_the_limit() {
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditLog::with_directory("TEST-APP", 2, dir.path().to_path_buf());
        audit.append(record("first"));
        assert_eq!(audit.buffered(), 1);
        audit.append(record("second"));
        assert_eq!(audit.buffered(), 0);

        let files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .collect();
        assert_eq!(files.len(), 1);
        let name = files[0].file_name().into_string().unwrap();
        assert!(name.ends_with("-TEST-APP.log"));
        let contents = std::fs::read_to_string(files[0].path()).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("first"));
        assert!(contents.contains("127.0.0.1:1234"));
    }

    #[test]
    fn buffer_holds_records_below_the_limit() {
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditLog::with_directory("TEST-APP", 10, dir.path().to_path_buf());
        audit.append(record("only"));
        assert_eq!(audit.buffered(), 1);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
