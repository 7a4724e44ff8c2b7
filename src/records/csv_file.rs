use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};

use super::{Submission, SubmissionKind, SubmissionTable};
use crate::web::storage::ensure_storage_root;

/// Submissions appended to one CSV file per kind, header written on first use.
#[derive(Clone)]
pub struct CsvRecordStore {
    inner: Arc<CsvInner>,
}

struct CsvInner {
    data_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvRecordStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(CsvInner {
                data_dir: data_dir.into(),
                write_lock: Mutex::new(()),
            }),
        }
    }

    pub fn path_for(&self, kind: SubmissionKind) -> PathBuf {
        self.inner.data_dir.join(kind.csv_file_name())
    }

    pub async fn append(&self, submission: &Submission) -> Result<()> {
        let kind = submission.kind();
        let path = self.path_for(kind);

        let _guard = self.inner.write_lock.lock().await;
        ensure_storage_root(&self.inner.data_dir).await?;

        let needs_header = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.len() == 0,
            Err(err) if err.kind() == ErrorKind::NotFound => true,
            Err(err) => {
                return Err(err).with_context(|| format!("failed to stat {}", path.display()));
            }
        };

        let mut writer = csv::Writer::from_writer(Vec::new());
        if needs_header {
            writer
                .write_record(kind.header())
                .context("failed to encode CSV header")?;
        }
        writer
            .write_record(submission.to_row())
            .context("failed to encode CSV row")?;
        let bytes = writer
            .into_inner()
            .map_err(|err| anyhow::anyhow!("failed to flush CSV buffer: {err}"))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("failed to open {}", path.display()))?;
        file.write_all(&bytes)
            .await
            .with_context(|| format!("failed to append to {}", path.display()))?;
        file.flush()
            .await
            .with_context(|| format!("failed to flush {}", path.display()))?;

        Ok(())
    }

    /// Rows in file order; the file's first line becomes the column list.
    pub async fn list_all(&self, kind: SubmissionKind) -> Result<SubmissionTable> {
        let path = self.path_for(kind);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(SubmissionTable::empty(kind));
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        parse_table(kind, &bytes, &path)
    }
}

fn parse_table(kind: SubmissionKind, bytes: &[u8], path: &Path) -> Result<SubmissionTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = reader.records();
    let Some(header) = records.next() else {
        return Ok(SubmissionTable::empty(kind));
    };
    let header = header.with_context(|| format!("failed to parse header of {}", path.display()))?;

    let mut table = SubmissionTable {
        kind,
        columns: header.iter().map(str::to_string).collect(),
        rows: Vec::new(),
    };
    for record in records {
        let record = record.with_context(|| format!("failed to parse {}", path.display()))?;
        table.rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ContactMessage, StorySubmission};
    use tempfile::tempdir;

    fn story(name: &str, title: &str) -> Submission {
        Submission::Story(StorySubmission {
            uploaded_at: "2024-02-10T18:45:00.000000".to_string(),
            name: name.to_string(),
            email: "writer@example.com".to_string(),
            title: title.to_string(),
            stored_filename: format!("20240210_184500_{name}.pdf"),
        })
    }

    #[tokio::test]
    async fn writes_header_once_and_keeps_insertion_order() {
        let dir = tempdir().expect("temp dir");
        let store = CsvRecordStore::new(dir.path());

        store.append(&story("a", "First")).await.expect("append a");
        store.append(&story("b", "Second")).await.expect("append b");

        let raw = std::fs::read_to_string(store.path_for(SubmissionKind::Stories))
            .expect("read csv");
        assert_eq!(raw.lines().count(), 3);
        assert!(raw.starts_with("Uploaded At,Name,Email,Title,Filename"));

        let table = store
            .list_all(SubmissionKind::Stories)
            .await
            .expect("list");
        assert_eq!(table.columns[0], "Uploaded At");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][3], "First");
        assert_eq!(table.rows[1][3], "Second");
    }

    #[tokio::test]
    async fn quotes_delimiters_and_reads_them_back() {
        let dir = tempdir().expect("temp dir");
        let store = CsvRecordStore::new(dir.path());
        let message = Submission::Contact(ContactMessage {
            created_at: "2024-02-10T18:45:00.000000".to_string(),
            name: "Ravi, Jr.".to_string(),
            email: "ravi@example.com".to_string(),
            message: "He said \"action\"".to_string(),
        });

        store.append(&message).await.expect("append");

        let raw = std::fs::read_to_string(store.path_for(SubmissionKind::Contact))
            .expect("read csv");
        assert!(raw.contains("\"Ravi, Jr.\""));
        assert!(raw.contains("\"He said \"\"action\"\"\""));

        let table = store
            .list_all(SubmissionKind::Contact)
            .await
            .expect("list");
        assert_eq!(table.rows[0][1], "Ravi, Jr.");
        assert_eq!(table.rows[0][3], "He said \"action\"");
    }

    #[tokio::test]
    async fn empty_existing_file_still_gets_header() {
        let dir = tempdir().expect("temp dir");
        let store = CsvRecordStore::new(dir.path());
        std::fs::write(store.path_for(SubmissionKind::Stories), b"").expect("touch csv");

        store.append(&story("a", "First")).await.expect("append");

        let table = store
            .list_all(SubmissionKind::Stories)
            .await
            .expect("list");
        assert_eq!(table.columns, SubmissionKind::Stories.header());
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][3], "First");
    }

    #[tokio::test]
    async fn missing_file_lists_header_only() {
        let dir = tempdir().expect("temp dir");
        let store = CsvRecordStore::new(dir.path().join("not-yet-created"));

        let table = store
            .list_all(SubmissionKind::Casting)
            .await
            .expect("list");

        assert!(table.rows.is_empty());
        assert_eq!(table.columns, SubmissionKind::Casting.header());
    }
}
