use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use axum::extract::{Multipart, multipart::Field};
use chrono::Local;
use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
};
use tracing::warn;

use crate::web::storage::ensure_storage_root;

/// Extensions accepted for story manuscripts, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];
pub const FILE_FIELD: &str = "file";

const UPLOAD_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const MAX_NAME_ATTEMPTS: usize = 1000;
const MAX_FILE_NAME_BYTES: usize = 255;
/// Room kept for `_999`, the largest collision counter.
const COLLISION_SUFFIX_BYTES: usize = 4;

/// Result type used by the multipart reader.
pub type UploadResult<T> = Result<T, UploadError>;

/// Error returned when the story form cannot be read or its file cannot be stored.
#[derive(Debug)]
pub enum UploadError {
    /// The multipart body itself is malformed or was cut off.
    Malformed(String),
    /// The upload directory could not be written.
    Storage(anyhow::Error),
}

impl UploadError {
    pub fn malformed(message: impl Into<String>) -> Self {
        UploadError::Malformed(message.into())
    }
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadError::Malformed(message) => write!(f, "{message}"),
            UploadError::Storage(err) => write!(f, "{err:#}"),
        }
    }
}

impl std::error::Error for UploadError {}

/// Why an attached manuscript was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentError {
    Missing,
    DisallowedType,
}

impl AttachmentError {
    pub fn message(self) -> &'static str {
        match self {
            AttachmentError::Missing => "Please attach a PDF or DOCX file.",
            AttachmentError::DisallowedType => "Only PDF, DOC, or DOCX files are allowed.",
        }
    }
}

/// A manuscript written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub original_name: String,
    pub stored_name: String,
    pub size: u64,
}

/// Fields of the story submission form.
#[derive(Debug)]
pub struct StoryForm {
    pub name: String,
    pub email: String,
    pub title: String,
    pub attachment: Result<StoredUpload, AttachmentError>,
}

impl Default for StoryForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            title: String::new(),
            attachment: Err(AttachmentError::Missing),
        }
    }
}

/// Reads the story form, streaming the first `file` part into `repo`.
///
/// The file name is checked before any of the part's body is read, so a
/// rejected attachment never reaches the disk. A stored file is removed again
/// if it turns out to be empty or the rest of the form cannot be read.
pub async fn read_story_form(
    multipart: Multipart,
    repo: &FileRepository,
) -> UploadResult<StoryForm> {
    let mut form = StoryForm::default();
    let outcome = fill_story_form(multipart, repo, &mut form).await;

    if outcome.is_err() {
        if let Ok(stored) = &form.attachment {
            if let Err(err) = repo.discard(&stored.stored_name).await {
                warn!(?err, "failed to remove partial story upload");
            }
        }
    }

    outcome.map(|()| form)
}

async fn fill_story_form(
    mut multipart: Multipart,
    repo: &FileRepository,
    form: &mut StoryForm,
) -> UploadResult<()> {
    let mut file_seen = false;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|err| UploadError::malformed(format!("failed to parse upload form: {err}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        if let Some(original_name) = field.file_name().map(str::to_string) {
            if field_name != FILE_FIELD || file_seen {
                continue;
            }
            file_seen = true;

            if let Err(reason) = check_attachment_name(&original_name) {
                form.attachment = Err(reason);
                return Ok(());
            }

            let stored = repo.store_field(&original_name, &mut field).await?;
            if stored.size == 0 {
                repo.discard(&stored.stored_name)
                    .await
                    .map_err(UploadError::Storage)?;
                form.attachment = Err(AttachmentError::Missing);
                return Ok(());
            }
            form.attachment = Ok(stored);
            continue;
        }

        let target = match field_name.as_str() {
            "name" => &mut form.name,
            "email" => &mut form.email,
            "title" => &mut form.title,
            _ => continue,
        };
        *target = field.text().await.map_err(|err| {
            UploadError::malformed(format!("failed to read field `{field_name}`: {err}"))
        })?;
    }

    Ok(())
}

/// Name-level checks that run before any upload data is read.
pub fn check_attachment_name(original_name: &str) -> Result<(), AttachmentError> {
    if original_name.trim().is_empty() {
        return Err(AttachmentError::Missing);
    }
    if !is_allowed_file(original_name) {
        return Err(AttachmentError::DisallowedType);
    }
    Ok(())
}

pub fn is_allowed_file(filename: &str) -> bool {
    file_extension(filename)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Text after the final `.`, lowercased.
fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Directory-backed store for uploaded manuscripts.
#[derive(Debug, Clone)]
pub struct FileRepository {
    root: PathBuf,
}

impl FileRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Streams one multipart file part to `<timestamp>_<sanitized name>`.
    async fn store_field(
        &self,
        original_name: &str,
        field: &mut Field<'_>,
    ) -> UploadResult<StoredUpload> {
        let (stored_name, mut file) = self
            .create(original_name)
            .await
            .map_err(UploadError::Storage)?;
        let path = self.root.join(&stored_name);

        let copied = copy_field(field, &mut file, &path).await;
        drop(file);

        match copied {
            Ok(size) => Ok(StoredUpload {
                original_name: original_name.to_string(),
                stored_name,
                size,
            }),
            Err(err) => {
                if let Err(cleanup) = self.discard(&stored_name).await {
                    warn!(?cleanup, "failed to remove partial story upload");
                }
                Err(err)
            }
        }
    }

    /// Opens a fresh file named after the upload and the current second.
    pub async fn create(&self, original_name: &str) -> Result<(String, File)> {
        let stamp = Local::now().format(UPLOAD_STAMP_FORMAT).to_string();
        self.open_unique(&stored_base_name(&stamp, original_name))
            .await
    }

    pub async fn discard(&self, stored_name: &str) -> Result<()> {
        let path = self.root.join(stored_name);
        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("failed to remove {}", path.display()))
    }

    async fn open_unique(&self, base: &str) -> Result<(String, File)> {
        ensure_storage_root(&self.root).await?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = numbered_name(base, attempt);
            let path = self.root.join(&candidate);

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((candidate, file)),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("failed to create {}", path.display()));
                }
            }
        }

        bail!("no free upload name for {base} after {MAX_NAME_ATTEMPTS} attempts")
    }
}

async fn copy_field(field: &mut Field<'_>, file: &mut File, path: &Path) -> UploadResult<u64> {
    let mut size: u64 = 0;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|err| UploadError::malformed(format!("failed to read upload data: {err}")))?
    {
        size += chunk.len() as u64;
        file.write_all(&chunk)
            .await
            .with_context(|| format!("failed to write {}", path.display()))
            .map_err(UploadError::Storage)?;
    }
    file.flush()
        .await
        .with_context(|| format!("failed to flush {}", path.display()))
        .map_err(UploadError::Storage)?;

    Ok(size)
}

/// `<stamp>_<stem>.<ext>`, with the stem shortened so the name plus a
/// collision counter stays within one filesystem name component.
fn stored_base_name(stamp: &str, original_name: &str) -> String {
    let (stem, extension) = sanitized_parts(original_name);
    let extension_len = extension.as_ref().map_or(0, |ext| ext.len() + 1);
    let budget = (MAX_FILE_NAME_BYTES - COLLISION_SUFFIX_BYTES)
        .saturating_sub(stamp.len() + 1 + extension_len)
        .max(1);
    let stem = truncate_to_bytes(&stem, budget);

    match extension {
        Some(ext) => format!("{stamp}_{stem}.{ext}"),
        None => format!("{stamp}_{stem}"),
    }
}

/// Stem and extension cleaned separately so the extension survives.
fn sanitized_parts(original: &str) -> (String, Option<String>) {
    let last_component = original.rsplit(['/', '\\']).next().unwrap_or("");
    let (raw_stem, raw_extension) = match last_component.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (last_component, None),
    };

    let stem = clean_segment(raw_stem);
    let stem = stem.trim_start_matches('.');
    let stem = if stem.is_empty() { "upload" } else { stem };
    let extension = raw_extension
        .map(clean_segment)
        .filter(|ext| !ext.is_empty());

    (stem.to_string(), extension)
}

fn clean_segment(segment: &str) -> String {
    sanitize_filename::sanitize(segment)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

fn truncate_to_bytes(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

fn numbered_name(candidate: &str, counter: usize) -> String {
    if counter == 0 {
        return candidate.to_string();
    }

    let (stem, extension) = split_name(candidate);
    if extension.is_empty() {
        format!("{}_{}", stem, counter)
    } else {
        format!("{}_{}.{}", stem, counter, extension)
    }
}

fn split_name(name: &str) -> (String, String) {
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
        .to_string();
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string();
    (stem, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::FromRequest, http::Request};
    use tempfile::tempdir;

    const BOUNDARY: &str = "----story-form-boundary";

    fn sanitize_upload_name(original: &str) -> String {
        match sanitized_parts(original) {
            (stem, Some(ext)) => format!("{stem}.{ext}"),
            (stem, None) => stem,
        }
    }

    async fn multipart_from(parts: &[(&str, Option<&str>, &str)]) -> Multipart {
        let mut body = Vec::new();
        for (name, filename, value) in parts {
            let disposition = match filename {
                Some(filename) => {
                    format!("form-data; name=\"{name}\"; filename=\"{filename}\"")
                }
                None => format!("form-data; name=\"{name}\""),
            };
            body.extend_from_slice(
                format!("--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\n\r\n").as_bytes(),
            );
            body.extend_from_slice(value.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request");
        Multipart::from_request(request, &()).await.expect("multipart")
    }

    fn stored_names(repo: &FileRepository) -> Vec<String> {
        match std::fs::read_dir(repo.root()) {
            Ok(entries) => entries
                .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn accepts_allowed_extensions_case_insensitively() {
        assert!(is_allowed_file("script.pdf"));
        assert!(is_allowed_file("Script.DOCX"));
        assert!(is_allowed_file("draft.v2.Doc"));
    }

    #[test]
    fn rejects_other_extensions() {
        assert!(!is_allowed_file("virus.exe"));
        assert!(!is_allowed_file("pdf"));
        assert!(!is_allowed_file("notes."));
        assert!(!is_allowed_file("story.pdf.exe"));
    }

    #[test]
    fn name_checks_report_missing_before_type() {
        assert_eq!(check_attachment_name(""), Err(AttachmentError::Missing));
        assert_eq!(check_attachment_name("   "), Err(AttachmentError::Missing));
        assert_eq!(
            check_attachment_name("story.exe"),
            Err(AttachmentError::DisallowedType)
        );
        assert_eq!(check_attachment_name("story.docx"), Ok(()));
        assert_eq!(
            AttachmentError::DisallowedType.message(),
            "Only PDF, DOC, or DOCX files are allowed."
        );
    }

    #[test]
    fn sanitize_strips_directories_and_spaces() {
        assert_eq!(sanitize_upload_name("../../etc/passwd.pdf"), "passwd.pdf");
        assert_eq!(
            sanitize_upload_name(r"C:\Users\asha\My Story.docx"),
            "My_Story.docx"
        );
        assert_eq!(sanitize_upload_name("..hidden.pdf"), "hidden.pdf");
        assert_eq!(sanitize_upload_name("..."), "upload");
    }

    #[test]
    fn sanitize_keeps_extension_of_dot_only_stems() {
        assert_eq!(sanitize_upload_name("....pdf"), "upload.pdf");
        assert_eq!(sanitize_upload_name(".docx"), "upload.docx");
    }

    #[test]
    fn long_names_are_shortened_but_keep_extension() {
        let stamp = "20240101_120000";

        let ascii = stored_base_name(stamp, &format!("{}.pdf", "a".repeat(245)));
        assert!(ascii.len() <= MAX_FILE_NAME_BYTES - COLLISION_SUFFIX_BYTES);
        assert!(ascii.starts_with("20240101_120000_aaa"));
        assert!(ascii.ends_with("a.pdf"));

        let wide = stored_base_name(stamp, &format!("{}.docx", "é".repeat(200)));
        assert!(wide.len() <= MAX_FILE_NAME_BYTES - COLLISION_SUFFIX_BYTES);
        assert!(wide.ends_with("é.docx"));

        assert_eq!(
            stored_base_name(stamp, "My Script.pdf"),
            "20240101_120000_My_Script.pdf"
        );
    }

    #[test]
    fn numbered_name_inserts_counter_before_extension() {
        assert_eq!(numbered_name("20240101_120000_a.pdf", 0), "20240101_120000_a.pdf");
        assert_eq!(numbered_name("20240101_120000_a.pdf", 2), "20240101_120000_a_2.pdf");
        assert_eq!(numbered_name("upload", 1), "upload_1");
    }

    #[tokio::test]
    async fn create_prefixes_timestamp_and_creates_directory() {
        let dir = tempdir().expect("temp dir");
        let repo = FileRepository::new(dir.path().join("uploads").join("stories"));

        let (stored, _file) = repo.create("My Script.pdf").await.expect("create");

        assert!(stored.ends_with("_My_Script.pdf"));
        let stamp = &stored[..15];
        assert!(stamp[..8].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(&stamp[8..9], "_");
        assert!(stamp[9..].chars().all(|c| c.is_ascii_digit()));
        assert!(repo.root().join(&stored).exists());
    }

    #[tokio::test]
    async fn overlong_client_name_is_still_stored() {
        let dir = tempdir().expect("temp dir");
        let repo = FileRepository::new(dir.path());

        let (stored, mut file) = repo
            .create(&format!("{}.pdf", "a".repeat(245)))
            .await
            .expect("create");
        file.write_all(b"x").await.expect("write");

        assert!(stored.len() <= MAX_FILE_NAME_BYTES);
        assert!(stored.ends_with(".pdf"));
        assert_eq!(std::fs::read(dir.path().join(&stored)).expect("read"), b"x");
    }

    #[tokio::test]
    async fn same_name_in_same_second_gets_distinct_files() {
        let dir = tempdir().expect("temp dir");
        let repo = FileRepository::new(dir.path());
        let base = stored_base_name("20240101_120000", &format!("{}.pdf", "b".repeat(300)));

        let (first, _) = repo.open_unique(&base).await.expect("first");
        let (second, _) = repo.open_unique(&base).await.expect("second");

        assert_eq!(first, base);
        assert!(second.ends_with("_1.pdf"));
        assert!(second.len() <= MAX_FILE_NAME_BYTES);
        assert!(dir.path().join(&second).exists());
    }

    #[tokio::test]
    async fn streams_file_and_reads_fields_in_any_order() {
        let dir = tempdir().expect("temp dir");
        let repo = FileRepository::new(dir.path().join("stories"));
        let multipart = multipart_from(&[
            ("file", Some("Draft.PDF"), "%PDF-1.4 body"),
            ("name", None, "Asha"),
            ("title", None, "Monsoon"),
        ])
        .await;

        let form = read_story_form(multipart, &repo).await.expect("form");

        assert_eq!(form.name, "Asha");
        assert_eq!(form.title, "Monsoon");
        let stored = form.attachment.expect("stored upload");
        assert_eq!(stored.original_name, "Draft.PDF");
        assert_eq!(stored.size, 13);
        let written = std::fs::read(repo.root().join(&stored.stored_name)).expect("read");
        assert_eq!(written, b"%PDF-1.4 body");
    }

    #[tokio::test]
    async fn disallowed_attachment_never_touches_disk() {
        let dir = tempdir().expect("temp dir");
        let repo = FileRepository::new(dir.path().join("stories"));
        let multipart = multipart_from(&[("file", Some("tool.exe"), "MZ")]).await;

        let form = read_story_form(multipart, &repo).await.expect("form");

        assert_eq!(form.attachment, Err(AttachmentError::DisallowedType));
        assert!(!repo.root().exists());
    }

    #[tokio::test]
    async fn empty_or_absent_file_is_missing_and_leaves_nothing() {
        let dir = tempdir().expect("temp dir");
        let repo = FileRepository::new(dir.path().join("stories"));

        let empty = multipart_from(&[("file", Some("draft.pdf"), "")]).await;
        let form = read_story_form(empty, &repo).await.expect("form");
        assert_eq!(form.attachment, Err(AttachmentError::Missing));
        assert!(stored_names(&repo).is_empty());

        let absent = multipart_from(&[("name", None, "Ravi")]).await;
        let form = read_story_form(absent, &repo).await.expect("form");
        assert_eq!(form.name, "Ravi");
        assert_eq!(form.attachment, Err(AttachmentError::Missing));
    }
}
