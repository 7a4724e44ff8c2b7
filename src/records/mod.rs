mod csv_file;
mod export;
mod sqlite;

pub use csv_file::CsvRecordStore;
pub use export::export_csv;
pub use sqlite::SqliteRecordStore;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDateTime};

use crate::config::StoreBackend;

const STORED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const DISPLAY_TIMESTAMP_FORMAT: &str = "%d %b %Y, %I:%M %p";

/// The three kinds of visitor submissions the site collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionKind {
    Stories,
    Casting,
    Contact,
}

impl SubmissionKind {
    pub const ALL: [SubmissionKind; 3] = [
        SubmissionKind::Stories,
        SubmissionKind::Casting,
        SubmissionKind::Contact,
    ];

    /// Parses the path segment used by the admin export route.
    pub fn from_key(value: &str) -> Option<Self> {
        match value {
            "stories" => Some(SubmissionKind::Stories),
            "casting" => Some(SubmissionKind::Casting),
            "contact" => Some(SubmissionKind::Contact),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SubmissionKind::Stories => "stories",
            SubmissionKind::Casting => "casting",
            SubmissionKind::Contact => "contact",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SubmissionKind::Stories => "Story Submissions",
            SubmissionKind::Casting => "Casting Applications",
            SubmissionKind::Contact => "Contact Messages",
        }
    }

    pub fn csv_file_name(self) -> &'static str {
        match self {
            SubmissionKind::Stories => "story_submissions.csv",
            SubmissionKind::Casting => "casting_data.csv",
            SubmissionKind::Contact => "contact_data.csv",
        }
    }

    pub fn header(self) -> &'static [&'static str] {
        match self {
            SubmissionKind::Stories => &["Uploaded At", "Name", "Email", "Title", "Filename"],
            SubmissionKind::Casting => &[
                "Created At",
                "Name",
                "Age",
                "City",
                "Experience",
                "Profile Link",
            ],
            SubmissionKind::Contact => &["Created At", "Name", "Email", "Message"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorySubmission {
    pub uploaded_at: String,
    pub name: String,
    pub email: String,
    pub title: String,
    pub stored_filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastingApplication {
    pub created_at: String,
    pub name: String,
    pub age: String,
    pub city: String,
    pub experience: String,
    pub profile_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub created_at: String,
    pub name: String,
    pub email: String,
    pub message: String,
}

/// One accepted form submission, ready to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Story(StorySubmission),
    Casting(CastingApplication),
    Contact(ContactMessage),
}

impl Submission {
    pub fn kind(&self) -> SubmissionKind {
        match self {
            Submission::Story(_) => SubmissionKind::Stories,
            Submission::Casting(_) => SubmissionKind::Casting,
            Submission::Contact(_) => SubmissionKind::Contact,
        }
    }

    /// Field values in the order of [`SubmissionKind::header`].
    pub fn to_row(&self) -> Vec<&str> {
        match self {
            Submission::Story(story) => vec![
                story.uploaded_at.as_str(),
                story.name.as_str(),
                story.email.as_str(),
                story.title.as_str(),
                story.stored_filename.as_str(),
            ],
            Submission::Casting(casting) => vec![
                casting.created_at.as_str(),
                casting.name.as_str(),
                casting.age.as_str(),
                casting.city.as_str(),
                casting.experience.as_str(),
                casting.profile_link.as_str(),
            ],
            Submission::Contact(contact) => vec![
                contact.created_at.as_str(),
                contact.name.as_str(),
                contact.email.as_str(),
                contact.message.as_str(),
            ],
        }
    }
}

/// Everything stored for one kind, as read back by the admin views.
#[derive(Debug, Clone)]
pub struct SubmissionTable {
    pub kind: SubmissionKind,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SubmissionTable {
    pub fn empty(kind: SubmissionKind) -> Self {
        Self {
            kind,
            columns: kind.header().iter().map(|col| col.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

/// Append-only persistence for submissions, backed by whichever store was configured.
#[derive(Clone)]
pub enum RecordStore {
    Sqlite(SqliteRecordStore),
    Csv(CsvRecordStore),
}

impl RecordStore {
    pub async fn open(backend: &StoreBackend) -> Result<Self> {
        match backend {
            StoreBackend::Sqlite { database_url } => {
                Ok(RecordStore::Sqlite(SqliteRecordStore::connect(database_url).await?))
            }
            StoreBackend::Csv { data_dir } => Ok(RecordStore::Csv(CsvRecordStore::new(data_dir))),
        }
    }

    pub async fn append(&self, submission: &Submission) -> Result<()> {
        match self {
            RecordStore::Sqlite(store) => store.append(submission).await,
            RecordStore::Csv(store) => store.append(submission).await,
        }
    }

    /// SQLite returns newest first; CSV returns file order.
    pub async fn list_all(&self, kind: SubmissionKind) -> Result<SubmissionTable> {
        match self {
            RecordStore::Sqlite(store) => store.list_all(kind).await,
            RecordStore::Csv(store) => store.list_all(kind).await,
        }
    }
}

/// Current local time in the machine-readable form stored with each row.
pub fn timestamp_now() -> String {
    Local::now()
        .naive_local()
        .format(STORED_TIMESTAMP_FORMAT)
        .to_string()
}

/// Renders a stored timestamp for humans, passing through anything unparseable.
pub fn display_timestamp(raw: &str) -> String {
    let trimmed = raw.trim();
    let parsed = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.naive_local())
        });

    match parsed {
        Some(dt) => dt.format(DISPLAY_TIMESTAMP_FORMAT).to_string(),
        None => raw.to_string(),
    }
}
