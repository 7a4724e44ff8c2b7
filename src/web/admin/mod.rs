mod auth;
mod dashboard;
mod download;

pub use dashboard::dashboard;
pub use download::download_submissions;
