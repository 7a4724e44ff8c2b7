pub mod admin;
pub mod auth;
pub mod forms;
pub mod landing;
pub mod responses;
pub mod router;
pub mod state;
pub mod stories;
pub mod storage;
pub mod templates;
pub mod uploads;

pub use state::AppState;
