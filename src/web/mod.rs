pub mod admin;
pub mod auth;
pub mod csrf;
pub mod error;
pub mod models;
pub mod pages;
pub mod partner;
pub mod programs;
pub mod router;
pub mod state;
pub mod submit;
pub mod uploads;

pub use error::ApiError;
pub use state::AppState;
