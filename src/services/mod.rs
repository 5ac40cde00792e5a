//! Business logic services.

pub mod auth;
pub mod spreadsheet;
pub mod upload;

pub use upload::UploadLimits;
