//! HTTP request handlers organized by functionality

pub mod admin;
pub mod api;
pub mod error;

// Re-export handler functions
pub use admin::{ADMIN_PASSWORD_HEADER, admin_list_sites, admin_login, admin_replace_sites};
pub use api::{ItemsResponse, api_check, api_detail, api_hot, api_search};
pub use error::ApiError;
