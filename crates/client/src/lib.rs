#![forbid(unsafe_code)]

pub mod api;
pub mod error;
pub mod http;
pub mod sync_service;
pub mod toggle_service;
pub mod wire;

pub use prep_core::Clock;

pub use api::{InMemoryProgressApi, MarkOutcome, ProgressApi};
pub use error::ApiError;
pub use http::HttpProgressApi;
pub use sync_service::SyncService;
pub use toggle_service::{ToggleOutcome, ToggleReport, ToggleService, ToggleStart};
