mod client;
mod errors;

pub use client::{ApiClient, ApiRequest, ApiResponse};
pub use errors::HttpError;
