mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{AnalysisResult, Credentials, LoginResponse, SelectedFile, UploadResult};

use async_trait::async_trait;

/// Remote operations the client depends on. `ApiClient` talks HTTP; tests
/// substitute their own implementation.
#[async_trait]
pub trait ResumeBackend: Send + Sync {
    async fn upload_file(&self, file: &SelectedFile) -> Result<UploadResult, ApiError>;
    async fn analyze_text(&self, text: &str, filename: &str) -> Result<AnalysisResult, ApiError>;
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;
    async fn register(&self, credentials: &Credentials) -> Result<(), ApiError>;
}
