use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A resume picked by the user. Only the path is kept; bytes are read when
/// the upload starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size on disk, if the file is still readable.
    pub fn size(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|m| m.len())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadResult {
    pub resume_id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub skills: Vec<String>,
    pub summary: String,
    pub suggestions: Vec<String>,
    pub job_fit_score: f64,
}

impl AnalysisResult {
    pub fn score_label(&self) -> String {
        format!("{} / 100", self.job_fit_score)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeRequest<'a> {
    pub text: &'a str,
    pub filename: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeResponse {
    pub analysis: AnalysisResult,
}

#[derive(Derivative, Clone, Default, Serialize)]
#[derivative(Debug)]
pub struct Credentials {
    pub email: String,
    #[derivative(Debug = "ignore")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}
