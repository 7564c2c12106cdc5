use super::error::ApiError;
use super::types::{
    AnalysisResult, AnalyzeRequest, AnalyzeResponse, Credentials, LoginResponse, SelectedFile,
    UploadResult,
};
use super::ResumeBackend;
use crate::session::Session;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const UPLOAD_PATH: &str = "/upload_resume/";
const ANALYZE_PATH: &str = "/analyze_resume/";
const LOGIN_PATH: &str = "/login/";
const REGISTER_PATH: &str = "/register/";

/// HTTP adapter for the resume backend.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, session: Session) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("resume-analyzer/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let request = self.http.post(self.url(path));
        match self.session.token() {
            Some(token) => match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => request.header(AUTHORIZATION, value),
                Err(_) => {
                    warn!("Stored access token is not a valid header value, sending without it");
                    request
                }
            },
            None => request,
        }
    }

    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let bytes = Self::send(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ResumeBackend for ApiClient {
    async fn upload_file(&self, file: &SelectedFile) -> Result<UploadResult, ApiError> {
        let bytes = tokio::fs::read(file.path())
            .await
            .map_err(|source| ApiError::Io {
                path: file.path.clone(),
                source,
            })?;

        debug!(file = %file.name, size = bytes.len(), "Uploading resume");

        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        Self::send_json(self.post(UPLOAD_PATH).multipart(form)).await
    }

    async fn analyze_text(&self, text: &str, filename: &str) -> Result<AnalysisResult, ApiError> {
        debug!(filename, chars = text.len(), "Requesting analysis");

        let payload = AnalyzeRequest { text, filename };
        let response: AnalyzeResponse =
            Self::send_json(self.post(ANALYZE_PATH).json(&payload)).await?;
        Ok(response.analysis)
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        debug!("Signing in");
        Self::send_json(self.post(LOGIN_PATH).json(credentials)).await
    }

    async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        debug!("Registering account");
        Self::send(self.post(REGISTER_PATH).json(credentials)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Answers a single request with `status` and `body`, and yields the raw
    /// request it received.
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            request
        });
        (base_url, handle)
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            if head.contains("transfer-encoding: chunked") {
                if buf.ends_with(b"0\r\n\r\n") {
                    break;
                }
                continue;
            }
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn request_body(request: &str) -> &str {
        request.split_once("\r\n\r\n").map(|(_, body)| body).unwrap_or("")
    }

    fn client(base_url: &str, session: Session) -> ApiClient {
        ApiClient::new(base_url, Duration::from_secs(5), session).unwrap()
    }

    const ANALYSIS_BODY: &str = r#"{"analysis":{"skills":["Rust","SQL"],"summary":"Backend engineer.","suggestions":["Quantify impact"],"job_fit_score":82}}"#;

    #[tokio::test]
    async fn upload_sends_pdf_in_file_part() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        std::fs::write(&path, b"%PDF-1.4 resume bytes").unwrap();

        let (base_url, server) =
            serve_once("200 OK", r#"{"resume_id":"r-1","text":"Jane Doe, engineer"}"#).await;
        let session = Session::in_memory();
        session.store_token("tok").unwrap();

        let uploaded = client(&base_url, session)
            .upload_file(&SelectedFile::from_path(&path))
            .await
            .unwrap();
        assert_eq!(uploaded.resume_id, "r-1");
        assert_eq!(uploaded.text, "Jane Doe, engineer");

        let request = server.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /upload_resume/ HTTP/1.1"));
        assert!(lower.contains("content-type: multipart/form-data; boundary="));
        assert!(lower.contains("authorization: bearer tok"));
        assert!(request.contains(r#"name="file""#));
        assert!(request.contains(r#"filename="resume.pdf""#));
        assert!(lower.contains("content-type: application/pdf"));
        assert!(request.contains("%PDF-1.4 resume bytes"));
    }

    #[tokio::test]
    async fn analyze_posts_text_and_filename_and_unwraps_analysis() {
        let (base_url, server) = serve_once("200 OK", ANALYSIS_BODY).await;

        let analysis = client(&base_url, Session::in_memory())
            .analyze_text("Jane Doe, engineer", "resume.pdf")
            .await
            .unwrap();
        assert_eq!(analysis.skills, vec!["Rust", "SQL"]);
        assert_eq!(analysis.summary, "Backend engineer.");
        assert_eq!(analysis.suggestions, vec!["Quantify impact"]);
        assert_eq!(analysis.score_label(), "82 / 100");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /analyze_resume/ HTTP/1.1"));
        assert!(request
            .to_ascii_lowercase()
            .contains("content-type: application/json"));
        let body: serde_json::Value = serde_json::from_str(request_body(&request)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"text": "Jane Doe, engineer", "filename": "resume.pdf"})
        );
    }

    #[tokio::test]
    async fn error_status_keeps_code_and_body() {
        let (base_url, server) =
            serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#).await;

        let err = client(&base_url, Session::in_memory())
            .analyze_text("text", "resume.pdf")
            .await
            .unwrap_err();
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, r#"{"detail":"boom"}"#);
            }
            other => panic!("expected status error, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn rejected_login_is_unauthorized() {
        let (base_url, server) =
            serve_once("401 Unauthorized", r#"{"detail":"Invalid credentials"}"#).await;
        let credentials = Credentials {
            email: "jane@example.com".to_string(),
            password: "wrong-pass".to_string(),
        };

        let err = client(&base_url, Session::in_memory())
            .login(&credentials)
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /login/ HTTP/1.1"));
        let body: serde_json::Value = serde_json::from_str(request_body(&request)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"email": "jane@example.com", "password": "wrong-pass"})
        );
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let (base_url, server) = serve_once("200 OK", r#"{"result":"not an analysis"}"#).await;

        let err = client(&base_url, Session::in_memory())
            .analyze_text("text", "resume.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)), "got {:?}", err);
        server.await.unwrap();
    }

    #[test]
    fn base_url_is_normalised() {
        let client = ApiClient::new(
            "http://127.0.0.1:8000/",
            Duration::from_secs(5),
            Session::in_memory(),
        )
        .unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:8000");
        assert_eq!(
            client.url(UPLOAD_PATH),
            "http://127.0.0.1:8000/upload_resume/"
        );
    }

    #[test]
    fn bearer_token_follows_session() {
        let session = Session::in_memory();
        let client =
            ApiClient::new("http://localhost:8000", Duration::from_secs(5), session.clone())
                .unwrap();

        let request = client.post(ANALYZE_PATH).build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());

        session.store_token("tok").unwrap();
        let request = client.post(ANALYZE_PATH).build().unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Bearer tok"
        );
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let client = ApiClient::new(
            "http://127.0.0.1:9",
            Duration::from_secs(1),
            Session::in_memory(),
        )
        .unwrap();
        let file = SelectedFile::from_path("/definitely/not/here/resume.pdf");
        let err = client.upload_file(&file).await.unwrap_err();
        assert!(matches!(err, ApiError::Io { .. }));
    }
}
