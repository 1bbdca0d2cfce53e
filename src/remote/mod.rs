pub mod wire;

use std::time::Duration;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::RemoteError;
use crate::model::{CodingProblem, ExecutionReport, ExecutionRequest, Question};

/// The question-generation and code-execution services.
///
/// Calls block; the app runs them on worker threads. Implementations return
/// already-validated records (see [`wire`]).
pub trait RemoteSource: Send + Sync {
    fn fetch_aptitude(&self, company: &str) -> Result<Vec<Question>, RemoteError>;
    fn fetch_coding(&self, topic: &str) -> Result<Vec<CodingProblem>, RemoteError>;
    fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionReport, RemoteError>;
}

/// `{base}/{route}` or `{base}/{route}/{segment}` with the segment
/// percent-encoded (topic names contain spaces and `&`).
pub fn endpoint(base_url: &str, route: &str, segment: Option<&str>) -> String {
    let base = base_url.trim_end_matches('/');
    match segment {
        Some(seg) => format!(
            "{base}/{route}/{}",
            utf8_percent_encode(seg, NON_ALPHANUMERIC)
        ),
        None => format!("{base}/{route}"),
    }
}

pub struct HttpRemote {
    base_url: String,
    #[cfg(feature = "network")]
    client: reqwest::blocking::Client,
}

impl HttpRemote {
    #[cfg(feature = "network")]
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::link(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    #[cfg(not(feature = "network"))]
    pub fn new(base_url: &str, _timeout: Duration) -> Result<Self, RemoteError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[cfg(feature = "network")]
    fn get_text(&self, url: &str) -> Result<String, RemoteError> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| RemoteError::link(e.to_string()))?;
        Self::body_text(response)
    }

    #[cfg(feature = "network")]
    fn post_json(&self, url: &str, body: &ExecutionRequest) -> Result<String, RemoteError> {
        tracing::debug!(%url, language = body.language.key(), cases = body.test_cases.len(), "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|e| RemoteError::link(e.to_string()))?;
        Self::body_text(response)
    }

    #[cfg(feature = "network")]
    fn body_text(response: reqwest::blocking::Response) -> Result<String, RemoteError> {
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::link(format!("HTTP {status}")));
        }
        response.text().map_err(|e| RemoteError::link(e.to_string()))
    }

    #[cfg(not(feature = "network"))]
    fn get_text(&self, _url: &str) -> Result<String, RemoteError> {
        Err(RemoteError::link("built without network support"))
    }

    #[cfg(not(feature = "network"))]
    fn post_json(&self, _url: &str, _body: &ExecutionRequest) -> Result<String, RemoteError> {
        Err(RemoteError::link("built without network support"))
    }
}

impl RemoteSource for HttpRemote {
    fn fetch_aptitude(&self, company: &str) -> Result<Vec<Question>, RemoteError> {
        let url = endpoint(&self.base_url, "generate-aptitude", Some(company));
        let body = self.get_text(&url)?;
        wire::parse_questions(&body)
    }

    fn fetch_coding(&self, topic: &str) -> Result<Vec<CodingProblem>, RemoteError> {
        let url = endpoint(&self.base_url, "generate-coding", Some(topic));
        let body = self.get_text(&url)?;
        wire::parse_problems(&body)
    }

    fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionReport, RemoteError> {
        let url = endpoint(&self.base_url, "execute-code", None);
        let body = self.post_json(&url, request)?;
        wire::parse_execution(&body, request.test_cases.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_segment() {
        assert_eq!(
            endpoint("http://localhost:8000/", "generate-coding", Some("Arrays & Hashing")),
            "http://localhost:8000/generate-coding/Arrays%20%26%20Hashing"
        );
    }

    #[test]
    fn test_endpoint_without_segment() {
        assert_eq!(
            endpoint("https://example.test", "execute-code", None),
            "https://example.test/execute-code"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let remote = HttpRemote::new("http://localhost:8000///", Duration::from_secs(1)).unwrap();
        assert_eq!(remote.base_url(), "http://localhost:8000");
    }
}
