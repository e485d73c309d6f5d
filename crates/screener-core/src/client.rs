use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::config::Settings;
use crate::document::{Document, Slot};
use crate::error::{Result, ScreenerError};

const UPLOAD_PATH: &str = "/upload";
const CHAT_PATH: &str = "/chat";

/// The analysis and question-answering collaborator
#[async_trait]
pub trait ScreeningBackend: Send + Sync {
    /// Upload a resume/JD pair and get the match analysis back
    async fn analyze(&self, resume: &Document, jd: &Document) -> Result<AnalysisResult>;

    /// Ask about the last uploaded pair. `Ok(None)` means the backend
    /// answered without an answer field.
    async fn ask(&self, question: &str) -> Result<Option<String>>;
}

#[derive(Deserialize)]
struct UploadResponse {
    match_score: Option<i64>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    gaps: Vec<String>,
    #[serde(default)]
    insights: Vec<String>,
    // The backend reports internal failures as a 200 carrying this field
    error: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    question: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    answer: Option<String>,
}

/// HTTP implementation talking to the screening backend
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|source| ScreenerError::Transport {
                endpoint: settings.base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn part(document: &Document) -> Result<Part> {
        Part::bytes(document.content().to_vec())
            .file_name(document.name().to_string())
            .mime_str(document.mime_type())
            .map_err(|source| ScreenerError::Transport {
                endpoint: UPLOAD_PATH.to_string(),
                source,
            })
    }

    /// Send a request and return the body of a 2xx response
    async fn send(&self, endpoint: &str, request: reqwest::RequestBuilder) -> Result<String> {
        let transport = |source| ScreenerError::Transport {
            endpoint: endpoint.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ScreenerError::Status {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        response.text().await.map_err(transport)
    }
}

fn malformed(endpoint: &str, reason: impl Into<String>) -> ScreenerError {
    ScreenerError::MalformedResponse {
        endpoint: endpoint.to_string(),
        reason: reason.into(),
    }
}

/// Turn an upload body into an analysis, rejecting anything that would
/// pass off a backend failure as a real result
fn parse_analysis(body: &str) -> Result<AnalysisResult> {
    let response: UploadResponse =
        serde_json::from_str(body).map_err(|e| malformed(UPLOAD_PATH, e.to_string()))?;

    if let Some(error) = response.error {
        return Err(malformed(UPLOAD_PATH, format!("backend reported error: {error}")));
    }
    let match_score = response
        .match_score
        .ok_or_else(|| malformed(UPLOAD_PATH, "missing match_score"))?;

    Ok(AnalysisResult::new(
        match_score,
        response.strengths,
        response.gaps,
        response.insights,
    ))
}

fn parse_answer(body: &str) -> Result<Option<String>> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| malformed(CHAT_PATH, e.to_string()))?;
    Ok(response.answer)
}

#[async_trait]
impl ScreeningBackend for HttpBackend {
    async fn analyze(&self, resume: &Document, jd: &Document) -> Result<AnalysisResult> {
        let form = Form::new()
            .part(Slot::Resume.field_name(), Self::part(resume)?)
            .part(Slot::JobDescription.field_name(), Self::part(jd)?);

        tracing::debug!(url = %self.url(UPLOAD_PATH), "posting upload");
        let request = self.client.post(self.url(UPLOAD_PATH)).multipart(form);
        let body = self.send(UPLOAD_PATH, request).await?;
        parse_analysis(&body)
    }

    async fn ask(&self, question: &str) -> Result<Option<String>> {
        tracing::debug!(url = %self.url(CHAT_PATH), "posting question");
        let request = self
            .client
            .post(self.url(CHAT_PATH))
            .json(&ChatRequest { question });
        let body = self.send(CHAT_PATH, request).await?;
        parse_answer(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_collections_default_to_empty() {
        let result = parse_analysis(r#"{"match_score": 64}"#).unwrap();
        assert_eq!(result.match_score(), 64);
        assert!(result.strengths().is_empty());
        assert!(result.gaps().is_empty());
        assert!(result.insights().is_empty());
    }

    #[test]
    fn test_backend_error_body_is_not_an_analysis() {
        let body = r#"{"error": "boom", "match_score": 0, "strengths": [], "gaps": []}"#;
        let err = parse_analysis(body).unwrap_err();
        assert!(matches!(err, ScreenerError::MalformedResponse { .. }));
    }

    #[test]
    fn test_missing_score_is_malformed() {
        assert!(parse_analysis(r#"{"strengths": ["SQL"]}"#).is_err());
        assert!(parse_analysis("<html>").is_err());
    }

    #[test]
    fn test_answer_parsing() {
        assert_eq!(parse_answer(r#"{"answer": "Yes"}"#).unwrap().as_deref(), Some("Yes"));
        assert_eq!(parse_answer("{}").unwrap(), None);
        assert!(parse_answer("not json").is_err());
    }
}
