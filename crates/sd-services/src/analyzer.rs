use crate::config::AnalyzerConfig;
use crate::extractor::SourceArchive;
use reqwest::multipart::{Form, Part};
use sd_types::{AnalyzerError, EngineError, EngineResult, Smell};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Remote producer of smell findings.
///
/// Failures are surfaced as-is; retries are the caller's business.
#[allow(async_fn_in_trait)]
pub trait SmellAnalyzer: Send + Sync {
    async fn analyze(&self, archive: &SourceArchive) -> Result<Vec<Smell>, AnalyzerError>;
}

/// Analyzer service reached over HTTP with a multipart upload
#[derive(Debug, Clone)]
pub struct HttpAnalyzer {
    client: reqwest::Client,
    endpoint: String,
    form_field: String,
    timeout_secs: u64,
}

impl HttpAnalyzer {
    pub fn new(config: &AnalyzerConfig) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::ConfigError(format!("analyzer client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            form_field: config.form_field.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify(&self, err: reqwest::Error) -> AnalyzerError {
        if err.is_timeout() {
            AnalyzerError::Timeout(self.timeout_secs)
        } else {
            AnalyzerError::Transport(err.to_string())
        }
    }
}

impl SmellAnalyzer for HttpAnalyzer {
    #[instrument(skip(self, archive), fields(endpoint = %self.endpoint, archive = %archive.file_name))]
    async fn analyze(&self, archive: &SourceArchive) -> Result<Vec<Smell>, AnalyzerError> {
        let part = Part::bytes(archive.bytes.clone())
            .file_name(archive.file_name.clone())
            .mime_str(&archive.content_type)
            .map_err(|e| AnalyzerError::Transport(e.to_string()))?;
        let form = Form::new().part(self.form_field.clone(), part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Analyzer rejected upload");
            return Err(AnalyzerError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AnalyzerError::Malformed(e.to_string()))?;
        let smells = parse_smells_response(body)?;
        debug!(smells = smells.len(), "Analyzer responded");
        Ok(smells)
    }
}

/// Pull the `codeSmells` array out of an analyzer response body
pub fn parse_smells_response(body: Value) -> Result<Vec<Smell>, AnalyzerError> {
    let smells = match body {
        Value::Object(mut map) => map.remove("codeSmells"),
        _ => None,
    };

    match smells {
        Some(raw @ Value::Array(_)) => serde_json::from_value(raw)
            .map_err(|e| AnalyzerError::Malformed(format!("codeSmells: {}", e))),
        Some(other) => Err(AnalyzerError::Malformed(format!(
            "codeSmells must be an array, got {}",
            kind_of(&other)
        ))),
        None => Err(AnalyzerError::Malformed(
            "response has no codeSmells field".to_string(),
        )),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
