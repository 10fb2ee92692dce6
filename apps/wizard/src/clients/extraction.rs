//! HTTP client for the builder API's extraction endpoints.
//!
//! Two sequential stages: `/api/parse` turns the uploaded file into raw
//! text, `/api/extract` turns raw text into a canonical document. The AI
//! stage routinely takes 10-20s, hence the generous timeout.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::clients::{error_from_response, CollaboratorError, Extractor, ParsedFile};
use crate::models::resume::ResumeDocument;

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(120);

#[derive(Clone)]
pub struct ExtractionClient {
    client: Client,
    base_url: String,
}

impl ExtractionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    success: bool,
    text: String,
    filename: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    success: bool,
    data: ResumeDocument,
}

#[async_trait]
impl Extractor for ExtractionClient {
    async fn parse_file(
        &self,
        filename: &str,
        content: Bytes,
    ) -> Result<ParsedFile, CollaboratorError> {
        let part = multipart::Part::bytes(content.to_vec()).file_name(filename.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/api/parse", self.base_url))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body: ParseResponse = response.json().await?;
        if !body.success {
            return Err(CollaboratorError::Failed);
        }

        debug!(
            "text extraction succeeded: {} chars from {}",
            body.text.len(),
            body.filename
        );
        Ok(ParsedFile {
            text: body.text,
            filename: body.filename,
        })
    }

    async fn extract_data(&self, text: &str) -> Result<ResumeDocument, CollaboratorError> {
        let response = self
            .client
            .post(format!("{}/api/extract", self.base_url))
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body: ExtractResponse = response.json().await?;
        if !body.success {
            return Err(CollaboratorError::Failed);
        }

        debug!("structured extraction succeeded");
        Ok(body.data)
    }
}
