//! HTTP client for the builder API's DOCX generation endpoint.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::clients::{error_from_response, CollaboratorError, Generator};
use crate::models::resume::ResumeDocument;

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

#[derive(Clone)]
pub struct GenerationClient {
    client: Client,
    base_url: String,
}

impl GenerationClient {
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

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    template_id: &'a str,
    resume_data: &'a ResumeDocument,
}

#[async_trait]
impl Generator for GenerationClient {
    async fn generate(
        &self,
        template_id: &str,
        resume: &ResumeDocument,
    ) -> Result<Bytes, CollaboratorError> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&GenerateRequest {
                template_id,
                resume_data: resume,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let content = response.bytes().await?;
        debug!("generation succeeded: {} bytes", content.len());
        Ok(content)
    }
}
