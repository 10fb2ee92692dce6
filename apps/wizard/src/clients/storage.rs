//! HTTP client for the managed storage collaborator (Supabase-style REST).
//!
//! Inserts are invoked from the best-effort persistence task only; listing
//! backs the dashboard's "my resumes" view. Authentication with the storage
//! service uses a service key; end-user auth is the storage provider's
//! concern, not ours.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use uuid::Uuid;

use crate::clients::{
    error_from_response, CollaboratorError, NewResumeRecord, ResumeStore, StoredResume,
};

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(15);

#[derive(Clone)]
pub struct StorageClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl StorageClient {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into(),
            service_key: service_key.into(),
        }
    }

    fn resumes_url(&self) -> String {
        format!("{}/rest/v1/resumes", self.base_url)
    }
}

#[async_trait]
impl ResumeStore for StorageClient {
    async fn insert_resume(&self, record: &NewResumeRecord) -> Result<(), CollaboratorError> {
        let response = self
            .client
            .post(self.resumes_url())
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        debug!("persisted resume record for user {}", record.user_id);
        Ok(())
    }

    async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<StoredResume>, CollaboratorError> {
        let response = self
            .client
            .get(self.resumes_url())
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("select", "id,title,template_id,created_at".to_string()),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response.json().await?)
    }
}
