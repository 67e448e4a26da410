use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use shared::{
    domain::DraftStudent,
    protocol::{ListStudentsQuery, StudentPage, STUDENTS_PATH},
};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub mod controller;

pub use controller::{CollectionViewController, LoadOutcome, ViewSnapshot};

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("invalid API base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(StatusCode),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiClientError::Status(status) => Some(*status),
            ApiClientError::Transport(err) => err.status(),
            _ => None,
        }
    }
}

/// The remote student collection.
#[async_trait]
pub trait StudentApi: Send + Sync {
    /// Fetches one page of [`shared::protocol::PAGE_SIZE`] records. `page` is 1-based.
    async fn fetch_page(&self, page: u32) -> Result<StudentPage, ApiClientError>;
    async fn create_student(&self, draft: &DraftStudent) -> Result<(), ApiClientError>;
}

pub struct HttpStudentApi {
    http: Client,
    students_url: Url,
}

impl HttpStudentApi {
    pub fn new(base_url: &str) -> Result<Self, ApiClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ApiClientError> {
        let mut base = Url::parse(base_url.trim())?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http,
            students_url: base.join(STUDENTS_PATH)?,
        })
    }

    pub fn students_url(&self) -> &Url {
        &self.students_url
    }
}

#[async_trait]
impl StudentApi for HttpStudentApi {
    async fn fetch_page(&self, page: u32) -> Result<StudentPage, ApiClientError> {
        let response = self
            .http
            .get(self.students_url.clone())
            .query(&ListStudentsQuery::page(page))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiClientError::Status(status));
        }

        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        debug!(page, body = %body, "students: list response");
        Ok(StudentPage::from_json(&body)?)
    }

    async fn create_student(&self, draft: &DraftStudent) -> Result<(), ApiClientError> {
        let status = self
            .http
            .post(self.students_url.clone())
            .json(draft)
            .send()
            .await?
            .status();

        if !status.is_success() {
            return Err(ApiClientError::Status(status));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
