//! Remote table access
//!
//! All link persistence lives in one hosted collection (default
//! `link-hub`) exposed as PostgREST-style REST: select-all-ordered,
//! insert-one, update-by-id, delete-by-id. `RemoteTable` is the HTTP
//! implementation; `LinkBackend` is the seam the store depends on, so
//! tests can substitute an in-memory table.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::json;
use thiserror::Error;

use crate::models::{Category, Link, ValidLink};

/// Request timeout in seconds
const REQUEST_TIMEOUT: u64 = 10;

/// Errors from remote table calls
///
/// No retry policy: one call per operation, failures surface directly.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Table returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// The four operations the store consumes from the remote table
#[async_trait]
pub trait LinkBackend: Send + Sync {
    /// All links, newest first
    async fn list(&self) -> Result<Vec<Link>, TableError>;

    /// Insert one record; the server assigns id and created_at
    async fn insert(&self, link: &ValidLink) -> Result<(), TableError>;

    /// Full-field overwrite of an existing record
    async fn update(&self, id: i64, link: &ValidLink) -> Result<(), TableError>;

    /// Change only the category of an existing record
    async fn set_category(&self, id: i64, category: Category) -> Result<(), TableError>;

    /// Remove a record by id
    async fn delete(&self, id: i64) -> Result<(), TableError>;
}

/// HTTP client for the hosted table
///
/// Constructed once and injected into the store; never a module-level
/// singleton.
pub struct RemoteTable {
    client: Client,
    base_url: String,
    table: String,
    api_key: String,
}

impl RemoteTable {
    /// Create a client for the table service at `base_url`
    pub fn new(
        base_url: impl Into<String>,
        table: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, TableError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT))
            .build()?;

        let base_url = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            table: table.into(),
            api_key: api_key.into(),
        })
    }

    /// URL of the collection's REST endpoint
    fn rows_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    /// Start a request with the backend credential headers applied
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, url);
        if !self.api_key.is_empty() {
            builder = builder
                .header("apikey", &self.api_key)
                .header("Authorization", format!("Bearer {}", self.api_key));
        }
        builder
    }

    /// Map non-success statuses to `TableError::Api` with the body captured
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, TableError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::error!(status = status.as_u16(), message = %message, "Table request failed");
        Err(TableError::Api {
            status: status.as_u16(),
            message,
        })
    }

    fn row_body(link: &ValidLink) -> serde_json::Value {
        json!({
            "name": link.name,
            "description": link.description,
            "link": link.url,
            "category": link.category,
        })
    }
}

#[async_trait]
impl LinkBackend for RemoteTable {
    async fn list(&self) -> Result<Vec<Link>, TableError> {
        let response = self
            .request(Method::GET, &self.rows_url())
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;

        let links = Self::check(response).await?.json::<Vec<Link>>().await?;
        Ok(links)
    }

    async fn insert(&self, link: &ValidLink) -> Result<(), TableError> {
        let response = self
            .request(Method::POST, &self.rows_url())
            .header("Prefer", "return=minimal")
            .json(&json!([Self::row_body(link)]))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn update(&self, id: i64, link: &ValidLink) -> Result<(), TableError> {
        let response = self
            .request(Method::PATCH, &self.rows_url())
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(&Self::row_body(link))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn set_category(&self, id: i64, category: Category) -> Result<(), TableError> {
        let response = self
            .request(Method::PATCH, &self.rows_url())
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(&json!({ "category": category }))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), TableError> {
        let response = self
            .request(Method::DELETE, &self.rows_url())
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}
