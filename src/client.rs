//! Client side of the days API.

use crate::calendar::date_key;
use crate::export::ExportFormat;
use crate::models::{DaysResponse, ToggleResponse};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Backend the calendar controller talks to.
#[async_trait]
pub trait DaysApi: Send + Sync {
    /// Full snapshot of completed days.
    async fn completed_days(&self) -> Result<DaysResponse, ClientError>;

    /// Flips completion for `date`; the response carries the new state.
    async fn toggle_day(&self, date: NaiveDate) -> Result<ToggleResponse, ClientError>;
}

#[async_trait]
impl<T: DaysApi + ?Sized> DaysApi for Arc<T> {
    async fn completed_days(&self) -> Result<DaysResponse, ClientError> {
        (**self).completed_days().await
    }

    async fn toggle_day(&self, date: NaiveDate) -> Result<ToggleResponse, ClientError> {
        (**self).toggle_day(date).await
    }
}

#[derive(Debug, Clone)]
pub struct HttpDaysApi {
    base_url: String,
    client: Client,
}

impl HttpDaysApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn export_url(&self, format: ExportFormat) -> String {
        format!("{}{}", self.base_url, format.path())
    }

    pub async fn export(&self, format: ExportFormat) -> Result<Vec<u8>, ClientError> {
        let url = self.export_url(format);
        let response = self.send(self.client.get(&url), &url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Decode { url, source })?;
        Ok(bytes.to_vec())
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, ClientError> {
        let response = request.send().await.map_err(|source| ClientError::Request {
            url: url.to_string(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        url: String,
    ) -> Result<T, ClientError> {
        response
            .json()
            .await
            .map_err(|source| ClientError::Decode { url, source })
    }
}

#[async_trait]
impl DaysApi for HttpDaysApi {
    async fn completed_days(&self) -> Result<DaysResponse, ClientError> {
        let url = format!("{}/api/days", self.base_url);
        let response = self.send(self.client.get(&url), &url).await?;
        Self::decode(response, url).await
    }

    async fn toggle_day(&self, date: NaiveDate) -> Result<ToggleResponse, ClientError> {
        let url = format!("{}/api/days/{}", self.base_url, date_key(date));
        let response = self.send(self.client.post(&url), &url).await?;
        Self::decode(response, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let api = HttpDaysApi::new("http://127.0.0.1:8080/");
        assert_eq!(api.base_url(), "http://127.0.0.1:8080");
        assert_eq!(
            api.export_url(ExportFormat::Csv),
            "http://127.0.0.1:8080/api/export/csv"
        );
    }
}
