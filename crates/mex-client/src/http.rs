use async_trait::async_trait;
use reqwest::{StatusCode, Url, header::ACCEPT};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use mex_model::{App, AppsResponse, MarathonInfo, Task, TasksResponse};

use crate::{api::MarathonApi, config::ClientConfig, endpoint::Endpoint, errors::ClientError};

const BODY_PREVIEW: usize = 256;

/// [`MarathonApi`] over HTTP+JSON.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    endpoint: Endpoint,
}

impl HttpClient {
    pub fn new(endpoint: Endpoint, config: &ClientConfig) -> Result<Self, ClientError> {
        if config.tls_insecure_skip_verify {
            warn!(endpoint = %endpoint, "TLS certificate verification is disabled for marathon");
        }

        let http = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.tls_insecure_skip_verify)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        let (username, password_len) = endpoint
            .credentials()
            .map(|c| (c.username.as_str(), c.password.chars().count()))
            .unwrap_or_default();
        debug!(endpoint = %endpoint, username, password_len, "marathon client configured");

        Ok(Self { http, endpoint })
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let mut request = self.http.get(url.clone()).header(ACCEPT, "application/json");
        if let Some(creds) = self.endpoint.credentials() {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request.send().await?;
        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(ClientError::Unauthorized {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            ClientError::Decode(format!("{url}: {e}, body: {}", preview(&body)))
        })
    }
}

#[async_trait]
impl MarathonApi for HttpClient {
    async fn info(&self) -> Result<MarathonInfo, ClientError> {
        self.get(self.endpoint.join("v2/info")?).await
    }

    async fn apps(&self) -> Result<Vec<App>, ClientError> {
        let mut url = self.endpoint.join("v2/apps")?;
        url.query_pairs_mut().append_pair("embed", "apps.tasks");

        let response: AppsResponse = self.get(url).await?;
        Ok(response.apps)
    }

    async fn tasks(&self, app_id: &str) -> Result<Vec<Task>, ClientError> {
        let url = self
            .endpoint
            .join(&format!("v2/apps/{}/tasks", app_id.trim_matches('/')))?;

        let response: TasksResponse = self.get(url).await?;
        Ok(response.tasks)
    }
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(BODY_PREVIEW) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
