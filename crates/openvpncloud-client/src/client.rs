//! OpenVPN Cloud API client
//!
//! Direct REST implementation. Authenticates once with the OAuth client
//! credentials grant and sends the resulting access token as a Bearer token
//! on every request.

use crate::error::{ClientError, Result};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

pub const BASE_URL_ENV_VAR: &str = "OPENVPN_CLOUD_BASE_URL";
pub const CLIENT_ID_ENV_VAR: &str = "OPENVPN_CLOUD_CLIENT_ID";
pub const CLIENT_SECRET_ENV_VAR: &str = "OPENVPN_CLOUD_CLIENT_SECRET";

const API_PREFIX: &str = "/api/beta";
const PAGE_SIZE: u32 = 10;

/// Connection settings for [`Client`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// e.g. `https://myorg.api.openvpn.com`
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl ClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Create ClientConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_ENV_VAR)
            .map_err(|_| ClientError::MissingEnvVar(BASE_URL_ENV_VAR.to_string()))?;
        let client_id = std::env::var(CLIENT_ID_ENV_VAR)
            .map_err(|_| ClientError::MissingEnvVar(CLIENT_ID_ENV_VAR.to_string()))?;
        let client_secret = std::env::var(CLIENT_SECRET_ENV_VAR)
            .map_err(|_| ClientError::MissingEnvVar(CLIENT_SECRET_ENV_VAR.to_string()))?;

        Ok(Self {
            base_url,
            client_id,
            client_secret,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ClientError::InvalidConfig("base_url must not be empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::InvalidConfig(format!(
                "base_url must be an http(s) URL, got {}",
                self.base_url
            )));
        }
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(ClientError::InvalidConfig(
                "client_id and client_secret are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Authenticated OpenVPN Cloud client
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl Client {
    /// Validate the configuration and exchange the credentials for a token
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::new();
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let token = fetch_token(&http, &base_url, &config).await?;

        tracing::debug!("Authenticated against {}", base_url);
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Client using an already issued access token
    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
        let request = builder.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        tracing::debug!("{} {}", method, request.url());

        let response = self.http.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::debug!("{} {} failed with {}: {}", method, path, status, message);
        match status {
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(path)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ClientError::AuthenticationFailed(message))
            }
            _ => Err(ClientError::Api {
                status: status.as_u16(),
                message,
            }),
        }
    }

    /// Send and decode a JSON response body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.execute(builder).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send and return the raw response body
    pub(crate) async fn send_text(&self, builder: RequestBuilder) -> Result<String> {
        let response = self.execute(builder).await?;
        Ok(response.text().await?)
    }

    /// Send and ignore the response body
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.execute(builder).await?;
        Ok(())
    }

    /// Collect every item of a paged listing (`{path}/page?page=N&size=S`)
    pub(crate) async fn get_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let page_path = format!("{}/page", path);
        let mut items = Vec::new();
        let mut page = 0u32;

        loop {
            let builder = self
                .request(Method::GET, &page_path)
                .query(&[("page", page), ("size", PAGE_SIZE)])
                .query(query);
            let current: Page<T> = self.send_json(builder).await?;
            items.extend(current.content);

            page += 1;
            if page >= current.total_pages {
                break;
            }
        }

        Ok(items)
    }
}

/// One page of a paged listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Deserialize)]
struct Token {
    access_token: String,
}

async fn fetch_token(http: &reqwest::Client, base_url: &str, config: &ClientConfig) -> Result<String> {
    let url = format!("{}{}/oauth/token", base_url, API_PREFIX);
    tracing::debug!("Requesting access token from {}", url);

    let response = http
        .post(&url)
        .query(&[("grant_type", "client_credentials")])
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ClientError::AuthenticationFailed(format!(
            "token request returned {}: {}",
            status, body
        )));
    }

    let token: Token = serde_json::from_str(&body)?;
    if token.access_token.is_empty() {
        return Err(ClientError::AuthenticationFailed(
            "token response did not contain an access token".to_string(),
        ));
    }
    Ok(token.access_token)
}
