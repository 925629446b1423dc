//! HTTP implementation of [`PrometheusApi`] on top of `reqwest`.

pub mod models;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Certificate, Identity, RequestBuilder, Response};
use std::path::Path;
use tracing::debug;

use crate::config::ConnectionConfig;
use crate::core::constants::endpoints;
use crate::core::errors::{ClientError, ConfigError, ProbeResult};
use crate::core::traits::PrometheusApi;
use crate::evaluation::health::{BuildInfo, HealthResponse, Probe};
use crate::evaluation::rules::AlertRule;
use crate::evaluation::samples::QueryResponse;

#[derive(Debug, Clone)]
enum Auth {
    None,
    Bearer(String),
    Basic { user: String, password: String },
}

#[derive(Debug, Clone)]
pub struct PrometheusClient {
    http: reqwest::Client,
    base_url: String,
    auth: Auth,
}

impl PrometheusClient {
    /// Build a client from validated connection settings.
    pub fn from_config(config: &ConnectionConfig) -> ProbeResult<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.insecure)
            .default_headers(header_map(config)?);

        if let Some(ca_file) = &config.ca_file {
            let pem = read_pem(ca_file)?;
            let cert = Certificate::from_pem(&pem).map_err(|e| tls_error(ca_file, e))?;
            builder = builder.add_root_certificate(cert);
        }

        if let (Some(cert_file), Some(key_file)) = (&config.cert_file, &config.key_file) {
            let mut pem = read_pem(cert_file)?;
            pem.push(b'\n');
            pem.extend(read_pem(key_file)?);
            let identity = Identity::from_pem(&pem).map_err(|e| tls_error(cert_file, e))?;
            builder = builder.identity(identity);
        }

        let auth = match (&config.bearer, config.basic_credentials()?) {
            (Some(token), _) => Auth::Bearer(token.clone()),
            (None, Some((user, password))) => Auth::Basic { user, password },
            (None, None) => Auth::None,
        };

        let http = builder.build().map_err(ClientError::Build)?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Auth::None => request,
            Auth::Bearer(token) => request.bearer_auth(token),
            Auth::Basic { user, password } => request.basic_auth(user, Some(password)),
        }
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Response, ClientError> {
        debug!(%url, "sending request");
        Ok(self.authorize(request).send().await?)
    }

    /// Read an API response body. Error envelopes are decoded regardless of
    /// the status code; anything else on a non-2xx status is reported raw.
    async fn api_body<T>(
        &self,
        response: Response,
        url: &str,
        decode: impl FnOnce(&[u8]) -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.bytes().await?;
        match decode(&body) {
            Err(ClientError::Decode { .. }) if !status.is_success() => {
                Err(ClientError::UnexpectedStatus {
                    url: url.to_string(),
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&body).trim().to_string(),
                })
            }
            other => other,
        }
    }
}

#[async_trait]
impl PrometheusApi for PrometheusClient {
    async fn rules(&self) -> ProbeResult<Vec<AlertRule>> {
        let url = self.url(endpoints::RULES);
        let response = self.send(self.http.get(&url), &url).await?;
        Ok(self.api_body(response, &url, models::decode_rules).await?)
    }

    async fn query(&self, query: &str, at: DateTime<Utc>) -> ProbeResult<QueryResponse> {
        let url = self.url(endpoints::QUERY);
        let time = at.to_rfc3339_opts(SecondsFormat::Millis, true);
        let request = self
            .http
            .post(&url)
            .form(&[("query", query), ("time", time.as_str())]);
        let response = self.send(request, &url).await?;
        Ok(self.api_body(response, &url, models::decode_query).await?)
    }

    async fn probe(&self, probe: Probe) -> ProbeResult<HealthResponse> {
        let url = self.url(probe.endpoint());
        let response = self.send(self.http.get(&url), &url).await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(ClientError::from)?;
        Ok(HealthResponse { status, body })
    }

    async fn build_info(&self) -> ProbeResult<BuildInfo> {
        let url = self.url(endpoints::BUILD_INFO);
        let response = self.send(self.http.get(&url), &url).await?;
        Ok(self.api_body(response, &url, models::decode_build_info).await?)
    }
}

fn header_map(config: &ConnectionConfig) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    for (raw, (name, value)) in config.headers.iter().zip(config.parsed_headers()?) {
        let invalid = || ConfigError::InvalidHeader {
            header: raw.clone(),
        };
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let value = HeaderValue::from_str(&value).map_err(|_| invalid())?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn read_pem(path: &Path) -> Result<Vec<u8>, ConfigError> {
    std::fs::read(path).map_err(|e| ConfigError::Tls {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn tls_error(path: &Path, err: reqwest::Error) -> ConfigError {
    ConfigError::Tls {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
