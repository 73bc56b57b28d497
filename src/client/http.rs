// This file is part of the terraform-provider-ise project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE, LOCATION};
use serde_json::Value;
use tokio::sync::Mutex;
use url::Url;

use super::{ApiError, ApiRequest, ApiResponse, IseApi, Method, Service};

const CSRF_HEADER: &str = "X-CSRF-Token";
const ERS_PORT: u16 = 9060;
const MASK: &str = "******";

/// Resolved connection settings
#[derive(Clone)]
pub struct ClientSettings {
    pub base_url: Url,
    pub username: String,
    pub password: String,
    pub debug: bool,
    pub ssl_verify: bool,
    pub use_api_gateway: bool,
    pub use_csrf_token: bool,
    pub timeout: Duration,
}

impl std::fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSettings")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("password", &MASK)
            .field("debug", &self.debug)
            .field("ssl_verify", &self.ssl_verify)
            .field("use_api_gateway", &self.use_api_gateway)
            .field("use_csrf_token", &self.use_csrf_token)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientSettings {
    /// Base URL of the ERS API: the gateway forwards it, otherwise it listens on its own port
    pub fn ers_base(&self) -> Url {
        let mut url = self.base_url.clone();
        if !self.use_api_gateway {
            // Only fails for cannot-be-a-base urls, which `base_url` validation rejects
            let _ = url.set_port(Some(ERS_PORT));
        }
        url
    }

    fn base_for(&self, service: Service) -> Url {
        match service {
            Service::Ers => self.ers_base(),
            Service::OpenApi => self.base_url.clone(),
        }
    }
}

/// `reqwest` implementation of [`IseApi`]
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    settings: ClientSettings,
    csrf_token: Mutex<Option<HeaderValue>>,
}

impl HttpClient {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("terraform-provider-ise/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!settings.ssl_verify)
            .timeout(settings.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            settings,
            csrf_token: Mutex::new(None),
        })
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let base = self.settings.base_for(request.service);
        let mut url = Url::parse(&format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            request.path.trim_start_matches('/')
        ))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }

    /// Fetch the CSRF token once and reuse it for every mutating call
    async fn csrf_token(&self) -> Result<HeaderValue, ApiError> {
        let mut token = self.csrf_token.lock().await;
        if let Some(token) = token.as_ref() {
            return Ok(token.clone());
        }

        let url = self.url_for(&ApiRequest::new(
            Method::Get,
            Service::Ers,
            "/ers/config/op/systemconfig/iseversion",
        ))?;
        let response = self
            .client
            .get(url)
            .basic_auth(&self.settings.username, Some(&self.settings.password))
            .header(ACCEPT, "application/json")
            .header(CSRF_HEADER, "fetch")
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        let fetched = response
            .headers()
            .get(CSRF_HEADER)
            .cloned()
            .ok_or_else(|| ApiError::Transport("server did not return a CSRF token".into()))?;
        *token = Some(fetched.clone());
        Ok(fetched)
    }
}

#[async_trait]
impl IseApi for HttpClient {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url_for(&request)?;
        tracing::debug!(method = %request.method, %url, "sending request");
        if self.settings.debug {
            if let Some(body) = &request.body {
                tracing::debug!(body = %sanitize_for_log(body), "request body");
            }
        }

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, url)
            .basic_auth(&self.settings.username, Some(&self.settings.password))
            .header(ACCEPT, "application/json");
        if self.settings.use_csrf_token && request.method.is_mutating() {
            builder = builder.header(CSRF_HEADER, self.csrf_token().await?);
        }
        if let Some(body) = &request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let text = response
            .text()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };
        if self.settings.debug {
            tracing::debug!(status = status.as_u16(), body = %sanitize_for_log(&body), "response");
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            location,
            body,
        })
    }
}

/// Render a JSON body for logs with every password-like field masked
fn sanitize_for_log(body: &Value) -> String {
    fn mask(value: &mut Value) {
        match value {
            Value::Object(fields) => {
                for (key, field) in fields.iter_mut() {
                    if key.to_ascii_lowercase().contains("password") {
                        *field = Value::String(MASK.to_owned());
                    } else {
                        mask(field);
                    }
                }
            }
            Value::Array(items) => items.iter_mut().for_each(mask),
            _ => {}
        }
    }

    let mut body = body.clone();
    mask(&mut body);
    body.to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn settings(base: &str, use_api_gateway: bool) -> ClientSettings {
        ClientSettings {
            base_url: Url::parse(base).unwrap(),
            username: "admin".into(),
            password: "secret".into(),
            debug: false,
            ssl_verify: true,
            use_api_gateway,
            use_csrf_token: false,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn ers_goes_through_its_own_port_without_gateway() {
        let settings = settings("https://ise.example.com", false);
        assert_eq!(settings.ers_base().as_str(), "https://ise.example.com:9060/");
        assert_eq!(
            settings.base_for(Service::OpenApi).as_str(),
            "https://ise.example.com/"
        );

        let settings = ClientSettings {
            use_api_gateway: true,
            ..settings
        };
        assert_eq!(settings.ers_base().as_str(), "https://ise.example.com/");
    }

    #[test]
    fn url_carries_path_and_query() {
        let client = HttpClient::new(settings("https://ise.example.com/", true)).unwrap();
        let request = ApiRequest::new(Method::Get, Service::Ers, "/ers/config/sgt")
            .query("page", 2)
            .query("filter", "name.EQ.guests");
        let url = client.url_for(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://ise.example.com/ers/config/sgt?page=2&filter=name.EQ.guests"
        );
    }

    #[test]
    fn passwords_are_masked_in_logs() {
        let body = json!({
            "InternalUser": {
                "name": "alice",
                "password": "hunter2",
                "enablePassword": "hunter3",
                "nested": [{"password": "x"}]
            }
        });
        let logged = sanitize_for_log(&body);
        assert!(!logged.contains("hunter2"));
        assert!(!logged.contains("hunter3"));
        assert!(logged.contains("alice"));
        assert!(!logged.contains("\"x\""));
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", settings("https://ise.example.com", false));
        assert!(!rendered.contains("secret"));
    }
}
