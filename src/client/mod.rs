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

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::Diagnostics;
use tokio::sync::RwLock;

mod endpoint;
mod error;
mod http;
mod pagination;
#[cfg(test)]
pub(crate) mod testing;

pub use endpoint::{Created, Endpoint, Family, Keys, ListQuery, RemoteKey};
pub use error::ApiError;
pub use http::{ClientSettings, HttpClient};
pub use pagination::{next_page, walk, Page, PageRequest, Walk};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn is_mutating(self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// Which API of the appliance serves a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// External RESTful Services, `/ers/config/...`
    Ers,
    /// OpenAPI, `/api/v1/...`
    OpenApi,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub service: Service,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, service: Service, path: impl Into<String>) -> Self {
        Self {
            method,
            service,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub location: Option<String>,
    /// `Null` when the response had no body
    pub body: serde_json::Value,
}

/// Transport used by every object operation.
///
/// Implementations must return `ApiError::Status` for non-2xx responses.
#[async_trait]
pub trait IseApi: Send + Sync + Debug + 'static {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// `link` sub-object attached to every ERS object
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
}

/// Abbreviated projection returned by list endpoints
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

/// Client shared between the provider and all its resources.
///
/// The provider hands out clones before Terraform configures it, so the
/// client itself is installed later by `configure`.
#[derive(Debug, Default, Clone)]
pub struct ClientHandle {
    inner: Arc<RwLock<Option<Arc<dyn IseApi>>>>,
}

impl ClientHandle {
    pub fn with_client(client: Arc<dyn IseApi>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(client))),
        }
    }

    pub async fn install(&self, client: Arc<dyn IseApi>) {
        *self.inner.write().await = Some(client);
    }

    /// Return the configured client, or report that the provider was never configured
    pub async fn get(&self, diags: &mut Diagnostics) -> Option<Arc<dyn IseApi>> {
        let client = self.inner.read().await.clone();
        if client.is_none() {
            diags.root_error(
                "Provider not configured",
                "The ISE client is not available: the provider block has not been configured yet.",
            );
        }
        client
    }
}
