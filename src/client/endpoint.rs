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

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};

use crate::lookup::{Identity, LookupStrategy};

use super::pagination::{walk, Page, PageRequest, Walk};
use super::{ApiError, ApiRequest, IseApi, Method, Service, Summary};

/// API family an object belongs to, which fixes its envelope format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Bodies are wrapped as `{ "<wrapper>": {...} }`, lists as `SearchResult`
    Ers { wrapper: &'static str },
    /// Responses are wrapped as `{ "response": ... }`
    OpenApi,
}

/// Natural keys under which the API exposes an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keys {
    /// Addressed by id; `by_name` tells whether a get-by-name endpoint exists
    IdAndName { by_name: bool },
    /// Addressed by name only
    NameOnly,
    /// A settings object that always exists
    Singleton,
}

/// Static description of an API collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub family: Family,
    pub keys: Keys,
}

/// Optional arguments of a list call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sortasc: Option<String>,
    pub sortdsc: Option<String>,
    pub filter: Vec<String>,
    pub filter_type: Option<String>,
}

impl ListQuery {
    /// Which list arguments were supplied, in declaration order
    pub fn presence(&self) -> [bool; 6] {
        [
            self.page.is_some(),
            self.size.is_some(),
            self.sortasc.is_some(),
            self.sortdsc.is_some(),
            !self.filter.is_empty(),
            self.filter_type.is_some(),
        ]
    }

    pub fn first_page(&self) -> PageRequest {
        let default = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(default.page),
            size: self.size.unwrap_or(default.size),
        }
    }

    fn apply(&self, page: PageRequest, mut request: ApiRequest) -> ApiRequest {
        request = request.query("page", page.page).query("size", page.size);
        if let Some(sortasc) = &self.sortasc {
            request = request.query("sortasc", sortasc);
        }
        if let Some(sortdsc) = &self.sortdsc {
            request = request.query("sortdsc", sortdsc);
        }
        for filter in &self.filter {
            request = request.query("filter", filter);
        }
        if let Some(filter_type) = &self.filter_type {
            request = request.query("filterType", filter_type);
        }
        request
    }
}

/// Result of a create call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Created {
    /// Id announced by the server, through `Location` or the body
    pub id: Option<String>,
}

/// Key used to address an existing object on update and delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteKey {
    Id(String),
    Name(String),
    Singleton,
}

impl Endpoint {
    fn service(&self) -> Service {
        match self.family {
            Family::Ers { .. } => Service::Ers,
            Family::OpenApi => Service::OpenApi,
        }
    }

    fn request(&self, method: Method, path: impl Into<String>) -> ApiRequest {
        ApiRequest::new(method, self.service(), path)
    }

    fn id_path(&self, id: &str) -> String {
        format!("{}/{}", self.path, urlencoding::encode(id))
    }

    fn name_path(&self, name: &str) -> String {
        match self.family {
            Family::Ers { .. } => format!("{}/name/{}", self.path, urlencoding::encode(name)),
            Family::OpenApi => format!("{}/{}", self.path, urlencoding::encode(name)),
        }
    }

    fn key_path(&self, key: &RemoteKey) -> String {
        match key {
            RemoteKey::Id(id) => self.id_path(id),
            RemoteKey::Name(name) => self.name_path(name),
            RemoteKey::Singleton => self.path.to_owned(),
        }
    }

    fn unwrap<T: DeserializeOwned>(&self, mut body: Value) -> Result<T, ApiError> {
        let inner = match self.family {
            Family::Ers { wrapper } => body.get_mut(wrapper),
            Family::OpenApi => body.get_mut("response"),
        };
        match inner.map(Value::take) {
            None | Some(Value::Null) => Err(ApiError::EmptyResponse),
            Some(inner) => Ok(serde_json::from_value(inner)?),
        }
    }

    fn wrap<T: Serialize>(&self, body: &T) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body)?;
        Ok(match self.family {
            Family::Ers { wrapper } => json!({ wrapper: body }),
            Family::OpenApi => body,
        })
    }

    pub async fn get_by_id<T: DeserializeOwned>(
        &self,
        api: &dyn IseApi,
        id: &str,
    ) -> Result<T, ApiError> {
        let response = api.send(self.request(Method::Get, self.id_path(id))).await?;
        self.unwrap(response.body)
    }

    pub async fn get_by_name<T: DeserializeOwned>(
        &self,
        api: &dyn IseApi,
        name: &str,
    ) -> Result<T, ApiError> {
        let response = api
            .send(self.request(Method::Get, self.name_path(name)))
            .await?;
        self.unwrap(response.body)
    }

    pub async fn get_singleton<T: DeserializeOwned>(&self, api: &dyn IseApi) -> Result<T, ApiError> {
        let response = api.send(self.request(Method::Get, self.path)).await?;
        self.unwrap(response.body)
    }

    /// Fetch a single page of summaries
    pub async fn list_page(
        &self,
        api: &dyn IseApi,
        query: &ListQuery,
        page: PageRequest,
    ) -> Result<Page<Summary>, ApiError> {
        match self.family {
            Family::Ers { .. } => {
                let request = query.apply(page, self.request(Method::Get, self.path));
                let mut body = api.send(request).await?.body;
                let result = match body.get_mut("SearchResult") {
                    Some(result) if !result.is_null() => result.take(),
                    _ => return Err(ApiError::EmptyResponse),
                };
                let next = result
                    .pointer("/nextPage/href")
                    .and_then(Value::as_str)
                    .map(str::to_owned);
                let items = match result.get("resources") {
                    Some(resources) => serde_json::from_value(resources.clone())?,
                    None => Vec::new(),
                };
                Ok(Page { items, next })
            }
            Family::OpenApi => {
                let response = api.send(self.request(Method::Get, self.path)).await?;
                Ok(Page {
                    items: self.unwrap(response.body)?,
                    next: None,
                })
            }
        }
    }

    /// Walk every page starting at the one `query` points to
    pub async fn list_all(&self, api: &dyn IseApi, query: &ListQuery) -> Walk<Summary> {
        walk(query.first_page(), move |page| {
            self.list_page(api, query, page)
        })
        .await
    }

    /// Find an object in the full listing, then fetch its complete representation
    pub async fn search<T: DeserializeOwned>(
        &self,
        api: &dyn IseApi,
        identity: &Identity,
    ) -> Result<T, ApiError> {
        let walked = self.list_all(api, &ListQuery::default()).await;
        let found = walked.items.into_iter().find(|summary| {
            match (&identity.id, &identity.name) {
                (Some(id), _) => summary.id.as_ref() == Some(id),
                (None, Some(name)) => summary.name.as_ref() == Some(name),
                (None, None) => false,
            }
        });

        match found {
            Some(Summary { id: Some(id), .. }) => self.get_by_id(api, &id).await,
            Some(Summary { name: Some(name), .. }) => self.get_by_name(api, &name).await,
            Some(_) => Err(ApiError::EmptyResponse),
            None => Err(walked
                .interrupted
                .unwrap_or_else(|| ApiError::NotFound(identity.to_string()))),
        }
    }

    /// Fetch one object with the strategy picked by the method selector
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        api: &dyn IseApi,
        strategy: &LookupStrategy,
    ) -> Result<T, ApiError> {
        match strategy {
            LookupStrategy::Singleton => self.get_singleton(api).await,
            LookupStrategy::ById(id) => self.get_by_id(api, id).await,
            LookupStrategy::ByName(name) => match self.keys {
                Keys::IdAndName { by_name: false } => {
                    self.search(api, &Identity::by_name(name.clone())).await
                }
                _ => self.get_by_name(api, name).await,
            },
            LookupStrategy::List(_) => Err(ApiError::NotFound("object without id or name".into())),
        }
    }

    /// Resolve the key update and delete calls must use.
    ///
    /// Id-keyed objects known only by name need one lookup to learn their id.
    pub async fn resolve_key(
        &self,
        api: &dyn IseApi,
        identity: &Identity,
    ) -> Result<RemoteKey, ApiError> {
        match (self.keys, &identity.id, &identity.name) {
            (Keys::Singleton, _, _) => Ok(RemoteKey::Singleton),
            (Keys::NameOnly, _, Some(name)) => Ok(RemoteKey::Name(name.clone())),
            (Keys::IdAndName { .. }, Some(id), _) => Ok(RemoteKey::Id(id.clone())),
            (Keys::IdAndName { .. }, None, Some(name)) => {
                let found: Summary = self
                    .fetch(api, &LookupStrategy::ByName(name.clone()))
                    .await?;
                found.id.map(RemoteKey::Id).ok_or(ApiError::EmptyResponse)
            }
            _ => Err(ApiError::NotFound(identity.to_string())),
        }
    }

    pub async fn create<T: Serialize>(&self, api: &dyn IseApi, body: &T) -> Result<Created, ApiError> {
        let request = self.request(Method::Post, self.path).body(self.wrap(body)?);
        let response = api.send(request).await?;

        let from_location = response.location.as_deref().and_then(|location| {
            let last = location.trim_end_matches('/').rsplit('/').next()?;
            let last = last.split('?').next()?;
            urlencoding::decode(last).ok().map(|id| id.into_owned())
        });
        let from_body = ["/id", "/response/id"]
            .iter()
            .find_map(|pointer| response.body.pointer(pointer)?.as_str())
            .map(str::to_owned);

        Ok(Created {
            id: from_location.or(from_body).filter(|id| !id.is_empty()),
        })
    }

    pub async fn update<T: Serialize>(
        &self,
        api: &dyn IseApi,
        key: &RemoteKey,
        body: &T,
    ) -> Result<(), ApiError> {
        let request = self
            .request(Method::Put, self.key_path(key))
            .body(self.wrap(body)?);
        api.send(request).await?;
        Ok(())
    }

    pub async fn delete(&self, api: &dyn IseApi, key: &RemoteKey) -> Result<(), ApiError> {
        api.send(self.request(Method::Delete, self.key_path(key)))
            .await?;
        Ok(())
    }
}
