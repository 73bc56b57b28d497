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

//! In-memory appliance used by unit tests

use std::collections::BTreeSet;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use super::{ApiError, ApiRequest, ApiResponse, Endpoint, Family, IseApi, Keys, Method};

const FAKE_BASE: &str = "https://ise.test:9060";

#[derive(Debug, Default)]
struct FakeState {
    objects: Vec<Value>,
    next_id: u32,
    page_size: Option<u32>,
    corrupted: BTreeSet<String>,
    failing_pages: BTreeSet<u32>,
    requests: Vec<(Method, String)>,
}

/// Serves one collection the way the appliance does
#[derive(Debug)]
pub(crate) struct FakeIse {
    endpoint: Endpoint,
    state: Mutex<FakeState>,
}

enum Target {
    Collection,
    Id(String),
    Name(String),
}

fn not_found() -> ApiError {
    ApiError::Status {
        status: 404,
        body: r#"{"ERSResponse":{"messages":[{"title":"Resource not found","type":"ERROR"}]}}"#
            .to_owned(),
    }
}

fn ok(status: u16, body: Value) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse {
        status,
        location: None,
        body,
    })
}

impl FakeIse {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        let mut state = FakeState::default();
        if endpoint.keys == Keys::Singleton {
            state.objects.push(json!({}));
        }
        Self {
            endpoint,
            state: Mutex::new(state),
        }
    }

    /// Force list pages to this size, whatever the client asks for
    pub(crate) fn with_page_size(self, size: u32) -> Self {
        self.state.lock().unwrap().page_size = Some(size);
        self
    }

    /// Store an object as if created out of band, returning its key
    pub(crate) fn insert(&self, object: Value) -> String {
        let mut state = self.state.lock().unwrap();
        self.store(&mut state, object)
    }

    pub(crate) fn get(&self, key: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        self.position(&state, key).map(|i| state.objects[i].clone())
    }

    pub(crate) fn remove(&self, key: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(i) = self.position(&state, key) {
            state.objects.remove(i);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.state.lock().unwrap().objects.len()
    }

    /// Make reads of this object answer an empty envelope
    pub(crate) fn corrupt(&self, key: &str) {
        self.state.lock().unwrap().corrupted.insert(key.to_owned());
    }

    pub(crate) fn fail_page(&self, page: u32) {
        self.state.lock().unwrap().failing_pages.insert(page);
    }

    /// Method and path of every request received so far
    pub(crate) fn requests(&self) -> Vec<(Method, String)> {
        self.state.lock().unwrap().requests.clone()
    }

    fn key_field(&self) -> &'static str {
        match self.endpoint.keys {
            Keys::NameOnly => "name",
            _ => "id",
        }
    }

    fn key_of<'v>(&self, object: &'v Value) -> Option<&'v str> {
        object.get(self.key_field()).and_then(Value::as_str)
    }

    fn position(&self, state: &FakeState, key: &str) -> Option<usize> {
        state
            .objects
            .iter()
            .position(|object| self.key_of(object) == Some(key))
    }

    fn store(&self, state: &mut FakeState, mut object: Value) -> String {
        if self.endpoint.keys == Keys::Singleton {
            state.objects = vec![object];
            return String::new();
        }
        if let (Keys::IdAndName { .. }, Some(fields)) = (self.endpoint.keys, object.as_object_mut()) {
            state.next_id += 1;
            let id = format!("{:08x}-0000-4000-8000-{:012x}", state.next_id, state.next_id);
            fields.insert("id".into(), json!(id));
            fields.insert(
                "link".into(),
                json!({
                    "rel": "self",
                    "href": format!("{FAKE_BASE}{}/{id}", self.endpoint.path),
                    "type": "application/json",
                }),
            );
        }
        let key = self.key_of(&object).unwrap_or_default().to_owned();
        state.objects.push(object);
        key
    }

    fn envelope(&self, object: Value) -> Value {
        match self.endpoint.family {
            Family::Ers { wrapper } => json!({ wrapper: object }),
            Family::OpenApi => json!({ "response": object }),
        }
    }

    fn unwrap_body(&self, body: Option<Value>) -> Value {
        let mut body = body.unwrap_or_default();
        match self.endpoint.family {
            Family::Ers { wrapper } => body.get_mut(wrapper).map(Value::take).unwrap_or_default(),
            Family::OpenApi => body,
        }
    }

    fn target(&self, path: &str) -> Option<Target> {
        let rest = path.strip_prefix(self.endpoint.path)?;
        let decode = |s: &str| urlencoding::decode(s).ok().map(|s| s.into_owned());
        if rest.is_empty() {
            return Some(Target::Collection);
        }
        let rest = rest.strip_prefix('/')?;
        match (self.endpoint.family, self.endpoint.keys) {
            (Family::Ers { .. }, _) if rest.starts_with("name/") => {
                decode(&rest["name/".len()..]).map(Target::Name)
            }
            (_, Keys::NameOnly) => decode(rest).map(Target::Name),
            _ => decode(rest).map(Target::Id),
        }
    }

    fn find(&self, state: &FakeState, target: &Target) -> Option<usize> {
        match target {
            Target::Collection => None,
            Target::Id(id) => state
                .objects
                .iter()
                .position(|object| object.get("id").and_then(Value::as_str) == Some(id)),
            Target::Name(name) => state
                .objects
                .iter()
                .position(|object| object.get("name").and_then(Value::as_str) == Some(name)),
        }
    }

    fn list(&self, state: &FakeState, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        if self.endpoint.family == Family::OpenApi {
            return ok(200, json!({ "response": state.objects }));
        }

        let param = |name: &str| {
            request
                .query
                .iter()
                .find(|(key, _)| key == name)
                .and_then(|(_, value)| value.parse::<u32>().ok())
        };
        let page = param("page").unwrap_or(1).max(1);
        let size = state.page_size.or(param("size")).unwrap_or(20).max(1);
        if state.failing_pages.contains(&page) {
            return Err(ApiError::Status {
                status: 500,
                body: String::new(),
            });
        }

        let start = ((page - 1) * size) as usize;
        let resources: Vec<Value> = state
            .objects
            .iter()
            .skip(start)
            .take(size as usize)
            .map(|object| {
                json!({
                    "id": object.get("id"),
                    "name": object.get("name"),
                    "description": object.get("description"),
                    "link": object.get("link"),
                })
            })
            .collect();

        let mut result = Map::new();
        result.insert("total".into(), json!(state.objects.len()));
        result.insert("resources".into(), Value::Array(resources));
        if start + (size as usize) < state.objects.len() {
            result.insert(
                "nextPage".into(),
                json!({
                    "rel": "next",
                    "href": format!("{FAKE_BASE}{}?size={size}&page={}", self.endpoint.path, page + 1),
                    "type": "application/json",
                }),
            );
        }
        ok(200, json!({ "SearchResult": result }))
    }
}

fn merge(object: &mut Value, update: Value) {
    if let (Some(fields), Value::Object(update)) = (object.as_object_mut(), update) {
        for (key, value) in update {
            match (key.as_str(), value) {
                ("id" | "link", _) => {}
                (_, Value::Null) => {
                    fields.remove(&key);
                }
                (_, value) => {
                    fields.insert(key, value);
                }
            }
        }
    }
}

#[async_trait]
impl IseApi for FakeIse {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push((request.method, request.path.clone()));

        let target = self.target(&request.path).ok_or_else(not_found)?;

        match (request.method, &target) {
            (Method::Get, Target::Collection) if self.endpoint.keys == Keys::Singleton => {
                let object = state.objects[0].clone();
                ok(200, self.envelope(object))
            }
            (Method::Get, Target::Collection) => self.list(&state, &request),
            (Method::Get, target) => {
                let i = self.find(&state, target).ok_or_else(not_found)?;
                let object = state.objects[i].clone();
                let key = self.key_of(&object).unwrap_or_default();
                if state.corrupted.contains(key) {
                    return ok(200, self.envelope(Value::Null));
                }
                ok(200, self.envelope(object))
            }
            (Method::Post, Target::Collection) => {
                let object = self.unwrap_body(request.body);
                let name = object.get("name").cloned();
                if name.is_some()
                    && state
                        .objects
                        .iter()
                        .any(|existing| existing.get("name") == name.as_ref())
                {
                    return Err(ApiError::Status {
                        status: 400,
                        body: "duplicate name".to_owned(),
                    });
                }
                let key = self.store(&mut state, object);
                match self.endpoint.family {
                    Family::Ers { .. } => Ok(ApiResponse {
                        status: 201,
                        location: Some(format!("{FAKE_BASE}{}/{key}", self.endpoint.path)),
                        body: Value::Null,
                    }),
                    Family::OpenApi => ok(200, json!({ "success": { "message": "created" } })),
                }
            }
            (Method::Put, Target::Collection) if self.endpoint.keys == Keys::Singleton => {
                let update = self.unwrap_body(request.body);
                merge(&mut state.objects[0], update);
                ok(200, json!({ "response": state.objects[0] }))
            }
            (Method::Put, target) => {
                let i = self.find(&state, target).ok_or_else(not_found)?;
                let update = self.unwrap_body(request.body);
                merge(&mut state.objects[i], update);
                ok(200, json!({ "UpdatedFieldsList": {} }))
            }
            (Method::Delete, target) => {
                let i = self.find(&state, target).ok_or_else(not_found)?;
                state.objects.remove(i);
                ok(204, Value::Null)
            }
            _ => Err(ApiError::Status {
                status: 405,
                body: String::new(),
            }),
        }
    }
}
