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

use std::borrow::Cow;
use std::marker::PhantomData;

use async_trait::async_trait;
use time::OffsetDateTime;

use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{schema::Schema, AttributePath, DataSource, Diagnostics};

use crate::client::{IseApi, Summary};
use crate::composite_id::CompositeId;
use crate::lookup::LookupStrategy;
use crate::utils::{list_of_one, report_api_error, string_value, WithSchema, WithValidate};

use super::state::DataSourceState;
use super::{flatten_summaries, IseObject};

#[derive(Debug, Default)]
pub struct IseDataSource<T: IseObject> {
    pub(super) client: crate::client::ClientHandle,
    object: PhantomData<T>,
}

impl<T: IseObject> IseDataSource<T> {
    pub fn new(client: crate::client::ClientHandle) -> Self {
        Self {
            client,
            object: PhantomData,
        }
    }

    async fn read_one<'a>(
        &self,
        diags: &mut Diagnostics,
        api: &dyn IseApi,
        strategy: &LookupStrategy,
        mut state: DataSourceState<'a, T>,
    ) -> Option<DataSourceState<'a, T>> {
        let fetched = match T::ENDPOINT.fetch::<T::Api>(api, strategy).await {
            Ok(fetched) => fetched,
            Err(err) => {
                report_api_error(diags, format!("Failure when executing Get {}", T::KIND), &err);
                return None;
            }
        };

        if let LookupStrategy::Singleton = strategy {
            state.id = Value::Value(Cow::Owned(
                CompositeId::new().with("settings", T::KIND).encode(),
            ));
        } else {
            let identity = T::api_identity(&fetched).or(state.identity());
            state.id = string_value(identity.id.as_deref());
            state.name = string_value(identity.name.as_deref());
        }
        state.item = list_of_one(T::flatten(Some(&fetched)));
        state.items = Value::Null;
        Some(state)
    }

    async fn read_list<'a>(
        &self,
        diags: &mut Diagnostics,
        api: &dyn IseApi,
        mut state: DataSourceState<'a, T>,
    ) -> Option<DataSourceState<'a, T>> {
        let query = state.query();

        let summaries: Vec<Summary> = if query.page.is_some() {
            // An explicit page only returns that page
            match T::ENDPOINT.list_page(api, &query, query.first_page()).await {
                Ok(page) => page.items,
                Err(err) => {
                    report_api_error(diags, format!("Failure when executing Get {}s", T::KIND), &err);
                    return None;
                }
            }
        } else {
            let walked = T::ENDPOINT.list_all(api, &query).await;
            if let Some(err) = walked.interrupted {
                tracing::warn!(kind = T::KIND, error = %err, fetched = walked.items.len(), "listing interrupted");
                diags.warning(
                    format!("Incomplete list of {}", T::KIND),
                    format!(
                        "Listing stopped after {} objects: {err}",
                        walked.items.len()
                    ),
                    AttributePath::new("items"),
                );
            }
            walked.items
        };

        tracing::debug!(kind = T::KIND, count = summaries.len(), "objects listed");
        state.id = Value::Value(Cow::Owned(
            OffsetDateTime::now_utc().unix_timestamp().to_string(),
        ));
        state.items = flatten_summaries(Some(&summaries)).map_or(Value::Null, Value::Value);
        state.item = Value::Null;
        Some(state)
    }
}

#[async_trait]
impl<T: IseObject> DataSource for IseDataSource<T> {
    type State<'a> = DataSourceState<'a, T>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(DataSourceState::<T>::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        config.validate(diags, AttributePath::default());

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let api = self.client.get(diags).await?;
        let strategy = LookupStrategy::select(T::ENDPOINT.keys, &config.identity(), config.query());
        tracing::debug!(kind = T::KIND, ?strategy, "reading data source");

        match strategy {
            LookupStrategy::List(_) => self.read_list(diags, api.as_ref(), config).await,
            strategy => self.read_one(diags, api.as_ref(), &strategy, config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::client::testing::FakeIse;
    use crate::client::ClientHandle;
    use crate::objects::{ProxyConnectionSettings, Repository, Sgt};
    use crate::utils::single;

    use super::*;

    fn data_source<T: IseObject>(fake: &Arc<FakeIse>) -> IseDataSource<T> {
        IseDataSource::new(ClientHandle::with_client(fake.clone()))
    }

    #[tokio::test]
    async fn reads_by_id_then_by_name() {
        let fake = Arc::new(FakeIse::new(Sgt::ENDPOINT));
        fake.insert(json!({"name": "Guests", "value": 6}));
        let id = fake.insert(json!({"name": "Employees", "value": 4}));
        let sgt = data_source::<Sgt>(&fake);
        let mut diags = Diagnostics::default();

        let config = DataSourceState {
            id: Value::Value(Cow::Owned(id.clone())),
            ..Default::default()
        };
        let state = sgt.read(&mut diags, config, Default::default()).await.unwrap();
        assert_eq!(state.name.as_str(), "Employees");
        assert_eq!(single(&state.item).unwrap().value, Value::Value(4));
        assert!(state.items.is_null());

        let config = DataSourceState {
            name: Value::Value(Cow::Borrowed("Guests")),
            ..Default::default()
        };
        let state = sgt.read(&mut diags, config, Default::default()).await.unwrap();
        assert_eq!(single(&state.item).unwrap().value, Value::Value(6));
        assert!(!state.id.as_str().is_empty());
        assert!(diags.errors.is_empty());
    }

    #[tokio::test]
    async fn lists_every_page() {
        let fake = Arc::new(FakeIse::new(Sgt::ENDPOINT).with_page_size(3));
        for i in 0..7 {
            fake.insert(json!({"name": format!("sgt-{i}"), "value": i}));
        }
        let sgt = data_source::<Sgt>(&fake);
        let mut diags = Diagnostics::default();

        let state = sgt
            .read(&mut diags, DataSourceState::default(), Default::default())
            .await
            .unwrap();
        let names: Vec<_> = state
            .items
            .iter()
            .flatten()
            .filter_map(|item| Some(item.as_ref_option()?.name.as_str().to_owned()))
            .collect();
        assert_eq!(names, (0..7).map(|i| format!("sgt-{i}")).collect::<Vec<_>>());
        assert!(state.item.is_null());
        assert!(diags.warnings.is_empty());
    }

    #[tokio::test]
    async fn interrupted_listing_is_a_warning() {
        let fake = Arc::new(FakeIse::new(Sgt::ENDPOINT).with_page_size(2));
        for i in 0..6 {
            fake.insert(json!({"name": format!("sgt-{i}"), "value": i}));
        }
        fake.fail_page(2);
        let sgt = data_source::<Sgt>(&fake);
        let mut diags = Diagnostics::default();

        let state = sgt
            .read(&mut diags, DataSourceState::default(), Default::default())
            .await
            .unwrap();
        assert_eq!(state.items.as_ref_option().map(Vec::len), Some(2));
        assert_eq!(diags.warnings.len(), 1);
        assert!(diags.errors.is_empty());
    }

    #[tokio::test]
    async fn explicit_page_is_not_walked() {
        let fake = Arc::new(FakeIse::new(Sgt::ENDPOINT));
        for i in 0..5 {
            fake.insert(json!({"name": format!("sgt-{i}"), "value": i}));
        }
        let sgt = data_source::<Sgt>(&fake);
        let mut diags = Diagnostics::default();

        let config = DataSourceState {
            page: Value::Value(2),
            size: Value::Value(2),
            ..Default::default()
        };
        let state = sgt.read(&mut diags, config, Default::default()).await.unwrap();
        let names: Vec<_> = state
            .items
            .iter()
            .flatten()
            .filter_map(|item| Some(item.as_ref_option()?.name.as_str().to_owned()))
            .collect();
        assert_eq!(names, ["sgt-2", "sgt-3"]);
    }

    #[tokio::test]
    async fn missing_object_is_an_error() {
        let fake = Arc::new(FakeIse::new(Repository::ENDPOINT));
        let repository = data_source::<Repository>(&fake);
        let mut diags = Diagnostics::default();

        let config = DataSourceState {
            name: Value::Value(Cow::Borrowed("absent")),
            ..Default::default()
        };
        let state = repository.read(&mut diags, config, Default::default()).await;
        assert!(state.is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn settings_are_read_without_keys() {
        let fake = Arc::new(FakeIse::new(ProxyConnectionSettings::ENDPOINT));
        fake.insert(json!({"url": "proxy.example.com", "port": 3128, "bypassHosts": "10.0.0.0/8"}));
        let settings = data_source::<ProxyConnectionSettings>(&fake);
        let mut diags = Diagnostics::default();

        let state = settings
            .read(&mut diags, DataSourceState::default(), Default::default())
            .await
            .unwrap();
        let item = single(&state.item).unwrap();
        assert_eq!(item.url.as_str(), "proxy.example.com");
        assert_eq!(item.port, Value::Value(3128));
        assert_eq!(state.id.as_str(), "settings:=ProxyConnectionSettings");
    }

    #[tokio::test]
    async fn list_arguments_are_validated() {
        let sgt = IseDataSource::<Sgt>::default();
        let mut diags = Diagnostics::default();
        let config = DataSourceState {
            size: Value::Value(500),
            filter_type: Value::Value(Cow::Borrowed("xor")),
            ..Default::default()
        };
        assert_eq!(sgt.validate(&mut diags, config).await, None);
        assert_eq!(diags.errors.len(), 2);
    }
}
