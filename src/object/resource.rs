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
use time::format_description::well_known::Rfc2822;
use time::OffsetDateTime;

use tf_provider::value::{Value, ValueEmpty, ValueString};
use tf_provider::{schema::Schema, AttributePath, Diagnostics, Resource};

use crate::client::{ClientHandle, IseApi, Keys, ListQuery, RemoteKey};
use crate::composite_id::CompositeId;
use crate::lookup::{Identity, LookupStrategy};
use crate::utils::{list_of_one, report_api_error, single, WithNormalize, WithSchema, WithValidate};

use super::state::ResourceState;
use super::IseObject;

#[derive(Debug, Default)]
pub struct IseResource<T: IseObject> {
    pub(super) client: ClientHandle,
    object: PhantomData<T>,
}

impl<T: IseObject> IseResource<T> {
    pub fn new(client: ClientHandle) -> Self {
        Self {
            client,
            object: PhantomData,
        }
    }

    /// Terraform id recorded for an object with these keys
    fn state_id<'a>(identity: &Identity) -> ValueString<'a> {
        let id = match T::ENDPOINT.keys {
            Keys::Singleton => CompositeId::new().with("settings", T::KIND),
            _ => CompositeId::from(identity),
        };
        Value::Value(Cow::Owned(id.encode()))
    }

    fn now<'a>() -> ValueString<'a> {
        let now = OffsetDateTime::now_utc().format(&Rfc2822).unwrap_or_default();
        Value::Value(Cow::Owned(now))
    }

    /// Look for an object already holding the requested keys
    async fn find_existing(&self, api: &dyn IseApi, wanted: &Identity) -> Option<T::Api> {
        if wanted.is_empty() {
            return None;
        }
        let strategy = LookupStrategy::select(T::ENDPOINT.keys, wanted, ListQuery::default());
        match T::ENDPOINT.fetch::<T::Api>(api, &strategy).await {
            Ok(found) => Some(found),
            Err(err) => {
                tracing::debug!(kind = T::KIND, %wanted, error = %err, "no existing object to adopt");
                None
            }
        }
    }

    /// Create the object described by `parameters`, or adopt an existing one with the same keys
    pub(crate) async fn create_remote(
        &self,
        diags: &mut Diagnostics,
        api: &dyn IseApi,
        parameters: &T::Model<'_>,
    ) -> Option<Identity> {
        let wanted = T::identity(parameters);

        if T::ENDPOINT.keys == Keys::Singleton {
            let Some(body) = T::expand(parameters, None) else {
                return Some(Identity::default());
            };
            if let Err(err) = T::ENDPOINT
                .update(api, &RemoteKey::Singleton, &body)
                .await
            {
                report_api_error(diags, format!("Failure when executing Update {}", T::KIND), &err);
                return None;
            }
            return Some(Identity::default());
        }

        if let Some(existing) = self.find_existing(api, &wanted).await {
            let identity = T::api_identity(&existing).or(wanted);
            tracing::info!(kind = T::KIND, %identity, "adopting existing object");
            return Some(identity);
        }

        let Some(body) = T::expand(parameters, None) else {
            diags.error_short(
                format!("Nothing to create: the {} parameters are empty", T::KIND),
                AttributePath::new("parameters").index(0),
            );
            return None;
        };

        match T::ENDPOINT.create(api, &body).await {
            Ok(created) => {
                let identity = Identity::new(created.id, None).or(wanted);
                tracing::info!(kind = T::KIND, %identity, "object created");
                Some(identity)
            }
            Err(err) => {
                report_api_error(diags, format!("Failure when executing Create {}", T::KIND), &err);
                None
            }
        }
    }

    /// Refresh `item` from the API.
    ///
    /// Returns `None` when the object cannot be fetched, so that Terraform
    /// forgets it.
    pub(crate) async fn refresh<'a>(
        &self,
        diags: &mut Diagnostics,
        api: &dyn IseApi,
        mut state: ResourceState<'a, T>,
    ) -> Option<ResourceState<'a, T>> {
        let identity = match state.identity() {
            Ok(identity) => identity,
            Err(err) => {
                diags.error("Invalid resource id", err.to_string(), AttributePath::new("id"));
                return None;
            }
        };

        let strategy = LookupStrategy::select(T::ENDPOINT.keys, &identity, ListQuery::default());
        let fetched = match T::ENDPOINT.fetch::<T::Api>(api, &strategy).await {
            Ok(fetched) => fetched,
            Err(err) if err.is_not_found() => {
                tracing::info!(kind = T::KIND, %identity, "object no longer exists, removing it from state");
                return None;
            }
            Err(err) => {
                tracing::warn!(kind = T::KIND, %identity, error = %err, "read failed, removing object from state");
                diags.root_warning(
                    format!("Failure when executing Get {}", T::KIND),
                    format!(
                        "{err}\nThe object has been removed from the state and will be recreated on the next apply if it still is in the configuration."
                    ),
                );
                return None;
            }
        };

        let identity = T::api_identity(&fetched).or(identity);
        state.id = Self::state_id(&identity);
        state.item = list_of_one(T::flatten(Some(&fetched)));
        if single(&state.parameters).is_none() {
            // Imported: there is no configuration yet to compare with
            state.parameters = state.item.clone();
        }
        Some(state)
    }

    /// Push `parameters` to the object known under `identity`.
    ///
    /// Fields set in `prior` and emptied in `parameters` are cleared remotely.
    pub(crate) async fn update_remote(
        &self,
        diags: &mut Diagnostics,
        api: &dyn IseApi,
        identity: &Identity,
        parameters: &T::Model<'_>,
        prior: Option<&T::Model<'_>>,
    ) -> Option<Identity> {
        let key = match T::ENDPOINT.resolve_key(api, identity).await {
            Ok(key) => key,
            Err(err) => {
                report_api_error(diags, format!("Failure when executing Update {}", T::KIND), &err);
                return None;
            }
        };

        let resolved = match &key {
            RemoteKey::Id(id) => Identity::by_id(id.clone()).or(T::identity(parameters)),
            _ => T::identity(parameters).or(identity.clone()),
        };

        let Some(mut body) = T::expand(parameters, prior) else {
            diags.root_warning(
                format!("Empty {} update", T::KIND),
                "The parameters expand to an empty request, no update was sent.",
            );
            return Some(resolved);
        };
        if let RemoteKey::Id(id) = &key {
            T::assign_id(&mut body, id);
        }

        match T::ENDPOINT.update(api, &key, &body).await {
            Ok(()) => {
                tracing::info!(kind = T::KIND, identity = %resolved, "object updated");
                Some(resolved)
            }
            Err(err) => {
                report_api_error(diags, format!("Failure when executing Update {}", T::KIND), &err);
                None
            }
        }
    }

    /// Delete the object known under `identity`; an already missing object is not an error
    pub(crate) async fn delete_remote(
        &self,
        diags: &mut Diagnostics,
        api: &dyn IseApi,
        identity: &Identity,
    ) -> Option<()> {
        if T::ENDPOINT.keys == Keys::Singleton {
            diags.root_warning(
                format!("{} cannot be deleted", T::KIND),
                "Settings always exist on the appliance: the resource is only removed from the Terraform state.",
            );
            return Some(());
        }

        let result = match T::ENDPOINT.resolve_key(api, identity).await {
            Ok(key) => T::ENDPOINT.delete(api, &key).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => {
                tracing::info!(kind = T::KIND, %identity, "object deleted");
                Some(())
            }
            Err(err) if err.is_not_found() => {
                tracing::info!(kind = T::KIND, %identity, "object already deleted");
                Some(())
            }
            Err(err) => {
                report_api_error(diags, format!("Failure when executing Delete {}", T::KIND), &err);
                None
            }
        }
    }
}

#[async_trait]
impl<T: IseObject> Resource for IseResource<T> {
    type State<'a> = ResourceState<'a, T>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ResourceState::<T>::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        config.validate(diags, Default::default());

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let api = self.client.get(diags).await?;
        // No state back: Terraform drops the resource
        let state = self.refresh(diags, api.as_ref(), state).await?;
        Some((state, private_state))
    }

    async fn plan_create<'a>(
        &self,
        diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        state.id = Value::Unknown;
        state.last_updated = Value::Unknown;
        state.item = Value::Unknown;
        state.normalize(diags);

        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(
        Self::State<'a>,
        Self::PrivateState<'a>,
        Vec<tf_provider::AttributePath>,
    )> {
        let mut state = proposed_state;
        let mut trigger_replace = Vec::new();

        if state.parameters != prior_state.parameters {
            state.last_updated = Value::Unknown;
            state.item = Value::Unknown;

            // Name-keyed objects are addressed by their name: it cannot change in place
            if T::ENDPOINT.keys == Keys::NameOnly {
                let name_of = |state: &Self::State<'a>| {
                    single(&state.parameters).and_then(|model| T::identity(model).name)
                };
                let previous = name_of(&prior_state);
                if previous.is_some() && previous != name_of(&state) {
                    trigger_replace.push(AttributePath::new("parameters").index(0).attribute("name"));
                }
            }
        }
        state.normalize(diags);

        Some((state, prior_private_state, trigger_replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let api = self.client.get(diags).await?;
        let mut state = planned_state;

        let Some(parameters) = single(&state.parameters) else {
            diags.error_short(
                "`parameters` must hold exactly one element",
                AttributePath::new("parameters"),
            );
            return None;
        };
        let identity = self.create_remote(diags, api.as_ref(), parameters).await?;

        state.id = Self::state_id(&identity);
        state.last_updated = Self::now();
        let Some(state) = self.refresh(diags, api.as_ref(), state).await else {
            diags.root_error(
                format!("Failure when reading the new {}", T::KIND),
                format!("The object {identity} was applied but could not be read back."),
            );
            return None;
        };

        Some((state, private_state))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = planned_state;
        if state.parameters == prior_state.parameters {
            state.last_updated = prior_state.last_updated;
            state.item = prior_state.item;
            return Some((state, private_state));
        }

        let api = self.client.get(diags).await?;
        let Some(parameters) = single(&state.parameters) else {
            diags.error_short(
                "`parameters` must hold exactly one element",
                AttributePath::new("parameters"),
            );
            return None;
        };
        let identity = match prior_state.identity() {
            Ok(identity) => identity,
            Err(err) => {
                diags.error("Invalid resource id", err.to_string(), AttributePath::new("id"));
                return None;
            }
        };

        let prior = single(&prior_state.parameters);
        let identity = self
            .update_remote(diags, api.as_ref(), &identity, parameters, prior)
            .await?;

        state.id = Self::state_id(&identity);
        state.last_updated = Self::now();
        let Some(state) = self.refresh(diags, api.as_ref(), state).await else {
            diags.root_error(
                format!("Failure when reading the updated {}", T::KIND),
                format!("The object {identity} was updated but could not be read back."),
            );
            return None;
        };

        Some((state, private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let api = self.client.get(diags).await?;
        let identity = match state.identity() {
            Ok(identity) => identity,
            Err(err) => {
                diags.error("Invalid resource id", err.to_string(), AttributePath::new("id"));
                return None;
            }
        };

        self.delete_remote(diags, api.as_ref(), &identity).await
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let id = match CompositeId::parse_import(&id, T::ENDPOINT.keys) {
            Ok(id) => id,
            Err(err) => {
                diags.root_error(
                    "Invalid import id",
                    format!("{err}\nExpected `id:=<id>\\name:=<name>` or a bare key."),
                );
                return None;
            }
        };

        let state = ResourceState {
            id: Value::Value(Cow::Owned(id.encode())),
            last_updated: Value::Null,
            parameters: Value::Null,
            item: Value::Null,
        };
        Some((state, Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::client::testing::FakeIse;
    use crate::client::Method;
    use crate::objects::{NetworkDeviceGroup, ProxyConnectionSettings, Repository, Sgt};

    use super::*;

    fn model<'a, T: IseObject>(fields: serde_json::Value) -> T::Model<'a> {
        let api: T::Api = serde_json::from_value(fields).unwrap();
        T::flatten(Some(&api)).unwrap()
    }

    fn ndg_state<'a>(name: &str, description: &str) -> ResourceState<'a, NetworkDeviceGroup> {
        let othername = name.split('#').next();
        ResourceState {
            parameters: list_of_one(Some(model::<NetworkDeviceGroup>(json!({
                "name": name,
                "description": description,
                "othername": othername,
            })))),
            ..Default::default()
        }
    }

    async fn apply_create<'a, T: IseObject>(
        resource: &IseResource<T>,
        diags: &mut Diagnostics,
        state: ResourceState<'a, T>,
    ) -> Option<ResourceState<'a, T>> {
        let (planned, _) = resource
            .plan_create(diags, state.clone(), state.clone(), Default::default())
            .await?;
        let (created, _) = resource
            .create(diags, planned, state, Default::default(), Default::default())
            .await?;
        Some(created)
    }

    fn handle(fake: FakeIse) -> (std::sync::Arc<FakeIse>, ClientHandle) {
        let fake = std::sync::Arc::new(fake);
        (fake.clone(), ClientHandle::with_client(fake))
    }

    #[tokio::test]
    async fn create_then_read_populates_item() {
        let (fake, client) = handle(FakeIse::new(NetworkDeviceGroup::ENDPOINT));
        let resource = IseResource::<NetworkDeviceGroup>::new(client);
        let mut diags = Diagnostics::default();

        let state = apply_create(&resource, &mut diags, ndg_state("Location#All Locations#Lab", "lab"))
            .await
            .unwrap();
        assert!(diags.errors.is_empty());

        let identity = state.identity().unwrap();
        let id = identity.id.clone().unwrap();
        assert_eq!(identity.name.as_deref(), Some("Location#All Locations#Lab"));
        assert!(fake.get(&id).is_some());

        let item = single(&state.item).unwrap();
        assert_eq!(item.description.as_str(), "lab");
        assert!(single(&item.link).is_some());
        assert!(!state.last_updated.as_str().is_empty());
    }

    #[tokio::test]
    async fn create_adopts_existing_object() {
        let (fake, client) = handle(FakeIse::new(NetworkDeviceGroup::ENDPOINT));
        let id = fake.insert(json!({"name": "Device Type#All Device Types#Switch", "othername": "Device Type"}));
        let resource = IseResource::<NetworkDeviceGroup>::new(client);
        let mut diags = Diagnostics::default();

        let state = apply_create(
            &resource,
            &mut diags,
            ndg_state("Device Type#All Device Types#Switch", "switches"),
        )
        .await
        .unwrap();

        assert_eq!(state.identity().unwrap().id, Some(id));
        assert_eq!(fake.len(), 1);
        assert!(!fake.requests().iter().any(|(method, _)| *method == Method::Post));
    }

    #[tokio::test]
    async fn update_only_sends_changed_parameters() {
        let (fake, client) = handle(FakeIse::new(NetworkDeviceGroup::ENDPOINT));
        let resource = IseResource::<NetworkDeviceGroup>::new(client);
        let mut diags = Diagnostics::default();
        let prior = apply_create(&resource, &mut diags, ndg_state("Location#All Locations#Lab", "lab"))
            .await
            .unwrap();
        let puts = || {
            fake.requests()
                .iter()
                .filter(|(method, _)| *method == Method::Put)
                .count()
        };

        let (unchanged, _) = resource
            .update(
                &mut diags,
                prior.clone(),
                prior.clone(),
                prior.clone(),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert_eq!(unchanged, prior);
        assert_eq!(puts(), 0);

        let mut proposed = prior.clone();
        proposed.parameters = ndg_state("Location#All Locations#Lab", "renamed lab").parameters;
        let (planned, _, replace) = resource
            .plan_update(
                &mut diags,
                prior.clone(),
                proposed.clone(),
                proposed.clone(),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(replace.is_empty());
        assert!(planned.item.is_unknown());

        let (updated, _) = resource
            .update(
                &mut diags,
                prior.clone(),
                planned,
                proposed,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        assert_eq!(puts(), 1);
        assert_eq!(single(&updated.item).unwrap().description.as_str(), "renamed lab");
        assert_eq!(updated.id, prior.id);
    }

    #[tokio::test]
    async fn removed_description_is_cleared_remotely() {
        let (fake, client) = handle(FakeIse::new(NetworkDeviceGroup::ENDPOINT));
        let resource = IseResource::<NetworkDeviceGroup>::new(client);
        let mut diags = Diagnostics::default();
        let prior = apply_create(&resource, &mut diags, ndg_state("Location#All Locations#Lab", "lab"))
            .await
            .unwrap();
        let id = prior.identity().unwrap().id.unwrap();

        let mut proposed = prior.clone();
        if let Value::Value(parameters) = &mut proposed.parameters {
            if let Value::Value(model) = &mut parameters[0] {
                model.description = Value::Null;
            }
        }
        let (planned, _, _) = resource
            .plan_update(
                &mut diags,
                prior.clone(),
                proposed.clone(),
                proposed.clone(),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        let (updated, _) = resource
            .update(
                &mut diags,
                prior,
                planned,
                proposed,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();

        assert!(diags.errors.is_empty());
        assert_eq!(fake.get(&id).unwrap()["description"], json!(""));
        assert_eq!(single(&updated.item).unwrap().description.as_str(), "");
        assert_eq!(single(&updated.item).unwrap().othername.as_str(), "Location");
    }

    #[tokio::test]
    async fn read_drops_vanished_object() {
        let (fake, client) = handle(FakeIse::new(NetworkDeviceGroup::ENDPOINT));
        let resource = IseResource::<NetworkDeviceGroup>::new(client);
        let mut diags = Diagnostics::default();
        let state = apply_create(&resource, &mut diags, ndg_state("Location#All Locations#Lab", "lab"))
            .await
            .unwrap();

        fake.remove(&state.identity().unwrap().id.unwrap());
        let read = resource
            .read(&mut diags, state, Default::default(), Default::default())
            .await;
        assert!(read.is_none());
        assert!(diags.errors.is_empty());
        assert!(diags.warnings.is_empty());
    }

    #[tokio::test]
    async fn read_drops_object_on_empty_response_with_warning() {
        let (fake, client) = handle(FakeIse::new(NetworkDeviceGroup::ENDPOINT));
        let resource = IseResource::<NetworkDeviceGroup>::new(client);
        let mut diags = Diagnostics::default();
        let state = apply_create(&resource, &mut diags, ndg_state("Location#All Locations#Lab", "lab"))
            .await
            .unwrap();

        fake.corrupt(&state.identity().unwrap().id.unwrap());
        let read = resource
            .read(&mut diags, state, Default::default(), Default::default())
            .await;
        assert!(read.is_none());
        assert!(diags.errors.is_empty());
        assert_eq!(diags.warnings.len(), 1);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (fake, client) = handle(FakeIse::new(NetworkDeviceGroup::ENDPOINT));
        let resource = IseResource::<NetworkDeviceGroup>::new(client);
        let mut diags = Diagnostics::default();
        let state = apply_create(&resource, &mut diags, ndg_state("Location#All Locations#Lab", "lab"))
            .await
            .unwrap();

        let deleted = resource
            .destroy(&mut diags, state.clone(), Default::default(), Default::default())
            .await;
        assert_eq!(deleted, Some(()));
        assert_eq!(fake.len(), 0);

        let deleted_again = resource
            .destroy(&mut diags, state, Default::default(), Default::default())
            .await;
        assert_eq!(deleted_again, Some(()));
        assert!(diags.errors.is_empty());
    }

    #[tokio::test]
    async fn delete_resolves_id_from_name() {
        let (fake, client) = handle(FakeIse::new(Sgt::ENDPOINT));
        fake.insert(json!({"name": "Employees", "value": 4}));
        let resource = IseResource::<Sgt>::new(client);
        let mut diags = Diagnostics::default();

        let deleted = resource
            .delete_remote(&mut diags, fake.as_ref(), &Identity::by_name("Employees".into()))
            .await;
        assert_eq!(deleted, Some(()));
        assert_eq!(fake.len(), 0);
    }

    #[tokio::test]
    async fn import_then_read_seeds_parameters() {
        let (fake, client) = handle(FakeIse::new(Repository::ENDPOINT));
        fake.insert(json!({"name": "backups", "protocol": "SFTP", "serverName": "10.0.0.5", "path": "/srv"}));
        let resource = IseResource::<Repository>::new(client);
        let mut diags = Diagnostics::default();

        let (imported, private_state) = resource.import(&mut diags, "backups".into()).await.unwrap();
        assert_eq!(imported.id.as_str(), "name:=backups");

        let (state, _) = resource
            .read(&mut diags, imported, private_state, Default::default())
            .await
            .unwrap();
        assert_eq!(state.parameters, state.item);
        assert_eq!(single(&state.item).unwrap().server_name.as_str(), "10.0.0.5");
    }

    #[tokio::test]
    async fn renaming_a_repository_requires_replacement() {
        let (fake, client) = handle(FakeIse::new(Repository::ENDPOINT));
        fake.insert(json!({"name": "backups", "protocol": "SFTP"}));
        let resource = IseResource::<Repository>::new(client);
        let mut diags = Diagnostics::default();
        let (imported, _) = resource.import(&mut diags, "backups".into()).await.unwrap();
        let (prior, _) = resource
            .read(&mut diags, imported, Default::default(), Default::default())
            .await
            .unwrap();

        let mut proposed = prior.clone();
        if let Value::Value(parameters) = &mut proposed.parameters {
            if let Value::Value(model) = &mut parameters[0] {
                model.name = Value::Value(Cow::Borrowed("archives"));
            }
        }
        let (_, _, replace) = resource
            .plan_update(
                &mut diags,
                prior,
                proposed.clone(),
                proposed,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert_eq!(replace.len(), 1);
    }

    #[tokio::test]
    async fn settings_are_updated_and_never_deleted() {
        let (fake, client) = handle(FakeIse::new(ProxyConnectionSettings::ENDPOINT));
        let resource = IseResource::<ProxyConnectionSettings>::new(client);
        let mut diags = Diagnostics::default();

        let state = ResourceState {
            parameters: list_of_one(Some(model::<ProxyConnectionSettings>(json!({
                "url": "proxy.example.com",
                "port": 8080,
            })))),
            ..Default::default()
        };
        let state = apply_create(&resource, &mut diags, state).await.unwrap();
        assert_eq!(state.id.as_str(), "settings:=ProxyConnectionSettings");
        assert_eq!(single(&state.item).unwrap().port, Value::Value(8080));

        let deleted = resource
            .destroy(&mut diags, state, Default::default(), Default::default())
            .await;
        assert_eq!(deleted, Some(()));
        assert_eq!(diags.warnings.len(), 1);
        assert!(!fake.requests().iter().any(|(method, _)| *method == Method::Delete));
    }

    #[tokio::test]
    async fn unconfigured_provider_is_reported() {
        let resource = IseResource::<NetworkDeviceGroup>::new(ClientHandle::default());
        let mut diags = Diagnostics::default();
        let read = resource
            .read(&mut diags, ndg_state("a", "b"), Default::default(), Default::default())
            .await;
        assert!(read.is_none());
        assert_eq!(diags.errors.len(), 1);
    }
}
