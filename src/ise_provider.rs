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

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use tf_provider::DynamicDataSource;
use tf_provider::DynamicResource;
use tf_provider::schema::Schema;
use tf_provider::value::ValueEmpty;
use tf_provider::{map, Diagnostics, Provider};

use crate::client::{ClientHandle, HttpClient};
use crate::config::ProviderConfig;
use crate::object::{IseDataSource, IseResource};
use crate::objects::{
    IdentityGroup, InternalUser, NetworkDeviceGroup, ProxyConnectionSettings, Repository, Sgt,
};
use crate::utils::{WithSchema, WithValidate};

#[derive(Debug, Default, Clone)]
pub struct IseProvider {
    client: ClientHandle,
}

impl IseProvider {
    pub fn client(&self) -> &ClientHandle {
        &self.client
    }
}

#[async_trait]
impl Provider for IseProvider {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ProviderConfig::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::Config<'a>) -> Option<()> {
        config
            .with_env(|name| std::env::var(name).ok())
            .validate(diags, Default::default());

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        let config = config.with_env(|name| std::env::var(name).ok());
        if config.base_url.is_unknown() || config.username.is_unknown() || config.password.is_unknown() {
            diags.root_error(
                "Provider configuration is not known",
                "`base_url`, `username` and `password` must be known before any resource is planned.",
            );
            return None;
        }
        let settings = config.settings(diags)?;
        tracing::info!(%terraform_version, ?settings, "configuring provider");

        match HttpClient::new(settings) {
            Ok(client) => {
                self.client.install(Arc::new(client)).await;
                Some(())
            }
            Err(err) => {
                diags.root_error("Failed to create the ISE client", format!("{err:#}"));
                None
            }
        }
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicResource>>> {
        let client = || self.client.clone();
        Some(map! {
            "network_device_group" => IseResource::<NetworkDeviceGroup>::new(client()),
            "identity_group" => IseResource::<IdentityGroup>::new(client()),
            "internal_user" => IseResource::<InternalUser>::new(client()),
            "sgt" => IseResource::<Sgt>::new(client()),
            "repository" => IseResource::<Repository>::new(client()),
            "proxy_connection_settings" => IseResource::<ProxyConnectionSettings>::new(client()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicDataSource>>> {
        let client = || self.client.clone();
        Some(map! {
            "network_device_group" => IseDataSource::<NetworkDeviceGroup>::new(client()),
            "identity_group" => IseDataSource::<IdentityGroup>::new(client()),
            "internal_user" => IseDataSource::<InternalUser>::new(client()),
            "sgt" => IseDataSource::<Sgt>::new(client()),
            "repository" => IseDataSource::<Repository>::new(client()),
            "proxy_connection_settings" => IseDataSource::<ProxyConnectionSettings>::new(client()),
        })
    }
}
