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

use serde::{Deserialize, Serialize};
use tf_provider::value::{ValueNumber, ValueString};
use tf_provider::{AttributePath, Diagnostics};

use crate::client::{Endpoint, Family, Keys};
use crate::lookup::Identity;
use crate::object::{Field, FieldKind, IseObject};
use crate::tristate;
use crate::utils::{known_number, number_value, string_value};

use super::{expand_flag, expand_number, expand_string, non_empty};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProxyConnectionSettings;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConnectionSettingsApi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<Option<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_required: Option<Option<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bypass_hosts: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConnectionSettingsModel<'a> {
    pub url: ValueString<'a>,
    pub port: ValueNumber,
    pub user_name: ValueString<'a>,
    pub password: ValueString<'a>,
    pub password_required: ValueString<'a>,
    pub bypass_hosts: ValueString<'a>,
}

impl IseObject for ProxyConnectionSettings {
    const KIND: &'static str = "ProxyConnectionSettings";
    const DESCRIPTION: &'static str = "HTTP proxy used by the appliance to reach the internet";
    const ENDPOINT: Endpoint = Endpoint {
        path: "/api/v1/system-settings/proxy",
        family: Family::OpenApi,
        keys: Keys::Singleton,
    };
    const FIELDS: &'static [Field] = &[
        Field::optional("url", FieldKind::String, "Host name or address of the proxy"),
        Field::optional("port", FieldKind::Number, "Port of the proxy"),
        Field::optional("user_name", FieldKind::String, "Login on the proxy"),
        Field::optional("password", FieldKind::String, "Password on the proxy").sensitive(),
        Field::optional(
            "password_required",
            FieldKind::TriState,
            "Whether the proxy requires authentication",
        ),
        Field::optional(
            "bypass_hosts",
            FieldKind::String,
            "Comma separated hosts reached without the proxy",
        ),
    ];

    type Api = ProxyConnectionSettingsApi;
    type Model<'a> = ProxyConnectionSettingsModel<'a>;

    fn identity(_model: &Self::Model<'_>) -> Identity {
        Identity::default()
    }

    fn api_identity(_api: &Self::Api) -> Identity {
        Identity::default()
    }

    fn flatten<'a>(api: Option<&Self::Api>) -> Option<Self::Model<'a>> {
        api.map(|api| ProxyConnectionSettingsModel {
            url: string_value(api.url.as_deref()),
            port: number_value(api.port.flatten()),
            user_name: string_value(api.user_name.as_deref()),
            password: string_value(api.password.as_deref()),
            password_required: tristate::flatten(api.password_required.flatten()),
            bypass_hosts: string_value(api.bypass_hosts.as_deref()),
        })
    }

    fn expand(model: &Self::Model<'_>, prior: Option<&Self::Model<'_>>) -> Option<Self::Api> {
        non_empty(ProxyConnectionSettingsApi {
            url: expand_string(&model.url, prior.map(|prior| &prior.url)),
            port: expand_number(&model.port, prior.map(|prior| &prior.port)),
            user_name: expand_string(&model.user_name, prior.map(|prior| &prior.user_name)),
            password: expand_string(&model.password, prior.map(|prior| &prior.password)),
            password_required: expand_flag(
                &model.password_required,
                prior.map(|prior| &prior.password_required),
            ),
            bypass_hosts: expand_string(&model.bypass_hosts, prior.map(|prior| &prior.bypass_hosts)),
        })
    }

    fn validate(model: &Self::Model<'_>, diags: &mut Diagnostics, attr_path: AttributePath) {
        if let Some(port) = known_number(&model.port) {
            if !(1..=65535).contains(&port) {
                diags.error(
                    "Invalid proxy port",
                    format!("The port must be between 1 and 65535, got {port}."),
                    attr_path.clone().attribute("port"),
                );
            }
        }
        tristate::validate(
            diags,
            &model.password_required,
            attr_path.attribute("password_required"),
        );
    }
}
