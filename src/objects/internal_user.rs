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
use tf_provider::value::{Value, ValueList, ValueString};
use tf_provider::{AttributePath, Diagnostics};

use crate::client::{Endpoint, Family, Keys, Link};
use crate::lookup::Identity;
use crate::object::{flatten_link, Field, FieldKind, IseObject, LinkModel};
use crate::tristate;
use crate::utils::{known_string, known_strings, string_value, strings_value};

use super::{expand_flag, expand_string, non_empty, or_cleared};

const PASSWORD_STORES: [&str; 2] = ["Internal Users", "AD"];

/// Groups as the API takes them: comma separated ids
fn joined_groups(model: &InternalUserModel<'_>) -> Option<String> {
    known_strings(&model.identity_groups)
        .filter(|groups| !groups.is_empty())
        .map(|groups| groups.join(","))
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InternalUser;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalUserApi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<Option<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_password: Option<Option<bool>>,
    /// Comma separated group ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_groups: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date_enabled: Option<Option<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_password: Option<String>,
    #[serde(
        default,
        rename = "passwordIDStore",
        skip_serializing_if = "Option::is_none"
    )]
    pub password_id_store: Option<String>,
    #[serde(default, skip_serializing)]
    pub link: Option<Link>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalUserModel<'a> {
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub description: ValueString<'a>,
    pub enabled: ValueString<'a>,
    pub email: ValueString<'a>,
    pub password: ValueString<'a>,
    pub first_name: ValueString<'a>,
    pub last_name: ValueString<'a>,
    pub change_password: ValueString<'a>,
    pub identity_groups: ValueList<ValueString<'a>>,
    pub expiry_date_enabled: ValueString<'a>,
    pub expiry_date: ValueString<'a>,
    pub enable_password: ValueString<'a>,
    pub password_id_store: ValueString<'a>,
    pub link: ValueList<Value<LinkModel<'a>>>,
}

impl IseObject for InternalUser {
    const KIND: &'static str = "InternalUser";
    const DESCRIPTION: &'static str = "User of the internal identity store";
    const ENDPOINT: Endpoint = Endpoint {
        path: "/ers/config/internaluser",
        family: Family::Ers {
            wrapper: "InternalUser",
        },
        keys: Keys::IdAndName { by_name: true },
    };
    const FIELDS: &'static [Field] = &[
        Field::computed("id", FieldKind::String, "Id of the user"),
        Field::required("name", FieldKind::String, "Login of the user"),
        Field::optional("description", FieldKind::String, "Description of the user"),
        Field::optional("enabled", FieldKind::TriState, "Whether the user may log in"),
        Field::optional("email", FieldKind::String, "Email address"),
        Field::optional("password", FieldKind::String, "Login password").sensitive(),
        Field::optional("first_name", FieldKind::String, "First name"),
        Field::optional("last_name", FieldKind::String, "Last name"),
        Field::optional(
            "change_password",
            FieldKind::TriState,
            "Whether the user must change the password at next login",
        ),
        Field::optional("identity_groups", FieldKind::StringList, "Ids of the groups of the user"),
        Field::optional(
            "expiry_date_enabled",
            FieldKind::TriState,
            "Whether the account expires",
        ),
        Field::optional("expiry_date", FieldKind::String, "Expiry date, as `YYYY-MM-DD`"),
        Field::optional("enable_password", FieldKind::String, "Enable password").sensitive(),
        Field::optional(
            "password_id_store",
            FieldKind::String,
            "Store checking the password: `Internal Users` or `AD`",
        ),
        Field::computed("link", FieldKind::Link, "Link to the user"),
    ];

    type Api = InternalUserApi;
    type Model<'a> = InternalUserModel<'a>;

    fn identity(model: &Self::Model<'_>) -> Identity {
        Identity::new(known_string(&model.id), known_string(&model.name))
    }

    fn api_identity(api: &Self::Api) -> Identity {
        Identity::new(api.id.clone(), api.name.clone())
    }

    fn flatten<'a>(api: Option<&Self::Api>) -> Option<Self::Model<'a>> {
        let api = api?;
        let groups: Option<Vec<String>> = api.identity_groups.as_deref().map(|groups| {
            groups
                .split(',')
                .map(str::trim)
                .filter(|group| !group.is_empty())
                .map(str::to_owned)
                .collect()
        });
        Some(InternalUserModel {
            id: string_value(api.id.as_deref()),
            name: string_value(api.name.as_deref()),
            description: string_value(api.description.as_deref()),
            enabled: tristate::flatten(api.enabled.flatten()),
            email: string_value(api.email.as_deref()),
            password: string_value(api.password.as_deref()),
            first_name: string_value(api.first_name.as_deref()),
            last_name: string_value(api.last_name.as_deref()),
            change_password: tristate::flatten(api.change_password.flatten()),
            identity_groups: strings_value(groups.as_deref()),
            expiry_date_enabled: tristate::flatten(api.expiry_date_enabled.flatten()),
            expiry_date: string_value(api.expiry_date.as_deref()),
            enable_password: string_value(api.enable_password.as_deref()),
            password_id_store: string_value(api.password_id_store.as_deref()),
            link: flatten_link(api.link.as_ref()),
        })
    }

    fn expand(model: &Self::Model<'_>, prior: Option<&Self::Model<'_>>) -> Option<Self::Api> {
        let had_groups = prior.and_then(joined_groups).is_some();

        non_empty(InternalUserApi {
            id: None,
            name: known_string(&model.name),
            description: expand_string(&model.description, prior.map(|prior| &prior.description)),
            enabled: expand_flag(&model.enabled, prior.map(|prior| &prior.enabled)),
            email: expand_string(&model.email, prior.map(|prior| &prior.email)),
            password: expand_string(&model.password, prior.map(|prior| &prior.password)),
            first_name: expand_string(&model.first_name, prior.map(|prior| &prior.first_name)),
            last_name: expand_string(&model.last_name, prior.map(|prior| &prior.last_name)),
            change_password: expand_flag(
                &model.change_password,
                prior.map(|prior| &prior.change_password),
            ),
            identity_groups: or_cleared(
                joined_groups(model),
                &model.identity_groups,
                had_groups,
                String::new(),
            ),
            expiry_date_enabled: expand_flag(
                &model.expiry_date_enabled,
                prior.map(|prior| &prior.expiry_date_enabled),
            ),
            expiry_date: expand_string(&model.expiry_date, prior.map(|prior| &prior.expiry_date)),
            enable_password: expand_string(
                &model.enable_password,
                prior.map(|prior| &prior.enable_password),
            ),
            password_id_store: expand_string(
                &model.password_id_store,
                prior.map(|prior| &prior.password_id_store),
            ),
            link: None,
        })
    }

    fn assign_id(api: &mut Self::Api, id: &str) {
        api.id = Some(id.to_owned());
    }

    fn validate(model: &Self::Model<'_>, diags: &mut Diagnostics, attr_path: AttributePath) {
        for (name, value) in [
            ("enabled", &model.enabled),
            ("change_password", &model.change_password),
            ("expiry_date_enabled", &model.expiry_date_enabled),
        ] {
            tristate::validate(diags, value, attr_path.clone().attribute(name));
        }

        if let Some(store) = model.password_id_store.as_deref_option() {
            if !store.is_empty() && !PASSWORD_STORES.contains(&store) {
                diags.error(
                    "Invalid password store",
                    format!("Expected `Internal Users` or `AD`, got `{store}`."),
                    attr_path.attribute("password_id_store"),
                );
            }
        }
    }
}
