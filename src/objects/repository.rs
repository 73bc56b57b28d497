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
use tf_provider::value::ValueString;
use tf_provider::{AttributePath, Diagnostics};

use crate::client::{Endpoint, Family, Keys};
use crate::lookup::Identity;
use crate::object::{Field, FieldKind, IseObject};
use crate::tristate;
use crate::utils::{known_str, known_string, string_value};

use super::{expand_flag, expand_string, non_empty};

const PROTOCOLS: [&str; 8] = ["CDROM", "DISK", "FTP", "HTTP", "HTTPS", "NFS", "SFTP", "TFTP"];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Repository;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryApi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, rename = "enablePki", skip_serializing_if = "Option::is_none")]
    pub enable_pki: Option<Option<bool>>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryModel<'a> {
    pub name: ValueString<'a>,
    pub protocol: ValueString<'a>,
    pub path: ValueString<'a>,
    pub server_name: ValueString<'a>,
    pub user_name: ValueString<'a>,
    pub password: ValueString<'a>,
    pub enable_pki: ValueString<'a>,
}

impl IseObject for Repository {
    const KIND: &'static str = "Repository";
    const DESCRIPTION: &'static str = "Backup and patch repository";
    const ENDPOINT: Endpoint = Endpoint {
        path: "/api/v1/repository",
        family: Family::OpenApi,
        keys: Keys::NameOnly,
    };
    const FIELDS: &'static [Field] = &[
        Field::required("name", FieldKind::String, "Name of the repository"),
        Field::required("protocol", FieldKind::String, "Transfer protocol, e.g. `SFTP`"),
        Field::optional("path", FieldKind::String, "Path on the server"),
        Field::optional("server_name", FieldKind::String, "Server address"),
        Field::optional("user_name", FieldKind::String, "Login on the server"),
        Field::optional("password", FieldKind::String, "Password on the server").sensitive(),
        Field::optional("enable_pki", FieldKind::TriState, "Use PKI authentication (SFTP only)"),
    ];

    type Api = RepositoryApi;
    type Model<'a> = RepositoryModel<'a>;

    fn identity(model: &Self::Model<'_>) -> Identity {
        Identity::new(None, known_string(&model.name))
    }

    fn api_identity(api: &Self::Api) -> Identity {
        Identity::new(None, api.name.clone())
    }

    fn flatten<'a>(api: Option<&Self::Api>) -> Option<Self::Model<'a>> {
        api.map(|api| RepositoryModel {
            name: string_value(api.name.as_deref()),
            protocol: string_value(api.protocol.as_deref()),
            path: string_value(api.path.as_deref()),
            server_name: string_value(api.server_name.as_deref()),
            user_name: string_value(api.user_name.as_deref()),
            password: string_value(api.password.as_deref()),
            enable_pki: tristate::flatten(api.enable_pki.flatten()),
        })
    }

    fn expand(model: &Self::Model<'_>, prior: Option<&Self::Model<'_>>) -> Option<Self::Api> {
        non_empty(RepositoryApi {
            name: known_string(&model.name),
            protocol: known_string(&model.protocol),
            path: expand_string(&model.path, prior.map(|prior| &prior.path)),
            server_name: expand_string(&model.server_name, prior.map(|prior| &prior.server_name)),
            user_name: expand_string(&model.user_name, prior.map(|prior| &prior.user_name)),
            password: expand_string(&model.password, prior.map(|prior| &prior.password)),
            enable_pki: expand_flag(&model.enable_pki, prior.map(|prior| &prior.enable_pki)),
        })
    }

    fn validate(model: &Self::Model<'_>, diags: &mut Diagnostics, attr_path: AttributePath) {
        if let Some(protocol) = known_str(&model.protocol) {
            if !PROTOCOLS.contains(&protocol) {
                diags.error(
                    "Invalid repository protocol",
                    format!("Expected one of {}, got `{protocol}`.", PROTOCOLS.join(", ")),
                    attr_path.clone().attribute("protocol"),
                );
            }
            if tristate::expand(&model.enable_pki) == Some(true) && protocol != "SFTP" {
                diags.warning(
                    "PKI authentication is ignored",
                    "PKI authentication is only used by SFTP repositories.",
                    attr_path.clone().attribute("enable_pki"),
                );
            }
        }
        tristate::validate(diags, &model.enable_pki, attr_path.attribute("enable_pki"));
    }
}
