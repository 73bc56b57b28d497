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

use crate::client::{Endpoint, Family, Keys, Link};
use crate::lookup::Identity;
use crate::object::{flatten_link, Field, FieldKind, IseObject, LinkModel};
use crate::utils::{known_string, string_value};

use super::{expand_string, non_empty};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NetworkDeviceGroup;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDeviceGroupApi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Root of the hierarchy, e.g. `Location` or `Device Type`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub othername: Option<String>,
    #[serde(default, skip_serializing)]
    pub link: Option<Link>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDeviceGroupModel<'a> {
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub description: ValueString<'a>,
    pub othername: ValueString<'a>,
    pub link: ValueList<Value<LinkModel<'a>>>,
}

impl IseObject for NetworkDeviceGroup {
    const KIND: &'static str = "NetworkDeviceGroup";
    const DESCRIPTION: &'static str =
        "Network device group, a node of the `Location` or `Device Type` hierarchies";
    const ENDPOINT: Endpoint = Endpoint {
        path: "/ers/config/networkdevicegroup",
        family: Family::Ers {
            wrapper: "NetworkDeviceGroup",
        },
        keys: Keys::IdAndName { by_name: true },
    };
    const FIELDS: &'static [Field] = &[
        Field::computed("id", FieldKind::String, "Id of the group"),
        Field::required(
            "name",
            FieldKind::String,
            "Full name of the group, e.g. `Location#All Locations#Paris`",
        ),
        Field::optional("description", FieldKind::String, "Description of the group"),
        Field::optional("othername", FieldKind::String, "Type of the group, e.g. `Location`"),
        Field::computed("link", FieldKind::Link, "Link to the group"),
    ];

    type Api = NetworkDeviceGroupApi;
    type Model<'a> = NetworkDeviceGroupModel<'a>;

    fn identity(model: &Self::Model<'_>) -> Identity {
        Identity::new(known_string(&model.id), known_string(&model.name))
    }

    fn api_identity(api: &Self::Api) -> Identity {
        Identity::new(api.id.clone(), api.name.clone())
    }

    fn flatten<'a>(api: Option<&Self::Api>) -> Option<Self::Model<'a>> {
        let api = api?;
        Some(NetworkDeviceGroupModel {
            id: string_value(api.id.as_deref()),
            name: string_value(api.name.as_deref()),
            description: string_value(api.description.as_deref()),
            othername: string_value(api.othername.as_deref()),
            link: flatten_link(api.link.as_ref()),
        })
    }

    fn expand(model: &Self::Model<'_>, prior: Option<&Self::Model<'_>>) -> Option<Self::Api> {
        non_empty(NetworkDeviceGroupApi {
            id: None,
            name: known_string(&model.name),
            description: expand_string(&model.description, prior.map(|prior| &prior.description)),
            othername: expand_string(&model.othername, prior.map(|prior| &prior.othername)),
            link: None,
        })
    }

    fn assign_id(api: &mut Self::Api, id: &str) {
        api.id = Some(id.to_owned());
    }
}
