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
pub struct IdentityGroup;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityGroupApi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing)]
    pub link: Option<Link>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityGroupModel<'a> {
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub description: ValueString<'a>,
    pub parent: ValueString<'a>,
    pub link: ValueList<Value<LinkModel<'a>>>,
}

impl IseObject for IdentityGroup {
    const KIND: &'static str = "IdentityGroup";
    const DESCRIPTION: &'static str = "User identity group";
    const ENDPOINT: Endpoint = Endpoint {
        path: "/ers/config/identitygroup",
        family: Family::Ers {
            wrapper: "IdentityGroup",
        },
        keys: Keys::IdAndName { by_name: true },
    };
    const FIELDS: &'static [Field] = &[
        Field::computed("id", FieldKind::String, "Id of the group"),
        Field::required("name", FieldKind::String, "Name of the group"),
        Field::optional("description", FieldKind::String, "Description of the group"),
        Field::optional(
            "parent",
            FieldKind::String,
            "Parent group, e.g. `NAC Group:NAC:IdentityGroups:User Identity Groups`",
        ),
        Field::computed("link", FieldKind::Link, "Link to the group"),
    ];

    type Api = IdentityGroupApi;
    type Model<'a> = IdentityGroupModel<'a>;

    fn identity(model: &Self::Model<'_>) -> Identity {
        Identity::new(known_string(&model.id), known_string(&model.name))
    }

    fn api_identity(api: &Self::Api) -> Identity {
        Identity::new(api.id.clone(), api.name.clone())
    }

    fn flatten<'a>(api: Option<&Self::Api>) -> Option<Self::Model<'a>> {
        api.map(|api| IdentityGroupModel {
            id: string_value(api.id.as_deref()),
            name: string_value(api.name.as_deref()),
            description: string_value(api.description.as_deref()),
            parent: string_value(api.parent.as_deref()),
            link: flatten_link(api.link.as_ref()),
        })
    }

    fn expand(model: &Self::Model<'_>, prior: Option<&Self::Model<'_>>) -> Option<Self::Api> {
        non_empty(IdentityGroupApi {
            name: known_string(&model.name),
            description: expand_string(&model.description, prior.map(|prior| &prior.description)),
            parent: expand_string(&model.parent, prior.map(|prior| &prior.parent)),
            ..Default::default()
        })
    }

    fn assign_id(api: &mut Self::Api, id: &str) {
        api.id = Some(id.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;

    #[test]
    fn empty_strings_are_not_sent() {
        let model = IdentityGroupModel {
            name: Value::Value(Cow::Borrowed("Contractors")),
            description: Value::Value(Cow::Borrowed("")),
            parent: Value::Unknown,
            ..Default::default()
        };
        let expanded = IdentityGroup::expand(&model, None).unwrap();
        assert_eq!(
            serde_json::to_value(expanded).unwrap(),
            serde_json::json!({"name": "Contractors"})
        );
    }

    #[test]
    fn emptied_parent_is_cleared() {
        let prior = IdentityGroupModel {
            name: Value::Value(Cow::Borrowed("Contractors")),
            parent: Value::Value(Cow::Borrowed("NAC Group:NAC:IdentityGroups:User Identity Groups")),
            ..Default::default()
        };
        let model = IdentityGroupModel {
            parent: Value::Value(Cow::Borrowed("")),
            ..prior.clone()
        };
        let expanded = IdentityGroup::expand(&model, Some(&prior)).unwrap();
        assert_eq!(expanded.parent.as_deref(), Some(""));
        assert_eq!(expanded.description, None);
    }

    #[test]
    fn nothing_in_nothing_out() {
        assert_eq!(IdentityGroup::flatten(None), None);
        assert_eq!(IdentityGroup::expand(&Default::default(), None), None);
    }
}
