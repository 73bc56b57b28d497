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
use tf_provider::value::{Value, ValueList, ValueNumber, ValueString};
use tf_provider::{AttributePath, Diagnostics};

use crate::client::{Endpoint, Family, Keys, Link};
use crate::lookup::Identity;
use crate::object::{flatten_link, Field, FieldKind, IseObject, LinkModel};
use crate::tristate;
use crate::utils::{known_number, known_string, number_value, string_value};

use super::{expand_flag, expand_string, non_empty};

/// Tag values the appliance accepts
const VALUES: std::ops::RangeInclusive<i64> = 2..=65519;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Sgt;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SgtApi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    #[serde(default, skip_serializing)]
    pub generation_id: Option<String>,
    #[serde(default, skip_serializing)]
    pub is_read_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub propogate_to_apic: Option<Option<bool>>,
    #[serde(default, skip_serializing)]
    pub link: Option<Link>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SgtModel<'a> {
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub description: ValueString<'a>,
    pub value: ValueNumber,
    pub generation_id: ValueString<'a>,
    pub is_read_only: ValueString<'a>,
    pub propogate_to_apic: ValueString<'a>,
    pub link: ValueList<Value<LinkModel<'a>>>,
}

impl IseObject for Sgt {
    const KIND: &'static str = "Sgt";
    const DESCRIPTION: &'static str = "Security group tag";
    const ENDPOINT: Endpoint = Endpoint {
        path: "/ers/config/sgt",
        family: Family::Ers { wrapper: "Sgt" },
        keys: Keys::IdAndName { by_name: false },
    };
    const FIELDS: &'static [Field] = &[
        Field::computed("id", FieldKind::String, "Id of the tag"),
        Field::required("name", FieldKind::String, "Name of the tag"),
        Field::optional("description", FieldKind::String, "Description of the tag"),
        Field::required("value", FieldKind::Number, "Tag value, between 2 and 65519"),
        Field::computed("generation_id", FieldKind::String, "Generation of the tag"),
        Field::computed("is_read_only", FieldKind::TriState, "Whether the tag is built-in"),
        Field::optional(
            "propogate_to_apic",
            FieldKind::TriState,
            "Whether the tag is propagated to APIC",
        ),
        Field::computed("link", FieldKind::Link, "Link to the tag"),
    ];

    type Api = SgtApi;
    type Model<'a> = SgtModel<'a>;

    fn identity(model: &Self::Model<'_>) -> Identity {
        Identity::new(known_string(&model.id), known_string(&model.name))
    }

    fn api_identity(api: &Self::Api) -> Identity {
        Identity::new(api.id.clone(), api.name.clone())
    }

    fn flatten<'a>(api: Option<&Self::Api>) -> Option<Self::Model<'a>> {
        let api = api?;
        Some(SgtModel {
            id: string_value(api.id.as_deref()),
            name: string_value(api.name.as_deref()),
            description: string_value(api.description.as_deref()),
            value: number_value(api.value),
            generation_id: string_value(api.generation_id.as_deref()),
            is_read_only: tristate::flatten(api.is_read_only),
            propogate_to_apic: tristate::flatten(api.propogate_to_apic.flatten()),
            link: flatten_link(api.link.as_ref()),
        })
    }

    fn expand(model: &Self::Model<'_>, prior: Option<&Self::Model<'_>>) -> Option<Self::Api> {
        non_empty(SgtApi {
            name: known_string(&model.name),
            description: expand_string(&model.description, prior.map(|prior| &prior.description)),
            value: known_number(&model.value),
            propogate_to_apic: expand_flag(
                &model.propogate_to_apic,
                prior.map(|prior| &prior.propogate_to_apic),
            ),
            ..Default::default()
        })
    }

    fn assign_id(api: &mut Self::Api, id: &str) {
        api.id = Some(id.to_owned());
    }

    fn validate(model: &Self::Model<'_>, diags: &mut Diagnostics, attr_path: AttributePath) {
        if let Some(value) = known_number(&model.value) {
            if !VALUES.contains(&value) {
                diags.error(
                    "Invalid tag value",
                    format!(
                        "The tag value must be between {} and {}, got {value}.",
                        VALUES.start(),
                        VALUES.end()
                    ),
                    attr_path.clone().attribute("value"),
                );
            }
        }
        tristate::validate(
            diags,
            &model.propogate_to_apic,
            attr_path.attribute("propogate_to_apic"),
        );
    }
}
