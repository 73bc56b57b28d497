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

//! Generic Terraform resource and data source over one API collection.
//!
//! An object type plugs into the engine by implementing [`IseObject`]: a
//! static field table for the schema, the typed API struct, the typed state
//! model and the flatten/expand pair converting between both.

use std::collections::HashMap;
use std::fmt::Debug;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Description};
use tf_provider::value::{ValueList, ValueString};
use tf_provider::value::Value;
use tf_provider::{map, AttributePath, Diagnostics};

use crate::client::{Endpoint, Link, Summary};
use crate::lookup::Identity;
use crate::utils::{list_of_one, string_value};

mod data_source;
mod normalize;
mod resource;
mod state;
mod validate;

pub use data_source::IseDataSource;
pub use resource::IseResource;
pub use state::{DataSourceState, ResourceState};

/// How a field is stored in Terraform state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    /// Boolean stored as a `""`/`"true"`/`"false"` string
    TriState,
    Number,
    StringList,
    /// The `link` sub-object of ERS objects
    Link,
}

/// Who may set a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Required,
    Optional,
    /// Only ever set by the server
    Computed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub access: Access,
    pub sensitive: bool,
    pub description: &'static str,
}

impl Field {
    pub const fn required(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            access: Access::Required,
            sensitive: false,
            description,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            access: Access::Optional,
            sensitive: false,
            description,
        }
    }

    pub const fn computed(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            access: Access::Computed,
            sensitive: false,
            description,
        }
    }

    pub const fn sensitive(self) -> Self {
        Self {
            sensitive: true,
            ..self
        }
    }
}

/// Which block of the state a set of attributes describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// User supplied `parameters`
    Parameters,
    /// Server side `item`: everything is computed
    Item,
}

fn link_fields() -> &'static [Field] {
    const LINK: &[Field] = &[
        Field::computed("rel", FieldKind::String, "Relation of the link"),
        Field::computed("href", FieldKind::String, "URL of the object"),
        Field::computed("type", FieldKind::String, "Media type of the object"),
    ];
    LINK
}

/// Build the nested attributes describing `fields`
pub fn attributes(fields: &[Field], mode: Mode) -> HashMap<String, Attribute> {
    fields
        .iter()
        .map(|field| {
            let attr_type = match field.kind {
                FieldKind::String | FieldKind::TriState => AttributeType::String,
                FieldKind::Number => AttributeType::Number,
                FieldKind::StringList => AttributeType::List(Box::new(AttributeType::String)),
                FieldKind::Link => AttributeType::AttributeList(attributes(link_fields(), Mode::Item)),
            };
            let constraint = match (mode, field.access) {
                (Mode::Item, _) | (_, Access::Computed) => AttributeConstraint::Computed,
                (Mode::Parameters, Access::Required) => AttributeConstraint::Required,
                (Mode::Parameters, Access::Optional) => AttributeConstraint::Optional,
            };
            let description = if field.kind == FieldKind::TriState {
                format!("{} (one of \"\", \"true\", \"false\")", field.description)
            } else {
                field.description.to_owned()
            };
            (
                field.name.to_owned(),
                Attribute {
                    attr_type,
                    description: Description::plain(description),
                    constraint,
                    sensitive: field.sensitive,
                    ..Default::default()
                },
            )
        })
        .collect()
}

/// One object type of the appliance
pub trait IseObject: Debug + Default + Clone + PartialEq + Eq + Send + Sync + 'static {
    /// API name of the object, used in diagnostics
    const KIND: &'static str;
    const DESCRIPTION: &'static str;
    const ENDPOINT: Endpoint;
    const FIELDS: &'static [Field];

    /// Typed request/response body
    type Api: Debug + Default + Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync;

    /// Typed state of one `parameters` or `item` element
    type Model<'a>: Debug
        + Default
        + Clone
        + PartialEq
        + Eq
        + Serialize
        + for<'de> Deserialize<'de>
        + Send
        + Sync;

    /// Natural keys the user supplied
    fn identity(model: &Self::Model<'_>) -> Identity;

    /// Natural keys of an object returned by the API
    fn api_identity(api: &Self::Api) -> Identity;

    /// `None` in, `None` out
    fn flatten<'a>(api: Option<&Self::Api>) -> Option<Self::Model<'a>>;

    /// `None` when the request would be empty.
    ///
    /// `prior` is the model of the previous apply: fields it held that are
    /// now empty are sent cleared.
    fn expand(model: &Self::Model<'_>, prior: Option<&Self::Model<'_>>) -> Option<Self::Api>;

    /// Stamp the definitive id into an update request
    fn assign_id(_api: &mut Self::Api, _id: &str) {}

    /// Checks beyond what the schema expresses
    fn validate(_model: &Self::Model<'_>, _diags: &mut Diagnostics, _attr_path: AttributePath) {}
}

/// State of the `link` sub-object
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkModel<'a> {
    pub rel: ValueString<'a>,
    pub href: ValueString<'a>,
    pub r#type: ValueString<'a>,
}

pub fn flatten_link<'a>(link: Option<&Link>) -> ValueList<Value<LinkModel<'a>>> {
    list_of_one(link.map(|link| LinkModel {
        rel: string_value(link.rel.as_deref()),
        href: string_value(link.href.as_deref()),
        r#type: string_value(link.r#type.as_deref()),
    }))
}

/// State of one element of a data source `items` list
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryModel<'a> {
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub description: ValueString<'a>,
    pub link: ValueList<Value<LinkModel<'a>>>,
}

pub fn summary_attributes() -> HashMap<String, Attribute> {
    const SUMMARY: &[Field] = &[
        Field::computed("id", FieldKind::String, "Id of the object"),
        Field::computed("name", FieldKind::String, "Name of the object"),
        Field::computed("description", FieldKind::String, "Description of the object"),
        Field::computed("link", FieldKind::Link, "Link to the object"),
    ];
    attributes(SUMMARY, Mode::Item)
}

pub fn flatten_summaries<'a>(summaries: Option<&[Summary]>) -> Option<Vec<Value<SummaryModel<'a>>>> {
    summaries.map(|summaries| {
        summaries
            .iter()
            .map(|summary| {
                Value::Value(SummaryModel {
                    id: string_value(summary.id.as_deref()),
                    name: string_value(summary.name.as_deref()),
                    description: string_value(summary.description.as_deref()),
                    link: flatten_link(summary.link.as_ref()),
                })
            })
            .collect()
    })
}

/// Schema of the `parameters` and `item` blocks of a resource
pub fn block_attributes<T: IseObject>() -> HashMap<String, Attribute> {
    map! {
        "parameters" => Attribute {
            attr_type: AttributeType::AttributeList(attributes(T::FIELDS, Mode::Parameters)),
            description: Description::plain(format!("{} to manage (a single element)", T::KIND)),
            constraint: AttributeConstraint::Required,
            ..Default::default()
        },
        "item" => Attribute {
            attr_type: AttributeType::AttributeList(attributes(T::FIELDS, Mode::Item)),
            description: Description::plain(format!("{} as last read from the API", T::KIND)),
            constraint: AttributeConstraint::Computed,
            ..Default::default()
        },
    }
}
