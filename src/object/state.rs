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
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueList, ValueNumber, ValueString};
use tf_provider::map;

use crate::client::{Keys, ListQuery};
use crate::composite_id::{CompositeId, CompositeIdError};
use crate::lookup::Identity;
use crate::utils::{known_number, known_str, known_string, known_strings, single, WithSchema};

use super::{attributes, block_attributes, summary_attributes, IseObject, Mode, SummaryModel};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct ResourceState<'a, T: IseObject> {
    pub id: ValueString<'a>,
    pub last_updated: ValueString<'a>,
    pub parameters: ValueList<Value<T::Model<'a>>>,
    pub item: ValueList<Value<T::Model<'a>>>,
}

impl<'a, T: IseObject> ResourceState<'a, T> {
    /// Keys recorded in the state id, completed by the ones in `parameters`
    pub fn identity(&self) -> Result<Identity, CompositeIdError> {
        let from_parameters = single(&self.parameters)
            .map(T::identity)
            .unwrap_or_default();
        match known_str(&self.id) {
            Some(id) => Ok(CompositeId::decode(id)?.identity().or(from_parameters)),
            None => Ok(from_parameters),
        }
    }
}

impl<'a, T: IseObject> WithSchema for ResourceState<'a, T> {
    fn schema() -> Schema {
        let mut attributes = block_attributes::<T>();
        attributes.insert(
            "id".to_owned(),
            Attribute {
                attr_type: AttributeType::String,
                description: Description::plain(
                    "Composite id of the object, made of its natural keys",
                ),
                constraint: AttributeConstraint::Computed,
                ..Default::default()
            },
        );
        attributes.insert(
            "last_updated".to_owned(),
            Attribute {
                attr_type: AttributeType::String,
                description: Description::plain("Time of the last create or update"),
                constraint: AttributeConstraint::Computed,
                ..Default::default()
            },
        );

        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes,
                description: Description::plain(T::DESCRIPTION),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct DataSourceState<'a, T: IseObject> {
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub page: ValueNumber,
    pub size: ValueNumber,
    pub sortasc: ValueString<'a>,
    pub sortdsc: ValueString<'a>,
    pub filter: ValueList<ValueString<'a>>,
    pub filter_type: ValueString<'a>,
    pub item: ValueList<Value<T::Model<'a>>>,
    pub items: ValueList<Value<SummaryModel<'a>>>,
}

impl<'a, T: IseObject> DataSourceState<'a, T> {
    pub fn identity(&self) -> Identity {
        Identity::new(known_string(&self.id), known_string(&self.name))
    }

    pub fn query(&self) -> ListQuery {
        let positive = |value: &ValueNumber| known_number(value).and_then(|n| u32::try_from(n).ok());
        ListQuery {
            page: positive(&self.page),
            size: positive(&self.size),
            sortasc: known_string(&self.sortasc),
            sortdsc: known_string(&self.sortdsc),
            filter: known_strings(&self.filter).unwrap_or_default(),
            filter_type: known_string(&self.filter_type),
        }
    }
}

impl<'a, T: IseObject> WithSchema for DataSourceState<'a, T> {
    fn schema() -> Schema {
        let lookup = |description: &str| Attribute {
            attr_type: AttributeType::String,
            description: Description::plain(description),
            constraint: AttributeConstraint::OptionalComputed,
            ..Default::default()
        };
        let list_argument = |attr_type: AttributeType, description: &str| Attribute {
            attr_type,
            description: Description::plain(description),
            constraint: AttributeConstraint::Optional,
            ..Default::default()
        };

        let id_description = match T::ENDPOINT.keys {
            Keys::NameOnly => "Id of the object (read only: name-keyed objects are looked up by name)",
            Keys::Singleton => "Id of the settings object",
            Keys::IdAndName { .. } => "Id of the object to read",
        };

        let mut fields = map! {
            "id" => lookup(id_description),
            "name" => lookup("Name of the object to read"),
            "page" => list_argument(AttributeType::Number, "Page to start listing from"),
            "size" => list_argument(AttributeType::Number, "Number of objects per page"),
            "sortasc" => list_argument(AttributeType::String, "Field to sort ascending on"),
            "sortdsc" => list_argument(AttributeType::String, "Field to sort descending on"),
            "filter" => list_argument(
                AttributeType::List(Box::new(AttributeType::String)),
                "Filters, formatted as `field.OPERATOR.value`",
            ),
            "filter_type" => list_argument(AttributeType::String, "How filters combine: `and` or `or`"),
            "items" => Attribute {
                attr_type: AttributeType::AttributeList(summary_attributes()),
                description: Description::plain("Objects returned by the list call"),
                constraint: AttributeConstraint::Computed,
                ..Default::default()
            },
        };
        fields.insert(
            "item".to_owned(),
            Attribute {
                attr_type: AttributeType::AttributeList(attributes(T::FIELDS, Mode::Item)),
                description: Description::plain(format!("{} read by id or name", T::KIND)),
                constraint: AttributeConstraint::Computed,
                ..Default::default()
            },
        );

        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: fields,
                description: Description::plain(T::DESCRIPTION),
                ..Default::default()
            },
        }
    }
}
