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

use tf_provider::{AttributePath, Diagnostics};

use crate::client::Keys;
use crate::utils::{known_number, known_str, WithValidate};

use super::state::{DataSourceState, ResourceState};
use super::IseObject;

const MAX_PAGE_SIZE: i64 = 100;

impl<'a, T: IseObject> WithValidate for ResourceState<'a, T> {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        let Some(parameters) = self.parameters.as_ref_option() else {
            return;
        };

        if parameters.len() > 1 {
            diags.error(
                "Too many `parameters` elements",
                format!(
                    "`parameters` describes a single {}, but {} elements were given.",
                    T::KIND,
                    parameters.len()
                ),
                attr_path.clone().attribute("parameters"),
            );
        }

        for (i, model) in parameters.iter().enumerate() {
            if let Some(model) = model.as_ref_option() {
                T::validate(
                    model,
                    diags,
                    attr_path.clone().attribute("parameters").index(i as i64),
                );
            }
        }
    }
}

impl<'a, T: IseObject> WithValidate for DataSourceState<'a, T> {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if let Some(page) = known_number(&self.page) {
            if page < 1 {
                diags.error(
                    "Invalid page",
                    format!("Pages are numbered from 1, got {page}."),
                    attr_path.clone().attribute("page"),
                );
            }
        }
        if let Some(size) = known_number(&self.size) {
            if !(1..=MAX_PAGE_SIZE).contains(&size) {
                diags.error(
                    "Invalid page size",
                    format!("The page size must be between 1 and {MAX_PAGE_SIZE}, got {size}."),
                    attr_path.clone().attribute("size"),
                );
            }
        }
        if let Some(filter_type) = known_str(&self.filter_type) {
            if filter_type != "and" && filter_type != "or" {
                diags.error(
                    "Invalid filter type",
                    format!("`filter_type` must be `and` or `or`, got `{filter_type}`."),
                    attr_path.clone().attribute("filter_type"),
                );
            }
        }
        if known_str(&self.sortasc).is_some() && known_str(&self.sortdsc).is_some() {
            diags.error_short(
                "`sortasc` and `sortdsc` cannot be used together",
                attr_path.clone().attribute("sortdsc"),
            );
        }
        if T::ENDPOINT.keys == Keys::NameOnly && known_str(&self.id).is_some() {
            diags.warning(
                "`id` is ignored",
                format!("{} objects are looked up by name only.", T::KIND),
                attr_path.attribute("id"),
            );
        }
    }
}
