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

//! Booleans stored as `""`/`"true"`/`"false"` strings, so that an unset
//! flag stays distinguishable from an explicit `false`.

use std::borrow::Cow;

use tf_provider::value::{Value, ValueString};
use tf_provider::{AttributePath, Diagnostics};

pub const VALUES: [&str; 3] = ["", "true", "false"];

/// `None` for unset or unparsable values
pub fn expand(value: &ValueString<'_>) -> Option<bool> {
    match value.as_deref_option()? {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

pub fn flatten<'a>(value: Option<bool>) -> ValueString<'a> {
    match value {
        Some(true) => Value::Value(Cow::Borrowed("true")),
        Some(false) => Value::Value(Cow::Borrowed("false")),
        None => Value::Null,
    }
}

pub fn validate(diags: &mut Diagnostics, value: &ValueString<'_>, attr_path: AttributePath) {
    if let Some(value) = value.as_deref_option() {
        if !VALUES.contains(&value) {
            diags.error(
                "Invalid boolean value",
                format!("Expected one of \"\", \"true\" or \"false\", got {value:?}."),
                attr_path,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_false_is_kept() {
        assert_eq!(expand(&flatten(Some(false))), Some(false));
        assert_eq!(expand(&flatten(Some(true))), Some(true));
        assert_eq!(flatten(None), Value::Null);
        assert_eq!(expand(&Value::Value(Cow::Borrowed(""))), None);
        assert_eq!(expand(&Value::Unknown), None);
    }

    #[test]
    fn only_tristate_strings_are_valid() {
        let mut diags = Diagnostics::default();
        for value in VALUES {
            validate(&mut diags, &Value::Value(Cow::Borrowed(value)), AttributePath::new("enabled"));
        }
        validate(&mut diags, &Value::Unknown, AttributePath::new("enabled"));
        assert!(diags.errors.is_empty());

        validate(&mut diags, &Value::Value(Cow::Borrowed("yes")), AttributePath::new("enabled"));
        assert_eq!(diags.errors.len(), 1);
    }
}
