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

use std::borrow::Cow;
use std::cell::RefCell;

use tf_provider::value::{Value, ValueList, ValueNumber, ValueString};
use tf_provider::schema::Schema;
use tf_provider::{AttributePath, Diagnostics};

use crate::client::ApiError;

pub(crate) trait WithSchema {
    fn schema() -> Schema;
}

pub(crate) trait WithValidate {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath);
}

pub(crate) trait WithNormalize {
    fn normalize(&mut self, diags: &mut Diagnostics);
}

/// Non-empty string held by a known value
pub fn known_str<'v>(value: &'v ValueString<'_>) -> Option<&'v str> {
    value.as_deref_option().filter(|s| !s.is_empty())
}

pub fn known_string(value: &ValueString<'_>) -> Option<String> {
    known_str(value).map(str::to_owned)
}

/// Null when absent
pub fn string_value<'a>(value: Option<&str>) -> ValueString<'a> {
    match value {
        Some(value) => Value::Value(Cow::Owned(value.to_owned())),
        None => Value::Null,
    }
}

pub fn known_number(value: &ValueNumber) -> Option<i64> {
    value.as_ref_option().copied()
}

pub fn number_value(value: Option<i64>) -> ValueNumber {
    value.map_or(Value::Null, Value::Value)
}

/// Known, non-empty elements of a string list; `None` when the list itself is not set
pub fn known_strings(value: &ValueList<ValueString<'_>>) -> Option<Vec<String>> {
    let list = value.as_ref_option()?;
    Some(list.iter().filter_map(known_string).collect())
}

pub fn strings_value<'a>(value: Option<&[String]>) -> ValueList<ValueString<'a>> {
    match value {
        Some(list) => Value::Value(list.iter().map(|s| string_value(Some(s))).collect()),
        None => Value::Null,
    }
}

/// The single element of a list-of-one block, if known
pub fn single<T>(value: &ValueList<Value<T>>) -> Option<&T> {
    value.as_ref_option()?.first()?.as_ref_option()
}

/// Wrap an optional object into Terraform's list-of-one convention
pub fn list_of_one<T>(value: Option<T>) -> ValueList<Value<T>> {
    match value {
        Some(value) => Value::Value(vec![Value::Value(value)]),
        None => Value::Null,
    }
}

/// Report a failed API call.
///
/// The raw response body, when there is one, becomes the detail of the
/// diagnostic; the error itself is used otherwise.
pub fn report_api_error(diags: &mut Diagnostics, summary: String, err: &ApiError) {
    tracing::error!(error = %err, "{summary}");
    match err.body() {
        Some(body) => diags.root_error(format!("{summary}: {err}"), body.to_owned()),
        None => diags.root_error(summary, err.to_string()),
    }
}

pub struct DisplayJoiner<'a, T, I>
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    iter: RefCell<T>,
    sep: &'a str,
}

pub trait DisplayJoinable {
    type Joiner<'a>;
    fn join_with(self, sep: &str) -> Self::Joiner<'_>;
}

impl<T, I> DisplayJoinable for T
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    type Joiner<'a> = DisplayJoiner<'a, T, I>;

    fn join_with(self, sep: &str) -> Self::Joiner<'_> {
        DisplayJoiner {
            iter: RefCell::new(self),
            sep,
        }
    }
}

impl<'a, T, I> std::fmt::Display for DisplayJoiner<'a, T, I>
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut sep = "";
        let mut iter = self.iter.try_borrow_mut().or(Err(std::fmt::Error))?;
        for elt in iter.by_ref() {
            f.write_str(sep)?;
            f.write_fmt(format_args!("{elt}"))?;
            sep = self.sep;
        }
        Ok(())
    }
}
