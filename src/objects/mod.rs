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

//! Object types exposed by the provider, each both as a resource and a data source.

mod identity_group;
mod internal_user;
mod network_device_group;
mod proxy_connection_settings;
mod repository;
mod sgt;

pub use identity_group::IdentityGroup;
pub use internal_user::InternalUser;
pub use network_device_group::NetworkDeviceGroup;
pub use proxy_connection_settings::ProxyConnectionSettings;
pub use repository::Repository;
pub use sgt::Sgt;

use tf_provider::value::{Value, ValueNumber, ValueString};

use crate::tristate;
use crate::utils::{known_number, known_str, known_string};

/// `None` for a request without any field set
fn non_empty<T: Default + PartialEq>(request: T) -> Option<T> {
    if request == T::default() {
        None
    } else {
        Some(request)
    }
}

/// `value` when set; `cleared` when the field held a value before and was emptied since
fn or_cleared<T, V>(value: Option<T>, current: &Value<V>, was_set: bool, cleared: T) -> Option<T> {
    match value {
        Some(value) => Some(value),
        None if was_set && !current.is_unknown() => Some(cleared),
        None => None,
    }
}

/// String to send; `""` clears a string set by a previous apply
fn expand_string(current: &ValueString<'_>, prior: Option<&ValueString<'_>>) -> Option<String> {
    let was_set = prior.and_then(known_str).is_some();
    or_cleared(known_string(current), current, was_set, String::new())
}

/// Flag to send; an explicit `null` clears a flag set by a previous apply
fn expand_flag(current: &ValueString<'_>, prior: Option<&ValueString<'_>>) -> Option<Option<bool>> {
    let was_set = prior.and_then(tristate::expand).is_some();
    or_cleared(tristate::expand(current).map(Some), current, was_set, None)
}

fn expand_number(current: &ValueNumber, prior: Option<&ValueNumber>) -> Option<Option<i64>> {
    let was_set = prior.and_then(known_number).is_some();
    or_cleared(known_number(current).map(Some), current, was_set, None)
}
