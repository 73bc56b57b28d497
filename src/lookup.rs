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

use std::fmt::Display;

use crate::client::{Keys, ListQuery};
use crate::utils::DisplayJoinable;

/// Natural keys of an object, as far as they are known
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl Identity {
    pub fn new(id: Option<String>, name: Option<String>) -> Self {
        Self {
            id: id.filter(|id| !id.is_empty()),
            name: name.filter(|name| !name.is_empty()),
        }
    }

    pub fn by_id(id: String) -> Self {
        Self::new(Some(id), None)
    }

    pub fn by_name(name: String) -> Self {
        Self::new(None, Some(name))
    }

    /// Keep the keys of `self`, completing them with the ones of `other`
    pub fn or(self, other: Identity) -> Self {
        Self {
            id: self.id.or(other.id),
            name: self.name.or(other.name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none()
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys = [("id", &self.id), ("name", &self.name)];
        let keys = keys
            .iter()
            .filter_map(|(key, value)| Some(format!("{key} `{}`", value.as_ref()?)));
        if self.is_empty() {
            f.write_str("<no key>")
        } else {
            write!(f, "{}", keys.join_with(", "))
        }
    }
}

/// Retrieval strategies, ordered by priority: the most specific comes first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LookupKind {
    ById,
    ByName,
    List,
}

/// Pick the highest priority strategy whose arguments were (at least partly) supplied.
///
/// `None` means no argument was supplied at all: callers fall back to the
/// unfiltered list.
pub fn pick_method(candidates: &[(LookupKind, &[bool])]) -> Option<LookupKind> {
    candidates
        .iter()
        .filter(|(_, presence)| presence.iter().any(|set| *set))
        .map(|(kind, _)| *kind)
        .min()
}

/// How to retrieve an object, with the keys the strategy needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupStrategy {
    Singleton,
    ById(String),
    ByName(String),
    /// List call; an all-default query is the unfiltered list
    List(ListQuery),
}

impl LookupStrategy {
    pub fn select(keys: Keys, identity: &Identity, query: ListQuery) -> Self {
        if keys == Keys::Singleton {
            return LookupStrategy::Singleton;
        }

        let by_id: &[bool] = &[identity.id.is_some() && keys != Keys::NameOnly];
        let by_name: &[bool] = &[identity.name.is_some()];
        let list: &[bool] = &query.presence();

        match pick_method(&[
            (LookupKind::ById, by_id),
            (LookupKind::ByName, by_name),
            (LookupKind::List, list),
        ]) {
            Some(LookupKind::ById) => LookupStrategy::ById(identity.id.clone().unwrap_or_default()),
            Some(LookupKind::ByName) => {
                LookupStrategy::ByName(identity.name.clone().unwrap_or_default())
            }
            Some(LookupKind::List) | None => LookupStrategy::List(query),
        }
    }
}
