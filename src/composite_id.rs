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

//! Terraform resource ids built from the natural keys of an object.
//!
//! An id is a list of `key:=value` pairs joined by `\`, e.g.
//! `id:=1f7b\name:=Guests`. Keys and values are percent-encoded, so they may
//! contain the separators themselves.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

use crate::client::Keys;
use crate::lookup::Identity;
use crate::utils::DisplayJoinable;

const PAIR_SEPARATOR: char = '\\';
const KEY_SEPARATOR: &str = ":=";
/// Keys an id made by this provider may hold
const KNOWN_KEYS: [&str; 3] = ["id", "name", "settings"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositeIdError {
    #[error("the id is empty")]
    Empty,
    #[error("`{0}` is not a `key:=value` pair")]
    MissingSeparator(String),
    #[error("`{0}` is not correctly percent-encoded")]
    BadEncoding(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeId {
    pairs: BTreeMap<String, String>,
}

impl CompositeId {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn decode(id: &str) -> Result<Self, CompositeIdError> {
        if id.is_empty() {
            return Err(CompositeIdError::Empty);
        }

        let decode = |s: &str| {
            urlencoding::decode(s)
                .map(|s| s.into_owned())
                .map_err(|_| CompositeIdError::BadEncoding(s.to_owned()))
        };

        let mut pairs = BTreeMap::new();
        for pair in id.split(PAIR_SEPARATOR) {
            let (key, value) = pair
                .split_once(KEY_SEPARATOR)
                .ok_or_else(|| CompositeIdError::MissingSeparator(pair.to_owned()))?;
            pairs.insert(decode(key)?, decode(value)?);
        }
        Ok(Self { pairs })
    }

    /// Decode an id given by `terraform import`.
    ///
    /// Besides encoded ids, a bare key is accepted: an id for id-keyed
    /// objects, a name for name-keyed ones. Anything that does not decode
    /// into known keys only is taken as a bare key, so names may contain `:=`.
    pub fn parse_import(id: &str, keys: Keys) -> Result<Self, CompositeIdError> {
        let encoded = Self::decode(id).ok().filter(|decoded| {
            decoded
                .pairs
                .keys()
                .all(|key| KNOWN_KEYS.contains(&key.as_str()))
        });
        if let Some(encoded) = encoded {
            return Ok(encoded);
        }
        if id.is_empty() {
            return Err(CompositeIdError::Empty);
        }
        Ok(match keys {
            Keys::IdAndName { .. } => Self::new().with("id", id),
            Keys::NameOnly => Self::new().with("name", id),
            Keys::Singleton => Self::new().with("settings", id),
        })
    }

    pub fn identity(&self) -> Identity {
        Identity::new(
            self.get("id").map(str::to_owned),
            self.get("name").map(str::to_owned),
        )
    }
}

impl From<&Identity> for CompositeId {
    fn from(identity: &Identity) -> Self {
        let mut id = CompositeId::new();
        if let Some(value) = &identity.id {
            id = id.with("id", value.as_str());
        }
        if let Some(value) = &identity.name {
            id = id.with("name", value.as_str());
        }
        id
    }
}

impl Display for CompositeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pairs = self.pairs.iter().map(|(key, value)| {
            format!(
                "{}{KEY_SEPARATOR}{}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        });
        write!(f, "{}", pairs.join_with(&PAIR_SEPARATOR.to_string()))
    }
}

impl FromStr for CompositeId {
    type Err = CompositeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
