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

//! Provider block, with its environment variable fallbacks.

use std::borrow::Cow;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueNumber, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};
use url::Url;

use crate::client::ClientSettings;
use crate::tristate;
use crate::utils::{known_number, WithSchema, WithValidate};

const DEFAULT_TIMEOUT: i64 = 60;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig<'a> {
    pub base_url: ValueString<'a>,
    pub username: ValueString<'a>,
    pub password: ValueString<'a>,
    pub debug: ValueString<'a>,
    pub ssl_verify: ValueString<'a>,
    pub use_api_gateway: ValueString<'a>,
    pub use_csrf_token: ValueString<'a>,
    pub single_request_timeout: ValueNumber,
}

/// Name of the environment variable backing a provider attribute
fn env_var(attribute: &str) -> String {
    format!("ISE_{}", attribute.to_ascii_uppercase())
}

impl<'a> ProviderConfig<'a> {
    /// Fill every attribute left unset with its environment variable.
    ///
    /// Unknown values are kept: they are only resolved at apply time.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fill = |value: &mut ValueString<'a>, attribute: &str| {
            let unset = value.as_deref_option().map_or(!value.is_unknown(), str::is_empty);
            if unset {
                if let Some(from_env) = lookup(&env_var(attribute)) {
                    *value = Value::Value(Cow::Owned(from_env));
                }
            }
        };
        fill(&mut self.base_url, "base_url");
        fill(&mut self.username, "username");
        fill(&mut self.password, "password");
        fill(&mut self.debug, "debug");
        fill(&mut self.ssl_verify, "ssl_verify");
        fill(&mut self.use_api_gateway, "use_api_gateway");
        fill(&mut self.use_csrf_token, "use_csrf_token");

        if self.single_request_timeout.is_null() {
            let from_env = lookup(&env_var("single_request_timeout"));
            if let Some(timeout) = from_env.and_then(|timeout| timeout.trim().parse().ok()) {
                self.single_request_timeout = Value::Value(timeout);
            }
        }
        self
    }

    /// Resolve the settings of the HTTP client, reporting every invalid attribute
    pub fn settings(&self, diags: &mut Diagnostics) -> Option<ClientSettings> {
        let errors = diags.errors.len();
        self.validate(diags, AttributePath::default());
        if diags.errors.len() > errors {
            return None;
        }

        let required = |value: &ValueString| value.as_deref_option().unwrap_or_default().to_owned();
        let base_url = Url::parse(self.base_url.as_deref_option().unwrap_or_default()).ok()?;
        let flag = |value: &ValueString, default: bool| tristate::expand(value).unwrap_or(default);
        let timeout = known_number(&self.single_request_timeout).unwrap_or(DEFAULT_TIMEOUT);

        Some(ClientSettings {
            base_url,
            username: required(&self.username),
            password: required(&self.password),
            debug: flag(&self.debug, false),
            ssl_verify: flag(&self.ssl_verify, true),
            use_api_gateway: flag(&self.use_api_gateway, false),
            use_csrf_token: flag(&self.use_csrf_token, false),
            timeout: Duration::from_secs(timeout.unsigned_abs()),
        })
    }
}

impl<'a> WithValidate for ProviderConfig<'a> {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        for (name, value) in [
            ("base_url", &self.base_url),
            ("username", &self.username),
            ("password", &self.password),
        ] {
            if value.is_unknown() {
                continue;
            }
            if value.as_deref_option().unwrap_or_default().is_empty() {
                diags.error(
                    format!("Missing `{name}`"),
                    format!(
                        "Set `{name}` in the provider block or the {} environment variable.",
                        env_var(name)
                    ),
                    attr_path.clone().attribute(name),
                );
            }
        }

        if let Some(base_url) = self.base_url.as_deref_option().filter(|url| !url.is_empty()) {
            match Url::parse(base_url) {
                Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => (),
                Ok(_) => diags.error(
                    "Invalid `base_url`",
                    format!("`{base_url}` is not an http(s) URL."),
                    attr_path.clone().attribute("base_url"),
                ),
                Err(err) => diags.error(
                    "Invalid `base_url`",
                    format!("`{base_url}`: {err}"),
                    attr_path.clone().attribute("base_url"),
                ),
            }
        }

        for (name, value) in [
            ("debug", &self.debug),
            ("ssl_verify", &self.ssl_verify),
            ("use_api_gateway", &self.use_api_gateway),
            ("use_csrf_token", &self.use_csrf_token),
        ] {
            tristate::validate(diags, value, attr_path.clone().attribute(name));
        }

        if let Some(timeout) = known_number(&self.single_request_timeout) {
            if timeout <= 0 {
                diags.error(
                    "Invalid `single_request_timeout`",
                    format!("The timeout is a number of seconds above 0, got {timeout}."),
                    attr_path.attribute("single_request_timeout"),
                );
            }
        }
    }
}

impl<'a> WithSchema for ProviderConfig<'a> {
    fn schema() -> Schema {
        let string = |description: String, sensitive: bool| Attribute {
            attr_type: AttributeType::String,
            description: Description::plain(description),
            constraint: AttributeConstraint::Optional,
            sensitive,
            ..Default::default()
        };
        let flag = |description: &str, default: bool| {
            string(
                format!(
                    "{description} (one of \"\", \"true\", \"false\", default \"{default}\")"
                ),
                false,
            )
        };

        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "base_url" => string("URL of the appliance, e.g. `https://ise.example.com`".into(), false),
                    "username" => string("Login of the API user".into(), false),
                    "password" => string("Password of the API user".into(), true),
                    "debug" => flag("Log request and response bodies", false),
                    "ssl_verify" => flag("Verify the TLS certificate of the appliance", true),
                    "use_api_gateway" => flag("Reach every API through the API gateway", false),
                    "use_csrf_token" => flag("Send a CSRF token with every change", false),
                    "single_request_timeout" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain(format!(
                            "Timeout of a single request, in seconds (default {DEFAULT_TIMEOUT})"
                        )),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                description: Description::plain(
                    "Identity Services Engine. Every attribute may be set through its `ISE_<ATTRIBUTE>` environment variable instead.",
                ),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn config<'a>() -> ProviderConfig<'a> {
        ProviderConfig {
            base_url: Value::Value(Cow::Borrowed("https://ise.example.com")),
            username: Value::Value(Cow::Borrowed("admin")),
            password: Value::Value(Cow::Borrowed("secret")),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_apply() {
        let mut diags = Diagnostics::default();
        let settings = config().settings(&mut diags).unwrap();
        assert!(!settings.debug);
        assert!(settings.ssl_verify);
        assert!(!settings.use_api_gateway);
        assert!(!settings.use_csrf_token);
        assert_eq!(settings.timeout, Duration::from_secs(60));
        assert_eq!(settings.username, "admin");
    }

    #[test]
    fn environment_fills_unset_attributes_only() {
        let vars = [
            ("ISE_BASE_URL", "https://other.example.com"),
            ("ISE_SSL_VERIFY", "false"),
            ("ISE_SINGLE_REQUEST_TIMEOUT", "5"),
            ("ISE_USERNAME", "ignored"),
        ];
        let mut diags = Diagnostics::default();
        let settings = ProviderConfig {
            base_url: Value::Null,
            ..config()
        }
        .with_env(env(&vars))
        .settings(&mut diags)
        .unwrap();

        assert_eq!(settings.base_url.as_str(), "https://other.example.com/");
        assert_eq!(settings.username, "admin");
        assert!(!settings.ssl_verify);
        assert_eq!(settings.timeout, Duration::from_secs(5));
    }

    #[test]
    fn every_missing_attribute_is_reported() {
        let mut diags = Diagnostics::default();
        let settings = ProviderConfig::default().with_env(env(&[])).settings(&mut diags);
        assert!(settings.is_none());
        assert_eq!(diags.errors.len(), 3);
    }

    #[test]
    fn malformed_attributes_are_reported() {
        let mut diags = Diagnostics::default();
        let config = ProviderConfig {
            base_url: Value::Value(Cow::Borrowed("ise.example.com")),
            debug: Value::Value(Cow::Borrowed("yes")),
            single_request_timeout: Value::Value(0),
            ..config()
        };
        assert!(config.settings(&mut diags).is_none());
        assert_eq!(diags.errors.len(), 3);
    }
}
