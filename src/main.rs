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

use anyhow::Result;
use tf_provider::serve;
use tracing_subscriber::EnvFilter;

use terraform_provider_ise::IseProvider;

/// Environment variable holding the log filter, e.g. `terraform_provider_ise=debug`
const LOG_ENV: &str = "TF_ISE_LOG";

fn setup_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries the plugin handshake
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting provider");

    serve("ise", IseProvider::default()).await
}
