// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::time::Duration;

// Env values used by the wallet client.
pub const HALOGEN_WALLET_ENDPOINT: &str = "HALOGEN_WALLET_ENDPOINT";
pub const HALOGEN_WALLET_TIMEOUT_SECS: &str = "HALOGEN_WALLET_TIMEOUT_SECS";
pub const HALOGEN_WALLET_MAX_READ_RETRY: &str = "HALOGEN_WALLET_MAX_READ_RETRY";
pub const HALOGEN_WALLET_RETRY_INTERVAL_MS: &str = "HALOGEN_WALLET_RETRY_INTERVAL_MS";
pub const HALOGEN_WALLET_DEBUG: &str = "HALOGEN_WALLET_DEBUG";

pub const DEFAULT_ENDPOINT: &str = "https://external-api.wallet.halogen.my";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_READ_RETRY: usize = 5;
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(50);
pub const DEFAULT_TOKEN_VALIDITY: Duration = Duration::from_secs(60 * 60);

pub const USER_AGENT: &str = concat!("wallet/", env!("CARGO_PKG_VERSION"), " lang/rust");

// Token values.
pub const TOKEN_SUBJECT: &str = "wallet";
pub const TOKEN_TYPE: &str = "JWT";
pub const NONCE_LENGTH: usize = 16;
pub const MIN_RSA_KEY_BITS: usize = 2048;
