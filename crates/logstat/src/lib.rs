// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod constants;
pub mod download;
pub mod errors;
pub mod line;
pub mod logstat;
pub mod mutation;
pub mod package;
pub mod source;
pub mod stats;
pub mod store;
pub mod store_service;
pub mod user_agent;
