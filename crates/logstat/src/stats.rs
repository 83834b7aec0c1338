// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Mapping of a download to the store mutations that record it.
//!
//! Every download bumps seven aggregates: the global total, the per-gem and per-version
//! totals, the daily and all-time version leaderboards, and the daily history hashes of the
//! version and the gem. Client metadata adds up to four daily usage hashes, one per
//! non-empty field.

use chrono::NaiveDate;

use crate::constants::{
    DATE_FORMAT, DOWNLOADS, DOWNLOADS_ALL, DOWNLOADS_RUBYGEM, DOWNLOADS_TODAY,
    DOWNLOADS_VERSION, RUBYGEM_HISTORY, USAGE_RUBYGEM_VERSION, USAGE_RUBY_PLATFORM,
    USAGE_RUBY_RELEASE, USAGE_RUBY_VERSION, VERSION_HISTORY,
};
use crate::download::Download;
use crate::mutation::Mutation;

#[derive(Debug, Clone, Copy, Default)]
pub struct StatsAggregator;

impl StatsAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Mutations recording `download` on `today`, the date the batch is processed.
    pub fn mutations(&self, download: &Download, today: NaiveDate) -> Vec<Mutation> {
        let date = today.format(DATE_FORMAT).to_string();
        let gem = download.gem_name.as_str();
        let version = download.full_gem_name.as_str();

        let mut mutations = vec![
            incr(DOWNLOADS.to_string()),
            incr(format!("{DOWNLOADS_RUBYGEM}:{gem}")),
            incr(format!("{DOWNLOADS_VERSION}:{version}")),
            zincrby(format!("{DOWNLOADS_TODAY}:{date}"), version),
            zincrby(DOWNLOADS_ALL.to_string(), version),
            hincrby(format!("{VERSION_HISTORY}:{version}"), &date),
            hincrby(format!("{RUBYGEM_HISTORY}:{gem}"), &date),
        ];

        let client = &download.client;
        for (prefix, field) in [
            (USAGE_RUBYGEM_VERSION, &client.rubygems_version),
            (USAGE_RUBY_PLATFORM, &client.rubygems_platform),
            (USAGE_RUBY_VERSION, &client.ruby_version),
            (USAGE_RUBY_RELEASE, &client.ruby_release),
        ] {
            if !field.is_empty() {
                mutations.push(hincrby(format!("{prefix}:{date}"), field));
            }
        }

        mutations
    }
}

fn incr(key: String) -> Mutation {
    Mutation::IncrementCounter { key }
}

fn zincrby(key: String, member: &str) -> Mutation {
    Mutation::IncrementSortedSetMember {
        key,
        member: member.to_string(),
        delta: 1,
    }
}

fn hincrby(key: String, field: &str) -> Mutation {
    Mutation::IncrementHashField {
        key,
        field: field.to_string(),
        delta: 1,
    }
}
