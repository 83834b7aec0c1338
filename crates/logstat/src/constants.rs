// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Format of the `{date}` component in day-bucketed keys and hash fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const DOWNLOADS: &str = "downloads";
pub const DOWNLOADS_ALL: &str = "downloads:all";
pub const DOWNLOADS_RUBYGEM: &str = "downloads:rubygem";
pub const DOWNLOADS_VERSION: &str = "downloads:version";
pub const DOWNLOADS_TODAY: &str = "downloads:today";
pub const VERSION_HISTORY: &str = "downloads:version_history";
pub const RUBYGEM_HISTORY: &str = "downloads:rubygem_history";

pub const USAGE_RUBYGEM_VERSION: &str = "usage:rubygem_version";
pub const USAGE_RUBY_PLATFORM: &str = "usage:ruby_platform";
pub const USAGE_RUBY_VERSION: &str = "usage:ruby_version";
pub const USAGE_RUBY_RELEASE: &str = "usage:ruby_release";
