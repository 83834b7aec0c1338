// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Splits a `name-version` token at its last hyphen.
///
/// Returns `(name, version)`. A token without a hyphen is all name and has an empty version.
/// Names like `net-http-persistent-2.9.4` split correctly because only the last hyphen is
/// considered; a token whose own name ends in a hyphenated segment, such as a prerelease
/// written `foo-1.0-beta`, splits as `("foo-1.0", "beta")`.
///
/// # Examples
///
/// ```
/// use logstat::package::split_package_name;
///
/// assert_eq!(split_package_name("multi_xml-0.5.5"), ("multi_xml", "0.5.5"));
/// assert_eq!(split_package_name("rails"), ("rails", ""));
/// ```
pub fn split_package_name(full_name: &str) -> (&str, &str) {
    full_name.rsplit_once('-').unwrap_or((full_name, ""))
}
