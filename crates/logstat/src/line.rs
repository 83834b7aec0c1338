// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Matching of raw Fastly download log lines.
//!
//! Every line shipped by the CDN's syslog endpoint has the shape
//!
//! ```text
//! <134>2015-08-24T12:44:59Z cache-lhr6335 downloads[332933]: 54.72.251.121 Mon, 24 Aug 2015 12:44:59 GMT /production.s3.rubygems.org/gems/multi_xml-0.5.5.gem 200 Ruby, RubyGems/2.0.14 x86_64-linux Ruby/2.0.0 (2015-04-13 patchlevel 645)
//! ```
//!
//! The trailing user agent is optional; older edge nodes end the line at the status code.

use regex::{Captures, Regex};

use crate::errors::{Creation, ParseError};

const LOG_LINE_PATTERN: &str = concat!(
    r"^<[0-9]{1,3}>",
    r"[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}Z\s",
    r"\S+\s",
    r"downloads\[[0-9]+\]:\s",
    r"(?P<client_ip>(?:[0-9]{1,3}\.){3}[0-9]{1,3})\s",
    r"(?P<requested_at>.+?)\sGMT\s",
    r"/(?P<environment>[a-z]+)\.\S+?/gems/",
    r"(?P<full_name>\S*)\.gem\s",
    r"(?P<status>[0-9]{3})",
    r"(?:\s(?P<user_agent>.*))?$",
);

/// Fields extracted from one matched line, borrowed from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLine<'a> {
    pub client_ip: &'a str,
    /// RFC1123 date without the trailing `GMT`, e.g. `Mon, 24 Aug 2015 02:23:25`.
    pub requested_at: &'a str,
    /// First label of the bucket host, `production` or `staging`.
    pub environment: &'a str,
    /// Package and version path segment without the `.gem` suffix.
    pub full_name: &'a str,
    pub status: u16,
    /// Free-text tail after the status; empty when the line has none.
    pub user_agent: &'a str,
}

#[derive(Debug, Clone)]
pub struct LineMatcher {
    pattern: Regex,
}

impl LineMatcher {
    pub fn new() -> Result<Self, Creation> {
        Ok(Self {
            pattern: Regex::new(LOG_LINE_PATTERN)?,
        })
    }

    /// Matches `line` against the download log grammar.
    pub fn matches<'a>(&self, line: &'a str) -> Result<LogLine<'a>, ParseError> {
        let malformed = || ParseError::MalformedLine(line.to_string());
        let captures = self.pattern.captures(line).ok_or_else(malformed)?;

        let status = capture(&captures, "status")
            .parse::<u16>()
            .map_err(|_| malformed())?;

        Ok(LogLine {
            client_ip: capture(&captures, "client_ip"),
            requested_at: capture(&captures, "requested_at"),
            environment: capture(&captures, "environment"),
            full_name: capture(&captures, "full_name"),
            status,
            user_agent: capture(&captures, "user_agent"),
        })
    }
}

fn capture<'h>(captures: &Captures<'h>, name: &str) -> &'h str {
    captures.name(name).map_or("", |m| m.as_str())
}
