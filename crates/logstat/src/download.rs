// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The canonical download event and the parser that builds it from a raw log line.

use crate::errors::{Creation, ParseError};
use crate::line::LineMatcher;
use crate::package::split_package_name;
use crate::user_agent::{ClientMetadata, UserAgentParser};

/// One gem download, parsed from one log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Base package name, e.g. `multi_xml`.
    pub gem_name: String,
    /// Package name and version as requested, e.g. `multi_xml-0.5.5`.
    pub full_gem_name: String,
    pub client: ClientMetadata,
    pub client_ip: String,
    pub requested_at: String,
    pub status: u16,
}

/// Builds [`Download`]s. Compiles its patterns once; share it by reference.
#[derive(Debug, Clone)]
pub struct DownloadParser {
    lines: LineMatcher,
    user_agents: UserAgentParser,
}

impl DownloadParser {
    pub fn new() -> Result<Self, Creation> {
        Ok(Self {
            lines: LineMatcher::new()?,
            user_agents: UserAgentParser::new()?,
        })
    }

    pub fn parse(&self, line: &str) -> Result<Download, ParseError> {
        let fields = self.lines.matches(line)?;

        let (gem_name, _version) = split_package_name(fields.full_name);
        if gem_name.is_empty() {
            return Err(ParseError::EmptyPackageToken(line.to_string()));
        }

        Ok(Download {
            gem_name: gem_name.to_string(),
            full_gem_name: fields.full_name.to_string(),
            client: self.user_agents.parse(fields.user_agent),
            client_ip: fields.client_ip.to_string(),
            requested_at: fields.requested_at.to_string(),
            status: fields.status,
        })
    }
}
