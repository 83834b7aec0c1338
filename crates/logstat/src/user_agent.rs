// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Client metadata carried in the RubyGems user agent.
//!
//! Only the modern `Ruby, RubyGems/<version> <platform> Ruby/<version> (<release>)` form is
//! recognised. Bundler, older RubyGems and arbitrary HTTP clients send other strings; those
//! produce empty metadata instead of an error.

use regex::Regex;

use crate::errors::Creation;

const USER_AGENT_PATTERN: &str = concat!(
    r"^Ruby, RubyGems/(?P<rubygems_version>[0-9.]+)\s",
    r"(?P<rubygems_platform>.+)\s",
    r"Ruby/(?P<ruby_version>.+)\s",
    r"\((?P<ruby_release>.+)\)$",
);

/// Client tooling metadata. Fields are empty strings when unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMetadata {
    pub rubygems_version: String,
    pub rubygems_platform: String,
    pub ruby_version: String,
    pub ruby_release: String,
}

impl ClientMetadata {
    pub fn is_empty(&self) -> bool {
        self.rubygems_version.is_empty()
            && self.rubygems_platform.is_empty()
            && self.ruby_version.is_empty()
            && self.ruby_release.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct UserAgentParser {
    pattern: Regex,
}

impl UserAgentParser {
    pub fn new() -> Result<Self, Creation> {
        Ok(Self {
            pattern: Regex::new(USER_AGENT_PATTERN)?,
        })
    }

    /// Either all four fields are populated or none is.
    pub fn parse(&self, user_agent: &str) -> ClientMetadata {
        let Some(captures) = self.pattern.captures(user_agent) else {
            return ClientMetadata::default();
        };
        let field = |name: &str| {
            captures
                .name(name)
                .map_or_else(String::new, |m| m.as_str().to_string())
        };

        ClientMetadata {
            rubygems_version: field("rubygems_version"),
            rubygems_platform: field("rubygems_platform"),
            ruby_version: field("ruby_version"),
            ruby_release: field("ruby_release"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_rubygems_user_agent() {
        let parser = UserAgentParser::new().unwrap();
        let metadata = parser
            .parse("Ruby, RubyGems/2.0.14 x86_64-linux Ruby/2.0.0 (2015-04-13 patchlevel 645)");

        assert_eq!(
            metadata,
            ClientMetadata {
                rubygems_version: "2.0.14".to_string(),
                rubygems_platform: "x86_64-linux".to_string(),
                ruby_version: "2.0.0".to_string(),
                ruby_release: "2015-04-13 patchlevel 645".to_string(),
            }
        );
    }

    #[test]
    fn test_non_matching_user_agents_are_empty() {
        let parser = UserAgentParser::new().unwrap();
        for user_agent in [
            "",
            "RubyGems/1.8.17 x86-linux Ruby/1.8.7 (2010-12-23 patchlevel 330)",
            "bundler/1.10.6 rubygems/2.4.8 ruby/2.2.3 (x86_64-pc-linux-gnu) command/install",
            "curl/7.43.0",
            "Ruby, RubyGems/2.0.14 x86_64-linux Ruby/2.0.0",
        ] {
            assert!(parser.parse(user_agent).is_empty(), "{user_agent}");
        }
    }

    proptest! {
        #[test]
        fn matching_user_agents_populate_every_field(
            rubygems in "[0-9]{1,2}(\\.[0-9]{1,2}){1,2}",
            platform in "[a-z0-9_]{1,8}-[a-z]{1,8}",
            ruby in "[0-9]\\.[0-9]\\.[0-9]",
            release in "[0-9]{4}-[0-9]{2}-[0-9]{2}( patchlevel [0-9]{1,3})?",
        ) {
            let parser = UserAgentParser::new().unwrap();
            let user_agent = format!("Ruby, RubyGems/{rubygems} {platform} Ruby/{ruby} ({release})");
            let metadata = parser.parse(&user_agent);
            prop_assert_eq!(metadata.rubygems_version, rubygems);
            prop_assert_eq!(metadata.rubygems_platform, platform);
            prop_assert_eq!(metadata.ruby_version, ruby);
            prop_assert_eq!(metadata.ruby_release, release);
        }

        #[test]
        fn other_user_agents_are_empty(user_agent in "[a-z/0-9. ()]{0,40}") {
            let parser = UserAgentParser::new().unwrap();
            prop_assert!(parser.parse(&user_agent).is_empty());
        }
    }
}
