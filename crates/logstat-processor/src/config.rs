// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ProcessorError;
use chrono::NaiveDate;
use logstat::constants::DATE_FORMAT;
use std::env;
use std::path::PathBuf;

const VALID_ENVIRONMENTS: [&str; 2] = ["production", "staging"];
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration for one processing run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Local directory mirroring the log bucket
    pub log_dir: PathBuf,
    /// Bucket environment (production or staging)
    pub environment: String,
    /// Batch key prefix after the environment, e.g. "2015-08-24T12:26"
    pub prefix: String,
    /// Processing date override; defaults to today in UTC
    pub date: Option<NaiveDate>,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
    /// Where to write the JSON report; stdout when unset
    pub report_path: Option<PathBuf>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./logs"),
            environment: "production".to_string(),
            prefix: String::new(),
            date: None,
            log_level: "info".to_string(),
            report_path: None,
        }
    }
}

impl ProcessorConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ProcessorError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Create configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ProcessorError> {
        let defaults = Self::default();

        let log_dir = lookup("LOGSTAT_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);
        let environment = lookup("LOGSTAT_ENVIRONMENT")
            .map(|val| val.trim().to_lowercase())
            .unwrap_or(defaults.environment);
        let prefix = lookup("LOGSTAT_PREFIX").unwrap_or_default();
        let date = match lookup("LOGSTAT_DATE") {
            Some(val) => Some(NaiveDate::parse_from_str(val.trim(), DATE_FORMAT).map_err(
                |e| ProcessorError::InvalidConfig(format!("Invalid LOGSTAT_DATE '{val}': {e}")),
            )?),
            None => None,
        };
        let log_level = lookup("LOGSTAT_LOG_LEVEL")
            .map(|val| val.to_lowercase())
            .unwrap_or(defaults.log_level);
        let report_path = lookup("LOGSTAT_REPORT")
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from);

        let config = Self {
            log_dir,
            environment,
            prefix,
            date,
            log_level,
            report_path,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ProcessorError> {
        if self.log_dir.as_os_str().is_empty() {
            return Err(ProcessorError::InvalidConfig(
                "LOGSTAT_LOG_DIR cannot be empty".to_string(),
            ));
        }

        if !VALID_ENVIRONMENTS.contains(&self.environment.as_str()) {
            return Err(ProcessorError::InvalidConfig(format!(
                "Invalid environment '{}'. Must be one of: production, staging",
                self.environment
            )));
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ProcessorError::InvalidConfig(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }

    /// Batch selector, `{environment}/{prefix}`
    pub fn selector(&self) -> String {
        format!("{}/{}", self.environment, self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> Result<ProcessorConfig, ProcessorError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ProcessorConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ProcessorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.selector(), "production/");
    }

    #[test]
    fn test_from_lookup_without_variables() {
        let config = from_vars(&[]).unwrap();
        assert_eq!(config, ProcessorConfig::default());
    }

    #[test]
    fn test_from_lookup_reads_every_variable() {
        let config = from_vars(&[
            ("LOGSTAT_LOG_DIR", "/srv/fastly-logs"),
            ("LOGSTAT_ENVIRONMENT", "Staging"),
            ("LOGSTAT_PREFIX", "2015-08-24T12:26"),
            ("LOGSTAT_DATE", "2015-08-24"),
            ("LOGSTAT_LOG_LEVEL", "DEBUG"),
            ("LOGSTAT_REPORT", "/tmp/report.json"),
        ])
        .unwrap();

        assert_eq!(config.log_dir, PathBuf::from("/srv/fastly-logs"));
        assert_eq!(config.environment, "staging");
        assert_eq!(config.selector(), "staging/2015-08-24T12:26");
        assert_eq!(config.date, NaiveDate::from_ymd_opt(2015, 8, 24));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.report_path, Some(PathBuf::from("/tmp/report.json")));
    }

    #[test]
    fn test_invalid_date() {
        let result = from_vars(&[("LOGSTAT_DATE", "24/08/2015")]);
        assert!(matches!(result, Err(ProcessorError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_invalid_environment() {
        let config = ProcessorConfig {
            environment: "canary".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let config = ProcessorConfig {
            log_level: "verbose".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_log_dir() {
        let result = from_vars(&[("LOGSTAT_LOG_DIR", "")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_report_path_means_stdout() {
        let config = from_vars(&[("LOGSTAT_REPORT", "  ")]).unwrap();
        assert_eq!(config.report_path, None);
    }
}
