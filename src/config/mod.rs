//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::page::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use crate::core::sort::DEFAULT_SORT_LABEL;
use serde::{Deserialize, Serialize};

/// Settings of a browsing session
///
/// Every field has a default, so an empty YAML document is a valid config.
///
/// # Format
///
/// ```yaml
/// page_size_options: [6, 12, 18]
/// default_page_size: 6
/// default_sort_label: Featured
/// event_capacity: 1024
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Page sizes the user can pick from
    pub page_size_options: Vec<usize>,

    /// Page size when a session starts, must be one of `page_size_options`
    pub default_page_size: usize,

    /// Sort option active when a session starts
    pub default_sort_label: String,

    /// Buffer size of the change notification channel
    pub event_capacity: usize,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            default_page_size: DEFAULT_PAGE_SIZE,
            default_sort_label: DEFAULT_SORT_LABEL.to_string(),
            event_capacity: 1024,
        }
    }
}

impl BrowserConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content, Some(path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse(yaml, None)
    }

    fn parse(yaml: &str, file: Option<&str>) -> Result<Self, ConfigError> {
        // serde_yaml rejects an empty document, treat it as all defaults
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            file: file.map(str::to_string),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings are internally consistent
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size_options.is_empty() {
            return Err(ConfigError::invalid(
                "page_size_options",
                "at least one page size is required",
            ));
        }
        if self.page_size_options.contains(&0) {
            return Err(ConfigError::invalid(
                "page_size_options",
                "page sizes must be positive",
            ));
        }
        if !self.page_size_options.contains(&self.default_page_size) {
            return Err(ConfigError::invalid(
                "default_page_size",
                format!(
                    "{} is not one of {:?}",
                    self.default_page_size, self.page_size_options
                ),
            ));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::invalid("event_capacity", "must be positive"));
        }
        Ok(())
    }

    /// Whether `page_size` is one of the offered options
    pub fn is_page_size_offered(&self, page_size: usize) -> bool {
        self.page_size_options.contains(&page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = BrowserConfig::default();

        assert_eq!(config.page_size_options, vec![6, 12, 18]);
        assert_eq!(config.default_page_size, 6);
        assert_eq!(config.default_sort_label, "Featured");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_serialization() {
        let config = BrowserConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = BrowserConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = BrowserConfig::from_yaml_str("default_sort_label: \"Avg. Rating\"").unwrap();
        assert_eq!(config.default_sort_label, "Avg. Rating");
        assert_eq!(config.default_page_size, 6);

        assert_eq!(BrowserConfig::from_yaml_str("").unwrap(), BrowserConfig::default());
    }

    #[test]
    fn test_default_page_size_must_be_offered() {
        let err = BrowserConfig::from_yaml_str(
            r#"
page_size_options: [10, 20]
default_page_size: 6
"#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "default_page_size"));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = BrowserConfig::from_yaml_str("page_size_options: [0, 6]").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_INVALID_VALUE");
    }

    #[test]
    fn test_malformed_yaml() {
        let err = BrowserConfig::from_yaml_str("page_size_options: [6, 12").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { file: None, .. }));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_size_options: [5, 10]\ndefault_page_size: 10").unwrap();

        let config = BrowserConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.page_size_options, vec![5, 10]);
        assert!(config.is_page_size_offered(5));
        assert!(!config.is_page_size_offered(6));
    }

    #[test]
    fn test_missing_file() {
        let err = BrowserConfig::from_yaml_file("/nonexistent/browser.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
