use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use link_ripple::config::load_config;
///
/// let config = load_config(Path::new("link-ripple.toml")).unwrap();
/// println!("Concurrency: {}", config.crawler.concurrency_limit);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
recurse = false
timeout-ms = 2500
concurrency-limit = 16
max-depth = 3
max-links = 1000
same-host-only = false

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"

[output]
report-path = "./report.json"

[[skip]]
domain = "*.example.org"

[[skip]]
domain = "ads.example.net"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert!(!config.crawler.recurse);
        assert_eq!(config.crawler.timeout_ms, 2500);
        assert_eq!(config.crawler.concurrency_limit, 16);
        assert_eq!(config.crawler.max_depth, Some(3));
        assert_eq!(config.crawler.max_links, Some(1000));
        assert!(!config.crawler.same_host_only);
        assert_eq!(config.user_agent.crawler_name, "TestCrawler");
        assert_eq!(
            config.user_agent.contact_url.as_deref(),
            Some("https://example.com/about")
        );
        assert_eq!(config.output.report_path, "./report.json");
        assert_eq!(config.skip.len(), 2);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config_content = r#"
[crawler]
concurrency-limit = 8
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.concurrency_limit, 8);
        assert!(config.crawler.recurse);
        assert_eq!(config.crawler.timeout_ms, 10_000);
        assert_eq!(config.crawler.max_depth, None);
        assert_eq!(config.output.report_path, "broken_links.csv");
        assert!(config.skip.is_empty());
    }

    #[test]
    fn test_empty_config_is_default() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.concurrency_limit, 100);
        assert!(config.crawler.same_host_only);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
concurrency-limit = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_config_with_bad_skip_pattern() {
        let config_content = r#"
[[skip]]
domain = "*."
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::InvalidPattern(_))));
    }
}
