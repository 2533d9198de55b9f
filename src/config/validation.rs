use crate::config::types::{Config, CrawlerConfig, DomainEntry, OutputConfig, UserAgentConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

const MAX_CONCURRENCY: u32 = 500;
const MAX_TIMEOUT_MS: u64 = 600_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_skip_domains(&config.skip)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.concurrency_limit < 1 || config.concurrency_limit > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency_limit must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency_limit
        )));
    }

    if config.timeout_ms < 1 || config.timeout_ms > MAX_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "timeout_ms must be between 1 and {}, got {}",
            MAX_TIMEOUT_MS, config.timeout_ms
        )));
    }

    if config.max_links == Some(0) {
        return Err(ConfigError::Validation(
            "max_links must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.report_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "report_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_skip_domains(domains: &[DomainEntry]) -> ConfigResult<()> {
    for entry in domains {
        validate_skip_pattern(&entry.domain)?;
    }
    Ok(())
}

/// Checks a `[[skip]]` host pattern: a hostname, optionally behind `*.`
fn validate_skip_pattern(pattern: &str) -> ConfigResult<()> {
    let host = pattern.trim();
    let host = host.strip_prefix("*.").unwrap_or(host);

    let valid_label = |label: &str| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    };

    if host.split('.').all(valid_label) {
        Ok(())
    } else {
        Err(ConfigError::InvalidPattern(format!(
            "'{}' is not a hostname or '*.' hostname pattern",
            pattern
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_patterns() {
        assert!(validate_skip_pattern("example.com").is_ok());
        assert!(validate_skip_pattern("*.example.com").is_ok());
        assert!(validate_skip_pattern("localhost").is_ok());
        assert!(validate_skip_pattern(" ads.example.net ").is_ok());

        for bad in ["", "*.", "*", ".example.com", "example.com.", "a..b", "-a.com", "exa mple.com", "*.*.a.com"] {
            assert!(
                matches!(validate_skip_pattern(bad), Err(ConfigError::InvalidPattern(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_concurrency_bounds() {
        let mut crawler = CrawlerConfig::default();

        crawler.concurrency_limit = 0;
        assert!(matches!(
            validate_crawler_config(&crawler),
            Err(ConfigError::Validation(_))
        ));

        crawler.concurrency_limit = 501;
        assert!(validate_crawler_config(&crawler).is_err());

        crawler.concurrency_limit = 500;
        assert!(validate_crawler_config(&crawler).is_ok());
    }

    #[test]
    fn test_timeout_bounds() {
        let mut crawler = CrawlerConfig::default();

        crawler.timeout_ms = 0;
        assert!(validate_crawler_config(&crawler).is_err());

        crawler.timeout_ms = 600_001;
        assert!(validate_crawler_config(&crawler).is_err());

        crawler.timeout_ms = 1;
        assert!(validate_crawler_config(&crawler).is_ok());
    }

    #[test]
    fn test_zero_link_limit_rejected() {
        let crawler = CrawlerConfig {
            max_links: Some(0),
            ..CrawlerConfig::default()
        };
        assert!(validate_crawler_config(&crawler).is_err());
    }

    #[test]
    fn test_user_agent_validation() {
        let mut ua = UserAgentConfig::default();
        assert!(validate_user_agent_config(&ua).is_ok());

        ua.crawler_name = "bad name".to_string();
        assert!(validate_user_agent_config(&ua).is_err());

        ua.crawler_name = "good-name".to_string();
        ua.contact_url = Some("not a url".to_string());
        assert!(matches!(
            validate_user_agent_config(&ua),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_empty_report_path() {
        let output = OutputConfig {
            report_path: "  ".to_string(),
        };
        assert!(validate_output_config(&output).is_err());
    }
}
