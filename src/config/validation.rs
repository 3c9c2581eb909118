use crate::config::types::{Config, EngineConfig, SiteConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_engine_config(&config.engine)?;

    if config.sites.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[site]] entry is required".to_string(),
        ));
    }

    for site in &config.sites {
        validate_site_config(site)?;
    }

    Ok(())
}

/// Validates engine configuration
///
/// `max_workers` is not checked here: non-positive values were already
/// replaced with the default at the load boundary.
fn validate_engine_config(config: &EngineConfig) -> Result<(), ConfigError> {
    if config.navigation_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "navigation_timeout_ms must be > 0".to_string(),
        ));
    }

    if config.selector_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "selector_timeout_ms must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates a single site entry
fn validate_site_config(site: &SiteConfig) -> Result<(), ConfigError> {
    if site.website.is_empty() {
        return Err(ConfigError::Validation(
            "site website identifier cannot be empty".to_string(),
        ));
    }

    if !site.search_url.contains("{query}") {
        return Err(ConfigError::Validation(format!(
            "search-url for '{}' must contain a {{query}} placeholder",
            site.website
        )));
    }

    // The template must still be a parseable URL once the placeholder is
    // substituted
    let probe = site.search_url.replace("{query}", "probe");
    let url = Url::parse(&probe).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid search-url for '{}': {}",
            site.website, e
        ))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "search-url for '{}' must use http or https",
            site.website
        )));
    }

    validate_selector(&site.website, "selector", &site.selector)?;
    validate_selector(&site.website, "link-selector", &site.link_selector)?;
    validate_selector(&site.website, "image-selector", &site.image_selector)?;
    if let Some(title) = &site.title_selector {
        validate_selector(&site.website, "title-selector", title)?;
    }

    Ok(())
}

/// Checks a CSS selector parses; catching this at the boundary keeps
/// selector errors out of the concurrent fetch path
fn validate_selector(website: &str, field: &str, selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} for '{}' cannot be empty",
            field, website
        )));
    }

    Selector::parse(selector).map_err(|_| {
        ConfigError::Validation(format!(
            "{} for '{}' is not a valid CSS selector: '{}'",
            field, website, selector
        ))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_site() -> SiteConfig {
        SiteConfig {
            website: "examplemart".to_string(),
            search_url: "https://example.test/search?q={query}".to_string(),
            search_url_extra: None,
            selector: ".result-item".to_string(),
            link_selector: ".result-item a".to_string(),
            image_selector: "img.product".to_string(),
            title_selector: Some("h1".to_string()),
        }
    }

    fn valid_config() -> Config {
        Config {
            engine: EngineConfig::default(),
            sites: vec![valid_site()],
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_no_sites_rejected() {
        let mut config = valid_config();
        config.sites.clear();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_website_rejected() {
        let mut config = valid_config();
        config.sites[0].website = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_missing_query_placeholder_rejected() {
        let mut config = valid_config();
        config.sites[0].search_url = "https://example.test/search".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_non_http_search_url_rejected() {
        let mut config = valid_config();
        config.sites[0].search_url = "ftp://example.test/{query}".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_selector_rejected() {
        let mut config = valid_config();
        config.sites[0].link_selector = ":::not-a-selector".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = valid_config();
        config.engine.selector_timeout_ms = 0;
        assert!(validate(&config).is_err());
    }
}
