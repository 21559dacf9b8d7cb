//! URL helper functions

use crate::config::SiteConfig;

/// Prefix a site path with the configured root
///
/// # Examples
/// ```ignore
/// url_for(&config, "/blog/animation-techniques") // -> "/portfolio/blog/animation-techniques"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// URL of a record image, falling back to the configured placeholder.
/// Absolute URLs are passed through untouched.
pub fn image_url(config: &SiteConfig, image: Option<&str>) -> String {
    let image = image.unwrap_or(&config.placeholder_image);
    if image.starts_with("http://") || image.starts_with("https://") || image.starts_with("//") {
        image.to_string()
    } else {
        url_for(config, image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();
        config.root = "/portfolio/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/blog/a"), "/portfolio/blog/a");
        assert_eq!(url_for(&config, "/"), "/portfolio/");
        assert_eq!(url_for(&SiteConfig::default(), "/projects"), "/projects");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/about"),
            "https://example.com/portfolio/about"
        );
    }

    #[test]
    fn test_image_url() {
        let config = test_config();
        assert_eq!(image_url(&config, None), "/portfolio/placeholder.jpg");
        assert_eq!(image_url(&config, Some("/img/app.png")), "/portfolio/img/app.png");
        assert_eq!(
            image_url(&config, Some("https://cdn.example.com/a.png")),
            "https://cdn.example.com/a.png"
        );
    }
}
