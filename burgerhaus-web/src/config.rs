use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3001/";
pub const BASE_URL_ENV: &str = "BURGERHAUS_API_URL";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root; API paths are appended below `api/v1/`
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Reads the base url from `BURGERHAUS_API_URL`, falling back to the
    /// local development server.
    pub fn from_env() -> Self {
        Self::new(std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/v1/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Where an uploaded image is served. Burger and offer images live in
    /// their own subdirectory.
    pub fn image_url(&self, subdir: Option<&str>, file_name: &str) -> String {
        match subdir {
            Some(subdir) => self.api_url(&format!("{subdir}/{file_name}")),
            None => self.api_url(file_name),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_joins_cleanly() {
        let config = ClientConfig::new("https://example.com/web/");
        assert_eq!(
            config.api_url("/hamburgers"),
            "https://example.com/web/api/v1/hamburgers"
        );
        assert_eq!(
            config.image_url(Some("burgers"), "classic.png"),
            "https://example.com/web/api/v1/burgers/classic.png"
        );
        assert_eq!(
            ClientConfig::default().api_url("auth"),
            "http://127.0.0.1:3001/api/v1/auth"
        );
    }
}
