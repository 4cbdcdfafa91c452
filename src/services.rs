use thiserror::Error;

use crate::cms::SanityClient;
use crate::config::SiteConfig;
use crate::relay::{HttpGeoLocator, HttpRelay};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid service URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Outbound clients shared by the server functions, provided as Leptos context.
#[derive(Debug, Clone)]
pub struct SiteServices {
    pub content: SanityClient,
    pub relay: HttpRelay,
    pub geo: HttpGeoLocator,
    pub captcha_site_key: String,
}

impl SiteServices {
    pub fn from_config(config: &SiteConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            content: SanityClient::new(&config.content)?,
            relay: HttpRelay::new(&config.relay)?,
            geo: HttpGeoLocator::new(&config.geo)?,
            captcha_site_key: config.captcha.site_key.clone(),
        })
    }
}
