//! Sanity content store client.

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, instrument};
use url::Url;

use crate::config::ContentConfig;
use crate::content::{sort_projects, ContentError, ContentSource, Project, SiteSettings};
use crate::services::ServiceError;

const SETTINGS_QUERY: &str = r#"*[_type == "siteSettings"][0]"#;
const PROJECTS_QUERY: &str = r#"*[_type == "project"] | order(_createdAt desc)"#;

#[derive(Deserialize)]
struct QueryResponse<T> {
    result: T,
}

#[derive(Debug, Clone)]
pub struct SanityClient {
    http: Client,
    base: Url,
}

impl SanityClient {
    pub fn new(config: &ContentConfig) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base: query_base(config)?,
        })
    }

    fn query_url(&self, groq: &str) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut().append_pair("query", groq);
        url
    }

    #[instrument(skip(self))]
    async fn query<T: DeserializeOwned>(&self, groq: &str) -> Result<T, ContentError> {
        let response = self
            .http
            .get(self.query_url(groq))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ContentError::Unavailable(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| ContentError::Unavailable(e.to_string()))?;
        debug!(bytes = body.len(), "content query answered");
        decode_result(&body)
    }
}

impl ContentSource for SanityClient {
    async fn site_settings(&self) -> Result<SiteSettings, ContentError> {
        self.query::<Option<SiteSettings>>(SETTINGS_QUERY)
            .await?
            .ok_or(ContentError::MissingDocument)
    }

    async fn projects(&self) -> Result<Vec<Project>, ContentError> {
        let mut projects = self
            .query::<Option<Vec<Project>>>(PROJECTS_QUERY)
            .await?
            .unwrap_or_default();
        sort_projects(&mut projects);
        Ok(projects)
    }
}

fn query_base(config: &ContentConfig) -> Result<Url, url::ParseError> {
    let host = if config.use_cdn { "apicdn" } else { "api" };
    Url::parse(&format!(
        "https://{}.{host}.sanity.io/v{}/data/query/{}",
        config.project_id, config.api_version, config.dataset
    ))
}

fn decode_result<T: DeserializeOwned>(body: &str) -> Result<T, ContentError> {
    serde_json::from_str::<QueryResponse<T>>(body)
        .map(|r| r.result)
        .map_err(|e| ContentError::Decode(e.to_string()))
}
