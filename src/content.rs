use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

const SKILL_ICON_BASE: &str = "https://skillicons.dev/icons?i=";

/// Singleton settings document owned by the content store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    #[serde(deserialize_with = "null_as_default")]
    pub maintenance_mode: bool,
    pub custom_html: Option<String>,
    pub maintenance_message: Option<String>,
    pub about_text: Option<String>,
    pub admin_password: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    pub announcement: Option<Announcement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Announcement {
    #[serde(deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    pub link: Option<String>,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: AnnouncementKind,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub closable: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementKind {
    Warning,
    Error,
    Success,
    Brand,
    #[default]
    #[serde(other)]
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(rename = "_createdAt", alias = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("content store unavailable: {0}")]
    Unavailable(String),
    #[error("couldn't decode content: {0}")]
    Decode(String),
    #[error("settings document not found")]
    MissingDocument,
}

/// Read-only access to the documents the site renders.
pub trait ContentSource {
    fn site_settings(&self) -> impl Future<Output = Result<SiteSettings, ContentError>> + Send;

    /// Projects ordered by creation time, newest first.
    fn projects(&self) -> impl Future<Output = Result<Vec<Project>, ContentError>> + Send;
}

pub fn skill_icon_url(skill: &str) -> String {
    format!("{SKILL_ICON_BASE}{}", skill.trim().to_lowercase())
}

/// Newest first; undated projects sink to the end.
pub fn sort_projects(projects: &mut [Project]) {
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

// The content store emits explicit nulls for cleared fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
