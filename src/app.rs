mod announcement;
mod consent;
mod contact;
mod gate;
mod header;
mod homepage;
mod login;

use leptos::prelude::*;
use leptos::server_fn::codec::GetUrl;
use leptos_meta::*;
use leptos_router::{components::*, path};
use serde::{Deserialize, Serialize};

use codee::string::FromToStringCodec;
use leptos_use::storage::use_local_storage;

use crate::content::{Project, SiteSettings};
use crate::gate::SettingsState;
use crate::session::{AdminSession, ADMIN_KEY};

use consent::CookieBanner;
use contact::ContactPage;
use gate::Gate;
use homepage::HomePage;
use login::LoginPage;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <meta name="color-scheme" content="dark" />
                <link rel="shortcut icon" type="image/svg+xml" href="/2bdev-logo.svg" />
                <link rel="stylesheet" id="leptos" href="/pkg/portfolio-site.css" />
                <MetaTags />
            </head>
            <body class="font-sans antialiased bg-black text-white">
                <App />
            </body>
        </html>
    }
}

/// Shared client state, provided once by [`App`].
#[derive(Clone, Copy)]
pub struct SiteContext {
    pub settings: Resource<Result<SiteSettings, ServerFnError>>,
    pub admin: AdminSession,
    /// False during server rendering and until the first client effect runs.
    pub hydrated: RwSignal<bool>,
}

impl SiteContext {
    /// Snapshot of the settings resource without subscribing to it.
    pub fn settings_state(&self) -> SettingsState {
        settings_state(self.settings.get_untracked())
    }
}

pub fn settings_state(res: Option<Result<SiteSettings, ServerFnError>>) -> SettingsState {
    match res {
        None => SettingsState::Loading,
        Some(Ok(settings)) => SettingsState::Loaded(settings),
        Some(Err(e)) => {
            log::warn!("couldn't load site settings, continuing without them: {e}");
            SettingsState::Unavailable
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub captcha_site_key: String,
}

#[cfg(feature = "ssr")]
fn site_services() -> Result<crate::services::SiteServices, ServerFnError> {
    use_context::<crate::services::SiteServices>()
        .ok_or_else(|| ServerFnError::new("site services missing from context"))
}

#[server(input = GetUrl)]
pub async fn get_site_settings() -> Result<SiteSettings, ServerFnError> {
    use crate::content::ContentSource;

    site_services()?
        .content
        .site_settings()
        .await
        .map_err(|e| {
            tracing::warn!("site settings fetch failed: {e}");
            ServerFnError::new(e)
        })
}

#[server(input = GetUrl)]
pub async fn get_projects() -> Result<Vec<Project>, ServerFnError> {
    use crate::content::ContentSource;

    site_services()?.content.projects().await.map_err(|e| {
        tracing::warn!("projects fetch failed: {e}");
        ServerFnError::new(e)
    })
}

#[server(input = GetUrl)]
pub async fn get_client_config() -> Result<ClientConfig, ServerFnError> {
    Ok(ClientConfig {
        captcha_site_key: site_services()?.captcha_site_key,
    })
}

#[server]
pub async fn submit_contact(
    name: String,
    email: String,
    message: String,
    captcha_token: String,
) -> Result<(), ServerFnError> {
    use std::net::SocketAddr;

    use axum::extract::ConnectInfo;
    use http::HeaderMap;

    use crate::contact::{client_ip, deliver, ContactError, ContactPayload};

    let services = site_services()?;
    let headers: HeaderMap = leptos_axum::extract().await.map_err(ServerFnError::new)?;
    let peer = leptos_axum::extract::<ConnectInfo<SocketAddr>>()
        .await
        .ok()
        .map(|ConnectInfo(addr)| addr);

    let payload = ContactPayload {
        name,
        email,
        message,
        captcha_token,
    };
    deliver(
        payload,
        client_ip(&headers, peer),
        &services.geo,
        &services.relay,
    )
    .await
    .map_err(|e| {
        match &e {
            ContactError::Delivery(_) => tracing::error!("contact message not delivered: {e}"),
            _ => tracing::warn!("contact submission rejected: {e}"),
        }
        ServerFnError::new(e)
    })
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    let (admin_flag, set_admin_flag, clear_admin_flag) =
        use_local_storage::<bool, FromToStringCodec>(ADMIN_KEY);
    let ctx = SiteContext {
        settings: Resource::new(|| (), |_| get_site_settings()),
        admin: AdminSession::new(
            admin_flag,
            set_admin_flag,
            Callback::new(move |_| clear_admin_flag()),
        ),
        hydrated: RwSignal::new(false),
    };
    provide_context(ctx);

    // Local storage only exists in the browser. The gate waits for this so the
    // first client render stays identical to the server's.
    Effect::new(move |_| ctx.hydrated.set(true));

    view! {
        <Title formatter=|title| format!("2BDeV - {title}") />

        <Router>
            <Routes fallback=|| view! { <Redirect path="/" /> }>
                <ParentRoute path=path!("") view=Gate>
                    <Route path=path!("") view=HomePage />
                    <Route path=path!("contact") view=ContactPage />
                    <Route path=path!("login") view=LoginPage />
                </ParentRoute>
            </Routes>
        </Router>
        <CookieBanner />
    }
}

#[component]
fn Footer() -> impl IntoView {
    let year = chrono::Utc::now().format("%Y").to_string();
    view! {
        <footer class="relative py-6 text-center text-white/70 text-sm">
            <div class="mx-auto w-full max-w-7xl px-4 sm:px-6 lg:px-8">
                {format!("© {year} 2BDeV. All rights reserved.")}
            </div>
        </footer>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_state_from_resource() {
        assert_eq!(settings_state(None), SettingsState::Loading);
        assert_eq!(
            settings_state(Some(Ok(SiteSettings::default()))),
            SettingsState::Loaded(SiteSettings::default())
        );
        assert_eq!(
            settings_state(Some(Err(ServerFnError::new("offline")))),
            SettingsState::Unavailable
        );
    }
}
