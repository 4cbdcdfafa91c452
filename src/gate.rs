use crate::content::SiteSettings;

pub const LOGIN_ROUTE: &str = "/login";

pub const DEFAULT_MAINTENANCE_MESSAGE: &str =
    "The site is currently under maintenance. Please check back soon.";

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsState {
    Loading,
    Loaded(SiteSettings),
    /// The fetch failed; the gate fails open.
    Unavailable,
}

impl SettingsState {
    pub fn settings(&self) -> Option<&SiteSettings> {
        match self {
            Self::Loaded(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateView {
    Loading,
    Maintenance,
    AdminLogin,
    Main,
}

pub fn is_login_route(path: &str) -> bool {
    let trimmed = path.trim_end_matches('/');
    trimmed == LOGIN_ROUTE
}

pub fn decide_view(settings: &SettingsState, is_admin: bool, path: &str) -> GateView {
    if is_login_route(path) {
        return GateView::AdminLogin;
    }
    match settings {
        SettingsState::Loading => GateView::Loading,
        SettingsState::Unavailable => GateView::Main,
        SettingsState::Loaded(s) if s.maintenance_mode && !is_admin => GateView::Maintenance,
        SettingsState::Loaded(_) => GateView::Main,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaintenanceContent {
    /// Raw markup from the settings document, rendered verbatim.
    Html(String),
    Message(String),
}

pub fn maintenance_content(settings: &SiteSettings) -> MaintenanceContent {
    let non_empty = |s: &Option<String>| s.as_deref().filter(|v| !v.trim().is_empty()).map(str::to_string);
    if let Some(html) = non_empty(&settings.custom_html) {
        return MaintenanceContent::Html(html);
    }
    MaintenanceContent::Message(
        non_empty(&settings.maintenance_message)
            .unwrap_or_else(|| DEFAULT_MAINTENANCE_MESSAGE.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::AdminSession;
    use leptos::prelude::{signal, Callback, Set};

    fn loaded(maintenance_mode: bool) -> SettingsState {
        SettingsState::Loaded(SiteSettings {
            maintenance_mode,
            ..Default::default()
        })
    }

    #[test]
    fn test_maintenance_gate() {
        assert_eq!(decide_view(&loaded(true), false, "/"), GateView::Maintenance);
        assert_eq!(decide_view(&loaded(true), true, "/"), GateView::Main);
        assert_eq!(decide_view(&loaded(false), false, "/"), GateView::Main);
        assert_eq!(decide_view(&loaded(false), true, "/"), GateView::Main);
        assert_eq!(
            decide_view(&loaded(true), false, "/contact"),
            GateView::Maintenance
        );
    }

    #[test]
    fn test_login_route_always_renders_login() {
        for state in [SettingsState::Loading, SettingsState::Unavailable, loaded(true)] {
            assert_eq!(decide_view(&state, false, "/login"), GateView::AdminLogin);
            assert_eq!(decide_view(&state, true, "/login/"), GateView::AdminLogin);
        }
        assert!(!is_login_route("/login-help"));
    }

    #[test]
    fn test_loading_and_fetch_failure() {
        assert_eq!(decide_view(&SettingsState::Loading, true, "/"), GateView::Loading);
        assert_eq!(decide_view(&SettingsState::Unavailable, false, "/"), GateView::Main);
    }

    #[test]
    fn test_logout_restores_maintenance() {
        let (flag, set_flag) = signal(false);
        let session =
            AdminSession::new(flag.into(), set_flag, Callback::new(move |_| set_flag.set(false)));
        let settings = loaded(true);

        session.login("admin", None).unwrap();
        assert_eq!(decide_view(&settings, session.is_admin(), "/"), GateView::Main);

        session.logout();
        assert_eq!(
            decide_view(&settings, session.is_admin(), "/"),
            GateView::Maintenance
        );
    }

    #[test]
    fn test_maintenance_content_prefers_custom_html() {
        let mut settings = SiteSettings {
            maintenance_mode: true,
            custom_html: Some("<h1>Brb</h1>".to_string()),
            maintenance_message: Some("Back at noon".to_string()),
            ..Default::default()
        };
        assert_eq!(
            maintenance_content(&settings),
            MaintenanceContent::Html("<h1>Brb</h1>".to_string())
        );

        settings.custom_html = Some("  ".to_string());
        assert_eq!(
            maintenance_content(&settings),
            MaintenanceContent::Message("Back at noon".to_string())
        );

        settings.maintenance_message = None;
        assert_eq!(
            maintenance_content(&settings),
            MaintenanceContent::Message(DEFAULT_MAINTENANCE_MESSAGE.to_string())
        );
    }
}
