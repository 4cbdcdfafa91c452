//! Locally persisted visitor state: the admin bypass flag and cookie consent.
//!
//! The admin flag is a soft gate. The password is a plaintext value from the
//! settings document, compared on the client with no rate limiting, so it
//! keeps casual visitors out of maintenance mode and protects nothing.

use std::{fmt, str::FromStr, time::Duration};

use leptos::prelude::*;
use thiserror::Error;

/// Local storage key of the admin flag. The stored value is `true` when set.
pub const ADMIN_KEY: &str = "isAdmin";
pub const CONSENT_KEY: &str = "cookie_consent";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// How long a failed login message stays on screen.
pub const LOGIN_ERROR_CLEAR_DELAY: Duration = Duration::from_millis(2000);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("Incorrect password")]
    WrongPassword,
}

/// Unset or empty passwords fall back to [`DEFAULT_ADMIN_PASSWORD`].
pub fn password_matches(input: &str, configured: Option<&str>) -> bool {
    let expected = configured
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_ADMIN_PASSWORD);
    input == expected
}

/// Reactive admin flag. In the browser it is backed by `use_local_storage`
/// under [`ADMIN_KEY`], so reads track the stored value.
#[derive(Clone, Copy)]
pub struct AdminSession {
    flag: Signal<bool>,
    set_flag: WriteSignal<bool>,
    clear: Callback<()>,
}

impl AdminSession {
    /// `clear` must remove the stored flag, not just reset the signal.
    pub fn new(flag: Signal<bool>, set_flag: WriteSignal<bool>, clear: Callback<()>) -> Self {
        Self {
            flag,
            set_flag,
            clear,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.flag.get()
    }

    pub fn login(&self, input: &str, configured: Option<&str>) -> Result<(), SessionError> {
        if !password_matches(input, configured) {
            log::debug!("admin login rejected");
            return Err(SessionError::WrongPassword);
        }
        self.set_flag.set(true);
        log::debug!("admin login accepted");
        Ok(())
    }

    pub fn logout(&self) {
        self.clear.run(());
    }
}

/// The failed-login message. Every failure hands out a new ticket and only
/// the newest ticket may clear the message, so a timer left over from an
/// earlier failure can't cut a later message short.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginNotice {
    message: Option<String>,
    ticket: u64,
}

impl LoginNotice {
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Shows `message` and returns the ticket its clear timer must present.
    pub fn show(&mut self, message: impl Into<String>) -> u64 {
        self.ticket += 1;
        self.message = Some(message.into());
        self.ticket
    }

    /// Returns whether the message was cleared.
    pub fn expire(&mut self, ticket: u64) -> bool {
        if ticket != self.ticket || self.message.is_none() {
            return false;
        }
        self.message = None;
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CookieConsent {
    #[default]
    Unset,
    Accepted,
    Declined,
}

impl fmt::Display for CookieConsent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unset => "",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized cookie consent value: {0}")]
pub struct ConsentParseError(String);

impl FromStr for CookieConsent {
    type Err = ConsentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Self::Unset),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            other => Err(ConsentParseError(other.to_string())),
        }
    }
}
