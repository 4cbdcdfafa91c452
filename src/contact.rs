//! Contact form submission.
//!
//! The browser side drives [`ContactForm`]; the server side calls [`deliver`],
//! which decorates the message with the requester's rough location and hands
//! it to the mail relay. A relay call that completes counts as sent, whatever
//! the relay answers.

use std::{
    future::Future,
    net::{IpAddr, SocketAddr},
};

use chrono::{DateTime, Duration, Utc};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder for origin details that couldn't be determined.
pub const UNKNOWN: &str = "Unknown";

/// CAPTCHA tokens are single use and expire after this many seconds.
pub const CAPTCHA_TOKEN_TTL_SECS: i64 = 300;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("Please fill in your {0}.")]
    MissingField(Field),
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please complete the CAPTCHA first.")]
    CaptchaRequired,
    #[error("The CAPTCHA expired. Please complete it again.")]
    CaptchaExpired,
    #[error("A message is already being sent.")]
    InFlight,
    #[error("Failed to send message: {0}")]
    Delivery(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("relay request failed: {0}")]
    Dispatch(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeoError {
    #[error("geolocation lookup failed: {0}")]
    Lookup(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    AwaitingCaptcha,
    Submitting,
    Sent,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactFields {
    pub(crate) fn validate(&self) -> Result<(), ContactError> {
        for (field, value) in [
            (Field::Name, &self.name),
            (Field::Email, &self.email),
            (Field::Message, &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(ContactError::MissingField(field));
            }
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((user, domain)) if !user.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(ContactError::InvalidEmail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptchaToken {
    value: String,
    issued_at: DateTime<Utc>,
}

impl CaptchaToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.issued_at >= Duration::seconds(CAPTCHA_TOKEN_TTL_SECS)
    }
}

/// What the browser sends to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub message: String,
    pub captcha_token: String,
}

impl ContactPayload {
    /// The field and token checks of [`ContactForm::begin_submit`], repeated
    /// on the server.
    pub fn validate(&self) -> Result<(), ContactError> {
        ContactFields {
            name: self.name.clone(),
            email: self.email.clone(),
            message: self.message.clone(),
        }
        .validate()?;
        if self.captcha_token.trim().is_empty() {
            return Err(ContactError::CaptchaRequired);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub fields: ContactFields,
    token: Option<CaptchaToken>,
    state: SubmissionState,
}

impl ContactForm {
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn has_token(&self, now: DateTime<Utc>) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_expired(now))
    }

    pub fn edit(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.fields.name = value,
            Field::Email => self.fields.email = value,
            Field::Message => self.fields.message = value,
        }
        if matches!(self.state, SubmissionState::Sent | SubmissionState::Failed) {
            self.state = SubmissionState::Idle;
        }
    }

    /// Called by the CAPTCHA widget whenever it issues a token.
    pub fn receive_token(&mut self, value: String, now: DateTime<Utc>) {
        self.token = Some(CaptchaToken {
            value,
            issued_at: now,
        });
    }

    pub fn expire_token(&mut self) {
        self.token = None;
    }

    /// Validates the form and takes the CAPTCHA token.
    ///
    /// On success the form is `Submitting` and the returned payload must be
    /// delivered, followed by a call to [`ContactForm::finish`]. On failure the
    /// form returns to `Idle` with its fields untouched, and nothing may be
    /// sent.
    pub fn begin_submit(&mut self, now: DateTime<Utc>) -> Result<ContactPayload, ContactError> {
        if self.state == SubmissionState::Submitting {
            return Err(ContactError::InFlight);
        }

        self.state = SubmissionState::Validating;
        if let Err(e) = self.fields.validate() {
            self.state = SubmissionState::Idle;
            return Err(e);
        }

        self.state = SubmissionState::AwaitingCaptcha;
        let token = match self.token.take() {
            None => {
                self.state = SubmissionState::Idle;
                return Err(ContactError::CaptchaRequired);
            }
            Some(t) if t.is_expired(now) => {
                self.state = SubmissionState::Idle;
                return Err(ContactError::CaptchaExpired);
            }
            Some(t) => t,
        };

        self.state = SubmissionState::Submitting;
        Ok(ContactPayload {
            name: self.fields.name.trim().to_string(),
            email: self.fields.email.trim().to_string(),
            message: self.fields.message.clone(),
            captcha_token: token.value,
        })
    }

    /// Records the delivery outcome. The token was consumed either way.
    pub fn finish(&mut self, outcome: Result<(), ContactError>) {
        match outcome {
            Ok(()) => {
                self.fields = ContactFields::default();
                self.state = SubmissionState::Sent;
                log::debug!("contact message sent");
            }
            Err(e) => {
                self.state = SubmissionState::Failed;
                log::warn!("contact message failed: {e}");
            }
        }
    }
}

/// Coarse requester location attached to relayed messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub ip: String,
    pub location: String,
}

impl Origin {
    pub fn unknown() -> Self {
        Self {
            ip: UNKNOWN.to_string(),
            location: UNKNOWN.to_string(),
        }
    }

    pub fn from_lookup(requested: IpAddr, info: GeoInfo) -> Self {
        let place = [info.city, info.country_name]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>();
        Self {
            ip: info
                .ip
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| requested.to_string()),
            location: if place.is_empty() {
                UNKNOWN.to_string()
            } else {
                place.join(", ")
            },
        }
    }
}

/// Response body of the geolocation service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GeoInfo {
    pub ip: Option<String>,
    pub country_name: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayMessage {
    pub payload: ContactPayload,
    pub origin: Origin,
}

impl RelayMessage {
    /// Flat key-value form sent to the relay.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.payload.name.clone()),
            ("email", self.payload.email.clone()),
            ("message", self.payload.message.clone()),
            ("captcha_token", self.payload.captcha_token.clone()),
            ("ip", self.origin.ip.clone()),
            ("location", self.origin.location.clone()),
        ]
    }
}

pub trait Relay {
    /// Resolves once the request has been dispatched and answered.
    fn send(&self, message: &RelayMessage) -> impl Future<Output = Result<(), RelayError>> + Send;
}

pub trait GeoLocator {
    fn locate(&self, ip: IpAddr) -> impl Future<Output = Result<GeoInfo, GeoError>> + Send;
}

/// Validates the payload, then relays it. Rejected payloads never reach the
/// network: no lookup, no relay call.
pub async fn deliver<G, R>(
    payload: ContactPayload,
    client_ip: Option<IpAddr>,
    geo: &G,
    relay: &R,
) -> Result<(), ContactError>
where
    G: GeoLocator,
    R: Relay,
{
    payload.validate()?;
    let origin = match client_ip {
        Some(ip) => match geo.locate(ip).await {
            Ok(info) => Origin::from_lookup(ip, info),
            Err(e) => {
                log::warn!("{e}, sending without location");
                Origin {
                    ip: ip.to_string(),
                    location: UNKNOWN.to_string(),
                }
            }
        },
        None => Origin::unknown(),
    };
    let message = RelayMessage { payload, origin };
    relay
        .send(&message)
        .await
        .map_err(|e| ContactError::Delivery(e.to_string()))
}

/// Requester address, preferring proxy headers over the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<IpAddr> {
    let forwarded: Option<IpAddr> = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok());
    let real_ip = || -> Option<IpAddr> {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    };
    forwarded.or_else(real_ip).or(peer.map(|p| p.ip()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 2, 9, 30, 0).unwrap()
    }

    fn filled() -> ContactForm {
        let mut form = ContactForm::default();
        form.edit(Field::Name, "Ada".to_string());
        form.edit(Field::Email, "ada@example.com".to_string());
        form.edit(Field::Message, "Hi there".to_string());
        form
    }

    #[test]
    fn test_submit_without_captcha_is_blocked() {
        let mut form = filled();
        assert_eq!(form.begin_submit(now()), Err(ContactError::CaptchaRequired));
        assert_eq!(form.state(), SubmissionState::Idle);
        assert_eq!(form.fields.name, "Ada");
    }

    #[test]
    fn test_validation_runs_before_captcha() {
        let mut form = ContactForm::default();
        form.receive_token("tok".to_string(), now());
        assert_eq!(
            form.begin_submit(now()),
            Err(ContactError::MissingField(Field::Name))
        );
        // the token survives a validation failure
        assert!(form.has_token(now()));

        form.edit(Field::Name, "Ada".to_string());
        form.edit(Field::Email, "not-an-email".to_string());
        form.edit(Field::Message, "Hello".to_string());
        assert_eq!(form.begin_submit(now()), Err(ContactError::InvalidEmail));
        assert_eq!(form.state(), SubmissionState::Idle);
    }

    #[test]
    fn test_successful_submission_clears_form() {
        let mut form = filled();
        form.receive_token("tok-1".to_string(), now());

        let payload = form.begin_submit(now()).unwrap();
        assert_eq!(form.state(), SubmissionState::Submitting);
        assert_eq!(payload.captcha_token, "tok-1");
        assert_eq!(payload.email, "ada@example.com");
        assert!(!form.has_token(now()));
        assert_eq!(form.begin_submit(now()), Err(ContactError::InFlight));

        form.finish(Ok(()));
        assert_eq!(form.state(), SubmissionState::Sent);
        assert_eq!(form.fields, ContactFields::default());
        assert!(!form.has_token(now()));

        form.edit(Field::Name, "B".to_string());
        assert_eq!(form.state(), SubmissionState::Idle);
    }

    #[test]
    fn test_failed_submission_keeps_fields_and_needs_new_token() {
        let mut form = filled();
        form.receive_token("tok-1".to_string(), now());
        form.begin_submit(now()).unwrap();

        form.finish(Err(ContactError::Delivery("timeout".to_string())));
        assert_eq!(form.state(), SubmissionState::Failed);
        assert_eq!(form.fields.name, "Ada");
        assert_eq!(form.fields.message, "Hi there");

        assert_eq!(form.begin_submit(now()), Err(ContactError::CaptchaRequired));

        form.receive_token("tok-2".to_string(), now());
        assert_eq!(form.begin_submit(now()).unwrap().captcha_token, "tok-2");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut form = filled();
        form.receive_token("old".to_string(), now());
        let later = now() + Duration::seconds(CAPTCHA_TOKEN_TTL_SECS);
        assert!(!form.has_token(later));
        assert_eq!(form.begin_submit(later), Err(ContactError::CaptchaExpired));
        assert_eq!(form.begin_submit(later), Err(ContactError::CaptchaRequired));
    }

    #[test]
    fn test_widget_expiry_drops_token() {
        let mut form = filled();
        form.receive_token("tok".to_string(), now());
        form.expire_token();
        assert_eq!(form.begin_submit(now()), Err(ContactError::CaptchaRequired));
    }

    #[derive(Default)]
    struct RecordingRelay {
        sent: Mutex<Vec<RelayMessage>>,
        fail: bool,
    }

    impl Relay for RecordingRelay {
        async fn send(&self, message: &RelayMessage) -> Result<(), RelayError> {
            if self.fail {
                return Err(RelayError::Dispatch("connection refused".to_string()));
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    struct FixedGeo(Result<GeoInfo, GeoError>);

    impl GeoLocator for FixedGeo {
        async fn locate(&self, _ip: IpAddr) -> Result<GeoInfo, GeoError> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct CountingGeo {
        lookups: Mutex<usize>,
    }

    impl GeoLocator for CountingGeo {
        async fn locate(&self, _ip: IpAddr) -> Result<GeoInfo, GeoError> {
            *self.lookups.lock().unwrap() += 1;
            Ok(GeoInfo::default())
        }
    }

    fn payload() -> ContactPayload {
        ContactPayload {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Hello".to_string(),
            captcha_token: "tok".to_string(),
        }
    }

    #[tokio::test]
    async fn test_deliver_adds_location() {
        let relay = RecordingRelay::default();
        let geo = FixedGeo(Ok(GeoInfo {
            ip: Some("203.0.113.7".to_string()),
            country_name: Some("Hungary".to_string()),
            city: Some("Budapest".to_string()),
        }));
        let ip: IpAddr = "203.0.113.7".parse().unwrap();

        deliver(payload(), Some(ip), &geo, &relay).await.unwrap();

        let sent = relay.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let fields = sent[0].fields();
        assert!(fields.contains(&("location", "Budapest, Hungary".to_string())));
        assert!(fields.contains(&("ip", "203.0.113.7".to_string())));
        assert!(fields.contains(&("captcha_token", "tok".to_string())));
    }

    #[tokio::test]
    async fn test_geolocation_failure_is_not_fatal() {
        let relay = RecordingRelay::default();
        let geo = FixedGeo(Err(GeoError::Lookup("timed out".to_string())));
        let ip: IpAddr = "198.51.100.1".parse().unwrap();

        deliver(payload(), Some(ip), &geo, &relay).await.unwrap();

        let sent = relay.sent.lock().unwrap();
        assert_eq!(sent[0].origin.ip, "198.51.100.1");
        assert_eq!(sent[0].origin.location, UNKNOWN);
    }

    #[tokio::test]
    async fn test_unknown_requester_skips_lookup() {
        let relay = RecordingRelay::default();
        let geo = FixedGeo(Ok(GeoInfo {
            city: Some("Nowhere".to_string()),
            ..Default::default()
        }));
        deliver(payload(), None, &geo, &relay).await.unwrap();
        assert_eq!(relay.sent.lock().unwrap()[0].origin, Origin::unknown());
    }

    #[tokio::test]
    async fn test_relay_failure_propagates() {
        let relay = RecordingRelay {
            fail: true,
            ..Default::default()
        };
        let geo = FixedGeo(Ok(GeoInfo::default()));
        let res = deliver(payload(), None, &geo, &relay).await;
        assert!(matches!(res, Err(ContactError::Delivery(_))));
    }

    #[test]
    fn test_origin_from_partial_lookup() {
        let ip: IpAddr = "192.0.2.1".parse().unwrap();
        let origin = Origin::from_lookup(
            ip,
            GeoInfo {
                country_name: Some("Austria".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(origin.ip, "192.0.2.1");
        assert_eq!(origin.location, "Austria");
        assert_eq!(Origin::from_lookup(ip, GeoInfo::default()).location, UNKNOWN);
    }

    #[test]
    fn test_client_ip_sources() {
        let peer: SocketAddr = "10.0.0.5:51000".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, None), None);
        assert_eq!(client_ip(&headers, Some(peer)), Some(peer.ip()));

        headers.insert("x-real-ip", "198.51.100.2".parse().unwrap());
        assert_eq!(
            client_ip(&headers, Some(peer)),
            Some("198.51.100.2".parse().unwrap())
        );

        headers.insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
        assert_eq!(
            client_ip(&headers, Some(peer)),
            Some("203.0.113.9".parse().unwrap())
        );

        headers.insert("x-forwarded-for", "garbage".parse().unwrap());
        assert_eq!(
            client_ip(&headers, None),
            Some("198.51.100.2".parse().unwrap())
        );
    }

    #[tokio::test]
    async fn test_deliver_rejects_invalid_payload() {
        let ip: IpAddr = "203.0.113.7".parse().unwrap();
        let cases = [
            (
                ContactPayload {
                    name: String::new(),
                    email: String::new(),
                    message: String::new(),
                    captcha_token: String::new(),
                },
                ContactError::MissingField(Field::Name),
            ),
            (
                ContactPayload {
                    email: "not-an-email".to_string(),
                    ..payload()
                },
                ContactError::InvalidEmail,
            ),
            (
                ContactPayload {
                    captcha_token: "  ".to_string(),
                    ..payload()
                },
                ContactError::CaptchaRequired,
            ),
        ];
        for (bad, expected) in cases {
            let relay = RecordingRelay::default();
            let geo = CountingGeo::default();
            assert_eq!(deliver(bad, Some(ip), &geo, &relay).await, Err(expected));
            assert!(relay.sent.lock().unwrap().is_empty());
            assert_eq!(*geo.lookups.lock().unwrap(), 0);
        }
    }

    #[test]
    fn test_payload_validate_accepts_complete_submission() {
        assert_eq!(payload().validate(), Ok(()));
    }
}
