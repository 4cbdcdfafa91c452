//! HTTP implementations of the contact relay and the geolocation lookup.

use std::{fmt, net::IpAddr, time::Duration};

use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::{GeoConfig, RelayConfig};
use crate::contact::{GeoError, GeoInfo, GeoLocator, Relay, RelayError, RelayMessage};
use crate::services::ServiceError;

/// Posts contact messages as a form to a mail relay.
#[derive(Clone)]
pub struct HttpRelay {
    http: Client,
    endpoint: Url,
    access_key: Option<String>,
}

impl fmt::Debug for HttpRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRelay")
            .field("endpoint", &self.endpoint.as_str())
            .field("access_key", &self.access_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpRelay {
    pub fn new(config: &RelayConfig) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        if config.access_key.is_none() {
            warn!("no relay access key configured, contact messages will likely be rejected");
        }
        Ok(Self {
            http,
            endpoint: Url::parse(&config.endpoint)?,
            access_key: config.access_key.clone(),
        })
    }

    fn form(&self, message: &RelayMessage) -> Vec<(&'static str, String)> {
        let mut form = message.fields();
        if let Some(key) = &self.access_key {
            form.push(("access_key", key.clone()));
        }
        form
    }
}

impl Relay for HttpRelay {
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn send(&self, message: &RelayMessage) -> Result<(), RelayError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .form(&self.form(message))
            .send()
            .await
            .map_err(|e| RelayError::Dispatch(e.to_string()))?;

        // Any answer from the relay means the message left this server.
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "relay answered with a non-success status");
        } else {
            debug!(%status, "contact message relayed");
        }
        Ok(())
    }
}

/// Looks up a requester's approximate location from a JSON IP service.
#[derive(Debug, Clone)]
pub struct HttpGeoLocator {
    http: Client,
    endpoint: String,
}

impl HttpGeoLocator {
    pub fn new(config: &GeoConfig) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    fn lookup_url(&self, ip: IpAddr) -> String {
        self.endpoint.replace("{ip}", &ip.to_string())
    }
}

impl GeoLocator for HttpGeoLocator {
    #[instrument(skip(self))]
    async fn locate(&self, ip: IpAddr) -> Result<GeoInfo, GeoError> {
        self.http
            .get(self.lookup_url(ip))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| GeoError::Lookup(e.to_string()))?
            .json::<GeoInfo>()
            .await
            .map_err(|e| GeoError::Lookup(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{ContactPayload, Origin};

    fn message() -> RelayMessage {
        RelayMessage {
            payload: ContactPayload {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                message: "Hi".to_string(),
                captcha_token: "tok".to_string(),
            },
            origin: Origin::unknown(),
        }
    }

    #[test]
    fn test_geo_endpoint_template() {
        let geo = HttpGeoLocator::new(&GeoConfig::default()).unwrap();
        let ip: IpAddr = "203.0.113.7".parse().unwrap();
        assert_eq!(geo.lookup_url(ip), "https://ipapi.co/203.0.113.7/json/");

        let v6: IpAddr = "2001:db8::1".parse().unwrap();
        assert_eq!(geo.lookup_url(v6), "https://ipapi.co/2001:db8::1/json/");
    }

    #[test]
    fn test_relay_form_carries_access_key() {
        let config = RelayConfig {
            access_key: Some("secret-key".to_string()),
            ..Default::default()
        };
        let relay = HttpRelay::new(&config).unwrap();
        let form = relay.form(&message());
        assert_eq!(form.last(), Some(&("access_key", "secret-key".to_string())));
        assert!(form.contains(&("location", "Unknown".to_string())));

        let keyless = HttpRelay::new(&RelayConfig::default()).unwrap();
        assert!(keyless.form(&message()).iter().all(|(k, _)| *k != "access_key"));
    }

    #[test]
    fn test_relay_rejects_bad_endpoint() {
        let config = RelayConfig {
            endpoint: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(HttpRelay::new(&config), Err(ServiceError::Url(_))));
    }

    #[test]
    fn test_debug_redacts_access_key() {
        let config = RelayConfig {
            access_key: Some("secret-key".to_string()),
            ..Default::default()
        };
        let relay = HttpRelay::new(&config).unwrap();
        let debug = format!("{relay:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
