//! Announcement banner visibility.
//!
//! Dismissals are keyed by a digest of the announcement text rather than a
//! document id, so editing the text shows the banner again to everyone who
//! dismissed the previous wording.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::content::Announcement;
use crate::storage::KeyValueStore;

const DISMISSAL_PREFIX: &str = "announcement_dismissed_";

pub fn dismissal_key(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    format!("{DISMISSAL_PREFIX}{}", hex::encode(&digest[..8]))
}

pub fn is_visible<S: KeyValueStore + ?Sized>(
    announcement: Option<&Announcement>,
    now: DateTime<Utc>,
    store: &S,
) -> bool {
    let Some(a) = announcement else {
        return false;
    };
    if !a.is_active || a.text.is_empty() {
        return false;
    }
    if a.start_date.is_some_and(|start| now < start) {
        return false;
    }
    if a.end_date.is_some_and(|end| now > end) {
        return false;
    }
    !(a.closable && store.contains(&dismissal_key(&a.text)))
}

/// Records that the visitor closed this announcement. Repeat calls are no-ops.
pub fn dismiss<S: KeyValueStore + ?Sized>(announcement: &Announcement, store: &S) {
    let key = dismissal_key(&announcement.text);
    if store.contains(&key) {
        return;
    }
    log::debug!("dismissing announcement {key}");
    store.set(&key, "true");
}
