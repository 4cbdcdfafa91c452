use dashmap::DashMap;

/// String key-value storage that survives page reloads.
///
/// Implementations use interior mutability so one handle can be shared by
/// every component that reads or writes local state.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

/// The browser's `localStorage`.
///
/// Outside a hydrated browser there is no local storage: reads yield nothing
/// and writes are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

#[cfg(feature = "hydrate")]
impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        let storage = web_sys::window()?.local_storage().ok().flatten();
        if storage.is_none() {
            log::warn!("localStorage is unavailable");
        }
        storage
    }
}

#[cfg(feature = "hydrate")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                log::warn!("couldn't write {key} to localStorage");
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            if storage.remove_item(key).is_err() {
                log::warn!("couldn't remove {key} from localStorage");
            }
        }
    }
}

#[cfg(not(feature = "hydrate"))]
impl KeyValueStore for LocalStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) {}

    fn remove(&self, _key: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("isAdmin"), None);

        store.set("isAdmin", "true");
        assert_eq!(store.get("isAdmin").as_deref(), Some("true"));
        assert!(store.contains("isAdmin"));

        store.set("isAdmin", "false");
        assert_eq!(store.get("isAdmin").as_deref(), Some("false"));
        assert_eq!(store.len(), 1);

        store.remove("isAdmin");
        store.remove("isAdmin");
        assert!(!store.contains("isAdmin"));
    }

    #[test]
    fn test_store_through_reference() {
        let store = MemoryStore::new();
        let by_ref = &store;
        by_ref.set("cookie_consent", "accepted");
        assert_eq!(store.get("cookie_consent").as_deref(), Some("accepted"));
    }

    #[cfg(not(feature = "hydrate"))]
    #[test]
    fn test_local_store_is_inert_off_browser() {
        let store = LocalStore;
        store.set("isAdmin", "true");
        assert_eq!(store.get("isAdmin"), None);
    }
}
