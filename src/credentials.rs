use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use crate::config::Secrets;

/// An external API that needs a key.
#[derive(poise::ChoiceParameter, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    #[name = "newsapi"]
    NewsApi,
    #[name = "omdb"]
    Omdb,
}

/// API keys shared between the cogs.
///
/// Keys are read on every request, so a replaced key applies to the next
/// request without restarting anything.
#[derive(Debug, Default)]
pub struct Credentials {
    keys: RwLock<HashMap<Service, Arc<str>>>,
}

impl Credentials {
    pub fn from_secrets(secrets: &Secrets) -> Self {
        let credentials = Self::default();
        if let Some(key) = &secrets.newsapi_key {
            credentials.set(Service::NewsApi, key);
        }
        if let Some(key) = &secrets.omdb_key {
            credentials.set(Service::Omdb, key);
        }
        credentials
    }

    pub fn get(&self, service: Service) -> Option<Arc<str>> {
        self.keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&service)
            .cloned()
    }

    /// Replaces the key for `service`. A blank key removes it.
    pub fn set(&self, service: Service, key: &str) {
        let mut keys = self.keys.write().unwrap_or_else(PoisonError::into_inner);
        let key = key.trim();
        if key.is_empty() {
            keys.remove(&service);
        } else {
            keys.insert(service, Arc::from(key));
        }
    }
}

#[cfg(test)]
mod tests {
    use poise::ChoiceParameter;

    use super::*;

    #[test]
    fn keys_start_from_secrets() {
        let credentials = Credentials::from_secrets(&Secrets {
            bot_token: "token".into(),
            newsapi_key: Some("news".into()),
            omdb_key: None,
        });
        assert_eq!(credentials.get(Service::NewsApi).as_deref(), Some("news"));
        assert_eq!(credentials.get(Service::Omdb), None);
    }

    #[test]
    fn set_replaces_and_blank_clears() {
        let credentials = Credentials::default();
        credentials.set(Service::Omdb, "first");
        credentials.set(Service::Omdb, " second ");
        assert_eq!(credentials.get(Service::Omdb).as_deref(), Some("second"));

        credentials.set(Service::Omdb, "  ");
        assert_eq!(credentials.get(Service::Omdb), None);
    }

    #[test]
    fn services_parse_from_their_names() {
        assert_eq!(Service::from_name("newsapi"), Some(Service::NewsApi));
        assert_eq!(Service::from_name("omdb"), Some(Service::Omdb));
        assert_eq!(Service::from_name("imdb"), None);
    }
}
