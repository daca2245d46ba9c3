use std::sync::Arc;

use tracing::warn;

use crate::{
    cogs::{movies::MovieClient, news::NewsClient},
    config::Config,
    credentials::{Credentials, Service},
    Result,
};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// Shared state
pub struct Data {
    pub config: Config,
    pub credentials: Arc<Credentials>,
    pub news: NewsClient,
    pub movies: MovieClient,
}

impl Data {
    pub fn from_config(config: Config) -> Result<Self> {
        // one client for the whole process, so connections are pooled across commands
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let credentials = Arc::new(Credentials::from_secrets(&config.secrets));

        for service in [Service::NewsApi, Service::Omdb] {
            if credentials.get(service).is_none() {
                warn!("No {service:?} key configured; set one with the setapi command");
            }
        }

        Ok(Self {
            news: NewsClient::new(
                http.clone(),
                config.newsapi_url.clone(),
                Arc::clone(&credentials),
            ),
            movies: MovieClient::new(http, config.omdb_url.clone(), Arc::clone(&credentials)),
            credentials,
            config,
        })
    }
}
