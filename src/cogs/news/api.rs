use std::{fmt, sync::Arc};

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::credentials::{Credentials, Service};

/// Shown when the upstream fails without saying why.
pub const API_TROUBLE: &str = "There appears to be an issue with the API. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    TopHeadlines,
    Everything,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::TopHeadlines => "top-headlines",
            Self::Everything => "everything",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub endpoint: Endpoint,
    pub country: Option<String>,
    pub search: Option<String>,
}

impl Query {
    pub fn top(country: &str, search: Option<String>) -> Self {
        Self {
            endpoint: Endpoint::TopHeadlines,
            country: Some(country.to_lowercase()),
            search,
        }
    }

    pub fn top_global(search: String) -> Self {
        Self {
            endpoint: Endpoint::TopHeadlines,
            country: None,
            search: Some(search),
        }
    }

    pub fn everything(search: String) -> Self {
        Self {
            endpoint: Endpoint::Everything,
            country: None,
            search: Some(search),
        }
    }

    /// The request URL for this query against `base`.
    pub fn url(&self, base: &Url, key: &str) -> Url {
        let mut url = base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("v2")
                .push(self.endpoint.path());
        }
        {
            let mut params = url.query_pairs_mut();
            params.clear();
            if let Some(search) = &self.search {
                params.append_pair("q", search);
            }
            params.append_pair("sortBy", "publishedAt");
            if let Some(country) = &self.country {
                params.append_pair("country", country);
            }
            params.append_pair("apiKey", key);
            params.append_pair("page", "1");
        }
        url
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponse {
    pub status: Status,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub articles: Vec<Article>,
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub author: Option<String>,
    #[serde(default)]
    pub source: Source,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Source {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    MissingCredential,
    Upstream(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => write!(
                f,
                "No NewsAPI key has been set. Run `newssetup` for instructions."
            ),
            Self::Upstream(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Turns a finished HTTP exchange into a response or the upstream's complaint.
pub fn decode(status: StatusCode, body: &[u8]) -> Result<RawResponse, FetchError> {
    let response = match serde_json::from_slice::<RawResponse>(body) {
        Ok(response) => response,
        Err(e) => {
            warn!(%status, "Undecodable NewsAPI response: {e}");
            return Err(FetchError::Upstream(API_TROUBLE.into()));
        }
    };

    if status.is_success() && response.status == Status::Ok {
        Ok(response)
    } else {
        debug!(%status, code = ?response.code, "NewsAPI returned an error");
        Err(FetchError::Upstream(
            response.message.unwrap_or_else(|| API_TROUBLE.into()),
        ))
    }
}

pub struct NewsClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Arc<Credentials>,
}

impl NewsClient {
    pub fn new(http: reqwest::Client, base_url: Url, credentials: Arc<Credentials>) -> Self {
        Self {
            http,
            base_url,
            credentials,
        }
    }

    pub async fn fetch(&self, query: &Query) -> Result<RawResponse, FetchError> {
        let key = self
            .credentials
            .get(Service::NewsApi)
            .ok_or(FetchError::MissingCredential)?;

        let url = query.url(&self.base_url, &key);
        debug!(endpoint = query.endpoint.path(), "Fetching news");

        let transport = |e: reqwest::Error| {
            warn!("NewsAPI request failed: {}", e.without_url());
            FetchError::Upstream(API_TROUBLE.into())
        };
        let response = self.http.get(url).send().await.map_err(transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;

        decode(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://newsapi.org").unwrap()
    }

    #[test]
    fn top_query_url_has_country_and_no_search() {
        let url = Query::top("US", None).url(&base(), "secret");
        assert_eq!(url.path(), "/v2/top-headlines");
        assert_eq!(
            url.query(),
            Some("sortBy=publishedAt&country=us&apiKey=secret&page=1")
        );
    }

    #[test]
    fn base_path_is_kept() {
        for base in ["https://proxy.example.com/newsapi", "https://proxy.example.com/newsapi/"] {
            let url = Query::top_global("rust".into()).url(&Url::parse(base).unwrap(), "k");
            assert_eq!(url.path(), "/newsapi/v2/top-headlines");
        }
    }

    #[test]
    fn search_terms_are_encoded() {
        let url = Query::everything("rust & crabs".into()).url(&base(), "k");
        assert_eq!(url.path(), "/v2/everything");
        assert_eq!(
            url.query(),
            Some("q=rust+%26+crabs&sortBy=publishedAt&apiKey=k&page=1")
        );
    }

    #[test]
    fn decode_accepts_ok_responses() {
        let body = br#"{
            "status": "ok",
            "totalResults": 1,
            "articles": [
                {
                    "title": "t",
                    "source": {"id": null, "name": "Wire"},
                    "publishedAt": "2024-05-01T10:00:00Z"
                }
            ]
        }"#;
        let response = decode(StatusCode::OK, body).unwrap();
        assert_eq!(response.total_results, 1);
        assert_eq!(response.articles[0].source.name.as_deref(), Some("Wire"));
    }

    #[test]
    fn decode_surfaces_upstream_message() {
        let body = br#"{"status":"error","code":"apiKeyInvalid","message":"apiKeyInvalid"}"#;
        assert_eq!(
            decode(StatusCode::UNAUTHORIZED, body).unwrap_err(),
            FetchError::Upstream("apiKeyInvalid".into())
        );
    }

    #[test]
    fn decode_treats_error_status_in_body_as_failure() {
        let body = br#"{"status":"error","message":"rateLimited"}"#;
        assert_eq!(
            decode(StatusCode::OK, body).unwrap_err(),
            FetchError::Upstream("rateLimited".into())
        );
    }

    #[test]
    fn decode_falls_back_on_garbage() {
        assert_eq!(
            decode(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>").unwrap_err(),
            FetchError::Upstream(API_TROUBLE.into())
        );
    }

    #[tokio::test]
    async fn fetch_without_key_makes_no_request() {
        // nothing listens on this port; a request would fail with API_TROUBLE instead
        let client = NewsClient::new(
            reqwest::Client::new(),
            Url::parse("http://127.0.0.1:9").unwrap(),
            Arc::new(Credentials::default()),
        );
        assert_eq!(
            client.fetch(&Query::top("us", None)).await.unwrap_err(),
            FetchError::MissingCredential
        );
    }
}
