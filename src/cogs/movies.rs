use std::{fmt, sync::Arc};

use poise::{serenity_prelude as serenity, CreateReply};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::{
    credentials::{Credentials, Service},
    util::{random_colour, web_url},
    Context, Result,
};

use super::{About, Cog};

pub const ABOUT: About = About {
    category: "Movies",
    version: "0.0.1",
    author: None,
};

pub fn cog() -> Cog {
    Cog::new(vec![movie()], ABOUT)
}

/// An OMDb title lookup. Every field is optional; OMDb leaves some out and
/// writes `N/A` for others.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Movie {
    pub title: Option<String>,
    pub plot: Option<String>,
    pub poster: Option<String>,
    pub year: Option<String>,
    pub released: Option<String>,
    pub runtime: Option<String>,
    pub director: Option<String>,
    pub rated: Option<String>,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    pub genre: Option<String>,
    pub response: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rating {
    pub source: String,
    pub value: String,
}

fn known(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "N/A")
}

impl Movie {
    pub fn poster_url(&self) -> Option<Url> {
        known(&self.poster).and_then(web_url)
    }

    /// Inline fields in display order, skipping anything OMDb didn't know.
    pub fn fields(&self) -> Vec<(String, String)> {
        let labelled = |label: &str, value: &Option<String>| {
            known(value).map(|v| (label.to_string(), v.to_string()))
        };

        let mut fields: Vec<_> = [
            labelled("Year:", &self.year),
            labelled("Released:", &self.released),
            labelled("Runtime:", &self.runtime),
            labelled("Director", &self.director),
            labelled("Rating:", &self.rated),
        ]
        .into_iter()
        .flatten()
        .collect();
        fields.extend(
            self.ratings
                .iter()
                .map(|r| (format!("{}:", r.source), r.value.clone())),
        );
        fields.extend(labelled("Genre:", &self.genre));
        fields
    }

    pub fn embed(&self, colour: serenity::Colour, poster: Option<&Url>) -> serenity::CreateEmbed {
        let mut embed = serenity::CreateEmbed::new().colour(colour).fields(
            self.fields()
                .into_iter()
                .map(|(name, value)| (name, value, true)),
        );
        if let Some(title) = known(&self.title) {
            embed = embed.title(title);
        }
        if let Some(plot) = known(&self.plot) {
            embed = embed.description(plot);
        }
        if let Some(poster) = poster {
            embed = embed.thumbnail(poster.as_str());
        }
        embed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieError {
    MissingCredential,
    InvalidTitleOrKey,
    Unreachable,
}

impl fmt::Display for MovieError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => write!(
                f,
                "No OMDb key has been set. Get one at https://www.omdbapi.com/apikey.aspx \
                 and set it with `setapi omdb <key>`."
            ),
            Self::InvalidTitleOrKey => write!(f, "Ensure the title is valid."),
            Self::Unreachable => write!(
                f,
                "The movie database could not be reached. Please try again later."
            ),
        }
    }
}

impl std::error::Error for MovieError {}

/// Reads an OMDb response body. Failed lookups and undecodable bodies are both
/// reported as an invalid title.
pub fn decode(body: &[u8]) -> Result<Movie, MovieError> {
    let movie = serde_json::from_slice::<Movie>(body).map_err(|e| {
        warn!("Undecodable OMDb response: {e}");
        MovieError::InvalidTitleOrKey
    })?;

    if movie.response.as_deref() == Some("False") || known(&movie.title).is_none() {
        debug!(error = ?movie.error, "OMDb lookup failed");
        return Err(MovieError::InvalidTitleOrKey);
    }
    Ok(movie)
}

pub struct MovieClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Arc<Credentials>,
}

impl MovieClient {
    pub fn new(http: reqwest::Client, base_url: Url, credentials: Arc<Credentials>) -> Self {
        Self {
            http,
            base_url,
            credentials,
        }
    }

    pub fn url(&self, title: &str, key: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("t", title.trim())
            .append_pair("apikey", key);
        url
    }

    pub async fn lookup(&self, title: &str) -> Result<Movie, MovieError> {
        let key = self
            .credentials
            .get(Service::Omdb)
            .ok_or(MovieError::MissingCredential)?;

        let transport = |e: reqwest::Error| {
            warn!("OMDb request failed: {}", e.without_url());
            MovieError::Unreachable
        };
        // OMDb reports bad keys with a JSON body too, so the status is not checked
        let body = self
            .http
            .get(self.url(title, &key))
            .send()
            .await
            .map_err(transport)?
            .bytes()
            .await
            .map_err(transport)?;

        decode(&body)
    }
}

/// Movie information lookup.
#[poise::command(prefix_command, slash_command)]
async fn movie(
    ctx: Context<'_>,
    #[description = "Title to look up"]
    #[rest]
    title: String,
) -> Result<()> {
    ctx.defer_or_broadcast().await?;

    let movie = match ctx.data().movies.lookup(&title).await {
        Ok(movie) => movie,
        Err(e) => {
            ctx.say(e.to_string()).await?;
            return Ok(());
        }
    };

    let colour = random_colour();
    let poster = movie.poster_url();
    let Err(e) = ctx
        .send(CreateReply::default().embed(movie.embed(colour, poster.as_ref())))
        .await
    else {
        return Ok(());
    };

    // discord refuses some poster urls, so try once more without the thumbnail
    if poster.is_some() {
        warn!("Movie embed rejected, retrying without the poster: {e}");
        if ctx
            .send(CreateReply::default().embed(movie.embed(colour, None)))
            .await
            .is_ok()
        {
            return Ok(());
        }
    } else {
        warn!("Movie embed rejected: {e}");
    }
    ctx.say(MovieError::InvalidTitleOrKey.to_string()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARRIVAL: &[u8] = br#"{
        "Title": "Arrival",
        "Year": "2016",
        "Rated": "PG-13",
        "Released": "11 Nov 2016",
        "Runtime": "116 min",
        "Genre": "Drama, Mystery, Sci-Fi",
        "Director": "Denis Villeneuve",
        "Plot": "A linguist works with the military to communicate with alien lifeforms.",
        "Poster": "https://m.media-amazon.com/images/arrival.jpg",
        "Ratings": [
            {"Source": "Internet Movie Database", "Value": "7.9/10"},
            {"Source": "Rotten Tomatoes", "Value": "94%"}
        ],
        "Response": "True"
    }"#;

    #[test]
    fn full_movie_fields_in_order() {
        let movie = decode(ARRIVAL).unwrap();
        let names: Vec<_> = movie.fields().into_iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            [
                "Year:",
                "Released:",
                "Runtime:",
                "Director",
                "Rating:",
                "Internet Movie Database:",
                "Rotten Tomatoes:",
                "Genre:"
            ]
        );
        assert_eq!(
            movie.poster_url().map(String::from).as_deref(),
            Some("https://m.media-amazon.com/images/arrival.jpg")
        );
    }

    #[test]
    fn unknown_values_are_skipped() {
        let body = br#"{
            "Title": "Obscure",
            "Year": "1999",
            "Poster": "N/A",
            "Director": "N/A",
            "Response": "True"
        }"#;
        let movie = decode(body).unwrap();
        assert_eq!(movie.fields(), vec![("Year:".to_string(), "1999".to_string())]);
        assert_eq!(movie.poster_url(), None);
    }

    #[test]
    fn embed_without_poster_has_no_thumbnail() {
        let movie = decode(ARRIVAL).unwrap();
        let poster = movie.poster_url();

        let full = serde_json::to_value(movie.embed(serenity::Colour(1), poster.as_ref())).unwrap();
        assert_eq!(full["title"], "Arrival");
        assert_eq!(full["thumbnail"]["url"], "https://m.media-amazon.com/images/arrival.jpg");
        assert_eq!(full["fields"].as_array().map(Vec::len), Some(8));
        assert_eq!(full["fields"][0]["inline"], true);

        let reduced = serde_json::to_value(movie.embed(serenity::Colour(1), None)).unwrap();
        assert!(reduced["thumbnail"].is_null());
        assert_eq!(reduced["fields"], full["fields"]);
    }

    #[test]
    fn failed_lookups_are_invalid_titles() {
        let bodies: [&[u8]; 4] = [
            br#"{"Response":"False","Error":"Movie not found!"}"#,
            br#"{"Response":"False","Error":"Invalid API key!"}"#,
            br#"{"Plot":"no title here","Response":"True"}"#,
            b"<html>",
        ];
        for body in bodies {
            assert_eq!(decode(body).unwrap_err(), MovieError::InvalidTitleOrKey);
        }
    }

    #[test]
    fn url_carries_title_and_key() {
        let client = MovieClient::new(
            reqwest::Client::new(),
            Url::parse("http://www.omdbapi.com").unwrap(),
            Arc::new(Credentials::default()),
        );
        let url = client.url(" The Thing ", "k3y");
        assert_eq!(url.as_str(), "http://www.omdbapi.com/?t=The+Thing&apikey=k3y");
    }

    #[tokio::test]
    async fn lookup_needs_a_key() {
        let client = MovieClient::new(
            reqwest::Client::new(),
            Url::parse("http://127.0.0.1:9").unwrap(),
            Arc::new(Credentials::default()),
        );
        assert_eq!(
            client.lookup("Arrival").await.unwrap_err(),
            MovieError::MissingCredential
        );
    }
}
