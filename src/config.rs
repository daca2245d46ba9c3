use anyhow::Context;
use poise::serenity_prelude as serenity;
use serde::{de::Error, Deserialize, Deserializer};
use url::Url;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    pub dev: bool,
    #[serde(flatten)]
    pub secrets: Secrets,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(deserialize_with = "hex_color")]
    pub default_embed_color: serenity::Color,
    #[serde(default = "default_newsapi_url")]
    pub newsapi_url: Url,
    #[serde(default = "default_omdb_url")]
    pub omdb_url: Url,
}

/// Startup values for the secrets. API keys can be replaced at runtime
/// through [`crate::credentials::Credentials`].
#[derive(Deserialize, Debug, Clone)]
pub struct Secrets {
    pub bot_token: String,
    pub newsapi_key: Option<String>,
    pub omdb_key: Option<String>,
}

fn hex_color<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<serenity::Color, D::Error> {
    let s: String = Deserialize::deserialize(d)?;
    let result = u32::from_str_radix(s.trim_start_matches('#'), 16).map_err(D::Error::custom)?;
    Ok(serenity::Colour(result))
}

fn default_prefix() -> String {
    "!".into()
}

fn default_newsapi_url() -> Url {
    Url::parse("https://newsapi.org").expect("static url is valid")
}

fn default_omdb_url() -> Url {
    Url::parse("http://www.omdbapi.com").expect("static url is valid")
}

impl Config {
    /// Loads `.env` (or `.dev.env` when `DEV` is set) and reads the config from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let dev = std::env::var("DEV").is_ok();
        if dev {
            dotenvy::from_filename(".dev.env").context(".dev.env should exist")?;
        } else if let Err(e) = dotenvy::dotenv() {
            // a missing .env is fine when the environment is set some other way
            if !e.not_found() {
                return Err(e).context(".env is malformed");
            }
        }

        let mut config = envy::from_env::<Config>().context("Configuration is invalid")?;
        config.dev = dev;
        Ok(config)
    }
}
