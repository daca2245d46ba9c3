use poise::serenity_prelude as serenity;
use url::Url;

/// Parses `candidate` as an absolute http(s) URL with a host.
pub fn web_url(candidate: &str) -> Option<Url> {
    let url = Url::parse(candidate.trim()).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|host| !host.is_empty()) => Some(url),
        _ => None,
    }
}

/// Fully saturated, full brightness colour for a hue in `[0, 1)`.
pub fn hue_colour(hue: f64) -> serenity::Colour {
    let sector = hue.rem_euclid(1.0) * 6.0;
    let rising = sector.fract();
    let falling = 1.0 - rising;
    let (r, g, b) = match sector as u8 {
        0 => (1.0, rising, 0.0),
        1 => (falling, 1.0, 0.0),
        2 => (0.0, 1.0, rising),
        3 => (0.0, falling, 1.0),
        4 => (rising, 0.0, 1.0),
        _ => (1.0, 0.0, falling),
    };
    let channel = |v: f64| (v * 255.0).round() as u8;
    serenity::Colour::from_rgb(channel(r), channel(g), channel(b))
}

pub fn random_colour() -> serenity::Colour {
    hue_colour(rand::random())
}

/// Shortens `text` to at most `limit` characters, marking the cut with an ellipsis.
pub fn clip(text: String, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text;
    }
    let mut clipped: String = text.chars().take(limit.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}
