//! NewsAPI lookups: build a [`Query`], fetch it, normalize the articles into
//! [`DisplayItem`]s and show them one card at a time.

use poise::{serenity_prelude as serenity, CreateReply};
use tracing::debug;

use crate::{Context, Result};

use super::{About, Cog};

mod api;
mod menu;
mod normalize;

pub use api::{NewsClient, Query};
use menu::{accepts_press, next_press, present, Control, Menu, PresentationPlan};
pub use normalize::{normalize, DisplayItem, NormalizeError};

pub const ABOUT: About = About {
    category: "News",
    version: "0.0.1",
    author: Some("flare#0001"),
};

/// Country codes NewsAPI serves top headlines for.
pub const COUNTRY_CODES: &[&str] = &[
    "ae", "ar", "at", "au", "be", "bg", "br", "ca", "ch", "cn", "co", "cu", "cz", "de", "eg", "fr",
    "gb", "gr", "hk", "hu", "id", "ie", "il", "in", "it", "jp", "kr", "lt", "lv", "ma", "mx", "my",
    "ng", "nl", "no", "nz", "ph", "pl", "pt", "ro", "rs", "ru", "sa", "se", "sg", "si", "sk", "th",
    "tr", "tw", "ua", "us", "ve", "za",
];

pub fn cog() -> Cog {
    Cog::new(vec![news(), newssetup()], ABOUT)
}

fn card(item: &DisplayItem, colour: serenity::Colour) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .colour(colour)
        .footer(serenity::CreateEmbedFooter::new(item.footer()));
    // discord rejects empty strings in these
    if !item.title.is_empty() {
        embed = embed.title(&item.title);
    }
    if !item.body.is_empty() {
        embed = embed.description(&item.body);
    }
    if !item.byline.is_empty() {
        embed = embed.author(serenity::CreateEmbedAuthor::new(&item.byline));
    }
    if let Some(link) = &item.link {
        embed = embed.url(link.as_str());
    }
    if let Some(image) = &item.image_url {
        embed = embed.image(image.as_str());
    }
    if let Some(timestamp) = item.timestamp {
        embed = embed.timestamp(timestamp);
    }
    embed
}

fn buttons(menu_id: u64) -> serenity::CreateActionRow {
    serenity::CreateActionRow::Buttons(
        Control::ALL
            .into_iter()
            .map(|control| {
                serenity::CreateButton::new(control.custom_id(menu_id)).emoji(control.emoji())
            })
            .collect(),
    )
}

async fn paginate(ctx: Context<'_>, mut menu: Menu, colour: serenity::Colour) -> Result<()> {
    let menu_id = ctx.id();
    debug!(menu_id, pages = menu.len(), "Opening news menu");
    let Some(first) = menu.start() else {
        return Ok(());
    };
    let handle = ctx
        .send(
            CreateReply::default()
                .embed(card(first, colour))
                .components(vec![buttons(menu_id)]),
        )
        .await?;

    let owner = ctx.author().id.get();
    let mut presses = std::pin::pin!(serenity::ComponentInteractionCollector::new(ctx)
        .filter(move |press| {
            accepts_press(&press.data.custom_id, press.user.id.get(), menu_id, owner)
        })
        .stream());

    while let Some(press) = next_press(&mut menu, &mut presses).await {
        let Some(control) = Control::from_custom_id(&press.data.custom_id, menu_id) else {
            continue;
        };
        menu.apply(control);

        let mut update = serenity::CreateInteractionResponseMessage::new();
        if let Some(item) = menu.current() {
            update = update.embed(card(item, colour));
        }
        if menu.is_expired() {
            update = update.components(vec![]);
        }
        press
            .create_response(
                ctx.serenity_context(),
                serenity::CreateInteractionResponse::UpdateMessage(update),
            )
            .await?;

        if menu.is_expired() {
            debug!(menu_id, "News menu stopped");
            return Ok(());
        }
    }

    debug!(menu_id, state = ?menu.state(), "News menu timed out");

    // timed out: leave the last page up without its buttons
    let mut last = CreateReply::default().components(vec![]);
    if let Some(item) = menu.current() {
        last = last.embed(card(item, colour));
    }
    handle.edit(ctx, last).await?;
    Ok(())
}

async fn lookup(ctx: Context<'_>, query: Query, no_results: &str) -> Result<()> {
    ctx.defer_or_broadcast().await?;

    let response = match ctx.data().news.fetch(&query).await {
        Ok(response) => response,
        Err(e) => {
            ctx.say(e.to_string()).await?;
            return Ok(());
        }
    };
    let items = match normalize(response) {
        Ok(items) => items,
        Err(NormalizeError::EmptyResult) => {
            ctx.say(no_results).await?;
            return Ok(());
        }
    };

    let colour = ctx.data().config.default_embed_color;
    match present(items) {
        PresentationPlan::Single(item) => {
            ctx.send(CreateReply::default().embed(card(&item, colour)))
                .await?;
        }
        PresentationPlan::Paginated(menu) => paginate(ctx, menu, colour).await?,
    }
    Ok(())
}

/// Group command for news.
#[poise::command(
    prefix_command,
    slash_command,
    subcommands("top", "global", "topglobal", "countrycodes"),
    subcommand_required
)]
async fn news(_ctx: Context<'_>) -> Result<()> {
    Ok(())
}

/// Top news from a country. Supports queries to search news.
///
/// The country must be a 2-letter ISO 3166-1 code.
/// Check `news countrycodes` for the supported ones.
#[poise::command(prefix_command, slash_command)]
async fn top(
    ctx: Context<'_>,
    #[description = "2-letter country code"] country_code: String,
    #[description = "Search terms"]
    #[rest]
    query: Option<String>,
) -> Result<()> {
    let no_results = format!(
        "No results found, ensure you're looking up the correct country code. \
         Check `{}news countrycodes` for a list. \
         Alternatively, your query may be returning no results.",
        ctx.prefix()
    );
    lookup(ctx, Query::top(&country_code, query), &no_results).await
}

/// News from around the world.
///
/// Not limited to top headlines, so results may be less reliable.
#[poise::command(prefix_command, slash_command)]
async fn global(
    ctx: Context<'_>,
    #[description = "Search terms"]
    #[rest]
    query: Option<String>,
) -> Result<()> {
    let Some(query) = query.filter(|q| !q.trim().is_empty()) else {
        ctx.say(format!(
            "Give me something to search for, e.g. `{}news global rust`.",
            ctx.prefix()
        ))
        .await?;
        return Ok(());
    };
    lookup(ctx, Query::everything(query), "No results found.").await
}

/// Top headlines from around the world.
#[poise::command(prefix_command, slash_command)]
async fn topglobal(
    ctx: Context<'_>,
    #[description = "Search terms"]
    #[rest]
    query: String,
) -> Result<()> {
    lookup(ctx, Query::top_global(query), "No results found.").await
}

/// Countries supported by the news commands.
#[poise::command(prefix_command, slash_command, hide_in_help)]
async fn countrycodes(ctx: Context<'_>) -> Result<()> {
    ctx.say(format!(
        "Valid country codes are:\n{}",
        COUNTRY_CODES.join(" ")
    ))
    .await?;
    Ok(())
}

/// Instructions on how to set up the news API.
#[poise::command(prefix_command, slash_command)]
async fn newssetup(ctx: Context<'_>) -> Result<()> {
    let msg = format!(
        "**News API Setup**\n\
         **1**. Visit https://newsapi.org and register for an API key.\n\
         **2**. Use the following command: `{}setapi newsapi <api_key_here>`\n\
         **3**. The key is used from the next news command onwards.",
        ctx.prefix()
    );
    ctx.send(
        CreateReply::default().embed(
            serenity::CreateEmbed::new()
                .colour(ctx.data().config.default_embed_color)
                .description(msg),
        ),
    )
    .await?;
    Ok(())
}
