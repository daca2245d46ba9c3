use poise::{builtins::autocomplete_command, samples::HelpConfiguration};

use crate::{admin::setapi, Context, Result};

use super::{About, Cog, ABOUTS};

pub const ABOUT: About = About {
    category: "Meta",
    version: env!("CARGO_PKG_VERSION"),
    author: None,
};

pub fn cog() -> Cog {
    Cog::new(vec![help(), setapi()], ABOUT)
}

fn cog_versions() -> String {
    ABOUTS
        .iter()
        .map(|about| about.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Get help on the bot or a command
#[poise::command(prefix_command, slash_command)]
async fn help(
    ctx: Context<'_>,
    #[description = "Command to show help about"]
    #[autocomplete = "autocomplete_command"]
    command: Option<String>,
) -> Result<()> {
    let versions = cog_versions();
    let config = HelpConfiguration {
        extra_text_at_bottom: &versions,
        ..Default::default()
    };
    poise::builtins::help(ctx, command.as_deref(), config).await?;
    Ok(())
}
