use poise::ChoiceParameter;
use tracing::info;

use crate::{credentials::Service, Context, Result};

/// Set the key for an external API. Takes effect from the next request.
///
/// A blank key removes the current one.
#[poise::command(prefix_command, slash_command, owners_only, ephemeral)]
pub async fn setapi(
    ctx: Context<'_>,
    #[description = "Which API the key is for"] service: Service,
    #[description = "The new key"]
    #[rest]
    key: String,
) -> Result<()> {
    // keys shouldn't linger in chat
    if let Context::Prefix(prefix) = ctx {
        if let Err(e) = prefix.msg.delete(ctx).await {
            info!("Could not delete the setapi message: {e}");
        }
    }

    ctx.data().credentials.set(service, &key);
    let reply = if ctx.data().credentials.get(service).is_some() {
        info!(service = service.name(), user = %ctx.author().name, "API key replaced");
        format!("The {} key has been updated.", service.name())
    } else {
        info!(service = service.name(), user = %ctx.author().name, "API key removed");
        format!("The {} key has been removed.", service.name())
    };
    ctx.say(reply).await?;
    Ok(())
}
