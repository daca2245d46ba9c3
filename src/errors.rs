use poise::{builtins, FrameworkError};
use tracing::error;

use crate::{state::Data, Error};

const GENERIC_FAILURE: &str = "Something went wrong while running this command.";

pub async fn global_error_handler(e: FrameworkError<'_, Data, Error>) {
    match e {
        FrameworkError::Setup {
            error, framework, ..
        } => {
            error!("Bot setup failed: {error}");
            framework.shard_manager().shutdown_all().await;
        }
        FrameworkError::Command { error, ctx, .. } => {
            error!(
                command = %ctx.command().qualified_name,
                "Command failed: {error:?}"
            );
            if let Err(e) = ctx.say(GENERIC_FAILURE).await {
                error!("Could not report the failure to discord: {e}");
            }
        }
        other => {
            if let Err(e) = builtins::on_error(other).await {
                error!("Error from the error handler: {e:?}");
            }
        }
    }
}
