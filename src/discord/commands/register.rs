// src/discord/commands/register.rs

use serenity::builder::CreateCommand;
use serenity::model::prelude::*;
use serenity::prelude::*;

use crate::discord::interactions;

pub fn register() -> CreateCommand {
    CreateCommand::new("register").description("Register for the Wisteria Medical Institute")
}

pub async fn run(ctx: &Context, command: CommandInteraction) -> Result<(), serenity::Error> {
    command
        .create_response(&ctx.http, interactions::registration_modal())
        .await
}
