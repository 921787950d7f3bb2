use serenity::async_trait;
use serenity::model::mention::Mentionable;
use serenity::model::prelude::*;
use serenity::prelude::*;
use crate::config::Config;
use crate::registration::{PendingRegistrations, RegistrationForm, RoleChoice};
use std::collections::HashMap;
use std::sync::Arc;
use log::{debug, error, info, warn};
use serenity::builder::{CreateInteractionResponse, CreateInteractionResponseMessage};
use tokio::sync::RwLock;
use crate::discord::commands::register;
use crate::discord::{interactions, roles};

pub struct EventHandler {
    config: Arc<Config>,
    registrations: Arc<PendingRegistrations>,
    /// Form data captured from the modal, held until the submitter picks a
    /// role button. Keyed by the submitting user; a re-submitted form
    /// replaces the earlier one, and the entry is consumed by the first
    /// button click. Entries for users who submit the form but never pick
    /// a role linger, like the tracker's unclaimed registrations; the
    /// population is small enough that this is acceptable.
    forms: RwLock<HashMap<UserId, RegistrationForm>>,
}

impl EventHandler {
    pub fn new(config: Arc<Config>, registrations: Arc<PendingRegistrations>) -> Self {
        Self {
            config,
            registrations,
            forms: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl serenity::client::EventHandler for EventHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        let commands = self
            .config
            .guild_id
            .set_commands(&ctx.http, vec![register::register()])
            .await;

        match commands {
            Ok(commands) => info!(
                "Registered {} slash command(s) in guild {}",
                commands.len(),
                self.config.guild_id
            ),
            Err(why) => error!("Failed to register slash commands: {}", why),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let result = match interaction {
            Interaction::Command(command) => match command.data.name.as_str() {
                "register" => register::run(&ctx, command).await,
                _ => {
                    command
                        .create_response(
                            &ctx.http,
                            CreateInteractionResponse::Message(
                                CreateInteractionResponseMessage::new()
                                    .content("Command not implemented")
                                    .ephemeral(true),
                            ),
                        )
                        .await
                }
            },
            Interaction::Modal(submission)
                if submission.data.custom_id == interactions::REGISTRATION_MODAL_ID =>
            {
                interactions::handle_form_submit(&ctx, submission, &self.forms).await
            }
            Interaction::Component(component) => {
                match RoleChoice::from_custom_id(&component.data.custom_id) {
                    Some(choice) => {
                        interactions::handle_role_selection(
                            &ctx,
                            component,
                            choice,
                            &self.config,
                            &self.registrations,
                            &self.forms,
                        )
                        .await
                    }
                    None => Ok(()),
                }
            }
            _ => Ok(()),
        };

        if let Err(why) = result {
            error!("Cannot respond to interaction: {}", why);
        }
    }

    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        if new_member.guild_id != self.config.guild_id {
            return;
        }

        let user_id = new_member.user.id;
        let Some(choice) = self.registrations.resolve(user_id).await else {
            debug!("Member {} joined with no pending registration", user_id);
            return;
        };

        // The entry is already consumed; a failed grant is reported, not
        // retried, so a later rejoin does not double-grant.
        let role_id = choice.role_id(&self.config);
        if let Err(why) =
            roles::add_role_to_user(&ctx, new_member.guild_id, user_id, role_id).await
        {
            error!(
                "Failed to grant pending {:?} role to {} on join: {}",
                choice, user_id, why
            );
            return;
        }

        info!("Granted pending {:?} role to {} on join", choice, user_id);

        let announcement = format!(
            "🎓 {} has joined and was given **{}** automatically!",
            new_member.mention(),
            choice.label()
        );
        if let Err(why) = self.config.log_channel_id.say(&ctx.http, announcement).await {
            warn!("Failed to post join notice to audit channel: {}", why);
        }
    }
}
