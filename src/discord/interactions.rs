// src/discord/interactions.rs
//
// The registration flow after the slash command: modal form, ephemeral
// confirmation with role buttons, role grant, invite DM, audit embed.

use std::collections::HashMap;

use log::{info, warn};
use serenity::builder::{
    CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter, CreateInputText,
    CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateMessage, CreateModal,
};
use serenity::model::mention::Mentionable;
use serenity::model::prelude::*;
use serenity::prelude::*;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::registration::{PendingRegistrations, RegistrationForm, RoleChoice};

use super::roles;

pub const REGISTRATION_MODAL_ID: &str = "wmi_registration";

const FIELD_FULL_NAME: &str = "full_name";
const FIELD_EMAIL: &str = "email";
const FIELD_NOTES: &str = "notes";

// Wisteria purple, the community's signature colour.
const EMBED_COLOUR: Colour = Colour::new(0xD8BFD8);

/// Builds the modal shown in response to `/register`.
pub fn registration_modal() -> CreateInteractionResponse {
    let rows = vec![
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Short, "Your Full Name", FIELD_FULL_NAME)
                .placeholder("e.g. Dr. Elira Q.")
                .required(true),
        ),
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Short, "Email (optional)", FIELD_EMAIL)
                .placeholder("e.g. elira@example.com")
                .required(false),
        ),
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Paragraph, "Notes (optional)", FIELD_NOTES)
                .placeholder("Anything you'd like to add...")
                .required(false),
        ),
    ];

    CreateInteractionResponse::Modal(
        CreateModal::new(REGISTRATION_MODAL_ID, "🏫 WMI Registration").components(rows),
    )
}

/// Handles the submitted form: stashes the field values and replies with an
/// ephemeral confirmation embed carrying the two role buttons.
pub async fn handle_form_submit(
    ctx: &Context,
    submission: ModalInteraction,
    forms: &RwLock<HashMap<UserId, RegistrationForm>>,
) -> Result<(), serenity::Error> {
    let form = form_from_fields(
        submission
            .data
            .components
            .iter()
            .flat_map(|row| &row.components)
            .filter_map(|component| match component {
                ActionRowComponent::InputText(input) => {
                    Some((input.custom_id.as_str(), input.value.as_deref().unwrap_or("")))
                }
                _ => None,
            }),
    );

    let user = &submission.user;

    let mut embed = CreateEmbed::new()
        .title("Wisteria Medical Institute Registration")
        .description("Please select your role below to complete registration:")
        .colour(EMBED_COLOUR)
        .field("Full Name", form.full_name.clone(), true)
        .field("Discord", user.mention().to_string(), true)
        .timestamp(Timestamp::now());
    if let Some(email) = &form.email {
        embed = embed.field("Email", email.clone(), true);
    }
    if let Some(notes) = &form.notes {
        embed = embed.field("Notes", notes.clone(), false);
    }

    let buttons = CreateActionRow::Buttons(vec![
        CreateButton::new(RoleChoice::Student.custom_id())
            .label(RoleChoice::Student.label())
            .style(ButtonStyle::Primary),
        CreateButton::new(RoleChoice::Professor.custom_id())
            .label(RoleChoice::Professor.label())
            .style(ButtonStyle::Secondary),
    ]);

    forms.write().await.insert(user.id, form);

    submission
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .components(vec![buttons])
                    .ephemeral(true),
            ),
        )
        .await
}

/// Handles a role-button click: records the choice, tries an immediate
/// grant, confirms to the user, DMs the invite link and posts the audit
/// embed.
///
/// The buttons are single-use. The first click consumes the stashed form
/// and replaces the selection message with the confirmation, so one
/// registration yields one role choice, one grant attempt and one audit
/// embed.
pub async fn handle_role_selection(
    ctx: &Context,
    component: ComponentInteraction,
    choice: RoleChoice,
    config: &Config,
    registrations: &PendingRegistrations,
    forms: &RwLock<HashMap<UserId, RegistrationForm>>,
) -> Result<(), serenity::Error> {
    let user = component.user.clone();
    let Some(form) = take_form(forms, user.id).await else {
        // The selection was already finalized (or the stash was lost to a
        // restart); acknowledge without re-running the flow.
        return component
            .create_response(&ctx.http, CreateInteractionResponse::Acknowledge)
            .await;
    };

    // The intent is remembered before any grant attempt so that a later
    // join is honored no matter what happens below.
    registrations.record(user.id, choice).await;

    let assigned_now =
        match roles::add_role_to_user(ctx, config.guild_id, user.id, choice.role_id(config)).await {
            Ok(()) => true,
            Err(why) => {
                // Not a member of the target guild yet, or the bot lacks
                // permission. Either way the pending entry covers the join.
                info!("Immediate role grant for {} skipped: {}", user.id, why);
                false
            }
        };

    // Editing the selection message strips the buttons, so it cannot be
    // clicked a second time.
    component
        .create_response(
            &ctx.http,
            CreateInteractionResponse::UpdateMessage(
                CreateInteractionResponseMessage::new()
                    .content(confirmation_message(choice, &config.invite_url, assigned_now))
                    .components(Vec::new()),
            ),
        )
        .await?;

    send_invite_dm(ctx, &component, &user, choice, config).await;
    post_audit_embed(ctx, config, &form, &user, choice).await;

    Ok(())
}

/// Consumes the stashed form for `user_id`. Returns `None` once the form
/// has been taken, which is what makes a second button click a no-op.
async fn take_form(
    forms: &RwLock<HashMap<UserId, RegistrationForm>>,
    user_id: UserId,
) -> Option<RegistrationForm> {
    forms.write().await.remove(&user_id)
}

fn form_from_fields<'a>(fields: impl Iterator<Item = (&'a str, &'a str)>) -> RegistrationForm {
    let mut form = RegistrationForm::default();
    for (custom_id, value) in fields {
        let value = value.trim();
        match custom_id {
            FIELD_FULL_NAME => form.full_name = value.to_string(),
            FIELD_EMAIL if !value.is_empty() => form.email = Some(value.to_string()),
            FIELD_NOTES if !value.is_empty() => form.notes = Some(value.to_string()),
            _ => {}
        }
    }
    form
}

fn confirmation_message(choice: RoleChoice, invite_url: &str, assigned_now: bool) -> String {
    let mut message = format!(
        "✅ You are now registered as **{}**.\n📨 Please [join our server]({}).\n",
        choice.label(),
        invite_url
    );
    message.push_str(if assigned_now {
        "🎉 Your role was assigned!"
    } else {
        "🕓 It will be assigned when you join."
    });
    message
}

async fn send_invite_dm(
    ctx: &Context,
    component: &ComponentInteraction,
    user: &User,
    choice: RoleChoice,
    config: &Config,
) {
    let dm = async {
        let channel = user.id.create_dm_channel(&ctx.http).await?;
        channel
            .say(
                &ctx.http,
                format!(
                    "✅ You have registered as a **{}** for Wisteria Medical Institute!\n\
                     Here is your invite link: {}\n\nWelcome!",
                    choice.label(),
                    config.invite_url
                ),
            )
            .await?;
        Ok::<(), serenity::Error>(())
    };

    if let Err(why) = dm.await {
        warn!("Could not DM invite link to {}: {}", user.id, why);
        let fallback = CreateInteractionResponseFollowup::new()
            .content(
                "Could not send you a DM, but your registration was recorded. \
                 Please check your server invites.",
            )
            .ephemeral(true);
        if let Err(why) = component.create_followup(&ctx.http, fallback).await {
            warn!("Failed to send DM fallback notice: {}", why);
        }
    }
}

async fn post_audit_embed(
    ctx: &Context,
    config: &Config,
    form: &RegistrationForm,
    user: &User,
    choice: RoleChoice,
) {
    let mut embed = CreateEmbed::new()
        .title(format!("📝 New Registration - {}", choice.label()))
        .colour(Colour::BLUE)
        .timestamp(Timestamp::now())
        .field("Full Name", form.full_name.clone(), true)
        .field("Discord", user.mention().to_string(), true)
        .field("Role Chosen", choice.label(), true);
    if let Some(email) = &form.email {
        embed = embed.field("Email", email.clone(), true);
    }
    if let Some(notes) = &form.notes {
        embed = embed.field("Notes", notes.clone(), false);
    }
    let embed = embed.footer(CreateEmbedFooter::new("WMI AutoLogger"));

    // A missing or deleted audit channel must not block the registration.
    if let Err(why) = config
        .log_channel_id
        .send_message(&ctx.http, CreateMessage::new().embed(embed))
        .await
    {
        warn!("Failed to post registration audit embed: {}", why);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_parsing_keeps_required_and_optional_fields() {
        let form = form_from_fields(
            [
                (FIELD_FULL_NAME, "  Dr. Elira Q.  "),
                (FIELD_EMAIL, "elira@example.com"),
                (FIELD_NOTES, "Second-year transfer."),
            ]
            .into_iter(),
        );

        assert_eq!(form.full_name, "Dr. Elira Q.");
        assert_eq!(form.email.as_deref(), Some("elira@example.com"));
        assert_eq!(form.notes.as_deref(), Some("Second-year transfer."));
    }

    #[test]
    fn blank_optional_fields_are_dropped() {
        let form = form_from_fields(
            [
                (FIELD_FULL_NAME, "Elira"),
                (FIELD_EMAIL, "   "),
                (FIELD_NOTES, ""),
            ]
            .into_iter(),
        );

        assert_eq!(form.full_name, "Elira");
        assert_eq!(form.email, None);
        assert_eq!(form.notes, None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let form = form_from_fields([("favourite_colour", "wisteria")].into_iter());
        assert_eq!(form.full_name, "");
        assert_eq!(form.email, None);
    }

    #[tokio::test]
    async fn role_buttons_are_single_use() {
        let forms = RwLock::new(HashMap::new());
        let user = UserId::new(7);
        forms.write().await.insert(
            user,
            RegistrationForm {
                full_name: "Elira".to_string(),
                ..RegistrationForm::default()
            },
        );

        // First click takes the form; a second click finds nothing and the
        // selection flow is not re-run.
        assert!(take_form(&forms, user).await.is_some());
        assert!(take_form(&forms, user).await.is_none());
    }

    #[test]
    fn confirmation_mentions_deferred_assignment() {
        let message = confirmation_message(RoleChoice::Student, "https://discord.gg/abc", false);
        assert!(message.contains("when you join"));
        assert!(message.contains("https://discord.gg/abc"));

        let message = confirmation_message(RoleChoice::Professor, "https://discord.gg/abc", true);
        assert!(message.contains("Your role was assigned"));
    }
}
