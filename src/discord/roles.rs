use serenity::prelude::*;
use serenity::model::prelude::*;

/// Grants `role_id` to `user_id` in `guild_id`.
///
/// Fails when the user is not a member of the guild, the role no longer
/// exists, or the bot lacks `MANAGE_ROLES`. Callers treat all of these as
/// soft failures.
pub async fn add_role_to_user(
    ctx: &Context,
    guild_id: GuildId,
    user_id: UserId,
    role_id: RoleId,
) -> Result<(), serenity::Error> {
    let mut member = guild_id.member(&ctx.http, user_id).await?;
    member.add_role(&ctx.http, role_id).await?;
    Ok(())
}
