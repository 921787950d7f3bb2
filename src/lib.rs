pub mod config;
pub mod discord;
pub mod health;
pub mod logging;
pub mod registration;

use std::sync::Arc;

use log::info;

use crate::config::Config;
use crate::discord::DiscordClient;
use crate::registration::PendingRegistrations;

pub struct BotClients {
    pub config: Arc<Config>,
    pub discord: DiscordClient,
    pub registrations: Arc<PendingRegistrations>,
}

pub async fn init(config: Config) -> Result<BotClients, Box<dyn std::error::Error + Send + Sync>> {
    let config = Arc::new(config);
    let registrations = Arc::new(PendingRegistrations::new());

    let discord = DiscordClient::new(Arc::clone(&config), Arc::clone(&registrations)).await?;

    Ok(BotClients {
        config,
        discord,
        registrations,
    })
}

pub async fn run(clients: BotClients) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // The liveness probe must answer even while the gateway connection is
    // still coming up, so it runs as its own task and shares no state with
    // the bot.
    let port = clients.config.health_port;
    tokio::spawn(health::serve(port));

    let discord = Arc::new(clients.discord);
    let runner = Arc::clone(&discord);
    let bot_task = tokio::spawn(async move { runner.start().await });

    tokio::select! {
        joined = bot_task => match joined {
            Ok(Ok(())) => info!("Discord client stopped"),
            Ok(Err(why)) => return Err(why.into()),
            Err(why) => return Err(why.into()),
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, stopping Discord client");
            discord.shutdown().await?;
        }
    }

    Ok(())
}
