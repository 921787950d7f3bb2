// src/discord/client.rs

use serenity::prelude::*;
use crate::config::Config;
use crate::registration::PendingRegistrations;
use std::sync::Arc;
use std::time::Duration;
use log::{info, warn};
use tokio::sync::Mutex;

use super::events::EventHandler;

pub struct DiscordClient {
    client: Arc<Mutex<Option<Client>>>,
}

impl DiscordClient {
    pub async fn new(
        config: Arc<Config>,
        registrations: Arc<PendingRegistrations>,
    ) -> Result<Self, serenity::Error> {
        // GUILD_MEMBERS is privileged; it must be enabled in the developer
        // portal or join events never arrive and pending roles are never
        // granted.
        let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS;

        let client = Client::builder(&config.discord_token, intents)
            .event_handler(EventHandler::new(config, registrations))
            .await?;

        Ok(Self {
            client: Arc::new(Mutex::new(Some(client))),
        })
    }

    pub async fn shutdown(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Shutting down DiscordClient...");
        let mut client_guard = self.client.lock().await;
        if let Some(client) = client_guard.take() {
            let shard_manager = client.shard_manager.clone();
            match tokio::time::timeout(Duration::from_secs(10), shard_manager.shutdown_all()).await {
                Ok(_) => info!("Discord shards shut down successfully"),
                Err(_) => warn!("Timed out while shutting down Discord shards"),
            }
        }
        info!("DiscordClient shutdown complete.");
        Ok(())
    }

    pub async fn start(&self) -> Result<(), serenity::Error> {
        let mut client_guard = self.client.lock().await;
        if let Some(mut client) = client_guard.take() {
            client.start().await?;
            *client_guard = Some(client);
            Ok(())
        } else {
            Err(serenity::Error::Other("Discord client has already been started"))
        }
    }
}
