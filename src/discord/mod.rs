// src/discord/mod.rs
mod client;
mod commands;
mod events;
mod interactions;
mod roles;
pub use client::DiscordClient;
