use serenity::model::id::{ChannelId, GuildId, RoleId};
use thiserror::Error;

// Defaults match the original WMI deployment; every one of them can be
// overridden through the environment.
const DEFAULT_GUILD_ID: u64 = 1387102987238768783;
const DEFAULT_STUDENT_ROLE_ID: u64 = 1392653369964757154;
const DEFAULT_PROFESSOR_ROLE_ID: u64 = 1392654292648722494;
const DEFAULT_LOG_CHANNEL_ID: u64 = 1392655742430871754;
const DEFAULT_INVITE_URL: &str = "https://discord.gg/66qx29Tf";
const DEFAULT_HEALTH_PORT: u16 = 8000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnvVar(&'static str),
    #[error("environment variable {0} has invalid value {1:?}")]
    InvalidValue(&'static str, String),
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// The target guild whose roles the bot manages.
    pub guild_id: GuildId,
    pub student_role_id: RoleId,
    pub professor_role_id: RoleId,
    /// Channel receiving the registration audit embeds.
    pub log_channel_id: ChannelId,
    pub invite_url: String,
    /// Port the health-check HTTP listener binds to.
    pub health_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let discord_token = std::env::var("DISCORD_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("DISCORD_TOKEN"))?;

        Ok(Self {
            discord_token,
            guild_id: GuildId::new(env_parse("WMI_GUILD_ID", DEFAULT_GUILD_ID)?),
            student_role_id: RoleId::new(env_parse("STUDENT_ROLE_ID", DEFAULT_STUDENT_ROLE_ID)?),
            professor_role_id: RoleId::new(env_parse(
                "PROFESSOR_ROLE_ID",
                DEFAULT_PROFESSOR_ROLE_ID,
            )?),
            log_channel_id: ChannelId::new(env_parse("LOG_CHANNEL_ID", DEFAULT_LOG_CHANNEL_ID)?),
            invite_url: std::env::var("WMI_INVITE_URL")
                .unwrap_or_else(|_| DEFAULT_INVITE_URL.to_string()),
            health_port: env_parse("PORT", DEFAULT_HEALTH_PORT)?,
        })
    }
}

fn env_parse<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // The process environment is global, and cargo runs tests on parallel
    // threads; every test touching it takes this lock first.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn env_parse_falls_back_to_default_when_unset() {
        let _env = ENV_LOCK.lock().unwrap();
        std::env::remove_var("WMIBOT_TEST_UNSET");
        assert_eq!(env_parse("WMIBOT_TEST_UNSET", 42u64).unwrap(), 42);
    }

    #[test]
    fn env_parse_reads_override() {
        let _env = ENV_LOCK.lock().unwrap();
        std::env::set_var("WMIBOT_TEST_OVERRIDE", "9001");
        assert_eq!(env_parse("WMIBOT_TEST_OVERRIDE", 42u64).unwrap(), 9001);
        std::env::remove_var("WMIBOT_TEST_OVERRIDE");
    }

    #[test]
    fn env_parse_rejects_garbage() {
        let _env = ENV_LOCK.lock().unwrap();
        std::env::set_var("WMIBOT_TEST_GARBAGE", "not-a-number");
        let err = env_parse("WMIBOT_TEST_GARBAGE", 42u64).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("WMIBOT_TEST_GARBAGE", _)));
        std::env::remove_var("WMIBOT_TEST_GARBAGE");
    }

    #[test]
    fn missing_token_is_fatal() {
        let _env = ENV_LOCK.lock().unwrap();
        std::env::remove_var("DISCORD_TOKEN");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar("DISCORD_TOKEN")));
    }
}
