use std::fmt;

/// Bot configuration loaded from environment variables.
///
/// The three Discord identifiers are required; everything else has a
/// default that reuses an existing `bot-data.sqlite`.
#[derive(Clone)]
pub struct BotConfig {
    /// Bot token used for the gateway `IDENTIFY` and REST calls.
    pub discord_token: String,
    /// Application id, needed to register commands.
    pub application_id: String,
    /// The single guild the commands are registered in.
    pub guild_id: String,
    /// SQLite database URL (default: `sqlite://bot-data.sqlite`).
    pub database_url: String,
    /// Keep-alive bind address (default: `0.0.0.0`).
    pub host: String,
    /// Keep-alive bind port (default: `3000`).
    pub port: u16,
    /// Bound, in seconds, on a queue listing and on how long a write waits
    /// for the store (default: `3`).
    pub command_timeout_secs: u64,
}

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

impl BotConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `DISCORD_TOKEN`        | required                   |
    /// | `CLIENT_ID`            | required                   |
    /// | `GUILD_ID`             | required                   |
    /// | `DATABASE_URL`         | `sqlite://bot-data.sqlite` |
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `COMMAND_TIMEOUT_SECS` | `3`                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };
        let or_default = |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.into());

        let discord_token = required("DISCORD_TOKEN")?;
        let application_id = required("CLIENT_ID")?;
        let guild_id = required("GUILD_ID")?;

        let database_url = or_default("DATABASE_URL", "sqlite://bot-data.sqlite");
        let host = or_default("HOST", "0.0.0.0");

        let port = parse_var("PORT", or_default("PORT", "3000"))?;
        let command_timeout_secs =
            parse_var("COMMAND_TIMEOUT_SECS", or_default("COMMAND_TIMEOUT_SECS", "3"))?;

        Ok(Self {
            discord_token,
            application_id,
            guild_id,
            database_url,
            host,
            port,
            command_timeout_secs,
        })
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value })
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("discord_token", &"<redacted>")
            .field("application_id", &self.application_id)
            .field("guild_id", &self.guild_id)
            .field("database_url", &self.database_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("command_timeout_secs", &self.command_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DISCORD_TOKEN", "token"),
        ("CLIENT_ID", "123"),
        ("GUILD_ID", "456"),
    ];

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() {
        let config = BotConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.discord_token, "token");
        assert_eq!(config.application_id, "123");
        assert_eq!(config.guild_id, "456");
        assert_eq!(config.database_url, "sqlite://bot-data.sqlite");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.command_timeout_secs, 3);
    }

    #[test]
    fn overrides_are_read() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("DATABASE_URL", "sqlite::memory:"),
            ("PORT", "8080"),
            ("COMMAND_TIMEOUT_SECS", "10"),
        ]);
        let config = BotConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.port, 8080);
        assert_eq!(config.command_timeout_secs, 10);
    }

    #[test]
    fn each_discord_identifier_is_required() {
        for missing in ["DISCORD_TOKEN", "CLIENT_ID", "GUILD_ID"] {
            let vars: Vec<_> = REQUIRED.iter().copied().filter(|(k, _)| *k != missing).collect();
            assert_matches!(
                BotConfig::from_lookup(lookup(&vars)),
                Err(ConfigError::Missing(var)) if var == missing
            );
        }
    }

    #[test]
    fn blank_required_value_counts_as_missing() {
        let mut vars = REQUIRED.to_vec();
        vars[0] = ("DISCORD_TOKEN", "  ");
        assert_matches!(
            BotConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::Missing("DISCORD_TOKEN"))
        );
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PORT", "not-a-port"));
        assert_matches!(
            BotConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::Invalid { var: "PORT", .. })
        );
    }

    #[test]
    fn debug_output_redacts_token() {
        let config = BotConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("token\""));
        assert!(debug.contains("<redacted>"));
    }
}
