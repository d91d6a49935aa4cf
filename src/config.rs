use clap::{builder::BoolishValueParser, Parser};

use crate::listener::ListenerOptions;

pub const DEFAULT_URL: &str = "ws://localhost:9000";

#[derive(Parser, Debug, Clone)]
#[command(name = "pump-listener", about = "Print token events from a WebSocket feed")]
pub struct Config {
    /// WebSocket endpoint to listen on
    #[arg(long, env = "PUMP_LISTENER_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Print frames as received instead of decoding them
    #[arg(
        long,
        env = "PUMP_LISTENER_RAW",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    pub raw: bool,
}

impl Config {
    pub fn listener_options(&self) -> ListenerOptions {
        ListenerOptions { raw: self.raw }
    }
}

#[cfg(test)]
mod tests {
    use std::{env, sync::Mutex};

    use super::*;

    // Tests below read or set process-wide environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_to_local_feed() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::remove_var("PUMP_LISTENER_URL");
        env::remove_var("PUMP_LISTENER_RAW");

        let config = Config::try_parse_from(["pump-listener"]).unwrap();
        assert_eq!(config.url, DEFAULT_URL);
        assert!(!config.listener_options().raw);
    }

    #[test]
    fn flags_override_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::remove_var("PUMP_LISTENER_RAW");

        let config =
            Config::try_parse_from(["pump-listener", "--url", "ws://10.0.0.2:9100", "--raw"])
                .unwrap();
        assert_eq!(config.url, "ws://10.0.0.2:9100");
        assert!(config.listener_options().raw);
    }

    #[test]
    fn raw_accepts_dotenv_style_booleans() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        for (value, expected) in [
            ("1", true),
            ("yes", true),
            ("true", true),
            ("on", true),
            ("0", false),
            ("no", false),
            ("false", false),
            ("off", false),
        ] {
            env::set_var("PUMP_LISTENER_RAW", value);
            let config = Config::try_parse_from(["pump-listener"])
                .unwrap_or_else(|e| panic!("PUMP_LISTENER_RAW={value} rejected: {e}"));
            assert_eq!(config.raw, expected, "PUMP_LISTENER_RAW={value}");
        }
        env::remove_var("PUMP_LISTENER_RAW");
    }

    #[test]
    fn raw_rejects_nonsense() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::set_var("PUMP_LISTENER_RAW", "maybe");
        let result = Config::try_parse_from(["pump-listener"]);
        env::remove_var("PUMP_LISTENER_RAW");
        assert!(result.is_err());
    }
}
