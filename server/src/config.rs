//! Server configuration, parsed from command-line flags.

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// SQLite path for persisted client state; ":memory:" for ephemeral.
    pub db_path: String,
    /// Master seed for the metrics generator.
    pub seed: u64,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// OpenAI-compatible chat-completions endpoint.
    pub upstream_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8600,
            db_path: ":memory:".to_string(),
            seed: 42,
            chat: ChatConfig::default(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            upstream_url: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1024,
            temperature: 0.5,
        }
    }
}

impl ServerConfig {
    /// Parse `--flag value` pairs; anything missing keeps its default.
    pub fn from_args(args: &[String]) -> Self {
        let defaults = Self::default();
        Self {
            host: parse_arg(args, "--host", defaults.host),
            port: parse_arg(args, "--port", defaults.port),
            db_path: parse_arg(args, "--db", defaults.db_path),
            seed: parse_arg(args, "--seed", defaults.seed),
            chat: ChatConfig {
                upstream_url: parse_arg(args, "--chat-url", defaults.chat.upstream_url),
                model: parse_arg(args, "--chat-model", defaults.chat.model),
                ..defaults.chat
            },
        }
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_flags() {
        let config = ServerConfig::from_args(&[]);
        assert_eq!(config.port, 8600);
        assert_eq!(config.db_path, ":memory:");
    }

    #[test]
    fn flags_override_defaults() {
        let args: Vec<String> = ["centre-server", "--port", "9100", "--seed", "7"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let config = ServerConfig::from_args(&args);
        assert_eq!(config.port, 9100);
        assert_eq!(config.seed, 7);
        assert_eq!(config.host, "127.0.0.1");
    }
}
