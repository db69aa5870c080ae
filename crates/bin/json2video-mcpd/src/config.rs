use clap::{Parser, ValueEnum};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use json2video_core::DEFAULT_API_BASE;

const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4020";

/// Protocol spoken on the process boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// MCP over stdio.
    Stdio,
    /// MCP over streamable HTTP.
    Http,
    /// Line-delimited JSON-RPC over stdio.
    Line,
}

#[derive(Parser, Debug)]
#[command(name = "json2video-mcpd", version, about = "json2video MCP daemon.")]
struct CliArgs {
    #[arg(long, env = "JSON2VIDEO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "JSON2VIDEO_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    #[arg(long, env = "JSON2VIDEO_TRANSPORT", value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    #[arg(long, env = "JSON2VIDEO_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    http_addr: SocketAddr,

    #[arg(long, env = "JSON2VIDEO_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Clone)]
pub struct Json2VideoConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub transport: Transport,
    pub http_addr: SocketAddr,
    pub request_timeout: Option<Duration>,
}

impl fmt::Debug for Json2VideoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Json2VideoConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("transport", &self.transport)
            .field("http_addr", &self.http_addr)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl Json2VideoConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for Json2VideoConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let api_key = args.api_key.filter(|value| !value.trim().is_empty());

        let api_base = args.api_base.trim().to_string();
        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(ConfigError::InvalidSetting {
                name: "JSON2VIDEO_API_BASE",
                value: args.api_base,
            });
        }

        let request_timeout = args
            .timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            api_key,
            api_base,
            transport: args.transport,
            http_addr: args.http_addr,
            request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            transport: Transport::Stdio,
            http_addr: DEFAULT_MCP_HTTP_ADDR.parse().expect("valid MCP addr"),
            timeout_secs: None,
        }
    }

    #[test]
    fn blank_api_key_is_unset() {
        let mut args = base_args();
        args.api_key = Some("   ".to_string());

        let config = Json2VideoConfig::try_from(args).expect("config should parse");

        assert!(config.api_key.is_none());
    }

    #[test]
    fn rejects_non_http_api_base() {
        for value in ["", "ftp://api.json2video.com", "api.json2video.com/v2"] {
            let mut args = base_args();
            args.api_base = value.to_string();
            let err = Json2VideoConfig::try_from(args).expect_err("api base should be rejected");
            assert!(matches!(
                err,
                ConfigError::InvalidSetting { name: "JSON2VIDEO_API_BASE", .. }
            ));
        }
    }

    #[test]
    fn zero_timeout_means_none() {
        let mut args = base_args();
        args.timeout_secs = Some(0);
        let config = Json2VideoConfig::try_from(args).expect("config should parse");
        assert!(config.request_timeout.is_none());

        let mut args = base_args();
        args.timeout_secs = Some(30);
        let config = Json2VideoConfig::try_from(args).expect("config should parse");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let mut args = base_args();
        args.api_key = Some("super-secret".to_string());
        let config = Json2VideoConfig::try_from(args).expect("config should parse");

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn cli_parses_transport_flag() {
        let args = CliArgs::try_parse_from(["json2video-mcpd", "--transport", "line"])
            .expect("args should parse");
        assert_eq!(args.transport, Transport::Line);
    }
}
