use std::{net::SocketAddr, time::Duration};

use crate::error::ConfigError;

/// Both ends must agree on this; the wire format carries no version.
pub const PROTOCOL_ID: u64 = 0x7A7A_0001;

pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1000);
pub const SETTLE_DELAY_VAR: &str = "TARAQ_SETTLE_MS";

#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub port: u16,
    pub max_clients: usize,
    pub protocol_id: u64,
    pub host_name: String,
    pub local_players: Vec<String>,
    pub settle_delay: Duration,
}

impl HostConfig {
    pub const USAGE: &'static str = "taraq_server PORT NAME [LOCAL_PLAYER...]";

    /// `args` excludes the program name.
    pub fn from_args(args: &[String], settle_ms: Option<&str>) -> Result<Self, ConfigError> {
        let [port, host_name, local_players @ ..] = args else {
            return Err(ConfigError::Usage(Self::USAGE));
        };
        let port = port.parse().map_err(|_| ConfigError::Invalid {
            what: "port",
            value: port.clone(),
        })?;
        let settle_delay = match settle_ms {
            Some(ms) => Duration::from_millis(ms.parse().map_err(|_| ConfigError::Invalid {
                what: SETTLE_DELAY_VAR,
                value: ms.to_string(),
            })?),
            None => DEFAULT_SETTLE_DELAY,
        };
        Ok(HostConfig {
            port,
            max_clients: 64,
            protocol_id: PROTOCOL_ID,
            host_name: host_name.clone(),
            local_players: local_players.to_vec(),
            settle_delay,
        })
    }

    pub fn public_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeerConfig {
    pub server_addr: SocketAddr,
    pub name: String,
    pub protocol_id: u64,
}

impl PeerConfig {
    pub const USAGE: &'static str = "taraq_ui_cli HOST:PORT NAME";

    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        let [addr, name] = args else {
            return Err(ConfigError::Usage(Self::USAGE));
        };
        let server_addr = addr.parse().map_err(|_| ConfigError::Invalid {
            what: "address",
            value: addr.clone(),
        })?;
        Ok(PeerConfig {
            server_addr,
            name: name.clone(),
            protocol_id: PROTOCOL_ID,
        })
    }
}
