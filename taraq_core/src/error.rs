use renet::transport::{NetcodeDisconnectReason, NetcodeError, NetcodeTransportError};
use thiserror::Error;

/// Connectivity failures, worded for the person at the keyboard.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Could not reach the host. Check the address and that the game is running.")]
    Unreachable,
    #[error("That player id is already taken on the host.")]
    IdTaken,
    #[error("Lost connection to the network.")]
    NetworkLost,
    #[error("The host closed the connection: {0}")]
    Rejected(String),
    #[error("Connection error: {0}")]
    Transport(String),
}

impl From<NetcodeDisconnectReason> for ConnectionError {
    fn from(reason: NetcodeDisconnectReason) -> Self {
        match reason {
            NetcodeDisconnectReason::ConnectionRequestTimedOut
            | NetcodeDisconnectReason::ConnectionResponseTimedOut
            | NetcodeDisconnectReason::ConnectTokenExpired => ConnectionError::Unreachable,
            NetcodeDisconnectReason::ConnectionDenied => ConnectionError::IdTaken,
            NetcodeDisconnectReason::ConnectionTimedOut => ConnectionError::NetworkLost,
            other => ConnectionError::Rejected(format!("{:?}", other)),
        }
    }
}

impl From<NetcodeTransportError> for ConnectionError {
    fn from(error: NetcodeTransportError) -> Self {
        ConnectionError::Transport(error.to_string())
    }
}

impl From<NetcodeError> for ConnectionError {
    fn from(error: NetcodeError) -> Self {
        ConnectionError::Transport(error.to_string())
    }
}

impl From<std::io::Error> for ConnectionError {
    fn from(error: std::io::Error) -> Self {
        ConnectionError::Transport(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum WireError {
    #[error("message is not valid UTF-8")]
    NotUtf8(#[from] std::string::FromUtf8Error),
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid {what}: {value}")]
    Invalid { what: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use renet::transport::NetcodeDisconnectReason;

    use crate::error::ConnectionError;

    #[test]
    fn timed_out_requests_should_read_as_unreachable() {
        let error = ConnectionError::from(NetcodeDisconnectReason::ConnectionRequestTimedOut);

        assert!(matches!(error, ConnectionError::Unreachable));
        assert!(error.to_string().starts_with("Could not reach the host"));
    }

    #[test]
    fn denied_connection_should_read_as_taken_id() {
        let error = ConnectionError::from(NetcodeDisconnectReason::ConnectionDenied);

        assert!(matches!(error, ConnectionError::IdTaken));
    }

    #[test]
    fn server_disconnect_should_be_rejected() {
        let error = ConnectionError::from(NetcodeDisconnectReason::DisconnectedByServer);

        assert!(matches!(error, ConnectionError::Rejected(_)));
    }
}
