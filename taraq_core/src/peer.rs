use log::{debug, info, warn};

use crate::{
    action::Intent,
    events::{JoinPayload, NetworkMessage},
    game_state::GameState,
    player::{PeerId, PlayerId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerUpdate {
    Synced,
    Kicked,
    Ignored,
}

/// A read-only replica of the host's game. It never applies an intent
/// itself: intents become messages for the host, and the replica only
/// changes when the host answers with a snapshot.
pub struct PeerSession {
    name: String,
    own_id: Option<PlayerId>,
    replica: Option<GameState>,
}

impl PeerSession {
    pub fn new(name: &str) -> Self {
        PeerSession {
            name: name.trim().to_string(),
            own_id: None,
            replica: None,
        }
    }

    /// Called once the transport is open; `peer_id` is our connection id on the host.
    pub fn connected(&mut self, peer_id: PeerId) -> NetworkMessage {
        self.own_id = Some(peer_id.to_string());
        NetworkMessage::Join(JoinPayload {
            name: self.name.clone(),
            avatar_url: None,
        })
    }

    /// Forgets everything; there is no partial game after a lost connection.
    pub fn disconnected(&mut self) {
        self.own_id = None;
        self.replica = None;
    }

    pub fn replica(&self) -> Option<&GameState> {
        self.replica.as_ref()
    }

    pub fn own_id(&self) -> Option<&PlayerId> {
        self.own_id.as_ref()
    }

    pub fn is_my_turn(&self) -> bool {
        match (&self.replica, &self.own_id) {
            (Some(state), Some(id)) => {
                state.is_running() && state.current_player().map(|p| &p.id) == Some(id)
            }
            _ => false,
        }
    }

    /// The message that asks the host to carry out `intent`.
    pub fn request(&self, intent: Intent) -> NetworkMessage {
        debug!("forwarding {:?} to host", intent);
        NetworkMessage::from(intent)
    }

    pub fn handle_message(&mut self, message: NetworkMessage) -> PeerUpdate {
        match message {
            NetworkMessage::SyncState(state) => {
                self.replica = Some(*state);
                PeerUpdate::Synced
            }
            NetworkMessage::KickPlayer(payload) if Some(&payload.id) == self.own_id.as_ref() => {
                info!("removed from the game by the host");
                self.disconnected();
                PeerUpdate::Kicked
            }
            other => {
                warn!("ignoring {:?} on a peer", other);
                PeerUpdate::Ignored
            }
        }
    }
}
