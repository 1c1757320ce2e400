use serde::{Deserialize, Serialize};

pub type PlayerId = String;
pub type PeerId = u64;

/// Id of the player that belongs to the hosting process itself.
pub const HOST_PLAYER_ID: &str = "host";

/// Hearts at or below this value eliminate a player.
pub const DEATH_THRESHOLD: i32 = -5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub hearts: i32,
    pub is_dead: bool,
    #[serde(default)]
    pub is_host: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_id: Option<PeerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Player {
    pub fn new(id: PlayerId, name: String) -> Self {
        Player {
            id,
            name,
            hearts: 0,
            is_dead: false,
            is_host: false,
            peer_id: None,
            avatar_url: None,
        }
    }

    pub fn host(name: String) -> Self {
        Player {
            is_host: true,
            ..Player::new(HOST_PLAYER_ID.to_string(), name)
        }
    }

    /// Remote players are keyed by their connection id.
    pub fn remote(peer_id: PeerId, name: String) -> Self {
        Player {
            peer_id: Some(peer_id),
            ..Player::new(peer_id.to_string(), name)
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    pub fn is_controlled_by(&self, peer_id: PeerId) -> bool {
        self.peer_id == Some(peer_id)
    }

    /// Adds `delta` hearts. Returns true if this change eliminated the player.
    ///
    /// Elimination latches: hearts rising above the threshold again never
    /// revive a dead player, only `revive` does.
    pub fn adjust_hearts(&mut self, delta: i32) -> bool {
        self.hearts += delta;
        if self.hearts <= DEATH_THRESHOLD && !self.is_dead {
            self.is_dead = true;
            return true;
        }
        false
    }

    pub fn revive(&mut self) {
        self.hearts = 0;
        self.is_dead = false;
    }
}
