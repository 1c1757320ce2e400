use serde::{Deserialize, Serialize};

use crate::{
    action::{HeartAction, Intent},
    error::WireError,
    game_state::GameState,
    player::PlayerId,
};

/// Every message exchanged between host and peers: `{"type": ..., "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkMessage {
    Join(JoinPayload),
    SyncState(Box<GameState>),
    ActionRoll,
    ActionDecide(DecidePayload),
    ActionSplitAdjust(SplitAdjustPayload),
    ActionSplitToggle(bool),
    ActionSplitCommit,
    KickPlayer(KickPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecidePayload {
    pub target_id: PlayerId,
    pub action: HeartAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitAdjustPayload {
    pub target_id: PlayerId,
    pub delta: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KickPayload {
    pub id: PlayerId,
}

impl NetworkMessage {
    pub fn sync(state: &GameState) -> Self {
        NetworkMessage::SyncState(Box::new(state.clone()))
    }

    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let text = String::from_utf8(bytes.to_vec())?;
        Ok(serde_json::from_str(&text)?)
    }

    /// The turn intent carried by an `ACTION_*` message.
    pub fn intent(&self) -> Option<Intent> {
        match self {
            NetworkMessage::ActionRoll => Some(Intent::Roll),
            NetworkMessage::ActionDecide(p) => Some(Intent::Decide {
                target_id: p.target_id.clone(),
                action: p.action,
            }),
            NetworkMessage::ActionSplitAdjust(p) => Some(Intent::SplitAdjust {
                target_id: p.target_id.clone(),
                delta: p.delta,
            }),
            NetworkMessage::ActionSplitToggle(enabled) => Some(Intent::SplitToggle(*enabled)),
            NetworkMessage::ActionSplitCommit => Some(Intent::SplitCommit),
            NetworkMessage::Join(_) | NetworkMessage::SyncState(_) | NetworkMessage::KickPlayer(_) => {
                None
            }
        }
    }
}

impl From<Intent> for NetworkMessage {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Roll => NetworkMessage::ActionRoll,
            Intent::Decide { target_id, action } => {
                NetworkMessage::ActionDecide(DecidePayload { target_id, action })
            }
            Intent::SplitToggle(enabled) => NetworkMessage::ActionSplitToggle(enabled),
            Intent::SplitAdjust { target_id, delta } => {
                NetworkMessage::ActionSplitAdjust(SplitAdjustPayload { target_id, delta })
            }
            Intent::SplitCommit => NetworkMessage::ActionSplitCommit,
        }
    }
}
