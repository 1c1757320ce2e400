use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::player::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeartAction {
    #[strum(serialize = "add")]
    Add,
    #[strum(serialize = "remove")]
    Remove,
}

impl HeartAction {
    pub fn signed(&self, amount: u8) -> i32 {
        match self {
            HeartAction::Add => amount as i32,
            HeartAction::Remove => -(amount as i32),
        }
    }
}

/// Something a participant wants to happen on their turn. Only the host
/// turns an intent into a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Roll,
    Decide {
        target_id: PlayerId,
        action: HeartAction,
    },
    SplitToggle(bool),
    SplitAdjust {
        target_id: PlayerId,
        delta: i32,
    },
    SplitCommit,
}
