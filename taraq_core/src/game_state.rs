use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::{
    player::{Player, PlayerId},
    split::{remaining_points, SplitActions},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Lobby,
    Setup,
    Roll,
    Decide,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Neutral,
    Positive,
    Negative,
    Death,
    Commentary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: LogKind,
}

/// The authoritative snapshot. Owned by the host session, replaced
/// wholesale on every peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub players: Vec<Player>,
    pub current_player_index: usize,
    pub phase: GamePhase,
    pub dice_value: Option<u8>,
    pub is_rolling: bool,
    pub logs: Vec<LogEntry>,
    pub turn_count: u32,
    pub winner: Option<Player>,
    pub ai_commentary: String,
    pub is_split_mode: bool,
    pub split_actions: SplitActions,
}

impl GameState {
    pub fn new() -> Self {
        GameState {
            players: vec![],
            current_player_index: 0,
            phase: GamePhase::Setup,
            dice_value: None,
            is_rolling: false,
            logs: vec![],
            turn_count: 0,
            winner: None,
            ai_commentary: String::new(),
            is_split_mode: false,
            split_actions: SplitActions::new(),
        }
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn living_players(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_alive()).collect()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, GamePhase::Roll | GamePhase::Decide)
    }

    /// Roll points not yet allocated in split mode.
    pub fn remaining_split_points(&self) -> Option<i64> {
        self.dice_value
            .map(|budget| remaining_points(&self.split_actions, budget))
    }

    pub fn player_name(&self, id: &PlayerId) -> &str {
        self.player(id).map(|p| p.name.as_str()).unwrap_or("?")
    }

    pub(crate) fn push_log(&mut self, text: String, kind: LogKind) {
        let id = self.logs.last().map(|e| e.id + 1).unwrap_or(0);
        self.logs.push(LogEntry { id, text, kind });
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        game_state::{GamePhase, GameState, LogKind},
        player::Player,
    };

    #[test]
    fn living_players_should_skip_dead_players() {
        let state = state_with(vec![player("a", true), player("b", false), player("c", false)]);

        let living = state.living_players().iter().map(|p| p.id.clone()).collect::<Vec<_>>();

        assert_eq!(living, vec!["b", "c"]);
    }

    #[test]
    fn remaining_split_points_should_subtract_allocations() {
        let mut state = state_with(vec![player("a", false), player("b", false)]);
        state.dice_value = Some(5);
        state.split_actions.insert("a".to_string(), -2);
        state.split_actions.insert("b".to_string(), 1);

        assert_eq!(state.remaining_split_points(), Some(2));
    }

    #[test]
    fn remaining_split_points_should_be_none_without_roll() {
        let state = state_with(vec![player("a", false)]);

        assert_eq!(state.remaining_split_points(), None);
    }

    #[test]
    fn push_log_should_assign_increasing_ids() {
        let mut state = GameState::new();
        state.push_log("one".to_string(), LogKind::Neutral);
        state.push_log("two".to_string(), LogKind::Death);

        assert_eq!(state.logs.iter().map(|e| e.id).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn snapshot_should_serialize_with_camel_case_fields() {
        let mut state = state_with(vec![player("a", false)]);
        state.phase = GamePhase::GameOver;
        state.push_log("done".to_string(), LogKind::Neutral);

        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["phase"], "GAME_OVER");
        assert_eq!(json["currentPlayerIndex"], 0);
        assert_eq!(json["players"][0]["isDead"], false);
        assert_eq!(json["logs"][0]["type"], "neutral");
        assert!(json["diceValue"].is_null());
    }

    // Infra ----------------------------------------------------------------

    fn player(id: &str, is_dead: bool) -> Player {
        Player {
            is_dead,
            ..Player::new(id.to_string(), id.to_uppercase())
        }
    }

    fn state_with(players: Vec<Player>) -> GameState {
        GameState {
            players,
            ..GameState::new()
        }
    }
}
