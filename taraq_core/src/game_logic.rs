use itertools::Itertools;
use log::{debug, info};

use crate::{
    action::HeartAction,
    commentary::CommentaryRequest,
    game_state::{GamePhase, GameState, LogKind},
    player::{Player, PlayerId, HOST_PLAYER_ID},
    split,
    utils::{join_names, SliceExtensions, VecExtensions},
};

pub const MIN_PLAYERS: usize = 2;

impl GameState {
    pub(crate) fn add_player(&mut self, player: Player) -> bool {
        if self.phase != GamePhase::Setup || self.player(&player.id).is_some() {
            return false;
        }
        info!("{} joined the game", player.name);
        self.players.push(player);
        true
    }

    pub(crate) fn remove_player(&mut self, id: &str) -> Option<Player> {
        if self.phase != GamePhase::Setup || id == HOST_PLAYER_ID {
            return None;
        }
        let removed = self.players.remove_first_where(|p| p.id == id)?;
        info!("{} left the game", removed.name);
        Some(removed)
    }

    pub(crate) fn start_game(&mut self) -> bool {
        if self.phase != GamePhase::Setup || self.players.len() < MIN_PLAYERS {
            return false;
        }
        self.current_player_index = 0;
        self.phase = GamePhase::Roll;
        self.push_log(
            "The game of Taraq begins. Everyone starts with 0 hearts.".to_string(),
            LogKind::Neutral,
        );
        self.push_log(
            "First player to drop to -5 hearts is eliminated.".to_string(),
            LogKind::Neutral,
        );
        info!("game started with {} players", self.players.len());
        true
    }

    /// Back to setup with the same roster and everyone at zero.
    pub(crate) fn reset_game(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Setup | GamePhase::GameOver) {
            return false;
        }
        for player in self.players.iter_mut() {
            player.revive();
        }
        *self = GameState {
            players: std::mem::take(&mut self.players),
            ..GameState::new()
        };
        info!("game reset");
        true
    }

    pub(crate) fn begin_roll(&mut self) -> bool {
        if self.phase != GamePhase::Roll || self.is_rolling {
            return false;
        }
        self.is_rolling = true;
        self.ai_commentary.clear();
        self.clear_split();
        true
    }

    pub(crate) fn finish_roll(&mut self, value: u8) -> bool {
        if self.phase != GamePhase::Roll || !self.is_rolling {
            return false;
        }
        let Some(roller) = self.current_player().map(|p| p.name.clone()) else {
            return false;
        };
        self.is_rolling = false;
        self.dice_value = Some(value);
        self.phase = GamePhase::Decide;
        self.push_log(format!("{} rolled a {}.", roller, value), LogKind::Neutral);
        debug!("{} rolled {}", roller, value);
        true
    }

    /// Applies the whole roll to one target. Returns what happened, for commentary.
    pub(crate) fn apply_direct_action(
        &mut self,
        target_id: &str,
        action: HeartAction,
        amount: u8,
    ) -> Option<CommentaryRequest> {
        if self.phase != GamePhase::Decide || self.dice_value.is_none() {
            return None;
        }
        let actor = self.current_player()?.clone();
        let target = self.player_mut(target_id)?;
        let died = target.adjust_hearts(action.signed(amount));
        let (target_name, remaining) = (target.name.clone(), target.hearts);

        let is_self = actor.id == target_id;
        let who = if is_self { "themselves" } else { target_name.as_str() };
        let (text, kind) = match action {
            HeartAction::Add => (
                format!("{} gave {} hearts to {}.", actor.name, amount, who),
                LogKind::Positive,
            ),
            HeartAction::Remove => (
                format!("{} removed {} hearts from {}.", actor.name, amount, who),
                LogKind::Negative,
            ),
        };
        self.push_log(text, kind);
        if died {
            self.push_log(
                format!("{} has fallen! (Hearts: {})", target_name, remaining),
                LogKind::Death,
            );
        }

        let request = CommentaryRequest {
            actor: actor.name,
            target: who.to_string(),
            action,
            amount,
            remaining_hearts: remaining,
            is_self,
            is_death: died,
        };
        self.check_win_condition();
        Some(request)
    }

    pub(crate) fn toggle_split(&mut self, enabled: bool) -> bool {
        if enabled {
            if self.is_split_mode || self.phase != GamePhase::Decide || self.dice_value.unwrap_or(0) <= 1 {
                return false;
            }
            self.is_split_mode = true;
            true
        } else if self.is_split_mode {
            self.clear_split();
            true
        } else {
            false
        }
    }

    /// Rejected adjustments leave the state untouched and are not reported.
    pub(crate) fn adjust_split(&mut self, target_id: &str, delta: i32) -> bool {
        let Some(budget) = self.dice_value else {
            return false;
        };
        if !self.is_split_mode || self.player(target_id).is_none() {
            return false;
        }
        split::adjust(&mut self.split_actions, target_id, delta, budget)
    }

    /// Applies every pending delta in one step. Unused points are allowed.
    pub(crate) fn commit_split(&mut self) -> bool {
        if self.phase != GamePhase::Decide || self.dice_value.is_none() || !self.is_split_mode {
            return false;
        }
        let Some(actor) = self.current_player().map(|p| p.id.clone()) else {
            return false;
        };
        let pending = std::mem::take(&mut self.split_actions);

        let mut parts = vec![];
        let mut fallen = vec![];
        for player in self.players.iter_mut() {
            let Some(&delta) = pending.get(&player.id) else {
                continue;
            };
            if player.adjust_hearts(delta) {
                fallen.push(player.name.clone());
            }
            let who = if player.id == actor { "themselves".to_string() } else { player.name.clone() };
            parts.push(format!("{:+} to {}", delta, who));
        }

        let actor_name = self.player_name(&actor).to_string();
        let kind = if !pending.is_empty() && pending.values().all(|d| *d > 0) {
            LogKind::Positive
        } else if !pending.is_empty() && pending.values().all(|d| *d < 0) {
            LogKind::Negative
        } else {
            LogKind::Neutral
        };
        let text = if parts.is_empty() {
            format!("{} let the roll go unused.", actor_name)
        } else {
            format!("{} split the roll: {}.", actor_name, parts.iter().join(", "))
        };
        self.push_log(text, kind);
        match fallen.len() {
            0 => {}
            1 => self.push_log(format!("{} has fallen!", fallen[0]), LogKind::Death),
            _ => self.push_log(format!("{} have fallen!", join_names(&fallen)), LogKind::Death),
        }

        self.clear_split();
        self.check_win_condition();
        true
    }

    /// Ends the game if at most one player is left standing, otherwise passes the turn.
    pub(crate) fn check_win_condition(&mut self) {
        if self.players.len() < MIN_PLAYERS {
            self.advance_turn();
            return;
        }
        let living = self.living_players();
        let survivor = living.single_element().map(|&p| p.clone());
        let nobody_left = living.is_empty();

        if let Some(winner) = survivor {
            info!("{} won after {} turns", winner.name, self.turn_count);
            self.push_log(format!("{} is the last survivor!", winner.name), LogKind::Neutral);
            self.finish_game(Some(winner));
        } else if nobody_left {
            info!("nobody survived");
            self.push_log("Nobody survived.".to_string(), LogKind::Death);
            self.finish_game(None);
        } else {
            self.advance_turn();
        }
    }

    /// Passes the turn to the next living player, at most one lap around the table.
    pub(crate) fn advance_turn(&mut self) {
        let count = self.players.len();
        if count > 0 {
            let next = (1..=count)
                .map(|step| (self.current_player_index + step) % count)
                .find(|&index| self.players[index].is_alive());
            if let Some(index) = next {
                self.current_player_index = index;
            }
        }
        self.phase = GamePhase::Roll;
        self.dice_value = None;
        self.clear_split();
        self.turn_count += 1;
        debug!("turn {} goes to {:?}", self.turn_count, self.current_player().map(|p| &p.name));
    }

    pub(crate) fn set_commentary(&mut self, text: String) {
        self.ai_commentary = text;
    }

    pub(crate) fn set_avatar(&mut self, id: &PlayerId, url: String) -> bool {
        match self.player_mut(id) {
            Some(player) => {
                player.avatar_url = Some(url);
                true
            }
            None => false,
        }
    }

    fn finish_game(&mut self, winner: Option<Player>) {
        self.winner = winner;
        self.phase = GamePhase::GameOver;
        self.dice_value = None;
        self.clear_split();
    }

    fn clear_split(&mut self) {
        self.is_split_mode = false;
        self.split_actions.clear();
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        action::HeartAction,
        game_state::{GamePhase, GameState, LogKind},
        player::{Player, DEATH_THRESHOLD},
    };

    #[test]
    fn advance_turn_should_skip_dead_players() {
        let mut state = running(vec![player("a", -6, true), player("b", 0, false), player("c", 0, false)]);
        state.current_player_index = 0;

        state.advance_turn();

        assert_eq!(state.current_player_index, 1);
        assert_eq!(state.phase, GamePhase::Roll);
        assert_eq!(state.turn_count, 1);
    }

    #[test]
    fn advance_turn_should_wrap_around() {
        let mut state = running(vec![player("a", 0, false), player("b", -5, true), player("c", 0, false)]);
        state.current_player_index = 2;

        state.advance_turn();

        assert_eq!(state.current_player_index, 0);
    }

    #[test]
    fn advance_turn_should_terminate_without_living_players() {
        let mut state = running(vec![player("a", -5, true), player("b", -5, true)]);
        state.current_player_index = 1;

        state.advance_turn();

        assert_eq!(state.current_player_index, 1);
    }

    #[test]
    fn check_win_condition_should_crown_last_survivor() {
        let mut state = running(vec![player("a", -5, true), player("b", 2, false), player("c", -9, true)]);

        state.check_win_condition();

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.winner.as_ref().map(|w| w.id.as_str()), Some("b"));
    }

    #[test]
    fn check_win_condition_should_not_fire_for_single_player() {
        let mut state = running(vec![player("a", 0, false)]);

        state.check_win_condition();

        assert_eq!(state.phase, GamePhase::Roll);
        assert_eq!(state.winner, None);
    }

    #[test]
    fn check_win_condition_should_end_without_winner_when_everyone_fell() {
        let mut state = running(vec![player("a", -5, true), player("b", -7, true)]);

        state.check_win_condition();

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.winner, None);
    }

    #[test]
    fn start_game_should_require_two_players() {
        let mut state = GameState::new();
        state.add_player(Player::host("Host".to_string()));

        assert!(!state.start_game());

        state.add_player(Player::remote(9, "Bob".to_string()));
        assert!(state.start_game());
        assert_eq!(state.phase, GamePhase::Roll);
        assert_eq!(state.logs.len(), 2);
    }

    #[test]
    fn add_player_should_reject_duplicates_and_running_games() {
        let mut state = GameState::new();

        assert!(state.add_player(Player::remote(9, "Bob".to_string())));
        assert!(!state.add_player(Player::remote(9, "Bob again".to_string())));

        state.phase = GamePhase::Roll;
        assert!(!state.add_player(Player::remote(10, "Late".to_string())));
    }

    #[test]
    fn remove_player_should_protect_the_host() {
        let mut state = GameState::new();
        state.add_player(Player::host("Host".to_string()));
        state.add_player(Player::remote(9, "Bob".to_string()));

        assert_eq!(state.remove_player("host"), None);
        assert_eq!(state.remove_player("9").map(|p| p.name), Some("Bob".to_string()));
        assert_eq!(state.players.len(), 1);
    }

    #[test]
    fn roll_should_move_to_decide_and_log_value() {
        let mut state = running(vec![player("a", 0, false), player("b", 0, false)]);

        assert!(state.begin_roll());
        assert!(!state.begin_roll());
        assert!(state.is_rolling);
        assert!(state.finish_roll(4));

        assert_eq!(state.phase, GamePhase::Decide);
        assert_eq!(state.dice_value, Some(4));
        assert!(!state.is_rolling);
        assert_eq!(state.logs.last().unwrap().text, "A rolled a 4.");
    }

    #[test]
    fn finish_roll_should_require_a_pending_roll() {
        let mut state = running(vec![player("a", 0, false), player("b", 0, false)]);

        assert!(!state.finish_roll(4));
        assert_eq!(state.phase, GamePhase::Roll);
    }

    #[test]
    fn direct_action_at_boundary_should_eliminate() {
        let mut state = deciding(vec![player("a", 0, false), player("b", -4, false), player("c", 0, false)], 1);

        let request = state.apply_direct_action("b", HeartAction::Remove, 1).unwrap();

        let b = state.player("b").unwrap();
        assert_eq!(b.hearts, DEATH_THRESHOLD);
        assert!(b.is_dead);
        assert!(request.is_death);
        assert_eq!(state.logs.last().unwrap().kind, LogKind::Death);
        assert_eq!(state.current_player_index, 2);
    }

    #[test]
    fn direct_action_with_zero_amount_should_not_eliminate() {
        let mut state = deciding(vec![player("a", 0, false), player("b", -4, false), player("c", 0, false)], 1);

        state.apply_direct_action("b", HeartAction::Remove, 0).unwrap();

        assert!(!state.player("b").unwrap().is_dead);
    }

    #[test]
    fn direct_action_on_self_should_say_themselves() {
        let mut state = deciding(vec![player("a", 0, false), player("b", 0, false)], 3);

        let request = state.apply_direct_action("a", HeartAction::Add, 3).unwrap();

        assert!(request.is_self);
        assert_eq!(state.logs.last().unwrap().text, "A gave 3 hearts to themselves.");
        assert_eq!(state.player("a").unwrap().hearts, 3);
        assert_eq!(state.phase, GamePhase::Roll);
        assert_eq!(state.dice_value, None);
    }

    #[test]
    fn direct_action_should_require_a_roll() {
        let mut state = running(vec![player("a", 0, false), player("b", 0, false)]);

        assert_eq!(state.apply_direct_action("b", HeartAction::Remove, 3), None);
        assert_eq!(state.player("b").unwrap().hearts, 0);
    }

    #[test]
    fn direct_action_killing_second_to_last_should_end_game() {
        let mut state = deciding(vec![player("a", 0, false), player("b", -2, false)], 3);

        state.apply_direct_action("b", HeartAction::Remove, 3).unwrap();

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.winner.as_ref().map(|w| w.id.as_str()), Some("a"));
    }

    #[test]
    fn toggle_split_should_need_roll_above_one() {
        let mut state = deciding(vec![player("a", 0, false), player("b", 0, false)], 1);

        assert!(!state.toggle_split(true));

        state.dice_value = Some(2);
        assert!(state.toggle_split(true));
        assert!(!state.toggle_split(true));
        assert!(state.adjust_split("b", -1));
        assert!(state.toggle_split(false));
        assert!(state.split_actions.is_empty());
    }

    #[test]
    fn adjust_split_should_enforce_budget() {
        let mut state = deciding(vec![player("a", 0, false), player("b", 0, false)], 4);
        state.toggle_split(true);

        assert!(state.adjust_split("a", 2));
        assert!(!state.adjust_split("b", 3));
        assert!(state.adjust_split("b", 2));
        assert_eq!(state.remaining_split_points(), Some(0));
    }

    #[test]
    fn adjust_split_should_ignore_unknown_players() {
        let mut state = deciding(vec![player("a", 0, false), player("b", 0, false)], 4);
        state.toggle_split(true);

        assert!(!state.adjust_split("zz", 1));
        assert!(state.split_actions.is_empty());
    }

    #[test]
    fn commit_split_should_apply_all_deltas_at_once() {
        let mut state = deciding(
            vec![player("a", 0, false), player("b", -4, false), player("c", -3, false), player("d", 0, false)],
            4,
        );
        state.toggle_split(true);
        state.adjust_split("b", -1);
        state.adjust_split("c", -2);
        state.adjust_split("a", 1);

        assert!(state.commit_split());

        let hearts = state.players.iter().map(|p| p.hearts).collect::<Vec<_>>();
        assert_eq!(hearts, vec![1, -5, -5, 0]);
        let texts = state.logs.iter().map(|e| e.text.as_str()).collect::<Vec<_>>();
        assert_eq!(
            texts,
            vec!["A split the roll: +1 to themselves, -1 to B, -2 to C.", "B and C have fallen!"]
        );
        assert!(state.split_actions.is_empty());
        assert!(!state.is_split_mode);
        assert_eq!(state.current_player_index, 3);
    }

    #[test]
    fn commit_split_should_use_singular_for_one_death() {
        let mut state = deciding(vec![player("a", 0, false), player("b", -4, false), player("c", 0, false)], 2);
        state.toggle_split(true);
        state.adjust_split("b", -2);

        state.commit_split();

        assert_eq!(state.logs.last().unwrap().text, "B has fallen!");
    }

    #[test]
    fn commit_split_should_allow_unused_points() {
        let mut state = deciding(vec![player("a", 0, false), player("b", 0, false)], 5);
        state.toggle_split(true);
        state.adjust_split("b", 2);

        assert!(state.commit_split());
        assert_eq!(state.player("b").unwrap().hearts, 2);
        assert_eq!(state.phase, GamePhase::Roll);
    }

    #[test]
    fn reset_game_should_keep_roster_and_zero_everything() {
        let mut state = deciding(vec![player("a", 3, false), player("b", -2, false)], 3);
        state.apply_direct_action("b", HeartAction::Remove, 3);
        assert_eq!(state.phase, GamePhase::GameOver);

        assert!(state.reset_game());

        assert_eq!(state.phase, GamePhase::Setup);
        assert_eq!(state.players.len(), 2);
        assert!(state.players.iter().all(|p| p.hearts == 0 && !p.is_dead));
        assert!(state.logs.is_empty());
        assert_eq!(state.winner, None);
        assert_eq!(state.turn_count, 0);
    }

    #[test]
    fn reset_game_should_not_interrupt_a_running_game() {
        let mut state = running(vec![player("a", 0, false), player("b", 0, false)]);

        assert!(!state.reset_game());
    }

    // Infra ----------------------------------------------------------------

    fn player(id: &str, hearts: i32, is_dead: bool) -> Player {
        Player {
            hearts,
            is_dead,
            ..Player::new(id.to_string(), id.to_uppercase())
        }
    }

    fn running(players: Vec<Player>) -> GameState {
        GameState {
            players,
            phase: GamePhase::Roll,
            ..GameState::new()
        }
    }

    fn deciding(players: Vec<Player>, dice: u8) -> GameState {
        GameState {
            players,
            phase: GamePhase::Decide,
            dice_value: Some(dice),
            ..GameState::new()
        }
    }
}
