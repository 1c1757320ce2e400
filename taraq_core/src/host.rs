//! The authoritative side of a game. A `HostSession` is the only owner of a
//! mutable `GameState`; every accepted change is queued as a full snapshot
//! broadcast, rejected requests leave both the state and the outbox untouched.

use std::time::Duration;

use log::{debug, info, warn};
use rand::{distributions::Alphanumeric, Rng};

use crate::{
    action::Intent,
    commentary::CommentaryRequest,
    dice::DiceSource,
    events::{JoinPayload, KickPayload, NetworkMessage},
    game_state::{GamePhase, GameState},
    player::{PeerId, Player, PlayerId},
};

/// Work the host asks its surrounding event loop to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Broadcast(NetworkMessage),
    SendTo(PeerId, NetworkMessage),
    /// Call `settle_roll` once the delay has passed.
    SettleRoll(Duration),
    Commentary(CommentaryRequest),
    WinnerToast { winner: String, turns: u32 },
    Avatar { player_id: PlayerId, name: String },
}

pub struct HostSession {
    state: GameState,
    dice: Box<dyn DiceSource + Send>,
    settle_delay: Duration,
    outbox: Vec<Outbound>,
}

impl HostSession {
    pub fn new(host_name: &str, settle_delay: Duration, dice: Box<dyn DiceSource + Send>) -> Self {
        let mut session = HostSession {
            state: GameState::new(),
            dice,
            settle_delay,
            outbox: vec![],
        };
        let host = Player::host(display_name(host_name, "Host"));
        session.request_avatar(&host);
        session.state.add_player(host);
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Takes everything queued since the last call, in order.
    pub fn drain(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.outbox)
    }

    pub fn handle_message(&mut self, from: PeerId, message: NetworkMessage) {
        match message {
            NetworkMessage::Join(payload) => self.join(from, payload),
            NetworkMessage::SyncState(_) | NetworkMessage::KickPlayer(_) => {
                warn!("peer {} sent a host-only message, ignoring", from);
            }
            action => {
                let Some(intent) = action.intent() else {
                    return;
                };
                let owns_turn = self
                    .state
                    .current_player()
                    .map(|p| p.is_controlled_by(from))
                    .unwrap_or(false);
                if !self.state.is_running() || !owns_turn {
                    warn!("peer {} is not the current player, ignoring {:?}", from, intent);
                    return;
                }
                self.apply(intent);
            }
        }
    }

    /// Intent from the host's own console, on behalf of a player without a connection.
    pub fn submit_local(&mut self, intent: Intent) {
        let local_turn = self
            .state
            .current_player()
            .map(|p| p.peer_id.is_none())
            .unwrap_or(false);
        if !self.state.is_running() || !local_turn {
            warn!("not a local player's turn, ignoring {:?}", intent);
            return;
        }
        self.apply(intent);
    }

    pub fn add_local_player(&mut self, name: &str) -> Option<PlayerId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(7)
            .map(char::from)
            .collect();
        let player = Player::new(id.clone(), name.to_string());
        if !self.state.add_player(player.clone()) {
            return None;
        }
        self.request_avatar(&player);
        self.broadcast();
        Some(id)
    }

    pub fn remove_player(&mut self, id: &str) -> bool {
        let Some(removed) = self.state.remove_player(id) else {
            return false;
        };
        if let Some(peer_id) = removed.peer_id {
            self.outbox.push(Outbound::SendTo(
                peer_id,
                NetworkMessage::KickPlayer(KickPayload { id: removed.id }),
            ));
        }
        self.broadcast();
        true
    }

    pub fn start_game(&mut self) -> bool {
        self.mutate(GameState::start_game)
    }

    pub fn reset_game(&mut self) -> bool {
        self.mutate(GameState::reset_game)
    }

    /// Resolves a roll started by `Intent::Roll`.
    pub fn settle_roll(&mut self) {
        if !self.state.is_rolling {
            debug!("no roll pending, dropping settle");
            return;
        }
        let value = self.dice.roll();
        self.mutate(|state| state.finish_roll(value));
    }

    pub fn set_commentary(&mut self, text: String) {
        if text.is_empty() || self.state.is_rolling || text == self.state.ai_commentary {
            return;
        }
        self.mutate(|state| {
            state.set_commentary(text);
            true
        });
    }

    pub fn set_avatar(&mut self, player_id: &PlayerId, url: String) {
        self.mutate(|state| state.set_avatar(player_id, url));
    }

    pub fn connection_closed(&mut self, peer_id: PeerId) {
        match self.state.players.iter().find(|p| p.is_controlled_by(peer_id)) {
            Some(player) => info!("{} dropped their connection", player.name),
            None => debug!("unknown peer {} disconnected", peer_id),
        }
    }

    fn join(&mut self, from: PeerId, payload: JoinPayload) {
        let known = self.state.players.iter().any(|p| p.is_controlled_by(from));
        if !known {
            let mut player = Player::remote(from, display_name(&payload.name, &format!("Player {}", from)));
            player.avatar_url = payload.avatar_url;
            if !self.state.add_player(player.clone()) {
                warn!("{} cannot join during {}", player.name, self.state.phase);
                return;
            }
            if player.avatar_url.is_none() {
                self.request_avatar(&player);
            }
        }
        self.broadcast();
    }

    fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Roll => self.roll(),
            Intent::Decide { target_id, action } => {
                let Some(amount) = self.state.dice_value else {
                    return;
                };
                if let Some(request) = self.state.apply_direct_action(&target_id, action, amount) {
                    self.broadcast();
                    self.request_commentary(request);
                }
            }
            Intent::SplitToggle(enabled) => {
                self.mutate(|state| state.toggle_split(enabled));
            }
            Intent::SplitAdjust { target_id, delta } => {
                self.mutate(|state| state.adjust_split(&target_id, delta));
            }
            Intent::SplitCommit => {
                if self.mutate(GameState::commit_split) {
                    self.request_winner_toast();
                }
            }
        }
    }

    fn roll(&mut self) {
        if !self.mutate(GameState::begin_roll) {
            return;
        }
        if self.settle_delay.is_zero() {
            self.settle_roll();
        } else {
            self.outbox.push(Outbound::SettleRoll(self.settle_delay));
        }
    }

    fn mutate<F>(&mut self, change: F) -> bool
    where
        F: FnOnce(&mut GameState) -> bool,
    {
        let changed = change(&mut self.state);
        if changed {
            self.broadcast();
        }
        changed
    }

    fn broadcast(&mut self) {
        self.outbox
            .push(Outbound::Broadcast(NetworkMessage::sync(&self.state)));
    }

    fn request_commentary(&mut self, request: CommentaryRequest) {
        if self.state.phase == GamePhase::GameOver {
            self.request_winner_toast();
        } else {
            self.outbox.push(Outbound::Commentary(request));
        }
    }

    fn request_winner_toast(&mut self) {
        if let Some(winner) = &self.state.winner {
            self.outbox.push(Outbound::WinnerToast {
                winner: winner.name.clone(),
                turns: self.state.turn_count,
            });
        }
    }

    fn request_avatar(&mut self, player: &Player) {
        self.outbox.push(Outbound::Avatar {
            player_id: player.id.clone(),
            name: player.name.clone(),
        });
    }
}

fn display_name(name: &str, fallback: &str) -> String {
    match name.trim() {
        "" => fallback.to_string(),
        trimmed => trimmed.to_string(),
    }
}
