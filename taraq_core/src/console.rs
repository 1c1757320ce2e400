use std::{fmt::Write, str::FromStr};

use itertools::Itertools;
use strum::EnumMessage;
use strum_macros::EnumMessage;

use crate::{
    action::{HeartAction, Intent},
    game_state::{GamePhase, GameState, LogKind},
    player::DEATH_THRESHOLD,
};

const SHOWN_LOG_LINES: usize = 6;

#[derive(Debug, PartialEq, Eq, Clone, EnumMessage)]
pub enum Command {
    #[strum(message = "roll the dice", detailed_message = "r")]
    Roll,
    #[strum(message = "give the whole roll to player N", detailed_message = "+ N")]
    Give(usize),
    #[strum(message = "take the whole roll from player N", detailed_message = "- N")]
    Take(usize),
    #[strum(message = "switch split mode on or off", detailed_message = "s [off]")]
    Split(bool),
    #[strum(message = "move player N's share by D (e.g. a 2 -1)", detailed_message = "a N D")]
    Adjust(usize, i32),
    #[strum(message = "commit the split", detailed_message = "c")]
    Commit,
    #[strum(message = "start the game (host)", detailed_message = "start")]
    Start,
    #[strum(message = "back to setup after a game (host)", detailed_message = "reset")]
    Reset,
    #[strum(message = "add a local player (host)", detailed_message = "add NAME")]
    Add(String),
    #[strum(message = "remove player N during setup (host)", detailed_message = "kick N")]
    Kick(usize),
    #[strum(message = "show this help", detailed_message = "h")]
    Help,
    #[strum(message = "quit", detailed_message = "q")]
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseCommandError;

impl Command {
    pub fn help() -> String {
        [
            Command::Roll,
            Command::Give(0),
            Command::Take(0),
            Command::Split(true),
            Command::Adjust(0, 0),
            Command::Commit,
            Command::Start,
            Command::Reset,
            Command::Add(String::new()),
            Command::Kick(0),
            Command::Help,
            Command::Quit,
        ]
        .iter()
        .map(|c| {
            format!(
                "- [{}]: {}",
                c.get_detailed_message().unwrap_or(""),
                c.get_message().unwrap_or("")
            )
        })
        .join("\n")
    }

    /// The turn intent behind this command, resolving roster positions to player ids.
    pub fn intent(&self, state: &GameState) -> Option<Intent> {
        let target = |index: &usize| state.players.get(*index).map(|p| p.id.clone());
        match self {
            Command::Roll => Some(Intent::Roll),
            Command::Give(index) => target(index).map(|target_id| Intent::Decide {
                target_id,
                action: HeartAction::Add,
            }),
            Command::Take(index) => target(index).map(|target_id| Intent::Decide {
                target_id,
                action: HeartAction::Remove,
            }),
            Command::Split(enabled) => Some(Intent::SplitToggle(*enabled)),
            Command::Adjust(index, delta) => target(index).map(|target_id| Intent::SplitAdjust {
                target_id,
                delta: *delta,
            }),
            Command::Commit => Some(Intent::SplitCommit),
            _ => None,
        }
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn index(word: &str) -> Result<usize, ParseCommandError> {
            usize::from_str(word).map_err(|_| ParseCommandError)
        }

        let words = s.split_whitespace().collect::<Vec<_>>();
        match words.as_slice() {
            ["r"] => Ok(Command::Roll),
            ["+", n] => Ok(Command::Give(index(n)?)),
            ["-", n] => Ok(Command::Take(index(n)?)),
            ["s"] => Ok(Command::Split(true)),
            ["s", "off"] => Ok(Command::Split(false)),
            ["a", n, d] => Ok(Command::Adjust(
                index(n)?,
                i32::from_str(d).map_err(|_| ParseCommandError)?,
            )),
            ["c"] => Ok(Command::Commit),
            ["start"] => Ok(Command::Start),
            ["reset"] => Ok(Command::Reset),
            ["add", name @ ..] if !name.is_empty() => Ok(Command::Add(name.join(" "))),
            ["kick", n] => Ok(Command::Kick(index(n)?)),
            ["h"] => Ok(Command::Help),
            ["q"] => Ok(Command::Quit),
            _ => Err(ParseCommandError),
        }
    }
}

/// Text view of a snapshot. `me` marks the viewer's own player.
pub fn render(state: &GameState, me: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== TARAQ === phase: {} | turn {}", state.phase, state.turn_count);
    for (i, p) in state.players.iter().enumerate() {
        let marker = if state.is_running() && i == state.current_player_index { ">" } else { " " };
        let status = if p.is_dead {
            "dead".to_string()
        } else if p.hearts <= DEATH_THRESHOLD + 2 {
            format!("{} hearts (in danger)", p.hearts)
        } else {
            format!("{} hearts", p.hearts)
        };
        let mut tags = vec![];
        if p.is_host {
            tags.push("host");
        }
        if Some(p.id.as_str()) == me {
            tags.push("you");
        }
        if let Some(delta) = state.split_actions.get(&p.id) {
            let _ = writeln!(out, "{}[{}] {} - {} {:?} pending {:+}", marker, i, p.name, status, tags, delta);
        } else {
            let _ = writeln!(out, "{}[{}] {} - {} {:?}", marker, i, p.name, status, tags);
        }
    }
    match state.phase {
        GamePhase::Roll if state.is_rolling => {
            let _ = writeln!(out, "Rolling...");
        }
        GamePhase::Decide => {
            let _ = write!(out, "Dice: {}", state.dice_value.unwrap_or(0));
            if let (true, Some(remaining)) = (state.is_split_mode, state.remaining_split_points()) {
                let _ = write!(out, " | split mode, {} points left", remaining);
            }
            let _ = writeln!(out);
        }
        GamePhase::GameOver => {
            let _ = match &state.winner {
                Some(w) => writeln!(out, "{} wins!", w.name),
                None => writeln!(out, "Nobody wins."),
            };
        }
        _ => {}
    }
    for entry in state.logs.iter().rev().take(SHOWN_LOG_LINES).rev() {
        let prefix = match entry.kind {
            LogKind::Death => "x ",
            LogKind::Positive => "+ ",
            LogKind::Negative => "- ",
            LogKind::Neutral | LogKind::Commentary => "  ",
        };
        let _ = writeln!(out, "{}{}", prefix, entry.text);
    }
    if !state.ai_commentary.is_empty() {
        let _ = writeln!(out, "\"{}\"", state.ai_commentary);
    }
    out
}
