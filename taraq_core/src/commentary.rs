//! Advisory flavour text. Nothing here may gate or alter a state transition:
//! a missing or failed result simply leaves the display field blank.

use rand::seq::SliceRandom;

use crate::action::HeartAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentaryRequest {
    pub actor: String,
    pub target: String,
    pub action: HeartAction,
    pub amount: u8,
    pub remaining_hearts: i32,
    pub is_self: bool,
    pub is_death: bool,
}

pub trait Commentator {
    fn commentary(&self, request: &CommentaryRequest) -> Option<String>;

    fn winner_toast(&self, winner: &str, turns: u32) -> Option<String>;

    fn avatar(&self, _name: &str) -> Option<String> {
        None
    }
}

const EULOGIES: &[&str] = &[
    "{target} has left the building. Nobody is surprised.",
    "Rest in pieces, {target}. The dice never loved you.",
    "{actor} sends {target} to the shadow realm with a {amount}.",
];

const SELF_HARM: &[&str] = &[
    "{actor} looked at the dice and chose violence. Against themselves.",
    "Bold of {actor} to be their own worst enemy.",
];

const GENEROUS: &[&str] = &[
    "{actor} hands {target} {amount} hearts. Suspiciously kind.",
    "Charity from {actor}? Keep an eye on your back, {target}.",
];

const CRUEL: &[&str] = &[
    "{actor} takes {amount} from {target}. Cold. Calculated. Correct.",
    "{target} drops to {hearts}. {actor} does not look sorry.",
];

/// Offline commentator that picks from a fixed set of lines.
#[derive(Default)]
pub struct CannedCommentator;

impl Commentator for CannedCommentator {
    fn commentary(&self, request: &CommentaryRequest) -> Option<String> {
        let lines = if request.is_death {
            EULOGIES
        } else if request.is_self && request.action == HeartAction::Remove {
            SELF_HARM
        } else {
            match request.action {
                HeartAction::Add => GENEROUS,
                HeartAction::Remove => CRUEL,
            }
        };
        lines
            .choose(&mut rand::thread_rng())
            .map(|line| fill(line, request))
    }

    fn winner_toast(&self, winner: &str, _turns: u32) -> Option<String> {
        Some(format!("All hail {}, the last survivor!", winner))
    }
}

fn fill(line: &str, request: &CommentaryRequest) -> String {
    line.replace("{actor}", &request.actor)
        .replace("{target}", &request.target)
        .replace("{amount}", &request.amount.to_string())
        .replace("{hearts}", &request.remaining_hearts.to_string())
}

#[cfg(test)]
mod tests {
    use crate::{
        action::HeartAction,
        commentary::{CannedCommentator, Commentator, CommentaryRequest},
    };

    #[test]
    fn commentary_should_mention_the_target_on_death() {
        let line = CannedCommentator
            .commentary(&CommentaryRequest {
                is_death: true,
                ..request()
            })
            .unwrap();

        assert!(line.contains("Bob"), "{}", line);
        assert!(!line.contains('{'));
    }

    #[test]
    fn winner_toast_should_name_the_winner() {
        assert_eq!(
            CannedCommentator.winner_toast("Alice", 12),
            Some("All hail Alice, the last survivor!".to_string())
        );
    }

    #[test]
    fn canned_commentator_should_not_generate_avatars() {
        assert_eq!(CannedCommentator.avatar("Alice"), None);
    }

    // Infra ----------------------------------------------------------------

    fn request() -> CommentaryRequest {
        CommentaryRequest {
            actor: "Alice".to_string(),
            target: "Bob".to_string(),
            action: HeartAction::Remove,
            amount: 3,
            remaining_hearts: -5,
            is_self: false,
            is_death: false,
        }
    }
}
