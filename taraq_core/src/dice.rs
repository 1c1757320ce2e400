use rand::Rng;

pub const DICE_SIDES: u8 = 6;

pub trait DiceSource {
    /// An independent roll in `1..=DICE_SIDES`.
    fn roll(&mut self) -> u8;
}

#[derive(Default)]
pub struct RandomDice;

impl DiceSource for RandomDice {
    fn roll(&mut self) -> u8 {
        rand::thread_rng().gen_range(1..=DICE_SIDES)
    }
}

/// Replays a fixed sequence of rolls, cycling when exhausted.
pub struct LoadedDice {
    rolls: Vec<u8>,
    next: usize,
}

impl LoadedDice {
    pub fn new(rolls: Vec<u8>) -> Self {
        LoadedDice { rolls, next: 0 }
    }
}

impl DiceSource for LoadedDice {
    fn roll(&mut self) -> u8 {
        if self.rolls.is_empty() {
            return 1;
        }
        let value = self.rolls[self.next % self.rolls.len()];
        self.next += 1;
        value.clamp(1, DICE_SIDES)
    }
}

#[cfg(test)]
mod tests {
    use crate::dice::{DiceSource, LoadedDice, RandomDice, DICE_SIDES};

    #[test]
    fn random_dice_should_stay_within_faces() {
        let mut dice = RandomDice;
        for _ in 0..1000 {
            let value = dice.roll();
            assert!((1..=DICE_SIDES).contains(&value));
        }
    }

    #[test]
    fn loaded_dice_should_cycle_through_rolls() {
        let mut dice = LoadedDice::new(vec![3, 5]);

        assert_eq!(dice.roll(), 3);
        assert_eq!(dice.roll(), 5);
        assert_eq!(dice.roll(), 3);
    }
}
