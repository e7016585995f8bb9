use rand::{rngs::StdRng, Rng, SeedableRng};

pub const MIN_VALUE: u8 = 1;
pub const MAX_VALUE: u8 = 99;

/// Which of the two displayed numbers the player picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Side {
    #[strum(to_string = "left")]
    Left,
    #[strum(to_string = "right")]
    Right,
}

/// Two distinct numbers shown side by side for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberPair {
    pub left: u8,
    pub right: u8,
}

impl NumberPair {
    pub fn larger_side(&self) -> Side {
        if self.left > self.right {
            Side::Left
        } else {
            Side::Right
        }
    }

    pub fn value(&self, side: Side) -> u8 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Whether picking `choice` is the right answer for this pair.
    pub fn is_correct(&self, choice: Side) -> bool {
        (choice == Side::Left) == (self.left > self.right)
    }
}

/// Produces a fresh pair of distinct numbers in `1..=99` for every question.
#[derive(Debug)]
pub struct RoundGenerator<R: Rng = StdRng> {
    rng: R,
}

impl RoundGenerator<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RoundGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn next_pair(&mut self) -> NumberPair {
        let left = self.draw();
        let mut right = self.draw();
        while right == left {
            right = self.draw();
        }
        NumberPair { left, right }
    }

    fn draw(&mut self) -> u8 {
        self.rng.gen_range(MIN_VALUE..=MAX_VALUE)
    }
}

impl<R: Rng> Iterator for RoundGenerator<R> {
    type Item = NumberPair;

    fn next(&mut self) -> Option<NumberPair> {
        Some(self.next_pair())
    }
}
