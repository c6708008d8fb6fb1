//! Canned one-liners for the verdict quip and the two-line clamp.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

const SUCCESS_LINES: [&str; 12] = [
    "Nice one.",
    "That works.",
    "Clean answer.",
    "Perfect fit.",
    "Good pick.",
    "You nailed it.",
    "Sharp move.",
    "Solid call.",
    "On target.",
    "That passes.",
    "Right on.",
    "Strong round.",
];

const ROAST_LINES: [&str; 14] = [
    "That guess was wild.",
    "Scale says nope.",
    "Bold. Incorrect, but bold.",
    "Nice try, wrong planet.",
    "Range missed by a mile.",
    "That was a certified miss.",
    "Try again, but with gravity this time.",
    "You almost invented new physics.",
    "The scale is disappointed.",
    "A swing and a miss.",
    "Math did not agree.",
    "Respectfully: absolutely not.",
    "This scale has standards.",
    "Reset and swing smarter.",
];

/// Deterministic picker for verdict quips.
///
/// Seeded so a replayed session produces the same lines.
#[derive(Debug)]
pub struct Banter {
    rng: ChaCha8Rng,
}

impl Banter {
    /// Creates a picker from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// A line for a passed turn.
    pub fn success_line(&mut self) -> &'static str {
        SUCCESS_LINES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or("Nice one.")
    }

    /// A line for a failed turn.
    pub fn roast_line(&mut self) -> &'static str {
        ROAST_LINES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or("Scale says nope.")
    }
}

/// Clamps a quip to its first two non-empty lines.
pub fn limit_two_lines(text: &str) -> String {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(2)
        .collect();
    if lines.is_empty() {
        "...".to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_two_lines_clamps_and_trims() {
        assert_eq!(limit_two_lines("one\n\n  two  \nthree"), "one\ntwo");
        assert_eq!(limit_two_lines("just one"), "just one");
        assert_eq!(limit_two_lines("  \n\n"), "...");
    }

    #[test]
    fn test_same_seed_produces_same_lines() {
        let mut a = Banter::seeded(7);
        let mut b = Banter::seeded(7);
        for _ in 0..10 {
            assert_eq!(a.success_line(), b.success_line());
            assert_eq!(a.roast_line(), b.roast_line());
        }
    }
}
