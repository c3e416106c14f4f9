//! Level and badge tiers derived from a user's point total.

use serde::Serialize;

/// Points needed per level.
pub const POINTS_PER_LEVEL: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Badge {
    Beginner,
    Intermediate,
    Expert,
}

/// Badge tiers in award order with their point thresholds.
const BADGE_TIERS: &[(u32, Badge)] = &[
    (50, Badge::Beginner),
    (100, Badge::Intermediate),
    (200, Badge::Expert),
];

/// Level for a point total. Everyone starts at level 1.
pub fn level(points: u32) -> u32 {
    points / POINTS_PER_LEVEL + 1
}

/// All badges earned at `points`, lowest tier first.
pub fn badges(points: u32) -> Vec<Badge> {
    BADGE_TIERS
        .iter()
        .filter(|(threshold, _)| points >= *threshold)
        .map(|(_, badge)| *badge)
        .collect()
}
