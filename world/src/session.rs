//! Per-session counters owned by the world.

use labyrinth_core::ActorKind;

const BASE_SPEED_MULTIPLIER: f32 = 1.0;
const SPEED_MULTIPLIER_PER_COIN: f32 = 0.5;

/// Progress of the running session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    coins_collected: u32,
    speed_multiplier: f32,
    outcome: Option<GameOutcome>,
}

impl SessionState {
    pub(crate) const fn new() -> Self {
        Self {
            coins_collected: 0,
            speed_multiplier: BASE_SPEED_MULTIPLIER,
            outcome: None,
        }
    }

    /// Coins the player collected during the session.
    #[must_use]
    pub const fn coins_collected(&self) -> u32 {
        self.coins_collected
    }

    /// Factor applied to enemy speeds.
    #[must_use]
    pub const fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Final outcome, or `None` while the session is running.
    #[must_use]
    pub const fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Reports whether an enemy already caught the player.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Credits one coin and speeds enemies up, returning the new total.
    pub(crate) fn collect_coin(&mut self) -> u32 {
        self.coins_collected = self.coins_collected.saturating_add(1);
        self.set_speed_multiplier(self.speed_multiplier + SPEED_MULTIPLIER_PER_COIN);
        self.coins_collected
    }

    /// Negative or non-finite multipliers fall back to the base value.
    pub(crate) fn set_speed_multiplier(&mut self, value: f32) {
        self.speed_multiplier = if value.is_finite() && value >= 0.0 {
            value
        } else {
            BASE_SPEED_MULTIPLIER
        };
    }

    pub(crate) fn reset_coins(&mut self) {
        self.coins_collected = 0;
    }

    pub(crate) fn finish(&mut self, caught_by: ActorKind) -> GameOutcome {
        let outcome = GameOutcome {
            caught_by,
            coins_collected: self.coins_collected,
        };
        self.outcome = Some(outcome);
        outcome
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// How a finished session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOutcome {
    caught_by: ActorKind,
    coins_collected: u32,
}

impl GameOutcome {
    /// Enemy kind that caught the player.
    #[must_use]
    pub const fn caught_by(&self) -> ActorKind {
        self.caught_by
    }

    /// Coins credited to the player at the end of the session.
    #[must_use]
    pub const fn coins_collected(&self) -> u32 {
        self.coins_collected
    }
}
