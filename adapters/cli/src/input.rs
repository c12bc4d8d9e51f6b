//! Input sources driving the player without a keyboard.

use labyrinth_core::{Direction, InputSource, RandomSource, SeededRandom};
use thiserror::Error;

const IDLE_SYMBOL: char = '.';

/// Errors raised while parsing an input script.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// The script contained a symbol other than `N`, `S`, `E`, `W` or `.`.
    #[error("unknown input symbol '{symbol}' at position {position}")]
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// Zero-based character index in the script.
        position: usize,
    },
}

/// Replays one direction per frame from a script, then requests nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptedInput {
    directions: Vec<Direction>,
    cursor: usize,
}

impl ScriptedInput {
    /// Parses a script such as `"EEN..W"`. Whitespace is ignored.
    pub fn parse(script: &str) -> Result<Self, ScriptError> {
        let directions = script
            .chars()
            .enumerate()
            .filter(|(_, symbol)| !symbol.is_whitespace())
            .map(|(position, symbol)| match symbol.to_ascii_uppercase() {
                'N' => Ok(Direction::North),
                'S' => Ok(Direction::South),
                'E' => Ok(Direction::East),
                'W' => Ok(Direction::West),
                IDLE_SYMBOL => Ok(Direction::Invalid),
                _ => Err(ScriptError::UnknownSymbol { symbol, position }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            directions,
            cursor: 0,
        })
    }

    /// Number of frames the script still covers.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.directions.len().saturating_sub(self.cursor)
    }
}

impl InputSource for ScriptedInput {
    fn poll_requested_direction(&mut self) -> Direction {
        let direction = self
            .directions
            .get(self.cursor)
            .copied()
            .unwrap_or(Direction::Invalid);
        self.cursor = self.cursor.saturating_add(1).min(self.directions.len());
        direction
    }
}

/// Picks a random cardinal direction every few frames.
#[derive(Clone, Debug)]
pub struct Autopilot {
    random: SeededRandom,
    hold_frames: u32,
    countdown: u32,
}

impl Autopilot {
    /// Creates an autopilot changing its mind every `hold_frames` polls.
    #[must_use]
    pub fn new(seed: u64, hold_frames: u32) -> Self {
        Self {
            random: SeededRandom::new(seed),
            hold_frames: hold_frames.max(1),
            countdown: 0,
        }
    }
}

impl InputSource for Autopilot {
    fn poll_requested_direction(&mut self) -> Direction {
        if self.countdown > 0 {
            self.countdown -= 1;
            return Direction::Invalid;
        }
        self.countdown = self.hold_frames - 1;
        let upper = u32::try_from(Direction::CARDINALS.len()).unwrap_or(u32::MAX);
        usize::try_from(self.random.next_int(0, upper))
            .ok()
            .and_then(|index| Direction::CARDINALS.get(index).copied())
            .unwrap_or(Direction::Invalid)
    }
}

/// Input source selected on the command line.
#[derive(Clone, Debug)]
pub enum PlayerInput {
    /// Fixed script of directions.
    Scripted(ScriptedInput),
    /// Random wandering.
    Autopilot(Autopilot),
}

impl InputSource for PlayerInput {
    fn poll_requested_direction(&mut self) -> Direction {
        match self {
            Self::Scripted(input) => input.poll_requested_direction(),
            Self::Autopilot(input) => input.poll_requested_direction(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_is_replayed_then_idles() {
        let mut input = ScriptedInput::parse("e N\n.w").expect("valid script");
        assert_eq!(input.remaining(), 4);

        let polled: Vec<Direction> = (0..6)
            .map(|_| input.poll_requested_direction())
            .collect();

        assert_eq!(
            polled,
            vec![
                Direction::East,
                Direction::North,
                Direction::Invalid,
                Direction::West,
                Direction::Invalid,
                Direction::Invalid,
            ]
        );
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn unknown_symbols_are_reported_with_their_position() {
        assert_eq!(
            ScriptedInput::parse("NNx"),
            Err(ScriptError::UnknownSymbol {
                symbol: 'x',
                position: 2,
            })
        );
    }

    #[test]
    fn autopilot_only_requests_every_hold_period() {
        let mut input = Autopilot::new(3, 4);
        let polled: Vec<Direction> = (0..12)
            .map(|_| input.poll_requested_direction())
            .collect();

        for (frame, direction) in polled.iter().enumerate() {
            assert_eq!(direction.is_valid(), frame % 4 == 0, "frame {frame}");
        }
    }

    #[test]
    fn autopilot_draws_cover_every_cardinal() {
        let mut input = Autopilot::new(11, 1);
        let polled: Vec<Direction> = (0..256)
            .map(|_| input.poll_requested_direction())
            .collect();

        assert!(polled.iter().all(|direction| direction.is_valid()));
        for cardinal in Direction::CARDINALS {
            assert!(polled.contains(&cardinal), "{cardinal:?} never drawn");
        }
    }
}
