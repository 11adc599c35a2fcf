use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Zoom level: the time horizon a task belongs to, from the next few minutes
/// (`Actions`) out to `LifeGoals`.
///
/// Serialized as its integer (`0`..=`4`) so JSON views read `"tasks_by_level":
/// {"0": [...]}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Level {
    Actions,
    Today,
    Week,
    Quarter,
    LifeGoals,
}

impl Level {
    pub fn all() -> &'static [Level] {
        &[
            Level::Actions,
            Level::Today,
            Level::Week,
            Level::Quarter,
            Level::LifeGoals,
        ]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(n: u8) -> Option<Level> {
        Level::all().get(n as usize).copied()
    }

    /// Heading text used when scaffolding a new project file.
    pub fn heading(self) -> &'static str {
        match self {
            Level::Actions => "Level 0 Actions (Next 15 minutes)",
            Level::Today => "Level 1 Today",
            Level::Week => "Level 2 This Week",
            Level::Quarter => "Level 3 This Quarter",
            Level::LifeGoals => "Level 4 Life Goals",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Level::Actions => "actions",
            Level::Today => "today",
            Level::Week => "week",
            Level::Quarter => "quarter",
            Level::LifeGoals => "life goals",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.index()
    }
}

impl TryFrom<u8> for Level {
    type Error = crate::error::ZoomError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Level::from_index(n).ok_or_else(|| crate::error::ZoomError::InvalidLevel(n.to_string()))
    }
}

impl std::str::FromStr for Level {
    type Err = crate::error::ZoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            "0" | "actions" => Ok(Level::Actions),
            "1" | "today" => Ok(Level::Today),
            "2" | "week" => Ok(Level::Week),
            "3" | "quarter" => Ok(Level::Quarter),
            "4" | "life" | "life-goals" => Ok(Level::LifeGoals),
            _ => Err(crate::error::ZoomError::InvalidLevel(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips() {
        for level in Level::all() {
            assert_eq!(Level::from_index(level.index()), Some(*level));
        }
        assert_eq!(Level::from_index(5), None);
    }

    #[test]
    fn parse_from_digit_and_name() {
        assert_eq!("0".parse::<Level>().unwrap(), Level::Actions);
        assert_eq!("quarter".parse::<Level>().unwrap(), Level::Quarter);
        assert!("5".parse::<Level>().is_err());
        assert!("Level 2".parse::<Level>().is_err());
    }

    #[test]
    fn serializes_as_integer() {
        let json = serde_json::to_string(&Level::Week).unwrap();
        assert_eq!(json, "2");
        let back: Level = serde_json::from_str("4").unwrap();
        assert_eq!(back, Level::LifeGoals);
        assert!(serde_json::from_str::<Level>("9").is_err());
    }

    #[test]
    fn headings_carry_their_level_token() {
        for level in Level::all() {
            assert!(level.heading().starts_with(&format!("Level {}", level.index())));
        }
    }
}
