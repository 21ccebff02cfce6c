//! Self-assessed recall quality given at the end of a rating step.
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Ratings 3 and above count as a correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rating {
    Hard = 1,
    Medium = 2,
    Easy = 3,
    Mastered = 4,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Hard, Rating::Medium, Rating::Easy, Rating::Mastered];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn is_correct(self) -> bool {
        self >= Rating::Easy
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Hard => "Hard",
            Rating::Medium => "Medium",
            Rating::Easy => "Easy",
            Rating::Mastered => "Mastered",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Rating::Hard),
            2 => Ok(Rating::Medium),
            3 => Ok(Rating::Easy),
            4 => Ok(Rating::Mastered),
            other => Err(ValidationError::InvalidRating(other)),
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_range() {
        assert!(Rating::try_from(0).is_err());
        assert_eq!(Rating::try_from(1), Ok(Rating::Hard));
        assert_eq!(Rating::try_from(4), Ok(Rating::Mastered));
        assert_eq!(Rating::try_from(5), Err(ValidationError::InvalidRating(5)));
    }

    #[test]
    fn test_correct_threshold() {
        assert!(!Rating::Hard.is_correct());
        assert!(!Rating::Medium.is_correct());
        assert!(Rating::Easy.is_correct());
        assert!(Rating::Mastered.is_correct());
    }
}
