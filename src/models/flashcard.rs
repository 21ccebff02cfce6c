//! Flashcard is a question/answer pair classified by category and difficulty,
//! plus the review state the study engine keeps for it.
use super::{Category, Difficulty, Rating};
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CardId = Uuid;

pub const MAX_CONFIDENCE: u8 = 4;
/// Minimum length, in characters, of the front and back text.
pub const MIN_TEXT_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: CardId,
    pub front: String,
    pub back: String,
    pub category: Category,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    /// 0 = unseen, 1 = hard, 2 = medium, 3 = easy, 4 = mastered
    #[serde(default)]
    pub confidence: u8,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated card content: everything an author controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardContent {
    pub front: String,
    pub back: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
}

/// Raw form input for creating or editing a card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCard {
    pub front: String,
    pub back: String,
    pub category: String,
    pub difficulty: String,
    pub tags: Vec<String>,
}

impl NewCard {
    pub fn new(
        front: impl Into<String>,
        back: impl Into<String>,
        category: impl Into<String>,
        difficulty: impl Into<String>,
    ) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            category: category.into(),
            difficulty: difficulty.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<CardContent, ValidationError> {
        let front = validate_text("front", &self.front)?;
        let back = validate_text("back", &self.back)?;
        let category = self.category.parse::<Category>()?;
        let difficulty = self.difficulty.parse::<Difficulty>()?;

        Ok(CardContent {
            front,
            back,
            category,
            difficulty,
            tags: normalize_tags(&self.tags),
        })
    }
}

impl From<&Flashcard> for NewCard {
    fn from(card: &Flashcard) -> Self {
        Self {
            front: card.front.clone(),
            back: card.back.clone(),
            category: card.category.to_string(),
            difficulty: card.difficulty.to_string(),
            tags: card.tags.clone(),
        }
    }
}

fn validate_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    if trimmed.chars().count() < MIN_TEXT_LEN {
        return Err(ValidationError::TooShort {
            field,
            min: MIN_TEXT_LEN,
        });
    }
    Ok(trimmed.to_string())
}

/// Trims tags, drops blanks and duplicates while keeping first-seen order.
fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

impl Flashcard {
    pub fn new(content: CardContent, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            front: content.front,
            back: content.back,
            category: content.category,
            difficulty: content.difficulty,
            tags: content.tags,
            confidence: 0,
            review_count: 0,
            correct_count: 0,
            last_reviewed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Commits one rating step. Only the card store calls this.
    pub(crate) fn record_rating(&mut self, rating: Rating, now: DateTime<Utc>) {
        self.confidence = rating.value();
        self.review_count += 1;
        if rating.is_correct() {
            self.correct_count += 1;
        }
        let now = self.touch(now);
        self.last_reviewed_at = Some(now);
    }

    /// Replaces author content; review state is left alone.
    pub(crate) fn replace_content(&mut self, content: CardContent, now: DateTime<Utc>) {
        self.front = content.front;
        self.back = content.back;
        self.category = content.category;
        self.difficulty = content.difficulty;
        self.tags = content.tags;
        self.touch(now);
    }

    // updated_at never moves backwards, even if the wall clock does
    fn touch(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.updated_at = now.max(self.updated_at);
        self.updated_at
    }

    pub fn is_reviewed(&self) -> bool {
        self.review_count > 0
    }

    pub fn is_mastered(&self) -> bool {
        self.confidence == MAX_CONFIDENCE
    }

    /// Share of correct ratings, or `None` for a card that was never rated.
    pub fn accuracy(&self) -> Option<f64> {
        if self.review_count == 0 {
            None
        } else {
            Some(f64::from(self.correct_count) / f64::from(self.review_count))
        }
    }

    pub fn confidence_label(&self) -> &'static str {
        match self.confidence {
            0 => "unseen",
            1 => "hard",
            2 => "medium",
            3 => "easy",
            _ => "mastered",
        }
    }

    /// Checks the review-state invariants of a card that came from outside
    /// the store (disk, import file). Content must also pass form validation.
    pub fn check_integrity(&self) -> Result<(), String> {
        if self.confidence > MAX_CONFIDENCE {
            return Err(format!(
                "card {} has confidence {} (max {})",
                self.id, self.confidence, MAX_CONFIDENCE
            ));
        }
        if self.correct_count > self.review_count {
            return Err(format!(
                "card {} has correct count {} above review count {}",
                self.id, self.correct_count, self.review_count
            ));
        }
        if self.review_count == 0 && self.confidence != 0 {
            return Err(format!("card {} has confidence but was never reviewed", self.id));
        }
        if self.review_count == 0 && self.last_reviewed_at.is_some() {
            return Err(format!("card {} has a review time but was never reviewed", self.id));
        }
        if self.updated_at < self.created_at {
            return Err(format!("card {} was updated before it was created", self.id));
        }
        NewCard::from(self)
            .validate()
            .map_err(|e| format!("card {}: {}", self.id, e))?;
        Ok(())
    }
}
