//! Study session state machine: reveal → rate → advance, one card at a time.
//!
//! The runner only holds card ids. Every step that needs a card resolves it
//! against the store again, so cards deleted mid-session are noticed and skipped.

use super::Session;
use crate::error::{SessionError, StaleCard, StoreError};
use crate::models::{CardId, Flashcard, Rating};
use crate::store::CardStore;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingReveal,
    AwaitingRating,
    /// Transient while a rating step moves the cursor; never observed between calls.
    Advancing,
    Completed,
}

/// Result of a rating step that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum RateOutcome {
    /// The rating was committed; the updated card.
    Rated(Flashcard),
    /// The card had been deleted; it was skipped without touching any statistics.
    Skipped(StaleCard),
}

/// Counts for one session, for the end-of-session screen.
///
/// Each position in the order counts at most once: `rated` is the number of
/// distinct cards rated, and `correct` follows the latest rating of each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub total: usize,
    pub rated: usize,
    pub correct: usize,
    pub skipped: usize,
}

pub struct SessionRunner {
    session: Session,
    cursor: usize,
    revealed: bool,
    state: SessionState,
    /// Latest rating per position in the order.
    ratings: HashMap<usize, Rating>,
    /// Positions whose card was found deleted. Navigation steps over them.
    skipped: HashSet<usize>,
}

impl SessionRunner {
    pub fn new(session: Session) -> Result<Self, SessionError> {
        if session.is_empty() {
            return Err(SessionError::EmptySet);
        }
        Ok(Self {
            session,
            cursor: 0,
            revealed: false,
            state: SessionState::AwaitingReveal,
            ratings: HashMap::new(),
            skipped: HashSet::new(),
        })
    }

    /// Builds a session over `cards` and starts running it.
    pub fn start<'a, I>(cards: I, seed: Option<u64>) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = &'a Flashcard>,
    {
        Self::new(Session::build(cards, seed)?)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            total: self.session.len(),
            rated: self.ratings.len(),
            correct: self.ratings.values().filter(|r| r.is_correct()).count(),
            skipped: self.skipped.len(),
        }
    }

    /// Fraction of the session passed: 0 at start, 1 once completed.
    pub fn progress(&self) -> f32 {
        if self.is_completed() {
            1.0
        } else {
            self.cursor as f32 / self.session.len() as f32
        }
    }

    pub fn current_id(&self) -> Option<CardId> {
        if self.is_completed() {
            return None;
        }
        self.session.order().get(self.cursor).copied()
    }

    /// Looks the current card up in the store. `None` once completed or when
    /// the card has been deleted.
    pub fn current_card<'s>(&self, store: &'s CardStore) -> Option<&'s Flashcard> {
        self.current_id().and_then(|id| store.find(id))
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.is_completed() {
            Err(SessionError::SessionClosed)
        } else {
            Ok(())
        }
    }

    /// Shows the back of the current card. Ignored if already revealed.
    pub fn reveal(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        if self.state == SessionState::AwaitingReveal {
            self.revealed = true;
            self.state = SessionState::AwaitingRating;
        }
        Ok(())
    }

    /// Rates the current card and moves on.
    ///
    /// A card deleted since the session started is skipped and reported as
    /// [`RateOutcome::Skipped`]. Persistence failures are returned as errors and
    /// leave the runner waiting for a rating on the same card.
    pub fn rate(&mut self, store: &mut CardStore, rating: Rating) -> Result<RateOutcome, SessionError> {
        self.ensure_open()?;
        if self.state != SessionState::AwaitingRating {
            return Err(SessionError::NotRevealed);
        }
        let id = self.session.order()[self.cursor];

        let outcome = match store.apply_rating(id, rating) {
            Ok(card) => {
                self.ratings.insert(self.cursor, rating);
                RateOutcome::Rated(card)
            }
            Err(StoreError::NotFound(_)) => RateOutcome::Skipped(self.mark_skipped(id)),
            Err(e) => return Err(e.into()),
        };

        self.state = SessionState::Advancing;
        self.advance();
        Ok(outcome)
    }

    /// Skips the current card if it no longer exists in the store.
    /// Returns the stale card when a skip happened.
    pub fn skip_stale(&mut self, store: &CardStore) -> Result<Option<StaleCard>, SessionError> {
        self.ensure_open()?;
        let id = self.session.order()[self.cursor];
        if store.find(id).is_some() {
            return Ok(None);
        }

        let stale = self.mark_skipped(id);
        self.state = SessionState::Advancing;
        self.advance();
        Ok(Some(stale))
    }

    /// Records the current position as skipped. A card deleted after being
    /// rated counts as skipped, not rated.
    fn mark_skipped(&mut self, id: CardId) -> StaleCard {
        warn!("Skipping card {} deleted during the session", id);
        self.skipped.insert(self.cursor);
        self.ratings.remove(&self.cursor);
        StaleCard { id }
    }

    /// First position after `from` that has not been skipped.
    fn next_open(&self, from: usize) -> Option<usize> {
        (from + 1..self.session.len()).find(|i| !self.skipped.contains(i))
    }

    /// Last position before `from` that has not been skipped.
    fn prev_open(&self, from: usize) -> Option<usize> {
        (0..from).rev().find(|i| !self.skipped.contains(i))
    }

    fn advance(&mut self) {
        self.revealed = false;
        match self.next_open(self.cursor) {
            Some(next) => {
                self.cursor = next;
                self.state = SessionState::AwaitingReveal;
            }
            None => {
                self.cursor = self.session.len();
                self.state = SessionState::Completed;
                debug!("Session completed: {:?}", self.summary());
            }
        }
    }

    /// Manual navigation back one card, without rating. Stops at the first
    /// card and steps over skipped ones.
    pub fn previous(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        if let Some(prev) = self.prev_open(self.cursor) {
            self.cursor = prev;
        }
        self.revealed = false;
        self.state = SessionState::AwaitingReveal;
        Ok(())
    }

    /// Manual navigation forward one card, without rating. Stops at the last
    /// card and steps over skipped ones.
    pub fn next(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        if let Some(next) = self.next_open(self.cursor) {
            self.cursor = next;
        }
        self.revealed = false;
        self.state = SessionState::AwaitingReveal;
        Ok(())
    }

    /// Abandons the remaining cards. Ratings already given stay committed.
    pub fn end(&mut self) -> SessionSummary {
        if !self.is_completed() {
            debug!(
                "Session ended early at card {} of {}",
                self.cursor + 1,
                self.session.len()
            );
            self.revealed = false;
            self.state = SessionState::Completed;
        }
        self.summary()
    }
}
