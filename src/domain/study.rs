//! Flip-card study session over a single deck.
//!
//! Only tracks which card is shown and which side faces up. There is no
//! scoring and no scheduling.

use crate::domain::entities::{Card, CardFile};

/// Side of a card currently facing the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

#[derive(Debug, Clone)]
pub struct StudySession {
    deck: CardFile,
    position: usize,
    side: Side,
}

impl StudySession {
    pub fn new(deck: CardFile) -> Self {
        Self {
            deck,
            position: 0,
            side: Side::Front,
        }
    }

    pub fn deck_name(&self) -> &str {
        self.deck.name.as_str()
    }

    pub fn len(&self) -> usize {
        self.deck.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.cards.is_empty()
    }

    /// Zero-based index of the current card.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_flipped(&self) -> bool {
        self.side == Side::Back
    }

    pub fn current(&self) -> Option<&Card> {
        self.deck.cards.get(self.position)
    }

    /// Text on the side currently facing up.
    pub fn visible_text(&self) -> Option<&str> {
        self.current().map(|card| match self.side {
            Side::Front => card.front.as_str(),
            Side::Back => card.back.as_str(),
        })
    }

    pub fn flip(&mut self) {
        self.side = match self.side {
            Side::Front => Side::Back,
            Side::Back => Side::Front,
        };
    }

    /// Move to the next card. Returns false at the end of the deck.
    pub fn next(&mut self) -> bool {
        if self.position + 1 >= self.len() {
            return false;
        }
        self.position += 1;
        self.side = Side::Front;
        true
    }

    /// Move to the previous card. Returns false at the start of the deck.
    pub fn previous(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        self.side = Side::Front;
        true
    }
}
