//! Claim snapshot as returned by the claims system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::ClaimId;

/// Role tag of the player whose deadlines drive reconciliation
pub const MEDIATOR_ROLE: &str = "mediator";

/// An action a player can take on a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Deadline for the action; `None` when the claims system sent none
    pub due_date: Option<DateTime<Utc>>,
    /// Whether the action must be taken before the deadline
    pub mandatory: bool,
}

impl Action {
    pub fn new(due_date: DateTime<Utc>, mandatory: bool) -> Self {
        Self {
            due_date: Some(due_date),
            mandatory,
        }
    }

    /// An action without a deadline
    pub fn undated(mandatory: bool) -> Self {
        Self {
            due_date: None,
            mandatory,
        }
    }

    /// A mandatory action whose deadline lies strictly before `now`
    ///
    /// A mandatory action without a deadline counts as lapsed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.mandatory && self.due_date.map_or(true, |due| due < now)
    }
}

/// A participant in the claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Role tag (e.g. "mediator", "complainant", "respondent")
    pub role: String,
    /// Actions currently available to this player
    pub actions: Vec<Action>,
}

impl Player {
    pub fn new(role: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            role: role.into(),
            actions,
        }
    }

    /// Role matching is exact and case-sensitive
    pub fn is_mediator(&self) -> bool {
        self.role == MEDIATOR_ROLE
    }
}

/// Read-only snapshot of a claim, fetched fresh for each reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Identifier in the claims system
    pub id: ClaimId,
    /// Players and their available actions
    pub players: Vec<Player>,
}

impl Claim {
    pub fn new(id: ClaimId, players: Vec<Player>) -> Self {
        Self { id, players }
    }

    /// Every player holding the mediator role
    pub fn mediators(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_mediator())
    }
}
