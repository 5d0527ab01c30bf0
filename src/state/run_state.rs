//! Run state definitions for a single crawl invocation
//!
//! A run moves `Idle -> Running -> {Completed, BudgetExhausted}`. Both
//! terminal states are successful terminations.
use crate::SitewalkError;
use serde::Serialize;
use std::fmt;

/// Represents the lifecycle state of one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Created but not started
    Idle,

    /// Traversal in progress
    Running,

    /// The frontier emptied before the page budget ran out
    Completed,

    /// The page budget ran out while candidates were still pending
    BudgetExhausted,
}

/// Terminal outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlOutcome {
    Completed,
    BudgetExhausted,
}

impl RunState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::BudgetExhausted)
    }

    /// Checks whether `self -> next` is a legal transition
    pub fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::BudgetExhausted)
        )
    }

    /// Moves to `next`, rejecting illegal transitions
    pub fn transition(&mut self, next: RunState) -> Result<(), SitewalkError> {
        if !self.can_transition_to(next) {
            return Err(SitewalkError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }

    /// The outcome represented by a terminal state
    pub fn outcome(&self) -> Option<CrawlOutcome> {
        match self {
            Self::Completed => Some(CrawlOutcome::Completed),
            Self::BudgetExhausted => Some(CrawlOutcome::BudgetExhausted),
            Self::Idle | Self::Running => None,
        }
    }
}

impl From<CrawlOutcome> for RunState {
    fn from(outcome: CrawlOutcome) -> Self {
        match outcome {
            CrawlOutcome::Completed => Self::Completed,
            CrawlOutcome::BudgetExhausted => Self::BudgetExhausted,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::BudgetExhausted => "budget_exhausted",
        };
        f.write_str(name)
    }
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        RunState::from(*self).fmt(f)
    }
}
