//! Transition detection
//!
//! Pure comparison of a newly observed status against the last known one.

use crate::core::batch::ProcessingStatus;

/// How an observation relates to the previous state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Unchanged,
    /// First successful poll of a batch; not counted as a transition
    FirstObservation,
    Transition {
        from: ProcessingStatus,
        to: ProcessingStatus,
    },
}

/// Classified observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub change: Change,
    /// The batch just reached its terminal status
    pub terminal: bool,
}

pub fn has_changed(previous: &ProcessingStatus, current: &ProcessingStatus) -> bool {
    previous != current
}

pub fn is_terminal(current: &ProcessingStatus) -> bool {
    current.is_terminal()
}

/// Classify an observation.
///
/// `terminal` is only set when the batch enters its terminal status, so a batch that is
/// already known to have ended never triggers completion handling twice.
pub fn detect(previous: &ProcessingStatus, current: &ProcessingStatus) -> Observation {
    let change = if !has_changed(previous, current) {
        Change::Unchanged
    } else if *previous == ProcessingStatus::Unknown {
        Change::FirstObservation
    } else {
        Change::Transition {
            from: previous.clone(),
            to: current.clone(),
        }
    };

    Observation {
        change,
        terminal: is_terminal(current) && !is_terminal(previous),
    }
}
