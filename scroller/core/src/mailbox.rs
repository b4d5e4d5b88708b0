//! Capacity-1 configuration handoff between submitters and the render loop.
//!
//! The slot never queues: while one update is pending, further submissions
//! are dropped and the submitter is told so. The render loop drains the slot
//! once per frame with [`ConfigMailbox::try_take`]. Neither side ever blocks
//! beyond the instant it takes to swap the slot.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::ScrollConfig;

/// Result of a [`ConfigMailbox::submit`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The configuration is now pending for the render loop.
    Accepted,
    /// An earlier update was still pending; this submission was discarded.
    Dropped,
}

impl SubmitOutcome {
    /// Whether the submission will be seen by the render loop.
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Single-slot mailbox carrying the latest configuration into the render
/// loop.
///
/// Clones share the same slot: hand one clone to the submission path and
/// one to the engine. This is the only state the two sides share.
#[derive(Clone, Debug, Default)]
pub struct ConfigMailbox {
    slot: Arc<Mutex<Option<ScrollConfig>>>,
}

impl ConfigMailbox {
    /// Create an empty mailbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deposit `config` unless an undelivered update is already pending.
    ///
    /// Never blocks and never queues: with an update pending, the new one is
    /// discarded and [`SubmitOutcome::Dropped`] reports that to the caller.
    pub fn submit(&self, config: ScrollConfig) -> SubmitOutcome {
        let mut slot = self.slot.lock();
        if slot.is_some() {
            return SubmitOutcome::Dropped;
        }
        *slot = Some(config);
        SubmitOutcome::Accepted
    }

    /// Take the pending configuration, if any, leaving the slot empty.
    /// Never blocks.
    pub fn try_take(&self) -> Option<ScrollConfig> {
        self.slot.lock().take()
    }
}
