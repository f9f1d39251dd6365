//! Invite-use tracker
//!
//! Keeps the last observed use count per invite code so a join can be attributed
//! to the invite whose count went up. The table lives for the process lifetime and
//! is reseeded from the platform on start; nothing is persisted.
//!
//! Attribution is best-effort: two joins landing between one fetch and the next
//! can both be credited to whichever code comes first in the snapshot, and a
//! counter reset on the platform side is simply written through.

use std::collections::HashMap;

use crate::entities::InviteUse;

/// Code → last seen use count
#[derive(Debug, Default, Clone)]
pub struct InviteUseTracker {
    uses: HashMap<String, u64>,
}

impl InviteUseTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache with a fresh snapshot
    pub fn seed<I>(&mut self, snapshot: I)
    where
        I: IntoIterator<Item = InviteUse>,
    {
        self.uses = snapshot
            .into_iter()
            .map(|invite| (invite.code, invite.uses))
            .collect();
    }

    /// Return the first code whose count increased since the last observation.
    ///
    /// Every observed count is written into the cache whether or not a code is
    /// returned. Codes missing from `current` keep their cached count.
    pub fn diff(&mut self, current: &[InviteUse]) -> Option<String> {
        let mut used = None;

        for invite in current {
            let previous = self.uses.insert(invite.code.clone(), invite.uses);
            let increased = match previous {
                Some(previous) => invite.uses > previous,
                // An invite created and used before we saw it
                None => invite.uses > 0,
            };
            if increased && used.is_none() {
                used = Some(invite.code.clone());
            }
        }

        used
    }

    /// Drop a deleted invite
    pub fn forget(&mut self, code: &str) -> bool {
        self.uses.remove(code).is_some()
    }

    /// Last seen count for a code
    pub fn uses(&self, code: &str) -> Option<u64> {
        self.uses.get(code).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.uses.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.uses.is_empty()
    }
}
