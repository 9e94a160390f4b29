//! Listener registry: live registrations in priority order
//!
//! The newest registration is checked first. The registry also owns the
//! derived tracked depth, the longest live sequence (never below 1).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::sequence::KeySequence;
use super::types::{KeyEvent, Platform};
use super::unfold::Reaction;

/// Default soft limit for the tracked depth before a warning is logged
pub const DEFAULT_DEPTH_WARNING: usize = 10;

/// Opaque caller-supplied token used to remove a group of registrations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WatchRef(u64);

impl WatchRef {
    /// Allocate a fresh token, distinct from every other allocated one
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        WatchRef(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Use a caller-chosen raw value, e.g. a component id
    pub const fn from_raw(raw: u64) -> Self {
        WatchRef(raw)
    }
}

impl Default for WatchRef {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity of a single registration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(u64);

/// A live (sequence, reaction, ref) entry
pub struct Registration {
    id: RegistrationId,
    sequence: KeySequence,
    reaction: Reaction,
    owner: Option<WatchRef>,
}

impl Registration {
    pub fn id(&self) -> RegistrationId {
        self.id
    }

    pub fn sequence(&self) -> &KeySequence {
        &self.sequence
    }

    pub fn key_count(&self) -> usize {
        self.sequence.key_count()
    }

    pub fn prevents_default(&self) -> bool {
        self.sequence.prevent_default()
    }

    pub fn owner(&self) -> Option<WatchRef> {
        self.owner
    }

    pub fn has_ref(&self, owner: WatchRef) -> bool {
        self.owner == Some(owner)
    }

    pub fn matches(&self, events: &[KeyEvent], platform: Platform) -> bool {
        self.sequence.matches(events, platform)
    }

    /// Invoke the reaction with the triggering event
    pub fn react(&self, event: &mut KeyEvent) {
        (self.reaction)(event, &self.sequence);
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("sequence", &self.sequence)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

/// All live registrations, newest first
#[derive(Debug)]
pub struct Registry {
    entries: Vec<Registration>,
    next_id: u64,
    max_depth: usize,
    depth_warning: usize,
}

impl Registry {
    pub fn new(depth_warning: usize) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            max_depth: 1,
            depth_warning,
        }
    }

    /// Register a sequence with top priority
    pub fn add(
        &mut self,
        sequence: KeySequence,
        reaction: Reaction,
        owner: Option<WatchRef>,
    ) -> RegistrationId {
        let id = RegistrationId(self.next_id);
        self.next_id += 1;

        let key_count = sequence.key_count();
        self.entries.insert(
            0,
            Registration {
                id,
                sequence,
                reaction,
                owner,
            },
        );

        let previous = self.max_depth;
        self.recompute_depth();
        if self.max_depth > previous && self.max_depth > self.depth_warning {
            tracing::warn!(
                "increasing tracked depth to {} for sequence {}",
                self.max_depth,
                self.entries[0].sequence
            );
        }
        tracing::debug!(?id, key_count, live = self.entries.len(), "registered sequence");
        id
    }

    /// Remove exactly one registration; returns false if it was already gone
    pub fn remove(&mut self, id: RegistrationId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|r| r.id != id);
        let removed = self.entries.len() != before;
        if removed {
            self.recompute_depth();
        }
        removed
    }

    /// Remove every registration tagged with `owner`, returning how many went
    pub fn remove_by_ref(&mut self, owner: WatchRef) -> usize {
        let before = self.entries.len();
        self.entries.retain(|r| !r.has_ref(owner));
        let removed = before - self.entries.len();
        self.recompute_depth();
        removed
    }

    /// Number of trailing events worth keeping
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn depth_warning(&self) -> usize {
        self.depth_warning
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registrations in priority order (newest first)
    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.entries.iter()
    }

    pub fn get(&self, id: RegistrationId) -> Option<&Registration> {
        self.entries.iter().find(|r| r.id == id)
    }

    fn recompute_depth(&mut self) {
        self.max_depth = self
            .entries
            .iter()
            .map(Registration::key_count)
            .max()
            .unwrap_or(1)
            .max(1);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH_WARNING)
    }
}
