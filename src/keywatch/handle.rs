//! Handles returned by registration: the disposer and the ref-scoped watcher

use super::keywatch::Keywatch;
use super::registry::{RegistrationId, WatchRef};
use super::unfold::{Definition, Reaction};

/// Removes exactly the registrations created by one `watch` call
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Disposer {
    ids: Vec<RegistrationId>,
}

impl Disposer {
    pub(super) fn new(ids: Vec<RegistrationId>) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &[RegistrationId] {
        &self.ids
    }

    /// Number of registrations this call produced
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Shorthand for [`Keywatch::dispose`]
    pub fn dispose(&self, watch: &mut Keywatch) -> usize {
        watch.dispose(self)
    }
}

/// Watcher view that tags every registration with one ref
pub struct Scope<'a> {
    watch: &'a mut Keywatch,
    owner: WatchRef,
}

impl<'a> Scope<'a> {
    pub(super) fn new(watch: &'a mut Keywatch, owner: WatchRef) -> Self {
        Self { watch, owner }
    }

    pub fn owner(&self) -> WatchRef {
        self.owner
    }

    pub fn watch(&mut self, definition: impl Into<Definition>, reaction: Option<Reaction>) -> Disposer {
        self.watch.watch_with(definition, reaction, Some(self.owner))
    }

    /// Remove everything registered under this scope's ref
    pub fn unwatch(&mut self) -> usize {
        self.watch.unwatch_all(self.owner)
    }
}
