//! The native keyboard event source the watcher subscribes to

use super::types::EventKind;

/// Event kinds the watcher listens for
pub const LISTENED_KINDS: [EventKind; 2] = [EventKind::Down, EventKind::Up];

/// A platform keyboard event source
///
/// The watcher calls `add_listener` for every kind in [`LISTENED_KINDS`] when
/// the first shortcut is registered and `remove_listener` once the last one is
/// gone. The host is expected to forward events of those kinds to
/// [`Keywatch::handle_event`](super::Keywatch::handle_event) while listening.
pub trait EventSource {
    fn add_listener(&mut self, kind: EventKind);
    fn remove_listener(&mut self, kind: EventKind);
}

/// Source for hosts that always push events themselves
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedSource;

impl EventSource for DetachedSource {
    fn add_listener(&mut self, kind: EventKind) {
        tracing::trace!(listener = kind.listener_name(), "detached source: add listener");
    }

    fn remove_listener(&mut self, kind: EventKind) {
        tracing::trace!(listener = kind.listener_name(), "detached source: remove listener");
    }
}
