//! Keywatch: the registry plus the trailing event buffer, driven one event
//! at a time

use crate::config::WatchConfig;

use super::handle::{Disposer, Scope};
use super::registry::{Registration, RegistrationId, Registry, WatchRef};
use super::sequence::KeySequence;
use super::source::{EventSource, LISTENED_KINDS};
use super::types::{EventKind, KeyEvent, Platform};
use super::unfold::{unfold, Definition, Reaction};

/// Watches a stream of keyboard events for registered shortcuts
pub struct Keywatch {
    registry: Registry,
    /// Most recent events, oldest first, never longer than the tracked depth
    buffer: Vec<KeyEvent>,
    platform: Platform,
    source: Box<dyn EventSource>,
    attached: bool,
}

impl Keywatch {
    pub fn new(config: &WatchConfig, source: impl EventSource + 'static) -> Self {
        Self {
            registry: Registry::new(config.depth_warning),
            buffer: Vec::new(),
            platform: config.effective_platform(),
            source: Box::new(source),
            attached: false,
        }
    }

    /// Create a watcher with the default configuration
    pub fn with_source(source: impl EventSource + 'static) -> Self {
        Self::new(&WatchConfig::default(), source)
    }

    /// Register a definition with a reaction
    pub fn watch(&mut self, definition: impl Into<Definition>, reaction: Reaction) -> Disposer {
        self.watch_with(definition, Some(reaction), None)
    }

    /// Register a definition that carries its own reactions (a map, records or
    /// a provider of those), tagged with `owner` for bulk removal
    pub fn watch_ref(&mut self, definition: impl Into<Definition>, owner: WatchRef) -> Disposer {
        self.watch_with(definition, None, Some(owner))
    }

    /// Register a definition; entries that fail to unfold are logged and skipped
    pub fn watch_with(
        &mut self,
        definition: impl Into<Definition>,
        reaction: Option<Reaction>,
        owner: Option<WatchRef>,
    ) -> Disposer {
        let ids = unfold(definition.into(), reaction)
            .into_iter()
            .map(|binding| self.watch_sequence(binding.sequence, binding.reaction, owner))
            .collect();
        Disposer::new(ids)
    }

    /// Register a single parsed sequence
    pub fn watch_sequence(
        &mut self,
        sequence: KeySequence,
        reaction: Reaction,
        owner: Option<WatchRef>,
    ) -> RegistrationId {
        let id = self.registry.add(sequence, reaction, owner);
        self.attach();
        id
    }

    /// Scoped handle whose registrations are all tagged with `owner`
    pub fn of(&mut self, owner: WatchRef) -> Scope<'_> {
        Scope::new(self, owner)
    }

    /// Remove one registration; false if it was already removed
    pub fn unwatch(&mut self, id: RegistrationId) -> bool {
        let removed = self.registry.remove(id);
        self.after_unwatch();
        removed
    }

    /// Remove every registration tagged with `owner`
    pub fn unwatch_all(&mut self, owner: WatchRef) -> usize {
        let removed = self.registry.remove_by_ref(owner);
        self.after_unwatch();
        removed
    }

    /// Remove the registrations created by one `watch` call
    ///
    /// Safe to call repeatedly; ids that are already gone are skipped.
    pub fn dispose(&mut self, disposer: &Disposer) -> usize {
        let mut removed = 0;
        for (idx, id) in disposer.ids().iter().enumerate() {
            if self.registry.remove(*id) {
                removed += 1;
            } else {
                tracing::trace!(idx, ?id, "registration already disposed");
            }
        }
        self.after_unwatch();
        removed
    }

    /// Process one keyboard event
    ///
    /// Matching registrations are invoked newest first. A reaction whose
    /// sequence prevents the default stops the scan, and so does an event whose
    /// default was already prevented. Any match clears the buffer.
    pub fn handle_event(&mut self, event: &mut KeyEvent) {
        let mut keys = self.buffer.clone();

        // A key-up replaces the key-down of the same key, so a tap is one entry
        if event.kind == EventKind::Up
            && keys
                .last()
                .is_some_and(|prev| prev.kind == EventKind::Down && prev.code == event.code)
        {
            keys.pop();
        }
        keys.push(event.clone());

        let mut matched = false;
        for registration in self.registry.iter() {
            if event.default_prevented() {
                break;
            }
            if registration.matches(&keys, self.platform) {
                matched = true;
                tracing::trace!(sequence = %registration.sequence(), "sequence matched");
                registration.react(event);

                if registration.prevents_default() {
                    event.prevent_default();
                    break;
                }
            }
        }

        if matched {
            self.buffer.clear();
            return;
        }

        // Modifier presses never occupy a slot in the window
        if event.is_modifier_key() {
            keys.pop();
        }

        let excess = keys.len().saturating_sub(self.registry.max_depth());
        if excess > 0 {
            tracing::trace!(excess, "trimming event buffer");
            keys.drain(..excess);
        }
        self.buffer = keys;
    }

    /// Forget all buffered events
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Buffered events, oldest first
    pub fn buffered(&self) -> &[KeyEvent] {
        &self.buffer
    }

    /// Number of trailing events kept for matching
    pub fn max_tracked_depth(&self) -> usize {
        self.registry.max_depth()
    }

    /// Whether the event source is currently being listened to
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Live registrations in priority order
    pub fn registrations(&self) -> impl Iterator<Item = &Registration> {
        self.registry.iter()
    }

    fn attach(&mut self) {
        if self.attached {
            return;
        }
        for kind in LISTENED_KINDS {
            self.source.add_listener(kind);
        }
        self.attached = true;
        tracing::debug!("attached to keyboard event source");
    }

    fn after_unwatch(&mut self) {
        if self.registry.is_empty() && self.attached {
            for kind in LISTENED_KINDS {
                self.source.remove_listener(kind);
            }
            self.attached = false;
            tracing::debug!("detached from keyboard event source");
        }
    }
}

impl std::fmt::Debug for Keywatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keywatch")
            .field("registry", &self.registry)
            .field("buffer", &self.buffer)
            .field("platform", &self.platform)
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::keywatch::source::DetachedSource;
    use crate::keywatch::types::Modifiers;
    use crate::keywatch::unfold::reaction;

    fn watcher() -> Keywatch {
        let config = WatchConfig {
            platform: Some(Platform::Unix),
            ..WatchConfig::default()
        };
        Keywatch::new(&config, DetachedSource)
    }

    fn recorder(log: &Rc<RefCell<Vec<String>>>, name: &str) -> Reaction {
        let log = log.clone();
        let name = name.to_string();
        reaction(move |_, _| log.borrow_mut().push(name.clone()))
    }

    fn tap(watch: &mut Keywatch, code: &str, key: &str) {
        watch.handle_event(&mut KeyEvent::down(code, key));
        watch.handle_event(&mut KeyEvent::up(code, key));
    }

    #[test]
    fn test_single_key_fires_on_tap() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut watch = watcher();
        watch.watch("a", recorder(&log, "a"));

        watch.handle_event(&mut KeyEvent::down("KeyA", "a"));
        assert!(log.borrow().is_empty());
        watch.handle_event(&mut KeyEvent::up("KeyA", "a"));
        assert_eq!(*log.borrow(), vec!["a"]);
        assert!(watch.buffered().is_empty());
    }

    #[test]
    fn test_down_up_pair_collapses_to_one_entry() {
        let mut watch = watcher();
        watch.watch("x,y,z", reaction(|_, _| {}));

        tap(&mut watch, "KeyA", "a");
        assert_eq!(watch.buffered().len(), 1);
        assert_eq!(watch.buffered()[0].kind, EventKind::Up);
    }

    #[test]
    fn test_sequence_with_modifier_keys_in_between() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut watch = watcher();
        watch.watch("ESC,w,+1,ENTER", recorder(&log, "save"));

        tap(&mut watch, "ESC", "Escape");
        tap(&mut watch, "KeyW", "w");
        watch.handle_event(&mut KeyEvent::down("ShiftLeft", "Shift").with_mods(Modifiers::SHIFT));
        watch.handle_event(&mut KeyEvent::down("Digit1", "1").with_mods(Modifiers::SHIFT));
        watch.handle_event(&mut KeyEvent::up("Digit1", "1").with_mods(Modifiers::SHIFT));
        watch.handle_event(&mut KeyEvent::up("ShiftLeft", "Shift"));
        assert!(log.borrow().is_empty());

        tap(&mut watch, "ENTER", "Enter");
        assert_eq!(*log.borrow(), vec!["save"]);
    }

    #[test]
    fn test_newest_registration_wins_when_preventing_default() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut watch = watcher();
        watch.watch("!^s", recorder(&log, "old"));
        watch.watch("!^s", recorder(&log, "new"));

        let mut event = KeyEvent::down("KeyS", "s").with_mods(Modifiers::CTRL);
        watch.handle_event(&mut event);

        assert!(event.default_prevented());
        assert_eq!(*log.borrow(), vec!["new"]);
    }

    #[test]
    fn test_all_matches_fire_without_prevent_default() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut watch = watcher();
        watch.watch("^s", recorder(&log, "first"));
        watch.watch("^s", recorder(&log, "second"));

        let mut event = KeyEvent::down("KeyS", "s").with_mods(Modifiers::CTRL);
        watch.handle_event(&mut event);

        assert!(!event.default_prevented());
        assert_eq!(*log.borrow(), vec!["second", "first"]);
    }

    #[test]
    fn test_reaction_preventing_default_stops_scan() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut watch = watcher();
        watch.watch("^s", recorder(&log, "old"));
        let inner = log.clone();
        watch.watch(
            "^s",
            reaction(move |event, _| {
                inner.borrow_mut().push("stopper".to_string());
                event.prevent_default();
            }),
        );

        watch.handle_event(&mut KeyEvent::down("KeyS", "s").with_mods(Modifiers::CTRL));
        assert_eq!(*log.borrow(), vec!["stopper"]);
    }

    #[test]
    fn test_buffer_is_trimmed_to_depth() {
        let mut watch = watcher();
        watch.watch("a,b,c", reaction(|_, _| {}));

        for (code, key) in [("KeyX", "x"), ("KeyY", "y"), ("KeyZ", "z"), ("KeyW", "w")] {
            tap(&mut watch, code, key);
            assert!(watch.buffered().len() <= watch.max_tracked_depth());
        }
        let keys: Vec<&str> = watch.buffered().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["y", "z", "w"]);
    }

    #[test]
    fn test_lone_modifier_is_dropped() {
        let mut watch = watcher();
        watch.watch("a,b", reaction(|_, _| {}));

        watch.handle_event(&mut KeyEvent::down("ControlLeft", "Control").with_mods(Modifiers::CTRL));
        assert!(watch.buffered().is_empty());
    }

    #[test]
    fn test_platform_restricted_sequence_is_skipped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut watch = watcher();
        watch.watch("onlymac ^s", recorder(&log, "mac"));
        watch.watch("onlyunix ^s", recorder(&log, "unix"));

        watch.handle_event(&mut KeyEvent::down("KeyS", "s").with_mods(Modifiers::CTRL));
        assert_eq!(*log.borrow(), vec!["unix"]);
    }

    #[test]
    fn test_reset_clears_pending() {
        let mut watch = watcher();
        watch.watch("a,b", reaction(|_, _| {}));
        tap(&mut watch, "KeyA", "a");
        assert_eq!(watch.buffered().len(), 1);

        watch.reset();
        assert!(watch.buffered().is_empty());
    }
}
