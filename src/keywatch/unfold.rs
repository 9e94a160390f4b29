//! Normalizes the accepted definition shapes into flat (sequence, reaction) pairs
//!
//! # Shapes
//!
//! - [`Definition::Provider`]: a callable producing another definition
//! - [`Definition::Map`]: key text to reaction, or to a nested map whose keys
//!   are prefixed with the outer key (`{"^": {"s": save}}` binds `^ s`)
//! - [`Definition::Spec`]: a single sequence, bound to the explicit handler
//! - [`Definition::Records`]: a list of `{keys, handler}` records
//!
//! Invalid records are dropped one by one; the rest of the batch survives.

use std::fmt;
use std::rc::Rc;

use super::error::{ParseError, RegistrationError};
use super::sequence::KeySequence;
use super::types::KeyEvent;

/// A user reaction, invoked with the triggering event and the matched sequence
pub type Reaction = Rc<dyn Fn(&mut KeyEvent, &KeySequence)>;

/// A deferred definition
pub type Provider = Rc<dyn Fn() -> Definition>;

/// Wrap a closure as a [`Reaction`]
pub fn reaction(f: impl Fn(&mut KeyEvent, &KeySequence) + 'static) -> Reaction {
    Rc::new(f)
}

/// The key part of a definition: text, separate key tokens, or a parsed sequence
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SequenceSpec {
    Text(String),
    Keys(Vec<String>),
    Parsed(KeySequence),
}

impl SequenceSpec {
    /// Parse into a sequence; an already parsed sequence is returned unchanged
    pub fn parse(&self) -> Result<KeySequence, ParseError> {
        match self {
            SequenceSpec::Text(text) => KeySequence::parse(text),
            SequenceSpec::Keys(keys) => KeySequence::parse_keys(keys),
            SequenceSpec::Parsed(sequence) => Ok(sequence.clone()),
        }
    }

    /// Source text used in diagnostics
    pub fn describe(&self) -> String {
        match self {
            SequenceSpec::Text(text) => text.clone(),
            SequenceSpec::Keys(keys) => keys.join(","),
            SequenceSpec::Parsed(sequence) => sequence.to_string(),
        }
    }
}

impl From<&str> for SequenceSpec {
    fn from(text: &str) -> Self {
        SequenceSpec::Text(text.to_string())
    }
}

impl From<String> for SequenceSpec {
    fn from(text: String) -> Self {
        SequenceSpec::Text(text)
    }
}

impl From<Vec<String>> for SequenceSpec {
    fn from(keys: Vec<String>) -> Self {
        SequenceSpec::Keys(keys)
    }
}

impl From<Vec<&str>> for SequenceSpec {
    fn from(keys: Vec<&str>) -> Self {
        SequenceSpec::Keys(keys.into_iter().map(str::to_string).collect())
    }
}

impl From<KeySequence> for SequenceSpec {
    fn from(sequence: KeySequence) -> Self {
        SequenceSpec::Parsed(sequence)
    }
}

/// One `{keys, handler}` entry of a batch
#[derive(Clone, Default)]
pub struct Record {
    pub keys: Option<SequenceSpec>,
    pub handler: Option<Reaction>,
}

impl Record {
    pub fn new(keys: impl Into<SequenceSpec>, handler: Reaction) -> Self {
        Self {
            keys: Some(keys.into()),
            handler: Some(handler),
        }
    }
}

/// An ordered map of key text to reactions or nested maps
#[derive(Clone, Default)]
pub struct ShortcutMap {
    entries: Vec<(String, MapEntry)>,
}

#[derive(Clone)]
pub enum MapEntry {
    Handler(Reaction),
    Nested(ShortcutMap),
}

impl ShortcutMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `keys` to a reaction (builder pattern)
    pub fn handler(mut self, keys: impl Into<String>, reaction: Reaction) -> Self {
        self.entries.push((keys.into(), MapEntry::Handler(reaction)));
        self
    }

    /// Nest a map under the `prefix` keys (builder pattern)
    pub fn nested(mut self, prefix: impl Into<String>, map: ShortcutMap) -> Self {
        self.entries.push((prefix.into(), MapEntry::Nested(map)));
        self
    }

    pub fn insert(&mut self, keys: impl Into<String>, entry: MapEntry) {
        self.entries.push((keys.into(), entry));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten into records in insertion order, joining nested keys with a space
    pub fn to_records(&self) -> Vec<Record> {
        let mut records = Vec::with_capacity(self.entries.len());
        self.flatten("", &mut records);
        records
    }

    fn flatten(&self, prefix: &str, out: &mut Vec<Record>) {
        for (keys, entry) in &self.entries {
            match entry {
                MapEntry::Handler(reaction) => out.push(Record {
                    keys: Some(SequenceSpec::Text(format!("{prefix}{keys}"))),
                    handler: Some(reaction.clone()),
                }),
                MapEntry::Nested(map) => map.flatten(&format!("{prefix}{keys} "), out),
            }
        }
    }
}

/// Every shape a shortcut definition may take
#[derive(Clone)]
pub enum Definition {
    Provider(Provider),
    Map(ShortcutMap),
    Spec(SequenceSpec),
    Records(Vec<Record>),
}

impl Definition {
    pub fn provider(f: impl Fn() -> Definition + 'static) -> Self {
        Definition::Provider(Rc::new(f))
    }
}

impl From<&str> for Definition {
    fn from(text: &str) -> Self {
        Definition::Spec(text.into())
    }
}

impl From<String> for Definition {
    fn from(text: String) -> Self {
        Definition::Spec(text.into())
    }
}

impl From<Vec<&str>> for Definition {
    fn from(keys: Vec<&str>) -> Self {
        Definition::Spec(keys.into())
    }
}

impl From<SequenceSpec> for Definition {
    fn from(spec: SequenceSpec) -> Self {
        Definition::Spec(spec)
    }
}

impl From<KeySequence> for Definition {
    fn from(sequence: KeySequence) -> Self {
        Definition::Spec(sequence.into())
    }
}

impl From<ShortcutMap> for Definition {
    fn from(map: ShortcutMap) -> Self {
        Definition::Map(map)
    }
}

impl From<Vec<Record>> for Definition {
    fn from(records: Vec<Record>) -> Self {
        Definition::Records(records)
    }
}

/// A parsed sequence paired with its reaction, ready for registration
#[derive(Clone)]
pub struct Binding {
    pub sequence: KeySequence,
    pub reaction: Reaction,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

/// Result of unfolding: the usable bindings and what was dropped
#[derive(Debug, Default)]
pub struct Unfolded {
    pub bindings: Vec<Binding>,
    pub dropped: Vec<RegistrationError>,
}

/// Unfold a definition, logging every dropped entry
pub fn unfold(definition: Definition, handler: Option<Reaction>) -> Vec<Binding> {
    let unfolded = unfold_with_diagnostics(definition, handler);
    for err in &unfolded.dropped {
        tracing::warn!("{}", err);
    }
    unfolded.bindings
}

/// Unfold a definition, returning the dropped entries instead of logging them
///
/// `handler` is used by [`Definition::Spec`] and as the fallback for records
/// that carry none; map entries always bring their own.
pub fn unfold_with_diagnostics(definition: Definition, handler: Option<Reaction>) -> Unfolded {
    match definition {
        Definition::Provider(provider) => unfold_with_diagnostics(provider(), handler),
        Definition::Map(map) => unfold_records(map.to_records(), None),
        Definition::Spec(spec) => unfold_records(
            vec![Record {
                keys: Some(spec),
                handler: None,
            }],
            handler,
        ),
        Definition::Records(records) => unfold_records(records, handler),
    }
}

fn unfold_records(records: Vec<Record>, fallback: Option<Reaction>) -> Unfolded {
    let mut unfolded = Unfolded::default();

    for (index, record) in records.into_iter().enumerate() {
        let Some(spec) = record.keys else {
            unfolded
                .dropped
                .push(RegistrationError::MissingKeys { index });
            continue;
        };
        let Some(reaction) = record.handler.or_else(|| fallback.clone()) else {
            unfolded.dropped.push(RegistrationError::MissingHandler {
                index,
                keys: spec.describe(),
            });
            continue;
        };

        match spec.parse() {
            Ok(sequence) => unfolded.bindings.push(Binding { sequence, reaction }),
            Err(source) => unfolded.dropped.push(RegistrationError::InvalidSequence {
                index,
                keys: spec.describe(),
                source,
            }),
        }
    }

    unfolded
}
