use std::fmt;

use serde_json::Value;
use smallvec::SmallVec;
use tracing::debug;

use super::Entry;
use crate::error::{RelayError, Result};

/// Entries stored inline before the queue spills to the heap
///
/// Most pipelines are a handful of units plus a terminal responder.
pub const INLINE_QUEUE: usize = 8;

/// Inline storage for a materialized queue
pub type EntryVec = SmallVec<[Entry; INLINE_QUEUE]>;

/// Shapes a caller may hand to [`Queue::normalize`].
pub enum QueueSource {
    /// Finite, already-built sequence
    List(Vec<Entry>),
    /// One-shot lazy sequence, drained exactly once during normalization
    Lazy(Box<dyn Iterator<Item = Entry> + Send>),
    /// Loosely typed description, e.g. a `queue:` key read from a config file
    Described(Value),
}

impl QueueSource {
    /// Wrap any one-shot iterator
    pub fn lazy<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = Entry>,
        I::IntoIter: Send + 'static,
    {
        QueueSource::Lazy(Box::new(entries.into_iter()))
    }

    /// Defer building the entries until the queue is normalized
    ///
    /// `produce` runs once, when the source is drained.
    pub fn producer<F, I>(produce: F) -> Self
    where
        F: FnOnce() -> I + Send + 'static,
        I: IntoIterator<Item = Entry>,
        I::IntoIter: Send + 'static,
    {
        QueueSource::Lazy(Box::new(std::iter::once_with(produce).flatten()))
    }

    fn kind(&self) -> &'static str {
        match self {
            QueueSource::List(_) => "list",
            QueueSource::Lazy(_) => "lazy",
            QueueSource::Described(_) => "described",
        }
    }
}

impl fmt::Debug for QueueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueSource::List(entries) => f.debug_tuple("List").field(entries).finish(),
            QueueSource::Lazy(_) => f.write_str("Lazy(..)"),
            QueueSource::Described(value) => f.debug_tuple("Described").field(value).finish(),
        }
    }
}

impl From<Vec<Entry>> for QueueSource {
    fn from(entries: Vec<Entry>) -> Self {
        QueueSource::List(entries)
    }
}

impl<const N: usize> From<[Entry; N]> for QueueSource {
    fn from(entries: [Entry; N]) -> Self {
        QueueSource::List(entries.into())
    }
}

impl From<Value> for QueueSource {
    fn from(value: Value) -> Self {
        QueueSource::Described(value)
    }
}

/// Materialized, non-empty, immutable sequence of entries.
#[derive(Clone, Debug)]
pub struct Queue {
    entries: EntryVec,
}

impl Queue {
    /// Materialize `source` into a queue
    ///
    /// # Errors
    ///
    /// - [`RelayError::TypeMismatch`] when a described source is not an array
    /// - [`RelayError::EmptyQueue`] when the source yields no entries
    pub fn normalize(source: impl Into<QueueSource>) -> Result<Self> {
        let source = source.into();
        let kind = source.kind();

        let entries: EntryVec = match source {
            QueueSource::List(entries) => entries.into_iter().collect(),
            QueueSource::Lazy(entries) => entries.collect(),
            QueueSource::Described(Value::Array(items)) => {
                items.into_iter().map(described_entry).collect()
            }
            QueueSource::Described(other) => {
                return Err(RelayError::TypeMismatch {
                    found: json_kind(&other),
                });
            }
        };

        if entries.is_empty() {
            return Err(RelayError::EmptyQueue);
        }

        debug!(
            source = kind,
            entries = entries.len(),
            spilled = entries.spilled(),
            "Middleware queue normalized"
        );

        Ok(Queue { entries })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: normalization rejects empty sources
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Strings become identifiers; anything else keeps its JSON text and fails as
// an invalid entry once reached, without going through the resolver.
fn described_entry(item: Value) -> Entry {
    match item {
        Value::String(identifier) => Entry::Identifier(identifier),
        other => Entry::Invalid(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_described_string_is_type_mismatch() {
        let err = Queue::normalize(json!("bad")).unwrap_err();
        assert!(matches!(err, RelayError::TypeMismatch { found: "string" }));
    }

    #[test]
    fn test_described_object_is_type_mismatch() {
        let err = Queue::normalize(json!({ "queue": ["a"] })).unwrap_err();
        assert!(matches!(err, RelayError::TypeMismatch { found: "object" }));
    }

    #[test]
    fn test_empty_sources() {
        assert!(matches!(
            Queue::normalize(Vec::<Entry>::new()),
            Err(RelayError::EmptyQueue)
        ));
        assert!(matches!(
            Queue::normalize(QueueSource::lazy(std::iter::empty::<Entry>())),
            Err(RelayError::EmptyQueue)
        ));
        assert!(matches!(
            Queue::normalize(QueueSource::producer(Vec::<Entry>::new)),
            Err(RelayError::EmptyQueue)
        ));
        assert!(matches!(
            Queue::normalize(json!([])),
            Err(RelayError::EmptyQueue)
        ));
    }

    #[test]
    fn test_described_items_become_identifiers() {
        let queue = Queue::normalize(json!(["auth", 42, "responder"])).unwrap();
        let described: Vec<String> = queue.iter().map(Entry::describe).collect();
        assert_eq!(described, vec!["auth", "42", "responder"]);
        assert!(queue.get(0).unwrap().is_identifier());
        assert!(matches!(queue.get(1), Some(Entry::Invalid(repr)) if repr == "42"));
        assert!(queue.get(2).unwrap().is_identifier());
    }

    #[test]
    fn test_producer_runs_once_during_normalize() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let source = QueueSource::producer(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            vec![Entry::identifier("a"), Entry::identifier("b")]
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let queue = Queue::normalize(source).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_queue_spills_past_inline_capacity() {
        let entries: Vec<Entry> = (0..INLINE_QUEUE + 2)
            .map(|i| Entry::identifier(format!("mw{i}")))
            .collect();
        let queue = Queue::normalize(entries).unwrap();
        assert_eq!(queue.len(), INLINE_QUEUE + 2);
        assert_eq!(queue.get(INLINE_QUEUE + 1).unwrap().describe(), "mw9");
    }
}
