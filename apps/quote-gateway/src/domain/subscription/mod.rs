//! Subscriber Registry
//!
//! Tracks the downstream streaming consumers currently attached to the quote
//! broadcaster.
//!
//! # Design
//!
//! Each attached consumer gets a sequence number (starting at 0, never
//! reused within one registry), a handle to its outbound sink, and a private
//! single-use completion signal. The registry is the only writer of that
//! signal: [`SubscriberRegistry::remove`] takes the entry out of the map
//! before writing, so a consumer is detached exactly once no matter how many
//! paths race to remove it.
//!
//! Snapshots returned by [`SubscriberRegistry::all`] are copies, so callers
//! can iterate and perform I/O without holding the registry lock.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::domain::streaming::StreamError;

// =============================================================================
// Types
// =============================================================================

/// Sequence number identifying one attached consumer.
pub type SequenceNumber = u64;

/// Outcome delivered to a consumer when it is detached.
pub type Completion = Result<(), StreamError>;

/// Single-use signal telling the registrant it has been detached.
pub type CompletionSender = oneshot::Sender<Completion>;

/// One attached consumer.
struct SubscriberEntry<S> {
    sink: S,
    completion: CompletionSender,
}

struct RegistryState<S> {
    next_sequence: SequenceNumber,
    entries: BTreeMap<SequenceNumber, SubscriberEntry<S>>,
}

// =============================================================================
// Subscriber Registry
// =============================================================================

/// Thread-safe set of attached consumers keyed by sequence number.
///
/// # Example
///
/// ```rust
/// use quote_gateway::domain::subscription::SubscriberRegistry;
/// use tokio::sync::oneshot;
///
/// let registry: SubscriberRegistry<&str> = SubscriberRegistry::new();
///
/// let (tx, mut rx) = oneshot::channel();
/// let seq = registry.add("client-a", tx);
/// assert!(registry.has_any());
///
/// registry.remove(seq, Ok(()));
/// assert!(!registry.has_any());
/// assert_eq!(rx.try_recv().unwrap(), Ok(()));
///
/// // Removing again is a no-op.
/// assert!(!registry.remove(seq, Ok(())));
/// ```
pub struct SubscriberRegistry<S> {
    state: Mutex<RegistryState<S>>,
}

impl<S> Default for SubscriberRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> std::fmt::Debug for SubscriberRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SubscriberRegistry")
            .field("next_sequence", &state.next_sequence)
            .field("subscribers", &state.entries.len())
            .finish()
    }
}

impl<S> SubscriberRegistry<S> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState {
                next_sequence: 0,
                entries: BTreeMap::new(),
            }),
        }
    }

    /// Register a consumer and return its sequence number.
    pub fn add(&self, sink: S, completion: CompletionSender) -> SequenceNumber {
        let mut state = self.state.lock();
        let seq = state.next_sequence;
        state.next_sequence += 1;
        state
            .entries
            .insert(seq, SubscriberEntry { sink, completion });
        seq
    }

    /// Detach a consumer, delivering `outcome` on its completion signal.
    ///
    /// Returns `false` (and does nothing) when `seq` is unknown or was
    /// already removed.
    pub fn remove(&self, seq: SequenceNumber, outcome: Completion) -> bool {
        let entry = self.state.lock().entries.remove(&seq);

        let Some(entry) = entry else {
            return false;
        };

        // The registrant may have stopped waiting; nothing to deliver then.
        let _ = entry.completion.send(outcome);
        true
    }

    /// Whether at least one consumer is attached.
    #[must_use]
    pub fn has_any(&self) -> bool {
        !self.state.lock().entries.is_empty()
    }

    /// Number of attached consumers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether no consumer is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_any()
    }

    /// Sequence numbers of all attached consumers.
    #[must_use]
    pub fn sequences(&self) -> Vec<SequenceNumber> {
        self.state.lock().entries.keys().copied().collect()
    }
}

impl<S: Clone> SubscriberRegistry<S> {
    /// Snapshot of every attached consumer's sink.
    ///
    /// The returned vector is a copy; later additions or removals do not
    /// affect it.
    #[must_use]
    pub fn all(&self) -> Vec<(SequenceNumber, S)> {
        self.state
            .lock()
            .entries
            .iter()
            .map(|(seq, entry)| (*seq, entry.sink.clone()))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
