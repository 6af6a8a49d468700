// Generation-tagged request slots.
//
// Every outgoing backend request takes a fresh generation from its slot. A
// response is applied only if it carries the slot's current generation;
// anything older was superseded by a later request or an invalidation and is
// dropped. Requests are never cancelled.

use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Ready,
    Failed,
}

#[derive(Debug, Clone)]
pub struct RequestSlot<T> {
    /// Monotonically increasing; u64 will not wrap in practice.
    generation: u64,
    status: RequestStatus,
    value: Option<T>,
    error: Option<String>,
}

impl<T> Default for RequestSlot<T> {
    fn default() -> Self {
        RequestSlot {
            generation: 0,
            status: RequestStatus::Idle,
            value: None,
            error: None,
        }
    }
}

impl<T> RequestSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start a new request and return its generation.
    ///
    /// The previous value (if any) is kept so a failed follow-up does not
    /// wipe what is already on screen; call [`invalidate`](Self::invalidate)
    /// first when the old value must go.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.status = RequestStatus::Pending;
        self.error = None;
        self.generation
    }

    /// Discard the current value and orphan any in-flight request.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.status = RequestStatus::Idle;
        self.value = None;
        self.error = None;
    }

    /// Apply a response. Returns `false` (and changes nothing) when the
    /// response belongs to a superseded generation.
    pub fn resolve(&mut self, generation: u64, result: Result<T, String>) -> bool {
        if generation != self.generation || self.status != RequestStatus::Pending {
            debug!(
                "Discarding stale response (response gen: {}, current gen: {})",
                generation, self.generation
            );
            return false;
        }
        match result {
            Ok(value) => {
                self.value = Some(value);
                self.status = RequestStatus::Ready;
            }
            Err(message) => {
                self.error = Some(message);
                self.status = RequestStatus::Failed;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
