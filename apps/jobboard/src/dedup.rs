//! In-flight request registry.
//!
//! Side-effecting or expensive calls (recalculate, interview prep, apply) take a ticket
//! keyed by what they act on. A second caller for the same key is refused until the
//! first ticket is dropped. Plain reads do not take tickets.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::errors::ClientError;

#[derive(Debug, Clone, Default)]
pub struct InFlightRequests {
    keys: Arc<Mutex<HashSet<String>>>,
}

/// Proof that a keyed request is running. Dropping it releases the key.
#[derive(Debug)]
pub struct InFlightTicket {
    key: String,
    keys: Arc<Mutex<HashSet<String>>>,
}

impl InFlightRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when a request for `key` is already running.
    pub fn try_acquire(&self, key: impl Into<String>) -> Option<InFlightTicket> {
        let key = key.into();
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        if !keys.insert(key.clone()) {
            debug!("Request '{key}' already in flight");
            return None;
        }
        Some(InFlightTicket {
            key,
            keys: Arc::clone(&self.keys),
        })
    }

    /// Like `try_acquire`, but a duplicate is an error.
    pub fn acquire(&self, key: impl Into<String>) -> Result<InFlightTicket, ClientError> {
        let key = key.into();
        self.try_acquire(key.clone())
            .ok_or(ClientError::Duplicate(key))
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

impl InFlightTicket {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
