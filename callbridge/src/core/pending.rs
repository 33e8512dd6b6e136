use callbridge_core::error::CallError;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::oneshot;

pub(crate) type Settle = oneshot::Sender<Result<Value, CallError>>;

/// Calls that were sent to the host and have not been answered yet.
///
/// Every operation is a single short critical section; callers settle the
/// returned continuation after the lock is released.
pub struct PendingCalls {
    calls: Mutex<HashMap<String, Settle>>,
}

impl Default for PendingCalls {
    fn default() -> Self {
        Self {
            calls: Default::default(),
        }
    }
}

impl PendingCalls {
    /// Hands the continuation back if `id` is already taken.
    pub(crate) fn register(&self, id: &str, settle: Settle) -> Result<(), Settle> {
        let mut calls = self.calls.lock();

        match calls.entry(id.to_string()) {
            Entry::Occupied(_) => Err(settle),
            Entry::Vacant(entry) => {
                entry.insert(settle);
                Ok(())
            }
        }
    }

    pub(crate) fn take(&self, id: &str) -> Option<Settle> {
        self.calls.lock().remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.calls.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.calls.lock().keys().cloned().collect()
    }
}
