//! Request numbering for the stale-response guard
//!
//! Every search gets a monotonically increasing id. Only a response whose id
//! matches the most recently issued request may touch the visible list;
//! anything older is dropped on arrival. In-flight calls are never cancelled.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    issued: u64,
    /// The request whose answer we are still waiting for
    awaiting: Option<RequestId>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new request id, superseding every earlier one
    pub fn issue(&mut self) -> RequestId {
        self.issued += 1;
        let id = RequestId(self.issued);
        self.awaiting = Some(id);
        id
    }

    /// Whether `id` is the latest request and has not been answered yet
    pub fn is_current(&self, id: RequestId) -> bool {
        self.awaiting == Some(id)
    }

    /// Accept a response. Returns false for stale or already-answered ids.
    pub fn complete(&mut self, id: RequestId) -> bool {
        if self.is_current(id) {
            self.awaiting = None;
            true
        } else {
            false
        }
    }

    /// Forget the outstanding request so its answer is treated as stale
    pub fn invalidate(&mut self) {
        self.awaiting = None;
    }

    pub fn in_flight(&self) -> bool {
        self.awaiting.is_some()
    }

    pub fn issued_count(&self) -> u64 {
        self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_older_request_is_stale() {
        let mut seq = RequestSequencer::new();
        let first = seq.issue();
        let second = seq.issue();

        assert!(!seq.complete(first));
        assert!(seq.complete(second));
        assert!(!seq.in_flight());
    }

    #[test]
    fn test_response_accepted_once() {
        let mut seq = RequestSequencer::new();
        let id = seq.issue();
        assert!(seq.complete(id));
        assert!(!seq.complete(id));
    }

    #[test]
    fn test_invalidate_discards_outstanding() {
        let mut seq = RequestSequencer::new();
        let id = seq.issue();
        seq.invalidate();
        assert!(!seq.complete(id));
        assert_eq!(seq.issued_count(), 1);
    }
}
