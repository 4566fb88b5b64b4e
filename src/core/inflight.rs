use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Tracks the newest outstanding request of one panel.
///
/// Starting a request invalidates every earlier ticket, so a reply that
/// arrives after a newer request was issued is dropped instead of
/// overwriting fresher data. Abandoned calls keep running; only their
/// results are ignored.
#[derive(Debug, Clone, Default)]
pub struct RequestSlot {
    inner: Arc<SlotState>,
}

#[derive(Debug, Default)]
struct SlotState {
    issued: AtomicU64,
    settled: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    id: u64,
}

impl RequestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        let id = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!("request {} started", id);
        Ticket { id }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.inner.issued.load(Ordering::SeqCst) == ticket.id
    }

    /// Hands back `value` only if `ticket` is still the newest request.
    pub fn settle<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        if !self.is_current(ticket) {
            tracing::debug!(
                "discarding stale reply for request {} (latest is {})",
                ticket.id,
                self.inner.issued.load(Ordering::SeqCst)
            );
            return None;
        }
        self.inner.settled.fetch_max(ticket.id, Ordering::SeqCst);
        Some(value)
    }

    /// True while the newest request has not been settled.
    pub fn is_loading(&self) -> bool {
        let issued = self.inner.issued.load(Ordering::SeqCst);
        issued > self.inner.settled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_request_wins() {
        let slot = RequestSlot::new();
        assert!(!slot.is_loading());

        let first = slot.begin();
        let second = slot.begin();
        assert!(slot.is_loading());

        assert_eq!(slot.settle(first, "stale"), None);
        assert!(slot.is_loading());
        assert_eq!(slot.settle(second, "fresh"), Some("fresh"));
        assert!(!slot.is_loading());
    }

    #[test]
    fn test_clones_share_state() {
        let slot = RequestSlot::new();
        let panel_view = slot.clone();
        let ticket = slot.begin();
        assert!(panel_view.is_current(ticket));
        panel_view.begin();
        assert!(!slot.is_current(ticket));
    }

    #[tokio::test]
    async fn test_out_of_order_completion() {
        let slot = RequestSlot::new();
        let slow = slot.begin();
        let fast = slot.begin();

        let slow_task = {
            let slot = slot.clone();
            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                slot.settle(slow, 1)
            })
        };
        let fast_task = {
            let slot = slot.clone();
            tokio::spawn(async move { slot.settle(fast, 2) })
        };

        assert_eq!(fast_task.await.unwrap(), Some(2));
        assert_eq!(slow_task.await.unwrap(), None);
    }
}
