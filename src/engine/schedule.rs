use std::time::Duration;

struct Pending<E> {
    due: Duration,
    seq: u64,
    event: E,
}

/// Delayed events keyed by elapsed game time.
///
/// The schedule only advances when the owning world advances, so pausing the
/// loop freezes it and `clear` cancels everything in one call.
pub struct Schedule<E> {
    elapsed: Duration,
    next_seq: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Schedule<E> {
    pub fn new() -> Self {
        Self { elapsed: Duration::ZERO, next_seq: 0, pending: Vec::new() }
    }

    pub fn push_after(&mut self, delay: Duration, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending { due: self.elapsed + delay, seq, event });
    }

    /// Advances the clock by `dt` and returns every event now due, ordered
    /// by due time and then by insertion order.
    pub fn advance(&mut self, dt: Duration) -> Vec<E> {
        self.elapsed += dt;
        let now = self.elapsed;

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|p| (p.due, p.seq));
        due.into_iter().map(|p| p.event).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<E> Default for Schedule<E> {
    fn default() -> Self {
        Self::new()
    }
}
