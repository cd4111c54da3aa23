/// Quiet period after the last crop change before the crop is submitted.
pub const SETTLE_QUIET_MS: u32 = 600;

/// Identifies one arming of a [`Debounce`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Trailing-edge debounce keyed by tickets.
///
/// The caller schedules a timer for every ticket returned by [`Debounce::arm`];
/// only the latest ticket can release the pending value, so a burst of changes
/// collapses into a single [`Debounce::fire`] that yields `Some`.
#[derive(Debug)]
pub struct Debounce<T> {
    latest: u64,
    pending: Option<T>,
}

impl<T> Default for Debounce<T> {
    fn default() -> Self {
        Self {
            latest: 0,
            pending: None,
        }
    }
}

impl<T> Debounce<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, value: T) -> Ticket {
        self.latest += 1;
        self.pending = Some(value);
        Ticket(self.latest)
    }

    pub fn fire(&mut self, ticket: Ticket) -> Option<T> {
        if ticket.0 != self.latest {
            return None;
        }
        self.pending.take()
    }

    /// Drops the pending value; outstanding tickets become inert.
    pub fn disarm(&mut self) {
        self.latest += 1;
        self.pending = None;
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}
