use std::time::Duration;

/// Ticket for one scheduled tick.
///
/// Whoever drives the loop waits `delay()` and hands the token back to the
/// session; tokens issued before a cancel are refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken {
    generation: u64,
    delay: Duration,
}

impl TickToken {
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Fixed-delay, re-arming tick schedule with coarse cancellation.
///
/// At most one tick is pending at a time: the next one is armed only after
/// the current one has been accepted. The timer never sleeps itself, so it
/// works under any event loop.
#[derive(Debug)]
pub struct TickTimer {
    delay: Duration,
    generation: u64,
    pending: bool,
}

impl TickTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: false,
        }
    }

    pub fn arm(&mut self) -> TickToken {
        self.pending = true;
        TickToken {
            generation: self.generation,
            delay: self.delay,
        }
    }

    /// Consumes `token` if it is the one currently pending.
    pub fn accept(&mut self, token: TickToken) -> bool {
        if self.pending && token.generation == self.generation {
            self.pending = false;
            true
        } else {
            false
        }
    }

    /// Invalidates every token handed out so far.
    pub fn cancel(&mut self) {
        self.pending = false;
        self.generation += 1;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(10);

    #[test]
    fn test_armed_token_is_accepted_once() {
        let mut timer = TickTimer::new(DELAY);
        let token = timer.arm();
        assert_eq!(token.delay(), DELAY);
        assert!(timer.is_pending());
        assert!(timer.accept(token));
        assert!(!timer.is_pending());
        assert!(!timer.accept(token));
    }

    #[test]
    fn test_nothing_pending_before_arm() {
        let mut timer = TickTimer::new(DELAY);
        let stray = TickTimer::new(DELAY).arm();
        assert!(!timer.accept(stray));
    }

    #[test]
    fn test_cancel_rejects_outstanding_token() {
        let mut timer = TickTimer::new(DELAY);
        let token = timer.arm();
        timer.cancel();
        assert!(!timer.is_pending());
        assert!(!timer.accept(token));
    }

    #[test]
    fn test_token_from_before_cancel_rejected_after_rearm() {
        let mut timer = TickTimer::new(DELAY);
        let stale = timer.arm();
        timer.cancel();
        let fresh = timer.arm();
        assert!(!timer.accept(stale));
        assert!(timer.accept(fresh));
    }

    #[test]
    fn test_rearm_chain() {
        let mut timer = TickTimer::new(DELAY);
        let mut token = timer.arm();
        for _ in 0..5 {
            assert!(timer.accept(token));
            token = timer.arm();
        }
        assert!(timer.is_pending());
    }
}
