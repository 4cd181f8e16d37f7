//! Time source abstraction.
//!
//! Every wait in the driver goes through a [`Clock`]: bounded polling sleeps
//! between register reads, and pin setup performs one fixed settle delay.
//! Hosted tests substitute a clock whose time only moves when slept on.

/// Monotonic time plus the two kinds of delay the driver needs.
pub trait Clock: Send + Sync {
    /// Microseconds from an arbitrary fixed origin. Never decreases.
    fn now_us(&self) -> u64;

    /// Sleep for at least `min_us` and preferably no more than `max_us`.
    ///
    /// Used between polls of a status bit. Implementations with a scheduler
    /// should yield the core here.
    fn sleep_us(&self, min_us: u32, max_us: u32);

    /// Fixed, non-cancellable hardware settle delay of roughly `cycles` CPU
    /// cycles. This is electrical timing, not a poll.
    fn settle(&self, cycles: u32);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }

    fn sleep_us(&self, min_us: u32, max_us: u32) {
        (**self).sleep_us(min_us, max_us)
    }

    fn settle(&self, cycles: u32) {
        (**self).settle(cycles)
    }
}

/// Sleep bounds for one polling step, in microseconds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PollStep {
    pub min_us: u32,
    pub max_us: u32,
}

impl PollStep {
    pub const fn new(min_us: u32, max_us: u32) -> Self {
        Self { min_us, max_us }
    }
}

/// Poll `ready` until it reports true or `timeout_us` has elapsed.
///
/// The condition is checked before the first sleep and after every sleep, so
/// an already-satisfied condition costs no delay. Returns whether the
/// condition was met.
pub fn wait_until<C: Clock + ?Sized>(
    clock: &C,
    timeout_us: u64,
    step: PollStep,
    mut ready: impl FnMut() -> bool,
) -> bool {
    let start = clock.now_us();
    loop {
        if ready() {
            return true;
        }
        if clock.now_us().saturating_sub(start) >= timeout_us {
            return false;
        }
        clock.sleep_us(step.min_us, step.max_us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ManualClock;

    #[test]
    fn ready_condition_costs_no_sleep() {
        let clock = ManualClock::new();
        assert!(wait_until(&clock, 10_000, PollStep::new(1, 2), || true));
        assert_eq!(clock.sleeps(), 0);
    }

    #[test]
    fn gives_up_at_the_deadline() {
        let clock = ManualClock::new();
        assert!(!wait_until(&clock, 10_000, PollStep::new(1, 2), || false));
        assert_eq!(clock.now_us(), 10_000);
        assert_eq!(clock.sleeps(), 10_000);
    }

    #[test]
    fn stops_as_soon_as_condition_holds() {
        let clock = ManualClock::new();
        let mut polls = 0;
        let met = wait_until(&clock, 1_000_000, PollStep::new(1000, 1500), || {
            polls += 1;
            polls == 4
        });
        assert!(met);
        assert_eq!(clock.now_us(), 3000);
    }
}
