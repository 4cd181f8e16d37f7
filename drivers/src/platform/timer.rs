//! Clock backed by the BCM system timer.
//!
//! The system timer is a 64-bit free-running counter at 1 MHz. Without a
//! scheduler there is nothing to hand the core to, so sleeping parks it with
//! `yield` between counter reads. Hosts that can deschedule should supply
//! their own [`Clock`].

use crate::hal::timer::Clock;
use core::ptr::read_volatile;

const CLO: usize = 0x04;
const CHI: usize = 0x08;

#[derive(Debug)]
pub struct SystemTimerClock {
    base: usize,
}

impl SystemTimerClock {
    /// # Safety
    ///
    /// `base` must be the mapped address of the system timer registers.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    fn read(&self, offset: usize) -> u32 {
        // SAFETY: `new` requires `base` to be mapped.
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    /// Read the 64-bit counter without tearing across a low-word wrap.
    fn counter(&self) -> u64 {
        let hi1 = self.read(CHI);
        let lo = self.read(CLO);
        let hi2 = self.read(CHI);

        let (hi, lo) = if hi1 != hi2 {
            (hi2, self.read(CLO))
        } else {
            (hi1, lo)
        };

        ((hi as u64) << 32) | (lo as u64)
    }

    /// Idle until `us` microseconds have passed, calling `idle` between reads.
    /// Returns how many times it idled.
    fn wait_for(&self, us: u64, mut idle: impl FnMut()) -> u64 {
        let start = self.counter();
        let mut idled = 0;
        while self.counter().wrapping_sub(start) < us {
            idle();
            idled += 1;
        }
        idled
    }
}

/// Give up the core until the next event or a short hardware-defined delay.
fn relax() {
    #[cfg(target_arch = "aarch64")]
    // SAFETY: `yield` is a hint with no architectural side effects.
    unsafe {
        core::arch::asm!("yield", options(nomem, nostack, preserves_flags));
    }
    #[cfg(not(target_arch = "aarch64"))]
    core::hint::spin_loop();
}

impl Clock for SystemTimerClock {
    fn now_us(&self) -> u64 {
        self.counter()
    }

    fn sleep_us(&self, min_us: u32, _max_us: u32) {
        self.wait_for(u64::from(min_us), relax);
    }

    fn settle(&self, mut cycles: u32) {
        while cycles != 0 {
            core::hint::spin_loop();
            cycles -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// CS, CLO and CHI of a timer whose low word sits at `lo`.
    fn registers(lo: u32, hi: u32) -> [u32; 3] {
        [0, lo, hi]
    }

    fn clock_over(regs: &mut [u32; 3]) -> SystemTimerClock {
        unsafe { SystemTimerClock::new(regs.as_mut_ptr() as usize) }
    }

    #[test]
    fn counter_joins_both_words() {
        let mut regs = registers(0x1234, 0x2);
        let clock = clock_over(&mut regs);
        assert_eq!(clock.now_us(), (2 << 32) | 0x1234);
    }

    #[test]
    fn wait_idles_until_the_counter_has_advanced() {
        let mut regs = registers(0xFFFF_FFF0, 0);
        let base = regs.as_mut_ptr();
        let (clo, chi) = unsafe { (base.add(1), base.add(2)) };
        let clock = unsafe { SystemTimerClock::new(base as usize) };

        // Each idle lets 5 µs pass, carrying into the high word.
        let idled = clock.wait_for(40, || unsafe {
            let lo = clo.read_volatile();
            let (lo, carry) = lo.overflowing_add(5);
            clo.write_volatile(lo);
            if carry {
                chi.write_volatile(chi.read_volatile() + 1);
            }
        });

        assert_eq!(idled, 8);
        assert_eq!(clock.now_us(), (1 << 32) | 0x18);
    }

    #[test]
    fn zero_wait_does_not_idle() {
        let mut regs = registers(7, 0);
        let clock = clock_over(&mut regs);
        assert_eq!(clock.wait_for(0, || panic!("idled")), 0);
    }
}
