use super::Device;
use crate::hal::timer::{Clock, PollStep};
use crate::hw::aux::FifoClear;
use crate::hw::{Register, RegisterAccess};
use log::info;

/// Issue the receive and transmit FIFO clear commands and give the hardware
/// time to complete them.
pub(crate) fn clear_fifos<R: RegisterAccess, C: Clock>(regs: &R, clock: &C, delay: PollStep) {
    regs.write32(Register::MuIir, FifoClear::RX.bits());
    regs.write32(Register::MuIir, FifoClear::TX.bits());
    clock.sleep_us(delay.min_us, delay.max_us);
}

impl<R: RegisterAccess, C: Clock> Device<R, C> {
    /// Discard everything queued in both FIFOs.
    ///
    /// Runs inside the configuration section so it never lands in the middle
    /// of a reprogramming sequence.
    pub fn clear_fifos(&self) {
        let _config = self.enter(&self.config);
        clear_fifos(&self.regs, &self.clock, self.options.fifo_clear_delay);
        info!("FIFOs cleared");
    }
}
