//! Routing of the Mini UART onto GPIO 14 (TXD1) and 15 (RXD1).

use super::Device;
use crate::hal::timer::Clock;
use crate::hw::gpio::{self, Function, Pull, PullScheme};
use crate::hw::{Register, RegisterAccess};

/// Select ALT5 on both pins, leave TX floating and pull RX up, then let the
/// pads settle.
pub(crate) fn configure_pins<R: RegisterAccess, C: Clock>(
    regs: &R,
    clock: &C,
    scheme: PullScheme,
    settle_cycles: u32,
) {
    let tx_shift = gpio::fsel_shift(gpio::TXD1_PIN);
    let rx_shift = gpio::fsel_shift(gpio::RXD1_PIN);
    regs.modify32(Register::GpFsel1, |val| {
        let val = val & !((0b111 << tx_shift) | (0b111 << rx_shift));
        val | ((Function::Alt5 as u32) << tx_shift) | ((Function::Alt5 as u32) << rx_shift)
    });

    let pulls = [(gpio::TXD1_PIN, Pull::None), (gpio::RXD1_PIN, Pull::Up)];

    match scheme {
        PullScheme::Direct => regs.modify32(Register::GpPupPdn0, |mut val| {
            for (pin, pull) in pulls {
                let shift = gpio::pup_pdn_shift(pin);
                val = (val & !(0b11 << shift)) | (pull.pup_pdn_bits() << shift);
            }
            val
        }),
        PullScheme::Clocked => {
            for (pin, pull) in pulls {
                regs.write32(Register::GpPud, pull.gppud_bits());
                clock.settle(settle_cycles);
                regs.write32(Register::GpPudClk0, 1 << pin);
                clock.settle(settle_cycles);
                regs.write32(Register::GpPud, 0);
                regs.write32(Register::GpPudClk0, 0);
            }
        }
    }

    clock.settle(settle_cycles);
}

impl<R: RegisterAccess, C: Clock> Device<R, C> {
    pub(super) fn configure_pins(&self) {
        configure_pins(
            &self.regs,
            &self.clock,
            self.options.pull_scheme,
            self.options.pin_settle_cycles,
        );
        self.set_state(super::DeviceState::PinsConfigured);
    }
}
