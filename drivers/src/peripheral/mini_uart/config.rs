use super::baud::compute_divisor;
use super::fifo::clear_fifos;
use super::{Device, DeviceState};
use crate::hal::serial::{BaudRate, DataBits, DeviceConfig, UartError};
use crate::hal::timer::Clock;
use crate::hw::aux::{self, AuxEnables, ExtraControl};
use crate::hw::{Register, RegisterAccess};
use log::{error, info};

fn lcr_bits(bits: DataBits) -> u32 {
    match bits {
        DataBits::Seven => aux::LCR_7_BIT,
        DataBits::Eight => aux::LCR_8_BIT,
    }
}

impl<R: RegisterAccess, C: Clock> Device<R, C> {
    /// One-time bring-up: switch the Mini UART on, poll-only, no flow
    /// control, then program the stored configuration.
    pub(super) fn init_hardware(&self) -> Result<(), UartError> {
        let config = self.enter(&self.config);
        let divisor = compute_divisor(config.baud_rate.bps(), config.system_clock_hz)
            .inspect_err(|err| error!("Invalid baud rate {}: {err}", config.baud_rate))?;

        self.regs
            .modify32(Register::AuxEnables, |val| val | AuxEnables::MINI_UART.bits());
        self.regs.write32(Register::MuCntl, 0);
        self.regs.write32(Register::MuIer, 0);
        clear_fifos(&self.regs, &self.clock, self.options.fifo_clear_delay);
        self.regs.write32(Register::MuLcr, lcr_bits(config.data_bits));
        self.regs.write32(Register::MuMcr, 0);
        self.regs.write32(Register::MuBaud, u32::from(divisor));
        self.regs.write32(
            Register::MuCntl,
            (ExtraControl::RX_ENABLE | ExtraControl::TX_ENABLE).bits(),
        );
        self.regs.barrier();
        self.set_state(DeviceState::Running);

        info!(
            "Mini UART initialized: baud={}, data_bits={}",
            config.baud_rate,
            config.data_bits.count()
        );
        Ok(())
    }

    /// Program `new` into the device.
    ///
    /// On error nothing is written and the previous configuration stays in
    /// effect.
    pub fn apply_config(&self, new: DeviceConfig) -> Result<(), UartError> {
        self.update_config(|_| new).map(|_| ())
    }

    pub fn set_baud_rate(&self, baud_rate: BaudRate) -> Result<DeviceConfig, UartError> {
        self.update_config(|config| config.with_baud_rate(baud_rate))
    }

    pub fn set_data_bits(&self, data_bits: DataBits) -> Result<DeviceConfig, UartError> {
        self.update_config(|config| config.with_data_bits(data_bits))
    }

    /// Derive a configuration from the current one and program it, all inside
    /// the configuration section. Returns the configuration now in effect.
    pub fn update_config(
        &self,
        f: impl FnOnce(DeviceConfig) -> DeviceConfig,
    ) -> Result<DeviceConfig, UartError> {
        let mut current = self.enter(&self.config);
        let next = f(*current);
        let divisor = compute_divisor(next.baud_rate.bps(), next.system_clock_hz)
            .inspect_err(|err| error!("Rejected configuration {next:?}: {err}"))?;

        self.set_state(DeviceState::Reconfiguring);

        self.regs.write32(Register::MuCntl, 0);
        clear_fifos(&self.regs, &self.clock, self.options.fifo_clear_delay);
        self.regs.write32(Register::MuLcr, lcr_bits(next.data_bits));
        self.regs.write32(Register::MuBaud, u32::from(divisor));
        self.regs.write32(
            Register::MuCntl,
            (ExtraControl::RX_ENABLE | ExtraControl::TX_ENABLE).bits(),
        );
        self.regs.barrier();

        *current = next;
        self.set_state(DeviceState::Running);
        drop(current);

        info!(
            "UART reconfigured: baud={}, data_bits={}",
            next.baud_rate,
            next.data_bits.count()
        );
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peripheral::mini_uart::tests::sim_device;
    use crate::peripheral::mini_uart::DriverOptions;
    use crate::sim::{Access, ManualClock, SimRegisters};

    #[test]
    fn init_sequence_enables_uart_last() {
        let clock = ManualClock::new();
        let regs = SimRegisters::new();
        regs.preset(Register::AuxEnables, AuxEnables::SPI1.bits());
        let device = Device::new(
            regs,
            &clock,
            DeviceConfig::new(BaudRate::B115200, DataBits::Seven, 500_000_000),
            DriverOptions::default(),
        )
        .unwrap();

        let aux_writes: Vec<Access> = device
            .registers()
            .log()
            .into_iter()
            .filter(|access| match access {
                Access::Write(reg, _) => reg.block() == crate::hw::Block::Aux,
                Access::Barrier => true,
                Access::Settle(_) => false,
            })
            .collect();

        assert_eq!(
            aux_writes,
            vec![
                Access::Write(Register::AuxEnables, 0b11),
                Access::Write(Register::MuCntl, 0),
                Access::Write(Register::MuIer, 0),
                Access::Write(Register::MuIir, 0x02),
                Access::Write(Register::MuIir, 0x04),
                Access::Write(Register::MuLcr, aux::LCR_7_BIT),
                Access::Write(Register::MuMcr, 0),
                Access::Write(Register::MuBaud, 541),
                Access::Write(Register::MuCntl, 0b11),
                Access::Barrier,
            ]
        );
    }

    #[test]
    fn reconfiguration_disables_then_reenables_behind_a_barrier() {
        let clock = ManualClock::new();
        let device = sim_device(&clock);

        let config = device.set_baud_rate(BaudRate::B115200).unwrap();
        assert_eq!(config.baud_rate, BaudRate::B115200);
        assert_eq!(device.config(), config);
        assert_eq!(device.state(), DeviceState::Running);

        assert_eq!(
            device.registers().log(),
            vec![
                Access::Write(Register::MuCntl, 0),
                Access::Write(Register::MuIir, 0x02),
                Access::Write(Register::MuIir, 0x04),
                Access::Write(Register::MuLcr, aux::LCR_8_BIT),
                Access::Write(Register::MuBaud, 541),
                Access::Write(Register::MuCntl, 0b11),
                Access::Barrier,
            ]
        );
    }

    #[test]
    fn data_width_change_keeps_the_baud_rate() {
        let clock = ManualClock::new();
        let device = sim_device(&clock);
        device.set_data_bits(DataBits::Seven).unwrap();

        let config = device.config();
        assert_eq!(config.data_bits, DataBits::Seven);
        assert_eq!(config.baud_rate, BaudRate::B9600);
        assert_eq!(device.registers().value(Register::MuLcr), aux::LCR_7_BIT);
        assert_eq!(device.registers().value(Register::MuBaud), 6509);
    }

    #[test]
    fn failed_apply_leaves_device_untouched() {
        let clock = ManualClock::new();
        let device = sim_device(&clock);
        device.set_baud_rate(BaudRate::B57600).unwrap();
        device.registers().clear_log();
        let before = device.config();

        let slow_clock = DeviceConfig::new(BaudRate::B115200, DataBits::Seven, 100_000);
        assert_eq!(
            device.apply_config(slow_clock),
            Err(UartError::InvalidBaudRate)
        );
        assert_eq!(
            device.update_config(|config| DeviceConfig {
                system_clock_hz: 0,
                ..config
            }),
            Err(UartError::InvalidBaudRate)
        );

        assert_eq!(device.config(), before);
        assert!(device.registers().log().is_empty());
        assert_eq!(device.state(), DeviceState::Running);
    }
}
