//! Raw register map of the blocks the Mini UART driver touches.
//!
//! Nothing outside this module and the [`RegisterAccess`] implementations
//! knows register addresses; the rest of the driver names registers by
//! [`Register`].

pub mod aux;
pub mod gpio;

/// Register block a [`Register`] lives in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Block {
    Aux,
    Gpio,
}

/// Every 32-bit register the driver reads or writes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(usize)]
pub enum Register {
    /// Auxiliary interrupt status.
    AuxIrq,
    /// Auxiliary enables (bit 0 switches the Mini UART on).
    AuxEnables,
    /// Data I/O.
    MuIo,
    /// Interrupt enable.
    MuIer,
    /// Interrupt identify; writes clear the FIFOs.
    MuIir,
    /// Line control (data width).
    MuLcr,
    /// Modem control.
    MuMcr,
    /// Line status.
    MuLsr,
    /// Modem status.
    MuMsr,
    MuScratch,
    /// Extra control (TX/RX enable).
    MuCntl,
    /// Extra status (FIFO fill levels).
    MuStat,
    /// Baud divisor, 16 bits.
    MuBaud,
    /// Function select for GPIO 10-19.
    GpFsel1,
    /// Legacy pull-up/down control (BCM2835).
    GpPud,
    /// Legacy pull-up/down clock for GPIO 0-31 (BCM2835).
    GpPudClk0,
    /// Pull-up/down selection for GPIO 0-15 (BCM2711).
    GpPupPdn0,
}

impl Register {
    pub const COUNT: usize = Register::GpPupPdn0 as usize + 1;

    pub const ALL: [Register; Register::COUNT] = [
        Register::AuxIrq,
        Register::AuxEnables,
        Register::MuIo,
        Register::MuIer,
        Register::MuIir,
        Register::MuLcr,
        Register::MuMcr,
        Register::MuLsr,
        Register::MuMsr,
        Register::MuScratch,
        Register::MuCntl,
        Register::MuStat,
        Register::MuBaud,
        Register::GpFsel1,
        Register::GpPud,
        Register::GpPudClk0,
        Register::GpPupPdn0,
    ];

    pub const fn block(self) -> Block {
        match self {
            Register::GpFsel1 | Register::GpPud | Register::GpPudClk0 | Register::GpPupPdn0 => {
                Block::Gpio
            }
            _ => Block::Aux,
        }
    }

    /// Byte offset from the start of the register's block.
    pub const fn offset(self) -> usize {
        match self {
            Register::AuxIrq => 0x00,
            Register::AuxEnables => 0x04,
            Register::MuIo => 0x40,
            Register::MuIer => 0x44,
            Register::MuIir => 0x48,
            Register::MuLcr => 0x4C,
            Register::MuMcr => 0x50,
            Register::MuLsr => 0x54,
            Register::MuMsr => 0x58,
            Register::MuScratch => 0x5C,
            Register::MuCntl => 0x60,
            Register::MuStat => 0x64,
            Register::MuBaud => 0x68,
            Register::GpFsel1 => gpio::GPFSEL1,
            Register::GpPud => gpio::GPPUD,
            Register::GpPudClk0 => gpio::GPPUDCLK0,
            Register::GpPupPdn0 => gpio::GPPUPPDN0,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// 32-bit register access with an explicit write-ordering barrier.
///
/// Implementations must perform each access exactly once and in program
/// order. [`RegisterAccess::barrier`] guarantees that every earlier write has
/// reached the device before any later access.
pub trait RegisterAccess: Send + Sync {
    fn read32(&self, reg: Register) -> u32;

    fn write32(&self, reg: Register, value: u32);

    fn barrier(&self);

    /// Read-modify-write helper.
    fn modify32(&self, reg: Register, f: impl FnOnce(u32) -> u32)
    where
        Self: Sized,
    {
        let value = self.read32(reg);
        self.write32(reg, f(value));
    }
}
