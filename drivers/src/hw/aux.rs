//! Mini UART bit definitions inside the auxiliary peripheral block.

use bitflags::bitflags;

/// Offset of the auxiliary block from the peripheral base.
pub const AUX_OFFSET: usize = 0x21_5000;

/// Bytes covered by the Mini UART register window (`AUX_IRQ` .. `AUX_MU_BAUD`).
pub const AUX_SPAN: usize = 0x6C;

bitflags! {
    /// `AUX_ENABLES`.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct AuxEnables: u32 {
        const MINI_UART = 1 << 0;
        const SPI1 = 1 << 1;
        const SPI2 = 1 << 2;
    }
}

bitflags! {
    /// `AUX_MU_IIR` write side: FIFO clear commands.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct FifoClear: u32 {
        const RX = 1 << 1;
        const TX = 1 << 2;
    }
}

bitflags! {
    /// `AUX_MU_LSR`.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct LineStatus: u32 {
        /// Receive FIFO holds at least one byte.
        const DATA_READY = 1 << 0;
        /// Receive FIFO overflowed; cleared by reading this register.
        const RX_OVERRUN = 1 << 1;
        /// Transmit FIFO can accept at least one byte.
        const TX_EMPTY = 1 << 5;
        /// Transmit FIFO empty and transmitter idle.
        const TX_IDLE = 1 << 6;
    }
}

bitflags! {
    /// `AUX_MU_CNTL`.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct ExtraControl: u32 {
        const RX_ENABLE = 1 << 0;
        const TX_ENABLE = 1 << 1;
    }
}

bitflags! {
    /// `AUX_MU_STAT` flag bits. FIFO levels are separate fields, see
    /// [`tx_fifo_level`] and [`rx_fifo_level`].
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct ExtraStatus: u32 {
        const SYMBOL_AVAILABLE = 1 << 0;
        const SPACE_AVAILABLE = 1 << 1;
        const RX_IDLE = 1 << 2;
        const TX_IDLE = 1 << 3;
        const RX_OVERRUN = 1 << 4;
        const TX_FIFO_FULL = 1 << 5;
        const TX_EMPTY = 1 << 8;
        const TX_DONE = 1 << 9;
    }
}

/// `AUX_MU_LCR` data-size field.
pub const LCR_7_BIT: u32 = 0b00;
pub const LCR_8_BIT: u32 = 0b11;

const FIFO_LEVEL_MASK: u32 = 0xF;
pub const STAT_RX_LEVEL_SHIFT: u32 = 16;
pub const STAT_TX_LEVEL_SHIFT: u32 = 24;

pub const fn tx_fifo_level(stat: u32) -> u32 {
    (stat >> STAT_TX_LEVEL_SHIFT) & FIFO_LEVEL_MASK
}

pub const fn rx_fifo_level(stat: u32) -> u32 {
    (stat >> STAT_RX_LEVEL_SHIFT) & FIFO_LEVEL_MASK
}
