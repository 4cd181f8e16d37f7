//! GPIO registers and encodings used to route the Mini UART to its pins.

/// Offset of the GPIO block from the peripheral base.
pub const GPIO_OFFSET: usize = 0x20_0000;
/// Bytes mapped for the GPIO block.
pub const GPIO_SPAN: usize = 0x1000;

pub const GPFSEL1: usize = 0x04;
pub const GPPUD: usize = 0x94;
pub const GPPUDCLK0: usize = 0x98;
pub const GPPUPPDN0: usize = 0xE4;

/// Mini UART transmit pin.
pub const TXD1_PIN: u8 = 14;
/// Mini UART receive pin.
pub const RXD1_PIN: u8 = 15;

/// GPIO function selection (3-bit field per pin).
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Function {
    Input = 0b000,
    Output = 0b001,
    Alt0 = 0b100,
    Alt1 = 0b101,
    Alt2 = 0b110,
    Alt3 = 0b111,
    Alt4 = 0b011,
    Alt5 = 0b010,
}

/// Platform-independent pull resistor request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pull {
    None,
    Up,
    Down,
}

impl Pull {
    /// Encoding for the BCM2711 `GPIO_PUP_PDN_CNTRL` registers.
    pub const fn pup_pdn_bits(self) -> u32 {
        match self {
            Pull::None => 0b00,
            Pull::Up => 0b01,
            Pull::Down => 0b10,
        }
    }

    /// Encoding for the BCM2835 `GPPUD` register.
    pub const fn gppud_bits(self) -> u32 {
        match self {
            Pull::None => 0b00,
            Pull::Down => 0b01,
            Pull::Up => 0b10,
        }
    }
}

/// How a SoC programs pull resistors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PullScheme {
    /// Direct 2-bit field per pin (`GPPUPPDN0..3`), BCM2711.
    Direct,
    /// Control value clocked into pins through `GPPUD`/`GPPUDCLK0`, BCM2835.
    Clocked,
}

/// Shift of `pin`'s function-select field within its `GPFSELn` register.
pub const fn fsel_shift(pin: u8) -> u32 {
    (pin as u32 % 10) * 3
}

/// Shift of `pin`'s pull field within its `GPPUPPDNn` register.
pub const fn pup_pdn_shift(pin: u8) -> u32 {
    (pin as u32 % 16) * 2
}
