use crate::hw::{Block, Register, RegisterAccess};
use core::ptr::{read_volatile, write_volatile};

/// Maps physical register windows into the caller's address space.
///
/// The mapping lifecycle belongs to the host environment; the driver only
/// asks for a window and hands it back on detach.
pub trait IoMapper {
    /// Map `len` bytes at physical address `phys`, returning the virtual base.
    fn map(&mut self, phys: usize, len: usize) -> Option<usize>;

    /// Release a window previously returned by [`IoMapper::map`].
    fn unmap(&mut self, virt: usize, len: usize);
}

/// Mapper for bare-metal targets running with physical = virtual addresses.
#[derive(Debug, Default, Copy, Clone)]
pub struct IdentityMapper;

impl IoMapper for IdentityMapper {
    fn map(&mut self, phys: usize, _len: usize) -> Option<usize> {
        Some(phys)
    }

    fn unmap(&mut self, _virt: usize, _len: usize) {}
}

/// Volatile memory-mapped access to the AUX and GPIO register blocks.
#[derive(Debug)]
pub struct MmioRegisters {
    aux: usize,
    gpio: usize,
}

impl MmioRegisters {
    /// Create register access over already-mapped windows.
    ///
    /// # Safety
    ///
    /// - `aux` and `gpio` must be the virtual bases of mapped AUX and GPIO
    ///   register windows, valid for the lifetime of this object
    /// - Memory must be mapped as device memory
    /// - Only one instance should drive the Mini UART at a time
    pub const unsafe fn new(aux: usize, gpio: usize) -> Self {
        Self { aux, gpio }
    }

    pub fn aux_base(&self) -> usize {
        self.aux
    }

    pub fn gpio_base(&self) -> usize {
        self.gpio
    }

    #[inline]
    fn addr(&self, reg: Register) -> usize {
        let base = match reg.block() {
            Block::Aux => self.aux,
            Block::Gpio => self.gpio,
        };
        base + reg.offset()
    }
}

impl RegisterAccess for MmioRegisters {
    #[inline]
    fn read32(&self, reg: Register) -> u32 {
        // SAFETY: `new` requires both windows to be mapped for our lifetime.
        unsafe { read_volatile(self.addr(reg) as *const u32) }
    }

    #[inline]
    fn write32(&self, reg: Register, value: u32) {
        // SAFETY: `new` requires both windows to be mapped for our lifetime.
        unsafe { write_volatile(self.addr(reg) as *mut u32, value) }
    }

    fn barrier(&self) {
        cfg_if::cfg_if! {
            if #[cfg(target_arch = "aarch64")] {
                // SAFETY: `dsb` only orders memory accesses.
                unsafe { core::arch::asm!("dsb sy", options(nostack, preserves_flags)) };
            } else {
                core::sync::atomic::fence(core::sync::atomic::Ordering::SeqCst);
            }
        }
    }
}

// SAFETY: MmioRegisters wraps memory-mapped hardware; callers serialize the
// register sequences that must not interleave.
unsafe impl Send for MmioRegisters {}
unsafe impl Sync for MmioRegisters {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accesses_land_at_block_offsets() {
        let mut aux = vec![0u32; 0x80 / 4];
        let mut gpio = vec![0u32; 0x100 / 4];
        let regs =
            unsafe { MmioRegisters::new(aux.as_mut_ptr() as usize, gpio.as_mut_ptr() as usize) };

        regs.write32(Register::MuBaud, 541);
        regs.write32(Register::GpPupPdn0, 0x4000_0000);
        regs.barrier();

        assert_eq!(regs.read32(Register::MuBaud), 541);
        assert_eq!(aux[0x68 / 4], 541);
        assert_eq!(gpio[0xE4 / 4], 0x4000_0000);
    }

    #[test]
    fn identity_mapper_returns_the_physical_address() {
        assert_eq!(IdentityMapper.map(0xFE21_5000, 0x6C), Some(0xFE21_5000));
    }
}
