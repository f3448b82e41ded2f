//! Implement `RegisterFile` with volatile accesses to the memory-mapped scan-manager block
use core::ptr;

use crate::config::SOCFPGA_SCANMGR_ADDRESS;
use crate::regs::{Register, RegisterFile};

pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Create a register file for a scan manager mapped at `base`.
    ///
    /// # Safety
    /// `base` must be the address of a scan-manager register block mapped as device memory, and
    /// only one `Mmio` may exist for it at any given time.
    pub unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Create a register file for the scan manager at its fixed SoC FPGA address.
    ///
    /// # Safety
    /// See `Mmio::new`.
    pub unsafe fn socfpga() -> Self {
        Self::new(SOCFPGA_SCANMGR_ADDRESS)
    }

    pub fn base(&self) -> usize {
        self.base
    }

    fn addr(&self, reg: Register) -> *mut u32 {
        (self.base + reg.offset()) as *mut u32
    }
}

impl RegisterFile for Mmio {
    fn read(&mut self, reg: Register) -> u32 {
        // SAFETY: the constructor's contract makes every register offset a valid MMIO word
        unsafe { ptr::read_volatile(self.addr(reg)) }
    }

    fn write(&mut self, reg: Register, value: u32) {
        // SAFETY: as in `read`
        unsafe { ptr::write_volatile(self.addr(reg), value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volatile_accesses_hit_register_offsets() {
        // Back the "device" with plain memory covering offsets 0x00..=0x1c
        let mut block = [0u32; 8];
        let mut regs = unsafe { Mmio::new(block.as_mut_ptr() as usize) };

        regs.write(Register::Enable, 1 << 2);
        regs.write(Register::FifoQuadByte, 0xdead_beef);
        regs.write(Register::FifoDoubleByte, 0x7f80);
        regs.write(Register::FifoSingleByte, 0x0f);
        assert_eq!(regs.read(Register::Enable), 1 << 2);
        assert_eq!(regs.read(Register::Status), 0);

        assert_eq!(block[1], 1 << 2);
        assert_eq!(block[4], 0x0f);
        assert_eq!(block[5], 0x7f80);
        assert_eq!(block[7], 0xdead_beef);
    }

    #[test]
    fn socfpga_base() {
        let regs = unsafe { Mmio::socfpga() };
        assert_eq!(regs.base(), 0xfff0_2000);
    }
}
