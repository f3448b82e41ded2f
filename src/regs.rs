//! Access to the scan-manager register block.  The driver never touches memory directly; it goes
//! through a `RegisterFile`, so the same code runs against real hardware (`mmio::Mmio`) or an
//! in-memory engine (`sim::SimScanManager`).
pub mod mmio;
pub mod sim;

use crate::config::{
    SCANMGR_EN_ADDRESS, SCANMGR_FIFODOUBLEBYTE_ADDRESS, SCANMGR_FIFOQUADBYTE_ADDRESS,
    SCANMGR_FIFOSINGLEBYTE_ADDRESS, SCANMGR_STAT_ADDRESS,
};

/// Registers of the scan-manager block used by the IO scan-chain engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    /// Engine active flag and write FIFO occupancy
    Status,
    /// One bit per IO scan chain
    Enable,
    FifoSingleByte,
    FifoDoubleByte,
    FifoQuadByte,
}

impl Register {
    /// Byte offset of the register from the block's base address
    pub const fn offset(self) -> usize {
        match self {
            Register::Status => SCANMGR_STAT_ADDRESS,
            Register::Enable => SCANMGR_EN_ADDRESS,
            Register::FifoSingleByte => SCANMGR_FIFOSINGLEBYTE_ADDRESS,
            Register::FifoDoubleByte => SCANMGR_FIFODOUBLEBYTE_ADDRESS,
            Register::FifoQuadByte => SCANMGR_FIFOQUADBYTE_ADDRESS,
        }
    }
}

pub trait RegisterFile {
    /// Read the 32-bit value of `reg`.  Reading `Status` must return a fresh snapshot of the
    /// engine every time.
    fn read(&mut self, reg: Register) -> u32;
    /// Write a 32-bit value to `reg`.  Writes to a FIFO port enqueue the low 1, 2 or 4 bytes of
    /// `value` depending on the port.
    fn write(&mut self, reg: Register, value: u32);
}

impl<T: RegisterFile + ?Sized> RegisterFile for &mut T {
    fn read(&mut self, reg: Register) -> u32 {
        (**self).read(reg)
    }

    fn write(&mut self, reg: Register, value: u32) {
        (**self).write(reg, value)
    }
}
