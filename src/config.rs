//! Platform constants for the scan-manager block and runtime knobs for the driver.
//!
//! | Register              | Offset |
//! |-----------------------|--------|
//! | Status                | 0x00   |
//! | Chain enable          | 0x04   |
//! | FIFO single byte      | 0x10   |
//! | FIFO double byte      | 0x14   |
//! | FIFO quad byte        | 0x1c   |

/// Scan manager base address on Cyclone V / Arria V SoC FPGAs
pub const SOCFPGA_SCANMGR_ADDRESS: usize = 0xfff0_2000;

pub const SCANMGR_STAT_ADDRESS: usize = 0x0;
pub const SCANMGR_EN_ADDRESS: usize = 0x4;
pub const SCANMGR_FIFOSINGLEBYTE_ADDRESS: usize = 0x10;
pub const SCANMGR_FIFODOUBLEBYTE_ADDRESS: usize = 0x14;
pub const SCANMGR_FIFOQUADBYTE_ADDRESS: usize = 0x1c;

/// Number of IO scan chains behind the engine
pub const NUM_OF_CHAINS: u32 = 4;

/// Shift and mask splitting a bit count into 128-bit packets and a residual
pub const IO_SCAN_CHAIN_128BIT_SHIFT: u32 = 7;
pub const IO_SCAN_CHAIN_128BIT_MASK: u32 = 0x7f;

/// Shift and mask splitting a bit count into 32-bit words and a residual
pub const IO_SCAN_CHAIN_32BIT_SHIFT: u32 = 5;
pub const IO_SCAN_CHAIN_32BIT_MASK: u32 = 0x1f;

pub const IO_SCAN_CHAIN_BYTE_MASK: u32 = 0xff;

/// Tails wider than this go out as one quad-byte write instead of byte-sized writes
pub const IO_SCAN_CHAIN_PAYLOAD_24BIT: u32 = 24;

/// Largest payload length field of a TDI/TDO header.  The field holds `length - 1`, so a packet
/// carries at most 128 bits.
pub const TDI_TDO_MAX_PAYLOAD: u32 = 127;

/// First header byte of a TDI/TDO packet programming an IO scan chain
pub const TDI_TDO_HEADER_FIRST_BYTE: u16 = 0x80;

/// Position of the length byte within the 16-bit header
pub const TDI_TDO_HEADER_SECOND_BYTE_SHIFT: u32 = 8;

/// Default polling budget when waiting for the engine to go idle
pub const MAX_WAITING_DELAY_IO_SCAN_ENGINE: u32 = 100;

/// Runtime configuration for `ScanManager`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanConfig {
    /// Status register reads allowed per idle wait before the engine is declared stuck
    pub max_poll_iterations: u32,
}

impl ScanConfig {
    pub const fn new() -> Self {
        Self {
            max_poll_iterations: MAX_WAITING_DELAY_IO_SCAN_ENGINE,
        }
    }

    pub const fn with_max_poll_iterations(mut self, max_poll_iterations: u32) -> Self {
        self.max_poll_iterations = max_poll_iterations;
        self
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_matches_engine_delay() {
        assert_eq!(ScanConfig::default().max_poll_iterations, 100);
        assert_eq!(
            ScanConfig::new().with_max_poll_iterations(7).max_poll_iterations,
            7
        );
    }

    #[test]
    fn masks_agree_with_shifts() {
        assert_eq!(IO_SCAN_CHAIN_128BIT_MASK, (1 << IO_SCAN_CHAIN_128BIT_SHIFT) - 1);
        assert_eq!(IO_SCAN_CHAIN_32BIT_MASK, (1 << IO_SCAN_CHAIN_32BIT_SHIFT) - 1);
        assert_eq!(TDI_TDO_MAX_PAYLOAD + 1, 1 << IO_SCAN_CHAIN_128BIT_SHIFT);
    }
}
