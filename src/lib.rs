//! This crate drives the IO scan-chain engine of an SoC scan manager.  The engine shifts
//! configuration bits into one of four IO scan chains, fed through a memory-mapped write FIFO
//! and framed as TDI/TDO packets.
//!
//! At the lowest level is the `RegisterFile` trait, which reads and writes the 32-bit registers
//! of the scan-manager block.  `Mmio` implements it with volatile accesses at a physical base
//! address, and `SimScanManager` implements it in memory so the driver can be exercised without
//! hardware.
//!
//! On top of that, the `status` module polls the engine's status register until the engine is
//! idle, bounded by an iteration budget.  The `packet` module splits a chain of any bit length
//! into TDI/TDO packets of at most 128 bits and picks the FIFO port used for every write.
//!
//! `ScanManager` ties these together: it selects a chain, streams the packets through the FIFO,
//! and waits for the engine between packets.
//!
//! # Example
//! ```
//! use scan_manager::chain::{ScanChain, ScanManager};
//! use scan_manager::regs::sim::SimScanManager;
//!
//! let mut mgr = ScanManager::new(SimScanManager::new());
//! let table = [0x1122_3344, 0x5566_7788, 0x99aa_bbcc, 0xddee_ff00, 0x0bad_f00d];
//! mgr.program_chain(ScanChain::Chain2, 160, &table).unwrap();
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod chain;
pub mod config;
pub mod error;
pub mod packet;
pub mod regs;
pub mod status;

pub use chain::{ChainTable, ScanChain, ScanManager};
pub use error::{InvalidInput, ScanError};
