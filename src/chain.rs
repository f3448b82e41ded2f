//! Programming of the IO scan chains.  `ScanManager` owns the register file for the duration of
//! a programming call: it enables one chain, streams that chain's table through the write FIFO as
//! TDI/TDO packets, and waits for the engine to go idle before every packet and once more after
//! the last one.
//!
//! There is no partial success.  If the engine stays busy past the polling budget the call fails
//! and the chain must be considered unprogrammed.
use tracing::{debug, warn};

use crate::config::{ScanConfig, NUM_OF_CHAINS};
use crate::error::{InvalidInput, Result, ScanError};
use crate::packet::{words_for_bits, TransferPlan};
use crate::regs::{Register, RegisterFile};
use crate::status::{self, EngineState};

/// IO scan chains behind the engine, each covering a distinct set of IO banks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ScanChain {
    /// EMAC IO and mixed IO 2
    Chain0 = 0,
    /// Mixed IO 1 and flash IO
    Chain1 = 1,
    /// General purpose IO
    Chain2 = 2,
    /// DDR IO
    Chain3 = 3,
}

impl ScanChain {
    pub const ALL: [ScanChain; NUM_OF_CHAINS as usize] = [
        ScanChain::Chain0,
        ScanChain::Chain1,
        ScanChain::Chain2,
        ScanChain::Chain3,
    ];

    pub const fn index(self) -> u32 {
        self as u32
    }

    /// Value written to the enable register to route FIFO data to this chain only
    pub const fn enable_mask(self) -> u32 {
        1 << self.index()
    }
}

impl TryFrom<u32> for ScanChain {
    type Error = ScanError;

    fn try_from(id: u32) -> Result<Self> {
        match id {
            0 => Ok(ScanChain::Chain0),
            1 => Ok(ScanChain::Chain1),
            2 => Ok(ScanChain::Chain2),
            3 => Ok(ScanChain::Chain3),
            _ => Err(InvalidInput::UnknownChain(id).into()),
        }
    }
}

/// A chain's configuration bits as supplied by the board: `length_bits` bits packed into 32-bit
/// words, least significant bit first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainTable<'a> {
    pub chain: ScanChain,
    pub length_bits: u32,
    pub table: &'a [u32],
}

impl<'a> ChainTable<'a> {
    pub const fn new(chain: ScanChain, length_bits: u32, table: &'a [u32]) -> Self {
        Self {
            chain,
            length_bits,
            table,
        }
    }
}

pub struct ScanManager<R> {
    regs: R,
    config: ScanConfig,
}

impl<R: RegisterFile> ScanManager<R> {
    /// Create a scan manager using an existing `RegisterFile` and the default polling budget
    pub fn new(regs: R) -> Self {
        Self::with_config(regs, ScanConfig::default())
    }

    pub fn with_config(regs: R, config: ScanConfig) -> Self {
        Self { regs, config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn regs(&self) -> &R {
        &self.regs
    }

    pub fn regs_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    pub fn into_regs(self) -> R {
        self.regs
    }

    /// Poll the engine until it is idle, reading the status register at most `max_iterations`
    /// times.
    pub fn is_idle(&mut self, max_iterations: u32) -> EngineState {
        status::is_idle(&mut self.regs, max_iterations)
    }

    fn wait_idle(&mut self) -> Result<()> {
        let iterations = self.config.max_poll_iterations;
        match self.is_idle(iterations) {
            EngineState::Idle => Ok(()),
            EngineState::Active => {
                warn!(iterations, "scan engine did not go idle");
                Err(ScanError::EngineTimeout { iterations })
            }
        }
    }

    /// Shift `length_bits` bits of `table` into `chain`.
    ///
    /// `table` must hold at least `ceil(length_bits / 32)` words.  The chain is disabled again
    /// before returning, whether or not programming succeeded.  A zero-length chain is selected
    /// and released without any FIFO traffic.
    pub fn program_chain(&mut self, chain: ScanChain, length_bits: u32, table: &[u32]) -> Result<()> {
        let required_words = words_for_bits(length_bits);
        if table.len() < required_words {
            return Err(InvalidInput::TableTooShort {
                chain,
                required_words,
                provided_words: table.len(),
            }
            .into());
        }

        debug!(?chain, length_bits, "selecting IO scan chain");
        self.regs.write(Register::Enable, chain.enable_mask());
        let result = self.shift_chain(length_bits, table);
        self.regs.write(Register::Enable, 0);
        result
    }

    /// Like `program_chain`, taking the chain as a raw identifier
    pub fn program_chain_id(&mut self, chain_id: u32, length_bits: u32, table: &[u32]) -> Result<()> {
        let chain = ScanChain::try_from(chain_id)?;
        self.program_chain(chain, length_bits, table)
    }

    fn shift_chain(&mut self, length_bits: u32, table: &[u32]) -> Result<()> {
        let mut sent = 0;
        for packet in TransferPlan::new(length_bits) {
            // The FIFO must be drained before the next packet goes in
            self.wait_idle()?;
            debug!(
                first_word = packet.first_word,
                payload_bits = packet.payload_bits,
                "sending TDI/TDO packet"
            );
            for write in packet.writes(table) {
                self.regs.write(write.port.register(), write.value);
                sent += write.payload_bits;
            }
        }
        debug_assert_eq!(sent, length_bits);

        if sent > 0 {
            self.wait_idle()?;
        }
        Ok(())
    }

    /// Program every chain in `tables`, in order.  All chains are attempted even if one fails;
    /// the first failure is returned.
    pub fn program_chains(&mut self, tables: &[ChainTable<'_>]) -> Result<()> {
        let mut first_err = None;
        for t in tables {
            if let Err(err) = self.program_chain(t.chain, t.length_bits, t.table) {
                warn!(chain = ?t.chain, %err, "IO scan chain programming failed");
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
