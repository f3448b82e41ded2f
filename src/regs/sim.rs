//! An in-memory stand-in for the scan-manager block.  It records every register write, counts
//! status reads, and replays a scripted sequence of status values, which is enough to drive the
//! programmer through idle, slow and wedged engines without hardware.
use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::regs::{Register, RegisterFile};
use crate::status::Status;

#[derive(Debug, Default)]
pub struct SimScanManager {
    // Status values handed out before anything else, oldest first
    script: VecDeque<u32>,
    // Status once the script runs dry
    steady: u32,
    // Busy reads the engine reports after each FIFO write
    shift_latency: u32,
    pending_busy: u32,
    enable: u32,
    status_reads: usize,
    writes: Vec<(Register, u32)>,
}

impl SimScanManager {
    /// An engine that is always idle with an empty FIFO
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine that reports active on every status read
    pub fn stuck_active() -> Self {
        Self {
            steady: Status::new().with_active(true).into_bits(),
            ..Self::default()
        }
    }

    /// Return `statuses` from the first status reads, then fall back to the steady status.
    pub fn with_status_script<I: IntoIterator<Item = u32>>(mut self, statuses: I) -> Self {
        self.script.extend(statuses);
        self
    }

    /// After every FIFO write, report the engine busy for `reads` status reads.
    pub fn with_shift_latency(mut self, reads: u32) -> Self {
        self.shift_latency = reads;
        self
    }

    pub fn status_reads(&self) -> usize {
        self.status_reads
    }

    /// Every register write in the order it was issued
    pub fn writes(&self) -> &[(Register, u32)] {
        &self.writes
    }

    /// Writes that went to one of the three FIFO ports
    pub fn fifo_writes(&self) -> impl Iterator<Item = (Register, u32)> + '_ {
        self.writes.iter().copied().filter(|(reg, _)| {
            matches!(
                reg,
                Register::FifoSingleByte | Register::FifoDoubleByte | Register::FifoQuadByte
            )
        })
    }

    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.status_reads = 0;
    }
}

impl RegisterFile for SimScanManager {
    fn read(&mut self, reg: Register) -> u32 {
        match reg {
            Register::Status => {
                self.status_reads += 1;
                if let Some(status) = self.script.pop_front() {
                    return status;
                }
                if self.pending_busy > 0 {
                    self.pending_busy -= 1;
                    return Status::new().with_active(true).with_wfifo_count(1).into_bits();
                }
                self.steady
            }
            Register::Enable => self.enable,
            // The FIFO ports are write-only
            _ => 0,
        }
    }

    fn write(&mut self, reg: Register, value: u32) {
        match reg {
            Register::Enable => self.enable = value,
            Register::FifoSingleByte | Register::FifoDoubleByte | Register::FifoQuadByte => {
                self.pending_busy = self.shift_latency;
            }
            Register::Status => {}
        }
        self.writes.push((reg, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_then_steady() {
        let mut sim = SimScanManager::stuck_active().with_status_script([0, 0x1000_0000]);
        assert_eq!(sim.read(Register::Status), 0);
        assert_eq!(sim.read(Register::Status), 0x1000_0000);
        assert_eq!(sim.read(Register::Status), 0x8000_0000);
        assert_eq!(sim.status_reads(), 3);
    }

    #[test]
    fn latency_follows_fifo_writes() {
        let mut sim = SimScanManager::new().with_shift_latency(2);
        sim.write(Register::Enable, 1);
        assert_eq!(sim.read(Register::Status), 0);

        sim.write(Register::FifoQuadByte, 0x1234);
        assert!(Status::from_bits(sim.read(Register::Status)).is_busy());
        assert!(Status::from_bits(sim.read(Register::Status)).is_busy());
        assert_eq!(sim.read(Register::Status), 0);

        assert_eq!(sim.read(Register::Enable), 1);
        assert_eq!(sim.fifo_writes().count(), 1);
        assert_eq!(sim.writes().len(), 2);
    }
}
