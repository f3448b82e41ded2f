//! Engine status monitoring.  The engine raises no interrupt when it finishes shifting, so the
//! only way to know it is done is to poll the status register.  Polling is modelled as a small
//! state machine, `PollState`, which is fed decoded `Status` snapshots; the register reads
//! themselves happen in `is_idle`.
//!
//! The wait is a tight spin with a hard iteration cap.  It never sleeps or yields, so it can run
//! before any scheduler exists, and a wedged engine cannot hang the caller forever.
use bitfield_struct::bitfield;
use tracing::trace;

use crate::regs::{Register, RegisterFile};

/// Snapshot of the scan-manager status register
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct Status {
    #[bits(28)]
    __: u32,
    /// Entries still queued in the write FIFO, bits 30:28
    #[bits(3)]
    pub wfifo_count: u8,
    /// The engine is shifting data, bit 31
    pub active: bool,
}

impl Status {
    /// The engine is busy while it is active or has anything left in its write FIFO
    pub const fn is_busy(&self) -> bool {
        self.active() || self.wfifo_count() > 0
    }
}

/// Verdict of an idle wait
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    /// Still busy when the polling budget ran out
    Active,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollState {
    /// `remaining` counts the status reads still allowed, including the next one
    Polling { remaining: u32 },
    Idle,
    TimedOut,
}

impl PollState {
    /// Begin a wait allowing `max_iterations` status reads.  A budget of zero still allows one.
    pub const fn start(max_iterations: u32) -> Self {
        let remaining = if max_iterations == 0 { 1 } else { max_iterations };
        PollState::Polling { remaining }
    }

    /// Consume one status snapshot.  Finished states absorb further snapshots unchanged.
    pub const fn advance(self, status: Status) -> Self {
        match self {
            PollState::Polling { remaining } => {
                if !status.is_busy() {
                    PollState::Idle
                } else if remaining <= 1 {
                    PollState::TimedOut
                } else {
                    PollState::Polling {
                        remaining: remaining - 1,
                    }
                }
            }
            done => done,
        }
    }

    /// The verdict, once the wait has finished
    pub const fn verdict(self) -> Option<EngineState> {
        match self {
            PollState::Polling { .. } => None,
            PollState::Idle => Some(EngineState::Idle),
            PollState::TimedOut => Some(EngineState::Active),
        }
    }
}

/// Poll the status register until the engine is idle, reading it at most `max_iterations` times.
/// Returns `EngineState::Active` if the engine was still busy on the last allowed read.
pub fn is_idle<R: RegisterFile + ?Sized>(regs: &mut R, max_iterations: u32) -> EngineState {
    let mut state = PollState::start(max_iterations);
    loop {
        let status = Status::from_bits(regs.read(Register::Status));
        trace!(
            active = status.active(),
            wfifo_count = status.wfifo_count(),
            "scan engine status"
        );
        state = state.advance(status);
        if let Some(verdict) = state.verdict() {
            return verdict;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::sim::SimScanManager;

    const ACTIVE: u32 = 0x8000_0000;

    #[test]
    fn decode_fields() {
        let s = Status::from_bits(0x8000_0000);
        assert!(s.active());
        assert_eq!(s.wfifo_count(), 0);
        assert!(s.is_busy());

        let s = Status::from_bits(0x7000_0000);
        assert!(!s.active());
        assert_eq!(s.wfifo_count(), 7);
        assert!(s.is_busy());

        // Bits below 28 carry nothing the engine monitor cares about
        let s = Status::from_bits(0x0fff_ffff);
        assert!(!s.is_busy());
    }

    #[test]
    fn advance_transitions() {
        let busy = Status::from_bits(ACTIVE);
        let idle = Status::new();

        assert_eq!(PollState::start(3).advance(idle), PollState::Idle);
        assert_eq!(
            PollState::start(3).advance(busy),
            PollState::Polling { remaining: 2 }
        );
        assert_eq!(PollState::start(1).advance(busy), PollState::TimedOut);
        assert_eq!(PollState::TimedOut.advance(idle), PollState::TimedOut);
        assert_eq!(PollState::Idle.advance(busy), PollState::Idle);
        assert_eq!(PollState::start(0), PollState::Polling { remaining: 1 });
        assert_eq!(PollState::start(5).verdict(), None);
    }

    #[test]
    fn idle_engine_needs_one_read() {
        let mut sim = SimScanManager::new();
        assert_eq!(is_idle(&mut sim, 100), EngineState::Idle);
        assert_eq!(sim.status_reads(), 1);
    }

    #[test]
    fn stuck_engine_exhausts_budget() {
        for max in [1, 2, 5, 100] {
            let mut sim = SimScanManager::stuck_active();
            assert_eq!(is_idle(&mut sim, max), EngineState::Active);
            assert_eq!(sim.status_reads(), max as usize);
        }
    }

    #[test]
    fn fifo_drain_counts_as_busy() {
        let mut sim = SimScanManager::new().with_status_script([0x3000_0000, 0x1000_0000]);
        assert_eq!(is_idle(&mut sim, 10), EngineState::Idle);
        assert_eq!(sim.status_reads(), 3);
    }

    #[test]
    fn engine_going_idle_on_last_read() {
        let mut sim = SimScanManager::new().with_status_script([ACTIVE, ACTIVE]);
        assert_eq!(is_idle(&mut sim, 3), EngineState::Idle);

        let mut sim = SimScanManager::new().with_status_script([ACTIVE, ACTIVE, ACTIVE]);
        assert_eq!(is_idle(&mut sim, 3), EngineState::Active);
    }
}
