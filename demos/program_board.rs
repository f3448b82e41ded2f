use scan_manager::chain::{ChainTable, ScanChain, ScanManager};
use scan_manager::config::ScanConfig;
use scan_manager::regs::sim::SimScanManager;
use scan_manager::regs::Register;

// Board tables, as a board configuration would hand them over
const CHAIN0_LENGTH: u32 = 100;
const CHAIN0_TABLE: [u32; 4] = [0x1122_3344, 0x5566_7788, 0x99aa_bbcc, 0x0000_000d];
const CHAIN2_LENGTH: u32 = 160;
const CHAIN2_TABLE: [u32; 5] = [0x0123_4567, 0x89ab_cdef, 0xdead_beef, 0xcafe_f00d, 0x5a5a_a5a5];

fn main() {
    let tables = [
        ChainTable::new(ScanChain::Chain0, CHAIN0_LENGTH, &CHAIN0_TABLE),
        ChainTable::new(ScanChain::Chain2, CHAIN2_LENGTH, &CHAIN2_TABLE),
    ];

    let sim = SimScanManager::new().with_shift_latency(3);
    let mut mgr = ScanManager::with_config(sim, ScanConfig::default());
    match mgr.program_chains(&tables) {
        Ok(()) => println!("all chains programmed"),
        Err(err) => println!("programming failed: {}", err),
    }

    let regs = mgr.into_regs();
    for (reg, value) in regs.writes() {
        let name = match reg {
            Register::Enable => "enable",
            Register::FifoSingleByte => "fifo1",
            Register::FifoDoubleByte => "fifo2",
            Register::FifoQuadByte => "fifo4",
            Register::Status => "status",
        };
        println!("{:>6} <- {:08x}", name, value);
    }
    println!("status reads: {}", regs.status_reads());
}
