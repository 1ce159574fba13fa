use cohsim_core::common::{Instruction, ProcessorId, WorkloadError};
use cohsim_core::core::CacheLine;
use cohsim_core::protocol::peer::PeerPolicy;
use cohsim_core::protocol::{LineState, ProtocolKind};
use cohsim_core::soc::{Bus, Dispatch, SharedMemory};

/// Installs a test-writer subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// A bus plus convenience accessors for tests.
pub struct TestContext {
    pub bus: Bus,
}

impl TestContext {
    /// Two processors in front of four zeroed words.
    pub fn new(kind: ProtocolKind) -> Self {
        Self::with_system(kind, 2, SharedMemory::new(4))
    }

    pub fn with_system(kind: ProtocolKind, processors: usize, memory: SharedMemory) -> Self {
        init_tracing();
        Self {
            bus: Bus::new(kind, processors, memory),
        }
    }

    pub fn with_peer_policy(self, policy: Box<dyn PeerPolicy>) -> Self {
        Self {
            bus: self.bus.with_peer_policy(policy),
        }
    }

    /// Dispatches one instruction, panicking on rejection.
    pub fn exec(&mut self, inst: Instruction) -> Dispatch {
        self.bus.dispatch(inst).unwrap()
    }

    /// Dispatches one instruction and returns the raw result.
    pub fn try_exec(&mut self, inst: Instruction) -> Result<Dispatch, WorkloadError> {
        self.bus.dispatch(inst)
    }

    /// Dispatches every instruction in order.
    pub fn run(&mut self, insts: &[Instruction]) -> Vec<Dispatch> {
        insts.iter().map(|i| self.exec(*i)).collect()
    }

    pub fn line(&self, processor: usize) -> CacheLine {
        *self.bus.processor(ProcessorId(processor)).unwrap().line()
    }

    pub fn state(&self, processor: usize) -> LineState {
        self.line(processor).state()
    }
}
