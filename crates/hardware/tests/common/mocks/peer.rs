use cohsim_core::common::{Addr, ProcessorId};
use cohsim_core::core::Processor;
use cohsim_core::protocol::peer::PeerPolicy;
use mockall::mock;

mock! {
    pub Peer {}
    impl PeerPolicy for Peer {
        fn name(&self) -> &'static str;
        fn on_write(&mut self, writer: ProcessorId, addr: Addr, roster: &mut [Processor]) -> u64;
    }
}

impl MockPeer {
    /// A mock that answers `name()` any number of times.
    pub fn named() -> Self {
        let mut mock = Self::new();
        let _ = mock.expect_name().return_const("mock");
        mock
    }
}
