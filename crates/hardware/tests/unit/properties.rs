//! Property tests over arbitrary in-bounds workloads.

use cohsim_core::common::{AccessType, Addr, Instruction, ProcessorId};
use cohsim_core::protocol::peer::InvalidateBroadcast;
use cohsim_core::protocol::{LineState, Protocol, ProtocolKind};
use cohsim_core::soc::{Bus, Outcome, SharedMemory};
use proptest::prelude::*;

const PROCESSORS: usize = 4;
const WORDS: usize = 6;

fn instruction() -> impl Strategy<Value = Instruction> {
    (0..PROCESSORS, any::<bool>(), 0..WORDS, 0..=1000i64).prop_map(|(p, write, a, v)| Instruction {
        processor: ProcessorId(p),
        op: if write { AccessType::Write } else { AccessType::Read },
        addr: Addr(a),
        value: v,
    })
}

fn protocol() -> impl Strategy<Value = ProtocolKind> {
    prop_oneof![Just(ProtocolKind::Mesi), Just(ProtocolKind::Moesi)]
}

fn fresh_bus(kind: ProtocolKind) -> Bus {
    Bus::new(kind, PROCESSORS, SharedMemory::new(WORDS))
}

proptest! {
    #[test]
    fn counters_stay_consistent(kind in protocol(), insts in prop::collection::vec(instruction(), 0..200)) {
        let mut bus = fresh_bus(kind);
        for inst in &insts {
            let d = bus.dispatch(*inst).unwrap();
            prop_assert!(d.metrics.cache_misses <= d.metrics.total_instructions);
            prop_assert_eq!(
                d.metrics.load_instructions + d.metrics.store_instructions,
                d.metrics.total_instructions
            );
        }
        prop_assert_eq!(bus.metrics().total_instructions, insts.len() as u64);
    }

    #[test]
    fn states_stay_within_protocol(kind in protocol(), insts in prop::collection::vec(instruction(), 0..200)) {
        let protocol = Protocol::new(kind);
        let mut bus = fresh_bus(kind);
        for inst in &insts {
            let _ = bus.dispatch(*inst).unwrap();
            for p in bus.processors() {
                let state = p.line().state();
                prop_assert!(protocol.is_valid(state));
                prop_assert_ne!(state, LineState::Exclusive);
            }
        }
    }

    #[test]
    fn first_touch_misses(kind in protocol(), insts in prop::collection::vec(instruction(), 1..100)) {
        let mut bus = fresh_bus(kind);
        let mut seen = std::collections::HashSet::new();
        for inst in &insts {
            let d = bus.dispatch(*inst).unwrap();
            if seen.insert((inst.processor, inst.addr)) {
                prop_assert_eq!(d.outcome, Outcome::Miss);
            }
        }
    }

    #[test]
    fn replay_is_deterministic(kind in protocol(), insts in prop::collection::vec(instruction(), 0..150)) {
        let mut a = fresh_bus(kind);
        let mut b = fresh_bus(kind);
        for inst in &insts {
            let _ = a.dispatch(*inst).unwrap();
            let _ = b.dispatch(*inst).unwrap();
        }
        prop_assert_eq!(a.metrics(), b.metrics());
        prop_assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn invalidate_leaves_single_valid_copy(kind in protocol(), insts in prop::collection::vec(instruction(), 0..150)) {
        let mut bus = fresh_bus(kind).with_peer_policy(Box::new(InvalidateBroadcast));
        for inst in &insts {
            let _ = bus.dispatch(*inst).unwrap();
            if inst.op.is_write() {
                let holders = bus
                    .processors()
                    .iter()
                    .filter(|p| p.line().holds(inst.addr) && p.line().state() != LineState::Invalid)
                    .count();
                prop_assert_eq!(holders, 1);
            }
        }
    }
}
