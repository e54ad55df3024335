//! Property-based tests: registry index invariants
//!
//! Across random spawn/move/remove sequences:
//! 1. Actor ids are unique and strictly increasing
//! 2. The tag & type indices never hold empty buckets or stale ids
//! 3. Every live actor has exactly one element in the actor space

use std::collections::BTreeSet;

use proptest::prelude::*;
use strand_server::shared::{ActorId, Vec2};
use strand_test::{TestScene, BOX, WALL};

#[derive(Clone, Debug)]
enum Op {
    Spawn { wall: bool, x: f32, y: f32 },
    Move { pick: usize, x: f32, y: f32 },
    Remove { pick: usize },
    Destroy { pick: usize },
    Tick,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<bool>(), -200.0f32..200.0, -200.0f32..200.0)
            .prop_map(|(wall, x, y)| Op::Spawn { wall, x, y }),
        2 => (any::<usize>(), -200.0f32..200.0, -200.0f32..200.0)
            .prop_map(|(pick, x, y)| Op::Move { pick, x, y }),
        1 => any::<usize>().prop_map(|pick| Op::Remove { pick }),
        1 => any::<usize>().prop_map(|pick| Op::Destroy { pick }),
        1 => Just(Op::Tick),
    ]
}

fn pick(live: &BTreeSet<ActorId>, index: usize) -> Option<ActorId> {
    if live.is_empty() {
        return None;
    }
    live.iter().nth(index % live.len()).copied()
}

proptest! {
    #[test]
    fn prop_indices_track_live_actors(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut test = TestScene::new();
        let mut live = BTreeSet::new();
        let mut last_id = 0;

        for op in ops {
            match op {
                Op::Spawn { wall, x, y } => {
                    let id = test.spawn(if wall { WALL } else { BOX }, x, y);
                    prop_assert!(id > last_id, "id {} reused or out of order", id);
                    last_id = id;
                    live.insert(id);
                }
                Op::Move { pick: index, x, y } => {
                    if let Some(id) = pick(&live, index) {
                        prop_assert!(test.scene_mut().move_actor(id, Vec2::new(x, y), 0.0));
                    }
                }
                Op::Remove { pick: index } => {
                    if let Some(id) = pick(&live, index) {
                        prop_assert!(test.scene_mut().remove_actor(id));
                        live.remove(&id);
                    }
                }
                Op::Destroy { pick: index } => {
                    if let Some(id) = pick(&live, index) {
                        let timestamp = test.timestamp();
                        test.scene_mut().destroy_actor(id, timestamp);
                    }
                }
                Op::Tick => {
                    let timestamp = test.timestamp();
                    test.tick_to(timestamp + 50);
                    live.retain(|id| test.scene().actor(*id).is_some());
                }
            }

            let registry = test.scene().registry();
            prop_assert_eq!(registry.actor_count(), live.len());
            prop_assert_eq!(registry.space().len(), live.len());
            prop_assert_eq!(registry.actor_ids(), live.iter().copied().collect::<Vec<_>>());
            prop_assert_eq!(registry.instances("actor").len(), live.len());

            for (tag, ids) in registry.tag_index().iter() {
                prop_assert!(!ids.is_empty(), "empty bucket left for tag {}", tag);
                prop_assert!(ids.iter().all(|id| live.contains(id)));
            }
            for (type_name, ids) in registry.type_index().iter() {
                prop_assert!(!ids.is_empty(), "empty bucket left for type {}", type_name);
                prop_assert!(ids.iter().all(|id| live.contains(id)));
            }
            prop_assert!(registry.static_actors().iter().all(|id| live.contains(id)));
        }
    }
}
