//! Property tests for the scheduler as seen through [`Simulation`].

use gloam_core::{Pos, Tick};
use gloam_engine::{Actor, MonsterKind, SimConfig, Simulation, Status};
use gloam_test_utils::fixtures;
use proptest::prelude::*;

const KINDS: [MonsterKind; 3] = [
    MonsterKind::Guard,
    MonsterKind::Dog,
    MonsterKind::TreeMushroom,
];

fn open_sim(seed: u64) -> Simulation {
    Simulation::new(
        SimConfig::seeded(seed),
        fixtures::open_level(9, 9),
        Pos::new(4, 4),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn second_put_is_refused_and_keeps_the_expiry(d1 in 1u64..30, d2 in 1u64..30) {
        let mut sim = open_sim(0);
        prop_assert!(sim.put_status(Actor::Player, Status::Shadows, d1));
        prop_assert!(!sim.put_status(Actor::Player, Status::Shadows, d2));
        prop_assert_eq!(sim.expiry(Actor::Player, Status::Shadows), Some(Tick(d1)));
        sim.run_until(Tick(d1 - 1));
        prop_assert!(sim.has_status(Actor::Player, Status::Shadows));
        sim.run_until(Tick(d1));
        prop_assert!(!sim.has_status(Actor::Player, Status::Shadows));
    }

    #[test]
    fn refreshed_status_follows_its_latest_timer(d1 in 1u64..30, d2 in 1u64..30) {
        let mut sim = open_sim(0);
        sim.put_status(Actor::Player, Status::Levitation, d1);
        prop_assert_eq!(
            sim.refresh_status(Actor::Player, Status::Levitation, d2),
            Some(Tick(d1))
        );
        sim.run_until(Tick(d1));
        prop_assert_eq!(sim.has_status(Actor::Player, Status::Levitation), d2 > d1);
        sim.run_until(Tick(d1.max(d2)));
        prop_assert!(!sim.has_status(Actor::Player, Status::Levitation));
        prop_assert_eq!(sim.metrics().stale_events, 1);
    }

    #[test]
    fn events_fire_in_rank_then_insertion_order(
        spawns in prop::collection::vec((0i32..9, 0i32..9, 0usize..3), 0..6),
        horizon in 1u64..40,
        seed in any::<u64>(),
    ) {
        let mut sim = open_sim(seed).with_event_log();
        for (x, y, k) in spawns {
            // Occupied cells are refused; that is fine here.
            let _ = sim.spawn_monster(KINDS[k], Pos::new(x, y));
        }
        sim.put_status(Actor::Player, Status::Swift, 3);
        sim.run_until(Tick(horizon));
        let events = sim.trace().events();
        for pair in events.windows(2) {
            prop_assert!((pair[0].rank, pair[0].seq) < (pair[1].rank, pair[1].seq));
        }
        prop_assert!(events.iter().all(|e| e.rank <= Tick(horizon)));
        prop_assert_eq!(sim.now(), Tick(horizon));
    }

    #[test]
    fn removed_monsters_leave_only_absorbed_events(remove_at in 0u64..10) {
        let mut sim = open_sim(1);
        let id = sim.spawn_monster(MonsterKind::Guard, Pos::new(0, 0)).unwrap();
        sim.put_status(Actor::Monster(id), Status::Slow, 50);
        sim.run_until(Tick(remove_at));
        prop_assert!(sim.remove_monster(id).is_some());
        prop_assert!(!sim.put_status(Actor::Monster(id), Status::Slow, 5));
        sim.run_until(Tick(60));
        let m = sim.metrics();
        prop_assert_eq!(m.orphaned_events, 1);
        prop_assert_eq!(m.stale_events, 1);
    }
}
