//! Gloam Quickstart: a small level, two monsters and a handful of turns.
//!
//! Demonstrates:
//!   1. Parsing a level from text
//!   2. Building a `Simulation` with a seeded config and a printing sink
//!   3. Spawning monsters and driving the player with commands
//!   4. Reading back positions, statuses and drain metrics
//!
//! Run with:
//!   cargo run --example quickstart

use gloam_core::{Dir, Notice, NotificationSink, Pos};
use gloam_engine::{Ability, Actor, Command, MonsterKind, SimConfig, Simulation};
use gloam_space::Dungeon;

// ─── Level ──────────────────────────────────────────────────────

const LEVEL: &str = "
    ###########
    #....#....#
    #.\"\".+....#
    #....#....#
    ###########
";

// ─── Sink: print every notice ───────────────────────────────────

struct Printer;

impl NotificationSink for Printer {
    fn notify(&mut self, notice: Notice) {
        match notice {
            Notice::Message(text) => println!("  | {text}"),
            other => println!("  | {other:?}"),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let dungeon = Dungeon::parse(LEVEL)?;
    let mut sim = Simulation::new(SimConfig::seeded(42), dungeon, Pos::new(1, 1))?
        .with_sink(Printer);

    let guard = sim.spawn_monster(MonsterKind::Guard, Pos::new(8, 2))?;
    sim.spawn_monster(MonsterKind::Dog, Pos::new(9, 3))?;

    let script = [
        Command::Evoke(Ability::Shadows),
        Command::Move(Dir::South),
        Command::Evoke(Ability::Noise),
        Command::Wait,
        Command::Evoke(Ability::Fire),
        Command::Move(Dir::East),
        Command::Evoke(Ability::Sleeping),
        Command::Wait,
    ];

    for command in script {
        println!("{:>4}  {command:?}", sim.now().0);
        if let Err(e) = sim.act(command) {
            println!("  ! {e}");
        }
    }

    sim.run_until(sim.now() + 10);

    println!();
    println!("tick      {}", sim.now().0);
    println!("player    {:?}", sim.player());
    for m in sim.monsters().iter() {
        println!("{:<9} {} at {} ({})", m.kind.to_string(), m.id, m.pos, m.state);
    }
    println!("guard     {:?}", sim.active_statuses(Actor::Monster(guard)));
    println!("metrics   {:?}", sim.metrics());
    println!("digest    {:016x}", sim.trace().digest());
    Ok(())
}
