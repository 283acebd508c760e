use gloam_core::{GridOracle, Pos, TerrainKind};
use gloam_space::{Dungeon, Grid};

const CORRIDOR: &str = "
    #########
    #...#...#
    #...+...#
    #...#...#
    #########
";

#[test]
fn door_connects_two_rooms() {
    let d = Dungeon::parse(CORRIDOR).unwrap();
    let door = Pos::new(4, 2);
    assert_eq!(d.terrain(door), Some(TerrainKind::Door));
    assert!(d.is_passable(door));
    assert!(d.blocks_sight(door));
    assert!(d.is_flammable(door));
}

#[test]
fn out_of_bounds_blocks_sight_and_is_impassable() {
    let d = Dungeon::parse(CORRIDOR).unwrap();
    let outside = Pos::new(-1, 2);
    assert!(!d.in_bounds(outside));
    assert!(!d.is_passable(outside));
    assert!(d.blocks_sight(outside));
}

#[test]
fn oracle_neighbours_match_grid_neighbours() {
    let d = Dungeon::parse(CORRIDOR).unwrap();
    let g: &Grid = d.grid();
    for p in g.canonical_ordering() {
        assert_eq!(GridOracle::neighbours(&d, p), g.neighbours(p));
    }
}

#[test]
fn ray_across_rooms_passes_the_door() {
    let d = Dungeon::parse(CORRIDOR).unwrap();
    assert_eq!(d.terrain(Pos::new(4, 2)), Some(TerrainKind::Door));
    let r = Grid::ray(Pos::new(1, 2), Pos::new(7, 2));
    assert!(r.contains(&Pos::new(4, 2)));
    assert_eq!(r.len(), 7);
}
