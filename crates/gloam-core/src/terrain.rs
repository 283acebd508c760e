//! Terrain kinds and their static properties.

use std::fmt;

/// The kind of a dungeon cell.
///
/// The last four variants are overlay kinds: they only ever appear on a
/// cell while a temporary overlay shadows the cell's real terrain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TerrainKind {
    /// Solid rock.
    Wall,
    /// Open floor.
    #[default]
    Ground,
    /// A door; opaque, passable by the player and door-opening monsters.
    Door,
    /// Dense flammable vegetation; blocks sight.
    Foliage,
    /// Debris left by explosions.
    Rubble,
    /// A drop to the level below; only levitating actors cross it.
    Chasm,
    /// Harmonic fog overlay.
    Fog,
    /// Oric barrier overlay.
    Barrier,
    /// Magical fire overlay consuming flammable terrain.
    Fire,
    /// Smoke overlay left behind by fire; induces sleep.
    NightCloud,
}

impl TerrainKind {
    /// Whether a walking actor may enter the cell.
    pub fn is_passable(self) -> bool {
        !matches!(self, Self::Wall | Self::Barrier | Self::Chasm)
    }

    /// Whether the cell stops line of sight.
    pub fn blocks_sight(self) -> bool {
        matches!(
            self,
            Self::Wall | Self::Door | Self::Foliage | Self::Fog | Self::NightCloud
        )
    }

    /// Whether fire can take hold on the cell.
    pub fn is_flammable(self) -> bool {
        matches!(self, Self::Foliage | Self::Door)
    }

    /// Whether harmonic fog may settle on the cell.
    pub fn allows_fog(self) -> bool {
        matches!(self, Self::Ground | Self::Rubble | Self::Foliage)
    }

    /// Whether this kind only exists as a temporary overlay.
    pub fn is_overlay(self) -> bool {
        matches!(
            self,
            Self::Fog | Self::Barrier | Self::Fire | Self::NightCloud
        )
    }

    /// Whether digging or an oric explosion turns the cell into rubble.
    pub fn is_diggable(self) -> bool {
        matches!(self, Self::Wall)
    }
}

impl fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Wall => "wall",
            Self::Ground => "ground",
            Self::Door => "door",
            Self::Foliage => "foliage",
            Self::Rubble => "rubble",
            Self::Chasm => "chasm",
            Self::Fog => "fog",
            Self::Barrier => "barrier",
            Self::Fire => "fire",
            Self::NightCloud => "night cloud",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_and_barriers_are_impassable() {
        assert!(!TerrainKind::Wall.is_passable());
        assert!(!TerrainKind::Barrier.is_passable());
        assert!(!TerrainKind::Chasm.is_passable());
        assert!(TerrainKind::Fog.is_passable());
        assert!(TerrainKind::Door.is_passable());
    }

    #[test]
    fn overlay_kinds_never_host_fog() {
        for kind in [
            TerrainKind::Fog,
            TerrainKind::Barrier,
            TerrainKind::Fire,
            TerrainKind::NightCloud,
        ] {
            assert!(kind.is_overlay());
            assert!(!kind.allows_fog());
        }
    }

    #[test]
    fn flammable_kinds() {
        assert!(TerrainKind::Foliage.is_flammable());
        assert!(TerrainKind::Door.is_flammable());
        assert!(!TerrainKind::Ground.is_flammable());
        assert!(!TerrainKind::Fire.is_flammable());
    }

    #[test]
    fn only_walls_are_diggable() {
        assert!(TerrainKind::Wall.is_diggable());
        for kind in [TerrainKind::Barrier, TerrainKind::Door, TerrainKind::Rubble] {
            assert!(!kind.is_diggable());
        }
    }
}
