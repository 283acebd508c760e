//! Rectangular grid with a 4-connected neighbourhood (N/E/S/W).

use crate::error::SpaceError;
use gloam_core::Pos;
use smallvec::SmallVec;
use std::collections::VecDeque;

/// A two-dimensional rectangular grid with 4-connected neighbourhood.
///
/// Each cell has position `(x, y)` where `0 <= x < width` and
/// `0 <= y < height`. Neighbours are the four cardinal directions,
/// enumerated in [`Dir::ALL`](gloam_core::Dir::ALL) order. Distance is
/// Manhattan (L1). Edge cells have fewer neighbours: corners have 2,
/// edges have 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    /// Maximum dimension size: positions use `i32`, so each axis must fit.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Create a grid with `width * height` cells.
    ///
    /// Returns `Err(SpaceError::EmptySpace)` if either dimension is 0, or
    /// `Err(SpaceError::DimensionTooLarge)` if either exceeds `i32::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloam_core::Pos;
    /// use gloam_space::Grid;
    ///
    /// let grid = Grid::new(16, 16).unwrap();
    /// assert_eq!(grid.cell_count(), 256);
    ///
    /// // A corner cell only has two neighbours.
    /// assert_eq!(grid.neighbours(Pos::new(0, 0)).len(), 2);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self, SpaceError> {
        if width == 0 || height == 0 {
            return Err(SpaceError::EmptySpace);
        }
        if width > Self::MAX_DIM {
            return Err(SpaceError::DimensionTooLarge {
                name: "width",
                value: width,
                max: Self::MAX_DIM,
            });
        }
        if height > Self::MAX_DIM {
            return Err(SpaceError::DimensionTooLarge {
                name: "height",
                value: height,
                max: Self::MAX_DIM,
            });
        }
        Ok(Self {
            width: width as i32,
            height: height as i32,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Whether `pos` lies inside the grid.
    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Row-major index of `pos`, or `None` outside the grid.
    pub fn index(&self, pos: Pos) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Position of the cell with row-major index `i`.
    pub fn pos_at(&self, i: usize) -> Pos {
        let w = self.width as usize;
        Pos::new((i % w) as i32, (i / w) as i32)
    }

    /// `Ok(())` if `pos` is inside the grid, `OutOfBounds` otherwise.
    pub fn check(&self, pos: Pos) -> Result<(), SpaceError> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(SpaceError::OutOfBounds {
                pos,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// In-bounds cardinal neighbours of `pos`.
    pub fn neighbours(&self, pos: Pos) -> SmallVec<[Pos; 4]> {
        pos.cardinal()
            .into_iter()
            .filter(|&p| self.contains(p))
            .collect()
    }

    /// Manhattan distance.
    pub fn distance(&self, a: Pos, b: Pos) -> u32 {
        a.distance(b)
    }

    /// Row-major canonical ordering: `(0,0), (1,0), ..., (width-1, height-1)`.
    pub fn canonical_ordering(&self) -> Vec<Pos> {
        let mut out = Vec::with_capacity(self.cell_count());
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(Pos::new(x, y));
            }
        }
        out
    }

    /// Every in-bounds cell within graph distance `radius` of `center`,
    /// in breadth-first order (nearest first).
    ///
    /// Terrain is ignored; this is the pure geometric diamond.
    pub fn disk(&self, center: Pos, radius: u32) -> Vec<Pos> {
        if !self.contains(center) {
            return Vec::new();
        }
        let mut visited = vec![false; self.cell_count()];
        let mut out = Vec::new();
        let mut queue = VecDeque::new();
        if let Some(i) = self.index(center) {
            visited[i] = true;
        }
        queue.push_back((center, 0u32));
        while let Some((pos, depth)) = queue.pop_front() {
            out.push(pos);
            if depth >= radius {
                continue;
            }
            for nb in self.neighbours(pos) {
                if let Some(i) = self.index(nb) {
                    if !visited[i] {
                        visited[i] = true;
                        queue.push_back((nb, depth + 1));
                    }
                }
            }
        }
        out
    }

    /// Bresenham line from `from` to `to`, both endpoints included.
    ///
    /// Cells are listed in walking order starting at `from`. The line is
    /// not clipped; callers check bounds where it matters.
    pub fn ray(from: Pos, to: Pos) -> Vec<Pos> {
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx + dy;
        let mut cur = from;
        let mut out = Vec::with_capacity((dx - dy) as usize + 1);
        loop {
            out.push(cur);
            if cur == to {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                cur.x += sx;
            }
            if e2 <= dx {
                err += dx;
                cur.y += sy;
            }
        }
        out
    }
}
