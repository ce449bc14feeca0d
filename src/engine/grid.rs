//! Linked-cell spatial index.
//!
//! A cubic grid of `divisions³` cells over the box with two signed arrays:
//! `head[cell]` holds the newest active particle inserted into the cell and
//! `next[i]` links to the particle inserted before `i` in the same cell,
//! terminated by `-1`. Both buffers are allocated once and reused across
//! ticks.

use crate::engine::pool::ParticlePool;

/// Sentinel terminating cell chains.
pub const EMPTY: i32 = -1;

#[derive(Debug, Clone)]
pub struct CellGrid {
    /// Cells per axis (`M`)
    pub divisions: usize,
    /// Cell side length (`L/M`)
    pub cell_size: f64,
    /// Newest occupant per cell, `divisions³` entries
    pub head: Vec<i32>,
    /// Per-slot chain link
    pub next: Vec<i32>,
}

impl CellGrid {
    /// Sizes the grid so a cell side covers at least one interaction
    /// diameter with margin: `M = ⌊L/(3·r_max)⌋`, clamped to `M ≥ 1`.
    pub fn new(box_size: f64, max_radius: f64, capacity: usize) -> Self {
        let divisions = if max_radius > 0.0 {
            ((box_size / (3.0 * max_radius)) as usize).max(1)
        } else {
            1
        };
        CellGrid {
            divisions,
            cell_size: box_size / divisions as f64,
            head: vec![EMPTY; divisions * divisions * divisions],
            next: vec![EMPTY; capacity],
        }
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.head.len()
    }

    /// Rebuilds the index from the pool, skipping inactive slots.
    ///
    /// Insertion prepends, so chains list newest-first. Cell coordinates
    /// are clamped into `[0, M-1]` against float error at the upper box
    /// boundary.
    pub fn rebuild(&mut self, pool: &ParticlePool) {
        self.head.fill(EMPTY);
        self.next.fill(EMPTY);

        let m = self.divisions;
        for (i, &species) in pool.species.iter().enumerate() {
            if species < 0 {
                continue;
            }
            let pos = pool.pos[i];
            let cx = ((pos.x / self.cell_size) as usize).min(m - 1);
            let cy = ((pos.y / self.cell_size) as usize).min(m - 1);
            let cz = ((pos.z / self.cell_size) as usize).min(m - 1);
            let cell = cx + cy * m + cz * m * m;

            self.next[i] = self.head[cell];
            self.head[cell] = i as i32;
        }
    }
}
