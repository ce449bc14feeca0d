//! Fixed-capacity particle storage.
//!
//! The pool is a structure-of-arrays over position, velocity and type. It is
//! allocated once at engine construction and never resized: reactions that
//! change the particle count flip slots between active (`type >= 0`) and
//! inactive (`type == -1`) instead of allocating. Every traversal elsewhere
//! in the engine skips inactive slots.

use rand::prelude::*;
use rand_distr::Normal;
use rayon::prelude::*;

use crate::config::SubstanceConfig;
use crate::vector::Vec3;

/// Type tag of a free slot.
pub const INACTIVE: i32 = -1;

/// Structure-of-arrays particle pool.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    pub pos: Vec<Vec3>,
    pub vel: Vec<Vec3>,
    pub species: Vec<i32>,
}

impl ParticlePool {
    /// Creates a pool of `capacity` inactive slots.
    pub fn new(capacity: usize) -> Self {
        ParticlePool {
            pos: vec![Vec3::zero(); capacity],
            vel: vec![Vec3::zero(); capacity],
            species: vec![INACTIVE; capacity],
        }
    }

    /// Pool capacity (active plus free slots).
    pub fn capacity(&self) -> usize {
        self.species.len()
    }

    /// Seeds the declared populations in place.
    ///
    /// Slots are filled front-to-back: positions uniform in `[0, L)³`,
    /// velocities Maxwell-Boltzmann with `σ = √(k_B·T/m)`, every remaining
    /// slot marked inactive. The mean velocity of the seeded set is
    /// subtracted afterwards so the gas carries no center-of-mass drift.
    pub fn seed(
        &mut self,
        substances: &[SubstanceConfig],
        box_size: f64,
        temperature: f64,
        mass: f64,
        boltzmann_k: f64,
    ) {
        let mut rng = rand::rng();
        let sigma = (boltzmann_k * temperature / mass).sqrt();
        let normal = Normal::new(0.0, sigma).unwrap();

        let mut next = 0;
        for substance in substances {
            for _ in 0..substance.initial_count {
                self.pos[next] = Vec3::new(
                    rng.random::<f64>() * box_size,
                    rng.random::<f64>() * box_size,
                    rng.random::<f64>() * box_size,
                );
                self.vel[next] = Vec3::new(
                    normal.sample(&mut rng),
                    normal.sample(&mut rng),
                    normal.sample(&mut rng),
                );
                self.species[next] = substance.type_id;
                next += 1;
            }
        }
        for slot in next..self.capacity() {
            self.pos[slot] = Vec3::zero();
            self.vel[slot] = Vec3::zero();
            self.species[slot] = INACTIVE;
        }

        if next > 0 {
            let mean = self.vel[..next]
                .iter()
                .fold(Vec3::zero(), |acc, v| acc + *v)
                / next as f64;
            for v in &mut self.vel[..next] {
                *v -= mean;
            }
        }
    }

    /// Returns the smallest free slot index, or `None` when the pool is
    /// full. A linear scan is sufficient: decays fire rarely per step, so
    /// the allocator is far from the hot path.
    pub fn recycle_slot(&self) -> Option<usize> {
        self.species.iter().position(|&t| t == INACTIVE)
    }

    /// Number of active slots.
    pub fn active_count(&self) -> usize {
        self.species.iter().filter(|&&t| t >= 0).count()
    }

    /// Ballistic drift with periodic wrap, `pos += vel·Δt` into `[0, L)`.
    ///
    /// Runs over every slot; inactive slots carry no semantics and wrapping
    /// their stale coordinates is harmless, which keeps the pass free of
    /// branches and trivially data-parallel.
    pub fn drift(&mut self, dt: f64, box_size: f64) {
        self.pos
            .par_iter_mut()
            .zip(self.vel.par_iter())
            .for_each(|(pos, vel)| {
                *pos = (*pos + *vel * dt).wrap_box(box_size);
            });
    }

    /// Rescales every active position by `factor`, used by box hot-updates.
    pub fn rescale_positions(&mut self, factor: f64, box_size: f64) {
        for (pos, &species) in self.pos.iter_mut().zip(self.species.iter()) {
            if species >= 0 {
                *pos = (*pos * factor).wrap_box(box_size);
            }
        }
    }
}
