//! Parallel pair resolution.
//!
//! One rayon task per cell walks its occupants and, for each, scans the 27
//! neighbor cells (periodic wrap on the indices) processing a pair only when
//! `i < j`. That filter, combined with the full-neighborhood scan, means
//! each unordered pair is handled by exactly one task, so the tasks share
//! the particle arrays without locks: a pair's two endpoints are written
//! only by the task that owns the pair, and the cell index is frozen for
//! the duration of the pass.
//!
//! A contacting, approaching pair either reacts (Boltzmann-weighted choice
//! among the barrier-cleared channels) or bounces elastically. Both outcomes
//! are the same combined impulse along the contact normal with
//! `v_n'² = v_n² + 4Q/m`; the elastic case is `Q = 0`.

use rand::prelude::*;
use rayon::prelude::*;

use crate::engine::grid::{CellGrid, EMPTY};
use crate::engine::pool::ParticlePool;
use crate::reaction::PairChannel;
use crate::vector::Vec3;

/// Squared-distance floor below which a pair counts as coincident and is
/// skipped rather than resolved.
pub const MIN_DIST_SQ: f64 = 1e-9;

/// Read-only physics parameters for one resolution pass.
pub struct PairParams<'a> {
    pub box_size: f64,
    pub temperature: f64,
    pub boltzmann_k: f64,
    pub mass: f64,
    /// Hard-sphere radius per type id
    pub radii: &'a [f64],
    pub channels: &'a [PairChannel],
}

/// Raw views of the particle arrays shared across cell tasks.
///
/// Positions are only read during the pass; velocities and types are
/// written through these pointers by the task owning the pair.
struct SharedParticles {
    pos: *const Vec3,
    vel: *mut Vec3,
    species: *mut i32,
}

// SAFETY: unique pair ownership (see module docs) guarantees that the two
// slots of any processed pair are written by exactly one task, and the cell
// index is not mutated while tasks run.
unsafe impl Send for SharedParticles {}
unsafe impl Sync for SharedParticles {}

/// Runs contact detection and collision resolution over the whole grid.
pub fn resolve_pairs(pool: &mut ParticlePool, grid: &CellGrid, params: &PairParams) {
    let shared = SharedParticles {
        pos: pool.pos.as_ptr(),
        vel: pool.vel.as_mut_ptr(),
        species: pool.species.as_mut_ptr(),
    };
    let m = grid.divisions as i64;

    (0..grid.cell_count()).into_par_iter().for_each(|cell| {
        let mut rng = rand::rng();

        let cell = cell as i64;
        let cx = cell % m;
        let cy = (cell / m) % m;
        let cz = cell / (m * m);

        let mut i = grid.head[cell as usize];
        while i != EMPTY {
            for ox in -1..=1 {
                for oy in -1..=1 {
                    for oz in -1..=1 {
                        let ncx = (cx + ox).rem_euclid(m);
                        let ncy = (cy + oy).rem_euclid(m);
                        let ncz = (cz + oz).rem_euclid(m);
                        let neighbor = (ncx + ncy * m + ncz * m * m) as usize;

                        let mut j = grid.head[neighbor];
                        while j != EMPTY {
                            if i < j {
                                // SAFETY: i < j over the full neighborhood
                                // scan assigns this pair to this task alone.
                                unsafe {
                                    resolve_one(&shared, i as usize, j as usize, params, &mut rng);
                                }
                            }
                            j = grid.next[j as usize];
                        }
                    }
                }
            }
            i = grid.next[i as usize];
        }
    });
}

/// Resolves a single candidate pair in place.
///
/// # Safety
/// Caller must be the unique owner of the unordered pair `(i, j)`, and both
/// indices must be in bounds for the pool arrays behind `shared`.
unsafe fn resolve_one(
    shared: &SharedParticles,
    i: usize,
    j: usize,
    params: &PairParams,
    rng: &mut impl Rng,
) {
    // Re-read the types at resolution time: an earlier reaction this tick
    // may have mutated or freed either endpoint.
    let type_i = unsafe { *shared.species.add(i) };
    let type_j = unsafe { *shared.species.add(j) };
    let species_count = params.radii.len() as i32;
    if type_i < 0 || type_j < 0 || type_i >= species_count || type_j >= species_count {
        return;
    }

    let pos_i = unsafe { *shared.pos.add(i) };
    let pos_j = unsafe { *shared.pos.add(j) };
    let delta = (pos_i - pos_j).min_image(params.box_size);
    let dist_sq = delta.norm_squared();

    let contact = params.radii[type_i as usize] + params.radii[type_j as usize];
    if dist_sq >= contact * contact || dist_sq <= MIN_DIST_SQ {
        return;
    }

    let normal = delta / dist_sq.sqrt();
    let vel_i = unsafe { *shared.vel.add(i) };
    let vel_j = unsafe { *shared.vel.add(j) };
    let v_normal = (vel_i - vel_j).dot(&normal);
    if v_normal >= 0.0 {
        // Receding or grazing; contact without approach is not a collision
        return;
    }

    // Collision energy along the line of impact, reduced mass m/2
    let e_coll = 0.25 * params.mass * v_normal * v_normal;
    let chosen = select_channel(params, type_i, type_j, e_coll, rng);
    let heat = chosen.map_or(0.0, |c| c.heat());

    // Combined impulse: elastic exchange and reaction enthalpy in one
    // normal-velocity update. The energy gate keeps the radicand positive
    // for any selectable channel; clamp anyway.
    let v_normal_out = (v_normal * v_normal + 4.0 * heat / params.mass).max(0.0).sqrt();
    let impulse = 0.5 * (v_normal_out - v_normal);

    unsafe {
        *shared.vel.add(i) = vel_i + normal * impulse;
        *shared.vel.add(j) = vel_j - normal * impulse;
        if let Some(channel) = chosen {
            *shared.species.add(i) = channel.p0;
            *shared.species.add(j) = channel.p1;
        }
    }
}

/// Boltzmann-weighted selection among the channels this pair can clear.
///
/// Weighting by `exp(−E_f/(k_B·T))` (rather than taking the first match)
/// makes competing channels at the same pair share the branching ratio
/// implied by their barriers. Returns `None` when no channel matches, which
/// resolves the pair elastically.
pub(crate) fn select_channel<'a>(
    params: &PairParams<'a>,
    type_i: i32,
    type_j: i32,
    e_coll: f64,
    rng: &mut impl Rng,
) -> Option<&'a PairChannel> {
    let kt = params.boltzmann_k * params.temperature;
    let open = |channel: &&PairChannel| {
        channel.matches(type_i, type_j) && channel.ea_forward <= e_coll
    };

    let total: f64 = params
        .channels
        .iter()
        .filter(open)
        .map(|c| (-c.ea_forward / kt).exp())
        .sum();
    if total <= 0.0 {
        return None;
    }

    let mut draw = rng.random::<f64>() * total;
    let mut last = None;
    for channel in params.channels.iter().filter(open) {
        let weight = (-channel.ea_forward / kt).exp();
        last = Some(channel);
        if draw < weight {
            return last;
        }
        draw -= weight;
    }
    // Float round-off can exhaust the draw past the final weight
    last
}
