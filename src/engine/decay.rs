//! First-order decay pass.
//!
//! Runs serially after pair resolution: slot recycling scans shared state,
//! and two concurrent decays could otherwise claim the same free slot. Each
//! active slot samples its applicable channels in table order and fires at
//! most one per step.

use std::f64::consts::TAU;

use log::debug;
use rand::prelude::*;

use crate::engine::pool::ParticlePool;
use crate::reaction::{DecayChannel, NO_SPECIES};
use crate::vector::Vec3;

/// Physics parameters for one decay pass.
pub struct DecayParams<'a> {
    pub temperature: f64,
    pub boltzmann_k: f64,
    pub mass: f64,
    pub dt: f64,
    pub channels: &'a [DecayChannel],
}

/// Processes spontaneous decays over every active slot.
///
/// Returns the number of split events aborted because the pool was full;
/// those events leave no trace in the particle state.
pub fn run_decays(pool: &mut ParticlePool, params: &DecayParams, rng: &mut impl Rng) -> u64 {
    if params.channels.is_empty() {
        return 0;
    }

    let kt = params.boltzmann_k * params.temperature;
    let mut aborted = 0;

    for i in 0..pool.capacity() {
        let species = pool.species[i];
        if species < 0 {
            continue;
        }

        for channel in params.channels {
            if channel.reactant != species {
                continue;
            }

            // Arrhenius rate constant, converted to a per-step probability
            let rate = channel.frequency_factor * (-channel.ea / kt).exp();
            let probability = (rate * params.dt).min(1.0);
            if rng.random::<f64>() >= probability {
                continue;
            }

            if channel.p1 == NO_SPECIES {
                // Mass-preserving rename; velocity is untouched
                pool.species[i] = channel.p0;
                break;
            }

            // Two-fragment split. Each fragment starts from v/2 and gains a
            // separation speed funded by the reaction heat plus the kinetic
            // energy freed by halving the parent velocity.
            let parent_vel = pool.vel[i];
            let budget = channel.heat / params.mass + parent_vel.norm_squared() / 4.0;
            if budget < 0.0 {
                // Parent too slow to fund an endothermic split
                continue;
            }

            let Some(slot) = pool.recycle_slot() else {
                aborted += 1;
                debug!("decay aborted: pool exhausted emitting type {}", channel.p1);
                continue;
            };

            let separation = isotropic_direction(rng) * budget.sqrt();
            let base = parent_vel * 0.5;

            pool.pos[slot] = pool.pos[i];
            pool.vel[slot] = base - separation;
            pool.species[slot] = channel.p1;

            pool.vel[i] = base + separation;
            pool.species[i] = channel.p0;
            break;
        }
    }

    aborted
}

/// Uniform direction on the unit sphere.
///
/// Samples `cos θ` uniformly in `[-1, 1]` and `φ` in `[0, 2π)`; sampling θ
/// itself uniformly would pile fragments toward the poles.
fn isotropic_direction(rng: &mut impl Rng) -> Vec3 {
    let cos_theta = rng.random_range(-1.0..=1.0);
    let sin_theta = (1.0_f64 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = rng.random_range(0.0..TAU);
    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}
