//! Velocity-rescaling thermostat.
//!
//! The per-step rescale factor is clamped to ±1% so thermal coupling acts
//! as a soft exponential approach instead of injecting energy shocks into
//! the reactive bookkeeping. An unclamped `retarget` exists for interactive
//! setpoint changes, where the new thermal state should be visible at once.

use crate::engine::pool::ParticlePool;

/// Per-step bounds of the clamped rescale factor.
pub const SCALE_MIN: f64 = 0.99;
pub const SCALE_MAX: f64 = 1.01;

/// Instantaneous kinetic temperature of the active subset.
///
/// `T = m·Σ|v|² / (3·N·k_B)` for three translational degrees of freedom.
/// Returns the temperature together with the active count; an empty pool
/// reports zero.
pub fn kinetic_temperature(pool: &ParticlePool, mass: f64, boltzmann_k: f64) -> (f64, usize) {
    let mut v_sq_sum = 0.0;
    let mut n_active = 0usize;
    for (vel, &species) in pool.vel.iter().zip(pool.species.iter()) {
        if species >= 0 {
            v_sq_sum += vel.norm_squared();
            n_active += 1;
        }
    }
    if n_active == 0 {
        return (0.0, 0);
    }
    let temperature = mass * v_sq_sum / (3.0 * n_active as f64 * boltzmann_k);
    (temperature, n_active)
}

/// Applies one clamped rescale toward `target` and returns the factor used.
///
/// A non-positive measured temperature skips the rescale (factor 1.0).
pub fn rescale_clamped(pool: &mut ParticlePool, current: f64, target: f64) -> f64 {
    if current <= 0.0 {
        return 1.0;
    }
    let factor = (target / current).sqrt().clamp(SCALE_MIN, SCALE_MAX);
    apply_scale(pool, factor);
    factor
}

/// One-shot unclamped rescale to exactly match `target`.
pub fn retarget(pool: &mut ParticlePool, current: f64, target: f64) {
    if current <= 0.0 {
        return;
    }
    let factor = (target / current).sqrt();
    apply_scale(pool, factor);
}

fn apply_scale(pool: &mut ParticlePool, factor: f64) {
    for (vel, &species) in pool.vel.iter_mut().zip(pool.species.iter()) {
        if species >= 0 {
            *vel = *vel * factor;
        }
    }
}
