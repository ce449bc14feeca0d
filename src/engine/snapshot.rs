//! Snapshot frame extraction.
//!
//! Produces the per-tick view the visual client renders: the particles
//! inside a thin tomographic slab around the box midplane, with normalized
//! coordinates and an absolute-scale normalized kinetic energy, plus the
//! aggregate counts and temperature. Energies are normalized against a
//! fixed reference temperature so that brightness encodes absolute energy
//! rather than rank within the current frame.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::RuntimeConfig;
use crate::engine::pool::ParticlePool;
use crate::engine::thermostat;

/// Upper reference temperature anchoring the energy normalization.
pub const REFERENCE_TEMPERATURE: f64 = 1000.0;

/// One particle inside the tomographic slab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameParticle {
    /// Position normalized to [0, 1]
    pub x: f64,
    pub y: f64,
    /// Species type id
    #[serde(rename = "type")]
    pub type_id: i32,
    /// Kinetic energy normalized to [0, 1] on the absolute reference scale
    pub energy: f64,
}

/// Energy-scale metadata shipped with every frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyStats {
    /// Normalized mean kinetic energy at the reference temperature; the
    /// client's "high energy" highlight threshold
    pub threshold: f64,
    pub ref_temp: f64,
}

/// A complete UI frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub time: f64,
    /// Active population per substance id, deterministically ordered
    pub substance_counts: BTreeMap<String, usize>,
    pub active_count: usize,
    pub current_temperature: f64,
    pub energy_stats: EnergyStats,
    pub particles: Vec<FrameParticle>,
}

/// Reference energy for the [0, 1] normalization: the kinetic energy of a
/// particle moving at three thermal standard deviations per axis at the
/// reference temperature.
pub fn reference_energy(mass: f64, boltzmann_k: f64) -> f64 {
    let sigma_max = (boltzmann_k * REFERENCE_TEMPERATURE / mass).sqrt();
    let max_speed = 3.0 * sigma_max * 3.0_f64.sqrt();
    0.5 * mass * max_speed * max_speed
}

/// Extracts a frame from the current pool state.
pub fn extract(pool: &ParticlePool, config: &RuntimeConfig, time: f64) -> Frame {
    let box_size = config.box_size;
    let z_mid = box_size / 2.0;
    let half_thickness = config.slice_thickness / 2.0;
    let e_ref = reference_energy(config.mass, config.boltzmann_k);

    let mut type_counts = vec![0usize; config.substances.len()];
    let mut particles = Vec::new();
    let mut active_count = 0;

    // Slot-ascending traversal keeps the particle list stably ordered
    for i in 0..pool.capacity() {
        let type_id = pool.species[i];
        if type_id < 0 || type_id as usize >= type_counts.len() {
            continue;
        }
        active_count += 1;
        type_counts[type_id as usize] += 1;

        let pos = pool.pos[i];
        if (pos.z - z_mid).abs() > half_thickness {
            continue;
        }

        let kinetic = 0.5 * config.mass * pool.vel[i].norm_squared();
        particles.push(FrameParticle {
            x: pos.x / box_size,
            y: pos.y / box_size,
            type_id,
            energy: (kinetic / e_ref).clamp(0.0, 1.0),
        });
    }

    let substance_counts = config
        .substances
        .iter()
        .map(|s| (s.id.clone(), type_counts[s.type_id as usize]))
        .collect();

    let (current_temperature, _) =
        thermostat::kinetic_temperature(pool, config.mass, config.boltzmann_k);

    Frame {
        time,
        substance_counts,
        active_count,
        current_temperature,
        energy_stats: EnergyStats {
            threshold: 1.5 * config.boltzmann_k * REFERENCE_TEMPERATURE / e_ref,
            ref_temp: REFERENCE_TEMPERATURE,
        },
        particles,
    }
}
