//! # Runtime Configuration Module
//!
//! Holds every parameter the engine can be constructed from or mutated with
//! at run time, together with the validation that guards config ingestion.
//! The split follows the original control model:
//!
//! - **Control parameters** (`temperature`, `thermostat_enabled`) are always
//!   mutable, even while a run is in progress.
//! - **Property parameters** (box size, populations, radii, reactions, ...)
//!   are frozen once `properties_locked` is set and can only change again
//!   after an explicit unlock.
//!
//! All ingestion paths return `Result<_, ConfigError>`; a rejected update
//! leaves the configuration untouched so the engine never observes a
//! half-applied change. Field names serialize as camelCase because the
//! structure crosses directly into the JavaScript visual client.


use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard cap on the number of declared species.
pub const MAX_SPECIES: usize = 5;

/// Everything that can go wrong while ingesting configuration.
///
/// These are the only errors the core ever reports to a caller; runtime
/// anomalies inside the stepper are recovered locally instead.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("too many species: {count} declared, at most {max} supported")]
    TooManySpecies { count: usize, max: usize },

    #[error("species `{id}` has non-positive radius {radius}")]
    InvalidRadius { id: String, radius: f64 },

    #[error("species `{id}` has out-of-range or duplicate type id {type_id}")]
    InvalidTypeId { id: String, type_id: i32 },

    #[error("negative activation energy in `{equation}`")]
    NegativeBarrier { equation: String },

    #[error("malformed reaction equation `{0}`")]
    MalformedEquation(String),

    #[error("unknown species `{symbol}` in `{equation}`")]
    UnknownSpecies { symbol: String, equation: String },

    #[error("reaction `{equation}` must have one or two species on each side")]
    InvalidArity { equation: String },

    #[error("first-order reaction `{equation}` requires a frequency factor")]
    MissingFrequencyFactor { equation: String },

    #[error("initial populations ({requested}) exceed pool capacity ({capacity})")]
    CapacityExceeded { requested: usize, capacity: usize },

    #[error("{name} must be positive")]
    NonPositiveParameter { name: &'static str },

    #[error("simulation properties are locked")]
    PropertiesLocked,
}

/// One declared species.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstanceConfig {
    /// Display symbol, also the key used in reaction equations ("A", "B", ...)
    pub id: String,
    /// Type id stored in the particle pool; must be unique in `[0, S)`
    pub type_id: i32,
    /// Display hue in degrees for the visual client
    pub color_hue: f64,
    /// Hard-sphere radius, must be positive
    pub radius: f64,
    /// Number of particles seeded with this type
    pub initial_count: usize,
}

/// One user-declared reaction.
///
/// Types may be listed explicitly or left empty, in which case they are
/// recovered by parsing `equation` against the substance symbols. The
/// frequency factor is only meaningful (and then mandatory) for
/// single-reactant reactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionConfig {
    pub equation: String,
    #[serde(default)]
    pub reactant_types: Vec<i32>,
    #[serde(default)]
    pub product_types: Vec<i32>,
    pub ea_forward: f64,
    pub ea_reverse: f64,
    #[serde(default)]
    pub frequency_factor: Option<f64>,
}

/// Complete engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeConfig {
    /// Thermostat target; also enters every Arrhenius exponent
    pub temperature: f64,
    /// When false the system runs adiabatically
    pub thermostat_enabled: bool,
    /// Side length of the periodic box
    pub box_size: f64,
    /// Per-particle mass, uniform across species
    pub mass: f64,
    /// Boltzmann constant in simulation units
    pub boltzmann_k: f64,
    /// Time increment per inner step
    pub dt: f64,
    /// Thickness of the tomographic snapshot slab along z
    pub slice_thickness: f64,
    /// Particle pool capacity
    pub max_particles: usize,
    pub substances: Vec<SubstanceConfig>,
    pub reactions: Vec<ReactionConfig>,
    /// When set, only control parameters may be mutated
    pub properties_locked: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            temperature: 300.0,
            thermostat_enabled: true,
            box_size: 40.0,
            mass: 1.0,
            boltzmann_k: 0.1,
            dt: 0.002,
            slice_thickness: 4.0,
            max_particles: 10_000,
            substances: Vec::new(),
            reactions: Vec::new(),
            properties_locked: false,
        }
    }
}

/// Partial configuration for hot updates.
///
/// Absent fields are left unchanged. Under a property lock, any present
/// non-control field rejects the whole update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigUpdate {
    pub temperature: Option<f64>,
    pub thermostat_enabled: Option<bool>,
    pub box_size: Option<f64>,
    pub slice_thickness: Option<f64>,
    pub substances: Option<Vec<SubstanceConfig>>,
    pub reactions: Option<Vec<ReactionConfig>>,
}

impl ConfigUpdate {
    /// True if the update touches anything beyond the control parameters.
    pub fn touches_properties(&self) -> bool {
        self.box_size.is_some()
            || self.slice_thickness.is_some()
            || self.substances.is_some()
            || self.reactions.is_some()
    }
}

impl RuntimeConfig {
    /// Checks the whole configuration; the engine refuses to build or
    /// mutate from a value that fails here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature <= 0.0 {
            return Err(ConfigError::NonPositiveParameter {
                name: "temperature",
            });
        }
        if self.box_size <= 0.0 {
            return Err(ConfigError::NonPositiveParameter { name: "box_size" });
        }
        if self.mass <= 0.0 {
            return Err(ConfigError::NonPositiveParameter { name: "mass" });
        }
        if self.boltzmann_k <= 0.0 {
            return Err(ConfigError::NonPositiveParameter {
                name: "boltzmann_k",
            });
        }
        if self.dt <= 0.0 {
            return Err(ConfigError::NonPositiveParameter { name: "dt" });
        }
        if self.slice_thickness < 0.0 {
            return Err(ConfigError::NonPositiveParameter {
                name: "slice_thickness",
            });
        }
        if self.max_particles == 0 {
            return Err(ConfigError::NonPositiveParameter {
                name: "max_particles",
            });
        }

        let species_count = self.substances.len();
        if species_count > MAX_SPECIES {
            return Err(ConfigError::TooManySpecies {
                count: species_count,
                max: MAX_SPECIES,
            });
        }

        let mut seen = [false; MAX_SPECIES];
        for substance in &self.substances {
            if substance.radius <= 0.0 {
                return Err(ConfigError::InvalidRadius {
                    id: substance.id.clone(),
                    radius: substance.radius,
                });
            }
            let type_id = substance.type_id;
            if type_id < 0 || type_id as usize >= species_count || seen[type_id as usize] {
                return Err(ConfigError::InvalidTypeId {
                    id: substance.id.clone(),
                    type_id,
                });
            }
            seen[type_id as usize] = true;
        }

        let requested: usize = self.substances.iter().map(|s| s.initial_count).sum();
        if requested > self.max_particles {
            return Err(ConfigError::CapacityExceeded {
                requested,
                capacity: self.max_particles,
            });
        }

        for reaction in &self.reactions {
            if reaction.ea_forward < 0.0 || reaction.ea_reverse < 0.0 {
                return Err(ConfigError::NegativeBarrier {
                    equation: reaction.equation.clone(),
                });
            }
        }

        Ok(())
    }

    /// Applies a partial update, enforcing the property lock.
    ///
    /// Either the whole update lands or none of it does: validation runs on
    /// a candidate copy, and `self` is replaced only on success.
    pub fn apply_update(&mut self, update: &ConfigUpdate) -> Result<(), ConfigError> {
        if self.properties_locked && update.touches_properties() {
            return Err(ConfigError::PropertiesLocked);
        }

        let mut candidate = self.clone();
        if let Some(temperature) = update.temperature {
            candidate.temperature = temperature;
        }
        if let Some(enabled) = update.thermostat_enabled {
            candidate.thermostat_enabled = enabled;
        }
        if let Some(box_size) = update.box_size {
            candidate.box_size = box_size;
        }
        if let Some(thickness) = update.slice_thickness {
            candidate.slice_thickness = thickness;
        }
        if let Some(substances) = &update.substances {
            candidate.substances = substances.clone();
        }
        if let Some(reactions) = &update.reactions {
            candidate.reactions = reactions.clone();
        }

        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    /// Freezes the property parameters.
    pub fn lock_properties(&mut self) {
        self.properties_locked = true;
    }

    /// Unfreezes the property parameters.
    pub fn unlock_properties(&mut self) {
        self.properties_locked = false;
    }

    /// Radius lookup table indexed by type id.
    pub fn radii_by_type(&self) -> Vec<f64> {
        let mut radii = vec![0.0; self.substances.len()];
        for substance in &self.substances {
            radii[substance.type_id as usize] = substance.radius;
        }
        radii
    }

    /// Largest declared species radius, used to size the cell grid.
    pub fn max_radius(&self) -> f64 {
        self.substances
            .iter()
            .map(|s| s.radius)
            .fold(0.0, f64::max)
    }
}
