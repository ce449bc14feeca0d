//! # Engine Module - Reactive Gas Stepper
//!
//! The engine owns the particle pool, the linked-cell index and the
//! compiled reaction tables, and exposes the stepping façade the worker and
//! external commands drive. Each `step()` runs the fixed pipeline:
//!
//! 1. thermostat (measure, optionally rescale)
//! 2. ballistic drift with periodic wrap
//! 3. cell index rebuild
//! 4. parallel two-body pair resolution
//! 5. first-order decays
//! 6. active-count refresh, time advance
//!
//! All configuration mutations validate (and, where relevant, recompile the
//! reaction tables) before touching engine state, so a rejected command
//! leaves the simulation exactly as it was.

pub mod collide;
pub mod decay;
pub mod grid;
pub mod pool;
pub mod snapshot;
pub mod thermostat;

use log::{debug, info};

use crate::config::{ConfigError, ConfigUpdate, ReactionConfig, RuntimeConfig};
use crate::engine::collide::PairParams;
use crate::engine::decay::DecayParams;
use crate::engine::grid::CellGrid;
use crate::engine::pool::ParticlePool;
use crate::engine::snapshot::Frame;
use crate::reaction::ReactionTables;
use crate::vector::Vec3;

/// The simulation engine.
pub struct Engine {
    config: RuntimeConfig,
    tables: ReactionTables,
    radii: Vec<f64>,
    pool: ParticlePool,
    grid: CellGrid,
    sim_time: f64,
    step_count: u64,
    active_count: usize,
    decay_aborts: u64,
}

impl Engine {
    /// Builds an engine from a validated configuration and seeds the
    /// initial populations.
    pub fn new(config: RuntimeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let tables = ReactionTables::compile(&config)?;
        let radii = config.radii_by_type();

        let mut pool = ParticlePool::new(config.max_particles);
        pool.seed(
            &config.substances,
            config.box_size,
            config.temperature,
            config.mass,
            config.boltzmann_k,
        );
        let active_count = pool.active_count();
        let grid = CellGrid::new(config.box_size, config.max_radius(), config.max_particles);

        info!(
            "engine initialized: {} species, {} pair / {} decay channels, {} active of {} slots, grid {}³",
            config.substances.len(),
            tables.pair_channels.len(),
            tables.decay_channels.len(),
            active_count,
            config.max_particles,
            grid.divisions,
        );

        Ok(Engine {
            config,
            tables,
            radii,
            pool,
            grid,
            sim_time: 0.0,
            step_count: 0,
            active_count,
            decay_aborts: 0,
        })
    }

    /// Advances the simulation by one time step.
    ///
    /// A no-op when no species are declared: the call returns without
    /// advancing time.
    pub fn step(&mut self) {
        if self.config.substances.is_empty() {
            return;
        }

        // 1. Thermostat
        let (t_inst, n_active) = thermostat::kinetic_temperature(
            &self.pool,
            self.config.mass,
            self.config.boltzmann_k,
        );
        if self.config.thermostat_enabled && n_active > 0 {
            thermostat::rescale_clamped(&mut self.pool, t_inst, self.config.temperature);
        }

        // 2. Drift with periodic wrap
        self.pool.drift(self.config.dt, self.config.box_size);

        // 3. Rebuild the cell index; membership is frozen until after the
        // pair pass
        self.grid.rebuild(&self.pool);

        // 4. Two-body collisions and reactions
        collide::resolve_pairs(
            &mut self.pool,
            &self.grid,
            &PairParams {
                box_size: self.config.box_size,
                temperature: self.config.temperature,
                boltzmann_k: self.config.boltzmann_k,
                mass: self.config.mass,
                radii: &self.radii,
                channels: &self.tables.pair_channels,
            },
        );

        // 5. One-body decays
        self.decay_aborts += decay::run_decays(
            &mut self.pool,
            &DecayParams {
                temperature: self.config.temperature,
                boltzmann_k: self.config.boltzmann_k,
                mass: self.config.mass,
                dt: self.config.dt,
                channels: &self.tables.decay_channels,
            },
            &mut rand::rng(),
        );

        // 6. Bookkeeping
        self.active_count = self.pool.active_count();
        self.sim_time += self.config.dt;
        self.step_count += 1;
    }

    /// Runs `n` consecutive steps.
    pub fn step_batch(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Extracts the current UI frame.
    pub fn snapshot(&self) -> Frame {
        snapshot::extract(&self.pool, &self.config, self.sim_time)
    }

    /// Changes the thermostat setpoint and applies a one-shot unclamped
    /// rescale so the new thermal state is visible immediately.
    ///
    /// The reaction tables are recompiled because the derived reverse-decay
    /// frequency factors depend on temperature. A non-positive temperature
    /// is rejected.
    pub fn set_temperature(&mut self, temperature: f64) -> Result<(), ConfigError> {
        if temperature <= 0.0 {
            return Err(ConfigError::NonPositiveParameter {
                name: "temperature",
            });
        }
        let mut candidate = self.config.clone();
        candidate.temperature = temperature;
        let tables = ReactionTables::compile(&candidate)?;

        let (t_inst, _) = thermostat::kinetic_temperature(
            &self.pool,
            self.config.mass,
            self.config.boltzmann_k,
        );
        thermostat::retarget(&mut self.pool, t_inst, temperature);

        self.config = candidate;
        self.tables = tables;
        debug!("temperature retargeted to {temperature}");
        Ok(())
    }

    /// Enables or disables the thermostat (adiabatic mode when off).
    pub fn set_thermostat(&mut self, enabled: bool) {
        self.config.thermostat_enabled = enabled;
    }

    /// Hot-updates the box side length, rescaling active positions
    /// proportionally and rebuilding the cell grid.
    pub fn update_box(&mut self, box_size: f64) -> Result<(), ConfigError> {
        if self.config.properties_locked {
            return Err(ConfigError::PropertiesLocked);
        }
        if box_size <= 0.0 {
            return Err(ConfigError::NonPositiveParameter { name: "box_size" });
        }

        let factor = box_size / self.config.box_size;
        self.config.box_size = box_size;
        self.pool.rescale_positions(factor, box_size);
        self.grid = CellGrid::new(box_size, self.config.max_radius(), self.config.max_particles);
        info!("box resized by factor {factor:.4} to {box_size}");
        Ok(())
    }

    /// Replaces the reaction set. The new tables are compiled before any
    /// state changes, so a rejected list leaves the engine untouched.
    pub fn reload_reactions(&mut self, reactions: Vec<ReactionConfig>) -> Result<(), ConfigError> {
        if self.config.properties_locked {
            return Err(ConfigError::PropertiesLocked);
        }
        let mut candidate = self.config.clone();
        candidate.reactions = reactions;
        candidate.validate()?;
        let tables = ReactionTables::compile(&candidate)?;

        self.config = candidate;
        self.tables = tables;
        info!(
            "reactions reloaded: {} pair / {} decay channels",
            self.tables.pair_channels.len(),
            self.tables.decay_channels.len()
        );
        Ok(())
    }

    /// Applies a partial configuration update under the property lock,
    /// then re-derives whatever the touched fields invalidate.
    ///
    /// The candidate configuration is validated and its tables compiled
    /// before anything is committed, so a rejected update leaves the engine
    /// untouched.
    pub fn apply_update(&mut self, update: &ConfigUpdate) -> Result<(), ConfigError> {
        let mut candidate = self.config.clone();
        candidate.apply_update(update)?;
        let tables = ReactionTables::compile(&candidate)?;

        let old_box = self.config.box_size;
        let old_temperature = self.config.temperature;

        self.config = candidate;
        self.tables = tables;
        self.radii = self.config.radii_by_type();

        if update.substances.is_some() {
            // Populations changed: reseed in place, then rebuild the grid
            // around the (possibly changed) largest radius
            self.grid = CellGrid::new(
                self.config.box_size,
                self.config.max_radius(),
                self.pool.capacity(),
            );
            self.reset();
            return Ok(());
        }
        if let Some(box_size) = update.box_size
            && box_size != old_box
        {
            let factor = box_size / old_box;
            self.pool.rescale_positions(factor, box_size);
            self.grid = CellGrid::new(box_size, self.config.max_radius(), self.pool.capacity());
        }
        if let Some(temperature) = update.temperature
            && temperature != old_temperature
        {
            let (t_inst, _) = thermostat::kinetic_temperature(
                &self.pool,
                self.config.mass,
                self.config.boltzmann_k,
            );
            thermostat::retarget(&mut self.pool, t_inst, temperature);
        }
        Ok(())
    }

    /// Reinitializes the run in place: populations reseeded from the
    /// configuration, clock and diagnostics zeroed.
    pub fn reset(&mut self) {
        self.pool.seed(
            &self.config.substances,
            self.config.box_size,
            self.config.temperature,
            self.config.mass,
            self.config.boltzmann_k,
        );
        self.active_count = self.pool.active_count();
        self.sim_time = 0.0;
        self.step_count = 0;
        self.decay_aborts = 0;
        info!("engine reset: {} active slots", self.active_count);
    }

    /// Freezes the property parameters.
    pub fn lock_properties(&mut self) {
        self.config.lock_properties();
    }

    /// Unfreezes the property parameters.
    pub fn unlock_properties(&mut self) {
        self.config.unlock_properties();
    }

    /// Returns an immutable reference to the current configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Returns the current continuous simulation time.
    pub fn current_time(&self) -> f64 {
        self.sim_time
    }

    /// Returns the number of completed steps.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Returns the cached active-particle count.
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Number of decay events aborted because the pool was full.
    pub fn decay_aborts(&self) -> u64 {
        self.decay_aborts
    }

    /// Read-only view of every slot position.
    pub fn positions(&self) -> &[Vec3] {
        &self.pool.pos
    }

    /// Read-only view of every slot velocity.
    pub fn velocities(&self) -> &[Vec3] {
        &self.pool.vel
    }

    /// Read-only view of every slot type (`-1` marks a free slot).
    pub fn species(&self) -> &[i32] {
        &self.pool.species
    }

    /// Per-species conserved-sum weights from the reaction compiler.
    pub fn atom_weights(&self) -> &[f64] {
        &self.tables.atom_weights
    }
}
