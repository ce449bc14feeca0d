//! # Reaction Table Compiler
//!
//! Translates the user-facing reaction list into the two flat tables the
//! stepper consumes: pair channels (matched against colliding type pairs)
//! and decay channels (matched against single active slots). Compilation
//! also synthesizes the reverse direction of every reaction:
//!
//! - two species in, two out: a mirrored pair channel with the barriers
//!   swapped;
//! - two species in, one out: the reverse is a first-order decay whose
//!   frequency factor is derived from collision theory, `A = σ·v̄_rel/2`,
//!   so the stochastic kinetics reproduce the equilibrium constant implied
//!   by the barrier difference;
//! - one species in, one out: a mirrored decay channel with the barriers
//!   swapped.
//!
//! The compiler additionally solves a per-species atom weight so that the
//! weighted particle sum is conserved by every declared reaction (e.g.
//! `ν_A = 1, ν_B = 2` for `2A ⇌ B`). The stepper never reads the weights;
//! they exist for diagnostics and conservation tests.

pub mod equation;
pub mod tests;

use std::collections::HashMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ReactionConfig, RuntimeConfig};
use crate::reaction::equation::Equation;

/// Marks "no product in this slot" / "annihilate the slot".
pub const NO_SPECIES: i32 = -1;

/// A compiled two-body channel.
///
/// Reactant matching is order-insensitive; either product may be
/// [`NO_SPECIES`], which frees the corresponding slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairChannel {
    pub r0: i32,
    pub r1: i32,
    pub p0: i32,
    pub p1: i32,
    pub ea_forward: f64,
    pub ea_reverse: f64,
}

impl PairChannel {
    /// Order-insensitive reactant match.
    #[inline]
    pub fn matches(&self, a: i32, b: i32) -> bool {
        (self.r0 == a && self.r1 == b) || (self.r0 == b && self.r1 == a)
    }

    /// Reaction heat released along the impact normal (positive exothermic).
    #[inline]
    pub fn heat(&self) -> f64 {
        self.ea_reverse - self.ea_forward
    }
}

/// A compiled first-order channel.
///
/// `p1` is [`NO_SPECIES`] for a plain rename; otherwise the channel splits
/// the parent into two fragments. `heat` is positive for an exothermic
/// decay (energy fed into the fragment separation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayChannel {
    pub reactant: i32,
    pub p0: i32,
    pub p1: i32,
    pub ea: f64,
    pub frequency_factor: f64,
    pub heat: f64,
}

/// The compiled reaction set.
#[derive(Debug, Clone, Default)]
pub struct ReactionTables {
    pub pair_channels: Vec<PairChannel>,
    pub decay_channels: Vec<DecayChannel>,
    /// Conserved-sum weight per species, indexed by type id.
    pub atom_weights: Vec<f64>,
}

/// A reaction with symbols resolved to type ids and coefficients expanded,
/// the common form both table emission and weight solving work from.
struct ResolvedReaction {
    reactants: Vec<i32>,
    products: Vec<i32>,
    ea_forward: f64,
    ea_reverse: f64,
    frequency_factor: Option<f64>,
    equation: String,
}

impl ReactionTables {
    /// Compiles the reaction list of `config` into flat channel tables.
    ///
    /// Fails without side effects on malformed equations, unknown species,
    /// bad arity, negative barriers, or a missing frequency factor for a
    /// first-order reaction. The derived reverse-decay rates depend on the
    /// configured temperature, so the tables must be recompiled whenever
    /// the setpoint changes.
    pub fn compile(config: &RuntimeConfig) -> Result<Self, ConfigError> {
        let symbol_table: HashMap<&str, i32> = config
            .substances
            .iter()
            .map(|s| (s.id.as_str(), s.type_id))
            .collect();
        let species_count = config.substances.len();
        let radii = config.radii_by_type();

        let resolved: Vec<ResolvedReaction> = config
            .reactions
            .iter()
            .map(|reaction| resolve(reaction, &symbol_table, species_count))
            .collect::<Result<_, _>>()?;

        let mut tables = ReactionTables {
            pair_channels: Vec::new(),
            decay_channels: Vec::new(),
            atom_weights: solve_atom_weights(&resolved, species_count),
        };

        for reaction in &resolved {
            match (reaction.reactants.len(), reaction.products.len()) {
                (2, 2) => {
                    let (r0, r1) = (reaction.reactants[0], reaction.reactants[1]);
                    let (p0, p1) = (reaction.products[0], reaction.products[1]);
                    tables.pair_channels.push(PairChannel {
                        r0,
                        r1,
                        p0,
                        p1,
                        ea_forward: reaction.ea_forward,
                        ea_reverse: reaction.ea_reverse,
                    });
                    tables.pair_channels.push(PairChannel {
                        r0: p0,
                        r1: p1,
                        p0: r0,
                        p1: r1,
                        ea_forward: reaction.ea_reverse,
                        ea_reverse: reaction.ea_forward,
                    });
                }
                (2, 1) => {
                    let (r0, r1) = (reaction.reactants[0], reaction.reactants[1]);
                    let product = reaction.products[0];
                    tables.pair_channels.push(PairChannel {
                        r0,
                        r1,
                        p0: product,
                        p1: NO_SPECIES,
                        ea_forward: reaction.ea_forward,
                        ea_reverse: reaction.ea_reverse,
                    });
                    // Reverse of a merge is a split; its rate prefactor is
                    // tied to the forward collision frequency so that the
                    // two-way flux balances at the thermodynamic K.
                    let frequency_factor = derived_split_frequency(
                        radii[r0 as usize],
                        radii[r1 as usize],
                        config.temperature,
                        config.boltzmann_k,
                        config.mass,
                    );
                    tables.decay_channels.push(DecayChannel {
                        reactant: product,
                        p0: r0,
                        p1: r1,
                        ea: reaction.ea_reverse,
                        frequency_factor,
                        heat: reaction.ea_forward - reaction.ea_reverse,
                    });
                }
                (1, n_products @ (1 | 2)) => {
                    let frequency_factor = reaction.frequency_factor.ok_or_else(|| {
                        ConfigError::MissingFrequencyFactor {
                            equation: reaction.equation.clone(),
                        }
                    })?;
                    let reactant = reaction.reactants[0];
                    let p0 = reaction.products[0];
                    let p1 = if n_products == 2 {
                        reaction.products[1]
                    } else {
                        NO_SPECIES
                    };
                    tables.decay_channels.push(DecayChannel {
                        reactant,
                        p0,
                        p1,
                        ea: reaction.ea_forward,
                        frequency_factor,
                        heat: reaction.ea_reverse - reaction.ea_forward,
                    });
                    if n_products == 1 {
                        tables.decay_channels.push(DecayChannel {
                            reactant: p0,
                            p0: reactant,
                            p1: NO_SPECIES,
                            ea: reaction.ea_reverse,
                            frequency_factor,
                            heat: reaction.ea_forward - reaction.ea_reverse,
                        });
                    }
                }
                _ => {
                    return Err(ConfigError::InvalidArity {
                        equation: reaction.equation.clone(),
                    });
                }
            }
        }

        Ok(tables)
    }
}

/// Collision-theory frequency factor for the derived reverse decay of a
/// two-in-one-out reaction: `A = σ·v̄_rel/2` with `σ = π·(r0+r1)²` and
/// `v̄_rel = √2·√(8·k_B·T/(π·m))`.
fn derived_split_frequency(
    radius_0: f64,
    radius_1: f64,
    temperature: f64,
    boltzmann_k: f64,
    mass: f64,
) -> f64 {
    let sigma = PI * (radius_0 + radius_1).powi(2);
    let v_rel_mean = 2.0_f64.sqrt() * (8.0 * boltzmann_k * temperature / (PI * mass)).sqrt();
    sigma * v_rel_mean / 2.0
}

fn resolve(
    reaction: &ReactionConfig,
    symbol_table: &HashMap<&str, i32>,
    species_count: usize,
) -> Result<ResolvedReaction, ConfigError> {
    let (reactants, products) =
        if !reaction.reactant_types.is_empty() && !reaction.product_types.is_empty() {
            (
                reaction.reactant_types.clone(),
                reaction.product_types.clone(),
            )
        } else {
            let parsed = Equation::parse(&reaction.equation)?;
            let lookup = |symbols: Vec<&str>| -> Result<Vec<i32>, ConfigError> {
                symbols
                    .into_iter()
                    .map(|symbol| {
                        symbol_table.get(symbol).copied().ok_or_else(|| {
                            ConfigError::UnknownSpecies {
                                symbol: symbol.to_string(),
                                equation: reaction.equation.clone(),
                            }
                        })
                    })
                    .collect()
            };
            (
                lookup(parsed.expanded_reactants())?,
                lookup(parsed.expanded_products())?,
            )
        };

    for side in [&reactants, &products] {
        if side.is_empty() || side.len() > 2 {
            return Err(ConfigError::InvalidArity {
                equation: reaction.equation.clone(),
            });
        }
        for &type_id in side {
            if type_id < 0 || type_id as usize >= species_count {
                return Err(ConfigError::InvalidTypeId {
                    id: reaction.equation.clone(),
                    type_id,
                });
            }
        }
    }

    Ok(ResolvedReaction {
        reactants,
        products,
        ea_forward: reaction.ea_forward,
        ea_reverse: reaction.ea_reverse,
        frequency_factor: reaction.frequency_factor,
        equation: reaction.equation.clone(),
    })
}

/// Solves per-species atom weights by fixpoint.
///
/// All weights start at 1. Any reaction whose product side is a single
/// species pins that species to the weighted sum of its reactants (and
/// symmetrically for a single-reactant side), which resolves chains such as
/// `2A = B`, `2B = C` to `ν = [1, 2, 4]`. Balanced reactions impose no
/// constraint. The loop is bounded; an inconsistent reaction set simply
/// leaves the last assignment in place.
fn solve_atom_weights(reactions: &[ResolvedReaction], species_count: usize) -> Vec<f64> {
    let mut weights = vec![1.0; species_count];

    for _ in 0..species_count.max(1) {
        let mut changed = false;
        for reaction in reactions {
            let (target, source) = if reaction.products.len() == 1 && reaction.reactants.len() > 1 {
                (reaction.products[0] as usize, &reaction.reactants)
            } else if reaction.reactants.len() == 1 && reaction.products.len() > 1 {
                (reaction.reactants[0] as usize, &reaction.products)
            } else {
                continue;
            };
            let value: f64 = source.iter().map(|&t| weights[t as usize]).sum();
            if (weights[target] - value).abs() > f64::EPSILON {
                weights[target] = value;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    weights
}
