#[cfg(test)]
mod units {
    use std::f64::consts::PI;

    use crate::config::{ConfigError, ReactionConfig, RuntimeConfig, SubstanceConfig};
    use crate::reaction::equation::{Equation, EquationTerm};
    use crate::reaction::{NO_SPECIES, ReactionTables};

    fn substance(id: &str, type_id: i32, radius: f64) -> SubstanceConfig {
        SubstanceConfig {
            id: id.to_string(),
            type_id,
            color_hue: 0.0,
            radius,
            initial_count: 0,
        }
    }

    fn reaction(equation: &str, ea_forward: f64, ea_reverse: f64) -> ReactionConfig {
        ReactionConfig {
            equation: equation.to_string(),
            reactant_types: Vec::new(),
            product_types: Vec::new(),
            ea_forward,
            ea_reverse,
            frequency_factor: None,
        }
    }

    fn config_with(substances: Vec<SubstanceConfig>, reactions: Vec<ReactionConfig>) -> RuntimeConfig {
        RuntimeConfig {
            substances,
            reactions,
            ..RuntimeConfig::default()
        }
    }

    #[test]
    fn parses_coefficients_and_separators() {
        for text in ["2A = B", "2A -> B", "2A → B", "2A ⇌ B"] {
            let eq = Equation::parse(text).unwrap();
            assert_eq!(
                eq.reactants,
                vec![EquationTerm {
                    coefficient: 2,
                    symbol: "A".to_string()
                }],
                "failed for {text:?}"
            );
            assert_eq!(eq.expanded_reactants(), vec!["A", "A"]);
            assert_eq!(eq.expanded_products(), vec!["B"]);
        }
    }

    #[test]
    fn parses_multi_term_sides() {
        let eq = Equation::parse("A + B = C + D").unwrap();
        assert_eq!(eq.expanded_reactants(), vec!["A", "B"]);
        assert_eq!(eq.expanded_products(), vec!["C", "D"]);
    }

    #[test]
    fn rejects_malformed_equations() {
        for text in ["", "A", "A +", "= B", "A = ", "2 = B", "0A = B", "A & B"] {
            assert!(
                matches!(
                    Equation::parse(text),
                    Err(ConfigError::MalformedEquation(_))
                ),
                "{text:?} should be malformed"
            );
        }
    }

    #[test]
    fn symmetric_pair_reaction_compiles_both_directions() {
        let config = config_with(
            vec![substance("A", 0, 0.3), substance("B", 1, 0.3)],
            vec![reaction("2A = 2B", 30.0, 20.0)],
        );
        let tables = ReactionTables::compile(&config).unwrap();

        assert_eq!(tables.pair_channels.len(), 2);
        assert_eq!(tables.decay_channels.len(), 0);

        let forward = &tables.pair_channels[0];
        assert!(forward.matches(0, 0));
        assert_eq!((forward.p0, forward.p1), (1, 1));
        assert_eq!(forward.ea_forward, 30.0);
        assert_eq!(forward.heat(), -10.0);

        let reverse = &tables.pair_channels[1];
        assert!(reverse.matches(1, 1));
        assert_eq!((reverse.p0, reverse.p1), (0, 0));
        assert_eq!(reverse.ea_forward, 20.0);
        assert_eq!(reverse.heat(), 10.0);
    }

    #[test]
    fn merge_reaction_derives_reverse_decay() {
        let config = config_with(
            vec![substance("A", 0, 0.15), substance("B", 1, 0.15)],
            vec![reaction("2A = B", 20.0, 30.0)],
        );
        let tables = ReactionTables::compile(&config).unwrap();

        assert_eq!(tables.pair_channels.len(), 1);
        let forward = &tables.pair_channels[0];
        assert_eq!((forward.p0, forward.p1), (1, NO_SPECIES));

        assert_eq!(tables.decay_channels.len(), 1);
        let split = &tables.decay_channels[0];
        assert_eq!(split.reactant, 1);
        assert_eq!((split.p0, split.p1), (0, 0));
        assert_eq!(split.ea, 30.0);
        // Forward 2A -> B is exothermic here, so the split consumes energy
        assert_eq!(split.heat, -10.0);

        // A = sigma * v_rel / 2 with sigma = pi (2r)^2, v_rel = sqrt(2) *
        // sqrt(8 kB T / (pi m)) at the configured temperature
        let sigma = PI * 0.3_f64.powi(2);
        let v_rel = 2.0_f64.sqrt() * (8.0 * 0.1 * 300.0 / PI).sqrt();
        let expected = sigma * v_rel / 2.0;
        assert!(
            (split.frequency_factor - expected).abs() < 1e-12,
            "A_rev = {} expected {}",
            split.frequency_factor,
            expected
        );
    }

    #[test]
    fn derived_frequency_tracks_temperature() {
        let mut config = config_with(
            vec![substance("A", 0, 0.15), substance("B", 1, 0.15)],
            vec![reaction("2A = B", 20.0, 30.0)],
        );
        let cold = ReactionTables::compile(&config).unwrap();
        config.temperature = 1200.0;
        let hot = ReactionTables::compile(&config).unwrap();
        let ratio = hot.decay_channels[0].frequency_factor / cold.decay_channels[0].frequency_factor;
        assert!(((ratio - 2.0).abs()) < 1e-12, "A_rev should scale as sqrt(T), ratio = {ratio}");
    }

    #[test]
    fn unimolecular_rename_compiles_with_inverse() {
        let config = config_with(
            vec![substance("A", 0, 0.3), substance("B", 1, 0.3)],
            vec![ReactionConfig {
                frequency_factor: Some(5.0),
                ..reaction("A = B", 12.0, 4.0)
            }],
        );
        let tables = ReactionTables::compile(&config).unwrap();

        assert!(tables.pair_channels.is_empty());
        assert_eq!(tables.decay_channels.len(), 2);

        let forward = &tables.decay_channels[0];
        assert_eq!((forward.reactant, forward.p0, forward.p1), (0, 1, NO_SPECIES));
        assert_eq!(forward.ea, 12.0);
        assert_eq!(forward.heat, -8.0);

        let inverse = &tables.decay_channels[1];
        assert_eq!((inverse.reactant, inverse.p0, inverse.p1), (1, 0, NO_SPECIES));
        assert_eq!(inverse.ea, 4.0);
        assert_eq!(inverse.heat, 8.0);
    }

    #[test]
    fn unimolecular_split_compiles_without_inverse() {
        let config = config_with(
            vec![substance("A", 0, 0.3), substance("B", 1, 0.3)],
            vec![ReactionConfig {
                frequency_factor: Some(2.0),
                ..reaction("B = 2A", 25.0, 10.0)
            }],
        );
        let tables = ReactionTables::compile(&config).unwrap();
        assert_eq!(tables.decay_channels.len(), 1);
        let split = &tables.decay_channels[0];
        assert_eq!((split.reactant, split.p0, split.p1), (1, 0, 0));
        assert_eq!(split.heat, -15.0);
    }

    #[test]
    fn unimolecular_without_frequency_factor_is_rejected() {
        let config = config_with(
            vec![substance("A", 0, 0.3), substance("B", 1, 0.3)],
            vec![reaction("A = B", 12.0, 4.0)],
        );
        assert!(matches!(
            ReactionTables::compile(&config),
            Err(ConfigError::MissingFrequencyFactor { .. })
        ));
    }

    #[test]
    fn explicit_type_lists_bypass_the_parser() {
        let config = config_with(
            vec![substance("A", 0, 0.3), substance("B", 1, 0.3)],
            vec![ReactionConfig {
                equation: "informational only".to_string(),
                reactant_types: vec![0, 0],
                product_types: vec![1],
                ea_forward: 20.0,
                ea_reverse: 30.0,
                frequency_factor: None,
            }],
        );
        let tables = ReactionTables::compile(&config).unwrap();
        assert_eq!(tables.pair_channels.len(), 1);
        assert_eq!(tables.decay_channels.len(), 1);
    }

    #[test]
    fn rejects_unknown_species_and_bad_arity() {
        let substances = vec![substance("A", 0, 0.3), substance("B", 1, 0.3)];

        let unknown = config_with(substances.clone(), vec![reaction("A = X", 1.0, 1.0)]);
        assert!(matches!(
            ReactionTables::compile(&unknown),
            Err(ConfigError::UnknownSpecies { .. })
        ));

        let too_many = config_with(substances, vec![reaction("3A = B", 1.0, 1.0)]);
        assert!(matches!(
            ReactionTables::compile(&too_many),
            Err(ConfigError::InvalidArity { .. })
        ));
    }

    #[test]
    fn atom_weights_for_merge_chain() {
        let config = config_with(
            vec![
                substance("A", 0, 0.3),
                substance("B", 1, 0.3),
                substance("C", 2, 0.3),
            ],
            vec![
                reaction("2A = B", 20.0, 30.0),
                reaction("2B = C", 20.0, 30.0),
            ],
        );
        let tables = ReactionTables::compile(&config).unwrap();
        assert_eq!(tables.atom_weights, vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn atom_weights_stay_unit_for_balanced_reactions() {
        let config = config_with(
            vec![substance("A", 0, 0.3), substance("B", 1, 0.3)],
            vec![reaction("2A = 2B", 30.0, 30.0)],
        );
        let tables = ReactionTables::compile(&config).unwrap();
        assert_eq!(tables.atom_weights, vec![1.0, 1.0]);
    }
}
