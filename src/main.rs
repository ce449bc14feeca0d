mod cli;

use std::time::Instant;

use clap::Parser;
use log::{error, info};

use kinetics_lib::config::{ReactionConfig, RuntimeConfig, SubstanceConfig};
use kinetics_lib::engine::Engine;

use crate::cli::Cli;

fn scenario_config(args: &Cli) -> RuntimeConfig {
    RuntimeConfig {
        temperature: args.temperature,
        thermostat_enabled: !args.adiabatic,
        box_size: args.box_size,
        dt: args.dt,
        max_particles: args.particles,
        substances: vec![
            SubstanceConfig {
                id: "A".to_string(),
                type_id: 0,
                color_hue: 0.0,
                radius: args.radius,
                initial_count: args.particles,
            },
            SubstanceConfig {
                id: "B".to_string(),
                type_id: 1,
                color_hue: 210.0,
                radius: args.radius,
                initial_count: 0,
            },
        ],
        reactions: vec![ReactionConfig {
            equation: "2A ⇌ 2B".to_string(),
            reactant_types: vec![0, 0],
            product_types: vec![1, 1],
            ea_forward: args.ea_forward,
            ea_reverse: args.ea_reverse,
            frequency_factor: None,
        }],
        ..RuntimeConfig::default()
    }
}

fn main() {
    env_logger::init();
    let args = Cli::parse();

    let mut engine = match Engine::new(scenario_config(&args)) {
        Ok(engine) => engine,
        Err(error) => {
            error!("invalid configuration: {error}");
            std::process::exit(1);
        }
    };

    info!(
        "running {} steps of 2A ⇌ 2B at T = {} ({} particles, box {})",
        args.steps, args.temperature, args.particles, args.box_size
    );

    let started = Instant::now();
    let mut completed = 0;
    while completed < args.steps {
        let batch = args.report_interval.min(args.steps - completed);
        engine.step_batch(batch);
        completed += batch;

        let frame = engine.snapshot();
        info!(
            "step {completed}: t = {:.3}, counts = {:?}, T_inst = {:.1}",
            frame.time, frame.substance_counts, frame.current_temperature
        );
    }

    let elapsed = started.elapsed().as_secs_f64();
    info!(
        "completed {} steps in {elapsed:.2}s ({:.1} steps/s)",
        args.steps,
        args.steps as f64 / elapsed
    );

    let frame = engine.snapshot();
    match serde_json::to_string_pretty(&frame) {
        Ok(json) => println!("{json}"),
        Err(error) => error!("failed to serialize final frame: {error}"),
    }
}
