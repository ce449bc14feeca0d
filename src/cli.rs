//! # CLI Module - Headless Runner Arguments
//!
//! Command-line surface for the headless demo binary. The binary builds the
//! default reversible scenario `2A ⇌ 2B`, runs a fixed number of steps while
//! logging aggregate statistics, and prints the final snapshot frame as JSON
//! on stdout.
//!
//! **Usage**:
//! ```bash
//! arrhenius-rs --steps 500 --temperature 400 --particles 10000
//! RUST_LOG=info arrhenius-rs --ea-forward 20 --ea-reverse 30
//! ```

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of simulation steps to run
    #[arg(short, long, default_value_t = 500)]
    pub steps: usize,

    /// Thermostat target temperature
    #[arg(short, long, default_value_t = 300.0)]
    pub temperature: f64,

    /// Disable the thermostat (adiabatic run)
    #[arg(long, default_value_t = false)]
    pub adiabatic: bool,

    /// Initial population of species A
    #[arg(short, long, default_value_t = 10_000)]
    pub particles: usize,

    /// Side length of the periodic box
    #[arg(short, long, default_value_t = 40.0)]
    pub box_size: f64,

    /// Hard-sphere radius of both species
    #[arg(short, long, default_value_t = 0.3)]
    pub radius: f64,

    /// Forward activation energy of 2A -> 2B
    #[arg(long, default_value_t = 30.0)]
    pub ea_forward: f64,

    /// Reverse activation energy of 2B -> 2A
    #[arg(long, default_value_t = 30.0)]
    pub ea_reverse: f64,

    /// Time increment per step
    #[arg(long, default_value_t = 0.002)]
    pub dt: f64,

    /// Steps between progress reports
    #[arg(long, default_value_t = 100)]
    pub report_interval: usize,
}
