use clap::{Parser, Subcommand};
use springsim_core::{Integrator, ScenarioId, Simulation, SimulationConfig, SingleStepReport};
use std::path::{Path, PathBuf};

mod viewer;

#[derive(Parser)]
#[command(name = "springsim")]
#[command(about = "springsim - A small mass-spring simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario for a number of fixed steps and print the final points
    Run {
        /// Scenario name (empty, single-step, euler-oscillator, midpoint-oscillator, spring-house)
        #[arg(short, long, default_value = "spring-house")]
        scenario: ScenarioId,
        /// Number of fixed steps to run
        #[arg(short = 'n', long, default_value_t = 100)]
        steps: u64,
        /// TOML file with simulation parameters
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the integrator chosen by the config or scenario
        #[arg(short, long)]
        integrator: Option<Integrator>,
        /// Enable gravity (only scenarios that allow it are affected)
        #[arg(long)]
        gravity: bool,
    },
    /// Print one Euler step and one midpoint step of the two-point system
    Report {
        /// TOML file with simulation parameters
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Open the interactive viewer
    View {
        #[arg(short, long, default_value = "spring-house")]
        scenario: ScenarioId,
        /// TOML file with simulation parameters, reloaded when it changes
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            scenario,
            steps,
            config,
            integrator,
            gravity,
        } => run_scenario(scenario, steps, config.as_deref(), integrator, gravity),
        Commands::Report { config } => print_report(config.as_deref()),
        Commands::View { scenario, config } => viewer::run(scenario, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<SimulationConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(SimulationConfig::load(path)?),
        None => Ok(SimulationConfig::default()),
    }
}

fn run_scenario(
    scenario: ScenarioId,
    steps: u64,
    config: Option<&Path>,
    integrator: Option<Integrator>,
    gravity: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let mut sim = Simulation::new(config, scenario)?;
    if let Some(integrator) = integrator {
        sim.set_integrator(integrator);
    }
    sim.set_gravity_enabled(gravity);

    for _ in 0..steps {
        sim.step();
    }

    println!(
        "{} after {} steps ({}, dt = {})",
        sim.scenario(),
        sim.current_step,
        sim.config().integrator,
        sim.config().time_step
    );
    for (i, state) in sim.point_states().iter().enumerate() {
        let p = state.position;
        let v = state.velocity;
        println!(
            "p{}{}: position = ({}, {}, {}) velocity = ({}, {}, {})",
            i,
            if state.fixed { " [fixed]" } else { "" },
            p.x,
            p.y,
            p.z,
            v.x,
            v.y,
            v.z
        );
    }

    Ok(())
}

fn print_report(config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let mut world = springsim_core::World::new();
    let report: SingleStepReport = springsim_core::run_single_step_report(&mut world, &config)?;
    print!("{}", report);
    Ok(())
}
