mod logging;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use rand::Rng;
use tracing::{error, info};

use rust_atom_chain::{
    read_config, run_ensemble, AtomChain, ChainSimulation, ConfigError, SamplingResults, SimulationConfig,
};

#[derive(Parser, Debug)]
#[command(version, about = "Metropolis sampling of a charged bead-spring chain", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.yml")]
    config: PathBuf,

    /// Override the seed from the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of independent chains to run
    #[arg(long)]
    chains: Option<usize>,

    /// Override the number of Metropolis steps per chain
    #[arg(long)]
    steps: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    logging::setup_logging(args.verbose, args.quiet);

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = read_config(&args.config)?;
    if let Some(steps) = args.steps {
        config.sampling.n_steps = steps;
    }
    if let Some(chains) = args.chains {
        config.n_chains = chains;
    }
    config.validate()?;
    let seed = args
        .seed
        .or(config.seed)
        .unwrap_or_else(|| rand::thread_rng().gen());
    info!(config = ?args.config, seed, "Loaded configuration");

    match config.dimension()? {
        1 => run_chain::<1>(&config, seed),
        2 => run_chain::<2>(&config, seed),
        3 => run_chain::<3>(&config, seed),
        d => Err(ConfigError::UnsupportedDimension(d).into()),
    }
}

fn run_chain<const D: usize>(config: &SimulationConfig, seed: u64) -> Result<(), Box<dyn Error>> {
    let chain = AtomChain::<D>::build(config.points::<D>()?, config.charges.clone(), config.chain)?;

    println!("Metropolis Sampling of a Charged Atom Chain");
    println!("-------------------------------------------");
    println!("Particles: {} ({}D)", chain.len(), D);
    println!("Temperature: {:.4} (k_B T = {:.4})", config.chain.temperature, config.chain.thermal_energy());
    println!(
        "Initial energy: {:.6} (spring {:.6}, LJ {:.6}, Coulomb {:.6})",
        chain.total_energy(),
        chain.spring_energy(),
        chain.lennard_energy(),
        chain.coulomb_energy()
    );
    println!("Steps per chain: {}", config.sampling.n_steps);
    println!("Seed: {}", seed);
    println!();

    if config.n_chains > 1 {
        let results = run_ensemble(&chain, config.sampling, config.n_chains, seed)?;
        for (k, result) in results.iter().enumerate() {
            print_results(&format!("Chain {}", k), result);
        }
        let mean = results.iter().map(|r| r.mean_energy).sum::<f64>() / results.len() as f64;
        println!("Ensemble mean energy: {:.6}", mean);
    } else {
        let mut simulation = ChainSimulation::new(chain, config.sampling, seed)?;
        let results = simulation.run()?;
        print_results("Chain", &results);
    }
    Ok(())
}

fn print_results(label: &str, results: &SamplingResults) {
    println!("{}:", label);
    println!("  Mean energy: {:.6} ± {:.6}", results.mean_energy, results.error);
    println!("  Final energy: {:.6}", results.final_energy);
    println!("  Acceptance rate: {:.2}%", 100.0 * results.acceptance_rate);
    println!("  Final move size: {:.4}", results.final_max_dist);
    println!("  Autocorrelation time: {:.2} steps", results.autocorrelation_time);
}
