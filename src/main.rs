mod cli;
mod display;
mod error;
mod form;
mod parser;
mod schedule;
mod store;
mod web;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fs::File;
use std::path::{Path, PathBuf};

use cli::{Cli, Commands};
use display::print_schedule;
use form::write_schedule_csv;
use parser::load_participants_csv;
use schedule::{generate_schedule_with_rng, ScheduleConfig};
use store::Store;

fn setup_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

async fn run_web(port: u16, data_file: &Path, static_dir: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(data_file)?;

    log::info!("Starting web server on port {}", port);
    log::info!("Data file: {}", data_file.display());
    println!("Access the API at http://localhost:{}/api/health", port);

    web::start_server(port, store, Some(static_dir)).await?;
    Ok(())
}

fn run_generate(
    roster_path: &Path,
    config: ScheduleConfig,
    output: Option<&Path>,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    println!("Loading participants from {}...", roster_path.display());
    let drafts = load_participants_csv(roster_path)?;
    let participants = Store::in_memory().bulk_add_participants(&drafts)?;
    println!("Loaded {} participants", participants.len());

    let mut rng: Box<dyn RngCore> = match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };
    let sessions = generate_schedule_with_rng(&participants, Some(&config), rng.as_mut())?;
    log::info!("Generated {} sessions", sessions.len());

    print_schedule(&config, &sessions);

    if let Some(path) = output {
        write_schedule_csv(File::create(path)?, &sessions)?;
        println!("\nSchedule saved to {}", path.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Web {
            port,
            data_file,
            static_dir,
        } => run_web(port, &data_file, static_dir).await,
        Commands::Generate {
            participants,
            start_date,
            day_of_week,
            frequency,
            presenters,
            output,
            seed,
        } => {
            let config = ScheduleConfig {
                start_date: start_date.unwrap_or_else(|| chrono::Local::now().date_naive()),
                day_of_week,
                frequency,
                presenters_per_session: presenters,
            };
            run_generate(&participants, config, output.as_deref(), seed)
        }
    }
}
