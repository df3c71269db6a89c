extern crate coolsim;

use clap::Parser;
use coolsim::output::FileOutput;
use coolsim::run_project;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct CoolsimArgs {
    /// Path to a JSON scenario file
    scenario_file: PathBuf,
    /// Directory the results CSV is written into
    #[arg(long, short, default_value = ".")]
    output_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = CoolsimArgs::parse();

    let scenario = BufReader::new(File::open(&args.scenario_file)?);
    let results = run_project(scenario, FileOutput::new(args.output_dir))?;

    info!(
        "estimated cooling cost: {:.2} THB/month ({:.2}/day, {:.2}/hour of operation)",
        results.cost.monthly, results.cost.daily, results.cost.hourly
    );

    Ok(())
}
