extern crate ppm;

use clap::Parser;
use ppm::output::FileOutput;
use ppm::run_project;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct PpmArgs {
    /// Scenario configuration file (JSON)
    input_file: PathBuf,
    /// Directory the generated patterns and artifacts are written into
    #[arg(long, short, default_value = "ppm_output")]
    output_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = PpmArgs::parse();
    let input = BufReader::new(File::open(&args.input_file)?);
    run_project(input, FileOutput::new(args.output_dir))
}
