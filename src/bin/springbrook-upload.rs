use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use thiserror::Error;

use springbrook_upload::{init_logging, spawn_run, LogConfig, RunRequest, RunUpdate};

/// Any kind of error when driving a run from the command line.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to initialise logging: {0}")]
    Logging(#[from] std::io::Error),
    #[error("{0}.\nMake sure uploaded files are correct.")]
    Run(String),
    #[error("the worker thread stopped unexpectedly")]
    WorkerPanicked,
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Merge an Export and an RNI extract into a Springbrook upload file."
)]
struct Cli {
    /// Export extract (CSV).
    export: PathBuf,

    /// RNI extract (CSV).
    rni: PathBuf,

    /// Directory the upload file is written to.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Append-only error log.
    #[arg(long, default_value = springbrook_upload::DEFAULT_ERROR_LOG)]
    log_file: PathBuf,

    /// Increase console verbosity, can be repeated.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        status(&format!("Error: {error}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    init_logging(&LogConfig::from_verbosity(cli.verbose).with_error_log(Some(cli.log_file)))?;

    status(&format!("Selected Export file: {}", file_name(&cli.export)));
    status(&format!("Selected RNI file: {}", file_name(&cli.rni)));

    // The output name is fixed here, before any work starts
    let request = RunRequest::for_today(cli.export, cli.rni, &cli.output_dir);
    let output_name = file_name(&request.output_path);

    status("Generation in progress...");
    let (sender, receiver) = crossbeam_channel::unbounded();
    let handle = spawn_run(request, sender);

    let mut outcome = Err(Error::WorkerPanicked);
    for update in receiver.iter() {
        match update {
            RunUpdate::Progress(stage) => status(&format!("[{:>3}%] {stage}", stage.progress())),
            RunUpdate::Complete(summary) => {
                status(&format!("[100%] wrote {} rows", summary.rows));
                status("Generation completed successfully!");
                println!("{output_name} is ready! Download the file and upload to Springbrook.");
                outcome = Ok(());
            }
            RunUpdate::Failed { message } => outcome = Err(Error::Run(message)),
        }
    }
    handle.join().map_err(|_| {
        tracing::error!("pipeline worker panicked");
        Error::WorkerPanicked
    })?;
    if matches!(outcome, Err(Error::WorkerPanicked)) {
        tracing::error!("pipeline worker exited without reporting an outcome");
    }

    outcome
}

/// Print a timestamped status line, as shown in the activity log.
fn status(message: &str) {
    eprintln!("{} - {message}", Local::now().format("%H:%M:%S"));
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
