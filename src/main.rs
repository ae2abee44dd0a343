use clap::{Parser, Subcommand};
use sharpen_batch::config::{self, ConfigOverrides, ProcessingOverrides};
use sharpen_batch::process::{self, ProcessConfig};
use sharpen_batch::{logger, output};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sharpen-batch")]
#[command(version)]
#[command(about = "Sharpen a directory of numerically named images")]
#[command(long_about = "\
Sharpen a directory of numerically named images

Every file named <digits>.<extension> directly inside the input directory is
handled in numeric order (1, 2, 10, ...). Files smaller than --min-bytes are
copied unchanged; the rest are sharpened with a 3x3 kernel
(centre 1+4a, orthogonal neighbours -a, border pixels untouched) and written
as PNG under the same filename in the output directory.

Precedence: command-line flags > --config file > built-in defaults.
Run 'sharpen-batch gen-config' to print a documented config file.")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Input directory [default: imagenes]
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output directory, created if missing [default: imagenes/enhanced]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Sharpen amount a [default: 0.45]
    #[arg(long, allow_negative_numbers = true)]
    amount: Option<f64>,

    /// Files below this many bytes are copied unchanged [default: 150000]
    #[arg(long)]
    min_bytes: Option<u64>,

    /// Input file extension without the dot [default: png]
    #[arg(long)]
    extension: Option<String>,

    /// Parallel workers; 0 = one per CPU core [default: 1]
    #[arg(long)]
    jobs: Option<usize>,

    /// Skip files that fail instead of aborting the run
    #[arg(long)]
    keep_going: bool,

    /// Write a JSON report of every file's outcome
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log stage timings and per-file diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a stock config file with all options documented
    GenConfig,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input_dir: self.input.clone(),
            output_dir: self.output.clone(),
            amount: self.amount,
            min_bytes: self.min_bytes,
            extension: self.extension.clone(),
            processing: ProcessingOverrides {
                max_processes: self.jobs,
                keep_going: self.keep_going.then_some(true),
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(Command::GenConfig) = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::load_config(cli.config.as_deref(), &cli.overrides())?;
    let process_config = ProcessConfig::from_config(&config)?;

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_process_event(&event);
        }
    });
    let result = process::process(&process_config, Some(tx));
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;
    let report = result?;

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .map_err(|e| format!("Failed to write report {}: {e}", path.display()))?;
    }

    println!("{}", output::format_summary(&report));
    report.check()?;
    Ok(())
}
