use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sheetmaster::{CompileError, Config, DEFAULT_CONFIG_FILE, WriteMode};
use sheetmaster_schema::TypeTable;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "sheetmaster",
    version,
    about = "Compile spreadsheet master data into typed Rust modules"
)]
struct Cli {
    /// Project config file.
    #[arg(long, short, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// More log output (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate record modules, `masters.json` and `mod.rs` from workbook headers.
    Compile(CompileArgs),
    /// Decode data rows into one JSON asset per compiled master.
    Materialize,
    /// Regenerate `mod.rs` from `masters.json`.
    Aggregate,
    /// Print the schemas one workbook would compile to, as YAML.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Write nothing; exit non-zero if any generated file is out of date.
    #[arg(long)]
    check: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Workbook file to read.
    workbook: PathBuf,
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &Path) -> Result<Config> {
    Config::load(path).with_context(|| format!("failed to load config {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Compile(args) => run_compile(&cli.config, args),
        Command::Materialize => run_materialize(&cli.config),
        Command::Aggregate => {
            let config = load_config(&cli.config)?;
            let changed = sheetmaster::aggregate(&config).context("aggregate failed")?;
            println!(
                "{} {}",
                if changed { "wrote" } else { "unchanged" },
                config.generated_dir().join(sheetmaster::AGGREGATE_FILE).display()
            );
            Ok(())
        }
        Command::Inspect(args) => run_inspect(&cli.config, args),
    }
}

fn run_compile(config_path: &Path, args: CompileArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let mode = if args.check {
        WriteMode::Check
    } else {
        WriteMode::Apply
    };

    let report = match sheetmaster::compile_with(&config, mode) {
        Ok(report) => report,
        Err(CompileError::Stale { files }) => {
            for file in &files {
                println!("stale: {}", file.display());
            }
            anyhow::bail!(
                "{} generated file(s) out of date, run `sheetmaster compile`",
                files.len()
            );
        }
        Err(err) => return Err(err).context("compile failed"),
    };

    for path in &report.changed {
        println!("wrote {}", path.display());
    }
    for path in &report.pruned {
        println!("removed {}", path.display());
    }
    println!(
        "{} master(s), {} file(s) changed, {} unchanged",
        report.masters.len(),
        report.changed.len(),
        report.unchanged
    );
    Ok(())
}

fn run_materialize(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let report = sheetmaster::materialize(&config).context("materialize failed")?;
    for master in &report.masters {
        println!(
            "{}: {} record(s), {} collision(s) -> {}",
            master.master,
            master.records,
            master.collisions.len(),
            master.asset.display()
        );
        for collision in &master.collisions {
            println!(
                "  duplicate key {} at records {} and {}",
                collision.key, collision.first_position, collision.position
            );
        }
    }
    Ok(())
}

fn run_inspect(config_path: &Path, args: InspectArgs) -> Result<()> {
    // Configured aliases and enums apply when a config is around.
    let types = if config_path.exists() {
        load_config(config_path)?.type_table()
    } else {
        TypeTable::new()
    };
    let schemas = sheetmaster::inspect(&args.workbook, &types)
        .with_context(|| format!("failed to inspect {}", args.workbook.display()))?;
    let yaml = serde_yaml::to_string(&schemas).context("failed to render schemas")?;
    print!("{yaml}");
    Ok(())
}
