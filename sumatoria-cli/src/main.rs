use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use sumatoria_finance::MatchKind;
use tracing_subscriber::EnvFilter;

mod config;
mod process;
mod state;

use process::ProcessArgs;

#[derive(Parser, Debug)]
#[command(
    name = "sumatoria",
    version,
    about = "Totals tax and withholding concepts from card settlement statements"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (default: ~/.sumatoria/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read settlement statements and write the summary reports
    Process {
        /// Statement files (PDF or extracted text)
        files: Vec<PathBuf>,

        /// Where to write the reports (default: report.output_dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Skip informe_sumatoria.pdf
        #[arg(long)]
        no_pdf: bool,

        /// Skip the CSV exports
        #[arg(long)]
        no_csv: bool,

        /// Add net base rows above the VAT rows
        #[arg(long)]
        net_base: bool,

        /// Also print every kept line with its category
        #[arg(long)]
        detail: bool,
    },

    /// Print the effective rule table
    Rules,

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective config as TOML
    Show,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let explicit = cli.config.as_deref();

    match cli.command {
        Command::Process {
            files,
            out_dir,
            no_pdf,
            no_csv,
            net_base,
            detail,
        } => {
            let (_, cfg) = config::load_effective_config(explicit)?;
            process::run_process(
                &cfg,
                ProcessArgs {
                    files,
                    out_dir,
                    no_pdf,
                    no_csv,
                    net_base,
                    detail,
                },
            )?;
        }

        Command::Rules => {
            let (_, cfg) = config::load_effective_config(explicit)?;
            print_rules(&cfg)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(explicit)?,
            ConfigCommand::Show => {
                let (path, cfg) = config::load_effective_config(explicit)?;
                println!("# {}", path.display());
                print!("{}", toml::to_string_pretty(&cfg)?);
            }
        },
    }

    Ok(())
}

fn print_rules(cfg: &config::Config) -> Result<()> {
    let classifier = cfg.classifier()?;
    let table = classifier.table();

    println!("{} rules (first match wins)\n", table.len());
    for (i, rule) in table.rules().iter().enumerate() {
        let kind = match rule.kind() {
            MatchKind::Exact => "exact",
            MatchKind::Contains => "contains",
        };
        let tier = if rule.is_fallback() { " (fallback)" } else { "" };
        println!(
            "{:>3}. {:<8} {:<40} -> {}{}",
            i + 1,
            kind,
            rule.pattern(),
            rule.target().label(),
            tier
        );
    }

    let suppression = classifier.suppression();
    if !suppression.is_empty() {
        println!("\n{} suppressed concept(s)", suppression.len());
    }
    Ok(())
}
