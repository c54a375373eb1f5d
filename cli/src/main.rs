use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use lsp_bindgen::{check_path, emission_names, gaps_to_json, generate_from_path, load_options, load_schema};
use lsp_bindgen::{BindgenError, Options};

#[derive(Parser)]
#[command(name = "lspbind")]
#[command(about = "Generate C++ bindings from the LSP meta-model", long_about = None)]
struct Cli {
    /// Verbose output; repeat for more (-v, -vv, -vvv). `RUST_LOG` wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Generator options file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a `metaModel.json` and write the header and implementation files
    Generate {
        /// Input `metaModel.json`
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Emit the definitions into the header instead of a separate file
        #[arg(long)]
        single_file: bool,
    },

    /// Compile without writing, and list the unsupported constructs
    Check {
        /// Input `metaModel.json`
        #[arg(short, long)]
        input: PathBuf,

        /// Print the unsupported constructs as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the emission order of the generated types
    Order {
        /// Input `metaModel.json`
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), BindgenError> {
    let mut options = load_options(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate { input, output, single_file } => {
            if single_file {
                options.source_path = None;
            }
            let generated = generate_from_path(&input, &output, &options)?;
            for path in &generated.written {
                println!("Generated {}", path.display());
            }
            if !generated.gaps.is_empty() {
                println!("{} unsupported construct(s), run `lspbind check` for details", generated.gaps.len());
            }
            Ok(())
        }

        Commands::Check { input, json } => {
            let gaps = check_path(&input, &options)?;
            if json {
                println!("{}", gaps_to_json(&gaps)?);
            } else {
                for gap in &gaps {
                    println!("{}", gap);
                }
                println!("{} OK, {} unsupported construct(s)", input.display(), gaps.len());
            }
            Ok(())
        }

        Commands::Order { input } => {
            let schema = load_schema(&input)?;
            for name in emission_names(&schema, &options)? {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
