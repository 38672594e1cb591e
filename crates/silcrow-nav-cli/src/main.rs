mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snav", about = "Parse and generate paths against a route file")]
struct Cli {
    /// TOML route file
    #[arg(long, default_value = "routes.toml")]
    routes: PathBuf,

    /// Log compiled matchers and parse attempts
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a path and print the navigation as JSON
    Parse {
        path: String,
    },
    /// Generate the path for a destination
    Stringify {
        destination: String,
        /// Singular parameter (repeatable), e.g. -p noteId=3
        #[arg(short = 'p', long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,
        /// Plural parameter (repeatable), e.g. --list photoIds=1,2,3
        #[arg(long = "list", value_name = "NAME=A,B")]
        lists: Vec<String>,
        /// Remaining path appended after the route
        #[arg(long)]
        rest: Option<String>,
    },
    /// List routes in parse order
    Routes,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = commands::load_table(&cli.routes).and_then(|table| match cli.command {
        Commands::Parse { path } => commands::parse::run(&table, &path),
        Commands::Stringify {
            destination,
            params,
            lists,
            rest,
        } => commands::stringify::run(&table, &destination, &params, &lists, rest.as_deref()),
        Commands::Routes => commands::routes::run(&table),
    });

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
