use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "jarvault")]
#[command(about = "Project-local JAR dependency management")]
#[command(version)]
struct Cli {
    /// Project directory (defaults to the nearest directory with a jarvault.json or build.xml)
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Give up on the whole command after this many seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install dependencies into the project
    Add {
        /// Dependency specifiers: artifact, artifact:version or group:artifact:version[:classifier]
        #[arg(required = true)]
        specs: Vec<String>,
        /// Also install the dependencies the artifact's descriptor declares
        #[arg(short, long)]
        transitive: bool,
    },
    /// Remove an installed dependency
    Remove {
        /// Artifact id, or `group:artifact:version` to match within one group
        spec: String,
    },
    /// List installed dependencies
    List,
    /// Search the package index
    Search {
        /// Free-text query
        query: String,
    },
    /// Show what a specifier resolves to without downloading
    Resolve {
        spec: String,
    },
    /// Download an artifact without recording it in the project
    Fetch {
        spec: String,
        /// Destination directory
        #[arg(short, long, default_value = ".")]
        dest: PathBuf,
        /// Also fetch declared dependencies
        #[arg(short, long)]
        transitive: bool,
    },
    /// Show dependencies with newer versions available
    Outdated,
    /// Update every dependency with a newer version available
    Update,
    /// Check installed artifacts for version conflicts and incompatibilities
    Conflicts,
    /// Write jarvault.lock.json with checksums of installed artifacts
    Lock,
    /// Export the dependency list to a file
    Export {
        path: PathBuf,
    },
    /// Install the dependencies listed in an export file
    Import {
        path: PathBuf,
        /// Skip dependencies that are already installed
        #[arg(long)]
        no_overwrite: bool,
    },
    /// Manage the shared artifact cache
    #[command(subcommand)]
    Cache(CacheCommands),
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Remove every cached artifact
    Clean,
    /// Show cache location and size
    Info,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let context = match cli::Context::new(cli.project, cli.timeout) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("\n{}", jarvault::core::error_help::format_error_with_help(&e));
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Add { specs, transitive } => cli::add::run(&context, specs, transitive).await,
        Commands::Remove { spec } => cli::remove::run(&context, &spec).await,
        Commands::List => cli::list::run(&context),
        Commands::Search { query } => cli::search::run(&context, &query).await,
        Commands::Resolve { spec } => cli::resolve::run(&context, &spec).await,
        Commands::Fetch {
            spec,
            dest,
            transitive,
        } => cli::fetch::run(&context, &spec, &dest, transitive).await,
        Commands::Outdated => cli::outdated::run(&context).await,
        Commands::Update => cli::update::run(&context).await,
        Commands::Conflicts => cli::conflicts::run(&context),
        Commands::Lock => cli::lock::run(&context).await,
        Commands::Export { path } => cli::export::run(&context, &path),
        Commands::Import { path, no_overwrite } => {
            cli::import::run(&context, &path, !no_overwrite).await
        }
        Commands::Cache(cmd) => match cmd {
            CacheCommands::Clean => cli::cache::clean(&context),
            CacheCommands::Info => cli::cache::info(&context),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n{}", jarvault::core::error_help::format_error_with_help(&e));
            ExitCode::FAILURE
        }
    }
}
