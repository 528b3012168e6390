mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{cache::CacheSubcommand, config::ConfigSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "crew",
    about = "Turn your Claude Code agents into a sheet of trading cards",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .claude/ or .git/)
    #[arg(long, global = true, env = "CREW_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich every agent with a persona and render the card sheet
    Generate {
        /// Where to write the PNG (default: render.output in crew.yaml)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Read agents from this directory instead of ~/.claude and .claude
        #[arg(long)]
        agents_dir: Option<PathBuf>,
        /// Skip agents shipped by plugins
        #[arg(long)]
        no_plugins: bool,
    },

    /// List discovered agents
    List {
        /// Read agents from this directory instead of ~/.claude and .claude
        #[arg(long)]
        agents_dir: Option<PathBuf>,
        /// Skip agents shipped by plugins
        #[arg(long)]
        no_plugins: bool,
    },

    /// List discovered skills
    Skills,

    /// Draft a new project agent with Claude
    New {
        /// What the agent should do
        idea: String,
        /// Model tier for the new agent: sonnet, opus, or haiku
        #[arg(long)]
        model: Option<String>,
        /// UI colour tag
        #[arg(long)]
        color: Option<String>,
    },

    /// Inspect or reset the persona cache
    Cache {
        #[command(subcommand)]
        subcommand: CacheSubcommand,
    },

    /// Inspect crew.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Serve the HTTP API
    Serve {
        /// Port to listen on (0 picks a free port)
        #[arg(long, default_value_t = 3141)]
        port: u16,
        /// Don't open the card sheet in a browser
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Generate {
            output,
            agents_dir,
            no_plugins,
        } => cmd::generate::run(&root, output, agents_dir, no_plugins, cli.json),
        Commands::List {
            agents_dir,
            no_plugins,
        } => cmd::list::run(&root, agents_dir, no_plugins, cli.json),
        Commands::Skills => cmd::skills::run(&root, cli.json),
        Commands::New { idea, model, color } => {
            cmd::new::run(&root, &idea, model.as_deref(), color.as_deref(), cli.json)
        }
        Commands::Cache { subcommand } => cmd::cache::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Serve { port, no_open } => cmd::serve::run(&root, port, no_open),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
