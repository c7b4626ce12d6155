//! Blueprint - guided business blueprint wizard for your terminal.
//!
//! Walks through a short set of questions with AI suggestions, then opens
//! the resulting starter blueprint in a block editor.

#![allow(clippy::single_match_else)]

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use blueprint::ai::{DifferentiatorRequest, FollowUpRequest, SuggestionService};
use blueprint::core::Config;
use blueprint::editor::filter_commands;
use blueprint::{tui, App};

/// Guided business blueprint wizard for your terminal
#[derive(Parser)]
#[command(name = "blueprint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the blueprint wizard (default)
    Wizard {
        /// Write the collected answers to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open the starter blueprint in the editor when the wizard completes
        #[arg(short, long)]
        edit: bool,

        /// Where the editor saves the blueprint
        #[arg(short, long)]
        blueprint: Option<PathBuf>,
    },

    /// Open a blueprint file in the block editor
    Edit {
        /// Markup file to edit (created on first save)
        file: PathBuf,
    },

    /// List the block editor commands
    Commands {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Only show commands matching this query
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Ask the suggestion service once and print the result as JSON
    Suggest {
        #[command(subcommand)]
        operation: SuggestOperation,
    },

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum SuggestOperation {
    /// Follow-up question about the audience
    FollowUp {
        /// Customer type (external or internal)
        #[arg(long)]
        customer_type: String,

        /// Core problem being solved
        #[arg(long)]
        problem: String,

        /// Operating location
        #[arg(long)]
        location: String,

        /// Skip providers and answer from the fallbacks
        #[arg(long)]
        offline: bool,
    },

    /// Differentiator suggestions
    Differentiators {
        /// Customer type (external or internal)
        #[arg(long)]
        customer_type: String,

        /// Core problem being solved
        #[arg(long)]
        problem: String,

        /// Differentiators already chosen (repeatable)
        #[arg(long = "selected")]
        selected: Vec<String>,

        /// Request a single additional suggestion
        #[arg(long)]
        single: bool,

        /// Skip providers and answer from the fallbacks
        #[arg(long)]
        offline: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // API keys may live in a .env file
    let _ = dotenvy::dotenv();

    let interactive =
        matches!(cli.command, None | Some(Commands::Wizard { .. } | Commands::Edit { .. }));
    init_logging(cli.verbose, interactive);

    match cli.command {
        None => cmd_wizard(None, false, None)?,
        Some(Commands::Wizard { output, edit, blueprint }) => {
            cmd_wizard(output.as_deref(), edit, blueprint)?;
        }
        Some(Commands::Edit { file }) => cmd_edit(&file)?,
        Some(Commands::Commands { format, query }) => {
            cmd_commands(format, query.as_deref().unwrap_or_default())?;
        }
        Some(Commands::Suggest { operation }) => cmd_suggest(operation)?,
        Some(Commands::Config { path }) => cmd_config(path)?,
        Some(Commands::Completions { shell }) => cmd_completions(shell),
    }

    Ok(())
}

/// Setup logging. The TUI owns the terminal, so interactive runs log to a file.
fn init_logging(verbose: bool, interactive: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    let log_file = interactive
        .then(Config::data_dir)
        .flatten()
        .and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|()| dir.join("blueprint.log")))
        .and_then(|path| std::fs::OpenOptions::new().create(true).append(true).open(path).ok());

    match log_file {
        Some(file) => {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(std::sync::Mutex::new(file)),
                )
                .with(filter)
                .init();
        }
        None if interactive => {
            tracing_subscriber::registry().with(filter).init();
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(false).with_writer(io::stderr))
                .with(filter)
                .init();
        }
    }
}

/// Run the wizard, then write the answers (and the blueprint, if edited).
fn cmd_wizard(output: Option<&Path>, edit: bool, blueprint: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let service = SuggestionService::from_config(&config.ai);
    if !service.is_available() {
        tracing::info!("No AI provider configured, using built-in suggestions");
    }

    let mut app = App::wizard(config, service)?;
    app.edit_on_complete |= edit;
    if let Some(path) = blueprint {
        app.blueprint_path = Some(path);
    }

    let app = tui::run_tui(app)?;

    let Some(answers) = app.completed.as_ref() else {
        println!("Wizard cancelled");
        return Ok(());
    };

    let json = answers.to_json_pretty()?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            println!("Answers saved to {}", path.display());
        }
        None => println!("{json}"),
    }

    if app.is_dirty() {
        if let Some(path) = &app.editor_path {
            eprintln!("Unsaved changes to {} were discarded", path.display());
        }
    }

    Ok(())
}

/// Open a file in the block editor.
fn cmd_edit(file: &Path) -> Result<()> {
    let config = Config::load()?;
    let app = App::editor(config, file)?;
    let app = tui::run_tui(app)?;

    if app.is_dirty() {
        eprintln!("Unsaved changes to {} were discarded", file.display());
    }
    Ok(())
}

/// List the block editor commands.
fn cmd_commands(format: Format, query: &str) -> Result<()> {
    let commands = filter_commands(query);

    match format {
        Format::Json => {
            let json = serde_json::to_string_pretty(&commands)?;
            println!("{json}");
        }
        Format::Text => {
            for cmd in &commands {
                println!("{:>3} {:<16} {}", cmd.icon.glyph(), cmd.label, cmd.description);
            }
            println!("\nTotal: {} commands", commands.len());
        }
    }

    Ok(())
}

/// Call the suggestion service once.
fn cmd_suggest(operation: SuggestOperation) -> Result<()> {
    let config = Config::load()?;
    let service = |offline: bool| {
        if offline {
            SuggestionService::offline()
        } else {
            SuggestionService::from_config(&config.ai)
        }
    };

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;

    let outcome = rt.block_on(async {
        match operation {
            SuggestOperation::FollowUp { customer_type, problem, location, offline } => {
                let request = FollowUpRequest::new(customer_type, problem, location);
                service(offline).follow_up(&request).await
            }
            SuggestOperation::Differentiators { customer_type, problem, selected, single, offline } => {
                let request = if single {
                    DifferentiatorRequest::incremental(customer_type, problem, selected)
                } else {
                    DifferentiatorRequest {
                        selected_features: selected,
                        ..DifferentiatorRequest::initial(customer_type, problem)
                    }
                };
                service(offline).differentiators(&request).await
            }
        }
    });

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

/// Show configuration.
fn cmd_config(show_path: bool) -> Result<()> {
    if show_path {
        if let Some(path) = Config::config_path() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let config = Config::load()?;
    let toml = toml::to_string_pretty(&config)?;
    println!("{toml}");

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "blueprint", &mut io::stdout());
}
