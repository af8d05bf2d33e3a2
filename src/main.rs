//! RepoLens - Multi-Persona Repository Analysis
//!
//! Walks a repository at several granularities, asks a model for
//! persona-flavored analyses, and caches the results as notes so repeat
//! runs only pay for what went stale.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use repolens::{
    analysis::{render_outcome, render_run, render_status, AnalysisOrchestrator, OutputFormat, StatusReport},
    config::RepoLensConfig,
    model::{CallOptions, HttpModelClient, ModelClient},
    notes::{NoteLevel, NoteStore},
    personas::PersonaStore,
    traversal::TraversalEngine,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "repolens")]
#[command(version)]
#[command(about = "Multi-persona repository analysis with cached notes")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "REPOLENS_CONFIG")]
    config: Option<PathBuf>,

    /// Repository root to analyze
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Model ID override
    #[arg(long)]
    model: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Maximum traversal depth override
    #[arg(long)]
    max_depth: Option<usize>,

    /// Additional excluded path substring (repeatable)
    #[arg(long = "exclude")]
    excludes: Vec<String>,

    /// Skip file-level analysis
    #[arg(long)]
    no_files: bool,

    /// Skip directory-level analysis
    #[arg(long)]
    no_directories: bool,

    /// Skip module-manifest analysis
    #[arg(long)]
    no_modules: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// First full analysis: clear existing notes, run every persona
    Init,

    /// Re-run every persona, reusing notes that are still fresh
    Update,

    /// Run a single persona's pass
    Run {
        /// Persona id
        #[arg(short, long, default_value = "code-reviewer")]
        agent: String,
    },

    /// Analyze one path with maximum surrounding context
    DeepDive {
        /// Repository-relative path
        path: PathBuf,

        /// Persona id
        #[arg(short, long, default_value = "code-reviewer")]
        agent: String,
    },

    /// Report cached note counts and ages without any model calls
    Status {
        /// Restrict to one persona id
        #[arg(short, long)]
        agent: Option<String>,
    },

    /// Synthesize coaching guidance from already-recorded notes
    Coach {
        /// Persona id
        #[arg(short, long, default_value = "tech-lead")]
        agent: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("repolens={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = load_config(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);

    let personas = persona_store(cli.config.as_deref());
    let store = Arc::new(NoteStore::new(config.storage.notes_dir.clone()));

    match &cli.command {
        Commands::Status { agent } => {
            // No model client, no credential needed
            let ids: Vec<String> = match agent {
                Some(id) => vec![personas.get(id)?.id.clone()],
                None => personas.list().iter().map(|p| p.id.clone()).collect(),
            };
            let mut reports = Vec::new();
            for id in ids {
                let notes = store.list_all(&id).await;
                if !notes.is_empty() || agent.is_some() {
                    reports.push(StatusReport::from_notes(id, &notes));
                }
            }
            print!("{}", render_status(&reports, cli.format)?);
            return Ok(());
        }
        _ => {}
    }

    let orchestrator = build_orchestrator(&config, &cli, store.clone())?;

    match cli.command {
        Commands::Init => {
            for persona in personas.list() {
                store
                    .clear_owner(&persona.id)
                    .await
                    .with_context(|| format!("Failed to clear notes for {}", persona.id))?;
            }
            run_all_personas(&orchestrator, &personas, &config, cli.format).await?;
        }
        Commands::Update => {
            run_all_personas(&orchestrator, &personas, &config, cli.format).await?;
        }
        Commands::Run { agent } => {
            let persona = personas.get(&agent)?;
            let result = orchestrator.run(persona, &[persona.level]).await?;
            print!("{}", render_run(&result, cli.format)?);
        }
        Commands::DeepDive { path, agent } => {
            let persona = personas.get(&agent)?;
            let outcome = orchestrator.analyze_path(persona, &path).await;
            print!("{}", render_outcome(&outcome, cli.format)?);
        }
        Commands::Coach { agent } => {
            let persona = personas.get(&agent)?;
            println!("{}", orchestrator.coach(persona).await);
        }
        Commands::Status { .. } => unreachable!(),
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<RepoLensConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config {}", path.display()))
        }
        None => Ok(RepoLensConfig::default()),
    }
}

fn apply_overrides(config: &mut RepoLensConfig, cli: &Cli) {
    if let Some(depth) = cli.max_depth {
        config.analysis.max_depth = depth;
    }
    config.analysis.exclusions.extend(cli.excludes.iter().cloned());
    if cli.no_files {
        config.analysis.include_files = false;
    }
    if cli.no_directories {
        config.analysis.include_directories = false;
    }
    if cli.no_modules {
        config.analysis.include_modules = false;
    }
}

/// Custom personas live in `personas.json` next to the config file.
fn persona_store(config_path: Option<&Path>) -> PersonaStore {
    let custom = config_path
        .and_then(Path::parent)
        .map(|dir| dir.join("personas.json"))
        .filter(|path| path.exists());

    match custom {
        Some(path) => PersonaStore::with_custom_file(&path),
        None => PersonaStore::new(),
    }
}

fn build_orchestrator(
    config: &RepoLensConfig,
    cli: &Cli,
    store: Arc<NoteStore>,
) -> Result<AnalysisOrchestrator> {
    let api_key = config.model.resolve_api_key().ok_or_else(|| {
        anyhow!(
            "No API key found; set ${} in the environment",
            config.model.api_key_ref.to_uppercase()
        )
    })?;

    let client: Arc<dyn ModelClient> = Arc::new(HttpModelClient::new(&config.model, api_key));
    let engine = TraversalEngine::new(cli.repo.clone())
        .with_context(|| format!("Cannot traverse {}", cli.repo.display()))?;
    let model = cli
        .model
        .clone()
        .unwrap_or_else(|| config.model.default_model.clone());

    Ok(
        AnalysisOrchestrator::new(engine, store, client, model, &config.analysis).with_options(
            CallOptions {
                temperature: config.model.temperature,
                max_tokens: config.model.max_tokens,
            },
        ),
    )
}

/// Run every persona whose granularity is enabled, bottom-up.
async fn run_all_personas(
    orchestrator: &AnalysisOrchestrator,
    personas: &PersonaStore,
    config: &RepoLensConfig,
    format: OutputFormat,
) -> Result<()> {
    let enabled = |level: NoteLevel| match level {
        NoteLevel::File => config.analysis.include_files,
        NoteLevel::Directory => config.analysis.include_directories,
        NoteLevel::Module => config.analysis.include_modules,
        NoteLevel::Package => true,
    };

    let mut ordered: Vec<_> = personas.list().iter().collect();
    ordered.sort_by_key(|p| p.level);

    for persona in ordered {
        if !enabled(persona.level) {
            tracing::info!(persona = %persona.id, "Granularity disabled, skipping");
            continue;
        }
        let result = orchestrator.run(persona, &[persona.level]).await?;
        print!("{}", render_run(&result, format)?);
    }

    Ok(())
}
