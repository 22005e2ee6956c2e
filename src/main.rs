use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use pubmed_wordcloud::config::{find_config_file, load_config, AppConfig, RunConfig};
use pubmed_wordcloud::parser::TruncationPolicy;
use pubmed_wordcloud::pipeline::{abstracts_from_checkpoint, Pipeline, PipelineSettings};
use pubmed_wordcloud::render::WordCloudRenderer;
use pubmed_wordcloud::sources::{LiteratureSource, PubMedSource};
use pubmed_wordcloud::ui::{self, FetchSpinner, Prompter, Status};
use pubmed_wordcloud::utils::HttpClient;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// PubMed Wordcloud - turn the abstracts behind a PubMed query into a word cloud
#[derive(Parser, Debug)]
#[command(name = "pubmed-wordcloud")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch PubMed abstracts for a query and render them as a word cloud", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch abstracts and render the word cloud (default)
    Run(RunArgs),

    /// Extract abstracts from a previously saved papers file
    Extract {
        /// Checkpoint file written by a previous run
        file: PathBuf,

        /// Print the abstracts as a JSON array
        #[arg(long)]
        json: bool,

        /// Keep an abstract cut off by end-of-file instead of skipping it
        #[arg(long)]
        clamp_truncated: bool,
    },

    /// List the supported color maps
    Colormaps,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Load run settings from this JSON file instead of asking for them
    #[arg(long, short)]
    settings: Option<PathBuf>,

    /// Always ask for the settings, without offering to import the last run's
    #[arg(long, conflicts_with = "settings")]
    interactive: bool,

    /// Keep an abstract cut off by end-of-input instead of skipping it
    #[arg(long)]
    clamp_truncated: bool,

    /// Directory for the papers, image and settings files
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn truncation_policy(clamp: bool) -> TruncationPolicy {
    if clamp {
        TruncationPolicy::ClampToEnd
    } else {
        TruncationPolicy::Skip
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("pubmed_wordcloud={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }
    let app_config = load_config(config_path.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        None => run(&app_config, RunArgs::default(), cli.quiet).await,
        Some(Commands::Run(args)) => run(&app_config, args, cli.quiet).await,

        Some(Commands::Extract {
            file,
            json,
            clamp_truncated,
        }) => {
            let extraction = abstracts_from_checkpoint(&file, truncation_policy(clamp_truncated))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&extraction.abstracts)?);
            } else {
                for (i, text) in extraction.abstracts.iter().enumerate() {
                    println!("{}. {}", i + 1, text);
                }
                if !cli.quiet {
                    eprintln!(
                        "{} abstracts from {} records ({} skipped)",
                        extraction.abstracts.len(),
                        extraction.anchors,
                        extraction.malformed.len()
                    );
                }
            }
            Ok(())
        }

        Some(Commands::Colormaps) => {
            ui::print_color_maps();
            Ok(())
        }

        Some(Commands::Config {
            action: ConfigAction::Show,
        }) => {
            print!("{}", app_config.redacted().to_toml()?);
            Ok(())
        }

        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Resolve settings, then fetch, extract and render
async fn run(app_config: &AppConfig, args: RunArgs, quiet: bool) -> Result<()> {
    let mut output = app_config.output.clone();
    if let Some(dir) = args.output_dir {
        output.directory = dir;
    }

    let run_config = if let Some(path) = &args.settings {
        RunConfig::load(path)?
    } else {
        let mut prompter = Prompter::new(std::io::stdin().lock(), std::io::stdout());
        if !args.interactive && prompter.confirm_import()? {
            let path = output.settings_path();
            RunConfig::load(&path)
                .with_context(|| format!("Could not import settings from {}", path.display()))?
        } else {
            prompter.collect_run_config()?
        }
    };

    let client = HttpClient::with_timeout(Duration::from_secs(app_config.http.timeout_secs))?;
    let source = PubMedSource::with_client(Arc::new(client), app_config.ncbi.endpoints());
    let renderer = WordCloudRenderer::new(app_config.render.max_words, app_config.render.min_font_size);
    let pipeline = Pipeline::new(
        &source,
        &renderer,
        PipelineSettings {
            output,
            width: app_config.render.width,
            height: app_config.render.height,
            truncation: truncation_policy(args.clamp_truncated),
        },
    );

    let spinner = (!quiet && ui::is_terminal()).then(|| {
        FetchSpinner::new(format!(
            "Fetching up to {} records from {}...",
            run_config.max_results,
            source.name()
        ))
    });

    match pipeline.run(&run_config).await {
        Ok(report) => {
            if let Some(spinner) = spinner {
                spinner.finish(format!("Fetched {} records", report.ids_found));
            }
            if !quiet {
                ui::print_report(&report);
            }
            Ok(())
        }
        Err(err) => {
            if let Some(spinner) = spinner {
                spinner.abandon();
            }
            ui::print_status(Status::Error, &err);
            Err(err.into())
        }
    }
}
