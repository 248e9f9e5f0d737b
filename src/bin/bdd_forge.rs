//! bdd-forge: generate BDD feature files and test scripts from plain-language
//! requirements.
//!
//! Usage:
//!   bdd-forge gherkin [--requirement <text>] [--name <name>] [--iterations <n>]
//!   bdd-forge selenium --requirement <text> [--test-name <name>] [--language python]
//!   bdd-forge scripts [--framework selenium|playwright|both] [--features-dir <dir>]
//!   bdd-forge serve [--addr 0.0.0.0:8000]
//!   bdd-forge check <text> [--name <feature name>]

use anyhow::{bail, Context};
use bdd_forge::config::{ForgeConfig, UiFramework};
use bdd_forge::dispatcher::Dispatcher;
use bdd_forge::routing::RoutingStrategy;
use bdd_forge::server::{self, AppState};
use bdd_forge::types::{clamp_iterations, AgentType, GenerateRequest, DEFAULT_ITERATIONS};
use bdd_forge::validation::RequestValidator;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bdd-forge")]
#[command(author, version, about = "Generate Gherkin features and test scripts with an LLM")]
#[command(propagate_version = true)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "BDD_FORGE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a feature file, refining it with the model
    Gherkin {
        #[arg(short, long)]
        requirement: Option<String>,
        /// Feature name, without `.feature`
        #[arg(short, long)]
        name: Option<String>,
        /// Improvement rounds, clamped to 1..=3
        #[arg(short, long)]
        iterations: Option<i64>,
    },

    /// Generate a Selenium script
    Selenium {
        #[arg(short, long)]
        requirement: String,
        #[arg(short, long)]
        test_name: Option<String>,
        #[arg(short, long, default_value = "python")]
        language: String,
    },

    /// Generate test files for every feature file
    Scripts {
        #[arg(short, long, value_enum, default_value_t = FrameworkChoice::Both)]
        framework: FrameworkChoice,
        /// Directory holding `*.feature` files
        #[arg(long)]
        features_dir: Option<PathBuf>,
    },

    /// Run the HTTP API
    Serve {
        #[arg(long, default_value = "0.0.0.0:8000")]
        addr: SocketAddr,
    },

    /// Show how a text would be screened and routed
    Check {
        text: String,
        /// Feature name used for content routing
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FrameworkChoice {
    Selenium,
    Playwright,
    Both,
}

impl FrameworkChoice {
    fn frameworks(self) -> &'static [UiFramework] {
        match self {
            FrameworkChoice::Selenium => &[UiFramework::Selenium],
            FrameworkChoice::Playwright => &[UiFramework::Playwright],
            FrameworkChoice::Both => &[UiFramework::Selenium, UiFramework::Playwright],
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut config =
        ForgeConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Commands::Gherkin {
            requirement,
            name,
            iterations,
        } => {
            let requirement = match requirement {
                Some(r) => r,
                None => prompt_line("Enter your requirement: ")?,
            };
            let name = match name {
                Some(n) => Some(n),
                None => Some(prompt_line("Enter feature name (without .feature): ")?)
                    .filter(|n| !n.trim().is_empty()),
            };
            let iterations = match iterations {
                Some(i) => clamp_iterations(i),
                None => {
                    let raw = prompt_line("Number of improvement iterations (1-3, default 2): ")?;
                    raw.trim()
                        .parse::<i64>()
                        .map(clamp_iterations)
                        .unwrap_or(DEFAULT_ITERATIONS)
                }
            };

            let dispatcher = Dispatcher::from_config(&config)?;
            let validator = RequestValidator::new();
            if !validator.is_valid(Some(&requirement)) {
                bail!("{}", bdd_forge::dispatcher::NOT_MEANINGFUL);
            }
            eprintln!("Generating initial test cases, then {} improvement round(s)...", iterations);
            let artifact = dispatcher
                .gherkin()
                .generate(&requirement, name.as_deref(), iterations)
                .await?;
            println!("Generated and improved: {}", artifact.path.display());
            println!("\nFinal test cases:");
            println!("{}", "=".repeat(50));
            println!("{}", artifact.content);
        }

        Commands::Selenium {
            requirement,
            test_name,
            language,
        } => {
            let dispatcher = Dispatcher::from_config(&config)?;
            let request = GenerateRequest::new(
                AgentType::SeleniumGenerator.as_str(),
                requirement,
            )
            .with_language(language);
            let request = match test_name {
                Some(t) => request.with_test_name(t),
                None => request,
            };
            let response = dispatcher.route_request(&request).await;
            if !response.is_success() {
                bail!("{}", response.message);
            }
            println!("{}", response.content);
            if let Some(filename) = response.filename {
                eprintln!("Saved to {}", config.output.scripts().join(filename).display());
            }
        }

        Commands::Scripts {
            framework,
            features_dir,
        } => {
            if let Some(dir) = features_dir {
                config.output.features_dir = dir;
            }
            let dispatcher = Dispatcher::from_config(&config)?;
            for framework in framework.frameworks() {
                println!("\nGenerating {} tests...", framework.title());
                println!("{}", "-".repeat(50));
                let report = dispatcher.feature_tests(*framework).process_features().await?;
                for outcome in &report.outcomes {
                    match outcome {
                        bdd_forge::agents::FileOutcome::Generated {
                            source,
                            category,
                            output,
                        } => println!(
                            "{} [{}] -> {}",
                            source.display(),
                            category,
                            output.display()
                        ),
                        bdd_forge::agents::FileOutcome::Failed { source, error } => {
                            println!("Error processing {}: {}", source.display(), error)
                        }
                    }
                }
                println!(
                    "{} generated, {} failed",
                    report.generated(),
                    report.failed()
                );
            }
        }

        Commands::Serve { addr } => {
            let dispatcher = Dispatcher::from_config(&config)?;
            info!(output = %config.output.root.display(), "starting server");
            server::serve(addr, AppState::new(dispatcher, config.request_timeout())).await?;
        }

        Commands::Check { text, name } => {
            let verdict = RequestValidator::new().assess(Some(&text));
            println!("validator: {}", verdict);
            let request = GenerateRequest {
                requirement: Some(text),
                feature_name: name,
                ..GenerateRequest::default()
            };
            println!(
                "content route: {}",
                RoutingStrategy::Content(config.framework).select(&request)?
            );
        }
    }

    Ok(())
}

fn prompt_line(label: &str) -> anyhow::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", label)?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
