//! Gymwatch CLI
//!
//! Command-line interface for gym occupancy:
//! - Interactive dashboard with live polling
//! - One-shot occupancy, route-set and comparison reports
//! - Location listing and config generation

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use gymwatch::views::compare::render_comparison;
use gymwatch::views::occupancy::{render_occupancy, render_route_changes};
use gymwatch::views::aggregate;
use gymwatch::{
    ApiError, Catalog, Config, Dashboard, GymApi, GymApiClient, InputOutcome, QueryState,
    Selection,
};

#[derive(Parser)]
#[command(name = "gymwatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live climbing gym occupancy in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: search the usual locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for one-shot commands
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive dashboard (default)
    Watch {
        /// Location to start on, or "Compare"
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Show current occupancy for one location
    Occupancy {
        /// Location name
        location: String,
    },

    /// Show when each station at a location was last set
    Routes {
        /// Location name
        location: String,
    },

    /// Compare occupancy across every location
    Compare,

    /// List known locations
    Locations,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Watch { location: None });

    if let Commands::Config { output } = &command {
        let config = gymwatch::config::generate_default_config();
        match output {
            Some(path) => {
                // Create parent directory if needed
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &config)?;
                println!("Config written to {:?}", path);
            }
            None => {
                print!("{}", config);
            }
        }
        return Ok(());
    }

    let config = Config::resolve(cli.config.as_deref())?;
    gymwatch::logging::init(&config.logging)?;

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    tracing::debug!("Gymwatch v{}", env!("CARGO_PKG_VERSION"));

    let catalog = config.catalog().context("Invalid location list")?;
    let api: Arc<dyn GymApi> = Arc::new(
        GymApiClient::new(config.api.client_config()).context("Failed to build HTTP client")?,
    );

    match command {
        Commands::Watch { location } => {
            let initial = match location {
                Some(name) => catalog.selection(&name)?,
                None => config.initial_selection(&catalog)?,
            };
            watch(&config, catalog, api, initial).await?;
        }

        Commands::Occupancy { location } => {
            let location = catalog.lookup(&location)?.clone();

            match cli.format {
                OutputFormat::Json => {
                    let record = api
                        .occupancy(&location.id)
                        .await
                        .unwrap_or_else(|e| fail(&location.name, &e));
                    println!("{}", serde_json::to_string_pretty(&record)?);
                }
                OutputFormat::Table => {
                    let (occupancy, routes) = tokio::join!(
                        api.occupancy(&location.id),
                        api.last_route_set(&location.id)
                    );
                    let failed = occupancy.is_err();
                    println!("{}", location.name);
                    println!();
                    println!(
                        "{}",
                        render_occupancy(
                            &location.name,
                            &into_state(occupancy),
                            &into_state(routes),
                            Utc::now(),
                            &config.render_style(),
                        )
                    );
                    if failed {
                        std::process::exit(1);
                    }
                }
            }
        }

        Commands::Routes { location } => {
            let location = catalog.lookup(&location)?.clone();
            let summary = api
                .last_route_set(&location.id)
                .await
                .unwrap_or_else(|e| fail(&location.name, &e));

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                OutputFormat::Table => print!("{}", render_route_changes(&summary, Utc::now())),
            }
        }

        Commands::Compare => {
            let results = futures_util::future::join_all(
                catalog.locations().iter().map(|l| api.occupancy(&l.id)),
            )
            .await;

            match cli.format {
                OutputFormat::Json => {
                    let mut records = Vec::with_capacity(results.len());
                    for (location, result) in catalog.locations().iter().zip(results) {
                        records.push(result.unwrap_or_else(|e| fail(&location.name, &e)));
                    }
                    println!("{}", serde_json::to_string_pretty(&records)?);
                }
                OutputFormat::Table => {
                    let states: Vec<_> = results.into_iter().map(into_state).collect();
                    println!(
                        "{}",
                        render_comparison(&aggregate(&states), &config.render_style())
                    );
                }
            }
        }

        Commands::Locations => match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(catalog.locations())?);
            }
            OutputFormat::Table => {
                println!("{:<4} {:<20} ID", "#", "NAME");
                println!("{}", "-".repeat(64));
                for (i, location) in catalog.locations().iter().enumerate() {
                    println!("{:<4} {:<20} {}", i + 1, location.name, location.id);
                }
                println!("{:<4} {:<20}", catalog.len() + 1, gymwatch::COMPARE);
            }
        },

        Commands::Config { .. } => {}
    }

    Ok(())
}

/// Interactive loop: redraw on every change, read selections from stdin
async fn watch(
    config: &Config,
    catalog: Catalog,
    api: Arc<dyn GymApi>,
    initial: Selection,
) -> anyhow::Result<()> {
    let fallback_width = config.display.width;
    let mut dashboard = Dashboard::new(catalog, api, config.dashboard_settings(), initial).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut notice: Option<String> = None;

    draw(&dashboard, fallback_width, notice.as_deref())?;

    loop {
        tokio::select! {
            _ = dashboard.changed() => {}
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match dashboard.handle_input(&line).await {
                    InputOutcome::Quit => break,
                    InputOutcome::Unknown(input) => {
                        notice = Some(format!("Unknown option: {}", input));
                    }
                    _ => notice = None,
                },
                Ok(None) => stdin_open = false,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read stdin");
                    stdin_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }

        draw(&dashboard, fallback_width, notice.as_deref())?;
    }

    tracing::info!("Dashboard closed");
    Ok(())
}

/// Clear the screen and redraw at the current terminal width
fn draw(dashboard: &Dashboard, fallback_width: u16, notice: Option<&str>) -> std::io::Result<()> {
    let width = terminal::size().map(|(columns, _)| columns).unwrap_or(fallback_width);
    let mut stdout = std::io::stdout().lock();

    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    write!(stdout, "{}", dashboard.render(width))?;
    writeln!(stdout)?;
    if let Some(notice) = notice {
        writeln!(stdout, "{}", notice)?;
    }
    writeln!(stdout, "Type a number or name and press Enter to switch. r = refresh, q = quit.")?;
    stdout.flush()
}

fn into_state<T>(result: Result<T, ApiError>) -> QueryState<T> {
    match result {
        Ok(data) => QueryState::Success { data: Arc::new(data) },
        Err(e) => QueryState::Error(Arc::new(e)),
    }
}

fn fail<T>(location: &str, error: &ApiError) -> T {
    eprintln!("Failed to load data for {}: {}", location, error);
    std::process::exit(1);
}
