use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{error, info};

use grade_engine::api::{AppState, create_router};
use grade_engine::config::ConfigLoader;
use grade_engine::error::EngineError;
use grade_engine::models::EducationLevel;
use grade_engine::service::ReportService;
use grade_engine::telemetry;

/// Civil-service grade and step classification.
#[derive(Debug, Parser)]
#[command(name = "grade-engine", version, about)]
struct Cli {
    /// Configuration directory holding engine.yaml (and optionally layout.yaml).
    /// Built-in defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API.
    Serve {
        /// Port to bind, overriding the configuration.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Render a CSV roster into an xlsx workbook.
    Render {
        /// CSV roster with TCKN, AD SOYAD and BİRİMİ columns.
        #[arg(long)]
        input: PathBuf,
        /// Where to write the workbook.
        #[arg(long)]
        output: PathBuf,
    },
    /// Classify one employee from in-field prim-days.
    Classify {
        /// Aggregated in-field prim-days.
        #[arg(long)]
        prim_days: Decimal,
        /// Education label, e.g. "Tezli Yüksek Lisans".
        #[arg(long, value_parser = parse_education)]
        education: EducationLevel,
    },
}

fn parse_education(label: &str) -> Result<EducationLevel, String> {
    label.parse().map_err(|e: EngineError| e.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(dir) => ConfigLoader::load(dir),
        None => Ok(ConfigLoader::default()),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    telemetry::init(&config.engine().log_level);

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: ConfigLoader) -> Result<(), Box<dyn std::error::Error>> {
    let service = ReportService::new(config)?;

    match command {
        Command::Serve { port } => {
            let mut server = service.config().engine().server.clone();
            if let Some(port) = port {
                server.port = port;
            }
            let address = server.address();
            let listener = tokio::net::TcpListener::bind(&address).await?;
            info!(address = %address, "listening");

            let router = create_router(AppState::new(service));
            axum::serve(listener, router).await?;
        }
        Command::Render { input, output } => {
            let rendered = service.render_file(&input, &output)?;
            println!(
                "{} sheet(s) written to {} ({} row(s) skipped)",
                rendered.sheet_names.len(),
                output.display(),
                rendered.skipped_rows
            );
        }
        Command::Classify {
            prim_days,
            education,
        } => {
            let result = service.classify(prim_days, education)?;
            println!("{}\t{}", result.title, result.grade_label());
            println!("tenure: {} years", result.tenure_years.normalize());
        }
    }

    Ok(())
}
