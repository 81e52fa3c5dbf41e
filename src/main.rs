use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eframe::egui;

use cptcore::app::CptViewerApp;
use cptcore::data::{loader, table};
use cptcore::plot::save_figure;
use cptcore::state::AppState;
use cptcore::{Config, SoilProperties};

#[derive(Parser)]
#[command(name = "cptcore", version, about = "Inspect CPTcore parse/classify responses")]
struct Cli {
    /// JSON file with plot and validation settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the desktop viewer (default).
    View {
        #[arg(long)]
        parse: Option<PathBuf>,
        #[arg(long)]
        classify: Option<PathBuf>,
    },
    /// Render the soil profile to PNG or SVG.
    Render {
        #[arg(long)]
        parse: PathBuf,
        #[arg(long)]
        classify: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print or export the layer (or CPT) table.
    Table {
        #[arg(long)]
        parse: PathBuf,
        #[arg(long)]
        classify: PathBuf,
        /// Show the CPT traces instead of the layers.
        #[arg(long)]
        cpt: bool,
        /// Drop rows containing any null.
        #[arg(long)]
        complete: bool,
        /// `.csv` or `.parquet`; prints to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build the `classify/*` request body from a parse response.
    ClassifyRequest {
        #[arg(long)]
        parse: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command.unwrap_or(Command::View {
        parse: None,
        classify: None,
    }) {
        Command::View { parse, classify } => run_viewer(config, parse, classify),
        Command::Render {
            parse,
            classify,
            output,
        } => {
            let soil = load(&parse, &classify, &config)?;
            let figure = soil.figure(&config.plot);
            save_figure(&figure, &output)
                .with_context(|| format!("writing {}", output.display()))
        }
        Command::Table {
            parse,
            classify,
            cpt,
            complete,
            output,
        } => {
            let soil = load(&parse, &classify, &config)?;
            let mut batch = if cpt {
                soil.cpt_table().to_record_batch()?
            } else {
                soil.layer_table().to_record_batch()?
            };
            if complete {
                batch = table::drop_incomplete(&batch)?;
            }
            match output {
                Some(path) => table::write_table(&batch, &path)
                    .with_context(|| format!("writing {}", path.display())),
                None => {
                    println!("{}", table::pretty_format(&batch)?);
                    Ok(())
                }
            }
        }
        Command::ClassifyRequest { parse, output } => {
            let body = loader::classify_request_body(&loader::read_json(&parse)?)?;
            let text = serde_json::to_string_pretty(&body)?;
            match output {
                Some(path) => std::fs::write(&path, text)
                    .with_context(|| format!("writing {}", path.display())),
                None => {
                    println!("{text}");
                    Ok(())
                }
            }
        }
    }
}

fn load(parse: &Path, classify: &Path, config: &Config) -> Result<SoilProperties> {
    loader::load_files(parse, classify, &config.validation).with_context(|| {
        format!(
            "building soil properties from {} and {}",
            parse.display(),
            classify.display()
        )
    })
}

fn run_viewer(config: Config, parse: Option<PathBuf>, classify: Option<PathBuf>) -> Result<()> {
    let mut state = AppState::new(config);
    if let Some(path) = parse {
        state.load_parse_file(&path)?;
    }
    if let Some(path) = classify {
        state.load_classify_file(&path)?;
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "cptcore – Soil Profile Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(CptViewerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
