use clap::Parser;
use futures::stream::{self, StreamExt};
use line_image_loader::{DatasetLoader, Document, LineHeight, LoaderConfig};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "line-image-loader")]
#[command(about = "Extract text line images from page images and PDFs")]
#[command(version)]
pub struct Args {
    /// Directory (or single file) holding page images and PDFs
    #[arg(env = "LINES_INPUT_PATH")]
    pub input_path: PathBuf,

    /// Height to resample every line to; negative keeps native height
    #[arg(
        long,
        env = "LINES_LINE_HEIGHT",
        default_value = "30",
        allow_negative_numbers = true
    )]
    pub line_height: i32,

    /// Fraction of darkest pixels treated as ink
    #[arg(long, env = "LINES_BINARIZE_THRESHOLD", default_value = "0.12")]
    pub binarize_threshold: f64,

    /// Crop pages to their content before binarizing
    #[arg(long, env = "LINES_CROP", default_value = "true", action = clap::ArgAction::Set)]
    pub crop: bool,

    /// Directory to write line-extraction debug images to
    #[arg(long, env = "LINES_EXTRACTION_OUTPUT_PATH")]
    pub line_extraction_output_path: Option<PathBuf>,

    /// Documents processed at the same time
    #[arg(long, env = "LINES_JOBS", default_value = "4")]
    pub jobs: usize,

    /// Write a JSON summary of every document to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl From<&Args> for LoaderConfig {
    fn from(args: &Args) -> Self {
        let config = LoaderConfig::new(&args.input_path)
            .with_line_height(LineHeight::from_signed(args.line_height))
            .with_binarize_threshold(args.binarize_threshold)
            .with_crop(args.crop);
        match &args.line_extraction_output_path {
            Some(dir) => config.with_line_extraction_dir(dir),
            None => config,
        }
    }
}

/// Per-document summary line
#[derive(Serialize)]
struct DocumentReport {
    name: String,
    lines: Option<usize>,
    text_lines: Option<usize>,
    error: Option<ErrorReport>,
}

#[derive(Serialize)]
struct ErrorReport {
    code: String,
    message: String,
}

impl DocumentReport {
    fn failed(name: String, code: &str, message: String) -> Self {
        Self {
            name,
            lines: None,
            text_lines: None,
            error: Some(ErrorReport {
                code: code.to_string(),
                message,
            }),
        }
    }
}

fn process(doc: &Document) -> DocumentReport {
    let name = doc.base_name();
    let result = doc.load_line_images().and_then(|lines| {
        let text_lines = doc.load_line_text()?.map(|text| text.len());
        Ok((lines.len(), text_lines))
    });

    match result {
        Ok((lines, text_lines)) => {
            match text_lines {
                Some(text_lines) if text_lines != lines => tracing::warn!(
                    "{}: {} line images but {} lines of evaluation text",
                    name,
                    lines,
                    text_lines
                ),
                _ => tracing::info!("{}: {} line images", name, lines),
            }
            DocumentReport {
                name,
                lines: Some(lines),
                text_lines,
                error: None,
            }
        }
        Err(e) => {
            tracing::error!("{}: {}", name, e);
            DocumentReport::failed(name, e.code(), e.to_string())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting line-image-loader v{}", env!("CARGO_PKG_VERSION"));

    let loader = DatasetLoader::new(LoaderConfig::from(&args))?;
    let docs = loader.read_dataset()?;
    let total = docs.len();

    let reports: Vec<DocumentReport> = stream::iter(docs)
        .map(|doc| async move {
            let name = doc.base_name();
            tokio::task::spawn_blocking(move || process(&doc))
                .await
                .unwrap_or_else(|e| DocumentReport::failed(name, "INTERNAL_ERROR", e.to_string()))
        })
        .buffered(args.jobs.max(1))
        .collect()
        .await;

    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    let lines: usize = reports.iter().filter_map(|r| r.lines).sum();
    tracing::info!(
        "Extracted {} lines from {} documents ({} failed)",
        lines,
        total - failed,
        failed
    );

    if let Some(path) = &args.report {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &reports)?;
        tracing::info!("Wrote report to {}", path.display());
    }

    Ok(())
}
