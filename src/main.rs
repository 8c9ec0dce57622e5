use clap::{Parser, Subcommand};
use photomark::config::Config;
use photomark::export::{validate_output_dir, Exporter};
use photomark::sources::collect_sources;
use photomark::watermark::{FontBook, PreviewSession, WatermarkRenderer};
use std::path::PathBuf;
use std::sync::Arc;

/// Exit code for configuration errors (nothing was processed)
const EXIT_CONFIG: i32 = 2;
/// Exit code when some images failed
const EXIT_PARTIAL: i32 = 1;
/// Failures listed individually before summarizing the rest
const MAX_LISTED_FAILURES: usize = 10;

/// Photomark - apply text or image watermarks to photos
#[derive(Parser, Debug)]
#[command(name = "photomark")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the job file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watermark and export a batch of images
    Export {
        /// Output directory (overrides the job file)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Files or directories to process (override the job file)
        sources: Vec<PathBuf>,
    },

    /// Render a preview frame and print the resulting watermark settings
    Preview {
        /// Image to preview
        #[arg(short, long)]
        source: PathBuf,

        /// Where to write the preview frame (PNG)
        #[arg(short, long)]
        output: PathBuf,

        /// Longest side of the preview frame in pixels
        #[arg(long)]
        max_size: Option<u32>,

        /// Drag the watermark handle by DX,DY display pixels
        #[arg(long, value_parser = parse_delta, allow_hyphen_values = true)]
        drag: Option<(f64, f64)>,
    },
}

fn parse_delta(value: &str) -> Result<(f64, f64), String> {
    let (dx, dy) = value
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got '{}'", value))?;
    let dx = dx.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let dy = dy.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok((dx, dy))
}

fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(EXIT_CONFIG);
        }),
        None => Config::default(),
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(EXIT_CONFIG);
    }

    if let Err(e) = photomark::logging::init_subscriber(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(EXIT_CONFIG);
    }

    // No usable font at all is fatal before any rendering starts.
    let fonts = FontBook::new(&config.fonts).unwrap_or_else(|e| {
        eprintln!("Failed to initialize fonts: {}", e);
        std::process::exit(EXIT_CONFIG);
    });
    let renderer = WatermarkRenderer::new(Arc::new(fonts));

    tracing::info!(
        config_file = %args.config.as_ref().map(|p| p.display().to_string()).unwrap_or_default(),
        mode = ?config.watermark.mode,
        "Configuration loaded successfully"
    );

    let code = match args.command {
        Command::Export {
            output_dir,
            sources,
        } => run_export(config, renderer, output_dir, sources),
        Command::Preview {
            source,
            output,
            max_size,
            drag,
        } => run_preview(config, renderer, source, output, max_size, drag),
    };

    std::process::exit(code);
}

fn run_export(
    config: Config,
    renderer: WatermarkRenderer,
    output_dir: Option<PathBuf>,
    sources: Vec<PathBuf>,
) -> i32 {
    let roots = if sources.is_empty() {
        config.sources.clone()
    } else {
        sources
    };
    let sources = collect_sources(&roots);
    if sources.is_empty() {
        eprintln!("No supported images found");
        return EXIT_CONFIG;
    }

    let mut export = config.export.clone();
    if let Some(dir) = output_dir {
        export.output_dir = Some(dir);
    }

    if let Err(e) = validate_output_dir(export.output_dir.as_deref(), &sources) {
        eprintln!("{}", e);
        return EXIT_CONFIG;
    }

    let exporter = Exporter::new(renderer);
    let report = match exporter.export_all(&sources, &config.watermark, &export) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", e);
            return EXIT_CONFIG;
        }
    };

    println!("Exported {} of {} images", report.exported.len(), sources.len());
    if report.is_success() {
        return 0;
    }

    eprintln!("{} image(s) failed:", report.failures.len());
    for failure in report.failures.iter().take(MAX_LISTED_FAILURES) {
        eprintln!("  {}", failure);
    }
    if report.failures.len() > MAX_LISTED_FAILURES {
        eprintln!("  ... and {} more", report.failures.len() - MAX_LISTED_FAILURES);
    }
    EXIT_PARTIAL
}

fn run_preview(
    config: Config,
    renderer: WatermarkRenderer,
    source: PathBuf,
    output: PathBuf,
    max_size: Option<u32>,
    drag: Option<(f64, f64)>,
) -> i32 {
    let image = match image::open(&source) {
        Ok(image) => image.to_rgba8(),
        Err(e) => {
            eprintln!("Failed to open {}: {}", source.display(), e);
            return EXIT_PARTIAL;
        }
    };

    let session = PreviewSession::new(image, config.watermark.clone(), renderer)
        .map(|session| match max_size {
            Some(max) => session.with_max_display_size(max),
            None => session,
        });
    let mut session = match session {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Failed to render preview: {}", e);
            return EXIT_PARTIAL;
        }
    };

    if let Some((dx, dy)) = drag {
        if let Err(e) = session.drag_by(dx, dy) {
            eprintln!("Failed to move watermark: {}", e);
            return EXIT_PARTIAL;
        }
    }

    let frame = match session.frame() {
        Ok(frame) => frame,
        Err(e) => {
            eprintln!("Failed to render preview: {}", e);
            return EXIT_PARTIAL;
        }
    };
    if let Err(e) = frame.save_with_format(&output, image::ImageFormat::Png) {
        eprintln!("Failed to write {}: {}", output.display(), e);
        return EXIT_PARTIAL;
    }

    tracing::info!(output = %output.display(), "Preview written");

    match serde_json::to_string_pretty(&session.spec().to_dict()) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Failed to serialize watermark settings: {}", e);
            EXIT_PARTIAL
        }
    }
}
