use clap::{Parser, Subcommand};
use iconsmith::imaging::RustBackend;
use iconsmith::manifest::PatchOutcome;
use iconsmith::optimize::{OptimizationStats, SvgOptimizeStats};
use iconsmith::pipeline::{RunMode, RunOutcome};
use iconsmith::svg::StructuralOptimizer;
use iconsmith::{config, manifest, optimize, output, pipeline};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter, e.g. `iconsmith=debug`.
const LOG_ENV: &str = "ICONSMITH_LOG";

fn version_string() -> &'static str {
    let hash = env!("ICONSMITH_GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("{}@{hash}", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "iconsmith")]
#[command(about = "Favicon and web-icon asset pipeline")]
#[command(long_about = "\
Favicon and web-icon asset pipeline

Drop a raster and/or vector logo into the assets directory and build the
complete favicon set.

Inputs (first match in file-name order):

  src/assets/
  ├── logo.png        # raster: png, jpg, jpeg; name contains logo/icon/favicon
  └── logo.svg        # vector: optional, a placeholder badge is used without it

Outputs:

  static/fav/
  ├── favicon.ico             # ICO container around the 32 px PNG
  ├── favicon-32x32.png
  ├── apple-touch-icon.png    # 180 px
  ├── icon-192.png
  ├── icon-512.png
  ├── icon-mask.png           # 512 px maskable, 340 px safe zone
  ├── icon.svg                # light/dark theme-aware
  ├── site.webmanifest
  └── favicon-html.txt        # paste into <head>

Set PNG_PROGRESSIVE=true to request progressive encoding and ICONSMITH_LOG
to control diagnostic logging.

Run 'iconsmith gen-config' to generate a documented iconsmith.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Assets directory holding the logo (overrides paths.source_dir)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Favicon output directory (overrides paths.output_dir)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Config file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the full favicon set
    Build {
        /// Fail instead of printing setup instructions when no logo is found
        #[arg(long)]
        strict: bool,
    },
    /// Check that every required output file exists
    Check,
    /// Re-encode PNGs in place when that saves more than 1 KB
    OptimizePng {
        /// Directory to optimize (defaults to the assets directory)
        dir: Option<PathBuf>,
    },
    /// Optimize every SVG in a directory into another
    OptimizeSvg {
        /// Input directory (defaults to paths.static_dir)
        src: Option<PathBuf>,
        /// Output directory (defaults to paths.publish_dir)
        dst: Option<PathBuf>,
    },
    /// Rewrite icon paths in an existing manifest for deployment
    PatchManifest {
        /// Prefix every icon src must start with
        #[arg(long, default_value = "/assets/")]
        prefix: String,
        /// Manifest to patch (defaults to the one in the output directory)
        file: Option<PathBuf>,
    },
    /// Print a stock iconsmith.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = config::load_config(&cli.config)?;
    if let Some(source) = &cli.source {
        config.paths.source_dir = source.to_string_lossy().into_owned();
    }
    if let Some(output_dir) = &cli.output {
        config.paths.output_dir = output_dir.to_string_lossy().into_owned();
    }
    init_thread_pool(&config.processing);

    let success = match cli.command {
        Command::Build { strict } => {
            let mode = if strict {
                RunMode::Strict
            } else {
                RunMode::Interactive
            };
            println!("==> Building favicons from {}", config.paths.source_dir);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_event(&event);
                }
            });
            let result = pipeline::run(&config, mode, Some(&tx));
            drop(tx);
            printer.join().ok();

            match result? {
                RunOutcome::SetupRequired { source_dir } => {
                    output::print_setup_instructions(&source_dir);
                    true
                }
                RunOutcome::Completed(report) => {
                    println!();
                    output::print_validation(&report.validation);
                    output::print_run_summary(&report);
                    report.is_success()
                }
            }
        }
        Command::Check => {
            println!("==> Checking {}", config.paths.output_dir);
            let report = pipeline::check_outputs(&config);
            output::print_validation(&report);
            report.is_complete()
        }
        Command::OptimizePng { dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from(&config.paths.source_dir));
            println!("==> Optimizing PNGs in {}", dir.display());
            let progressive = config::progressive_enabled(&config.processing);
            let (stats, reports) = optimize::optimize_png_dir(
                &RustBackend::new(),
                &dir,
                progressive,
                OptimizationStats::default(),
            )?;
            output::print_png_batch(&reports, &stats);
            true
        }
        Command::OptimizeSvg { src, dst } => {
            let src = src.unwrap_or_else(|| PathBuf::from(&config.paths.static_dir));
            let dst = dst.unwrap_or_else(|| PathBuf::from(&config.paths.publish_dir));
            println!("==> Optimizing SVGs {} → {}", src.display(), dst.display());
            let (stats, reports) = optimize::optimize_svg_dir(
                &StructuralOptimizer::new(),
                &src,
                &dst,
                SvgOptimizeStats::default(),
            )?;
            output::print_svg_batch(&reports, &stats);
            true
        }
        Command::PatchManifest { prefix, file } => {
            let path = file.unwrap_or_else(|| {
                PathBuf::from(&config.paths.output_dir).join(&config.manifest.filename)
            });
            match manifest::patch_manifest(&path, &prefix)? {
                PatchOutcome::Missing => println!("No manifest at {}", path.display()),
                PatchOutcome::Patched { rewritten } => println!(
                    "✓ {} ({} icon path(s) rewritten to {})",
                    path.display(),
                    rewritten,
                    prefix
                ),
            }
            true
        }
        Command::GenConfig => true,
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Diagnostic logging to stderr, filtered by `ICONSMITH_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
