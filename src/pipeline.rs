//! One favicon build, end to end.
//!
//! ```text
//! resolve sources
//!   ├── raster: identify → decode → sizes (parallel) → maskable → favicon.ico
//!   └── vector: theme + optimize → icon.svg            (rayon::join)
//! manifest + snippet
//! validate
//! ```
//!
//! The two branches are independent: a raster failure is recorded in the
//! [`RunReport`] and the vector branch, manifest and snippet are still
//! written. Validation then reports whatever is missing.
//!
//! Progress is reported as [`PipelineEvent`]s over an optional channel so the
//! CLI can print while work continues.

use crate::config::{ConfigError, IconsmithConfig, progressive_enabled};
use crate::imaging::{
    BackendError, ImageBackend, RustBackend, StrategyTier, create_legacy_icon,
    create_maskable_icon, generate_icon_sizes, plan_icon_sizes, plan_maskable,
};
use crate::manifest::{ManifestError, build_manifest, write_manifest, write_snippet};
use crate::source::{SourceError, SourcePredicate, resolve_sources};
use crate::svg::{StructuralOptimizer, SvgOptimizer, VectorOrigin, process_vector};
use crate::types::SourceSet;
use crate::validate::{ValidationReport, required_files, validate_outputs};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{0}")]
    Source(#[from] SourceError),
    #[error("No logo.png/jpg or logo.svg found in {0}")]
    NoQualifyingSource(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// What to do when the source directory holds no qualifying logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Report that setup is needed and finish cleanly.
    Interactive,
    /// Treat it as an error.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Raster { size: u32 },
    Maskable,
    LegacyIcon,
    Vector,
    Manifest,
    Snippet,
}

/// One file written by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub kind: ArtifactKind,
}

impl Artifact {
    fn new(filename: impl Into<String>, kind: ArtifactKind) -> Self {
        Self {
            filename: filename.into(),
            kind,
        }
    }
}

/// Progress events, in the order each branch produces them. Events from the
/// raster and vector branches interleave.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    SourcesResolved {
        raster: Option<String>,
        vector: Option<String>,
    },
    IconWritten {
        filename: String,
        size: u32,
        tier: StrategyTier,
    },
    MaskableWritten {
        filename: String,
        canvas_size: u32,
        icon_size: u32,
        padding: u32,
    },
    LegacyIconWritten {
        filename: String,
    },
    VectorWritten {
        filename: String,
        placeholder: bool,
        theme_injected: bool,
        theme_restored: bool,
        /// Set when the optimizer failed and unoptimized markup was written.
        optimize_error: Option<String>,
        original_size: u64,
        final_size: u64,
    },
    ManifestWritten {
        filename: String,
    },
    SnippetWritten {
        filename: String,
    },
    StepSkipped {
        step: &'static str,
        reason: String,
    },
    StepFailed {
        step: &'static str,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub sources: SourceSet,
    pub output_dir: PathBuf,
    pub artifacts: Vec<Artifact>,
    pub raster_error: Option<String>,
    pub vector_error: Option<String>,
    pub validation: ValidationReport,
}

impl RunReport {
    /// No branch failed and every required file exists and was written by
    /// this run.
    pub fn is_success(&self) -> bool {
        self.raster_error.is_none()
            && self.vector_error.is_none()
            && self.validation.is_complete()
            && self.stale_files().is_empty()
    }

    /// Required files that exist but were left over from an earlier run.
    pub fn stale_files(&self) -> Vec<&str> {
        self.validation
            .present
            .iter()
            .map(|f| f.filename.as_str())
            .filter(|name| !self.artifacts.iter().any(|a| a.filename == *name))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Interactive run with nothing to build from.
    SetupRequired { source_dir: PathBuf },
    Completed(RunReport),
}

fn emit(events: Option<&Sender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is listening.
        tx.send(event).ok();
    }
}

/// Run the build with the production image backend and SVG optimizer.
pub fn run(
    config: &IconsmithConfig,
    mode: RunMode,
    events: Option<&Sender<PipelineEvent>>,
) -> Result<RunOutcome, PipelineError> {
    run_with(
        &RustBackend::new(),
        &StructuralOptimizer::new(),
        config,
        mode,
        events,
    )
}

/// Run the build with explicit backends (allows testing with mocks).
pub fn run_with<B: ImageBackend>(
    backend: &B,
    optimizer: &impl SvgOptimizer,
    config: &IconsmithConfig,
    mode: RunMode,
    events: Option<&Sender<PipelineEvent>>,
) -> Result<RunOutcome, PipelineError> {
    config.validate()?;

    let source_dir = Path::new(&config.paths.source_dir);
    let output_dir = Path::new(&config.paths.output_dir);

    let sources = resolve_sources(source_dir, &SourcePredicate::from_config(&config.source))?;
    emit(
        events,
        PipelineEvent::SourcesResolved {
            raster: sources.raster.as_ref().map(|s| s.display_name()),
            vector: sources.vector.as_ref().map(|s| s.display_name()),
        },
    );

    if sources.is_empty() {
        return match mode {
            RunMode::Interactive => Ok(RunOutcome::SetupRequired {
                source_dir: source_dir.to_path_buf(),
            }),
            RunMode::Strict => Err(PipelineError::NoQualifyingSource(source_dir.to_path_buf())),
        };
    }

    fs::create_dir_all(output_dir)?;
    let progressive = progressive_enabled(&config.processing);

    let (raster, vector) = rayon::join(
        || {
            sources
                .raster
                .as_ref()
                .map(|s| raster_branch(backend, config, &s.path, output_dir, progressive, events))
        },
        || vector_branch(optimizer, config, &sources, output_dir, events),
    );

    let mut artifacts = Vec::new();
    let raster_error = match raster {
        Some(Ok(written)) => {
            artifacts.extend(written);
            None
        }
        Some(Err(e)) => {
            warn!(error = %e, "raster branch failed");
            emit(
                events,
                PipelineEvent::StepFailed {
                    step: "raster icons",
                    error: e.to_string(),
                },
            );
            Some(e.to_string())
        }
        None => {
            emit(
                events,
                PipelineEvent::StepSkipped {
                    step: "raster icons",
                    reason: "no raster logo found".into(),
                },
            );
            None
        }
    };
    let vector_error = match vector {
        Ok(artifact) => {
            artifacts.push(artifact);
            None
        }
        Err(e) => Some(e),
    };

    write_manifest(
        &build_manifest(config),
        &output_dir.join(&config.manifest.filename),
    )?;
    emit(
        events,
        PipelineEvent::ManifestWritten {
            filename: config.manifest.filename.clone(),
        },
    );
    artifacts.push(Artifact::new(&config.manifest.filename, ArtifactKind::Manifest));

    write_snippet(config, &output_dir.join(&config.manifest.snippet_filename))?;
    emit(
        events,
        PipelineEvent::SnippetWritten {
            filename: config.manifest.snippet_filename.clone(),
        },
    );
    artifacts.push(Artifact::new(
        &config.manifest.snippet_filename,
        ArtifactKind::Snippet,
    ));

    let validation = check_outputs(config);
    info!(
        present = validation.present.len(),
        missing = validation.missing.len(),
        "validated outputs"
    );

    Ok(RunOutcome::Completed(RunReport {
        sources,
        output_dir: output_dir.to_path_buf(),
        artifacts,
        raster_error,
        vector_error,
        validation,
    }))
}

/// Audit the configured output directory without building anything.
pub fn check_outputs(config: &IconsmithConfig) -> ValidationReport {
    validate_outputs(
        Path::new(&config.paths.output_dir),
        &required_files(config),
    )
}

/// Sizes, maskable and legacy icon from one decode of the raster source.
fn raster_branch<B: ImageBackend>(
    backend: &B,
    config: &IconsmithConfig,
    source: &Path,
    output_dir: &Path,
    progressive: bool,
    events: Option<&Sender<PipelineEvent>>,
) -> Result<Vec<Artifact>, BackendError> {
    let info = backend.identify(source)?;
    info!(
        source = %source.display(),
        width = info.width,
        height = info.height,
        channels = info.channels,
        format = %info.format,
        "raster source"
    );
    let image = backend.decode(source)?;

    let mut artifacts = Vec::new();

    let plans = plan_icon_sizes(&config.icons.sizes, output_dir, &info, progressive);
    for icon in generate_icon_sizes(backend, &image, &plans)? {
        emit(
            events,
            PipelineEvent::IconWritten {
                filename: icon.filename.clone(),
                size: icon.size,
                tier: icon.profile.tier,
            },
        );
        artifacts.push(Artifact::new(icon.filename, ArtifactKind::Raster { size: icon.size }));
    }

    let params = plan_maskable(&config.maskable, output_dir, &info, progressive);
    let mask = create_maskable_icon(backend, &image, &params)?;
    emit(
        events,
        PipelineEvent::MaskableWritten {
            filename: mask.filename.clone(),
            canvas_size: params.canvas_size,
            icon_size: params.icon_size,
            padding: params.padding,
        },
    );
    artifacts.push(Artifact::new(mask.filename, ArtifactKind::Maskable));

    match create_legacy_icon(backend, &config.icons, output_dir)? {
        Some(_) => {
            emit(
                events,
                PipelineEvent::LegacyIconWritten {
                    filename: config.icons.legacy_icon.clone(),
                },
            );
            artifacts.push(Artifact::new(&config.icons.legacy_icon, ArtifactKind::LegacyIcon));
        }
        None => emit(
            events,
            PipelineEvent::StepSkipped {
                step: "legacy icon",
                reason: format!("{} was not written", config.icons.legacy_source),
            },
        ),
    }

    Ok(artifacts)
}

fn vector_branch(
    optimizer: &impl SvgOptimizer,
    config: &IconsmithConfig,
    sources: &SourceSet,
    output_dir: &Path,
    events: Option<&Sender<PipelineEvent>>,
) -> Result<Artifact, String> {
    let source = sources.vector.as_ref().map(|s| s.path.as_path());
    match process_vector(source, output_dir, &config.svg, &config.theme, optimizer) {
        Ok(outcome) => {
            emit(
                events,
                PipelineEvent::VectorWritten {
                    filename: config.svg.filename.clone(),
                    placeholder: outcome.origin == VectorOrigin::Placeholder,
                    theme_injected: outcome.theme_injected,
                    theme_restored: outcome.theme_restored,
                    optimize_error: outcome.optimize_error,
                    original_size: outcome.original_size,
                    final_size: outcome.final_size,
                },
            );
            Ok(Artifact::new(&config.svg.filename, ArtifactKind::Vector))
        }
        Err(e) => {
            warn!(error = %e, "vector branch failed");
            emit(
                events,
                PipelineEvent::StepFailed {
                    step: "vector icon",
                    error: e.to_string(),
                },
            );
            Err(e.to_string())
        }
    }
}
