//! larvakin CLI: frame-wise larva body geometry and kinematics from outlines.

use clap::{Args, Parser, Subcommand, ValueEnum};
use larvakin::{
    AnalysisConfig, Analyzer, BatchOptions, Calibration, FrameInput, HeadRule, Landmark,
    SegmentProportions, SessionTimeline,
};
use std::path::PathBuf;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "larvakin")]
#[command(about = "Midline, landmarks and locomotion kinematics from per-frame larva outlines")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a JSON array of frame inputs into a timeline.
    Analyze(CliAnalyzeArgs),

    /// Print the default analysis config as JSON.
    DefaultConfig,

    /// Print the landmark arc-length fraction table.
    Proportions {
        /// Show the evenly spaced legacy table instead of the anatomical one.
        #[arg(long)]
        legacy_uniform_segments: bool,
    },
}

#[derive(Debug, Clone, Args)]
struct CliAnalyzeArgs {
    /// Path to the frame inputs (JSON array).
    #[arg(long)]
    input: PathBuf,

    /// Path to write the timeline and failures (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Optional analysis config (JSON). Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pixels per physical unit; lengths and curvature are reported in units.
    #[arg(long)]
    pixels_per_unit: Option<f64>,

    /// Head detection rule for frames in automatic endpoint mode.
    #[arg(long, value_enum)]
    head_rule: Option<HeadRuleArg>,

    /// Seed each automatic frame with the endpoints of the previous frame.
    #[arg(long)]
    propagate_endpoints: bool,

    /// Place landmarks at evenly spaced fractions (0.05, 0.15, …, 0.95).
    #[arg(long)]
    legacy_uniform_segments: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HeadRuleArg {
    Topmost,
    Bottommost,
    Leftmost,
    Rightmost,
    Tapered,
}

impl HeadRuleArg {
    fn to_core(self) -> HeadRule {
        match self {
            Self::Topmost => HeadRule::Topmost,
            Self::Bottommost => HeadRule::Bottommost,
            Self::Leftmost => HeadRule::Leftmost,
            Self::Rightmost => HeadRule::Rightmost,
            Self::Tapered => HeadRule::Tapered,
        }
    }
}

impl CliAnalyzeArgs {
    fn build_config(&self) -> CliResult<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(rule) = self.head_rule {
            config = config.with_head_rule(rule.to_core());
        }
        if self.legacy_uniform_segments {
            config = config.with_proportions(SegmentProportions::uniform());
        }
        if let Some(ppu) = self.pixels_per_unit {
            config = config.with_calibration(Calibration::new(ppu)?);
        }
        Ok(config)
    }
}

#[derive(serde::Serialize)]
struct FailureOut {
    frame: u64,
    error: String,
}

#[derive(serde::Serialize)]
struct AnalyzeOut<'a> {
    records: &'a SessionTimeline,
    failures: Vec<FailureOut>,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => run_analyze(&args),
        Commands::DefaultConfig => run_default_config(),

        Commands::Proportions {
            legacy_uniform_segments,
        } => run_proportions(legacy_uniform_segments),
    }
}

// ── default-config ─────────────────────────────────────────────────────

fn run_default_config() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&AnalysisConfig::default())?);
    Ok(())
}

// ── proportions ────────────────────────────────────────────────────────

fn run_proportions(legacy: bool) -> CliResult<()> {
    let props = if legacy {
        SegmentProportions::uniform()
    } else {
        SegmentProportions::default()
    };
    let fractions = props.fractions();

    println!("larvakin landmark table{}", if legacy { " (uniform)" } else { "" });
    println!("  {:<6}{:>8}", Landmark::Head.label(), "0.000");
    for (lm, f) in Landmark::ALL[1..11].iter().zip(fractions) {
        println!("  {:<6}{:>8.3}", lm.label(), f);
    }
    println!("  {:<6}{:>8}", Landmark::Tail.label(), "1.000");
    Ok(())
}

// ── analyze ────────────────────────────────────────────────────────────

fn run_analyze(args: &CliAnalyzeArgs) -> CliResult<()> {
    tracing::info!("Loading frames: {}", args.input.display());
    let data = std::fs::read_to_string(&args.input)?;
    let inputs: Vec<FrameInput> = serde_json::from_str(&data)?;
    tracing::info!("Frames: {}", inputs.len());

    let analyzer = Analyzer::new(args.build_config()?)?;
    let options = BatchOptions {
        propagate_endpoints: args.propagate_endpoints,
    };
    let report = analyzer.analyze_sequence(&inputs, &options);

    tracing::info!(
        "Analyzed {} frames, {} failed",
        report.timeline.len(),
        report.failures.len()
    );

    let out = AnalyzeOut {
        records: &report.timeline,
        failures: report
            .failures
            .iter()
            .map(|e| FailureOut {
                frame: e.frame,
                error: e.kind.to_string(),
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&out)?;
    std::fs::write(&args.out, &json)?;
    tracing::info!("Results written to {}", args.out.display());

    Ok(())
}
