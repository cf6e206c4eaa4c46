// src/main.rs

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use ndarray::Axis;
use ndarray_stats::QuantileExt;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use mocap_angles::axis_names::{AXIS_NAMES, LEFT_ANGLE_NAMES, RIGHT_ANGLE_NAMES};
use mocap_angles::config::AnalysisConfig;
use mocap_angles::constants::{DEFAULT_ANIMATION_INTERVAL_MS, DEFAULT_ANIMATION_SKIP_FRAMES};
use mocap_angles::data_analysis::angle_models::AngleModels;
use mocap_angles::data_analysis::joint_angles::{calculate_angles, FrameRange, JointAngles};
use mocap_angles::data_analysis::statistics::SeriesStatistics;
use mocap_angles::data_input::angle_export::{
    default_export_path, load_angles_json, save_angles_json, AnglesDocument,
};
use mocap_angles::data_input::marker_identifier::{load_identified, IdentifiedCapture};
use mocap_angles::data_input::roles::Side;
use mocap_angles::plot_functions::animate_markers::{animate_markers, AngleOverlay, AnimationOptions};
use mocap_angles::plot_functions::plot_angle_dependencies::plot_angle_dependencies;
use mocap_angles::plot_functions::plot_joint_angles::plot_joint_angles;
use mocap_angles::plot_functions::plot_marker_projections::plot_marker_projections;
use mocap_angles::plot_functions::plot_marker_trajectories::plot_marker_trajectories;
use mocap_angles::plot_functions::plot_q2_time_model::plot_q2_time_model;
use mocap_angles::crate_version;

type CliResult<T> = Result<T, Box<dyn Error>>;

const REPORT_RULE_WIDTH: usize = 60;

#[derive(Parser)]
#[command(name = "mocap_angles")]
#[command(about = "Joint angles from motion-capture marker trajectories")]
#[command(version)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides).
    #[arg(long, global = true)]
    verbose: bool,

    /// TOML analysis configuration (layout rules, default frequency).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Frame window, `--to` exclusive.
#[derive(Args, Debug, Clone, Copy)]
struct FrameRangeArgs {
    /// First frame to include.
    #[arg(long = "from")]
    from: Option<usize>,

    /// Frame after the last one to include.
    #[arg(long = "to")]
    to: Option<usize>,
}

impl FrameRangeArgs {
    fn range(&self) -> FrameRange {
        FrameRange::new(self.from, self.to)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print metadata, markers and movement statistics of capture files.
    Inspect {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Compute joint angles of one capture, print statistics and plot them.
    Angles {
        file: PathBuf,

        #[command(flatten)]
        range: FrameRangeArgs,

        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Compute joint angles and save them as JSON, one file per capture.
    Export {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        range: FrameRangeArgs,

        #[arg(long, default_value = "data/calculated_angles")]
        output_dir: PathBuf,
    },
    /// Fit angle models to exported JSON files and plot them.
    Fit {
        #[arg(required = true)]
        jsons: Vec<PathBuf>,

        #[command(flatten)]
        range: FrameRangeArgs,

        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Plot 3D marker trajectories and 2D projections of one frame.
    Markers {
        file: PathBuf,

        /// Frame for the 2D projections.
        #[arg(long, default_value_t = 0)]
        frame: usize,

        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Render the marker motion as a GIF animation.
    Animate {
        file: PathBuf,

        /// Output GIF path.
        #[arg(long)]
        save: PathBuf,

        /// Render every n-th frame.
        #[arg(long, default_value_t = DEFAULT_ANIMATION_SKIP_FRAMES)]
        skip_frames: usize,

        /// Delay between rendered frames in milliseconds.
        #[arg(long, default_value_t = DEFAULT_ANIMATION_INTERVAL_MS)]
        interval: u32,

        /// Show Q1/Q2/Q3 plots next to the 3D view.
        #[arg(long)]
        with_angles: bool,

        #[arg(long)]
        title: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!("mocap_angles {}", crate_version());

    let config = AnalysisConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { files } => run_batch(&files, |file| run_inspect(file, &config)),
        Commands::Angles {
            file,
            range,
            output_dir,
        } => run_angles(&file, range.range(), &output_dir, &config),
        Commands::Export {
            files,
            range,
            output_dir,
        } => run_batch(&files, |file| {
            run_export(file, range.range(), &output_dir, &config)
        }),
        Commands::Fit {
            jsons,
            range,
            output_dir,
        } => run_batch(&jsons, |json| run_fit(json, range.range(), &output_dir)),
        Commands::Markers {
            file,
            frame,
            output_dir,
        } => run_markers(&file, frame, &output_dir, &config),
        Commands::Animate {
            file,
            save,
            skip_frames,
            interval,
            with_angles,
            title,
        } => {
            let options = AnimationOptions {
                title: title.unwrap_or_else(|| AnimationOptions::default().title),
                skip_frames,
                interval_ms: interval,
            };
            run_animate(&file, &save, with_angles, &options, &config)
        }
    }
}

/// Runs `job` on every path, reporting failures and carrying on.
fn run_batch<F>(paths: &[PathBuf], mut job: F) -> CliResult<()>
where
    F: FnMut(&Path) -> CliResult<()>,
{
    let mut failures = 0;
    for path in paths {
        if let Err(e) = job(path.as_path()) {
            eprintln!("Error processing '{}': {}", path.display(), e);
            failures += 1;
        }
    }
    if failures > 0 {
        return Err(format!("{} of {} files failed", failures, paths.len()).into());
    }
    Ok(())
}

/// `<output_dir>/<file stem>`, creating `output_dir`.
fn output_root(output_dir: &Path, input: &Path) -> CliResult<String> {
    fs::create_dir_all(output_dir)?;
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "capture".to_string());
    Ok(output_dir.join(stem).to_string_lossy().into_owned())
}

fn load_with_angles(
    file: &Path,
    config: &AnalysisConfig,
) -> CliResult<(IdentifiedCapture, JointAngles, f64)> {
    println!("Reading file: {}", file.display());
    let identified = load_identified(file, &config.layouts)?;
    let frequency_hz = identified
        .metadata
        .frequency_hz_or(config.default_frequency_hz);
    println!(
        "Loaded {} frames with {} markers ({} layout)",
        identified.num_frames(),
        identified.num_markers(),
        identified.layout_name
    );
    println!("   Markers: {}", identified.simple_names().join(", "));

    println!("\nCalculating joint angles...");
    let angles = calculate_angles(&identified.frames, &identified.roles);
    Ok((identified, angles, frequency_hz))
}

fn print_angle_statistics(angles: &JointAngles) {
    println!("\nAngle Statistics:");
    for side in Side::BOTH {
        println!("\n  {} side:", side.name());
        let names = match side {
            Side::Right => RIGHT_ANGLE_NAMES,
            Side::Left => LEFT_ANGLE_NAMES,
        };
        for (name, series) in names.iter().zip(angles.side(side).series()) {
            match SeriesStatistics::from_series(series) {
                Some(stats) => println!(
                    "    {}: {:.1}° ± {:.1}° (range: {:.1}° - {:.1}°)",
                    name, stats.mean, stats.std, stats.min, stats.max
                ),
                None => println!("    {}: no data", name),
            }
        }
    }
}

fn print_range_note(range: FrameRange, total: usize) {
    if !range.is_full() {
        let (start, end) = range.resolve(total);
        println!("   Using frames {} to {} (total: {})", start, end, total);
    }
}

fn run_inspect(file: &Path, config: &AnalysisConfig) -> CliResult<()> {
    let rule = "=".repeat(REPORT_RULE_WIDTH);
    println!("\n{rule}");
    println!("Reading file: {}", file.display());
    println!("{rule}");

    let identified = load_identified(file, &config.layouts)?;

    println!("\nMetadata:");
    for (key, value) in identified.metadata.iter() {
        println!("  {key}: {value}");
    }

    let names = identified.simple_names();
    println!("\nMarkers ({} pcs, {} layout):", names.len(), identified.layout_name);
    println!("  Simple names and original:");
    for (simple_name, original) in names.iter().zip(&identified.marker_names).take(5) {
        println!("  {simple_name} ({original})");
    }
    if names.len() > 5 {
        println!("  ... and {} more", names.len() - 5);
    }

    let shape = identified.frames.shape();
    println!("\nData:");
    println!("  Array shape: ({}, {}, {})", shape[0], shape[1], shape[2]);
    println!("  (frames, markers, XYZ coordinates)");
    let filled = identified.missing.iter().filter(|&&m| m).count();
    if filled > 0 {
        println!("  Samples zero-filled from short rows: {filled}");
    }

    if identified.num_frames() > 0 {
        println!("\nFirst frame (first 3 markers):");
        let first = identified.frames.index_axis(Axis(0), 0);
        for (marker_idx, simple_name) in names.iter().enumerate().take(3) {
            println!("  {simple_name}:");
            for (axis, axis_name) in AXIS_NAMES.iter().enumerate() {
                println!("    {axis_name}: {:8.3} mm", first[[marker_idx, axis]]);
            }
        }

        println!("\nMovement statistics (all frames):");
        for (axis, axis_name) in AXIS_NAMES.iter().enumerate() {
            let axis_data = identified.frames.index_axis(Axis(2), axis);
            let (Ok(min), Ok(max), Some(mean)) = (axis_data.min(), axis_data.max(), axis_data.mean())
            else {
                println!("  {axis_name}: undefined");
                continue;
            };
            println!("  {axis_name}: min={min:8.2}, max={max:8.2}, mean={mean:8.2}");
        }
    }

    println!("\n{rule}");
    Ok(())
}

fn run_angles(
    file: &Path,
    range: FrameRange,
    output_dir: &Path,
    config: &AnalysisConfig,
) -> CliResult<()> {
    let (_identified, angles, frequency_hz) = load_with_angles(file, config)?;
    print_angle_statistics(&angles);

    println!("\nCreating plots...");
    print_range_note(range, angles.num_frames());
    let (start, _) = range.resolve(angles.num_frames());
    let root_name = output_root(output_dir, file)?;
    plot_joint_angles(
        &angles.slice_frames(range),
        frequency_hz,
        &root_name,
        start,
        angles.num_frames(),
    )?;

    println!("\nDone!");
    Ok(())
}

fn run_export(
    file: &Path,
    range: FrameRange,
    output_dir: &Path,
    config: &AnalysisConfig,
) -> CliResult<()> {
    let rule = "=".repeat(REPORT_RULE_WIDTH);
    println!("\n{rule}");
    let (identified, angles, frequency_hz) = load_with_angles(file, config)?;
    print_angle_statistics(&angles);
    print_range_note(range, angles.num_frames());

    let document = AnglesDocument::new(&angles, frequency_hz, &identified.metadata, range);
    let output_path = default_export_path(file, output_dir);
    save_angles_json(&output_path, &document)?;
    println!("\nAngles saved to: {}", output_path.display());
    println!("{rule}");
    Ok(())
}

fn run_fit(json: &Path, range: FrameRange, output_dir: &Path) -> CliResult<()> {
    println!("\nReading: {}", json.display());
    let document = load_angles_json(json)?;
    let all_angles = document.joint_angles();
    print_range_note(range, all_angles.num_frames());
    let angles = all_angles.slice_frames(range);
    let frequency_hz = document.metadata.frequency;

    let models = AngleModels::fit(&angles, frequency_hz)?;
    let measurement_name = json
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    println!("\nCoefficients for {measurement_name}:");
    for side in Side::BOTH {
        let side_models = models.side(side);
        println!("\n  {} side:", side.name());
        println!("    phi_1(q2) = q1: {}", side_models.phi1.describe());
        println!("    phi_3(q2) = q3: {}", side_models.phi3.describe());
        println!("    q2(t): {}", side_models.q2_of_t.describe());
    }

    let root_name = output_root(output_dir, json)?;
    plot_angle_dependencies(&angles, &models, &root_name)?;
    plot_q2_time_model(&angles, &models, &root_name)?;
    info!("Fitted models for {}", json.display());
    Ok(())
}

fn run_markers(
    file: &Path,
    frame: usize,
    output_dir: &Path,
    config: &AnalysisConfig,
) -> CliResult<()> {
    println!("Reading file: {}", file.display());
    let identified = load_identified(file, &config.layouts)?;
    if frame >= identified.num_frames() {
        return Err(format!(
            "frame {} out of range, capture has {} frames",
            frame,
            identified.num_frames()
        )
        .into());
    }

    let root_name = output_root(output_dir, file)?;
    let labels = identified.simple_names();
    plot_marker_trajectories(&identified.frames, labels, &root_name)?;
    plot_marker_projections(
        identified.frames.index_axis(Axis(0), frame),
        frame,
        labels,
        &root_name,
    )?;
    Ok(())
}

fn run_animate(
    file: &Path,
    save: &Path,
    with_angles: bool,
    options: &AnimationOptions,
    config: &AnalysisConfig,
) -> CliResult<()> {
    if let Some(parent) = save.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    if with_angles {
        let (identified, angles, frequency_hz) = load_with_angles(file, config)?;
        let overlay = AngleOverlay {
            angles: &angles,
            frequency_hz,
        };
        animate_markers(
            &identified.frames,
            identified.simple_names(),
            Some(overlay),
            save,
            options,
        )?;
    } else {
        println!("Reading file: {}", file.display());
        let identified = load_identified(file, &config.layouts)?;
        animate_markers(
            &identified.frames,
            identified.simple_names(),
            None,
            save,
            options,
        )?;
    }
    Ok(())
}
