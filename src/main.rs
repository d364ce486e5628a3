use anyhow::{Context, Result};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use cover_drive::config::Config;
use cover_drive::evaluation::Category;
use cover_drive::logging;
use cover_drive::pipeline::Analyzer;
use cover_drive::pose::{LandmarkStream, RecordedPose};

const CONFIG_PATH: &str = "config.toml";

/// Usage: cover_drive [config.toml] [landmarks.jsonl]
fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => Config::load(&path)?,
        None => Config::load_or_default(CONFIG_PATH)?,
    };

    let log_path = logging::init(&config.logging, "analysis")?;
    log::info!("Cover Drive Analyzer ({})", env!("GIT_VERSION"));
    log::info!("log file: {}", log_path.display());
    log::info!(
        "[config] front_side={:?}, visibility_threshold={}, frame={}x{}",
        config.analysis.front_side,
        config.analysis.visibility_threshold,
        config.analysis.frame_width,
        config.analysis.frame_height
    );
    for name in config.unknown_scoring_keys() {
        log::warn!("scoring.{name}: unknown category, weight ignored");
    }

    let input = args
        .next()
        .or_else(|| config.input.landmarks.clone())
        .context("no landmark stream given (argument or [input] landmarks)")?;
    let mut source = LandmarkStream::open(&input, config.analysis.frame_dimensions())?;
    log::info!("landmark stream: {}", input);

    // SIGINT / SIGTERM → 現在のフレームの後で停止し、そこまでを採点
    let stop = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&stop))?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&stop))?;

    let mut analyzer = Analyzer::from_config(RecordedPose, &config);
    let result = analyzer.run(&mut source, &stop)?;

    let evaluation_path = config.output.evaluation_path();
    result.evaluation.save(&evaluation_path)?;
    log::info!("evaluation saved to {}", evaluation_path.display());

    let stats = &result.stats;
    println!();
    println!("{}", "=".repeat(50));
    println!("ANALYSIS COMPLETE{}", if stats.stopped_early { " (stopped early)" } else { "" });
    println!("{}", "=".repeat(50));
    println!("Overall Score: {}/10", result.evaluation.overall_score);
    println!("Grade: {}", result.evaluation.grade);
    println!(
        "Frames: {} ({} with pose), {:.2} FPS",
        stats.frames_processed,
        stats.frames_with_pose,
        stats.average_fps()
    );
    println!("Evaluation File: {}", evaluation_path.display());
    println!();
    println!("Category Scores:");
    for category in Category::ALL {
        println!(
            "  {}: {}/10",
            category.title(),
            result.evaluation.category_scores.get(category)
        );
    }
    println!();
    println!("Detailed feedback saved to evaluation file.");

    Ok(())
}
