use anyhow::{Context, Result};
use std::sync::atomic::AtomicBool;

use cover_drive::config::Config;
use cover_drive::pipeline::Analyzer;
use cover_drive::pose::{LandmarkStream, RecordedPose};

const CONFIG_PATH: &str = "config.toml";

/// 各フレームの指標と判定を表示する
///
/// Usage: landmark_probe <landmarks.jsonl> [config.toml]
fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let input = args.next().context("usage: landmark_probe <landmarks.jsonl> [config.toml]")?;
    let config = match args.next() {
        Some(path) => Config::load(&path)?,
        None => Config::load_or_default(CONFIG_PATH)?,
    };
    for name in config.unknown_scoring_keys() {
        eprintln!("scoring.{name}: unknown category, weight ignored");
    }

    println!("=== Landmark Probe ===");
    println!("front side: {:?}", config.analysis.front_side);
    println!();

    let mut source = LandmarkStream::open(&input, config.analysis.frame_dimensions())?;
    let mut analyzer = Analyzer::from_config(RecordedPose, &config);

    let fmt = |v: Option<f64>| v.map_or("-".to_string(), |v| format!("{:.1}", v));
    let result = analyzer.run_with(&mut source, &AtomicBool::new(false), |m, feedback| {
        println!(
            "frame {:>5}: elbow={:>6} spine={:>6} head_knee={:>6} foot={:>6}",
            m.frame_number,
            fmt(m.elbow_angle),
            fmt(m.spine_lean),
            fmt(m.head_knee_distance),
            fmt(m.foot_direction)
        );
        match feedback {
            Some(fb) => {
                for verdict in fb.verdicts() {
                    println!("             {}", verdict);
                }
            }
            None => println!("             no pose"),
        }
    })?;

    println!();
    println!(
        "{} frames, {} with pose, overall {} ({})",
        result.stats.frames_processed,
        result.stats.frames_with_pose,
        result.evaluation.overall_score,
        result.evaluation.grade
    );
    Ok(())
}
