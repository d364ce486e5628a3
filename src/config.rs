use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::biomechanics::FrontSide;
use crate::evaluation::{Category, ScoringWeights};
use crate::pose::{FrameDimensions, DEFAULT_VISIBILITY_THRESHOLD};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    /// カテゴリ名 → 重み（未指定カテゴリは 0.2）
    #[serde(default)]
    pub scoring: BTreeMap<String, f64>,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// 投手側を向く体の側（右打者なら left）
    #[serde(default)]
    pub front_side: FrontSide,
    /// ランドマーク採用の可視性閾値（この値より大きい場合のみ採用）
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f32,
    /// ストリームに解像度がない場合のフレーム幅
    #[serde(default = "default_frame_width")]
    pub frame_width: u32,
    /// ストリームに解像度がない場合のフレーム高さ
    #[serde(default = "default_frame_height")]
    pub frame_height: u32,
}

fn default_visibility_threshold() -> f32 { DEFAULT_VISIBILITY_THRESHOLD }
fn default_frame_width() -> u32 { 640 }
fn default_frame_height() -> u32 { 480 }

impl AnalysisConfig {
    pub fn frame_dimensions(&self) -> FrameDimensions {
        FrameDimensions::new(self.frame_width, self.frame_height)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            front_side: FrontSide::default(),
            visibility_threshold: default_visibility_threshold(),
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
        }
    }
}

/// 合格範囲 [good_min, good_max]（両端を含む）
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GoodRange {
    pub good_min: f64,
    pub good_max: f64,
}

impl GoodRange {
    pub fn new(good_min: f64, good_max: f64) -> Self {
        Self { good_min, good_max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.good_min <= value && value <= self.good_max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HeadKneeConfig {
    /// 頭と前膝の許容水平距離（ピクセル）
    pub max_distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FootDirectionConfig {
    /// 理想的な前足の向き（度）
    pub ideal_angle: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_elbow_angle")]
    pub elbow_angle: GoodRange,
    #[serde(default = "default_spine_lean")]
    pub spine_lean: GoodRange,
    #[serde(default = "default_head_knee_alignment")]
    pub head_knee_alignment: HeadKneeConfig,
    #[serde(default = "default_foot_direction")]
    pub foot_direction: FootDirectionConfig,
}

fn default_elbow_angle() -> GoodRange { GoodRange::new(110.0, 140.0) }
fn default_spine_lean() -> GoodRange { GoodRange::new(10.0, 25.0) }
fn default_head_knee_alignment() -> HeadKneeConfig { HeadKneeConfig { max_distance: 50.0 } }
fn default_foot_direction() -> FootDirectionConfig { FootDirectionConfig { ideal_angle: 45.0 } }

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            elbow_angle: default_elbow_angle(),
            spine_lean: default_spine_lean(),
            head_knee_alignment: default_head_knee_alignment(),
            foot_direction: default_foot_direction(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputConfig {
    /// ランドマークストリーム（JSON Lines）のパス
    #[serde(default)]
    pub landmarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: String,
    #[serde(default = "default_evaluation_file")]
    pub evaluation_file: String,
}

fn default_output_directory() -> String { "output".to_string() }
fn default_evaluation_file() -> String { "evaluation.json".to_string() }

impl OutputConfig {
    pub fn evaluation_path(&self) -> std::path::PathBuf {
        Path::new(&self.directory).join(&self.evaluation_file)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            evaluation_file: default_evaluation_file(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_directory")]
    pub directory: String,
    /// env_logger のフィルタ文字列 (e.g. "info", "cover_drive=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_directory() -> String { "logs".to_string() }
fn default_log_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// ファイルが存在しない場合のみデフォルト設定を返す（読み込み・検証エラーはそのまま返す）
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            eprintln!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        for (name, range) in [("elbow_angle", t.elbow_angle), ("spine_lean", t.spine_lean)] {
            if range.good_min > range.good_max {
                bail!(
                    "thresholds.{name}: good_min ({}) exceeds good_max ({})",
                    range.good_min,
                    range.good_max
                );
            }
        }
        if t.head_knee_alignment.max_distance <= 0.0 {
            bail!(
                "thresholds.head_knee_alignment.max_distance must be positive, got {}",
                t.head_knee_alignment.max_distance
            );
        }
        if !(0.0..=1.0).contains(&self.analysis.visibility_threshold) {
            bail!(
                "analysis.visibility_threshold must be within [0, 1], got {}",
                self.analysis.visibility_threshold
            );
        }
        for (name, weight) in &self.scoring {
            if *weight < 0.0 {
                bail!("scoring.{name}: negative weight {weight}");
            }
        }
        Ok(())
    }

    /// 既知のカテゴリに対応しない scoring キー（重みは無視される）
    pub fn unknown_scoring_keys(&self) -> Vec<&str> {
        self.scoring
            .keys()
            .filter(|name| Category::from_name(name).is_none())
            .map(String::as_str)
            .collect()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from_names(&self.scoring)
    }
}
