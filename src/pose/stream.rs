//! 事前抽出済みランドマークストリーム（JSON Lines）
//!
//! 1行1オブジェクト:
//! `{"frame": 0, "width": 1280, "height": 720, "landmarks": [[x, y, z, visibility], ...]}`
//!
//! `frame` がない行は直前の番号 + 1。`width`/`height` がない場合は設定値を使う。
//! 姿勢が検出されなかったフレームは `landmarks` が `null`（または省略）。

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use super::landmark::{FrameDimensions, Landmark, LandmarkIndex, Landmarks};
use super::resolver::PoseProvider;
use crate::pipeline::{FrameSource, VideoFrame};

#[derive(Debug, Deserialize)]
struct StreamRecord {
    #[serde(default)]
    frame: Option<u64>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    landmarks: Option<Vec<[f32; 4]>>,
}

/// ストリーム1行分のフレーム
#[derive(Debug, Clone)]
pub struct LandmarkFrame {
    pub index: u64,
    pub dims: FrameDimensions,
    pub landmarks: Option<Landmarks>,
}

impl VideoFrame for LandmarkFrame {
    fn dimensions(&self) -> FrameDimensions {
        self.dims
    }

    fn index(&self) -> Option<u64> {
        Some(self.index)
    }
}

pub struct LandmarkStream<R: BufRead> {
    lines: Lines<R>,
    line_number: usize,
    next_index: u64,
    default_dims: FrameDimensions,
}

impl LandmarkStream<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P, default_dims: FrameDimensions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open landmark stream {}", path.display()))?;
        Ok(Self::new(BufReader::new(file), default_dims))
    }
}

impl<R: BufRead> LandmarkStream<R> {
    pub fn new(reader: R, default_dims: FrameDimensions) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            next_index: 0,
            default_dims,
        }
    }

    fn parse_line(&mut self, line: &str) -> Result<LandmarkFrame> {
        let record: StreamRecord = serde_json::from_str(line)
            .with_context(|| format!("line {}: invalid landmark record", self.line_number))?;

        let landmarks = match record.landmarks {
            Some(raw) => {
                if raw.len() != LandmarkIndex::COUNT {
                    bail!(
                        "line {}: expected {} landmarks, got {}",
                        self.line_number,
                        LandmarkIndex::COUNT,
                        raw.len()
                    );
                }
                let mut points = [Landmark::default(); LandmarkIndex::COUNT];
                for (point, [x, y, z, visibility]) in points.iter_mut().zip(raw) {
                    *point = Landmark::new(x, y, z, visibility);
                }
                Some(Landmarks::new(points))
            }
            None => None,
        };

        let index = record.frame.unwrap_or(self.next_index);
        self.next_index = index.saturating_add(1);

        Ok(LandmarkFrame {
            index,
            dims: FrameDimensions::new(
                record.width.unwrap_or(self.default_dims.width),
                record.height.unwrap_or(self.default_dims.height),
            ),
            landmarks,
        })
    }
}

impl<R: BufRead> FrameSource for LandmarkStream<R> {
    type Frame = LandmarkFrame;

    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        while let Some(line) = self.lines.next() {
            self.line_number += 1;
            let line = line.with_context(|| format!("line {}: read failed", self.line_number))?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return self.parse_line(trimmed).map(Some);
        }
        Ok(None)
    }
}

/// [`LandmarkFrame`] に記録済みのランドマークをそのまま返す
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordedPose;

impl PoseProvider for RecordedPose {
    type Frame = LandmarkFrame;

    fn extract(&mut self, frame: &LandmarkFrame) -> Result<Option<Landmarks>> {
        Ok(frame.landmarks.clone())
    }
}
