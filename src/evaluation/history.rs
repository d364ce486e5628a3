use std::ops::Index;

use crate::biomechanics::FrameMetrics;

/// 処理した全フレームの指標（フレーム順）
///
/// 追加のみ（削除・並べ替え不可）。姿勢未検出のフレームも全 `None` の
/// プレースホルダとして残すので、位置は動画のフレームと一致する。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsHistory {
    frames: Vec<FrameMetrics>,
}

impl MetricsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, metrics: FrameMetrics) {
        self.frames.push(metrics);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrameMetrics> {
        self.frames.iter()
    }

    /// 末尾 `count` フレーム分（プレースホルダを含む）
    pub fn trailing(&self, count: usize) -> &[FrameMetrics] {
        let start = self.frames.len().saturating_sub(count);
        &self.frames[start..]
    }

    /// ある指標の存在する値のみ（フレーム順）
    pub fn samples<F>(&self, metric: F) -> Vec<f64>
    where
        F: Fn(&FrameMetrics) -> Option<f64>,
    {
        self.frames.iter().filter_map(metric).collect()
    }
}

impl Index<usize> for MetricsHistory {
    type Output = FrameMetrics;

    fn index(&self, index: usize) -> &FrameMetrics {
        &self.frames[index]
    }
}

impl FromIterator<FrameMetrics> for MetricsHistory {
    fn from_iter<I: IntoIterator<Item = FrameMetrics>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<FrameMetrics>> for MetricsHistory {
    fn from(frames: Vec<FrameMetrics>) -> Self {
        Self { frames }
    }
}

impl<'a> IntoIterator for &'a MetricsHistory {
    type Item = &'a FrameMetrics;
    type IntoIter = std::slice::Iter<'a, FrameMetrics>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
