//! フレーム単位の逐次解析ループ
//!
//! 1フレームごとに 姿勢推定 → 指標 → フレーム判定 → 履歴追加 の順で処理し、
//! 終わってから次のフレームを読む。停止フラグで途中終了しても、
//! それまでの履歴は採点される。

use anyhow::Result;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::biomechanics::{FrameFeedback, FrameFeedbackRules, FrameMetrics, MetricExtractor};
use crate::config::Config;
use crate::evaluation::{Evaluation, MetricsHistory, ShotEvaluator};
use crate::pose::{FrameDimensions, JointResolver, PoseProvider, VisibilityResolver};

/// 進捗ログの間隔（フレーム数）
const PROGRESS_INTERVAL: u64 = 10;

pub trait VideoFrame {
    fn dimensions(&self) -> FrameDimensions;

    /// ソース側のフレーム番号（持たない場合は読み出し順の番号を使う）
    fn index(&self) -> Option<u64> {
        None
    }
}

/// 動画の終わりまでフレームを順に返す
pub trait FrameSource {
    type Frame: VideoFrame;

    fn next_frame(&mut self) -> Result<Option<Self::Frame>>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessingStats {
    pub frames_processed: u64,
    pub frames_with_pose: u64,
    pub elapsed: Duration,
    pub stopped_early: bool,
}

impl ProcessingStats {
    pub fn average_fps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames_processed as f64 / secs
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub evaluation: Evaluation,
    pub history: MetricsHistory,
    /// 最後に姿勢が検出されたフレームの判定
    pub last_feedback: Option<FrameFeedback>,
    pub stats: ProcessingStats,
}

pub struct Analyzer<P, R = VisibilityResolver>
where
    P: PoseProvider,
    R: JointResolver,
{
    provider: P,
    extractor: MetricExtractor<R>,
    rules: FrameFeedbackRules,
    evaluator: ShotEvaluator,
}

impl<P> Analyzer<P, VisibilityResolver>
where
    P: PoseProvider,
    P::Frame: VideoFrame,
{
    pub fn from_config(provider: P, config: &Config) -> Self {
        Self::new(
            provider,
            MetricExtractor::new(
                VisibilityResolver::new(config.analysis.visibility_threshold),
                config.analysis.front_side,
            ),
            FrameFeedbackRules::from_config(&config.thresholds),
            ShotEvaluator::from_config(config),
        )
    }
}

impl<P, R> Analyzer<P, R>
where
    P: PoseProvider,
    P::Frame: VideoFrame,
    R: JointResolver,
{
    pub fn new(
        provider: P,
        extractor: MetricExtractor<R>,
        rules: FrameFeedbackRules,
        evaluator: ShotEvaluator,
    ) -> Self {
        Self {
            provider,
            extractor,
            rules,
            evaluator,
        }
    }

    /// 1フレーム分の指標と判定（姿勢未検出なら判定は None）
    pub fn process_frame(
        &mut self,
        frame_number: u64,
        frame: &P::Frame,
    ) -> Result<(FrameMetrics, Option<FrameFeedback>)> {
        let landmarks = self.provider.extract(frame)?;
        if let Some(lm) = &landmarks {
            debug!("frame {}: average visibility {:.2}", frame_number, lm.average_visibility());
        }
        let metrics = self
            .extractor
            .extract(frame_number, landmarks.as_ref(), frame.dimensions());
        let feedback = landmarks.map(|_| self.rules.evaluate(&metrics));
        Ok((metrics, feedback))
    }

    pub fn run<S>(&mut self, source: &mut S, stop: &AtomicBool) -> Result<AnalysisResult>
    where
        S: FrameSource<Frame = P::Frame>,
    {
        self.run_with(source, stop, |_, _| {})
    }

    /// [`run`](Self::run) と同じだが、各フレームの記録後に `on_frame` を呼ぶ
    pub fn run_with<S, F>(
        &mut self,
        source: &mut S,
        stop: &AtomicBool,
        mut on_frame: F,
    ) -> Result<AnalysisResult>
    where
        S: FrameSource<Frame = P::Frame>,
        F: FnMut(&FrameMetrics, Option<&FrameFeedback>),
    {
        info!("analysis started");
        let start = Instant::now();
        let mut history = MetricsHistory::new();
        let mut last_feedback = None;
        let mut processed = 0u64;
        let mut frames_with_pose = 0u64;
        let mut stopped_early = false;
        let mut window_start = Instant::now();

        loop {
            if stop.load(Ordering::Relaxed) {
                warn!("stop requested after {} frames, scoring collected history", processed);
                stopped_early = true;
                break;
            }
            let Some(frame) = source.next_frame()? else {
                break;
            };

            let frame_number = frame.index().unwrap_or(processed);
            let (metrics, feedback) = self.process_frame(frame_number, &frame)?;
            match feedback {
                Some(fb) => {
                    frames_with_pose += 1;
                    last_feedback = Some(fb);
                }
                None => debug!("frame {}: no pose detected", frame_number),
            }
            history.push(metrics);
            on_frame(&metrics, feedback.as_ref());
            processed += 1;

            if processed % PROGRESS_INTERVAL == 0 {
                let secs = window_start.elapsed().as_secs_f64();
                let fps = if secs > 0.0 { PROGRESS_INTERVAL as f64 / secs } else { 0.0 };
                info!("processed {} frames ({:.2} FPS)", processed, fps);
                window_start = Instant::now();
            }
        }

        let stats = ProcessingStats {
            frames_processed: processed,
            frames_with_pose,
            elapsed: start.elapsed(),
            stopped_early,
        };
        info!(
            "processing complete: {} frames ({} with pose) in {:.2}s, {:.2} FPS",
            stats.frames_processed,
            stats.frames_with_pose,
            stats.elapsed.as_secs_f64(),
            stats.average_fps()
        );

        let evaluation = self.evaluator.evaluate(&history);
        info!(
            "overall score {} ({})",
            evaluation.overall_score, evaluation.grade
        );

        Ok(AnalysisResult {
            evaluation,
            history,
            last_feedback,
            stats,
        })
    }
}
