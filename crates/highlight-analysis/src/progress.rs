//! Progress reporting for a highlight run.
//!
//! Frame and audio extraction run concurrently, so their fractions are
//! combined under a lock and the reported percent never goes backwards.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Pipeline stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisStage {
    /// Opening the source and reading its duration.
    Preparing,
    /// Sampling frames for skin tone.
    AnalyzingFrames,
    /// Measuring audio loudness.
    AnalyzingAudio,
    /// Fusing signals and ranking windows.
    Scoring,
    /// Taking thumbnails and cutting clips.
    Extracting,
    /// All done.
    Complete,
}

impl AnalysisStage {
    /// Display name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Preparing => "Preparing",
            Self::AnalyzingFrames => "Analyzing frames",
            Self::AnalyzingAudio => "Analyzing audio",
            Self::Scoring => "Scoring scenes",
            Self::Extracting => "Extracting highlights",
            Self::Complete => "Complete",
        }
    }

    /// Percent range `(start, end)` this stage covers.
    pub fn span(&self) -> (f32, f32) {
        match self {
            Self::Preparing => (0.0, 35.0),
            Self::AnalyzingFrames => (35.0, 60.0),
            Self::AnalyzingAudio => (60.0, 80.0),
            Self::Scoring => (80.0, 80.0),
            Self::Extracting => (80.0, 95.0),
            Self::Complete => (100.0, 100.0),
        }
    }

    fn width(&self) -> f32 {
        let (start, end) = self.span();
        end - start
    }
}

/// One progress report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisProgress {
    pub stage: AnalysisStage,
    /// Overall progress (0.0 to 100.0).
    pub percent: f32,
    /// Human-readable detail, e.g. which clip is being cut.
    pub current_task: Option<String>,
}

/// Receiver of progress reports. Called from worker threads.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: &AnalysisProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(&AnalysisProgress) + Send + Sync,
{
    fn report(&self, progress: &AnalysisProgress) {
        self(progress)
    }
}

/// Sink that drops every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _progress: &AnalysisProgress) {}
}

#[derive(Debug, Default)]
struct TrackerState {
    frames: f32,
    audio: f32,
    clips_done: usize,
    last_percent: f32,
}

/// Turns per-stage fractions into monotonic overall reports.
pub struct ProgressTracker<'a> {
    sink: &'a dyn ProgressSink,
    state: Mutex<TrackerState>,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(sink: &'a dyn ProgressSink) -> Self {
        Self {
            sink,
            state: Mutex::new(TrackerState::default()),
        }
    }

    /// Report entry into `stage` at the start of its range.
    pub fn enter(&self, stage: AnalysisStage, task: Option<String>) {
        let mut state = self.state.lock();
        let percent = stage.span().0;
        self.emit(&mut state, stage, percent, task);
    }

    /// Frame extraction is `fraction` done.
    pub fn frames(&self, fraction: f32) {
        let mut state = self.state.lock();
        state.frames = state.frames.max(fraction.clamp(0.0, 1.0));
        let percent = Self::analysis_percent(&state);
        self.emit(&mut state, AnalysisStage::AnalyzingFrames, percent, None);
    }

    /// Audio extraction is `fraction` done.
    pub fn audio(&self, fraction: f32) {
        let mut state = self.state.lock();
        state.audio = state.audio.max(fraction.clamp(0.0, 1.0));
        let percent = Self::analysis_percent(&state);
        self.emit(&mut state, AnalysisStage::AnalyzingAudio, percent, None);
    }

    /// One more of `total` scenes has finished extracting.
    pub fn scene_done(&self, total: usize, task: String) {
        let mut state = self.state.lock();
        state.clips_done += 1;
        let fraction = state.clips_done as f32 / total.max(1) as f32;
        let stage = AnalysisStage::Extracting;
        let percent = stage.span().0 + stage.width() * fraction.min(1.0);
        self.emit(&mut state, stage, percent, Some(task));
    }

    /// Report completion.
    pub fn complete(&self) {
        self.enter(AnalysisStage::Complete, None);
    }

    /// Most recently reported percent.
    pub fn percent(&self) -> f32 {
        self.state.lock().last_percent
    }

    fn analysis_percent(state: &TrackerState) -> f32 {
        AnalysisStage::AnalyzingFrames.span().0
            + AnalysisStage::AnalyzingFrames.width() * state.frames
            + AnalysisStage::AnalyzingAudio.width() * state.audio
    }

    // Called with the lock held so reports reach the sink in percent order
    fn emit(
        &self,
        state: &mut TrackerState,
        stage: AnalysisStage,
        percent: f32,
        current_task: Option<String>,
    ) {
        state.last_percent = state.last_percent.max(percent);
        self.sink.report(&AnalysisProgress {
            stage,
            percent: state.last_percent,
            current_task,
        });
    }
}
