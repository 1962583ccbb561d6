//! End-to-end pipeline runs against scripted media.

use crate::fakes::{tone_track, RecordingCutter, ScriptedVideo, MID_SKIN, SKIN};
use highlight_analysis::{
    analyze, run_highlight_pipeline, AnalysisConfig, AnalysisError, AnalysisProgress,
    AnalysisStage, NoProgress,
};
use highlight_core::AudioBuffer;
use parking_lot::Mutex;

fn config(window_secs: f64, top_k: usize) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.scenes.window_secs = window_secs;
    config.scenes.top_k = top_k;
    config
}

/// Skin on screen at `[10, 20)` and `[40, 50)` of a 60 s video.
fn two_highlights() -> ScriptedVideo {
    ScriptedVideo::new(60.0)
        .with_segment(10.0, 20.0, SKIN)
        .with_segment(40.0, 50.0, SKIN)
}

#[test]
fn loud_skin_section_is_extracted() {
    let video = ScriptedVideo::new(60.0)
        .with_segment(20.0, 30.0, SKIN)
        .with_audio(tone_track(60.0, 100, &[(20.0, 30.0, 0.9)]));
    let cutter = RecordingCutter::default();

    let reel = run_highlight_pipeline(&video, &cutter, &config(10.0, 1), &NoProgress).unwrap();

    assert_eq!(reel.duration, 60.0);
    assert_eq!(reel.scenes.len(), 1);
    let scene = &reel.scenes[0];
    assert_eq!((scene.scene.start_time, scene.scene.end_time), (20.0, 30.0));
    assert_eq!(scene.clip, b"clip@20+10".to_vec());
    assert_eq!((scene.thumbnail.width, scene.thumbnail.height), (32, 24));
    assert_eq!(cutter.cuts(), vec![(20.0, 10.0)]);
}

#[test]
fn scenes_come_back_chronologically() {
    let cutter = RecordingCutter::default();
    let reel =
        run_highlight_pipeline(&two_highlights(), &cutter, &config(10.0, 2), &NoProgress).unwrap();

    let starts: Vec<f64> = reel.scenes.iter().map(|s| s.scene.start_time).collect();
    assert_eq!(starts, vec![10.0, 40.0]);
    assert_eq!(cutter.cuts(), vec![(10.0, 10.0), (40.0, 10.0)]);
}

#[test]
fn stronger_section_wins_over_weaker_one() {
    // Mid tones saturate the per-pixel confidence, light tones do not
    let video = ScriptedVideo::new(60.0)
        .with_segment(10.0, 20.0, SKIN)
        .with_segment(40.0, 50.0, MID_SKIN);
    let analysis = analyze(&video, &config(10.0, 1), &NoProgress).unwrap();
    assert_eq!(analysis.scenes.len(), 1);
    assert_eq!(analysis.scenes[0].start_time, 40.0);
}

#[test]
fn overlapping_scenes_are_not_suppressed() {
    let video = ScriptedVideo::new(60.0).with_segment(10.0, 40.0, SKIN);
    let analysis = analyze(&video, &config(10.0, 2), &NoProgress).unwrap();

    assert_eq!(analysis.scenes.len(), 2);
    assert_eq!(analysis.scenes[0].start_time, 10.0);
    assert_eq!(analysis.scenes[1].start_time, 11.0);
    assert!(analysis.scenes[1].start_time < analysis.scenes[0].end_time);
}

#[test]
fn failed_cut_drops_only_that_scene() {
    let cutter = RecordingCutter::failing_at(&[10.0]);
    let reel =
        run_highlight_pipeline(&two_highlights(), &cutter, &config(10.0, 2), &NoProgress).unwrap();

    assert_eq!(reel.scenes.len(), 1);
    assert_eq!(reel.scenes[0].scene.start_time, 40.0);
    assert_eq!(reel.failures.len(), 1);
    assert_eq!(reel.failures[0].index, 0);
    assert_eq!(reel.failures[0].start_time, 10.0);
    assert!(reel.failures[0].reason.contains("cut at 10 failed"));
}

#[test]
fn failed_thumbnail_drops_only_that_scene() {
    let mut video = two_highlights();
    // Odd second, never hit by the 2 s frame sampling
    video.fail_seeks_at = vec![41.0];
    let mut config = config(10.0, 2);
    config.frame.sample_interval_secs = 2.0;

    let cutter = RecordingCutter::default();
    let reel = run_highlight_pipeline(&video, &cutter, &config, &NoProgress).unwrap();

    assert_eq!(reel.scenes.len(), 1);
    assert_eq!(reel.scenes[0].scene.start_time, 10.0);
    assert_eq!(reel.failures[0].index, 1);
    assert!(reel.failures[0].reason.contains("seek to 41"));
    assert!(video.seeks().contains(&11.0));
}

#[test]
fn silent_audio_scores_on_skin_alone() {
    let video = two_highlights().with_audio(AudioBuffer::new(vec![0.0; 6000], 100));
    let analysis = analyze(&video, &config(10.0, 2), &NoProgress).unwrap();

    assert!(analysis.fused.iter().all(|s| s.audio_intensity == 0.0));
    assert_eq!(analysis.scenes.len(), 2);
    for scene in &analysis.scenes {
        let skin: Vec<f32> = analysis
            .fused
            .iter()
            .filter(|s| s.time >= scene.start_time && s.time < scene.start_time + 10.0)
            .map(|s| s.skin_confidence)
            .collect();
        let mean = skin.iter().sum::<f32>() / skin.len() as f32;
        assert_eq!(scene.score, 0.7 * mean);
    }
}

#[test]
fn missing_audio_stream_is_not_an_error() {
    let video = two_highlights().with_audio(AudioBuffer::default());
    let reel = run_highlight_pipeline(
        &video,
        &RecordingCutter::default(),
        &config(10.0, 2),
        &NoProgress,
    )
    .unwrap();
    assert_eq!(reel.scenes.len(), 2);
}

#[test]
fn video_shorter_than_window_has_no_highlights() {
    let video = ScriptedVideo::new(4.0).with_segment(0.0, 4.0, SKIN);
    let cutter = RecordingCutter::default();
    let reel = run_highlight_pipeline(&video, &cutter, &config(10.0, 2), &NoProgress).unwrap();

    assert!(reel.is_empty());
    assert!(reel.failures.is_empty());
    assert!(cutter.cuts().is_empty());
}

#[test]
fn seek_failure_during_analysis_aborts() {
    let mut video = two_highlights();
    video.fail_seeks_at = vec![3.0];
    let result = run_highlight_pipeline(
        &video,
        &RecordingCutter::default(),
        &config(10.0, 2),
        &NoProgress,
    );
    assert!(matches!(
        result,
        Err(AnalysisError::DecodeFailure { stage: "frames", .. })
    ));
}

#[test]
fn unreadable_video_aborts() {
    let mut video = two_highlights();
    video.fail_cursor = true;
    let result = analyze(&video, &config(10.0, 2), &NoProgress);
    assert!(matches!(
        result,
        Err(AnalysisError::DecodeFailure {
            stage: "open cursor",
            ..
        })
    ));
}

#[test]
fn audio_decode_failure_aborts() {
    let mut video = two_highlights();
    video.fail_audio = true;
    let result = analyze(&video, &config(10.0, 2), &NoProgress);
    assert!(matches!(
        result,
        Err(AnalysisError::DecodeFailure { stage: "audio", .. })
    ));
}

#[test]
fn progress_runs_through_every_stage() {
    let seen = Mutex::new(Vec::<AnalysisProgress>::new());
    let sink = |p: &AnalysisProgress| seen.lock().push(p.clone());

    run_highlight_pipeline(
        &two_highlights(),
        &RecordingCutter::default(),
        &config(10.0, 2),
        &sink,
    )
    .unwrap();

    let seen = seen.lock();
    assert!(seen.windows(2).all(|w| w[0].percent <= w[1].percent));
    for stage in [
        AnalysisStage::Preparing,
        AnalysisStage::AnalyzingFrames,
        AnalysisStage::AnalyzingAudio,
        AnalysisStage::Scoring,
        AnalysisStage::Extracting,
        AnalysisStage::Complete,
    ] {
        assert!(seen.iter().any(|p| p.stage == stage), "missing {stage:?}");
    }
    assert_eq!(seen.last().map(|p| p.percent), Some(100.0));
}
