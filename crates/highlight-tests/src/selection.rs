//! Cross-module checks of extraction, fusion and selection.

use highlight_analysis::scenes::score_candidates;
use highlight_analysis::{
    extract_audio, extract_frame, fuse, select_scenes, AudioFeature, FrameAnalysisConfig,
    FrameFeature, FusedSample,
};
use highlight_core::{FrameBuffer, PixelFormat};
use proptest::prelude::*;

fn fused(time: f64, value: f32) -> FusedSample {
    FusedSample {
        time,
        skin_confidence: value,
        audio_intensity: value,
    }
}

#[test]
fn twenty_second_track_with_one_peak() {
    let track: Vec<_> = (0..20)
        .map(|i| fused(i as f64, if (5..10).contains(&i) { 0.9 } else { 0.2 }))
        .collect();

    let scenes = select_scenes(&track, 5.0, 1, 20.0);
    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].start_time, 5.0);
    assert_eq!(scenes[0].end_time, 10.0);
    assert!((scenes[0].score - 0.9).abs() < 1e-5);
}

#[test]
fn window_longer_than_track_selects_nothing() {
    let track = vec![fused(0.0, 0.5), fused(1.0, 0.5), fused(2.0, 0.5)];
    assert!(select_scenes(&track, 10.0, 2, 3.0).is_empty());
}

#[test]
fn frames_and_silence_fuse_into_skin_only_scores() {
    let config = FrameAnalysisConfig::default();
    let skin = FrameBuffer::solid(64, 48, PixelFormat::Rgba8, [230, 200, 180]);
    let gray = FrameBuffer::solid(64, 48, PixelFormat::Rgba8, [128, 128, 128]);

    let frames: Vec<FrameFeature> = (0..12)
        .map(|i| {
            let frame = if i % 3 == 0 { &skin } else { &gray };
            extract_frame(frame, i as f64, &config)
        })
        .collect();
    let audio = extract_audio(&[0.0; 1200], 100, 0.5, |_| {});
    assert!(audio.iter().all(|a| a.intensity == 0.0));

    let track = fuse(&frames, &audio, 0.1);
    for candidate in score_candidates(&track, 4.0) {
        let skin: Vec<f32> = track
            .iter()
            .filter(|s| s.time >= candidate.start_time && s.time < candidate.start_time + 4.0)
            .map(|s| s.skin_confidence)
            .collect();
        let mean = skin.iter().sum::<f32>() / skin.len() as f32;
        assert_eq!(candidate.score, 0.7 * mean);
    }
}

proptest! {
    #[test]
    fn fusion_is_idempotent(
        skins in prop::collection::vec(0.0f32..=1.0, 1..40),
        intensities in prop::collection::vec(0.0f32..=1.0, 0..80),
        frame_step in 0.2f64..2.0,
        chunk in 0.1f64..1.0,
        tolerance in 0.0f64..0.5,
    ) {
        let frames: Vec<FrameFeature> = skins
            .iter()
            .enumerate()
            .map(|(i, &s)| FrameFeature {
                time: i as f64 * frame_step,
                skin_confidence: s,
                regions: Vec::new(),
            })
            .collect();
        let audio: Vec<AudioFeature> = intensities
            .iter()
            .enumerate()
            .map(|(i, &a)| AudioFeature { time: i as f64 * chunk, intensity: a })
            .collect();

        let once = fuse(&frames, &audio, tolerance);
        let refused_frames: Vec<FrameFeature> = once
            .iter()
            .map(|s| FrameFeature {
                time: s.time,
                skin_confidence: s.skin_confidence,
                regions: Vec::new(),
            })
            .collect();
        let refused_audio: Vec<AudioFeature> = once
            .iter()
            .map(|s| AudioFeature { time: s.time, intensity: s.audio_intensity })
            .collect();

        prop_assert_eq!(fuse(&refused_frames, &refused_audio, tolerance), once);
    }

    #[test]
    fn selection_respects_top_k_and_order(
        values in prop::collection::vec(0.0f32..=1.0, 0..50),
        window in 1.0f64..15.0,
        top_k in 1usize..6,
    ) {
        let track: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| fused(i as f64, v))
            .collect();
        let scenes = select_scenes(&track, window, top_k, values.len() as f64);

        prop_assert!(scenes.len() <= top_k);
        prop_assert!(scenes.windows(2).all(|w| w[0].start_time <= w[1].start_time));
        prop_assert!(scenes.iter().all(|s| s.end_time <= s.start_time + window));
    }
}
