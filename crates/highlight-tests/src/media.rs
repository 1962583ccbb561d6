//! Pipeline output against the FFmpeg-side helpers that need no binary.

use crate::fakes::{RecordingCutter, ScriptedVideo, SKIN};
use highlight_analysis::{run_highlight_pipeline, AnalysisConfig, NoProgress};
use highlight_core::HighlightError;
use highlight_media::{encode_jpeg, StreamCopyCutter, VideoDecoder, DEFAULT_THUMBNAIL_QUALITY};

#[test]
fn pipeline_thumbnails_encode_as_jpeg() {
    let video = ScriptedVideo::new(30.0).with_segment(5.0, 15.0, SKIN);
    let reel = run_highlight_pipeline(
        &video,
        &RecordingCutter::default(),
        &AnalysisConfig::default(),
        &NoProgress,
    )
    .unwrap();
    assert!(!reel.scenes.is_empty());

    for scene in &reel.scenes {
        let jpeg = encode_jpeg(&scene.thumbnail, DEFAULT_THUMBNAIL_QUALITY).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }
}

#[test]
fn stream_copy_args_match_selected_scene() {
    let video = ScriptedVideo::new(30.0).with_segment(5.0, 15.0, SKIN);
    let mut config = AnalysisConfig::default();
    config.scenes.top_k = 1;
    let reel =
        run_highlight_pipeline(&video, &RecordingCutter::default(), &config, &NoProgress).unwrap();
    let scene = reel.scenes[0].scene;
    assert_eq!(scene.start_time, 5.0);

    let args = StreamCopyCutter::new("in.mp4").ffmpeg_args(scene.start_time, scene.duration());
    let ss = args.iter().position(|a| a == "-ss").unwrap();
    assert_eq!(args[ss + 1], "5.000");
    let t = args.iter().position(|a| a == "-t").unwrap();
    assert_eq!(args[t + 1], "10.000");
}

#[test]
fn opening_a_missing_file_fails_before_ffmpeg() {
    let result = VideoDecoder::open("/nonexistent/highlight-input.mp4");
    assert!(matches!(result, Err(HighlightError::NotFound(_))));
}
