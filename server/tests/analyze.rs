use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use analyzer::FeatureScaler;
use classifier::{Classify, Data, PredictedLabels};
use codec::Ingest;
use server::routes::router;
use server::state::AppState;

struct StubClassifier(Vec<f32>);

impl Classify for StubClassifier {
    fn classify(&self, data: &Data) -> anyhow::Result<PredictedLabels> {
        anyhow::ensure!(data.shape() == [1, 26], "unexpected input shape");
        Ok(PredictedLabels::from_vec(self.0.clone()))
    }
}

struct FailingClassifier;

impl Classify for FailingClassifier {
    fn classify(&self, _data: &Data) -> anyhow::Result<PredictedLabels> {
        anyhow::bail!("runtime rejected the tensor")
    }
}

fn test_state(scratch: &Path, classifier: Arc<dyn Classify>) -> AppState {
    AppState::new(
        classifier,
        FeatureScaler::trained(),
        Ingest::new(scratch).unwrap(),
    )
}

fn multipart_body(field: &str, filename: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let boundary = "test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

fn wav_fixture() -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..16_000 {
            let s = (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16_000.0).sin();
            writer
                .write_sample((s * 0.5 * f32::from(i16::MAX)) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

async fn post_analyze(
    state: AppState,
    content_type: &str,
    body: Vec<u8>,
) -> (StatusCode, serde_json::Value) {
    let response = router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn missing_file_field_is_a_400() {
    let scratch = tempfile::tempdir().unwrap();
    let state = test_state(scratch.path(), Arc::new(StubClassifier(vec![0.2, 0.8])));

    let (content_type, body) = multipart_body("other", "clip.wav", b"data");
    let (status, json) = post_analyze(state, &content_type, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file uploaded");
}

#[tokio::test]
async fn corrupt_audio_degrades_to_unknown() {
    let scratch = tempfile::tempdir().unwrap();
    let state = test_state(scratch.path(), Arc::new(StubClassifier(vec![0.2, 0.8])));

    let (content_type, body) = multipart_body("file", "clip.wav", b"definitely not audio");
    let (status, json) = post_analyze(state, &content_type, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["label"], "UNKNOWN");
    assert_eq!(json["confidence"], 0.0);
    assert_eq!(json["probabilities"].as_array().unwrap().len(), 0);
    assert_eq!(json["spectrogram"], "");
    assert_eq!(json["filename"], "clip.wav");
}

#[tokio::test]
async fn valid_wav_is_classified() {
    let scratch = tempfile::tempdir().unwrap();
    let state = test_state(scratch.path(), Arc::new(StubClassifier(vec![0.2, 0.8])));

    let (content_type, body) = multipart_body("file", "voice sample.wav", &wav_fixture());
    let (status, json) = post_analyze(state, &content_type, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["label"], "REAL");
    assert_eq!(json["feature_count"], 26);
    assert_eq!(json["probabilities"].as_array().unwrap().len(), 2);
    assert!((json["confidence"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    assert_eq!(json["filename"], "voice_sample.wav");
}

#[tokio::test]
async fn repeated_analysis_is_deterministic() {
    let scratch = tempfile::tempdir().unwrap();

    let mut replies = Vec::new();
    for _ in 0..2 {
        let state = test_state(scratch.path(), Arc::new(StubClassifier(vec![0.9, 0.1])));
        let (content_type, body) = multipart_body("file", "clip.wav", &wav_fixture());
        let (status, json) = post_analyze(state, &content_type, body).await;
        assert_eq!(status, StatusCode::OK);
        replies.push(json);
    }

    assert_eq!(replies[0]["label"], replies[1]["label"]);
    assert_eq!(replies[0]["confidence"], replies[1]["confidence"]);
    assert_eq!(replies[0]["probabilities"], replies[1]["probabilities"]);
}

#[tokio::test]
async fn classifier_failure_degrades_to_unknown() {
    let scratch = tempfile::tempdir().unwrap();
    let state = test_state(scratch.path(), Arc::new(FailingClassifier));

    let (content_type, body) = multipart_body("file", "clip.wav", &wav_fixture());
    let (status, json) = post_analyze(state, &content_type, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["label"], "UNKNOWN");
    assert_eq!(json["probabilities"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn scratch_files_do_not_outlive_the_request() {
    let scratch = tempfile::tempdir().unwrap();

    for payload in [b"garbage".to_vec(), wav_fixture()] {
        let state = test_state(scratch.path(), Arc::new(StubClassifier(vec![0.2, 0.8])));
        let (content_type, body) = multipart_body("file", "clip.wav", &payload);
        let (status, _) = post_analyze(state, &content_type, body).await;
        assert_eq!(status, StatusCode::OK);
    }

    let leftovers: Vec<_> = std::fs::read_dir(scratch.path())
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert!(
        leftovers.is_empty(),
        "scratch files left behind: {leftovers:?}"
    );
}

#[tokio::test]
async fn health_endpoint_answers() {
    let scratch = tempfile::tempdir().unwrap();
    let state = test_state(scratch.path(), Arc::new(StubClassifier(vec![0.2, 0.8])));

    let response = router(state)
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
}
