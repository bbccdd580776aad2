//! End-to-end pipeline tests using the deterministic static engine.

use img_embed::prelude::*;
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::Arc;

const DIM: usize = 2048;

fn test_config() -> ExtractorConfig {
    ExtractorConfig::default()
}

fn ready_pipeline() -> Pipeline {
    Pipeline::with_engine(test_config(), Arc::new(StaticEngine::new(DIM))).unwrap()
}

fn encode_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 251) as u8, (y % 241) as u8, ((x + y) % 239) as u8])
    });
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, format)
        .unwrap();
    buf.into_inner()
}

fn vector_norm(values: &[f32]) -> f32 {
    values.iter().map(|v| v * v).sum::<f32>().sqrt()
}

#[test]
fn well_formed_jpeg_extracts_successfully() {
    let pipeline = ready_pipeline();
    let bytes = encode_image(224, 224, ImageFormat::Jpeg);

    let result = pipeline
        .extract(&bytes, "image/jpeg", ExtractOptions::default())
        .unwrap();

    assert_eq!(result.feature_dimension, DIM);
    assert_eq!(pipeline.config().model.feature_dimension, DIM);
    assert_eq!(result.features.len(), DIM);
    assert_eq!(result.model_name, "static");
    assert!(result.processing_time_ms >= 0.0);
    // Metadata omitted when not requested.
    assert!(result.metadata.is_none());
    assert!(result.image_id.is_none());
}

#[test]
fn extraction_is_deterministic() {
    let pipeline = ready_pipeline();
    let bytes = encode_image(300, 200, ImageFormat::Png);

    let a = pipeline
        .extract(&bytes, "image/png", ExtractOptions::default())
        .unwrap();
    let b = pipeline
        .extract(&bytes, "image/png", ExtractOptions::default())
        .unwrap();

    assert_eq!(a.features, b.features);
}

#[test]
fn feature_vector_is_unit_normalized() {
    let pipeline = ready_pipeline();
    let bytes = encode_image(128, 96, ImageFormat::Png);

    let result = pipeline
        .extract(&bytes, "image/png", ExtractOptions::default())
        .unwrap();

    assert!((vector_norm(&result.features) - 1.0).abs() < 1e-2);
}

#[test]
fn all_zero_raw_output_becomes_zero_vector() {
    let pipeline =
        Pipeline::with_engine(test_config(), Arc::new(StaticEngine::all_zero(DIM))).unwrap();
    let bytes = encode_image(64, 64, ImageFormat::Png);

    let result = pipeline
        .extract(&bytes, "image/png", ExtractOptions::default())
        .unwrap();

    assert_eq!(result.features.len(), DIM);
    assert!(result.features.iter().all(|&v| v == 0.0));
}

#[test]
fn metadata_reports_source_dimensions_not_tensor_dimensions() {
    let pipeline = ready_pipeline();
    let bytes = encode_image(640, 480, ImageFormat::Png);

    let result = pipeline
        .extract(&bytes, "image/png", ExtractOptions::default().with_metadata())
        .unwrap();

    let metadata = result.metadata.unwrap();
    assert_eq!(metadata.width, 640);
    assert_eq!(metadata.height, 480);
    assert_eq!(metadata.format, "PNG");
}

#[test]
fn image_id_passes_through_unmodified() {
    let pipeline = ready_pipeline();
    let bytes = encode_image(32, 32, ImageFormat::Png);

    let result = pipeline
        .extract(
            &bytes,
            "image/png",
            ExtractOptions::default().with_image_id("  opaque id, never validated!  "),
        )
        .unwrap();

    assert_eq!(
        result.image_id.as_deref(),
        Some("  opaque id, never validated!  ")
    );
}

#[test]
fn disallowed_content_type_is_rejected_before_decode() {
    let pipeline = ready_pipeline();
    let bytes = encode_image(32, 32, ImageFormat::Png);

    let err = pipeline
        .extract(&bytes, "image/gif", ExtractOptions::default())
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    let msg = err.to_string();
    assert!(msg.contains("Unsupported"));
    assert!(msg.contains("image/jpeg"));
}

#[test]
fn oversized_payload_is_rejected() {
    let config = ExtractorConfig {
        max_payload_bytes: 1024,
        ..test_config()
    };
    let pipeline = Pipeline::with_engine(config, Arc::new(StaticEngine::new(DIM))).unwrap();
    let bytes = encode_image(256, 256, ImageFormat::Png);
    assert!(bytes.len() > 1024);

    let err = pipeline
        .extract(&bytes, "image/png", ExtractOptions::default())
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert!(err.to_string().contains("exceeds"));
}

#[test]
fn non_image_bytes_with_allowed_type_fail_decode() {
    let pipeline = ready_pipeline();
    let bytes: Vec<u8> = (0..4096u32).map(|i| (i.wrapping_mul(31) % 256) as u8).collect();

    let err = pipeline
        .extract(&bytes, "image/jpeg", ExtractOptions::default())
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert!(err.to_string().contains("decode"));
}

#[test]
fn failed_pipeline_rejects_every_extract_call() {
    let pipeline = Pipeline::without_engine(test_config()).unwrap();
    assert_eq!(pipeline.state(), ModelState::Failed);

    let bytes = encode_image(224, 224, ImageFormat::Jpeg);
    let err = pipeline
        .extract(&bytes, "image/jpeg", ExtractOptions::default())
        .unwrap_err();

    assert_eq!(err.status_code(), 500);
    assert!(err.to_string().contains("not available"));
}

#[test]
fn health_reflects_pipeline_state_but_stays_healthy() {
    let ready = ready_pipeline();
    let health = ready.health();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.service, "feature-extraction-service");
    assert!(health.model_loaded);

    let failed = Pipeline::without_engine(test_config()).unwrap();
    let health = failed.health();
    assert_eq!(health.status, "healthy");
    assert!(!health.model_loaded);
}

#[test]
fn output_length_contract_violation_is_server_class() {
    // Engine returns fewer features than the configured dimension.
    let short = Arc::new(StaticEngine::new(DIM / 2));
    let pipeline = Pipeline::with_engine(test_config(), short).unwrap();
    let bytes = encode_image(64, 64, ImageFormat::Png);

    let err = pipeline
        .extract(&bytes, "image/png", ExtractOptions::default())
        .unwrap_err();

    assert_eq!(err.status_code(), 500);
    assert!(err.to_string().contains("mismatch"));
}

#[test]
fn result_serializes_to_the_wire_contract() {
    let pipeline = ready_pipeline();
    let bytes = encode_image(100, 50, ImageFormat::Png);

    let result = pipeline
        .extract(
            &bytes,
            "image/png",
            ExtractOptions::default()
                .with_image_id("img-7")
                .with_metadata(),
        )
        .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["image_id"], "img-7");
    assert_eq!(json["feature_dimension"], DIM);
    assert_eq!(json["features"].as_array().unwrap().len(), DIM);
    assert_eq!(json["model_name"], "static");
    assert_eq!(json["image_width"], 100);
    assert_eq!(json["image_height"], 50);
    assert_eq!(json["image_format"], "PNG");
}
