use std::str::FromStr;
use storyboard_core::{AspectRatio, GenerateRequestBuilder, ImageReference, ImageRequestBuilder};

#[test]
fn aspect_ratio_round_trips_through_strings() {
    assert_eq!(AspectRatio::from_str("16:9").unwrap(), AspectRatio::Widescreen);
    assert_eq!(AspectRatio::Tall.to_string(), "9:16");
    assert_eq!(AspectRatio::Portrait.as_str(), "3:4");
    assert!(AspectRatio::from_str("2:1").is_err());
    assert_eq!(
        serde_json::to_string(&AspectRatio::Landscape).unwrap(),
        "\"4:3\""
    );
}

#[test]
fn image_reference_reports_mime_and_payload() {
    let jpeg = ImageReference::from_bytes(ImageReference::JPEG, b"jpeg-bytes");
    assert!(jpeg.as_str().starts_with("data:image/jpeg;base64,"));
    assert_eq!(jpeg.mime_type(), "image/jpeg");
    assert_eq!(jpeg.decode().unwrap(), b"jpeg-bytes".to_vec());
}

#[test]
fn image_reference_parse_rejects_non_image_uris() {
    assert!(ImageReference::parse("data:image/png;base64,AAAA").is_some());
    assert!(ImageReference::parse("data:audio/wav;base64,AAAA").is_none());
    assert!(ImageReference::parse("https://example.com/a.png").is_none());
}

#[test]
fn corrupt_payload_fails_to_decode() {
    let bad = ImageReference::parse("data:image/png;base64,@@@").unwrap();
    assert!(bad.decode().is_err());
}

#[test]
fn image_request_builder_fills_defaults() {
    let request = ImageRequestBuilder::default()
        .model("imagen-4.0-generate-001")
        .prompt("A harbor at dawn")
        .build()
        .unwrap();

    assert_eq!(request.number_of_images, 1);
    assert_eq!(request.output_mime, "image/jpeg");
    assert_eq!(request.aspect_ratio, AspectRatio::Square);
}

#[test]
fn generate_request_builder_requires_prompt() {
    let result = GenerateRequestBuilder::default()
        .model("gemini-2.5-flash")
        .build();
    assert!(result.is_err());
}
