use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat, RgbImage};
use jacket_ai_common::{build_prompt, parse_estimates, Error, ImagePayload, Language, RollWidths};
use jacket_ai_rust::config::DEFAULT_API_BASE_URL;
use jacket_ai_rust::gemini::GeminiClient;
use jacket_ai_rust::provider::{EstimationProvider, EstimationRequest};
use std::io::Cursor;
use std::time::Duration;

#[tokio::test]
async fn gemini_estimate_integration() {
    let api_key = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            eprintln!("GEMINI_API_KEY not set; skipping integration test");
            return;
        }
    };

    // Plain navy rectangle, roughly jacket-shaped proportions
    let img = RgbImage::from_pixel(96, 128, image::Rgb([20, 30, 70]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .expect("encode test image");

    let request = EstimationRequest {
        image: ImagePayload::new("image/jpeg", STANDARD.encode(&bytes)).unwrap(),
        prompt: build_prompt(
            &RollWidths { main: Some(150.0), lining: Some(140.0), insulation: None },
            Language::En,
        ),
        language: Language::En,
    };

    let client = GeminiClient::new(
        api_key,
        "gemini-2.5-flash",
        DEFAULT_API_BASE_URL,
        Duration::from_secs(120),
        0.2,
    )
    .expect("client");

    let text = client.generate(&request).await.expect("gemini call failed");

    match parse_estimates(&text) {
        Ok(rows) => {
            assert!(rows.iter().all(|r| !r.size.trim().is_empty()));
        }
        // A featureless image may legitimately yield no rows
        Err(Error::NoEstimates) => eprintln!("model returned no rows for the synthetic image"),
        Err(e) => panic!("unparsable response: {e}\n{text}"),
    }
}
