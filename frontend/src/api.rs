use gloo_file::Blob;
use gloo_net::http::Request;
use shared::endpoint::resolve_classifier_url;
use shared::{ClassifyFailure, Outcome, Prediction};
use web_sys::FormData;

const UPLOAD_FIELD: &str = "file";
const UPLOAD_FILENAME: &str = "cropped.jpg";

/// Build-time override, else derived from the host serving the page.
pub fn classifier_url() -> String {
    let hostname = web_sys::window().and_then(|window| window.location().hostname().ok());
    resolve_classifier_url(option_env!("BIRD_CLASSIFIER_URL"), hostname.as_deref())
}

/// Posts one JPEG crop to the classifier. Every failure comes back as `Err`.
pub async fn classify(endpoint: &str, jpeg: Vec<u8>) -> Outcome {
    let blob = Blob::new_with_options(jpeg.as_slice(), Some("image/jpeg"));

    let form_data =
        FormData::new().map_err(|e| ClassifyFailure::Network(format!("{:?}", e)))?;
    form_data
        .append_with_blob_and_filename(UPLOAD_FIELD, &web_sys::Blob::from(blob), UPLOAD_FILENAME)
        .map_err(|e| ClassifyFailure::Network(format!("{:?}", e)))?;

    let response = Request::post(endpoint)
        .body(form_data)
        .map_err(|e| ClassifyFailure::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ClassifyFailure::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        log::warn!("Classifier error: {} - {}", status, body);
        return Err(ClassifyFailure::Status(status));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ClassifyFailure::Decode(e.to_string()))?;
    serde_json::from_str::<Prediction>(&body).map_err(|e| ClassifyFailure::Decode(e.to_string()))
}
