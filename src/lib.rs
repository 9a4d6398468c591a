mod docx;
mod file_utils;
mod inflate;
mod pdf;
mod pipeline;
mod schema;
mod segmenter;

pub use docx::extract_docx_text;
pub use file_utils::detect_kind;
pub use inflate::{InflateFormat, inflate};
pub use pdf::extract_pdf_text;
pub use pipeline::{dummy_resume_data, parse_resume_bytes};
pub use schema::{EducationEntry, ExperienceEntry, ExtractError, ParsedResume, Profile};
pub use segmenter::segment;

use base64::Engine;
use serde_json::json;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn parse_resume_base64(
    base64_bytes: &str,
    filename: Option<String>,
    mime_type: Option<String>,
) -> JsValue {
    // convenience wrapper to allow passing base64 bytes from JS (where typed arrays may not be handy)
    match base64::engine::general_purpose::STANDARD.decode(base64_bytes) {
        Ok(bytes) => parse_resume(&bytes, filename, mime_type),
        Err(e) => JsValue::from_str(
            &json!({"error": format!("base64 decode failed: {:?}", e)}).to_string(),
        ),
    }
}

#[wasm_bindgen]
pub fn parse_resume(bytes: &[u8], filename: Option<String>, mime_type: Option<String>) -> JsValue {
    let detected = file_utils::detect_kind(filename.as_deref(), mime_type.as_deref(), bytes);

    match pipeline::parse_resume_bytes(bytes, filename.as_deref(), mime_type.as_deref()) {
        Ok(resume) => match serde_json::to_string(&resume) {
            Ok(s) => JsValue::from_str(&s),
            Err(_) => JsValue::from_str(&json!({"error":"serialization failed"}).to_string()),
        },
        Err(err) => {
            log_error(&err.to_string());
            JsValue::from_str(&json!({"error": err.to_string(), "detected": detected}).to_string())
        }
    }
}

#[wasm_bindgen]
pub fn dummy_resume() -> JsValue {
    match serde_json::to_string(&pipeline::dummy_resume_data()) {
        Ok(s) => JsValue::from_str(&s),
        Err(_) => JsValue::from_str(&json!({"error":"serialization failed"}).to_string()),
    }
}

#[cfg(target_arch = "wasm32")]
fn log_error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn log_error(_message: &str) {}
