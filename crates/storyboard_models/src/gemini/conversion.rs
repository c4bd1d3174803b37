//! Conversions between Storyboard's neutral types and the Gemini wire format.

use super::protocol::{
    ApiErrorBody, Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, ImageConfig, Part, PredictInstance, PredictParameters, PredictRequest,
    PredictResponse, PrebuiltVoiceConfig, SpeechConfig, VoiceConfig,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use storyboard_core::{GenerateRequest, GenerateResponse, ImageRequest, Output, ResponseFormat};
use storyboard_error::{GeminiError, GeminiErrorKind, TRANSIENT_STATUS_CODES};

/// Build a `generateContent` body from a neutral request.
pub fn to_generate_content(req: &GenerateRequest) -> GenerateContentRequest {
    let generation_config = match &req.response {
        ResponseFormat::Text => None,
        ResponseFormat::Json { schema } => Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema.clone()),
            ..Default::default()
        }),
        ResponseFormat::Image { aspect_ratio } => Some(GenerationConfig {
            response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
            image_config: aspect_ratio.map(|ratio| ImageConfig {
                aspect_ratio: ratio.to_string(),
            }),
            ..Default::default()
        }),
        ResponseFormat::Audio { voice } => Some(GenerationConfig {
            response_modalities: Some(vec!["AUDIO".to_string()]),
            speech_config: Some(SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: voice.clone(),
                    },
                },
            }),
            ..Default::default()
        }),
    };

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part::text(&req.prompt)],
        }],
        generation_config,
    }
}

/// Flatten the first candidate's parts into neutral outputs, preserving order.
///
/// Inline payloads are base64-decoded; parts with neither text nor data are skipped.
pub fn from_generate_content(
    resp: &GenerateContentResponse,
) -> Result<GenerateResponse, GeminiError> {
    let parts = resp
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| content.parts.as_slice())
        .unwrap_or_default();

    let mut outputs = Vec::with_capacity(parts.len());
    for part in parts {
        if let Some(inline) = &part.inline_data {
            let data = STANDARD.decode(&inline.data).map_err(|e| {
                GeminiError::new(GeminiErrorKind::Base64Decode(format!(
                    "inline {} payload: {}",
                    inline.mime_type, e
                )))
            })?;
            let mime = (!inline.mime_type.is_empty()).then(|| inline.mime_type.clone());
            if inline.mime_type.starts_with("image/") {
                outputs.push(Output::Image { mime, data });
            } else {
                outputs.push(Output::Audio { mime, data });
            }
        } else if let Some(text) = &part.text {
            outputs.push(Output::Text(text.clone()));
        }
    }

    Ok(GenerateResponse { outputs })
}

/// Build a `predict` body from a neutral image request.
pub fn to_predict(req: &ImageRequest) -> PredictRequest {
    PredictRequest {
        instances: vec![PredictInstance {
            prompt: req.prompt.clone(),
        }],
        parameters: PredictParameters {
            sample_count: req.number_of_images,
            aspect_ratio: req.aspect_ratio.to_string(),
            output_mime_type: req.output_mime.clone(),
        },
    }
}

/// Decode every returned image; predictions without bytes are skipped.
pub fn from_predict(resp: &PredictResponse) -> Result<Vec<Vec<u8>>, GeminiError> {
    resp.predictions
        .iter()
        .filter_map(|prediction| prediction.bytes_base64_encoded.as_deref())
        .map(|encoded| {
            STANDARD.decode(encoded).map_err(|e| {
                GeminiError::new(GeminiErrorKind::Base64Decode(format!(
                    "prediction payload: {}",
                    e
                )))
            })
        })
        .collect()
}

/// Turn a non-2xx response into a provider error.
///
/// The nested `error.code` replaces the HTTP status when it is a transient code,
/// and `error.status` / `error.message` are concatenated into the message so the
/// transient classifier sees both.
pub fn parse_error_body(http_status: u16, body: &str) -> GeminiError {
    let nested = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error)
        .unwrap_or_default();

    let status_code = match nested.code {
        Some(code) if TRANSIENT_STATUS_CODES.contains(&code) => code,
        _ => http_status,
    };

    GeminiError::new(GeminiErrorKind::HttpError {
        status_code,
        message: error_message(&nested, body),
    })
}

fn error_message(nested: &ApiErrorBody, body: &str) -> String {
    let pieces: Vec<&str> = [nested.status.as_deref(), nested.message.as_deref()]
        .into_iter()
        .flatten()
        .filter(|piece| !piece.is_empty())
        .collect();

    if pieces.is_empty() {
        body.trim().to_string()
    } else {
        pieces.join(": ")
    }
}
