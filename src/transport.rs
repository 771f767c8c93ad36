//! Protocol-neutral replies for the prediction and liveness endpoints.
//!
//! A server adapter only has to copy `status` and `body` onto its response.

use serde::Serialize;
use serde_json::{Value, json};

use crate::ml::features::ValidationError;
use crate::pipeline::{ErrorKind, InferencePipeline, PredictError, Prediction};
use crate::registry::PipelineState;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

const RUNNING_MESSAGE: &str = "Breast Cancer Prediction API is running";

/// Status code and JSON body for one response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

#[derive(Serialize)]
struct FieldReason<'a> {
    field: &'a str,
    reason: String,
}

/// Parse a raw request body and run it through the pipeline.
pub fn handle_predict(pipeline: &InferencePipeline, body: &[u8]) -> Reply {
    // The availability gate answers before the body is even parsed.
    let result = if pipeline.is_ready() {
        serde_json::from_slice::<Value>(body)
            .map_err(|err| PredictError::Validation(ValidationError::Malformed(err.to_string())))
            .and_then(|payload| pipeline.predict(&payload))
    } else {
        pipeline.predict(&Value::Null)
    };
    respond(&result)
}

/// Map a pipeline outcome onto a reply.
pub fn respond(result: &Result<Prediction, PredictError>) -> Reply {
    match result {
        Ok(prediction) => Reply {
            status: STATUS_OK,
            body: json!({ "prediction": prediction.label() }),
        },
        Err(err) => error_reply(err),
    }
}

fn error_reply(err: &PredictError) -> Reply {
    let code = match err.kind() {
        ErrorKind::Validation => "validation_error",
        ErrorKind::ModelUnavailable => "model_unavailable",
        ErrorKind::Unexpected => "internal_error",
    };
    match err {
        PredictError::Validation(inner) => {
            let fields: Vec<FieldReason<'_>> = inner
                .issues()
                .iter()
                .map(|issue| FieldReason {
                    field: &issue.field,
                    reason: issue.kind.to_string(),
                })
                .collect();
            Reply {
                status: STATUS_BAD_REQUEST,
                body: json!({
                    "error": code,
                    "detail": err.public_detail(),
                    "fields": fields,
                }),
            }
        }
        PredictError::ModelUnavailable { .. } | PredictError::Unexpected(_) => Reply {
            status: STATUS_INTERNAL_ERROR,
            body: json!({ "error": code, "detail": err.public_detail() }),
        },
    }
}

/// Liveness report; always 200 so the process is seen as up even without a model.
pub fn health(state: &PipelineState) -> Reply {
    Reply {
        status: STATUS_OK,
        body: json!({
            "status": if state.is_ready() { "healthy" } else { "unavailable" },
            "message": RUNNING_MESSAGE,
            "model_loaded": state.model_loaded(),
            "scaler_loaded": state.scaler_loaded(),
        }),
    }
}
