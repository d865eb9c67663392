//! Generation endpoints
//!
//! - `POST /api/generate` - run one generation under the plan's quota
//! - `GET /api/generations` - the caller's 20 most recent generations

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::generation::db::{list_recent_generations, Generation, HISTORY_LIMIT};
use crate::backend::generation::pipeline::{run_generation, GenerationInput, GenerationOutcome};
use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::DEFAULT_WATERMARK_TEXT;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: Option<String>,
    pub style: Option<String>,
    pub room_type: Option<String>,
}

impl GenerateRequest {
    fn validate(self) -> BackendResult<GenerationInput> {
        let trimmed = |v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        match (trimmed(self.prompt), trimmed(self.style)) {
            (Some(prompt), Some(style)) => Ok(GenerationInput {
                prompt,
                style,
                room_type: trimmed(self.room_type),
            }),
            _ => Err(BackendError::validation("Prompt and style are required")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WatermarkInfo {
    pub required: bool,
    pub text: Option<&'static str>,
    pub customizable: bool,
}

#[derive(Debug, Serialize)]
pub struct UsageInfo {
    pub used: i64,
    pub limit: i64,
    pub remaining: i64,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub image: String,
    pub watermark: WatermarkInfo,
    pub usage: UsageInfo,
}

impl From<GenerationOutcome> for GenerateResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        let plan = outcome.plan;
        Self {
            success: true,
            image: outcome.image_url,
            watermark: WatermarkInfo {
                required: plan.requires_watermark(),
                text: plan.requires_watermark().then_some(DEFAULT_WATERMARK_TEXT),
                customizable: plan.watermark_customizable(),
            },
            usage: UsageInfo {
                used: outcome.used,
                limit: plan.generation_limit(),
                remaining: plan.remaining(outcome.used),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerationsResponse {
    pub success: bool,
    pub generations: Vec<Generation>,
}

/// POST /api/generate
pub async fn generate(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<GenerateRequest>,
) -> BackendResult<Json<GenerateResponse>> {
    let input = request.validate()?;
    let outcome = run_generation(&state, user.0.account_id, &input).await?;

    tracing::info!(
        "Generation for {} on plan {} ({} used)",
        user.0.account_id,
        outcome.plan,
        outcome.used
    );

    Ok(Json(outcome.into()))
}

/// GET /api/generations
pub async fn list_generations(
    State(state): State<AppState>,
    user: AuthUser,
) -> BackendResult<Json<GenerationsResponse>> {
    let generations = list_recent_generations(&state.db, user.0.account_id, HISTORY_LIMIT).await?;

    Ok(Json(GenerationsResponse {
        success: true,
        generations,
    }))
}
