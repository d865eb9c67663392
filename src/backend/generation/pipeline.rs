/**
 * Generation Pipeline
 *
 * Runs one quota-checked generation for an account:
 *
 * 1. Load the account (the plan comes from storage, not from the token)
 * 2. Free plan: reserve a slot with a single conditional update
 * 3. Resolve the upstream keys and call the inference service
 * 4. Upload the image to the host
 * 5. Record the generation
 *
 * Steps 3 to 5 run under a compensation: if any of them fails, the slot
 * taken in step 2 is given back. Premium plans skip the reservation and
 * their counter never moves.
 */

use uuid::Uuid;

use crate::backend::auth::accounts::{get_account_by_id, release_generation, reserve_generation};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::generation::db::{insert_generation, NewGeneration};
use crate::backend::generation::huggingface::HuggingFaceClient;
use crate::backend::generation::imgbb::ImgbbClient;
use crate::backend::server::state::AppState;
use crate::shared::{Plan, FREE_GENERATION_LIMIT};

/// Validated generation input
#[derive(Debug, Clone)]
pub struct GenerationInput {
    pub prompt: String,
    pub style: String,
    pub room_type: Option<String>,
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub image_url: String,
    pub plan: Plan,
    /// Usage counter after this generation
    pub used: i64,
}

/// Full prompt sent to the model
pub fn compose_prompt(style: &str, room_type: Option<&str>, prompt: &str) -> String {
    match room_type {
        Some(room) => format!(
            "{} interior design, {}, {}, high quality, professional, 4k",
            style, room, prompt
        ),
        None => format!(
            "{} interior design, {}, high quality, professional, 4k",
            style, prompt
        ),
    }
}

fn required_key<'a>(value: &'a Option<String>, name: &str) -> BackendResult<&'a str> {
    value.as_deref().ok_or_else(|| {
        tracing::error!("{} is not configured", name);
        BackendError::config(format!("{} is not configured", name))
    })
}

pub async fn run_generation(
    state: &AppState,
    account_id: Uuid,
    input: &GenerationInput,
) -> BackendResult<GenerationOutcome> {
    let account = get_account_by_id(&state.db, account_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    let plan = account.plan;
    let used = if plan.is_free() {
        match reserve_generation(&state.db, account.id).await? {
            Some(used) => used,
            None => {
                tracing::info!("Free quota exhausted for {}", account.id);
                return Err(BackendError::QuotaExceeded {
                    used: account.generations_used.max(FREE_GENERATION_LIMIT),
                    plan,
                });
            }
        }
    } else {
        account.generations_used
    };

    let result = async {
        let hf_key = required_key(&state.config.huggingface_api_key, "HUGGINGFACE_API_KEY")?;
        let imgbb_key = required_key(&state.config.imgbb_api_key, "IMGBB_API_KEY")?;

        let hf = HuggingFaceClient::new(
            &state.http,
            &state.config.huggingface_api_url,
            hf_key,
            state.config.generation_timeout,
        );
        let imgbb = ImgbbClient::new(&state.http, &state.config.imgbb_api_url, imgbb_key);

        let full_prompt = compose_prompt(&input.style, input.room_type.as_deref(), &input.prompt);
        tracing::debug!("Generating for {}: {}", account.id, full_prompt);

        let image = hf.generate_image(&full_prompt).await?;
        let image_url = imgbb.upload(&image).await?;

        insert_generation(
            &state.db,
            &NewGeneration {
                account_id: account.id,
                prompt: &input.prompt,
                style: &input.style,
                room_type: input.room_type.as_deref(),
                image_url: &image_url,
                has_watermark: plan.requires_watermark(),
            },
        )
        .await
        .map_err(|e| {
            tracing::error!("Orphaned upload {} for {}: {:?}", image_url, account.id, e);
            BackendError::Storage(e)
        })?;

        Ok::<_, BackendError>(image_url)
    }
    .await;

    match result {
        Ok(image_url) => Ok(GenerationOutcome {
            image_url,
            plan,
            used,
        }),
        Err(e) => {
            if plan.is_free() {
                if let Err(release_err) = release_generation(&state.db, account.id).await {
                    tracing::error!(
                        "Failed to release generation slot for {}: {:?}",
                        account.id,
                        release_err
                    );
                }
            }
            Err(e)
        }
    }
}
