/**
 * Account Handlers
 *
 * Profile and preference endpoints for the authenticated account:
 *
 * - `GET /api/user/profile` - full public view of the account
 * - `PATCH /api/user/settings` - partial update of language and theme
 * - `PUT /api/user/watermark` - watermark customization (yearly plan only)
 *
 * All three read the account row; the token only identifies the caller.
 */

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::backend::auth::accounts::{
    get_account_by_id, update_preferences, update_watermark as store_watermark, Account,
};
use crate::backend::auth::handlers::types::AccountView;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{WatermarkKind, WatermarkSettings};

const ACCOUNT_NOT_FOUND: &str = "User not found";

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: AccountView,
}

/// Partial settings update; absent or empty values are ignored
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettingsRequest {
    pub language: Option<String>,
    pub theme: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Watermark update, merged over the stored settings
///
/// `type` is taken as a raw string so that an unknown value is a 400 like
/// every other validation failure.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatermarkRequest {
    pub enabled: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub logo_url: Option<String>,
    pub text: Option<String>,
    pub language: Option<String>,
    pub position: Option<String>,
    pub opacity: Option<i64>,
}

impl WatermarkRequest {
    fn apply_to(self, current: &WatermarkSettings) -> BackendResult<WatermarkSettings> {
        let kind = match self.kind {
            Some(raw) => WatermarkKind::try_from(raw)?,
            None => current.kind,
        };

        let settings = WatermarkSettings {
            enabled: self.enabled.unwrap_or(current.enabled),
            kind,
            logo_url: self.logo_url.or_else(|| current.logo_url.clone()),
            text: self.text.or_else(|| current.text.clone()),
            locale: self.language.or_else(|| current.locale.clone()),
            position: self.position.unwrap_or_else(|| current.position.clone()),
            opacity: self.opacity.unwrap_or(current.opacity),
        };

        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkResponse {
    pub success: bool,
    pub watermark_settings: WatermarkSettings,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn load_account(state: &AppState, user: &AuthUser) -> BackendResult<Account> {
    get_account_by_id(&state.db, user.0.account_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Account {} no longer exists", user.0.account_id);
            BackendError::not_found(ACCOUNT_NOT_FOUND)
        })
}

/// GET /api/user/profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> BackendResult<Json<ProfileResponse>> {
    let account = load_account(&state, &user).await?;

    Ok(Json(ProfileResponse {
        success: true,
        user: AccountView::profile(&account),
    }))
}

/// PATCH /api/user/settings
pub async fn update_settings(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<SettingsRequest>,
) -> BackendResult<Json<MessageResponse>> {
    let language = non_empty(request.language);
    let theme = non_empty(request.theme);

    let updated = update_preferences(
        &state.db,
        user.0.account_id,
        language.as_deref(),
        theme.as_deref(),
    )
    .await?;

    if !updated {
        return Err(BackendError::not_found(ACCOUNT_NOT_FOUND));
    }

    tracing::debug!("Settings updated for {}", user.0.account_id);

    Ok(Json(MessageResponse {
        success: true,
        message: "Settings updated".to_string(),
    }))
}

/// PUT /api/user/watermark
pub async fn update_watermark(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<WatermarkRequest>,
) -> BackendResult<Json<WatermarkResponse>> {
    let account = load_account(&state, &user).await?;

    if !account.plan.watermark_customizable() {
        tracing::warn!(
            "Watermark customization refused for {} on plan {}",
            account.id,
            account.plan
        );
        return Err(BackendError::Forbidden(
            "Watermark customization requires the yearly plan".to_string(),
        ));
    }

    let settings = request.apply_to(&account.watermark)?;

    if !store_watermark(&state.db, account.id, &settings).await? {
        return Err(BackendError::not_found(ACCOUNT_NOT_FOUND));
    }

    tracing::info!("Watermark settings updated for {}", account.id);

    Ok(Json(WatermarkResponse {
        success: true,
        watermark_settings: settings,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::accounts::create_account;
    use crate::backend::middleware::auth::AuthenticatedUser;
    use crate::backend::server::state::test_state;
    use crate::shared::Plan;
    use uuid::Uuid;

    fn auth_user(account: &Account) -> AuthUser {
        AuthUser(AuthenticatedUser {
            account_id: account.id,
        })
    }

    async fn set_plan(state: &AppState, account: &Account, plan: Plan) {
        sqlx::query("UPDATE accounts SET plan = $1 WHERE id = $2")
            .bind(plan.as_str())
            .bind(account.id)
            .execute(&state.db)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_profile_includes_everything() {
        let state = test_state().await;
        let account = create_account(&state.db, "me@example.com", "hash", "Me").await.unwrap();

        let Json(response) = get_profile(State(state), auth_user(&account)).await.unwrap();
        assert!(response.success);
        assert_eq!(response.user.language.as_deref(), Some("fr"));
        assert_eq!(response.user.watermark_settings, Some(WatermarkSettings::default()));
    }

    #[tokio::test]
    async fn test_profile_of_deleted_account_is_404() {
        let state = test_state().await;
        let ghost = AuthUser(AuthenticatedUser {
            account_id: Uuid::new_v4(),
        });

        let err = get_profile(State(state), ghost).await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_settings_are_ignored() {
        let state = test_state().await;
        let account = create_account(&state.db, "s@example.com", "hash", "S").await.unwrap();

        update_settings(
            State(state.clone()),
            auth_user(&account),
            Json(SettingsRequest {
                language: Some("".to_string()),
                theme: Some("light".to_string()),
            }),
        )
        .await
        .unwrap();

        let reloaded = get_account_by_id(&state.db, account.id).await.unwrap().unwrap();
        assert_eq!(reloaded.locale, "fr");
        assert_eq!(reloaded.theme, "light");
    }

    #[tokio::test]
    async fn test_watermark_requires_yearly_plan() {
        let state = test_state().await;
        let account = create_account(&state.db, "w@example.com", "hash", "W").await.unwrap();
        set_plan(&state, &account, Plan::PremiumMonthly).await;

        let err = update_watermark(
            State(state),
            auth_user(&account),
            Json(WatermarkRequest {
                enabled: Some(true),
                ..WatermarkRequest::default()
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BackendError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_watermark_update_on_yearly_plan() {
        let state = test_state().await;
        let account = create_account(&state.db, "y@example.com", "hash", "Y").await.unwrap();
        set_plan(&state, &account, Plan::PremiumYearly).await;

        let Json(response) = update_watermark(
            State(state.clone()),
            auth_user(&account),
            Json(WatermarkRequest {
                enabled: Some(true),
                text: Some("Studio Y".to_string()),
                opacity: Some(40),
                ..WatermarkRequest::default()
            }),
        )
        .await
        .unwrap();

        assert!(response.watermark_settings.enabled);
        assert_eq!(response.watermark_settings.position, "bottom-right");

        let reloaded = get_account_by_id(&state.db, account.id).await.unwrap().unwrap();
        assert_eq!(reloaded.watermark.text.as_deref(), Some("Studio Y"));
        assert_eq!(reloaded.watermark.opacity, 40);
    }

    #[tokio::test]
    async fn test_watermark_validation() {
        let state = test_state().await;
        let account = create_account(&state.db, "v@example.com", "hash", "V").await.unwrap();
        set_plan(&state, &account, Plan::PremiumYearly).await;

        let bad_opacity = update_watermark(
            State(state.clone()),
            auth_user(&account),
            Json(WatermarkRequest {
                opacity: Some(150),
                ..WatermarkRequest::default()
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(bad_opacity, BackendError::Validation(_)));

        let bad_kind = update_watermark(
            State(state),
            auth_user(&account),
            Json(WatermarkRequest {
                kind: Some("hologram".to_string()),
                ..WatermarkRequest::default()
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(bad_kind, BackendError::Validation(_)));
    }
}
