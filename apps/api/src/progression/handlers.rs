use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;
use tracing::{info, warn};

use crate::applications::access::viewer_role;
use crate::errors::AppError;
use crate::models::application::ActorRole;
use crate::progression::batch::{run_pending, BatchReport, InvocationSource};
use crate::progression::stats::{load_bot_stats, BotStats};
use crate::progression::store::PgProgressionStore;
use crate::state::AppState;

pub const BOT_TOKEN_HEADER: &str = "x-bot-token";

/// Resolves who may drive the bot.
///
/// A request carrying `X-Bot-Token` is judged on the token alone: a match means a scheduled
/// run, anything else is refused. Without the header the caller must hold the bot role.
pub fn authorize_bot(
    headers: &HeaderMap,
    configured_token: Option<&str>,
) -> Result<InvocationSource, AppError> {
    if let Some(presented) = headers.get(BOT_TOKEN_HEADER) {
        return match (presented.to_str().ok(), configured_token) {
            (Some(presented), Some(expected)) if presented == expected => {
                Ok(InvocationSource::Scheduled)
            }
            _ => {
                warn!("Rejected bot request with an invalid token");
                Err(AppError::Forbidden("Invalid bot token".to_string()))
            }
        };
    }

    match viewer_role(headers) {
        ActorRole::Bot => Ok(InvocationSource::Manual),
        _ => Err(AppError::Forbidden(
            "Bot role or a valid bot token is required".to_string(),
        )),
    }
}

/// POST /api/v1/bot/run
pub async fn handle_run_bot(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<BatchReport>, AppError> {
    let source = authorize_bot(&headers, state.config.bot_token.as_deref())?;
    info!("Bot run requested ({source:?})");

    let store = PgProgressionStore::new(state.db.clone());
    let report = run_pending(&store, source, state.seed.as_ref(), &state.shutdown).await?;
    Ok(Json(report))
}

/// GET /api/v1/bot/stats
pub async fn handle_bot_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<BotStats>, AppError> {
    authorize_bot(&headers, state.config.bot_token.as_deref())?;
    Ok(Json(load_bot_stats(&state.db, Utc::now()).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::access::ROLE_HEADER;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn test_valid_token_is_scheduled() {
        let h = headers(&[(BOT_TOKEN_HEADER, "s3cret")]);
        assert_eq!(
            authorize_bot(&h, Some("s3cret")).unwrap(),
            InvocationSource::Scheduled
        );
    }

    #[test]
    fn test_wrong_token_is_forbidden_even_for_bot_role() {
        let h = headers(&[(BOT_TOKEN_HEADER, "guess"), (ROLE_HEADER, "bot")]);
        assert!(matches!(
            authorize_bot(&h, Some("s3cret")),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_token_without_configured_secret_is_forbidden() {
        let h = headers(&[(BOT_TOKEN_HEADER, "anything")]);
        assert!(authorize_bot(&h, None).is_err());
    }

    #[test]
    fn test_bot_role_is_manual() {
        let h = headers(&[(ROLE_HEADER, "bot")]);
        assert_eq!(authorize_bot(&h, Some("s3cret")).unwrap(), InvocationSource::Manual);
    }

    #[test]
    fn test_other_roles_forbidden() {
        for role in ["admin", "applicant"] {
            let mut h = HeaderMap::new();
            h.insert(ROLE_HEADER, HeaderValue::from_static(role));
            assert!(authorize_bot(&h, Some("s3cret")).is_err());
        }
        assert!(authorize_bot(&HeaderMap::new(), None).is_err());
    }
}
