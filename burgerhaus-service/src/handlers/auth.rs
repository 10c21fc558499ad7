use axum::{
    extract::{Extension, State},
    response::Json,
    routing::{get, post},
    Router,
};
use burgerhaus_types::users::{LoginRequest, LoginResponse, UserInfo, VerifyResponse};
use tracing::{error, info, instrument, warn};

use crate::auth::{verify_password, CurrentUser};
use crate::error::{ApiError, ApiResult};
use crate::store;
use crate::AppState;

use super::{collection, JsonBody};

pub fn public_router() -> Router<AppState> {
    collection(Router::new(), "/auth", post(login))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/auth/verify", get(verify))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Unknown user or wrong password", body = burgerhaus_types::ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let mut conn = state.conn().await?;
    let user = store::users::find_by_username(&mut conn, &payload.username)
        .await
        .inspect_err(|e| error!("cannot load user: {e}"))?
        .ok_or_else(|| {
            warn!("login for unknown user");
            ApiError::AuthenticationFailed
        })?;

    if !verify_password(&payload.password, &user.password) {
        warn!("login with wrong password");
        return Err(ApiError::AuthenticationFailed);
    }

    let user = UserInfo::from(user);
    let token = state.tokens.issue(&user)?;
    info!("issued token");
    Ok(Json(LoginResponse { user, token }))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/verify",
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 401, description = "Missing token", body = burgerhaus_types::ErrorBody),
        (status = 403, description = "Invalid or expired token", body = burgerhaus_types::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn verify(Extension(current): Extension<CurrentUser>) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        message: "token ok".to_string(),
        user: current.0,
    })
}
