use axum::{
    extract::{Extension, Multipart, Path, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use burgerhaus_types::{
    users::{AvatarResponse, Registration, Role, UserInfo, UserInfoUpdate},
    MessageResponse,
};
use tracing::{error, info, instrument, warn};

use crate::auth::{ensure_self_or_admin, hash_password, CurrentUser};
use crate::error::{ApiError, ApiResult};
use crate::models::NewUser;
use crate::store::{self, users::UserField};
use crate::uploads::MultipartForm;
use crate::AppState;

use super::{message, JsonBody};

pub const AVATAR_FIELD: &str = "file";

pub fn public_router() -> Router<AppState> {
    Router::new().route("/users/register", post(register))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/avatar/update", put(update_avatar))
        .route(
            "/users/{name}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

fn registration_from(form: &MultipartForm) -> Registration {
    let owned = |name: &str| form.text(name).map(str::to_string);
    Registration {
        firstname: owned("firstname").unwrap_or_default(),
        lastname: owned("lastname").unwrap_or_default(),
        username: owned("username").unwrap_or_default(),
        password: owned("password").unwrap_or_default(),
        address: owned("address"),
        cardnumber: owned("cardnumber"),
        phonenumber: owned("phonenumber"),
        email: owned("email"),
    }
}

/// Whitelisted update fields in the order they are applied.
fn update_fields(update: UserInfoUpdate) -> ApiResult<Vec<UserField>> {
    let mut fields = Vec::new();
    if let Some(v) = update.firstname {
        fields.push(UserField::Firstname(v));
    }
    if let Some(v) = update.lastname {
        fields.push(UserField::Lastname(v));
    }
    if let Some(v) = update.address {
        fields.push(UserField::Address(v));
    }
    if let Some(v) = update.cardnumber {
        fields.push(UserField::Cardnumber(v));
    }
    if let Some(v) = update.phone_number {
        fields.push(UserField::PhoneNumber(v));
    }
    if let Some(v) = update.email {
        fields.push(UserField::Email(v));
    }
    if let Some(v) = update.password {
        if v.trim().is_empty() {
            return Err(ApiError::bad_request("Password must not be blank"));
        }
        fields.push(UserField::Password(hash_password(&v)?));
    }
    Ok(fields)
}

#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body(content = Registration, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 400, description = "Missing fields or bad avatar", body = burgerhaus_types::ErrorBody),
        (status = 500, description = "Username taken or database failure", body = burgerhaus_types::ErrorBody),
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<MessageResponse>> {
    let mut form = MultipartForm::read(multipart, AVATAR_FIELD).await?;
    let registration = registration_from(&form);
    let missing = registration.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::bad_request(format!(
            "Invalid or missing fields: {}",
            missing.join(", ")
        )));
    }

    let avatar = match form.take_file() {
        Some(file) => Some(state.uploads.save(None, &file).await?),
        None => None,
    };

    let new_user = NewUser {
        password: hash_password(&registration.password)?,
        username: registration.username,
        firstname: registration.firstname,
        lastname: registration.lastname,
        address: registration.address,
        role: Role::Guest.into(),
        cardnumber: registration.cardnumber,
        phone_number: registration.phonenumber,
        email: registration.email,
        avatar,
    };

    let mut conn = state.conn().await?;
    let user = store::users::insert(&mut conn, &new_user)
        .await
        .inspect_err(|e| error!("cannot register user: {e}"))?;
    info!(user_id = user.id, username = %user.username, "registered user");
    Ok(message("Success."))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{name}",
    params(("name" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User profile", body = UserInfo),
        (status = 403, description = "Not your account", body = burgerhaus_types::ErrorBody),
        (status = 404, description = "No such user", body = burgerhaus_types::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
#[instrument(skip(state, current))]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(name): Path<String>,
) -> ApiResult<Json<UserInfo>> {
    ensure_self_or_admin(current.info(), &name)?;
    let mut conn = state.conn().await?;
    let user = store::users::find_by_username(&mut conn, &name)
        .await
        .inspect_err(|e| error!("cannot load user: {e}"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/avatar/update",
    request_body(content = String, description = "Multipart with `username` and image `file`", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Avatar replaced", body = AvatarResponse),
        (status = 400, description = "Missing file or username", body = burgerhaus_types::ErrorBody),
        (status = 418, description = "No such user", body = burgerhaus_types::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn update_avatar(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    multipart: Multipart,
) -> ApiResult<Json<AvatarResponse>> {
    let mut form = MultipartForm::read(multipart, AVATAR_FIELD).await?;
    let username = form.required("username")?.to_string();
    ensure_self_or_admin(current.info(), &username)?;
    let file = form
        .take_file()
        .ok_or_else(|| ApiError::bad_request("Missing avatar file"))?;
    let avatar = state.uploads.save(None, &file).await?;

    let mut conn = state.conn().await?;
    let updated = store::users::update_avatar(&mut conn, &username, &avatar)
        .await
        .inspect_err(|e| error!("cannot update avatar: {e}"))?;
    if updated == 0 {
        warn!(%username, "avatar update matched no user");
        return Err(ApiError::NoChange);
    }
    Ok(Json(AvatarResponse { avatar }))
}

/// Applies each whitelisted field as its own statement. The first statement
/// that touches no row stops the loop; earlier ones stay applied.
#[utoipa::path(
    put,
    path = "/api/v1/users/{name}",
    params(("name" = String, Path, description = "Username")),
    request_body = UserInfoUpdate,
    responses(
        (status = 200, description = "Profile updated", body = MessageResponse),
        (status = 400, description = "Empty body or unknown field", body = burgerhaus_types::ErrorBody),
        (status = 418, description = "No row was updated", body = burgerhaus_types::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
#[instrument(skip(state, current, update))]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(name): Path<String>,
    JsonBody(update): JsonBody<UserInfoUpdate>,
) -> ApiResult<Json<MessageResponse>> {
    ensure_self_or_admin(current.info(), &name)?;
    if update.is_empty() {
        return Err(ApiError::bad_request("Nothing to update"));
    }
    let fields = update_fields(update)?;

    let mut conn = state.conn().await?;
    for field in &fields {
        let updated = store::users::update_field(&mut conn, &name, field)
            .await
            .inspect_err(|e| error!(column = field.column_name(), "cannot update user: {e}"))?;
        if updated == 0 {
            warn!(column = field.column_name(), "user update matched no row");
            return Err(ApiError::NoChange);
        }
    }
    Ok(message("Success."))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{name}",
    params(("name" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 418, description = "No such user", body = burgerhaus_types::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
#[instrument(skip(state, current))]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(name): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    ensure_self_or_admin(current.info(), &name)?;
    let mut conn = state.conn().await?;
    let deleted = store::users::delete_by_username(&mut conn, &name)
        .await
        .inspect_err(|e| error!("cannot delete user: {e}"))?;
    if deleted == 0 {
        return Err(ApiError::NoChange);
    }
    info!("deleted user");
    Ok(message("User successfully deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_fields_keep_declaration_order() {
        let update = UserInfoUpdate {
            email: Some("a@b.c".to_string()),
            firstname: Some("Alice".to_string()),
            ..Default::default()
        };
        let fields = update_fields(update).unwrap();
        assert_eq!(
            fields,
            vec![
                UserField::Firstname("Alice".to_string()),
                UserField::Email("a@b.c".to_string()),
            ]
        );
    }

    #[test]
    fn test_update_fields_hash_passwords() {
        let update = UserInfoUpdate {
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        let fields = update_fields(update).unwrap();
        let [UserField::Password(hash)] = fields.as_slice() else {
            panic!("expected a single password field");
        };
        assert!(crate::auth::verify_password("hunter2", hash));

        let blank = UserInfoUpdate {
            password: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(update_fields(blank).is_err());
    }

    #[test]
    fn test_registration_from_form() {
        let mut form = MultipartForm::default();
        form.insert_text("firstname", "Alice");
        form.insert_text("lastname", "Smith");
        form.insert_text("username", "alice");
        form.insert_text("password", "secret");
        form.insert_text("phonenumber", "040 123");
        form.insert_text("address", "");
        let registration = registration_from(&form);
        assert!(registration.missing_fields().is_empty());
        assert_eq!(registration.phonenumber.as_deref(), Some("040 123"));
        assert_eq!(registration.address, None);
    }
}
