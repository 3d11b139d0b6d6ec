use super::validation::{Validator, REQUIRED};
use crate::auth::hash_password;
use crate::error::{Error, Result};
use crate::models::User;
use crate::store;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

pub const USERNAME_MAX_LENGTH: usize = 150;
pub const INVALID_USERNAME: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Public view of an account. The password hash never leaves the store.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

/// Create an account. The password is stored only as a salted argon2 hash.
pub fn register(conn: &mut SqliteConnection, request: &RegisterRequest) -> Result<UserResponse> {
    let mut v = Validator::default();

    let username =
        v.required_text("username", request.username.as_deref(), Some(USERNAME_MAX_LENGTH));
    if let Some(name) = &username {
        if !name.chars().all(is_username_char) {
            v.error("username", INVALID_USERNAME);
        }
    }

    // Blank is judged on the trimmed value; the password itself is hashed as given
    let password = v
        .required_text("password", request.password.as_deref(), None)
        .and(request.password.as_deref());

    v.finish()?;
    let (Some(username), Some(password)) = (username, password) else {
        return Err(Error::invalid("username", REQUIRED));
    };

    let password_hash = hash_password(password).map_err(|e| Error::PasswordHash(e.to_string()))?;
    let user = store::users::create_user(conn, &username, &password_hash)?;

    Ok(UserResponse::from(&user))
}

#[derive(OpenApi)]
#[openapi(components(schemas(RegisterRequest, UserResponse)))]
pub struct ApiDoc;
