use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{LoginRequest, PublicUser, RegisterRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo_types::User,
};
use crate::{
    error::{AppError, AppResult},
    store::RecordStore,
};

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex");
    }
    EMAIL_RE.is_match(email)
}

/// Validates the request and stores a new user with a salted hash.
pub async fn register(store: &dyn RecordStore, payload: RegisterRequest) -> AppResult<User> {
    let username = payload.username.trim();
    let email = payload.email.trim();

    if username.is_empty() {
        return Err(AppError::Validation("Username is required".into()));
    }
    if !is_valid_email(email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::Validation("Password too short".into()));
    }

    if store.find_user_by_email(email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("Email already exists".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = store.create_user(username, email, &hash).await?;
    info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Checks credentials and returns a signed access token.
pub async fn login(
    store: &dyn RecordStore,
    keys: &JwtKeys,
    payload: LoginRequest,
) -> AppResult<String> {
    let email = payload.email.trim();
    let invalid = || AppError::Auth("Invalid credentials".into());

    let Some(user) = store.find_user_by_email(email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(invalid());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(invalid());
    }

    let token = keys.sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(token)
}

pub async fn profile(store: &dyn RecordStore, user_id: Uuid) -> AppResult<PublicUser> {
    let user = store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Auth("User not found".into()))?;
    Ok(PublicUser {
        id: user.id,
        username: user.username,
        email: user.email,
    })
}
