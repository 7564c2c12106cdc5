use crate::api::{ApiError, Credentials, ResumeBackend};
use crate::session::{Session, SessionError};
use thiserror::Error;
use tracing::{info, warn};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Failures surfaced on the login and registration screens. The display
/// text is what the user sees.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials. Please try again.")]
    InvalidCredentials,

    #[error("An account with this email already exists.")]
    AlreadyRegistered,

    #[error("Password must be at least 6 characters.")]
    WeakPassword,

    #[error("Email and password are required.")]
    MissingFields,

    #[error("Server error. Please try again later.")]
    Server(#[source] ApiError),

    #[error("Server error. Please try again later.")]
    Interrupted,

    #[error("Signed in, but the session could not be saved.")]
    Session(#[from] SessionError),
}

fn check_filled(credentials: &Credentials) -> Result<(), AuthError> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    Ok(())
}

/// Signs in and stores the returned access token. Nothing is stored on
/// failure.
pub async fn login(
    backend: &dyn ResumeBackend,
    session: &Session,
    credentials: &Credentials,
) -> Result<(), AuthError> {
    check_filled(credentials)?;

    let response = backend.login(credentials).await.map_err(|e| {
        if e.is_unauthorized() {
            warn!("Login rejected");
            AuthError::InvalidCredentials
        } else {
            warn!("Login failed: {}", e);
            AuthError::Server(e)
        }
    })?;

    session.store_token(response.access_token)?;
    info!(
        token_type = response.token_type.as_deref().unwrap_or("bearer"),
        "Signed in"
    );
    Ok(())
}

pub async fn register(
    backend: &dyn ResumeBackend,
    credentials: &Credentials,
) -> Result<(), AuthError> {
    check_filled(credentials)?;
    if credentials.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword);
    }

    backend.register(credentials).await.map_err(|e| {
        if e.status() == Some(400) {
            AuthError::AlreadyRegistered
        } else {
            warn!("Registration failed: {}", e);
            AuthError::Server(e)
        }
    })?;

    info!("Registered account");
    Ok(())
}

pub fn logout(session: &Session) -> Result<(), AuthError> {
    session.clear()?;
    info!("Signed out");
    Ok(())
}
