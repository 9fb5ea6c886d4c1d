//! HTTP Handlers
//!
//! Thin translation between DTOs and use cases; every decision lives in
//! the application layer.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    ConfirmEmailInput, ConfirmEmailUseCase, ForgotCredentialsUseCase, RefreshSessionUseCase,
    RegisterInput, RegisterUseCase, ResendConfirmationUseCase, ResetPasswordInput,
    ResetPasswordUseCase, SignInInput, SignInUseCase,
};
use crate::domain::dispatcher::NotificationDispatcher;
use crate::domain::repository::CredentialStore;
use crate::domain::token_provider::TokenProvider;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ConfirmEmailRequest, LoginRequest, MessageResponse, RegisterRequest, ResetPasswordRequest,
    UserResponse,
};

/// Shared state for account handlers
pub struct AccountAppState<S, P, M> {
    pub store: Arc<S>,
    pub provider: Arc<P>,
    pub mailer: Arc<M>,
    pub config: Arc<AuthConfig>,
}

impl<S, P, M> Clone for AccountAppState<S, P, M> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            provider: self.provider.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/account/login
pub async fn login<S, P, M>(
    State(state): State<AccountAppState<S, P, M>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<UserResponse>>
where
    S: CredentialStore + Send + Sync + 'static,
    P: TokenProvider + Send + Sync + 'static,
    M: NotificationDispatcher + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.store.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            username: req.user_name,
            password: req.password,
        })
        .await?;

    Ok(Json(UserResponse {
        first_name: output.first_name,
        last_name: output.last_name,
        jwt: output.token,
    }))
}

/// GET /api/account/refresh-user-token
pub async fn refresh_user_token<S, P, M>(
    State(state): State<AccountAppState<S, P, M>>,
    headers: HeaderMap,
) -> AuthResult<Json<UserResponse>>
where
    S: CredentialStore + Send + Sync + 'static,
    P: TokenProvider + Send + Sync + 'static,
    M: NotificationDispatcher + Send + Sync + 'static,
{
    let token = extract_bearer_token(&headers).ok_or(AuthError::InvalidToken)?;

    let use_case = RefreshSessionUseCase::new(state.store.clone(), state.config.clone());
    let output = use_case.execute(token).await?;

    Ok(Json(UserResponse {
        first_name: output.first_name,
        last_name: output.last_name,
        jwt: output.token,
    }))
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/account/register
pub async fn register<S, P, M>(
    State(state): State<AccountAppState<S, P, M>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    S: CredentialStore + Send + Sync + 'static,
    P: TokenProvider + Send + Sync + 'static,
    M: NotificationDispatcher + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.store.clone(),
        state.provider.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case
        .execute(RegisterInput {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Account Created",
            "Your account has been created, please confirm your email address",
        )),
    ))
}

// ============================================================================
// Email confirmation
// ============================================================================

/// PUT /api/account/confirm-email
pub async fn confirm_email<S, P, M>(
    State(state): State<AccountAppState<S, P, M>>,
    Json(req): Json<ConfirmEmailRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    S: CredentialStore + Send + Sync + 'static,
    P: TokenProvider + Send + Sync + 'static,
    M: NotificationDispatcher + Send + Sync + 'static,
{
    let use_case = ConfirmEmailUseCase::new(state.store.clone(), state.provider.clone());

    use_case
        .execute(ConfirmEmailInput {
            email: req.email,
            token: req.token,
        })
        .await?;

    Ok(Json(MessageResponse::new(
        "Email Confirmed",
        "Your email address is confirmed. You can login now",
    )))
}

/// POST /api/account/resend-email-confirmation-link/{email}
pub async fn resend_confirmation_link<S, P, M>(
    State(state): State<AccountAppState<S, P, M>>,
    Path(email): Path<String>,
) -> AuthResult<Json<MessageResponse>>
where
    S: CredentialStore + Send + Sync + 'static,
    P: TokenProvider + Send + Sync + 'static,
    M: NotificationDispatcher + Send + Sync + 'static,
{
    let use_case = ResendConfirmationUseCase::new(
        state.store.clone(),
        state.provider.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case.execute(&email).await?;

    Ok(Json(MessageResponse::new(
        "Confirmation link sent",
        "Please confirm your email address",
    )))
}

// ============================================================================
// Password reset
// ============================================================================

/// POST /api/account/forgot-username-or-password/{email}
pub async fn forgot_username_or_password<S, P, M>(
    State(state): State<AccountAppState<S, P, M>>,
    Path(email): Path<String>,
) -> AuthResult<Json<MessageResponse>>
where
    S: CredentialStore + Send + Sync + 'static,
    P: TokenProvider + Send + Sync + 'static,
    M: NotificationDispatcher + Send + Sync + 'static,
{
    let use_case = ForgotCredentialsUseCase::new(
        state.store.clone(),
        state.provider.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case.execute(&email).await?;

    Ok(Json(MessageResponse::new(
        "Forgot username or password email sent",
        "Please check your email",
    )))
}

/// PUT /api/account/reset-password
pub async fn reset_password<S, P, M>(
    State(state): State<AccountAppState<S, P, M>>,
    Json(req): Json<ResetPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    S: CredentialStore + Send + Sync + 'static,
    P: TokenProvider + Send + Sync + 'static,
    M: NotificationDispatcher + Send + Sync + 'static,
{
    let use_case = ResetPasswordUseCase::new(
        state.store.clone(),
        state.provider.clone(),
        state.config.clone(),
    );

    use_case
        .execute(ResetPasswordInput {
            email: req.email,
            token: req.token,
            new_password: req.new_password,
        })
        .await?;

    Ok(Json(MessageResponse::new(
        "Password reset success",
        "Your password has been reset",
    )))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
