//! Sign-in, sign-up, and federated sign-in route handlers.
//!
//! Only the document-store variant configures an identity provider; when
//! none is configured these routes redirect home. Bad credentials and
//! already-registered emails re-render the form; provider outages do too,
//! with a different message, after logging.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use scoop_shop_core::Email;

use crate::error::{self, AppError};
use crate::filters;
use crate::identity::AuthSession;
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::selection;
use crate::state::AppState;

/// Sign-in page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/sign_in.html")]
pub struct SignInTemplate {
    pub theme_class: &'static str,
    pub email: String,
    pub error: Option<String>,
}

/// Sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/sign_up.html")]
pub struct SignUpTemplate {
    pub theme_class: &'static str,
    pub email: String,
    pub error: Option<String>,
}

/// Credentials form data.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Query parameters from the federated sign-in callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Generate a random alphanumeric string for the CSRF state parameter.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            char::from(*CHARSET.get(idx).expect("idx within bounds"))
        })
        .collect()
}

/// Store the minted session in the storefront session and Sentry scope.
async fn establish(
    session: &Session,
    auth: &AuthSession,
) -> Result<(), tower_sessions::session::Error> {
    let user = CurrentUser {
        id: auth.user_id.clone(),
        email: auth.email.clone(),
    };
    set_current_user(session, &user).await?;
    error::set_sentry_user(&user.id, Some(&user.email));
    Ok(())
}

/// Display the sign-in page.
#[instrument(skip(session))]
pub async fn sign_in_page(session: Session) -> impl IntoResponse {
    SignInTemplate {
        theme_class: selection::theme(&session).await.css_class(),
        email: String::new(),
        error: None,
    }
}

/// Sign in with email and password.
#[instrument(skip(state, session, form))]
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    axum::Form(form): axum::Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let Some(identity) = state.identity() else {
        return Ok(Redirect::to("/").into_response());
    };

    match identity.sign_in(&form.email, &form.password).await {
        Ok(auth) => {
            establish(&session, &auth).await?;
            Ok(Redirect::to("/order").into_response())
        }
        Err(e) => {
            let message = if e.is_rejection() {
                "Invalid email or password.".to_string()
            } else {
                tracing::error!(error = %e, "Sign-in provider error");
                "Sign-in is unavailable right now. Please try again.".to_string()
            };
            Ok(SignInTemplate {
                theme_class: selection::theme(&session).await.css_class(),
                email: form.email,
                error: Some(message),
            }
            .into_response())
        }
    }
}

/// Display the sign-up page.
#[instrument(skip(session))]
pub async fn sign_up_page(session: Session) -> impl IntoResponse {
    SignUpTemplate {
        theme_class: selection::theme(&session).await.css_class(),
        email: String::new(),
        error: None,
    }
}

/// Create an account and sign it in.
#[instrument(skip(state, session, form))]
pub async fn sign_up(
    State(state): State<AppState>,
    session: Session,
    axum::Form(form): axum::Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let Some(identity) = state.identity() else {
        return Ok(Redirect::to("/").into_response());
    };

    // Catch malformed addresses before bothering the provider
    let email = match form.email.parse::<Email>() {
        Ok(email) => email,
        Err(_) => {
            return Ok(SignUpTemplate {
                theme_class: selection::theme(&session).await.css_class(),
                email: form.email,
                error: Some("Enter a valid email address.".to_string()),
            }
            .into_response());
        }
    };

    match identity.sign_up(email.as_ref(), &form.password).await {
        Ok(auth) => {
            establish(&session, &auth).await?;
            Ok(Redirect::to("/order").into_response())
        }
        Err(e) => {
            let message = if e.is_rejection() {
                "Could not create an account with those details. An account with this email may already exist.".to_string()
            } else {
                tracing::error!(error = %e, "Sign-up provider error");
                "Sign-up is unavailable right now. Please try again.".to_string()
            };
            Ok(SignUpTemplate {
                theme_class: selection::theme(&session).await.css_class(),
                email: form.email,
                error: Some(message),
            }
            .into_response())
        }
    }
}

/// Redirect the browser to the identity provider's federated sign-in page.
#[instrument(skip(state, session))]
pub async fn federated(State(state): State<AppState>, session: Session) -> Response {
    let Some(identity) = state.identity() else {
        return Redirect::to("/").into_response();
    };

    let csrf_state = generate_random_string(32);
    if let Err(e) = session
        .insert(session_keys::FEDERATED_STATE, &csrf_state)
        .await
    {
        tracing::error!(error = %e, "Failed to store federated state in session");
        return Redirect::to("/auth/sign-in").into_response();
    }

    let redirect_uri = format!("{}/auth/callback", state.config().base_url);
    Redirect::to(&identity.federated_sign_in_url(&redirect_uri, &csrf_state)).into_response()
}

/// Handle the federated sign-in callback.
///
/// Verifies the round-tripped state parameter, then exchanges the one-time
/// code for a session.
#[instrument(skip(state, session, query))]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, AppError> {
    let Some(identity) = state.identity() else {
        return Ok(Redirect::to("/").into_response());
    };

    if let Some(error) = query.error {
        tracing::warn!(error, "Federated sign-in denied");
        return Ok(Redirect::to("/auth/sign-in").into_response());
    }

    let (Some(code), Some(returned_state)) = (query.code, query.state) else {
        tracing::warn!("Federated callback missing code or state");
        return Ok(Redirect::to("/auth/sign-in").into_response());
    };

    // One-time use: the stored state is removed whether or not it matches.
    let stored_state = session
        .remove::<String>(session_keys::FEDERATED_STATE)
        .await?;
    if stored_state.as_deref() != Some(returned_state.as_str()) {
        tracing::warn!("Federated state mismatch");
        return Ok(Redirect::to("/auth/sign-in").into_response());
    }

    let redirect_uri = format!("{}/auth/callback", state.config().base_url);
    match identity.exchange_code(&code, &redirect_uri).await {
        Ok(auth) => {
            establish(&session, &auth).await?;
            Ok(Redirect::to("/order").into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "Federated code exchange failed");
            sentry::capture_error(&e);
            Ok(Redirect::to("/auth/sign-in").into_response())
        }
    }
}

/// Sign out.
#[instrument(skip(session))]
pub async fn sign_out(session: Session) -> Result<Response, AppError> {
    clear_current_user(&session).await?;
    error::clear_sentry_user();
    Ok(Redirect::to("/").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_string_length_and_charset() {
        let s = generate_random_string(32);
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
