//! Session-stored models and keys.

use serde::{Deserialize, Serialize};

/// Session-stored user identity (document-store variant).
///
/// Minimal data kept in the session to identify the signed-in user; the
/// identity provider owns the account itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Identity provider's opaque user id.
    pub id: String,
    /// User's email address.
    pub email: String,
}

/// Theme preference persisted per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// CSS class hook for templates.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Light => "theme-light",
            Self::Dark => "theme-dark",
        }
    }
}

/// Session keys for durable per-browser state.
pub mod session_keys {
    /// Product id last opened on the detail page.
    pub const SELECTED_PRODUCT: &str = "selected_product";

    /// The single pending cart line item.
    pub const CART_ITEM: &str = "cart_item";

    /// Admin gate flag; set by the passphrase form, cleared on logout.
    pub const ADMIN_AUTHED: &str = "admin_authed";

    /// Theme preference.
    pub const THEME: &str = "theme";

    /// Signed-in user (document-store variant).
    pub const CURRENT_USER: &str = "current_user";

    /// Federated sign-in state token (CSRF protection).
    pub const FEDERATED_STATE: &str = "federated_state";
}
