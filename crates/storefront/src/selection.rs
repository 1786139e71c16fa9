//! Selection state: the durable key/value state behind the storefront pages.
//!
//! Holds the currently-viewed product id and the single pending cart item,
//! keyed by the session cookie so it survives full page navigations and is
//! readable by a different page than the one that wrote it. Entries have no
//! expiry of their own; they stay until overwritten or cleared. One page is
//! active per session at a time, so this is effectively single-writer;
//! multi-tab interleaving is an accepted race.

use tower_sessions::Session;

use scoop_shop_core::{CartItem, ProductId};

use crate::models::session_keys;

type Result<T> = std::result::Result<T, tower_sessions::session::Error>;

/// Remember which product the detail page is showing.
pub async fn set_selected_product(session: &Session, id: &ProductId) -> Result<()> {
    session
        .insert(session_keys::SELECTED_PRODUCT, id.as_str())
        .await
}

/// The product id last opened on the detail page, if any.
pub async fn selected_product(session: &Session) -> Option<ProductId> {
    session
        .get::<String>(session_keys::SELECTED_PRODUCT)
        .await
        .ok()
        .flatten()
        .map(ProductId::from)
}

/// Overwrite the pending cart item.
pub async fn set_cart_item(session: &Session, item: &CartItem) -> Result<()> {
    session.insert(session_keys::CART_ITEM, item).await
}

/// The pending cart item, if any.
pub async fn cart_item(session: &Session) -> Option<CartItem> {
    session
        .get::<CartItem>(session_keys::CART_ITEM)
        .await
        .ok()
        .flatten()
}

/// Consume the cart item. Called exactly once, after an order persists.
pub async fn clear_cart_item(session: &Session) -> Result<()> {
    session.remove::<CartItem>(session_keys::CART_ITEM).await?;
    Ok(())
}

/// Set the admin gate flag.
pub async fn set_admin_authed(session: &Session) -> Result<()> {
    session.insert(session_keys::ADMIN_AUTHED, true).await
}

/// Whether the admin gate has been passed in this session.
pub async fn is_admin_authed(session: &Session) -> bool {
    session
        .get::<bool>(session_keys::ADMIN_AUTHED)
        .await
        .ok()
        .flatten()
        .unwrap_or(false)
}

/// Clear the admin gate flag. Order data is untouched.
pub async fn clear_admin_authed(session: &Session) -> Result<()> {
    session.remove::<bool>(session_keys::ADMIN_AUTHED).await?;
    Ok(())
}

/// Current theme preference, defaulting to light.
pub async fn theme(session: &Session) -> crate::models::Theme {
    session
        .get::<crate::models::Theme>(session_keys::THEME)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist a theme preference.
pub async fn set_theme(session: &Session, theme: crate::models::Theme) -> Result<()> {
    session.insert(session_keys::THEME, theme).await
}
