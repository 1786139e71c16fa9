//! Admin order review route handlers.
//!
//! The admin page sits behind a shared passphrase checked server-side and
//! remembered in the session. It is a UX gate, not an authentication
//! boundary. The dashboard lists every order newest-first and offers a
//! one-way "mark completed" action on pending orders.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use scoop_shop_core::{DeliveryType, Order, OrderId, OrderStatus};

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::selection;
use crate::state::AppState;

/// Order display data for the dashboard.
#[derive(Clone)]
pub struct OrderRowView {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub delivery_label: &'static str,
    /// One line, e.g. `2 x Mint Chip`.
    pub summary: String,
    pub total: String,
    pub placed_at: String,
    pub status_label: &'static str,
    pub is_pending: bool,
}

impl From<&Order> for OrderRowView {
    fn from(order: &Order) -> Self {
        let summary = order.draft.items.first().map_or_else(String::new, |line| {
            format!("{} x {}", line.quantity, line.name)
        });

        Self {
            id: order.id.to_string(),
            customer_name: order.draft.customer_name.clone(),
            customer_email: order.draft.customer_email.clone(),
            customer_phone: order.draft.customer_phone.clone(),
            customer_address: order.draft.customer_address.clone(),
            delivery_label: match order.draft.delivery_type {
                DeliveryType::Pickup => "Pickup",
                DeliveryType::Delivery => "Delivery",
            },
            summary,
            total: filters::money(order.draft.total),
            placed_at: order.draft.order_date.format("%Y-%m-%d %H:%M").to_string(),
            status_label: match order.draft.status {
                OrderStatus::Pending => "Pending",
                OrderStatus::Completed => "Completed",
            },
            is_pending: order.is_pending(),
        }
    }
}

/// Passphrase gate template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/gate.html")]
pub struct AdminGateTemplate {
    pub theme_class: &'static str,
    pub error: Option<&'static str>,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub theme_class: &'static str,
    pub orders: Vec<OrderRowView>,
    pub notice: Option<String>,
    pub load_error: Option<&'static str>,
}

/// Passphrase form data.
#[derive(Debug, Deserialize)]
pub struct PassphraseForm {
    #[serde(default)]
    pub passphrase: String,
}

/// Dashboard query parameters.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub notice: Option<String>,
}

/// Display the admin page: the gate when not yet authed, the dashboard
/// otherwise.
#[instrument(skip(state, session, query))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let theme_class = selection::theme(&session).await.css_class();

    if !selection::is_admin_authed(&session).await {
        return AdminGateTemplate {
            theme_class,
            error: None,
        }
        .into_response();
    }

    // A backend outage renders the dashboard empty with a notice rather
    // than failing the whole page.
    let (orders, load_error) = match state.orders().list_orders().await {
        Ok(mut orders) => {
            // Newest first, by the client-stamped order date. Ids are opaque
            // and never used for ordering.
            orders.sort_by(|a, b| b.draft.order_date.cmp(&a.draft.order_date));
            (orders.iter().map(OrderRowView::from).collect(), None)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load orders for admin dashboard");
            sentry::capture_error(&e);
            (
                Vec::new(),
                Some("Could not load orders right now. Refresh to try again."),
            )
        }
    };

    AdminDashboardTemplate {
        theme_class,
        orders,
        notice: query.notice,
        load_error,
    }
    .into_response()
}

/// Check the passphrase and remember the result in the session.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    axum::Form(form): axum::Form<PassphraseForm>,
) -> Result<Response, AppError> {
    if form.passphrase == state.config().admin_passphrase {
        selection::set_admin_authed(&session).await?;
        return Ok(Redirect::to("/admin").into_response());
    }

    Ok(AdminGateTemplate {
        theme_class: selection::theme(&session).await.css_class(),
        error: Some("Incorrect passphrase."),
    }
    .into_response())
}

/// Mark an order completed.
///
/// The action is one-way; there is no un-complete. The outcome lands in the
/// dashboard notice either way.
#[instrument(skip(state, _admin))]
pub async fn complete_order(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Response {
    let id = OrderId::from(id);

    let notice = match state
        .orders()
        .update_status(&id, OrderStatus::Completed)
        .await
    {
        Ok(true) => format!("Order {id} marked complete."),
        Ok(false) => format!("Order {id} not found."),
        Err(e) => {
            tracing::error!(error = %e, order_id = %id, "Failed to complete order");
            sentry::capture_error(&e);
            format!("Could not update order {id}. Please try again.")
        }
    };

    Redirect::to(&format!("/admin?notice={}", urlencoding::encode(&notice))).into_response()
}

/// Drop the admin gate flag. Order data is untouched.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Response, AppError> {
    selection::clear_admin_authed(&session).await?;
    Ok(Redirect::to("/admin").into_response())
}
