//! Order form and confirmation route handlers.
//!
//! Submission walks a fixed sequence: cart check, required-field check,
//! sign-in gate (document-store variant only), then the backend call. Every
//! rejection re-renders the form with the submitted values and the cart
//! intact, so nothing is lost and the customer can retry.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use scoop_shop_core::{CartItem, CustomerDetails, DeliveryType, Order, OrderDraft, OrderId};

use crate::error::AppError;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::selection;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub total: String,
    pub image: String,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        Self {
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price: filters::money(item.price),
            total: filters::money(item.line_total()),
            image: item.image.clone(),
        }
    }
}

/// Order form data.
///
/// Field names match the durable record's wire names so the template and
/// handler stay aligned with what gets persisted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderForm {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_address: String,
    #[serde(default)]
    pub delivery_type: DeliveryType,
}

impl OrderForm {
    fn details(&self) -> CustomerDetails {
        CustomerDetails {
            name: self.customer_name.clone(),
            email: self.customer_email.clone(),
            phone: self.customer_phone.clone(),
            address: Some(self.customer_address.clone()),
        }
    }
}

/// Order form page template.
#[derive(Template, WebTemplate)]
#[template(path = "order/new.html")]
pub struct OrderNewTemplate {
    pub theme_class: &'static str,
    pub cart: Option<CartLineView>,
    pub form: OrderForm,
    pub error: Option<String>,
    pub signed_in: bool,
    pub requires_sign_in: bool,
    /// The product last opened on the detail page, for the way back when
    /// the cart is empty.
    pub last_viewed: Option<String>,
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "order/confirmed.html")]
pub struct OrderConfirmedTemplate {
    pub theme_class: &'static str,
    pub order_id: String,
    pub customer_name: String,
    pub line: CartLineView,
    pub total: String,
    pub delivery_label: &'static str,
}

const fn delivery_label(delivery_type: DeliveryType) -> &'static str {
    match delivery_type {
        DeliveryType::Pickup => "Pickup",
        DeliveryType::Delivery => "Delivery",
    }
}

/// Display the order form.
#[instrument(skip(state, session, user))]
pub async fn new_order(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
) -> impl IntoResponse {
    let cart = selection::cart_item(&session).await;
    let last_viewed = selection::selected_product(&session)
        .await
        .map(|id| id.to_string());

    OrderNewTemplate {
        theme_class: selection::theme(&session).await.css_class(),
        cart: cart.as_ref().map(CartLineView::from),
        form: OrderForm::default(),
        error: None,
        signed_in: user.is_some(),
        requires_sign_in: state.config().requires_sign_in(),
        last_viewed,
    }
}

/// Submit the order.
#[instrument(skip(state, session, user, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    axum::Form(form): axum::Form<OrderForm>,
) -> Result<Response, AppError> {
    let theme_class = selection::theme(&session).await.css_class();
    let signed_in = user.is_some();
    let requires_sign_in = state.config().requires_sign_in();

    // An empty cart is its own error, reported before field validation.
    let Some(item) = selection::cart_item(&session).await else {
        let last_viewed = selection::selected_product(&session)
            .await
            .map(|id| id.to_string());
        return Ok(OrderNewTemplate {
            theme_class,
            cart: None,
            form,
            error: Some("Your cart is empty. Pick a flavor first.".to_string()),
            signed_in,
            requires_sign_in,
            last_viewed,
        }
        .into_response());
    };

    let details = form.details();
    let missing = details.missing_fields();
    if !missing.is_empty() {
        return Ok(OrderNewTemplate {
            theme_class,
            cart: Some(CartLineView::from(&item)),
            form,
            error: Some(format!("Please fill in: {}", missing.join(", "))),
            signed_in,
            requires_sign_in,
            last_viewed: None,
        }
        .into_response());
    }

    if requires_sign_in && user.is_none() {
        return Ok(Redirect::to("/auth/sign-in").into_response());
    }

    let draft = OrderDraft::new(details, form.delivery_type, &item);

    match state.orders().create_order(&draft).await {
        Ok(order) => {
            // Only now does the cart clear; a failed submission keeps it.
            selection::clear_cart_item(&session).await?;
            Ok(Redirect::to(&format!("/order/confirmed/{}", order.id)).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "Order submission failed");
            sentry::capture_error(&e);
            Ok(OrderNewTemplate {
                theme_class,
                cart: Some(CartLineView::from(&item)),
                form,
                error: Some(
                    "We couldn't submit your order. Nothing was lost; please try again."
                        .to_string(),
                ),
                signed_in,
                requires_sign_in,
                last_viewed: None,
            }
            .into_response())
        }
    }
}

/// Display the confirmation page for a persisted order.
#[instrument(skip(state, session))]
pub async fn confirmed(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = OrderId::from(id);

    let Some(order) = state.orders().get_order(&id).await? else {
        return Err(AppError::NotFound(format!("order {id}")));
    };

    Ok(confirmation_page(selection::theme(&session).await.css_class(), &order).into_response())
}

fn confirmation_page(theme_class: &'static str, order: &Order) -> OrderConfirmedTemplate {
    // Orders carry exactly one line; a record without one is malformed but
    // still renders with an empty line rather than failing the page.
    let line = order.draft.items.first().map_or_else(
        || CartLineView {
            name: String::new(),
            quantity: 0,
            unit_price: filters::money(rust_decimal::Decimal::ZERO),
            total: filters::money(rust_decimal::Decimal::ZERO),
            image: String::new(),
        },
        |first| CartLineView {
            name: first.name.clone(),
            quantity: first.quantity,
            unit_price: filters::money(first.price),
            total: filters::money(order.draft.total),
            image: String::new(),
        },
    );

    OrderConfirmedTemplate {
        theme_class,
        order_id: order.id.to_string(),
        customer_name: order.draft.customer_name.clone(),
        total: filters::money(order.draft.total),
        delivery_label: delivery_label(order.draft.delivery_type),
        line,
    }
}
