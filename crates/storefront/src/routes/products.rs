//! Product catalog route handlers.
//!
//! The catalog page and the product detail page both work from a catalog
//! snapshot loaded per request. A snapshot that is empty because the fetch
//! failed renders a different notice than one that is empty because this
//! environment has no catalog endpoint at all.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use scoop_shop_core::{CartItem, Product, ProductId};

use crate::catalog::CatalogAvailability;
use crate::error::AppError;
use crate::filters;
use crate::selection;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub ingredients: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: filters::money(product.price),
            image: product.image.clone(),
            ingredients: product.ingredients.clone(),
        }
    }
}

/// Catalog listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub theme_class: &'static str,
    pub products: Vec<ProductView>,
    pub notice: Option<&'static str>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub theme_class: &'static str,
    pub product: ProductView,
}

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub quantity: Option<u32>,
}

/// Notice text for an empty catalog snapshot, if any.
const fn availability_notice(availability: CatalogAvailability) -> Option<&'static str> {
    match availability {
        CatalogAvailability::Loaded => None,
        CatalogAvailability::Unavailable => Some("The flavor list is not available here yet."),
        CatalogAvailability::FetchFailed => {
            Some("Could not load flavors right now. Please try again in a moment.")
        }
    }
}

/// Display the catalog listing page.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let catalog = state.catalog().load().await;

    ProductsIndexTemplate {
        theme_class: selection::theme(&session).await.css_class(),
        products: catalog.products().iter().map(ProductView::from).collect(),
        notice: availability_notice(catalog.availability()),
    }
}

/// Display the product detail page and remember the selection.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = ProductId::from(id);
    let catalog = state.catalog().load().await;

    let Some(product) = catalog.product(&id) else {
        return Err(AppError::NotFound(format!("product {id}")));
    };

    selection::set_selected_product(&session, &id).await?;

    Ok(ProductShowTemplate {
        theme_class: selection::theme(&session).await.css_class(),
        product: ProductView::from(product),
    }
    .into_response())
}

/// Put the chosen product in the cart and move to the order page.
///
/// The cart holds exactly one line; adding replaces whatever was there.
/// A missing or zero quantity is clamped to 1.
#[instrument(skip(state, session))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    axum::Form(form): axum::Form<AddToCartForm>,
) -> Result<Response, AppError> {
    let id = ProductId::from(id);
    let catalog = state.catalog().load().await;

    let Some(product) = catalog.product(&id) else {
        return Err(AppError::NotFound(format!("product {id}")));
    };

    let item = CartItem::new(product, form.quantity.unwrap_or(1));
    selection::set_cart_item(&session, &item).await?;

    Ok(Redirect::to("/order").into_response())
}
