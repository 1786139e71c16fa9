//! Router tests against an in-process order store and session store.
//!
//! Each test drives the full router with `tower::ServiceExt::oneshot`,
//! carrying the session cookie between requests the way a browser would.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tower::ServiceExt;

use scoop_shop_core::{
    CustomerDetails, DeliveryType, Order, OrderDraft, OrderId, OrderLine, OrderStatus, Product,
    ProductId,
};
use scoop_shop_storefront::catalog::CatalogClient;
use scoop_shop_storefront::config::{OrderBackendConfig, StorefrontConfig};
use scoop_shop_storefront::middleware::memory_session_layer;
use scoop_shop_storefront::state::AppState;
use scoop_shop_storefront::store::{MemoryStore, OrderStore};
use scoop_shop_storefront::{router, store};

fn test_config(order_backend: OrderBackendConfig) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        database_url: None,
        catalog_url: None,
        order_backend,
        identity: None,
        admin_passphrase: "scoopadmin123".to_string(),
        sentry_dsn: None,
    }
}

fn sample_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new("vanilla"),
            name: "Vanilla Bean".to_string(),
            description: "Classic.".to_string(),
            price: Decimal::new(350, 2),
            image: String::new(),
            ingredients: "cream, vanilla".to_string(),
        },
        Product {
            id: ProductId::new("mint-chip"),
            name: "Mint Chip".to_string(),
            description: "Cool and crunchy.".to_string(),
            price: Decimal::new(425, 2),
            image: String::new(),
            ingredients: String::new(),
        },
    ]
}

/// A router plus the cookie jar of a single simulated browser.
struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    cookie: Option<String>,
}

impl TestApp {
    fn new() -> Self {
        Self::with_config(test_config(OrderBackendConfig::Memory))
    }

    fn with_config(config: StorefrontConfig) -> Self {
        Self::with_parts(config, CatalogClient::fixed(sample_products()))
    }

    fn with_parts(config: StorefrontConfig, catalog: CatalogClient) -> Self {
        let store = Arc::new(MemoryStore::new());
        let orders: Arc<dyn OrderStore> = store.clone();
        let session_layer = memory_session_layer(&config);
        let state = AppState::with_store(config, None, catalog, orders, None);

        Self {
            router: router(state, session_layer),
            store,
            cookie: None,
        }
    }

    async fn request(&mut self, request: Request<Body>) -> (StatusCode, String, Option<String>) {
        let mut request = request;
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        // Remember the session cookie like a browser would
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let cookie = set_cookie.to_str().unwrap();
            let pair = cookie.split(';').next().unwrap().to_string();
            self.cookie = Some(pair);
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap(), location)
    }

    async fn get(&mut self, uri: &str) -> (StatusCode, String, Option<String>) {
        self.request(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn post_form(&mut self, uri: &str, body: &str) -> (StatusCode, String, Option<String>) {
        self.request(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

fn seeded_order(id: &str, placed: chrono::DateTime<chrono::Utc>) -> Order {
    let details = CustomerDetails {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        phone: "555-0100".to_string(),
        address: None,
    };
    let mut draft = OrderDraft {
        customer_name: details.name,
        customer_email: details.email,
        customer_phone: details.phone,
        customer_address: None,
        delivery_type: DeliveryType::Pickup,
        items: vec![OrderLine {
            id: ProductId::new("vanilla"),
            name: "Vanilla Bean".to_string(),
            price: Decimal::new(350, 2),
            quantity: 1,
        }],
        total: Decimal::new(350, 2),
        order_date: Utc::now(),
        status: OrderStatus::Pending,
    };
    draft.order_date = placed;
    Order {
        id: OrderId::new(id),
        draft,
    }
}

async fn admin_login(app: &mut TestApp) {
    let (status, _, location) = app
        .post_form("/admin/login", "passphrase=scoopadmin123")
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/admin"));
}

#[tokio::test]
async fn test_health() {
    let mut app = TestApp::new();
    let (status, body, _) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_catalog_page_lists_products() {
    let mut app = TestApp::new();
    let (status, body, _) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Vanilla Bean"));
    assert!(body.contains("Mint Chip"));
    assert!(body.contains("$4.25"));
}

#[tokio::test]
async fn test_catalog_fetch_failure_renders_notice() {
    // Port 1 refuses connections promptly on loopback.
    let app_catalog = CatalogClient::new(Some("http://127.0.0.1:1/catalog.json".to_string()));
    let mut app = TestApp::with_parts(test_config(OrderBackendConfig::Memory), app_catalog);

    let (status, body, _) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Could not load flavors"));
}

#[tokio::test]
async fn test_unknown_product_is_404() {
    let mut app = TestApp::new();
    let (status, _, _) = app.get("/products/rocky-road").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_order_flow() {
    let mut app = TestApp::new();

    // Put two scoops of mint chip in the cart
    let (status, _, location) = app.post_form("/products/mint-chip/cart", "quantity=2").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/order"));

    // The order page shows the pending line
    let (_, body, _) = app.get("/order").await;
    assert!(body.contains("2 x Mint Chip"));
    assert!(body.contains("$8.50"));

    // Submit the order
    let (status, _, location) = app
        .post_form(
            "/order",
            "customer_name=Ada&customer_email=ada%40example.com&customer_phone=555-0100\
             &customer_address=&delivery_type=pickup",
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    let location = location.unwrap();
    assert!(location.starts_with("/order/confirmed/"));

    // Exactly one order persisted, pending, with the computed total
    let orders = app.store.snapshot();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.draft.status, OrderStatus::Pending);
    assert_eq!(order.draft.total, Decimal::new(850, 2));
    assert_eq!(order.draft.items.len(), 1);
    assert_eq!(order.draft.items[0].quantity, 2);
    // Blank address is dropped, not stored as empty
    assert_eq!(order.draft.customer_address, None);

    // The confirmation page renders from the persisted record
    let (status, body, _) = app.get(&location).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Thanks, Ada!"));
    assert!(body.contains(order.id.as_str()));

    // The cart was consumed
    let (_, body, _) = app.get("/order").await;
    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_missing_fields_are_reported_together() {
    let mut app = TestApp::new();
    app.post_form("/products/vanilla/cart", "quantity=1").await;

    let (status, body, _) = app
        .post_form(
            "/order",
            "customer_name=&customer_email=&customer_phone=555-0100&delivery_type=pickup",
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Please fill in: Name, Email"));
    // Nothing persisted, cart intact
    assert!(app.store.snapshot().is_empty());
    let (_, body, _) = app.get("/order").await;
    assert!(body.contains("Vanilla Bean"));
}

#[tokio::test]
async fn test_empty_cart_submission_is_its_own_error() {
    let mut app = TestApp::new();

    let (status, body, _) = app
        .post_form(
            "/order",
            "customer_name=Ada&customer_email=a%40b.c&customer_phone=1&delivery_type=pickup",
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Your cart is empty"));
    assert!(app.store.snapshot().is_empty());
}

#[tokio::test]
async fn test_quantity_clamps_to_one() {
    let mut app = TestApp::new();
    app.post_form("/products/vanilla/cart", "quantity=0").await;

    let (_, body, _) = app.get("/order").await;
    assert!(body.contains("1 x Vanilla Bean"));
}

#[tokio::test]
async fn test_sign_in_gate_redirects_and_keeps_cart() {
    // The document-store variant gates submission behind sign-in; the order
    // store itself is swapped for the in-process one.
    let config = test_config(OrderBackendConfig::DocStore {
        base_url: "http://127.0.0.1:1".to_string(),
        api_key: secrecy::SecretString::from("k"),
        collection: "orders".to_string(),
    });
    let mut app = TestApp::with_config(config);

    app.post_form("/products/vanilla/cart", "quantity=1").await;
    let (status, _, location) = app
        .post_form(
            "/order",
            "customer_name=Ada&customer_email=a%40b.c&customer_phone=1&delivery_type=pickup",
        )
        .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/auth/sign-in"));
    assert!(app.store.snapshot().is_empty());

    // The cart survives the detour
    let (_, body, _) = app.get("/order").await;
    assert!(body.contains("Vanilla Bean"));
}

#[tokio::test]
async fn test_order_confirmation_unknown_id_is_404() {
    let mut app = TestApp::new();
    let (status, _, _) = app.get("/order/confirmed/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_gate() {
    let mut app = TestApp::new();

    // Unauthenticated: the gate, not the dashboard
    let (status, body, _) = app.get("/admin").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Passphrase"));
    assert!(!body.contains("No orders yet"));

    // Wrong passphrase re-prompts
    let (status, body, _) = app.post_form("/admin/login", "passphrase=wrong").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Incorrect passphrase"));

    // Right passphrase sticks in the session
    admin_login(&mut app).await;
    let (status, body, _) = app.get("/admin").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No orders yet"));

    // Logging out drops the flag but not the orders
    let (status, _, _) = app.post_form("/admin/logout", "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    let (_, body, _) = app.get("/admin").await;
    assert!(body.contains("Passphrase"));
}

#[tokio::test]
async fn test_admin_complete_action_without_gate_redirects() {
    let mut app = TestApp::new();
    app.store.insert(seeded_order("o1", Utc::now()));

    let (status, _, location) = app.post_form("/admin/orders/o1/complete", "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/admin"));
    assert_eq!(app.store.snapshot()[0].draft.status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_admin_dashboard_sorts_newest_first() {
    let mut app = TestApp::new();
    let now = Utc::now();
    app.store.insert(seeded_order("older", now - Duration::hours(2)));
    app.store.insert(seeded_order("newer", now));

    admin_login(&mut app).await;
    let (_, body, _) = app.get("/admin").await;

    let newer_at = body.find("newer").unwrap();
    let older_at = body.find("older").unwrap();
    assert!(newer_at < older_at, "newest order should render first");
}

#[tokio::test]
async fn test_admin_completes_order_once() {
    let mut app = TestApp::new();
    app.store.insert(seeded_order("o7", Utc::now()));
    admin_login(&mut app).await;

    let (status, _, location) = app.post_form("/admin/orders/o7/complete", "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    let location = location.unwrap();
    assert!(location.contains("marked%20complete"));

    assert_eq!(app.store.snapshot()[0].draft.status, OrderStatus::Completed);

    // The completed row shows a label, not another action button
    let (_, body, _) = app.get(&location).await;
    assert!(body.contains("Completed"));
    assert!(!body.contains("Mark complete"));
}

#[tokio::test]
async fn test_admin_complete_unknown_order_reports_not_found() {
    let mut app = TestApp::new();
    admin_login(&mut app).await;

    let (status, _, location) = app.post_form("/admin/orders/ghost/complete", "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(location.unwrap().contains("not%20found"));
}

#[tokio::test]
async fn test_store_error_surfaces_as_bad_gateway() {
    // Webhook backend pointed at a closed port: listing orders fails, the
    // dashboard still renders with a notice.
    let config = test_config(OrderBackendConfig::Webhook {
        url: "http://127.0.0.1:1/hook".to_string(),
    });
    let orders: Arc<dyn OrderStore> = Arc::new(store::WebhookStore::new("http://127.0.0.1:1/hook"));
    let session_layer = memory_session_layer(&config);
    let state = AppState::with_store(
        config,
        None,
        CatalogClient::fixed(sample_products()),
        orders,
        None,
    );
    let mut app = TestApp {
        router: router(state, session_layer),
        store: Arc::new(MemoryStore::new()),
        cookie: None,
    };

    admin_login(&mut app).await;
    let (status, body, _) = app.get("/admin").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Could not load orders"));
}
