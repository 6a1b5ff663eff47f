//! Test doubles and request helpers shared by handler tests.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use tower::ServiceExt;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::models::{Brand, NewProduct, Product, ProductChanges};
use crate::database::{DatabaseError, ProductRepository};
use crate::services::email::{EmailError, EmailMessage, EmailProvider, EmailService, SentEmail};
use crate::state::AppState;

/// In-memory product store that records which operations reached it
#[derive(Default)]
pub struct MemoryProductRepository {
    products: Mutex<Vec<Product>>,
    calls: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl MemoryProductRepository {
    /// Every operation fails with a storage error that is not a not-found
    pub fn failing() -> Self {
        let repo = Self::default();
        repo.fail.store(true, Ordering::SeqCst);
        repo
    }

    /// Insert directly, bypassing call recording
    pub fn seed(&self, input: NewProduct) -> Product {
        let product = materialize(input);
        self.products.lock().unwrap().push(product.clone());
        product
    }

    pub fn snapshot(&self) -> Vec<Product> {
        self.products.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, call: String) -> Result<(), DatabaseError> {
        self.calls.lock().unwrap().push(call);
        if self.fail.load(Ordering::SeqCst) {
            return Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn materialize(input: NewProduct) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4().to_string(),
        gear_id: input.gear_id,
        title: input.title,
        description: input.description,
        brand: input.brand,
        category: input.category,
        price: input.price,
        images: input.images,
        stock: input.stock,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn list_products(&self) -> Result<Vec<Product>, DatabaseError> {
        self.enter("list".to_string())?;
        Ok(self.snapshot())
    }

    async fn get_product_by_id(&self, id: &str) -> Result<Option<Product>, DatabaseError> {
        self.enter(format!("get:{}", id))?;
        Ok(self.products.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn create_product(&self, input: NewProduct) -> Result<Product, DatabaseError> {
        self.enter(format!("create:{}", input.gear_id))?;
        let product = materialize(input);
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: &str, changes: ProductChanges) -> Result<Product, DatabaseError> {
        self.enter(format!("update:{}", id))?;
        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DatabaseError::RecordNotFound(id.to_string()))?;
        changes.apply_to(product);
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn delete_product(&self, id: &str) -> Result<(), DatabaseError> {
        self.enter(format!("delete:{}", id))?;
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(DatabaseError::RecordNotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Email provider that keeps every message instead of sending it
#[derive(Default)]
pub struct RecordingEmailProvider {
    sent: Mutex<Vec<EmailMessage>>,
    fail: AtomicBool,
}

impl RecordingEmailProvider {
    pub fn failing() -> Self {
        let provider = Self::default();
        provider.fail.store(true, Ordering::SeqCst);
        provider
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailProvider for RecordingEmailProvider {
    async fn send(&self, message: EmailMessage) -> Result<SentEmail, EmailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(EmailError::Provider("mailbox unavailable".to_string()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(message);
        Ok(SentEmail {
            message_id: Some(format!("test-{}", sent.len())),
        })
    }
}

pub fn sample_new_product(gear_id: &str) -> NewProduct {
    NewProduct {
        gear_id: gear_id.to_string(),
        title: "Worm Gear".to_string(),
        description: "Replacement worm gear".to_string(),
        brand: Brand::Kitchenaid,
        category: "Gears".to_string(),
        price: "24.99".to_string(),
        images: vec!["worm-gear.jpg".to_string()],
        stock: 3,
    }
}

pub fn test_state_with(
    config: AppConfig,
    products: Arc<dyn ProductRepository>,
    email: Arc<dyn EmailProvider>,
) -> AppState {
    AppState::new(config, products, EmailService::new(email), reqwest::Client::new())
}

pub fn test_app(products: Arc<dyn ProductRepository>) -> Router {
    crate::app::app(test_state_with(
        AppConfig::default(),
        products,
        Arc::new(RecordingEmailProvider::default()),
    ))
}

/// Send a request through the router and decode the JSON body (`Null` when empty)
pub async fn request(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = body.map(|v| v.to_string()).unwrap_or_default();
    request_raw(app, method, uri, &body).await
}

pub async fn request_raw(app: Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let (status, _, value) = send(app, method, uri, body, &[]).await;
    (status, value)
}

/// Like `request_raw`, with extra request headers and the response headers returned
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: &str,
    headers: &[(HeaderName, &str)],
) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if !body.is_empty() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    for (name, value) in headers {
        builder = builder.header(name.clone(), *value);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let response_headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, response_headers, value)
}
