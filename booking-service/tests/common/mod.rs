#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use booking_service::{
    build_router,
    config::{AuthConfig, BookingConfig, Environment, MongoConfig, SecurityConfig},
    models::{Booking, IdentityClaim, ServiceRecord},
    query::QueryDescriptor,
    services::{BookingService, BookingStore, CatalogService, CatalogStore, TokenService},
    AppState,
};
use http_body_util::BodyExt;
use mongodb::bson::{self, oid::ObjectId, Bson};
use secrecy::Secret;
use service_core::error::AppError;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn test_config() -> BookingConfig {
    BookingConfig {
        common: service_core::config::Config { port: 0 },
        environment: Environment::Dev,
        service_name: "booking-service".to_string(),
        service_version: "test".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "unused".to_string(),
        },
        auth: AuthConfig {
            token_secret: Secret::new(TEST_SECRET.to_string()),
            token_ttl_seconds: 3600,
        },
        security: SecurityConfig {
            allowed_origins: vec!["https://clean-co.example".to_string()],
        },
    }
}

/// In-memory catalog that applies a descriptor the way MongoDB would.
#[derive(Default)]
pub struct InMemoryCatalog {
    records: Mutex<Vec<ServiceRecord>>,
    pub calls: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn insert(&self, category: &str, price: f64, name: &str) -> ObjectId {
        let id = ObjectId::new();
        self.records.lock().unwrap().push(ServiceRecord {
            id,
            attributes: bson::doc! { "category": category, "price": price, "name": name },
        });
        id
    }

    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }
}

fn field_of(record: &ServiceRecord, field: &str) -> Option<Bson> {
    record.attributes.get(field).cloned()
}

fn compare_bson(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    fn number(value: &Bson) -> Option<f64> {
        match value {
            Bson::Double(v) => Some(*v),
            Bson::Int32(v) => Some(*v as f64),
            Bson::Int64(v) => Some(*v as f64),
            _ => None,
        }
    }

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (number(a), number(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => match (a.as_str(), b.as_str()) {
                (Some(x), Some(y)) => x.cmp(y),
                _ => Ordering::Equal,
            },
        },
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn find_services(&self, query: &QueryDescriptor) -> Result<Vec<ServiceRecord>, AppError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        let mut records: Vec<ServiceRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                query.filter.iter().all(|(field, value)| {
                    field_of(r, field).as_ref().and_then(Bson::as_str) == Some(value.as_str())
                })
            })
            .cloned()
            .collect();

        for (field, order) in query.sort.iter() {
            records.sort_by(|a, b| {
                let ordering = compare_bson(field_of(a, field).as_ref(), field_of(b, field).as_ref());
                if order.direction() < 0 {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        let window = records.into_iter().skip(query.skip() as usize);
        Ok(match query.limit() {
            Some(limit) => window.take(limit as usize).collect(),
            None => window.collect(),
        })
    }

    async fn count_services(&self) -> Result<u64, AppError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(self.records.lock().unwrap().len() as u64)
    }

    async fn find_service(&self, id: ObjectId) -> Result<Option<ServiceRecord>, AppError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryBookings {
    bookings: Mutex<Vec<Booking>>,
    pub calls: AtomicUsize,
}

impl InMemoryBookings {
    pub fn seed(&self, email: &str, service: &str) -> ObjectId {
        let booking = Booking::new(email.to_string(), bson::doc! { "service": service });
        let id = booking.id;
        self.bookings.lock().unwrap().push(booking);
        id
    }

    pub fn all(&self) -> Vec<Booking> {
        self.bookings.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }
}

#[async_trait]
impl BookingStore for InMemoryBookings {
    async fn insert_booking(&self, booking: Booking) -> Result<ObjectId, AppError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        let id = booking.id;
        self.bookings.lock().unwrap().push(booking);
        Ok(id)
    }

    async fn find_bookings(&self, email: Option<&str>) -> Result<Vec<Booking>, AppError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| email.map_or(true, |e| b.email == e))
            .cloned()
            .collect())
    }

    async fn delete_booking(&self, id: ObjectId) -> Result<u64, AppError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        let mut bookings = self.bookings.lock().unwrap();
        let before = bookings.len();
        bookings.retain(|b| b.id != id);
        Ok((before - bookings.len()) as u64)
    }
}

pub struct TestApp {
    pub router: Router,
    pub tokens: TokenService,
    pub catalog: Arc<InMemoryCatalog>,
    pub bookings: Arc<InMemoryBookings>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

impl TestApp {
    pub fn spawn() -> Self {
        let config = test_config();
        let tokens = TokenService::new(&config.auth);
        let catalog = Arc::new(InMemoryCatalog::default());
        let bookings = Arc::new(InMemoryBookings::default());

        let state = AppState {
            config,
            catalog: CatalogService::new(catalog.clone()),
            bookings: BookingService::new(bookings.clone()),
            tokens: tokens.clone(),
        };

        Self {
            router: build_router(state),
            tokens,
            catalog,
            bookings,
        }
    }

    pub fn token_for(&self, email: &str) -> String {
        self.tokens
            .issue(&IdentityClaim::with_email(email))
            .expect("Failed to issue token")
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("token={}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}
