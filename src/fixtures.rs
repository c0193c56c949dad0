//! In-memory catalog for development and tests.
//!
//! Serves the same data through [`CatalogApi`] directly and over HTTP via
//! [`router`], mirroring the backend's `/api/v1/variants` paths.

use std::collections::HashMap;
use std::path::Path as FsPath;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::{Path, State}, http::StatusCode, routing::get, Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::catalog::{CatalogApi, FamilyPayload};
use crate::domain::{Money, Quantity, VariantId, VariantRow};
use crate::{LoadError, Property, VariantDetail, VariantProperties};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FixtureVariant {
    pub detail: VariantDetail,
    pub values: HashMap<String, String>,
    #[serde(default)]
    pub properties: VariantProperties,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FixtureFamily {
    pub selectable_names: Vec<String>,
    pub variants: Vec<FixtureVariant>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FixtureCatalog {
    pub families: Vec<FixtureFamily>,
}

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Cannot read fixture file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid fixture JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl FixtureCatalog {
    pub fn from_path(path: impl AsRef<FsPath>) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn locate(&self, id: &VariantId) -> Result<(&FixtureFamily, &FixtureVariant), LoadError> {
        self.families.iter()
            .find_map(|f| f.variants.iter().find(|v| &v.detail.id == id).map(|v| (f, v)))
            .ok_or_else(|| LoadError::NotFound { variant_id: id.clone() })
    }

    /// A phone family (color × storage, one combination missing) and a
    /// single-variant case family.
    pub fn sample() -> Self {
        let phone = |id: &str, color: &str, storage: &str, cents: i64, stock: u32| {
            let name = format!("OpenPhone {color} {storage}");
            FixtureVariant {
                detail: VariantDetail {
                    id: VariantId::new(id), name, description: "Six-inch OLED, dual camera".into(),
                    price: Money::usd(Decimal::new(cents, 2)), stock: Quantity::new(stock),
                    images: vec![format!("https://cdn.opensase.dev/img/{id}.jpg")],
                },
                values: HashMap::from([("color".to_string(), color.to_string()), ("storage".to_string(), storage.to_string())]),
                properties: VariantProperties {
                    selectable: vec![prop("color", color), prop("storage", storage)],
                    required: vec![prop("warranty", "1 year")],
                    info: vec![prop("brand", "OpenSASE")],
                },
            }
        };
        let case = FixtureVariant {
            detail: VariantDetail {
                id: VariantId::new("case-clear"), name: "Clear Case".into(), description: String::new(),
                price: Money::usd(Decimal::new(1999, 2)), stock: Quantity::new(40), images: vec![],
            },
            values: HashMap::from([("finish".to_string(), "clear".to_string())]),
            properties: VariantProperties::default(),
        };
        Self {
            families: vec![
                FixtureFamily {
                    selectable_names: vec!["color".into(), "storage".into()],
                    variants: vec![
                        phone("phone-black-128", "black", "128GB", 79900, 12),
                        phone("phone-black-256", "black", "256GB", 89900, 3),
                        phone("phone-white-128", "white", "128GB", 79900, 0),
                    ],
                },
                FixtureFamily { selectable_names: vec!["finish".into()], variants: vec![case] },
            ],
        }
    }
}

fn prop(name: &str, value: &str) -> Property { Property { name: name.into(), value: value.into() } }

#[async_trait]
impl CatalogApi for FixtureCatalog {
    async fn fetch_variant_detail(&self, id: &VariantId) -> Result<VariantDetail, LoadError> {
        Ok(self.locate(id)?.1.detail.clone())
    }

    async fn fetch_variant_family(&self, id: &VariantId) -> Result<FamilyPayload, LoadError> {
        let (family, variant) = self.locate(id)?;
        let rows = family.variants.iter().map(|v| VariantRow {
            variant_id: v.detail.id.clone(),
            name: Some(v.detail.name.clone()),
            property_values: v.values.clone(),
        }).collect();
        Ok(FamilyPayload { detail: variant.detail.clone(), selectable_names: family.selectable_names.clone(), rows })
    }

    async fn fetch_variant_properties(&self, id: &VariantId) -> Result<VariantProperties, LoadError> {
        Ok(self.locate(id)?.1.properties.clone())
    }
}

/// HTTP surface of a fixture catalog.
pub fn router(catalog: Arc<FixtureCatalog>) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "opensase-storefront-fixtures"})) }))
        .route("/api/v1/variants/:id", get(get_detail))
        .route("/api/v1/variants/:id/family", get(get_family))
        .route("/api/v1/variants/:id/properties", get(get_properties))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()))
        .with_state(catalog)
}

fn status_of(e: LoadError) -> (StatusCode, String) {
    match e {
        LoadError::NotFound { .. } => (StatusCode::NOT_FOUND, "Not found".to_string()),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

async fn get_detail(State(c): State<Arc<FixtureCatalog>>, Path(id): Path<String>) -> Result<Json<VariantDetail>, (StatusCode, String)> {
    c.fetch_variant_detail(&VariantId::new(id)).await.map(Json).map_err(status_of)
}

async fn get_family(State(c): State<Arc<FixtureCatalog>>, Path(id): Path<String>) -> Result<Json<FamilyPayload>, (StatusCode, String)> {
    c.fetch_variant_family(&VariantId::new(id)).await.map(Json).map_err(status_of)
}

async fn get_properties(State(c): State<Arc<FixtureCatalog>>, Path(id): Path<String>) -> Result<Json<VariantProperties>, (StatusCode, String)> {
    c.fetch_variant_properties(&VariantId::new(id)).await.map(Json).map_err(status_of)
}
