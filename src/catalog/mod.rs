//! Catalog collaborators: the backend contract and the two page loaders.

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{VariantMatrix, VariantRow, VariantId};
use crate::{LoadError, VariantDetail, VariantProperties};

pub use http::{CatalogClientError, HttpCatalog};

/// Wire shape of a family response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FamilyPayload {
    pub detail: VariantDetail,
    pub selectable_names: Vec<String>,
    pub rows: Vec<VariantRow>,
}

/// Backend operations the product page depends on.
///
/// Families must include the requesting id's own row.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_variant_detail(&self, id: &VariantId) -> Result<VariantDetail, LoadError>;
    async fn fetch_variant_family(&self, id: &VariantId) -> Result<FamilyPayload, LoadError>;
    async fn fetch_variant_properties(&self, id: &VariantId) -> Result<VariantProperties, LoadError>;
}

#[derive(Clone, Debug)]
pub struct FamilyLoad {
    pub matrix: VariantMatrix,
    pub detail: VariantDetail,
    pub properties: VariantProperties,
}

#[derive(Clone, Debug)]
pub struct DetailLoad {
    pub detail: VariantDetail,
    pub properties: VariantProperties,
}

/// Loads a whole family around `id`, validating the payload before anything is returned.
pub async fn load_family<C: CatalogApi + ?Sized>(api: &C, id: &VariantId) -> Result<FamilyLoad, LoadError> {
    let (family, properties) = tokio::try_join!(api.fetch_variant_family(id), api.fetch_variant_properties(id))?;
    let malformed = |reason: String| LoadError::Malformed { variant_id: id.clone(), reason };

    let matrix = VariantMatrix::new(family.selectable_names, family.rows).map_err(|e| malformed(e.to_string()))?;
    if !matrix.contains(id) {
        return Err(malformed("family does not contain the requested variant".into()));
    }
    if &family.detail.id != id {
        return Err(malformed(format!("detail belongs to {}", family.detail.id)));
    }
    tracing::debug!(variant_id = %id, variants = matrix.len(), "Family loaded");
    Ok(FamilyLoad { matrix, detail: family.detail, properties })
}

/// The lighter reload used when switching within an already-loaded family.
pub async fn load_variant<C: CatalogApi + ?Sized>(api: &C, id: &VariantId) -> Result<DetailLoad, LoadError> {
    let (detail, properties) = tokio::try_join!(api.fetch_variant_detail(id), api.fetch_variant_properties(id))?;
    if &detail.id != id {
        return Err(LoadError::Malformed { variant_id: id.clone(), reason: format!("detail belongs to {}", detail.id) });
    }
    Ok(DetailLoad { detail, properties })
}
