use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{PriceRange, ProductOut, ProductUpdate};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Store a new product
    async fn insert(&self, product: ProductOut) -> ProductResult<ProductOut>;

    /// Get a product by ID
    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<ProductOut>>;

    /// List products whose price lies in `range`, oldest first
    async fn find(&self, range: PriceRange) -> ProductResult<Vec<ProductOut>>;

    /// Apply a partial update to an existing product
    async fn update(&self, id: Uuid, update: ProductUpdate) -> ProductResult<ProductOut>;

    /// Delete a product by ID, returning whether it existed
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;

    /// Check if a product name exists (case-insensitive)
    async fn exists_by_name(&self, name: &str) -> ProductResult<bool>;
}

/// In-memory implementation of ProductRepository
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, ProductOut>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored products
    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, product: ProductOut) -> ProductResult<ProductOut> {
        let mut products = self.products.write().await;

        if products.values().any(|p| same_name(&p.name, &product.name)) {
            return Err(ProductError::duplicate_name(&product.name));
        }

        products.insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<ProductOut>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn find(&self, range: PriceRange) -> ProductResult<Vec<ProductOut>> {
        let products = self.products.read().await;

        let mut result: Vec<ProductOut> = products
            .values()
            .filter(|p| range.contains(p.price))
            .cloned()
            .collect();

        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(result)
    }

    async fn update(&self, id: Uuid, update: ProductUpdate) -> ProductResult<ProductOut> {
        let mut products = self.products.write().await;

        let product = products.get_mut(&id).ok_or(ProductError::NotFound(id))?;
        product.apply_update(update);
        let updated = product.clone();

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let mut products = self.products.write().await;

        if products.remove(&id).is_some() {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn exists_by_name(&self, name: &str) -> ProductResult<bool> {
        let products = self.products.read().await;
        Ok(products.values().any(|p| same_name(&p.name, name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Patch, ProductIn};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn product(name: &str, price: &str) -> ProductOut {
        ProductOut::new(ProductIn {
            name: name.to_string(),
            quantity: 1,
            price: Decimal::from_str(price).unwrap(),
            status: true,
        })
    }

    #[tokio::test]
    async fn test_insert_and_find_by_id() {
        let repo = InMemoryProductRepository::new();

        let created = repo.insert(product("Desk", "120.00")).await.unwrap();

        let fetched = repo.find_by_id(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_name_ignoring_case() {
        let repo = InMemoryProductRepository::new();
        repo.insert(product("Desk", "1")).await.unwrap();

        let result = repo.insert(product("DESK", "2")).await;

        assert!(matches!(result, Err(ProductError::BadRequest(_))));
        assert!(repo.exists_by_name("desk").await.unwrap());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_filters_and_keeps_insertion_order() {
        let repo = InMemoryProductRepository::new();
        let cheap = repo.insert(product("Pen", "5")).await.unwrap();
        let low = repo.insert(product("Lamp", "10")).await.unwrap();
        let mid = repo.insert(product("Chair", "15")).await.unwrap();
        let high = repo.insert(product("Shelf", "20")).await.unwrap();
        repo.insert(product("Sofa", "25")).await.unwrap();

        let range = PriceRange::new(
            Some(Decimal::from_str("10").unwrap()),
            Some(Decimal::from_str("20").unwrap()),
        );
        let found = repo.find(range).await.unwrap();
        let ids: Vec<Uuid> = found.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![low.id, mid.id, high.id]);

        let all = repo.find(PriceRange::default()).await.unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].id, cheap.id);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let repo = InMemoryProductRepository::new();
        let id = Uuid::now_v7();

        let result = repo
            .update(
                id,
                ProductUpdate {
                    quantity: Patch::Set(2),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ProductError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_update_persists_changes() {
        let repo = InMemoryProductRepository::new();
        let created = repo.insert(product("Desk", "120")).await.unwrap();

        repo.update(
            created.id,
            ProductUpdate {
                status: Patch::Set(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let fetched = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert!(!fetched.status);
        assert_eq!(fetched.quantity, created.quantity);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryProductRepository::new();
        let created = repo.insert(product("Desk", "120")).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.is_empty().await);
    }
}
