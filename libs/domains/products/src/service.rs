//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{PriceRange, ProductIn, ProductOut, ProductUpdate, ProductUpdateOut};
use crate::repository::ProductRepository;

/// Product use-cases on top of a [`ProductRepository`].
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product. Names must be unique, ignoring case.
    #[instrument(skip(self, body), fields(product_name = %body.name))]
    pub async fn create(&self, body: ProductIn) -> ProductResult<ProductOut> {
        body.validate()
            .map_err(|e| ProductError::BadRequest(e.to_string()))?;

        if self.repository.exists_by_name(&body.name).await? {
            return Err(ProductError::duplicate_name(&body.name));
        }

        self.repository.insert(ProductOut::new(body)).await
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> ProductResult<ProductOut> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// List products priced within `range`
    #[instrument(skip(self))]
    pub async fn query(&self, range: PriceRange) -> ProductResult<Vec<ProductOut>> {
        self.repository.find(range).await
    }

    /// Apply the supplied fields of `body` to an existing product
    #[instrument(skip(self, body), fields(product_id = %id))]
    pub async fn update(&self, id: Uuid, body: ProductUpdate) -> ProductResult<ProductUpdateOut> {
        if body.is_empty() {
            tracing::debug!("Update carries no fields, only updated_at changes");
        }

        self.repository
            .update(id, body)
            .await
            .map(ProductUpdateOut::from)
    }

    /// Delete a product
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: Uuid) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Patch;
    use crate::repository::MockProductRepository;
    use mockall::predicate::eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn product_in(name: &str) -> ProductIn {
        ProductIn {
            name: name.to_string(),
            quantity: 10,
            price: Decimal::from_str("8.500").unwrap(),
            status: true,
        }
    }

    #[tokio::test]
    async fn test_create_inserts_new_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_exists_by_name()
            .withf(|name| name == "Desk")
            .returning(|_| Ok(false));
        mock_repo
            .expect_insert()
            .times(1)
            .returning(|product| Ok(product));

        let service = ProductService::new(mock_repo);
        let created = service.create(product_in("Desk")).await.unwrap();

        assert_eq!(created.name, "Desk");
        assert_eq!(created.quantity, 10);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_exists_by_name().returning(|_| Ok(true));
        mock_repo.expect_insert().never();

        let service = ProductService::new(mock_repo);
        let err = service.create(product_in("Desk")).await.unwrap_err();

        assert!(matches!(err, ProductError::BadRequest(_)));
        assert_eq!(err.to_string(), "Product with name 'Desk' already exists");
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_exists_by_name().never();
        mock_repo.expect_insert().never();

        let service = ProductService::new(mock_repo);
        let result = service.create(product_in("")).await;

        assert!(matches!(result, Err(ProductError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let mut mock_repo = MockProductRepository::new();
        let id = Uuid::now_v7();
        mock_repo
            .expect_find_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));

        let service = ProductService::new(mock_repo);
        let err = service.get(id).await.unwrap_err();

        assert_eq!(err.to_string(), format!("Product not found with id: {}", id));
    }

    #[tokio::test]
    async fn test_query_passes_range_through() {
        let mut mock_repo = MockProductRepository::new();
        let range = PriceRange::new(Some(Decimal::from_str("10").unwrap()), None);
        mock_repo
            .expect_find()
            .with(eq(range))
            .returning(|_| Ok(vec![]));

        let service = ProductService::new(mock_repo);
        assert!(service.query(range).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_wraps_result() {
        let mut mock_repo = MockProductRepository::new();
        let existing = ProductOut::new(product_in("Desk"));
        let id = existing.id;
        mock_repo
            .expect_update()
            .withf(move |got, update| *got == id && update.quantity == Patch::Set(3))
            .returning(move |_, update| {
                let mut product = existing.clone();
                product.apply_update(update);
                Ok(product)
            });

        let service = ProductService::new(mock_repo);
        let updated = service
            .update(
                id,
                ProductUpdate {
                    quantity: Patch::Set(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .into_inner();

        assert_eq!(updated.quantity, 3);
        assert!(updated.status);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_update()
            .returning(|id, _| Err(ProductError::NotFound(id)));

        let service = ProductService::new(mock_repo);
        let result = service.update(Uuid::now_v7(), ProductUpdate::default()).await;

        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_product_is_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_delete().returning(|_| Ok(false));

        let service = ProductService::new(mock_repo);
        let result = service.delete(Uuid::now_v7()).await;

        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_existing_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_delete().times(1).returning(|_| Ok(true));

        let service = ProductService::new(mock_repo);
        assert!(service.delete(Uuid::now_v7()).await.is_ok());
    }
}
