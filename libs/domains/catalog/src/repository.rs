use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Category, NewCategory, NewProduct, Product};
use crate::validation::{MUST_EXIST, TAKEN};

/// Repository trait for Category persistence
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Category>>;

    /// Case-insensitive name lookup, optionally ignoring one category (the one being updated)
    async fn find_by_name_case_insensitive(
        &self,
        name: &str,
        exclude: Option<i64>,
    ) -> CatalogResult<Option<Category>>;

    /// All categories, ascending id
    async fn list_all(&self) -> CatalogResult<Vec<Category>>;

    async fn create(&self, input: NewCategory) -> CatalogResult<Category>;

    async fn update(&self, id: i64, input: NewCategory) -> CatalogResult<Category>;

    /// Delete the category and all of its products atomically.
    ///
    /// Returns the number of products removed, or `None` when no category was deleted.
    async fn delete_cascading(&self, id: i64) -> CatalogResult<Option<u64>>;
}

/// Repository trait for Product persistence
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_product(&self, id: i64) -> CatalogResult<Option<Product>>;

    /// All products, ascending id
    async fn list_products(&self) -> CatalogResult<Vec<Product>>;

    /// Products of one category, ascending id
    async fn list_by_category(&self, category_id: i64) -> CatalogResult<Vec<Product>>;

    async fn create_product(&self, input: NewProduct) -> CatalogResult<Product>;

    async fn update_product(&self, id: i64, input: NewProduct) -> CatalogResult<Product>;

    /// Returns whether a row was deleted
    async fn delete_product(&self, id: i64) -> CatalogResult<bool>;
}

#[derive(Debug, Default)]
struct CatalogState {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
    next_category_id: i64,
    next_product_id: i64,
}

impl CatalogState {
    fn name_taken(&self, name: &str, exclude: Option<i64>) -> bool {
        let name = name.to_lowercase();
        self.categories
            .values()
            .any(|c| Some(c.id) != exclude && c.name.to_lowercase() == name)
    }
}

/// In-memory implementation of both repositories (for development/testing).
///
/// Enforces the same constraints as the Postgres schema: unique lower-cased category
/// names, existing owner for every product, cascade on category delete.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogRepository {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalogRepository {
    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Category>> {
        Ok(self.state.read().await.categories.get(&id).cloned())
    }

    async fn find_by_name_case_insensitive(
        &self,
        name: &str,
        exclude: Option<i64>,
    ) -> CatalogResult<Option<Category>> {
        let name = name.to_lowercase();
        let state = self.state.read().await;
        Ok(state
            .categories
            .values()
            .find(|c| Some(c.id) != exclude && c.name.to_lowercase() == name)
            .cloned())
    }

    async fn list_all(&self) -> CatalogResult<Vec<Category>> {
        Ok(self.state.read().await.categories.values().cloned().collect())
    }

    async fn create(&self, input: NewCategory) -> CatalogResult<Category> {
        let mut state = self.state.write().await;

        if state.name_taken(&input.name, None) {
            return Err(CatalogError::validation(format!("Name {TAKEN}")));
        }

        state.next_category_id += 1;
        let category = Category::new(state.next_category_id, input);
        state.categories.insert(category.id, category.clone());

        tracing::info!(category_id = category.id, "Created category");
        Ok(category)
    }

    async fn update(&self, id: i64, input: NewCategory) -> CatalogResult<Category> {
        let mut state = self.state.write().await;

        if state.name_taken(&input.name, Some(id)) {
            return Err(CatalogError::validation(format!("Name {TAKEN}")));
        }

        let category = state
            .categories
            .get_mut(&id)
            .ok_or(CatalogError::CategoryNotFound)?;
        category.apply_update(input);

        tracing::info!(category_id = id, "Updated category");
        Ok(category.clone())
    }

    async fn delete_cascading(&self, id: i64) -> CatalogResult<Option<u64>> {
        let mut state = self.state.write().await;

        if state.categories.remove(&id).is_none() {
            return Ok(None);
        }

        let before = state.products.len();
        state.products.retain(|_, p| p.category_id != id);
        let removed = (before - state.products.len()) as u64;

        tracing::info!(category_id = id, products_removed = removed, "Deleted category");
        Ok(Some(removed))
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalogRepository {
    async fn find_product(&self, id: i64) -> CatalogResult<Option<Product>> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn list_products(&self) -> CatalogResult<Vec<Product>> {
        Ok(self.state.read().await.products.values().cloned().collect())
    }

    async fn list_by_category(&self, category_id: i64) -> CatalogResult<Vec<Product>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .values()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn create_product(&self, input: NewProduct) -> CatalogResult<Product> {
        let mut state = self.state.write().await;

        if !state.categories.contains_key(&input.category_id) {
            return Err(CatalogError::validation(format!("Category {MUST_EXIST}")));
        }

        state.next_product_id += 1;
        let product = Product::new(state.next_product_id, input);
        state.products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, category_id = product.category_id, "Created product");
        Ok(product)
    }

    async fn update_product(&self, id: i64, input: NewProduct) -> CatalogResult<Product> {
        let mut state = self.state.write().await;

        if !state.categories.contains_key(&input.category_id) {
            return Err(CatalogError::validation(format!("Category {MUST_EXIST}")));
        }

        let product = state
            .products
            .get_mut(&id)
            .ok_or(CatalogError::ProductNotFound)?;
        product.apply_update(input);

        tracing::info!(product_id = id, "Updated product");
        Ok(product.clone())
    }

    async fn delete_product(&self, id: i64) -> CatalogResult<bool> {
        let deleted = self.state.write().await.products.remove(&id).is_some();
        if deleted {
            tracing::info!(product_id = id, "Deleted product");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use mockall::mock;

    mock! {
        pub CatalogRepository {}

        #[async_trait]
        impl CategoryRepository for CatalogRepository {
            async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Category>>;
            async fn find_by_name_case_insensitive(
                &self,
                name: &str,
                exclude: Option<i64>,
            ) -> CatalogResult<Option<Category>>;
            async fn list_all(&self) -> CatalogResult<Vec<Category>>;
            async fn create(&self, input: NewCategory) -> CatalogResult<Category>;
            async fn update(&self, id: i64, input: NewCategory) -> CatalogResult<Category>;
            async fn delete_cascading(&self, id: i64) -> CatalogResult<Option<u64>>;
        }

        #[async_trait]
        impl ProductRepository for CatalogRepository {
            async fn find_product(&self, id: i64) -> CatalogResult<Option<Product>>;
            async fn list_products(&self) -> CatalogResult<Vec<Product>>;
            async fn list_by_category(&self, category_id: i64) -> CatalogResult<Vec<Product>>;
            async fn create_product(&self, input: NewProduct) -> CatalogResult<Product>;
            async fn update_product(&self, id: i64, input: NewProduct) -> CatalogResult<Product>;
            async fn delete_product(&self, id: i64) -> CatalogResult<bool>;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryStatus;
    use rust_decimal::Decimal;

    fn new_category(name: &str) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            status: CategoryStatus::Active,
        }
    }

    fn new_product(category_id: i64, name: &str) -> NewProduct {
        NewProduct {
            category_id,
            name: name.to_string(),
            description: "Test piece".to_string(),
            price: Decimal::new(150000, 2),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_category() {
        let repo = InMemoryCatalogRepository::new();

        let created = repo.create(new_category("Rings")).await.unwrap();
        let found = repo.find_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(found, created);
        assert_eq!(found.status, CategoryStatus::Active);
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_listing_is_ordered() {
        let repo = InMemoryCatalogRepository::new();
        for name in ["Necklaces", "Rings", "Earrings"] {
            repo.create(new_category(name)).await.unwrap();
        }

        let ids: Vec<i64> = repo.list_all().await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected_case_insensitively() {
        let repo = InMemoryCatalogRepository::new();
        repo.create(new_category("Rings")).await.unwrap();

        let err = repo.create(new_category("rINGS")).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(ref m) if m == &vec!["Name has already been taken".to_string()]));
    }

    #[tokio::test]
    async fn test_find_by_name_excludes_given_id() {
        let repo = InMemoryCatalogRepository::new();
        let rings = repo.create(new_category("Rings")).await.unwrap();

        assert!(repo.find_by_name_case_insensitive("RINGS", None).await.unwrap().is_some());
        assert!(
            repo.find_by_name_case_insensitive("RINGS", Some(rings.id))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_update_can_change_case_of_own_name() {
        let repo = InMemoryCatalogRepository::new();
        let rings = repo.create(new_category("Rings")).await.unwrap();

        let updated = repo.update(rings.id, new_category("RINGS")).await.unwrap();
        assert_eq!(updated.name, "RINGS");
        assert!(updated.updated_at >= rings.updated_at);
    }

    #[tokio::test]
    async fn test_delete_cascading_removes_only_owned_products() {
        let repo = InMemoryCatalogRepository::new();
        let rings = repo.create(new_category("Rings")).await.unwrap();
        let bracelets = repo.create(new_category("Bracelets")).await.unwrap();

        repo.create_product(new_product(rings.id, "Engagement Ring")).await.unwrap();
        repo.create_product(new_product(rings.id, "Gold Band Ring")).await.unwrap();
        let cuff = repo
            .create_product(new_product(bracelets.id, "Gold Cuff Bracelet"))
            .await
            .unwrap();

        assert_eq!(repo.delete_cascading(rings.id).await.unwrap(), Some(2));
        assert!(repo.find_by_id(rings.id).await.unwrap().is_none());
        assert_eq!(repo.list_products().await.unwrap(), vec![cuff]);
    }

    #[tokio::test]
    async fn test_delete_cascading_missing_category() {
        let repo = InMemoryCatalogRepository::new();
        assert_eq!(repo.delete_cascading(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_product_requires_existing_category() {
        let repo = InMemoryCatalogRepository::new();

        let err = repo.create_product(new_product(9, "Orphan")).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(ref m) if m[0] == "Category must exist"));
    }

    #[tokio::test]
    async fn test_list_by_category_filters() {
        let repo = InMemoryCatalogRepository::new();
        let rings = repo.create(new_category("Rings")).await.unwrap();
        let earrings = repo.create(new_category("Earrings")).await.unwrap();

        repo.create_product(new_product(rings.id, "Wedding Ring Set")).await.unwrap();
        repo.create_product(new_product(earrings.id, "Pearl Drop Earrings")).await.unwrap();

        let products = repo.list_by_category(earrings.id).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Pearl Drop Earrings");
    }

    #[tokio::test]
    async fn test_delete_product_leaves_category() {
        let repo = InMemoryCatalogRepository::new();
        let rings = repo.create(new_category("Rings")).await.unwrap();
        let ring = repo.create_product(new_product(rings.id, "Engagement Ring")).await.unwrap();

        assert!(repo.delete_product(ring.id).await.unwrap());
        assert!(!repo.delete_product(ring.id).await.unwrap());
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }
}
