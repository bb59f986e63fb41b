use std::sync::Arc;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CategoryDraft, CreateCategory, CreateProduct, NewCategory, NewProduct, Product,
    ProductDraft, Scope, UpdateCategory, UpdateProduct,
};
use crate::repository::{CategoryRepository, ProductRepository};
use crate::validation::{
    CATEGORY_FIELDS, MUST_EXIST, PRODUCT_FIELDS, TAKEN, ValidationReport,
};

/// Service layer for Category business logic
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> Clone for CategoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        self.repository.list_all().await
    }

    pub async fn get_category(&self, id: i64) -> CatalogResult<Category> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound)
    }

    pub async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        let draft = CategoryDraft::new(input);
        let category = self.validate(draft, None).await?;

        self.repository.create(category).await
    }

    /// Apply the supplied fields and re-validate the whole record.
    pub async fn update_category(&self, id: i64, input: UpdateCategory) -> CatalogResult<Category> {
        let current = self.get_category(id).await?;
        let draft = CategoryDraft::for_update(&current, input);
        let category = self.validate(draft, Some(id)).await?;

        self.repository
            .update(id, category)
            .await
            .map_err(|err| mutation_failed(err, "Failed to update category"))
    }

    /// Delete the category together with its products.
    ///
    /// Returns the number of products removed.
    pub async fn delete_category(&self, id: i64) -> CatalogResult<u64> {
        self.get_category(id).await?;

        match self.repository.delete_cascading(id).await {
            Ok(Some(removed)) => Ok(removed),
            Ok(None) => Err(CatalogError::MutationFailed(
                "Failed to delete category".to_string(),
            )),
            Err(err) => Err(mutation_failed(err, "Failed to delete category")),
        }
    }

    /// Field rules plus case-insensitive uniqueness (ignoring `exclude`).
    async fn validate(&self, draft: CategoryDraft, exclude: Option<i64>) -> CatalogResult<NewCategory> {
        let mut report = ValidationReport::from_result(CATEGORY_FIELDS, draft.validate());

        if !draft.name.trim().is_empty()
            && self
                .repository
                .find_by_name_case_insensitive(&draft.name, exclude)
                .await?
                .is_some()
        {
            report.add("name", TAKEN);
        }

        report.into_result()?;

        let status = draft
            .status()
            .ok_or_else(|| CatalogError::Internal(format!("unvalidated status {:?}", draft.status)))?;

        Ok(NewCategory {
            name: draft.name,
            status,
        })
    }
}

/// Service layer for Product business logic
pub struct ProductService<R: CategoryRepository + ProductRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository + ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: CategoryRepository + ProductRepository> ProductService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Resolve the category named by the path, if any.
    ///
    /// A scoped request whose category does not exist fails before any product logic.
    pub async fn resolve_scope(&self, scope: Scope) -> CatalogResult<Option<Category>> {
        match scope {
            Scope::Global => Ok(None),
            Scope::Category(id) => self
                .repository
                .find_by_id(id)
                .await?
                .map(Some)
                .ok_or(CatalogError::CategoryNotFound),
        }
    }

    pub async fn list_products(&self, scope: Scope) -> CatalogResult<Vec<Product>> {
        match self.resolve_scope(scope).await? {
            Some(category) => self.repository.list_by_category(category.id).await,
            None => self.repository.list_products().await,
        }
    }

    /// Look a product up globally, or only among the scope category's products.
    pub async fn get_product(&self, scope: Scope, id: i64) -> CatalogResult<Product> {
        let category = self.resolve_scope(scope).await?;
        self.find_in_scope(category.as_ref(), id).await
    }

    /// Create a product inside `category_id`.
    pub async fn create_product(&self, category_id: i64, input: CreateProduct) -> CatalogResult<Product> {
        let category = self
            .resolve_scope(Scope::Category(category_id))
            .await?
            .ok_or(CatalogError::CategoryNotFound)?;

        let draft = ProductDraft::new(category.id, input);
        let product = self.validate(draft).await?;

        self.repository.create_product(product).await
    }

    /// Apply the supplied fields, including a move to another category, and re-validate.
    pub async fn update_product(
        &self,
        scope: Scope,
        id: i64,
        input: UpdateProduct,
    ) -> CatalogResult<Product> {
        let category = self.resolve_scope(scope).await?;
        let current = self.find_in_scope(category.as_ref(), id).await?;

        let draft = ProductDraft::for_update(&current, input);
        let product = self.validate(draft).await?;

        self.repository
            .update_product(id, product)
            .await
            .map_err(|err| mutation_failed(err, "Failed to update product"))
    }

    pub async fn delete_product(&self, scope: Scope, id: i64) -> CatalogResult<()> {
        let category = self.resolve_scope(scope).await?;
        let product = self.find_in_scope(category.as_ref(), id).await?;

        match self.repository.delete_product(product.id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(CatalogError::MutationFailed(
                "Failed to delete product".to_string(),
            )),
            Err(err) => Err(mutation_failed(err, "Failed to delete product")),
        }
    }

    async fn find_in_scope(&self, category: Option<&Category>, id: i64) -> CatalogResult<Product> {
        self.repository
            .find_product(id)
            .await?
            .filter(|product| category.is_none_or(|c| c.id == product.category_id))
            .ok_or(CatalogError::ProductNotFound)
    }

    /// Field rules plus existence of the owning category.
    async fn validate(&self, draft: ProductDraft) -> CatalogResult<NewProduct> {
        let mut report = ValidationReport::from_result(PRODUCT_FIELDS, draft.validate());

        let category = match draft.category_id {
            Some(id) => self.repository.find_by_id(id).await?,
            None => None,
        };
        if category.is_none() {
            report.add("category", MUST_EXIST);
        }

        report.into_result()?;

        match (category, draft.price.decimal()) {
            (Some(category), Some(price)) => Ok(NewProduct {
                category_id: category.id,
                name: draft.name,
                description: draft.description,
                price,
            }),
            _ => Err(CatalogError::Internal("unvalidated product draft".to_string())),
        }
    }
}

/// Keep not-found and validation outcomes; anything else becomes `message`.
fn mutation_failed(err: CatalogError, message: &str) -> CatalogError {
    match err {
        CatalogError::CategoryNotFound
        | CatalogError::ProductNotFound
        | CatalogError::Validation(_) => err,
        other => {
            tracing::error!(error = %other, "{}", message);
            CatalogError::MutationFailed(message.to_string())
        }
    }
}
