use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

use crate::{
    entity::{category, product},
    error::{CatalogError, CatalogResult},
    models::{Category, NewCategory, NewProduct, Product},
    repository::{CategoryRepository, ProductRepository},
};

/// Postgres-backed catalogue store
#[derive(Clone)]
pub struct PgCatalogRepository {
    db: DatabaseConnection,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PgCatalogRepository {
    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Category>> {
        let model = category::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_name_case_insensitive(
        &self,
        name: &str,
        exclude: Option<i64>,
    ) -> CatalogResult<Option<Category>> {
        let mut query = category::Entity::find()
            .filter(Expr::cust_with_values("LOWER(name) = $1", [name.to_lowercase()]));

        if let Some(id) = exclude {
            query = query.filter(category::Column::Id.ne(id));
        }

        let model = query.one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list_all(&self) -> CatalogResult<Vec<Category>> {
        let models = category::Entity::find()
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn create(&self, input: NewCategory) -> CatalogResult<Category> {
        let now = Utc::now();
        let active_model = category::ActiveModel {
            name: Set(input.name),
            status: Set(input.status),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;

        tracing::info!(category_id = model.id, "Created category");
        Ok(model.into())
    }

    async fn update(&self, id: i64, input: NewCategory) -> CatalogResult<Category> {
        let model = category::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::CategoryNotFound)?;

        let mut active_model: category::ActiveModel = model.into();
        active_model.name = Set(input.name);
        active_model.status = Set(input.status);
        active_model.updated_at = Set(Utc::now().into());

        let model = active_model.update(&self.db).await?;

        tracing::info!(category_id = id, "Updated category");
        Ok(model.into())
    }

    async fn delete_cascading(&self, id: i64) -> CatalogResult<Option<u64>> {
        let txn = self.db.begin().await?;

        let products = product::Entity::delete_many()
            .filter(product::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?;

        let deleted = category::Entity::delete_by_id(id).exec(&txn).await?;

        if deleted.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        txn.commit().await?;

        tracing::info!(
            category_id = id,
            products_removed = products.rows_affected,
            "Deleted category"
        );
        Ok(Some(products.rows_affected))
    }
}

#[async_trait]
impl ProductRepository for PgCatalogRepository {
    async fn find_product(&self, id: i64) -> CatalogResult<Option<Product>> {
        let model = product::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list_products(&self) -> CatalogResult<Vec<Product>> {
        let models = product::Entity::find()
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_by_category(&self, category_id: i64) -> CatalogResult<Vec<Product>> {
        let models = product::Entity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn create_product(&self, input: NewProduct) -> CatalogResult<Product> {
        let now = Utc::now();
        let active_model = product::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            category_id: Set(input.category_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;

        tracing::info!(product_id = model.id, category_id = model.category_id, "Created product");
        Ok(model.into())
    }

    async fn update_product(&self, id: i64, input: NewProduct) -> CatalogResult<Product> {
        let model = product::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;

        let mut active_model: product::ActiveModel = model.into();
        active_model.name = Set(input.name);
        active_model.description = Set(input.description);
        active_model.price = Set(input.price);
        active_model.category_id = Set(input.category_id);
        active_model.updated_at = Set(Utc::now().into());

        let model = active_model.update(&self.db).await?;

        tracing::info!(product_id = id, "Updated product");
        Ok(model.into())
    }

    async fn delete_product(&self, id: i64) -> CatalogResult<bool> {
        let result = product::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "Deleted product");
        }
        Ok(result.rows_affected > 0)
    }
}
