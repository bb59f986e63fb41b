//! Sea-ORM entities for the `categories` and `products` tables

pub mod category {
    use crate::models::{Category, CategoryStatus};
    use sea_orm::entity::prelude::*;

    pub const TAG: &str = "Categories";

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "categories")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        #[sea_orm(column_type = "Text")]
        pub name: String,
        pub status: CategoryStatus,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::product::Entity")]
        Product,
    }

    impl Related<super::product::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Product.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for Category {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                name: model.name,
                status: model.status,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }
}

pub mod product {
    use crate::models::Product;
    use sea_orm::entity::prelude::*;

    pub const TAG: &str = "Products";

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "products")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        #[sea_orm(column_type = "Text")]
        pub name: String,
        #[sea_orm(column_type = "Text")]
        pub description: String,
        #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
        pub price: Decimal,
        pub category_id: i64,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::category::Entity",
            from = "Column::CategoryId",
            to = "super::category::Column::Id",
            on_delete = "Cascade"
        )]
        Category,
    }

    impl Related<super::category::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Category.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for Product {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                name: model.name,
                description: model.description,
                price: model.price,
                category_id: model.category_id,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }
}
