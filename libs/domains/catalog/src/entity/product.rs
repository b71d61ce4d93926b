use sea_orm::{Set, entity::prelude::*};

use crate::models::Product;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub price: Decimal,
    pub description: String,
    pub category_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
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

impl Model {
    pub const TAG: &'static str = "products";

    /// Domain product, with the category attached when it was loaded alongside.
    pub fn into_product(self, category: Option<super::category::Model>) -> Product {
        Product {
            id: self.id,
            name: self.name,
            price: self.price,
            description: self.description,
            category_id: self.category_id,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
            category: category.map(Into::into),
        }
    }
}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        model.into_product(None)
    }
}

impl From<&Product> for ActiveModel {
    fn from(product: &Product) -> Self {
        ActiveModel {
            id: Set(product.id),
            name: Set(product.name.clone()),
            price: Set(product.price),
            description: Set(product.description.clone()),
            category_id: Set(product.category_id),
            created_at: Set(product.created_at.into()),
            updated_at: Set(product.updated_at.into()),
        }
    }
}
