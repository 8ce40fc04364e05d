//! Book database entity.

use sea_orm::entity::prelude::*;

use crate::domain::Book;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub title: String,
    pub author: String,
    #[sea_orm(unique)]
    pub isbn: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    /// Soft delete flag; read paths filter on it
    pub is_deleted: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book_category::Entity")]
    BookCategories,
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItems,
}

impl Related<super::book_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain entity with its category membership attached.
    pub fn into_domain(self, category_ids: Vec<Uuid>) -> Book {
        Book {
            id: self.id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            price: self.price,
            description: self.description,
            cover_image: self.cover_image,
            category_ids,
        }
    }
}
