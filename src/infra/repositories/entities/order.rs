//! Order database entity.

use sea_orm::entity::prelude::*;

use crate::domain::{Order, OrderItem, OrderStatus};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub shipping_address: String,
    pub total: Decimal,
    pub status: String,
    pub order_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain entity with its items attached.
    pub fn into_domain(self, items: Vec<OrderItem>) -> AppResult<Order> {
        let status = OrderStatus::parse(&self.status)
            .map_err(|_| AppError::internal(format!("Unrecognized stored order status: {}", self.status)))?;
        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            shipping_address: self.shipping_address,
            total: self.total,
            status,
            order_date: self.order_date,
            items,
        })
    }
}
