use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog row: one notifiable event and its default channel flags.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique, column_type = "String(StringLen::N(64))")]
    pub event: String,
    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub category: String,
    pub none_enabled: bool,
    pub in_app_enabled: bool,
    pub email_enabled: bool,
    #[sea_orm(column_type = "Text")]
    pub event_description: String,
    #[sea_orm(column_type = "Text")]
    pub category_description: String,
    pub display_order: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
