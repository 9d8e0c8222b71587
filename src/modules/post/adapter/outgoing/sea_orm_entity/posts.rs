use sea_orm::entity::prelude::*;
use uuid::Uuid;

/// Single-table store for every post kind; `dtype` tells them apart.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub dtype: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub hit_count: i64,
    pub like_count: i64,
    pub image_ids: Json,
    #[sea_orm(nullable)]
    pub question_status: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
