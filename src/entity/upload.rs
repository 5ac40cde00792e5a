//! Upload entity for SeaORM.
//!
//! One row per accepted spreadsheet. Rows are written once and never updated.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "uploads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Exact bytes of the submitted file
    pub file_blob: Vec<u8>,
    /// Parsed rows, an array of header -> value objects
    pub json_object: Json,
    pub uploaded_by: String,
    pub file_name: Option<String>,
    pub time_stamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
