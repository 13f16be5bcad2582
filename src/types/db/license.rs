use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "licenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,

    // Bound device fingerprint; null until first successful activation
    pub hwid: Option<String>,

    // Unix timestamp; null means the license never expires
    pub expires_at: Option<i64>,

    pub expired: bool,
    pub paused: bool,
    pub revoked: bool,

    // Display name of the creating principal ("admin" or reseller username)
    pub created_by: String,

    // Owning reseller, null for admin-created licenses
    pub user_id: Option<i32>,

    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
