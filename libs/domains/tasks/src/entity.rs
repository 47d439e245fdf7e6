use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

/// Sea-ORM Entity for the tasks table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: Uuid,
    pub name: String,
    pub deadline: DateTimeWithTimeZone,
    pub completed: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "domain_accounts::entity::Entity",
        from = "Column::OwnerId",
        to = "domain_accounts::entity::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
}

impl Related<domain_accounts::entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Task {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            name: model.name,
            deadline: model.deadline.into(),
            completed: model.completed,
            created_at: model.created_at.into(),
        }
    }
}

// The id is left to the sequence
impl From<crate::models::NewTask> for ActiveModel {
    fn from(task: crate::models::NewTask) -> Self {
        ActiveModel {
            id: NotSet,
            owner_id: Set(task.owner_id),
            name: Set(task.name),
            deadline: Set(task.deadline.into()),
            completed: Set(false),
            created_at: Set(Utc::now().into()),
        }
    }
}
