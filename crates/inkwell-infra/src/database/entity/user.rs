//! User entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use inkwell_core::domain::{NewUser, PasswordHash, Role, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub image_file: String,
    pub about_me: Option<String>,
    pub last_seen: DateTimeWithTimeZone,
    pub role: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain User.
impl From<Model> for User {
    fn from(model: Model) -> Self {
        let role = model.role.parse().unwrap_or_else(|_| {
            // Least privilege for rows written outside the application.
            tracing::warn!(user_id = model.id, role = %model.role, "Unknown role, treating as user");
            Role::User
        });

        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            password_hash: PasswordHash::from_encoded(model.password_hash),
            image_file: model.image_file,
            about_me: model.about_me,
            last_seen: model.last_seen.into(),
            role,
        }
    }
}

/// Conversion from Domain User to SeaORM ActiveModel.
impl From<User> for ActiveModel {
    fn from(user: User) -> Self {
        Self {
            id: Set(user.id),
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash.encoded().to_string()),
            image_file: Set(user.image_file),
            about_me: Set(user.about_me),
            last_seen: Set(user.last_seen.into()),
            role: Set(user.role.as_str().to_string()),
        }
    }
}

impl From<NewUser> for ActiveModel {
    fn from(user: NewUser) -> Self {
        Self {
            id: NotSet,
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash.encoded().to_string()),
            image_file: Set(user.image_file),
            about_me: Set(user.about_me),
            last_seen: Set(user.last_seen.into()),
            role: Set(user.role.as_str().to_string()),
        }
    }
}
