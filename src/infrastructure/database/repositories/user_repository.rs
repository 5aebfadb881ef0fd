use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    QueryFilter, QuerySelect, RelationTrait, Set, SqlErr, TransactionTrait,
};

use crate::domain::{CreateUserDto, DomainError, DomainResult, UpdateUserDto, User, UserRepositoryInterface};
use crate::infrastructure::database::entities::{role, user, user_role};

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        login: model.login,
        full_name: model.full_name,
        email: model.email,
        password_hash: model.password_hash,
        created_at: model.created_at,
        last_check: model.last_check,
        roles: HashSet::new(),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

fn conflict_or_db_err(e: sea_orm::DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::Conflict("login or email already exists".to_string())
        }
        _ => db_err(e),
    }
}

/// Replace-insert the role links for a user. Role rows must already exist.
async fn link_roles<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    roles: &HashSet<String>,
) -> DomainResult<()> {
    for name in roles {
        let role = role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(conn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::Validation(format!("unknown role: {name}")))?;

        user_role::Entity::insert(user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role.id),
        })
        .exec_without_returning(conn)
        .await
        .map_err(db_err)?;
    }

    Ok(())
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn create_user(&self, dto: &CreateUserDto) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let now = Utc::now();
        let new_user = user::ActiveModel {
            login: Set(dto.login.clone()),
            full_name: Set(dto.full_name.clone()),
            email: Set(dto.email.clone()),
            password_hash: Set(dto.password_hash.clone()),
            created_at: Set(now),
            last_check: Set(now),
            ..Default::default()
        };

        let inserted = new_user.insert(&txn).await.map_err(conflict_or_db_err)?;

        link_roles(&txn, inserted.id, &dto.roles).await?;

        txn.commit().await.map_err(db_err)
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_roles(&self, user_id: i32) -> DomainResult<HashSet<String>> {
        let models = role::Entity::find()
            .join(JoinType::InnerJoin, role::Relation::UserRoles.def())
            .filter(user_role::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(|r| r.name).collect())
    }

    async fn set_roles(&self, user_id: i32, roles: &HashSet<String>) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        link_roles(&txn, user_id, roles).await?;

        txn.commit().await.map_err(db_err)
    }

    async fn update_user(&self, id: i32, dto: &UpdateUserDto) -> DomainResult<()> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            });
        };

        let mut active: user::ActiveModel = existing.into();

        if let Some(login) = &dto.login {
            active.login = Set(login.clone());
        }
        if let Some(email) = &dto.email {
            active.email = Set(email.clone());
        }
        if let Some(full_name) = &dto.full_name {
            active.full_name = Set(full_name.clone());
        }

        active.update(&self.db).await.map_err(conflict_or_db_err)?;

        Ok(())
    }

    async fn update_password(&self, id: i32, new_password_hash: &str) -> DomainResult<()> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            });
        };

        let mut active: user::ActiveModel = existing.into();
        active.password_hash = Set(new_password_hash.to_string());
        active.update(&self.db).await.map_err(db_err)?;

        Ok(())
    }
}
