//! In-memory repository double for service, middleware and handler tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{CreateUserDto, UpdateUserDto, User, UserRepositoryInterface};
use crate::domain::{DomainError, DomainResult};

/// Behaves like the real store: assigns integer ids, enforces login/email
/// uniqueness via `Conflict`, keeps role links per user.
#[derive(Default)]
pub struct InMemoryUsers {
    inner: Mutex<Store>,
}

#[derive(Default)]
struct Store {
    users: Vec<User>,
    roles: HashMap<i32, HashSet<String>>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUsers {
    async fn create_user(&self, dto: &CreateUserDto) -> DomainResult<()> {
        let mut store = self.inner.lock().unwrap();

        if store
            .users
            .iter()
            .any(|u| u.login == dto.login || u.email == dto.email)
        {
            return Err(DomainError::Conflict(
                "login or email already exists".to_string(),
            ));
        }

        let id = store.users.len() as i32 + 1;
        let now = Utc::now();
        store.users.push(User {
            id,
            login: dto.login.clone(),
            full_name: dto.full_name.clone(),
            email: dto.email.clone(),
            password_hash: dto.password_hash.clone(),
            created_at: now,
            last_check: now,
            roles: HashSet::new(),
        });
        store.roles.insert(id, dto.roles.clone());

        Ok(())
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let store = self.inner.lock().unwrap();
        Ok(store.users.iter().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let store = self.inner.lock().unwrap();
        Ok(store.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_roles(&self, user_id: i32) -> DomainResult<HashSet<String>> {
        let store = self.inner.lock().unwrap();
        Ok(store.roles.get(&user_id).cloned().unwrap_or_default())
    }

    async fn set_roles(&self, user_id: i32, roles: &HashSet<String>) -> DomainResult<()> {
        let mut store = self.inner.lock().unwrap();
        store.roles.insert(user_id, roles.clone());
        Ok(())
    }

    async fn update_user(&self, id: i32, dto: &UpdateUserDto) -> DomainResult<()> {
        let mut store = self.inner.lock().unwrap();

        if let Some(login) = &dto.login {
            if store.users.iter().any(|u| u.id != id && &u.login == login) {
                return Err(DomainError::Conflict("login already exists".to_string()));
            }
        }
        if let Some(email) = &dto.email {
            if store.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(DomainError::Conflict("email already exists".to_string()));
            }
        }

        let user = store
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            })?;

        if let Some(login) = &dto.login {
            user.login = login.clone();
        }
        if let Some(email) = &dto.email {
            user.email = email.clone();
        }
        if let Some(full_name) = &dto.full_name {
            user.full_name = full_name.clone();
        }

        Ok(())
    }

    async fn update_password(&self, id: i32, new_password_hash: &str) -> DomainResult<()> {
        let mut store = self.inner.lock().unwrap();
        let user = store
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            })?;

        user.password_hash = new_password_hash.to_string();
        Ok(())
    }
}
