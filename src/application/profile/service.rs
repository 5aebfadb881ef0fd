//! Profile use-cases: fetch own data, update fields, change password.

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, DomainResult, UpdateUserDto, User, UserRepositoryInterface};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

pub struct ProfileService {
    repo: Arc<dyn UserRepositoryInterface>,
    bcrypt_cost: u32,
}

impl ProfileService {
    pub fn new(repo: Arc<dyn UserRepositoryInterface>, bcrypt_cost: u32) -> Self {
        Self { repo, bcrypt_cost }
    }

    /// Fetch a user together with their role set.
    pub async fn get_profile(&self, id: i32) -> DomainResult<User> {
        let user = self
            .repo
            .get_user_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            })?;

        let roles = self.repo.get_roles(id).await?;

        Ok(User { roles, ..user })
    }

    /// Update profile fields (login, email, full name).
    pub async fn update_profile(&self, id: i32, dto: &UpdateUserDto) -> DomainResult<()> {
        self.repo.update_user(id, dto).await
    }

    /// Change a user's password. Verifies the current password first.
    pub async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let user = self
            .repo
            .get_user_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: user_id.to_string(),
            })?;

        let valid = verify_password(current_password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized(
                "invalid current password".to_string(),
            ));
        }

        let new_hash = hash_password(new_password, self.bcrypt_cost)
            .map_err(|e| DomainError::Storage(format!("failed to hash password: {e}")))?;

        self.repo.update_password(user_id, &new_hash).await?;

        info!(user_id, "password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::domain::user::mock::InMemoryUsers;
    use crate::domain::CreateUserDto;

    const COST: u32 = 4;

    async fn seeded_repo() -> Arc<InMemoryUsers> {
        let repo = Arc::new(InMemoryUsers::new());
        repo.create_user(&CreateUserDto {
            login: "root".to_string(),
            full_name: "root".to_string(),
            email: "root@root.com".to_string(),
            password_hash: hash_password("root1", COST).unwrap(),
            roles: HashSet::from(["applicant".to_string()]),
        })
        .await
        .unwrap();
        repo
    }

    #[tokio::test]
    async fn test_get_profile_includes_roles() {
        let repo = seeded_repo().await;
        let profile = ProfileService::new(repo, COST);

        let user = profile.get_profile(1).await.unwrap();
        assert_eq!(user.login, "root");
        assert!(user.roles.contains("applicant"));
    }

    #[tokio::test]
    async fn test_get_profile_unknown_user() {
        let profile = ProfileService::new(Arc::new(InMemoryUsers::new()), COST);

        let err = profile.get_profile(42).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_profile_changes_only_given_fields() {
        let repo = seeded_repo().await;
        let profile = ProfileService::new(Arc::clone(&repo) as Arc<dyn UserRepositoryInterface>, COST);

        profile
            .update_profile(
                1,
                &UpdateUserDto {
                    full_name: Some("Root Rootov".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let user = repo.get_user_by_id(1).await.unwrap().unwrap();
        assert_eq!(user.full_name, "Root Rootov");
        assert_eq!(user.login, "root");
        assert_eq!(user.email, "root@root.com");
    }

    #[tokio::test]
    async fn test_change_password_requires_current() {
        let repo = seeded_repo().await;
        let profile = ProfileService::new(Arc::clone(&repo) as Arc<dyn UserRepositoryInterface>, COST);

        let err = profile
            .change_password(1, "wrong", "newpass")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        profile.change_password(1, "root1", "newpass").await.unwrap();

        let user = repo.get_user_by_id(1).await.unwrap().unwrap();
        assert!(verify_password("newpass", &user.password_hash).unwrap());
        assert!(!verify_password("root1", &user.password_hash).unwrap());
    }
}
