//! User service: registration, login and bearer tokens.

use std::{borrow::Cow, sync::LazyLock};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use campus_common::{AppError, AppResult, IdGenerator, config::AdminSeedConfig};
use campus_db::{
    entities::user::{self, UserRole},
    repositories::UserRepository,
};
use chrono::Utc;
use regex::Regex;
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::{Validate, ValidationError};

/// Ten digits, no separators.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[0-9]{10}$").unwrap()
});

pub(crate) fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone").with_message(Cow::Borrowed("Phone number must be 10 digits")))
    }
}

/// Input for self-service registration.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 100, message = "Name is required (max 100 chars)"))]
    pub name: String,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,

    #[validate(length(max = 32))]
    pub student_id: Option<String>,

    #[validate(length(max = 100))]
    pub department: Option<String>,

    #[validate(range(min = 1, max = 4, message = "Year must be between 1 and 4"))]
    pub year: Option<i32>,
}

/// Login credentials.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoginInput {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
    allow_registration: bool,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, allow_registration: bool) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
            allow_registration,
        }
    }

    /// Register a student account and issue its first token.
    pub async fn register(&self, input: RegisterInput) -> AppResult<user::Model> {
        if !self.allow_registration {
            return Err(AppError::Forbidden("Registration is closed".to_string()));
        }
        input.validate()?;

        let email = input.email.trim().to_lowercase();
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(email),
            password_hash: Set(password_hash),
            name: Set(input.name.trim().to_string()),
            role: Set(UserRole::Student),
            phone: Set(non_empty(input.phone)),
            student_id: Set(non_empty(input.student_id)),
            department: Set(non_empty(input.department)),
            year: Set(input.year),
            token: Set(Some(self.id_gen.generate_token())),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;
        info!(user_id = %user.id, "Student registered");
        Ok(user)
    }

    /// Check credentials. Returns the user, with a token guaranteed present.
    pub async fn login(&self, input: LoginInput) -> AppResult<user::Model> {
        input.validate()?;

        let user = self
            .user_repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        if user.token.is_some() {
            return Ok(user);
        }

        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(self.id_gen.generate_token()));
        active.updated_at = Set(Some(Utc::now()));
        self.user_repo.update(active).await
    }

    /// Invalidate the current token by rotating it.
    pub async fn logout(&self, user_id: &str) -> AppResult<()> {
        self.user_repo
            .set_token(user_id, Some(self.id_gen.generate_token()))
            .await?;
        info!(user_id = %user_id, "Token rotated on logout");
        Ok(())
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Authenticate a user by token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Create the configured admin account unless its email is taken.
    ///
    /// Returns the created account, or `None` when it already existed.
    pub async fn seed_admin(&self, seed: &AdminSeedConfig) -> AppResult<Option<user::Model>> {
        let email = seed.email.trim().to_lowercase();
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Ok(None);
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(email),
            password_hash: Set(hash_password(&seed.password)?),
            name: Set(seed.name.clone()),
            role: Set(UserRole::Admin),
            phone: Set(None),
            student_id: Set(None),
            department: Set(None),
            year: Set(None),
            token: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let admin = self.user_repo.create(model).await?;
        info!(user_id = %admin.id, email = %admin.email, "Admin account created");
        Ok(Some(admin))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Hash a password with a fresh salt.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, password: &str, token: Option<&str>) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: "student@campus.edu".to_string(),
            password_hash: hash_password(password).unwrap(),
            name: "Test Student".to_string(),
            role: UserRole::Student,
            phone: None,
            student_id: Some("CS2024001".to_string()),
            department: Some("Computer Science".to_string()),
            year: Some(2),
            token: token.map(ToString::to_string),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn register_input() -> RegisterInput {
        RegisterInput {
            name: "New Student".to_string(),
            email: "New@Campus.edu".to_string(),
            password: "secret123".to_string(),
            phone: Some("9876543210".to_string()),
            student_id: None,
            department: None,
            year: Some(1),
        }
    }

    fn service(db: MockDatabase, allow_registration: bool) -> UserService {
        UserService::new(
            UserRepository::new(Arc::new(db.into_connection())),
            allow_registration,
        )
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("test_password_123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("test_password_123", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("test", "invalid_hash").is_err());
    }

    #[test]
    fn test_register_input_rejects_short_phone() {
        let mut input = register_input();
        input.phone = Some("12345".to_string());
        assert!(input.validate().is_err());
    }

    #[tokio::test]
    async fn test_register_closed() {
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres), false);
        let result = svc.register(register_input()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let existing = create_test_user("user1", "secret123", None);
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[existing]]);

        let result = service(db, true).register(register_input()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_creates_student() {
        let mut created = create_test_user("user9", "secret123", Some("tok"));
        created.email = "new@campus.edu".to_string();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .append_query_results([[created]]);

        let user = service(db, true).register(register_input()).await.unwrap();
        assert_eq!(user.role, UserRole::Student);
        assert_eq!(user.email, "new@campus.edu");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = create_test_user("user1", "secret123", Some("tok"));
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[user]]);

        let result = service(db, true)
            .login(LoginInput {
                email: "student@campus.edu".to_string(),
                password: "nope".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_login_returns_existing_token() {
        let user = create_test_user("user1", "secret123", Some("tok"));
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[user]]);

        let logged_in = service(db, true)
            .login(LoginInput {
                email: "student@campus.edu".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.token.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_authenticate_by_unknown_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()]);

        let result = service(db, true).authenticate_by_token("bogus").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_seed_admin_skips_existing() {
        let existing = create_test_user("admin1", "secret123", None);
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[existing]]);

        let seed = AdminSeedConfig {
            email: "student@campus.edu".to_string(),
            password: "secret123".to_string(),
            name: "Administrator".to_string(),
        };
        assert!(service(db, true).seed_admin(&seed).await.unwrap().is_none());
    }
}
