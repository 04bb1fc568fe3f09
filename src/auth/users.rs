/**
 * User Model and Database Operations
 *
 * This module handles user data and database operations.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User struct representing a user in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: uuid::Uuid,
    /// Display name
    pub name: String,
    /// User email address (unique)
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    /// Avatar image URL (optional)
    pub image: Option<String>,
    /// Storage reference for the avatar image (optional)
    pub image_ref: Option<String>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user, safe to embed in channel documents and responses
///
/// Does not include the password hash or other sensitive information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Profile {
    /// User's unique ID (UUID)
    pub id: uuid::Uuid,
    /// Display name
    pub name: String,
    /// User email address
    pub email: String,
    /// Avatar image URL (optional)
    pub image: Option<String>,
    /// Storage reference for the avatar image (optional)
    pub image_ref: Option<String>,
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        Profile {
            id: user.id,
            name: user.name,
            email: user.email,
            image: user.image,
            image_ref: user.image_ref,
        }
    }
}

/// Create a new user
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `name` - Display name
/// * `email` - User email
/// * `password_hash` - Hashed password
///
/// # Returns
/// Created user or error
pub async fn create_user(
    pool: &PgPool,
    name: String,
    email: String,
    password_hash: String,
) -> Result<User, sqlx::Error> {
    let id = uuid::Uuid::new_v4();
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, name, email, password_hash, image, image_ref, created_at, updated_at
        "#
    )
    .bind(id)
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get user by email
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `email` - User email
///
/// # Returns
/// User or None if not found
pub async fn get_user_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password_hash, image, image_ref, created_at, updated_at
        FROM users
        WHERE email = $1
        "#
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get user by ID
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `id` - User ID
///
/// # Returns
/// User or None if not found
pub async fn get_user_by_id(
    pool: &PgPool,
    id: uuid::Uuid,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password_hash, image, image_ref, created_at, updated_at
        FROM users
        WHERE id = $1
        "#
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// List all user profiles
///
/// # Arguments
/// * `pool` - Database connection pool
///
/// # Returns
/// Profiles of every registered user
pub async fn list_users(pool: &PgPool) -> Result<Vec<Profile>, sqlx::Error> {
    let profiles = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, name, email, image, image_ref
        FROM users
        ORDER BY created_at
        "#
    )
    .fetch_all(pool)
    .await?;

    Ok(profiles)
}

/// Fields accepted by a partial user update
///
/// `None` fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    /// New display name
    pub name: Option<String>,
    /// New email address
    pub email: Option<String>,
    /// New avatar image URL
    pub image: Option<String>,
    /// New avatar storage reference
    pub image_ref: Option<String>,
}

/// Update a user's profile fields
///
/// Only the fields present in `data` are written; absent fields keep their
/// stored value.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `user_id` - User ID
/// * `data` - Fields to update
///
/// # Returns
/// Updated user or error
pub async fn update_user(
    pool: &PgPool,
    user_id: uuid::Uuid,
    data: UpdateUser,
) -> Result<User, sqlx::Error> {
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = COALESCE($1, name),
            email = COALESCE($2, email),
            image = COALESCE($3, image),
            image_ref = COALESCE($4, image_ref),
            updated_at = $5
        WHERE id = $6
        RETURNING id, name, email, password_hash, image, image_ref, created_at, updated_at
        "#
    )
    .bind(data.name)
    .bind(data.email)
    .bind(data.image)
    .bind(data.image_ref)
    .bind(now)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Delete a user
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `user_id` - User ID
///
/// # Returns
/// Error if the user does not exist
pub async fn delete_user(pool: &PgPool, user_id: uuid::Uuid) -> Result<(), sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = $1
        "#
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(sqlx::Error::RowNotFound);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_user_drops_password_hash() {
        let user = User {
            id: uuid::Uuid::new_v4(),
            name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            image: Some("https://cdn.example.com/a.png".to_string()),
            image_ref: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let profile = Profile::from(user.clone());
        assert_eq!(profile.id, user.id);
        assert_eq!(profile.name, user.name);

        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("secret"));
    }
}
