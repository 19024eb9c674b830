//! SQLite-backed identity store.
//!
//! The refresh-token list is stored as a JSON array next to the rest of the
//! record so that a session change is a single-row conditional UPDATE:
//!
//! ```sql
//! UPDATE kg_identities SET ..., version = version + 1
//! WHERE id = ? AND version = ?
//! ```
//!
//! Zero affected rows means either the identity is gone or someone else
//! committed first; a follow-up read tells the two apart.

use crate::{DbError, Result as DbErrorResult};

use kg_core::{
    ActiveSessions, AuthProvider, Identity, IdentityStore, Role, StoreError, StoreResult,
    normalize_email,
};

use std::panic::Location;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, email, password_hash, auth_provider, federated_provider_id,
        role, phone, picture_url, email_verified, active_refresh_tokens, version,
        created_at, updated_at
    FROM kg_identities
"#;

pub struct SqliteIdentityStore {
    pool: SqlitePool,
}

impl SqliteIdentityStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: Uuid) -> DbErrorResult<Option<Identity>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn fetch_by_email(&self, email: &str) -> DbErrorResult<Option<Identity>> {
        let row = sqlx::query(&format!("{} WHERE email = ? COLLATE NOCASE", SELECT_COLUMNS))
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn insert_row(&self, identity: &Identity) -> DbErrorResult<()> {
        let tokens = Self::encode_tokens(&identity.active_refresh_tokens)?;

        sqlx::query(
            r#"
                INSERT INTO kg_identities (
                    id, name, email, password_hash, auth_provider, federated_provider_id,
                    role, phone, picture_url, email_verified, active_refresh_tokens, version,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(identity.id.to_string())
        .bind(&identity.name)
        .bind(normalize_email(&identity.email))
        .bind(&identity.password_hash)
        .bind(identity.auth_provider.as_str())
        .bind(&identity.federated_provider_id)
        .bind(identity.role.as_str())
        .bind(&identity.phone)
        .bind(&identity.picture_url)
        .bind(identity.email_verified)
        .bind(tokens)
        .bind(identity.version)
        .bind(identity.created_at.timestamp())
        .bind(identity.updated_at.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns the number of rows updated (0 or 1)
    async fn update_if_version(&self, identity: &Identity) -> DbErrorResult<u64> {
        let tokens = Self::encode_tokens(&identity.active_refresh_tokens)?;

        let result = sqlx::query(
            r#"
                UPDATE kg_identities
                SET name = ?, email = ?, password_hash = ?, auth_provider = ?,
                    federated_provider_id = ?, role = ?, phone = ?, picture_url = ?,
                    email_verified = ?, active_refresh_tokens = ?,
                    version = version + 1, updated_at = ?
                WHERE id = ? AND version = ?
            "#,
        )
        .bind(&identity.name)
        .bind(normalize_email(&identity.email))
        .bind(&identity.password_hash)
        .bind(identity.auth_provider.as_str())
        .bind(&identity.federated_provider_id)
        .bind(identity.role.as_str())
        .bind(&identity.phone)
        .bind(&identity.picture_url)
        .bind(identity.email_verified)
        .bind(tokens)
        .bind(identity.updated_at.timestamp())
        .bind(identity.id.to_string())
        .bind(identity.version)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    fn encode_tokens(tokens: &ActiveSessions) -> DbErrorResult<String> {
        serde_json::to_string(tokens).map_err(|e| DbError::Initialization {
            message: format!("Failed to encode active_refresh_tokens: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    fn map_row(row: &SqliteRow) -> DbErrorResult<Identity> {
        let id: String = row.try_get("id")?;
        let auth_provider: String = row.try_get("auth_provider")?;
        let role: String = row.try_get("role")?;
        let tokens: String = row.try_get("active_refresh_tokens")?;
        let version: i64 = row.try_get("version")?;
        let created_at: i64 = row.try_get("created_at")?;
        let updated_at: i64 = row.try_get("updated_at")?;

        Ok(Identity {
            id: Uuid::parse_str(&id)
                .map_err(|e| DbError::decode("id", format!("invalid UUID: {}", e)))?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            auth_provider: AuthProvider::from_str(&auth_provider)
                .map_err(|e| DbError::decode("auth_provider", e.to_string()))?,
            federated_provider_id: row.try_get("federated_provider_id")?,
            role: Role::from_str(&role).map_err(|e| DbError::decode("role", e.to_string()))?,
            phone: row.try_get("phone")?,
            picture_url: row.try_get("picture_url")?,
            email_verified: row.try_get("email_verified")?,
            active_refresh_tokens: serde_json::from_str(&tokens)
                .map_err(|e| DbError::decode("active_refresh_tokens", e.to_string()))?,
            version: i32::try_from(version)
                .map_err(|_| DbError::decode("version", "out of range"))?,
            created_at: Self::timestamp("created_at", created_at)?,
            updated_at: Self::timestamp("updated_at", updated_at)?,
        })
    }

    fn timestamp(column: &'static str, secs: i64) -> DbErrorResult<DateTime<Utc>> {
        DateTime::from_timestamp(secs, 0).ok_or_else(|| DbError::decode(column, "invalid timestamp"))
    }
}

#[async_trait]
impl IdentityStore for SqliteIdentityStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Identity>> {
        Ok(self.fetch_by_id(id).await?)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Identity>> {
        Ok(self.fetch_by_email(email).await?)
    }

    async fn insert(&self, identity: &Identity) -> StoreResult<Identity> {
        match self.insert_row(identity).await {
            Ok(()) => {
                let mut stored = identity.clone();
                stored.email = normalize_email(&identity.email);
                Ok(stored)
            }
            Err(DbError::UniqueViolation { .. }) => Err(StoreError::DuplicateEmail {
                email: normalize_email(&identity.email),
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, identity: &Identity) -> StoreResult<Identity> {
        let updated = match self.update_if_version(identity).await {
            Ok(updated) => updated,
            Err(DbError::UniqueViolation { .. }) => {
                return Err(StoreError::DuplicateEmail {
                    email: normalize_email(&identity.email),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            Err(e) => return Err(e.into()),
        };

        if updated == 0 {
            return match self.fetch_by_id(identity.id).await? {
                None => Err(StoreError::NotFound {
                    id: identity.id,
                    location: ErrorLocation::from(Location::caller()),
                }),
                Some(_) => Err(StoreError::Conflict {
                    id: identity.id,
                    expected_version: identity.version,
                    location: ErrorLocation::from(Location::caller()),
                }),
            };
        }

        let mut stored = identity.clone();
        stored.email = normalize_email(&identity.email);
        stored.version = identity.version + 1;
        Ok(stored)
    }
}
