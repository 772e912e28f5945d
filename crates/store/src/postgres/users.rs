use async_trait::async_trait;
use chrono::{DateTime, Utc};

use blush_core::{Email, UserId, UserProfile, UserRole};

use super::PgStore;
use crate::{NewUser, ProfileChanges, StoreError, UserStore};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    email: Email,
    display_name: Option<String>,
    role: UserRole,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserProfile {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            email: r.email,
            display_name: r.display_name,
            role: r.role,
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: Option<String>,
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<UserProfile, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO shop.user (email, display_name, role)
            VALUES ($1, $2, $3)
            RETURNING id, email, display_name, role, created_at
            ",
        )
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(user.role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StoreError::from_insert(e, "email"))?;

        sqlx::query(
            r"
            INSERT INTO shop.user_password (user_id, password_hash)
            VALUES ($1, $2)
            ",
        )
        .bind(row.id)
        .bind(&user.password_hash)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserProfile>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, email, display_name, role, created_at
            FROM shop.user
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(UserProfile, String)>, StoreError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r"
            SELECT u.id, u.email, u.display_name, u.role, u.created_at,
                   p.password_hash
            FROM shop.user u
            LEFT JOIN shop.user_password p ON u.id = p.user_id
            WHERE u.email = $1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let hash = row.password_hash.ok_or_else(|| {
            StoreError::DataCorruption(format!("user {} has no password", row.user.id))
        })?;

        Ok(Some((row.user.into(), hash)))
    }

    async fn password_hash(&self, id: UserId) -> Result<Option<String>, StoreError> {
        let hash = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM shop.user_password WHERE user_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hash)
    }

    async fn update_profile(
        &self,
        id: UserId,
        changes: ProfileChanges,
    ) -> Result<UserProfile, StoreError> {
        let mut tx = self.pool.begin().await?;

        let (set_display_name, display_name) = match changes.display_name {
            Some(name) => (true, name),
            None => (false, None),
        };

        let row = sqlx::query_as::<_, UserRow>(
            r"
            UPDATE shop.user
            SET display_name = CASE WHEN $2 THEN $3 ELSE display_name END,
                email = COALESCE($4, email)
            WHERE id = $1
            RETURNING id, email, display_name, role, created_at
            ",
        )
        .bind(id)
        .bind(set_display_name)
        .bind(display_name)
        .bind(changes.email.as_ref().map(Email::as_str))
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::from_insert(e, "email"))?
        .ok_or(StoreError::NotFound)?;

        if let Some(hash) = &changes.password_hash {
            sqlx::query(
                r"
                INSERT INTO shop.user_password (user_id, password_hash)
                VALUES ($1, $2)
                ON CONFLICT (user_id)
                DO UPDATE SET password_hash = EXCLUDED.password_hash, updated_at = NOW()
                ",
            )
            .bind(id)
            .bind(hash)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(row.into())
    }
}
