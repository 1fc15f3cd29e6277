//! PostgreSQL identity store.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use async_trait::async_trait;

use super::{IdentityStore, StoreError};
use crate::models::identity::{AccountKind, Identity, NewIdentity, ResetTicket, Role};

/// Run all embedded database migrations against the given pool.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// `IdentityStore` backed by a PostgreSQL `identities` table.
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        where_clause: &str,
        bind: &str,
    ) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT id::text, email, username, role, kind, password_hash, provider_subject_id, \
                    profile_image_url, reset_token_hash, reset_expires_at, created_at \
             FROM identities WHERE {where_clause}"
        ))
        .bind(bind)
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_identity).transpose()
    }
}

type IdentityRow = (
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<DateTime<Utc>>,
    DateTime<Utc>,
);

fn row_to_identity(row: IdentityRow) -> Result<Identity, StoreError> {
    let (
        id,
        email,
        username,
        role,
        kind,
        password_hash,
        provider_subject_id,
        profile_image_url,
        reset_token_hash,
        reset_expires_at,
        created_at,
    ) = row;
    let role = Role::parse(&role)
        .ok_or_else(|| StoreError::Unavailable(format!("unknown role in store: {role}")))?;
    let kind = AccountKind::parse(&kind)
        .ok_or_else(|| StoreError::Unavailable(format!("unknown account kind in store: {kind}")))?;
    let reset_ticket = match (reset_token_hash, reset_expires_at) {
        (Some(token_hash), Some(expires_at)) => Some(ResetTicket {
            token_hash,
            expires_at,
        }),
        _ => None,
    };
    Ok(Identity {
        id,
        email,
        username,
        role,
        kind,
        password_hash,
        provider_subject_id,
        profile_image_url,
        reset_ticket,
        created_at,
    })
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, StoreError> {
        self.fetch_one_where("id::text = $1", id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        self.fetch_one_where("email = $1", email).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, StoreError> {
        self.fetch_one_where("username = $1", username).await
    }

    async fn find_by_provider_subject(
        &self,
        provider_subject_id: &str,
    ) -> Result<Option<Identity>, StoreError> {
        self.fetch_one_where("provider_subject_id = $1", provider_subject_id)
            .await
    }

    async fn find_by_reset_hash(&self, token_hash: &str) -> Result<Option<Identity>, StoreError> {
        self.fetch_one_where("reset_token_hash = $1", token_hash)
            .await
    }

    async fn create(&self, fields: NewIdentity) -> Result<Identity, StoreError> {
        let id = Uuid::new_v4();
        let row = sqlx::query_as::<_, (DateTime<Utc>,)>(
            "INSERT INTO identities \
                 (id, email, username, role, kind, password_hash, provider_subject_id, profile_image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING created_at",
        )
        .bind(id)
        .bind(&fields.email)
        .bind(&fields.username)
        .bind(fields.role.as_str())
        .bind(fields.kind.as_str())
        .bind(&fields.password_hash)
        .bind(&fields.provider_subject_id)
        .bind(&fields.profile_image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(Identity {
            id: id.to_string(),
            email: fields.email,
            username: fields.username,
            role: fields.role,
            kind: fields.kind,
            password_hash: fields.password_hash,
            provider_subject_id: fields.provider_subject_id,
            profile_image_url: fields.profile_image_url,
            reset_ticket: None,
            created_at: row.0,
        })
    }

    async fn save(&self, identity: &Identity) -> Result<(), StoreError> {
        let (reset_token_hash, reset_expires_at) = match &identity.reset_ticket {
            Some(ticket) => (Some(ticket.token_hash.as_str()), Some(ticket.expires_at)),
            None => (None, None),
        };
        let result = sqlx::query(
            "UPDATE identities \
             SET email = $2, username = $3, role = $4, kind = $5, password_hash = $6, \
                 provider_subject_id = $7, profile_image_url = $8, \
                 reset_token_hash = $9, reset_expires_at = $10 \
             WHERE id::text = $1",
        )
        .bind(&identity.id)
        .bind(&identity.email)
        .bind(&identity.username)
        .bind(identity.role.as_str())
        .bind(identity.kind.as_str())
        .bind(&identity.password_hash)
        .bind(&identity.provider_subject_id)
        .bind(&identity.profile_image_url)
        .bind(reset_token_hash)
        .bind(reset_expires_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Unavailable(format!(
                "identity {} not found",
                identity.id
            )));
        }
        Ok(())
    }

    async fn update_reset_ticket(
        &self,
        id: &str,
        ticket: Option<&ResetTicket>,
    ) -> Result<(), StoreError> {
        let (reset_token_hash, reset_expires_at) = match ticket {
            Some(ticket) => (Some(ticket.token_hash.as_str()), Some(ticket.expires_at)),
            None => (None, None),
        };
        let result = sqlx::query(
            "UPDATE identities SET reset_token_hash = $2, reset_expires_at = $3 \
             WHERE id::text = $1",
        )
        .bind(id)
        .bind(reset_token_hash)
        .bind(reset_expires_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Unavailable(format!("identity {id} not found")));
        }
        Ok(())
    }
}
