//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use platform::password::SecretHash;

use crate::domain::entity::account::{Account, AccountId};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_password::PasswordDigest, verification_code::VerificationCode,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

impl AccountRepository for PgAccountRepository {
    async fn insert(&self, account: &Account) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                display_name,
                email_hash,
                email_search_key,
                password_hash,
                photo,
                active,
                verified,
                pending_code,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(&account.display_name)
        .bind(account.email_hash.as_phc_string())
        .bind(&account.email_search_key)
        .bind(account.password_hash.as_str())
        .bind(&account.photo)
        .bind(account.active)
        .bind(account.verified)
        .bind(account.pending_code.as_ref().map(|c| c.as_str()))
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            // The unique index on email_search_key is the authoritative
            // duplicate guard.
            Err(e) if is_unique_violation(&e) => Err(AuthError::DuplicateAccount),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_search_key(&self, search_key: &str) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                display_name,
                email_hash,
                email_search_key,
                password_hash,
                photo,
                active,
                verified,
                pending_code,
                created_at,
                updated_at
            FROM accounts
            WHERE email_search_key = $1
            "#,
        )
        .bind(search_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_account()))
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                display_name,
                email_hash,
                email_search_key,
                password_hash,
                photo,
                active,
                verified,
                pending_code,
                created_at,
                updated_at
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_account()))
    }

    async fn update(&self, account: &Account) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE accounts SET
                display_name = $2,
                password_hash = $3,
                photo = $4,
                active = $5,
                verified = $6,
                pending_code = $7,
                updated_at = $8
            WHERE account_id = $1
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(&account.display_name)
        .bind(account.password_hash.as_str())
        .bind(&account.photo)
        .bind(account.active)
        .bind(account.verified)
        .bind(account.pending_code.as_ref().map(|c| c.as_str()))
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    display_name: String,
    email_hash: String,
    email_search_key: String,
    password_hash: String,
    photo: Option<String>,
    active: bool,
    verified: bool,
    pending_code: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> Account {
        Account {
            account_id: AccountId::from_uuid(self.account_id),
            display_name: self.display_name,
            email_hash: SecretHash::from_stored(self.email_hash),
            email_search_key: self.email_search_key,
            password_hash: PasswordDigest::from_db(self.password_hash),
            photo: self.photo,
            active: self.active,
            verified: self.verified,
            pending_code: self.pending_code.map(VerificationCode::from_db),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
