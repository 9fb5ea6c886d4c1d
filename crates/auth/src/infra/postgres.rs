//! PostgreSQL Credential Store
//!
//! The failure-counter mutation is a single `UPDATE … RETURNING`, so the
//! read-modify-write is atomic per account and concurrent attempts
//! cannot race past the lockout threshold. Every mutation checks
//! `rows_affected` to report a missing account as `NotFound`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::account::Account;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::{
    account_id::AccountId, claim::Claim, email::Email, password::PasswordHash, role::Role,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_account(&self, row: AccountRow) -> AuthResult<Account> {
        let roles = sqlx::query_scalar::<_, String>(
            "SELECT role_name FROM account_roles WHERE account_id = $1 ORDER BY role_name",
        )
        .bind(row.account_id)
        .fetch_all(&self.pool)
        .await?;

        let roles = roles
            .iter()
            .map(|code| {
                Role::from_code(code)
                    .ok_or_else(|| AuthError::Internal(format!("Unknown role in store: {code}")))
            })
            .collect::<AuthResult<Vec<Role>>>()?;

        let claims = sqlx::query_as::<_, ClaimRow>(
            "SELECT claim_kind, claim_value FROM account_claims WHERE account_id = $1",
        )
        .bind(row.account_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|c| Claim::new(c.claim_kind, c.claim_value))
        .collect();

        row.into_account(roles, claims)
    }

    async fn fetch_optional(&self, column: &str, value: &str) -> AuthResult<Option<Account>> {
        // column is one of our own identifiers, never caller input
        let query = format!(
            r#"
            SELECT
                account_id,
                username,
                email,
                first_name,
                last_name,
                password_hash,
                email_confirmed,
                failed_login_count,
                lockout_until,
                security_stamp,
                created_at
            FROM accounts
            WHERE {} = $1
            "#,
            column
        );

        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.load_account(row).await?)),
            None => Ok(None),
        }
    }

    fn ensure_found(rows_affected: u64) -> AuthResult<()> {
        if rows_affected == 0 {
            Err(AuthError::NotFound)
        } else {
            Ok(())
        }
    }
}

impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<Account>> {
        self.fetch_optional("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>> {
        self.fetch_optional("email", email).await
    }

    async fn email_exists(&self, email: &str) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create(&self, account: &Account) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                username,
                email,
                first_name,
                last_name,
                password_hash,
                email_confirmed,
                failed_login_count,
                lockout_until,
                security_stamp,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(&account.username)
        .bind(account.email.as_str())
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.password_hash.as_phc_string())
        .bind(account.email_confirmed)
        .bind(account.failed_login_count as i16)
        .bind(account.lockout_until)
        .bind(&account.security_stamp)
        .bind(account.created_at)
        .execute(&mut *tx)
        .await?;

        for claim in &account.claims {
            sqlx::query(
                "INSERT INTO account_claims (account_id, claim_kind, claim_value) VALUES ($1, $2, $3)",
            )
            .bind(account.account_id.as_uuid())
            .bind(&claim.kind)
            .bind(&claim.value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn assign_role(&self, account_id: &AccountId, role: Role) -> AuthResult<()> {
        let affected = sqlx::query(
            r#"
            INSERT INTO account_roles (account_id, role_name)
            SELECT account_id, $2 FROM accounts WHERE account_id = $1
            ON CONFLICT (account_id, role_name) DO NOTHING
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(role.code())
        .execute(&self.pool)
        .await?
        .rows_affected();

        // Zero rows means either the account is missing or the role was
        // already granted; distinguish the two
        if affected == 0 {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM accounts WHERE account_id = $1)",
            )
            .bind(account_id.as_uuid())
            .fetch_one(&self.pool)
            .await?;

            if !exists {
                return Err(AuthError::NotFound);
            }
        }

        Ok(())
    }

    async fn set_email_confirmed(&self, account_id: &AccountId) -> AuthResult<()> {
        let affected = sqlx::query(
            "UPDATE accounts SET email_confirmed = TRUE, security_stamp = $2 WHERE account_id = $1",
        )
        .bind(account_id.as_uuid())
        .bind(platform::crypto::random_stamp())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Self::ensure_found(affected)
    }

    async fn increment_failed_login(&self, account_id: &AccountId) -> AuthResult<u16> {
        let new_count = sqlx::query_scalar::<_, i16>(
            r#"
            UPDATE accounts
            SET failed_login_count = failed_login_count + 1
            WHERE account_id = $1
            RETURNING failed_login_count
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AuthError::NotFound)?;

        Ok(new_count as u16)
    }

    async fn reset_failed_login(&self, account_id: &AccountId) -> AuthResult<()> {
        let affected = sqlx::query(
            "UPDATE accounts SET failed_login_count = 0, lockout_until = NULL WHERE account_id = $1",
        )
        .bind(account_id.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Self::ensure_found(affected)
    }

    async fn set_lockout_until(
        &self,
        account_id: &AccountId,
        until: DateTime<Utc>,
    ) -> AuthResult<()> {
        let affected = sqlx::query("UPDATE accounts SET lockout_until = $2 WHERE account_id = $1")
            .bind(account_id.as_uuid())
            .bind(until)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Self::ensure_found(affected)
    }

    async fn set_password_hash(
        &self,
        account_id: &AccountId,
        password_hash: &PasswordHash,
    ) -> AuthResult<()> {
        let affected = sqlx::query(
            "UPDATE accounts SET password_hash = $2, security_stamp = $3 WHERE account_id = $1",
        )
        .bind(account_id.as_uuid())
        .bind(password_hash.as_phc_string())
        .bind(platform::crypto::random_stamp())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Self::ensure_found(affected)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    password_hash: String,
    email_confirmed: bool,
    failed_login_count: i16,
    lockout_until: Option<DateTime<Utc>>,
    security_stamp: String,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self, roles: Vec<Role>, claims: Vec<Claim>) -> AuthResult<Account> {
        let password_hash = PasswordHash::from_phc_string(&self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {e}")))?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            username: self.username,
            email: Email::from_db(self.email),
            first_name: self.first_name,
            last_name: self.last_name,
            password_hash,
            email_confirmed: self.email_confirmed,
            failed_login_count: self.failed_login_count as u16,
            lockout_until: self.lockout_until,
            security_stamp: self.security_stamp,
            roles,
            claims,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ClaimRow {
    claim_kind: String,
    claim_value: String,
}
