//! Postgres-backed user/role store.
//!
//! Every operation opens its own transaction, switches it to read-only,
//! performs the read and commits. Dropping the future (caller timeout or
//! cancellation) drops the transaction, which sqlx rolls back.
//!
//! ## Error Mapping
//!
//! All sqlx failures surface as `StoreError::Unavailable`; a missing row is
//! `Ok(None)` / an empty vector, never an error.
//!
//! | SQLx Error | StoreError | Scenario |
//! |------------|------------|----------|
//! | Io / Tls / PoolTimedOut / PoolClosed | `Unavailable` | Store cannot be reached |
//! | Database | `Unavailable` | Query rejected (e.g. missing table, serialization failure) |
//! | ColumnDecode / ColumnNotFound / Decode | `Unavailable` | Row shape does not match the schema |
//! | Other | `Unavailable` | Anything else |

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::{Span, instrument};

use warden_auth::{Principal, Role, User, Username};
use warden_core::{RoleId, UserId};

use super::r#trait::{PrincipalStore, RoleStore, StoreError, UserStore};

/// DDL for the `users` and `roles` tables.
pub const SCHEMA_SQL: &str = include_str!("../../migrations/0001_security_schema.sql");

const SELECT_USER_BY_USERNAME: &str = r#"
    SELECT id, username
    FROM users
    WHERE username = $1
"#;

const SELECT_USER_BY_ID: &str = r#"
    SELECT id, username
    FROM users
    WHERE id = $1
"#;

const SELECT_ROLES_BY_USER_ID: &str = r#"
    SELECT id, user_id, name
    FROM roles
    WHERE user_id = $1
    ORDER BY id ASC
"#;

#[derive(Debug, Clone, Copy)]
enum ReadMode {
    /// Single-statement read.
    Single,
    /// Several statements that must observe the same snapshot.
    Snapshot,
}

impl ReadMode {
    fn set_transaction_sql(self) -> &'static str {
        match self {
            ReadMode::Single => "SET TRANSACTION READ ONLY",
            ReadMode::Snapshot => "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY",
        }
    }
}

/// Postgres-backed store for users and role assignments.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool which is thread-safe (Arc + Send + Sync).
///
/// ## Consistency
///
/// `load_principal` reads the user and its roles in one `REPEATABLE READ`
/// transaction, so a concurrent role change cannot produce a torn principal.
#[derive(Debug, Clone)]
pub struct PostgresSecurityStore {
    pool: Arc<PgPool>,
}

impl PostgresSecurityStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the tables if they do not exist yet (dev/test convenience).
    pub async fn apply_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("apply_schema", e))?;
        Ok(())
    }

    async fn begin_read(&self, mode: ReadMode) -> Result<Transaction<'static, Postgres>, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query(mode.set_transaction_sql())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("set_transaction", e))?;

        Ok(tx)
    }

    async fn finish(tx: Transaction<'static, Postgres>) -> Result<(), StoreError> {
        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))
    }
}

async fn fetch_user_by_username(
    tx: &mut Transaction<'static, Postgres>,
    username: &Username,
) -> Result<Option<User>, StoreError> {
    let row = sqlx::query(SELECT_USER_BY_USERNAME)
        .bind(username.as_str())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("find_by_username", e))?;

    row.map(|r| user_from_row(&r)).transpose()
}

async fn fetch_roles(
    tx: &mut Transaction<'static, Postgres>,
    user_id: UserId,
) -> Result<Vec<Role>, StoreError> {
    let rows = sqlx::query(SELECT_ROLES_BY_USER_ID)
        .bind(user_id.get())
        .fetch_all(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("find_by_user_id", e))?;

    rows.iter().map(role_from_row).collect()
}

#[async_trait]
impl UserStore for PostgresSecurityStore {
    #[instrument(skip(self), fields(username = %username, found = tracing::field::Empty), err)]
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, StoreError> {
        let mut tx = self.begin_read(ReadMode::Single).await?;
        let user = fetch_user_by_username(&mut tx, username).await?;
        Self::finish(tx).await?;

        Span::current().record("found", user.is_some());
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let mut tx = self.begin_read(ReadMode::Single).await?;
        let row = sqlx::query(SELECT_USER_BY_ID)
            .bind(id.get())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;
        Self::finish(tx).await?;

        row.map(|r| user_from_row(&r)).transpose()
    }
}

#[async_trait]
impl RoleStore for PostgresSecurityStore {
    #[instrument(skip(self), fields(user_id = %user_id), err)]
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Role>, StoreError> {
        let mut tx = self.begin_read(ReadMode::Single).await?;
        let roles = fetch_roles(&mut tx, user_id).await?;
        Self::finish(tx).await?;

        tracing::debug!(role_count = roles.len(), "loaded roles");
        Ok(roles)
    }
}

#[async_trait]
impl PrincipalStore for PostgresSecurityStore {
    #[instrument(skip(self), fields(username = %username), err)]
    async fn load_principal(&self, username: &Username) -> Result<Option<Principal>, StoreError> {
        let mut tx = self.begin_read(ReadMode::Snapshot).await?;

        let Some(user) = fetch_user_by_username(&mut tx, username).await? else {
            Self::finish(tx).await?;
            return Ok(None);
        };
        let roles = fetch_roles(&mut tx, user.id).await?;
        Self::finish(tx).await?;

        Ok(Some(Principal::from_records(user, &roles)))
    }
}

// Row mapping

fn user_from_row(row: &sqlx::postgres::PgRow) -> Result<User, StoreError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| map_sqlx_error("decode_user", e))?;
    let username: String = row
        .try_get("username")
        .map_err(|e| map_sqlx_error("decode_user", e))?;
    let username = Username::parse(username)
        .map_err(|e| StoreError::unavailable(format!("invalid user row {id}: {e}")))?;

    Ok(User::new(UserId::new(id), username))
}

fn role_from_row(row: &sqlx::postgres::PgRow) -> Result<Role, StoreError> {
    Ok(Role {
        id: RoleId::new(row.try_get("id").map_err(|e| map_sqlx_error("decode_role", e))?),
        user_id: UserId::new(
            row.try_get("user_id")
                .map_err(|e| map_sqlx_error("decode_role", e))?,
        ),
        name: row
            .try_get("name")
            .map_err(|e| map_sqlx_error("decode_role", e))?,
    })
}

/// Map a sqlx error into the store taxonomy.
///
/// Never produces "not found": absence is expressed through `Option`/empty
/// results by the callers above.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
            StoreError::Unavailable(format!(
                "database error in {operation} [{code}]: {}",
                db_err.message()
            ))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("timed out acquiring a connection in {operation}"))
        }
        sqlx::Error::Io(io) => StoreError::Unavailable(format!("i/o error in {operation}: {io}")),
        sqlx::Error::RowNotFound => {
            // Only fetch_optional/fetch_all are used, so this is unexpected.
            StoreError::Unavailable(format!("unexpected row not found in {operation}"))
        }
        other => StoreError::Unavailable(format!("sqlx error in {operation}: {other}")),
    }
}
