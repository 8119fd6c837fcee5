use std::future::Future;

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, instrument};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::users::model::{NewUser, User, UserFilter, UserPatch};
use crate::users::password::hash_password;

pub const TABLE_NAME: &str = "users";

/// The only column set reads are allowed to project. `password` is
/// deliberately absent; every SELECT and RETURNING clause goes through
/// this constant.
pub const SELECTABLE_COLUMNS: &str = "id, username, email, updated_at, created_at";

/// Stateless data access for the users table. Holds the injected pool
/// and the process-wide config; nothing else.
#[derive(Clone)]
pub struct UserRepository {
    db: SqlitePool,
    config: StoreConfig,
}

impl UserRepository {
    pub fn new(db: SqlitePool, config: StoreConfig) -> Self {
        Self { db, config }
    }

    /// Insert a new user. A non-empty password is hashed first; the
    /// write never sees plaintext.
    #[instrument(skip(self, fields))]
    pub async fn create(&self, mut fields: NewUser) -> StoreResult<User> {
        if let Some(plain) = fields.password.take().filter(|p| !p.is_empty()) {
            fields.password = Some(hash_password(&plain, self.config.hash).await?);
        }

        let sql = format!(
            "INSERT INTO {TABLE_NAME} (username, email, password) \
             VALUES (?1, ?2, ?3) RETURNING {SELECTABLE_COLUMNS}"
        );
        let user = self
            .with_timeout(
                sqlx::query_as::<_, User>(&sql)
                    .bind(&fields.username)
                    .bind(&fields.email)
                    .bind(&fields.password)
                    .fetch_one(&self.db),
            )
            .await?;

        debug!(id = user.id, username = %user.username, "user created");
        Ok(user)
    }

    /// Every row, safe projection.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> StoreResult<Vec<User>> {
        let sql = format!("SELECT {SELECTABLE_COLUMNS} FROM {TABLE_NAME}");
        self.with_timeout(sqlx::query_as::<_, User>(&sql).fetch_all(&self.db))
            .await
    }

    /// Rows matching every provided filter (AND). An empty filter
    /// behaves like `list_all`.
    #[instrument(skip(self, filter))]
    pub async fn find(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let mut qb =
            QueryBuilder::<Sqlite>::new(format!("SELECT {SELECTABLE_COLUMNS} FROM {TABLE_NAME}"));
        if !filter.is_empty() {
            qb.push(" WHERE ");
            let mut clause = qb.separated(" AND ");
            if let Some(id) = filter.id {
                clause.push("id = ").push_bind_unseparated(id);
            }
            if let Some(username) = &filter.username {
                clause
                    .push("username = ")
                    .push_bind_unseparated(username.clone());
            }
            if let Some(email) = &filter.email {
                clause.push("email = ").push_bind_unseparated(email.clone());
            }
        }

        let query = qb.build_query_as::<User>();
        self.with_timeout(query.fetch_all(&self.db)).await
    }

    /// Zero-or-one row by id; a missing id is `None`, not an error.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {SELECTABLE_COLUMNS} FROM {TABLE_NAME} WHERE id = ?1");
        self.with_timeout(
            sqlx::query_as::<_, User>(&sql)
                .bind(id)
                .fetch_optional(&self.db),
        )
        .await
    }

    /// Update the row matching `patch.id`, returning rows affected. The
    /// same hashing rule as `create` applies. A patch with nothing to
    /// set issues no statement and reports 0.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, mut patch: UserPatch) -> StoreResult<u64> {
        if let Some(plain) = patch.password.take().filter(|p| !p.is_empty()) {
            patch.password = Some(hash_password(&plain, self.config.hash).await?);
        }
        if patch.is_empty() {
            return Ok(0);
        }

        let UserPatch {
            id,
            username,
            email,
            password,
        } = patch;

        let mut qb = QueryBuilder::<Sqlite>::new(format!("UPDATE {TABLE_NAME} SET "));
        let mut assignments = qb.separated(", ");
        if let Some(username) = username {
            assignments
                .push("username = ")
                .push_bind_unseparated(username);
        }
        if let Some(email) = email {
            assignments.push("email = ").push_bind_unseparated(email);
        }
        if let Some(password) = password {
            assignments
                .push("password = ")
                .push_bind_unseparated(password);
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = self.with_timeout(qb.build().execute(&self.db)).await?;
        debug!(id, rows = result.rows_affected(), "user updated");
        Ok(result.rows_affected())
    }

    /// Delete by id, returning rows deleted; 0 for a missing id.
    #[instrument(skip(self))]
    pub async fn destroy(&self, id: i64) -> StoreResult<u64> {
        let sql = format!("DELETE FROM {TABLE_NAME} WHERE id = ?1");
        let result = self
            .with_timeout(sqlx::query(&sql).bind(id).execute(&self.db))
            .await?;
        debug!(id, rows = result.rows_affected(), "user destroyed");
        Ok(result.rows_affected())
    }

    /// Apply the configured statement timeout to one driver call and
    /// normalize the error.
    async fn with_timeout<T>(
        &self,
        fut: impl Future<Output = Result<T, sqlx::Error>>,
    ) -> StoreResult<T> {
        match tokio::time::timeout(self.config.statement_timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from_sqlx),
            Err(_) => Err(StoreError::Timeout(self.config.statement_timeout)),
        }
    }
}
