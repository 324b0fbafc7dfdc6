//! Async handle over a single SQLite connection.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::repositories::{
    ImageRecord, ImageRepo, NewImage, NewOrganization, OpportunityRepo, Organization,
    OrganizationRepo,
};
use crate::schema;

/// Shared store handle.
///
/// Cloning is cheap; all clones use the same connection. Queries run on the
/// blocking thread pool while holding the connection lock.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    /// Opens (or creates) the database file and applies the schema.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        info!(path = %path.display(), "opened database");
        Self::from_connection(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        schema::apply(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` against the connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Task("connection lock poisoned".to_string()))?;
            f(&*guard)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    pub async fn list_organizations(&self) -> StoreResult<Vec<Organization>> {
        self.with_conn(OrganizationRepo::list).await
    }

    pub async fn create_organization(&self, org: NewOrganization) -> StoreResult<i64> {
        self.with_conn(move |conn| OrganizationRepo::create(conn, &org)).await
    }

    pub async fn list_opportunities(&self, organization_id: i64) -> StoreResult<Vec<String>> {
        self.with_conn(move |conn| OpportunityRepo::list_for(conn, organization_id))
            .await
    }

    /// Adds an opportunity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the organization does not exist.
    pub async fn add_opportunity(&self, organization_id: i64, opportunity: String) -> StoreResult<()> {
        self.with_conn(move |conn| OpportunityRepo::add(conn, organization_id, &opportunity))
            .await
    }

    pub async fn list_images(&self) -> StoreResult<Vec<ImageRecord>> {
        self.with_conn(ImageRepo::list).await
    }

    pub async fn add_image(&self, image: NewImage) -> StoreResult<i64> {
        self.with_conn(move |conn| ImageRepo::add(conn, &image)).await
    }
}
