//! Application state container shared across Axum route handlers and services.
//!
//! It is cloned into each handler through Axum's `State<T>` extractor.

use sea_orm::DatabaseConnection;

/// Central application state shared across the server.
///
/// This includes:
/// - A cloned, thread-safe database connection for use with SeaORM.
/// - The id of the system actor recorded as encoder for rows created without one.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    system_actor_id: i64,
}

impl AppState {
    /// Creates a new `AppState` with the given database connection and system actor.
    pub fn new(db: DatabaseConnection, system_actor_id: i64) -> Self {
        Self {
            db,
            system_actor_id,
        }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for async contexts or spawning tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    pub fn system_actor_id(&self) -> i64 {
        self.system_actor_id
    }
}
