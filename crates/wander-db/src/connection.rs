//! SurrealDB connection setup.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;

/// Connection settings. The server binary fills these from the
/// `WANDER_DB_*` environment variables.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket endpoint, host:port.
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "wander".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

/// Open a WebSocket connection, sign in as root, and select the
/// configured namespace and database.
///
/// The returned client is cheap to clone; every repository holds its
/// own handle onto the same connection.
pub async fn connect(config: &DbConfig) -> Result<Surreal<Client>, DbError> {
    let db = Surreal::new::<Ws>(config.url.as_str()).await?;

    db.signin(Root {
        username: config.username.clone(),
        password: config.password.clone(),
    })
    .await?;

    db.use_ns(&config.namespace)
        .use_db(&config.database)
        .await?;

    info!(
        url = %config.url,
        namespace = %config.namespace,
        database = %config.database,
        "wander database ready"
    );

    Ok(db)
}
