use crate::config::Config;
use crate::error::{Error, Result};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

/// SQLite leaves foreign keys off unless asked, per connection.
#[derive(Debug)]
struct ConnectionPragmas;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(r2d2::Error::QueryError)
    }
}

pub fn create_pool(config: &Config) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(config.database_url.as_str());
    let builder = r2d2::Pool::builder().connection_customizer(Box::new(ConnectionPragmas));

    let builder = if config.is_in_memory() {
        // Each :memory: connection is its own database, so keep exactly one alive
        builder.max_size(1).idle_timeout(None).max_lifetime(None)
    } else {
        builder.max_size(config.pool_size)
    };

    let pool = builder.build(manager)?;

    // Run pending migrations on startup
    {
        let mut conn = pool.get()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| Error::Migration(e.to_string()))?;
        tracing::info!(count = applied.len(), "applied pending database migrations");
    }

    Ok(pool)
}

pub fn get_conn(pool: &DbPool) -> Result<DbConn> {
    pool.get().map_err(|e| {
        tracing::error!("Failed to get DB connection: {}", e);
        Error::Pool(e)
    })
}
