use crate::config::DatabaseConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::Message;
use crate::store::MessageStore;
use async_trait::async_trait;
use deadpool_postgres::{Config, Object, Pool, PoolConfig, Runtime};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::Row;
use tracing::{debug, error, info, warn};

const MESSAGE_COLUMNS: &str = "id, content, is_palindrome, created_at, updated_at";

/// PostgreSQL-backed message store.
/// Holds a deadpool `Pool`; every operation borrows one connection for its duration.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Build the connection pool and verify that a connection can be made.
    pub async fn new(config: DatabaseConfig) -> ApiResult<Self> {
        info!("Creating PostgreSQL connection pool for {}", config.display_target());

        let pool = Self::create_pool(config)?;

        let db = Database { pool };
        db.test_connection().await?;

        Ok(db)
    }

    fn create_pool(config: DatabaseConfig) -> ApiResult<Pool> {
        let mut pg_config = Config::new();

        if let Some(url) = config.connection_string {
            pg_config.url = Some(url);
        } else {
            pg_config.host = Some(config.host);
            pg_config.port = Some(config.port);
            pg_config.dbname = Some(config.database);
            pg_config.user = Some(config.username);
            pg_config.password = Some(config.password);
        }

        pg_config.ssl_mode = Some(match config.ssl_mode.as_str() {
            "disable" => deadpool_postgres::SslMode::Disable,
            "prefer" => deadpool_postgres::SslMode::Prefer,
            "require" => deadpool_postgres::SslMode::Require,
            other => {
                warn!("Unknown SSL mode '{}', defaulting to 'prefer'", other);
                deadpool_postgres::SslMode::Prefer
            }
        });

        pg_config.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });

        let mut pool_config = PoolConfig::new(config.max_connections as usize);
        pool_config.timeouts.wait = Some(config.connection_timeout);
        pool_config.timeouts.create = Some(config.connection_timeout);
        pg_config.pool = Some(pool_config);

        let tls_connector = TlsConnector::builder().build().map_err(|e| {
            error!("Failed to create TLS connector: {}", e);
            ApiError::Database(format!("TLS connector creation failed: {}", e))
        })?;
        let tls = MakeTlsConnector::new(tls_connector);

        pg_config
            .create_pool(Some(Runtime::Tokio1), tls)
            .map_err(|e| {
                error!("Failed to create connection pool: {}", e);
                ApiError::Database(format!("Connection pool creation failed: {}", e))
            })
    }

    async fn get_connection(&self) -> ApiResult<Object> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// Create the `messages` table if it does not exist yet.
    pub async fn migrate(&self) -> ApiResult<()> {
        info!("Running database migrations");

        let client = self.get_connection().await?;

        let messages_table = r#"
            CREATE TABLE IF NOT EXISTS messages (
                id BIGSERIAL PRIMARY KEY,
                content TEXT NOT NULL CHECK (char_length(content) <= 1000),
                is_palindrome BOOLEAN NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        client.execute(messages_table, &[]).await.map_err(|e| {
            error!("Failed to create messages table: {}", e);
            ApiError::Database(format!("Messages table creation failed: {}", e))
        })?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    pub async fn test_connection(&self) -> ApiResult<()> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[]).await.map_err(|e| {
            error!("Database connection test failed: {}", e);
            ApiError::Database(format!("Connection test failed: {}", e))
        })?;

        info!("Database connection test successful");
        Ok(())
    }

    /// Close the pool; outstanding connections are dropped when returned.
    pub fn close(&self) {
        self.pool.close();
        info!("Database connection pool closed");
    }
}

fn row_to_message(row: &Row) -> Message {
    Message {
        id: row.get(0),
        content: row.get(1),
        is_palindrome: row.get(2),
        created_at: row.get(3),
        updated_at: row.get(4),
    }
}

#[async_trait]
impl MessageStore for Database {
    async fn insert(&self, content: &str, is_palindrome: bool) -> ApiResult<Message> {
        let client = self.get_connection().await?;

        let query = format!(
            "INSERT INTO messages (content, is_palindrome) VALUES ($1, $2) RETURNING {}",
            MESSAGE_COLUMNS
        );

        let row = client
            .query_one(&query, &[&content, &is_palindrome])
            .await
            .map_err(ApiError::from)?;

        let message = row_to_message(&row);
        debug!("Inserted message row {}", message.id);
        Ok(message)
    }

    async fn find(&self, id: i64) -> ApiResult<Option<Message>> {
        let client = self.get_connection().await?;

        let query = format!("SELECT {} FROM messages WHERE id = $1", MESSAGE_COLUMNS);

        let row = client
            .query_opt(&query, &[&id])
            .await
            .map_err(ApiError::from)?;

        Ok(row.as_ref().map(row_to_message))
    }

    async fn update_content(
        &self,
        id: i64,
        content: &str,
        is_palindrome: bool,
    ) -> ApiResult<Option<Message>> {
        let client = self.get_connection().await?;

        let query = format!(
            "UPDATE messages SET content = $1, is_palindrome = $2, updated_at = NOW() WHERE id = $3 RETURNING {}",
            MESSAGE_COLUMNS
        );

        let row = client
            .query_opt(&query, &[&content, &is_palindrome, &id])
            .await
            .map_err(ApiError::from)?;

        Ok(row.as_ref().map(row_to_message))
    }

    async fn delete(&self, id: i64) -> ApiResult<bool> {
        let client = self.get_connection().await?;

        let rows_affected = client
            .execute("DELETE FROM messages WHERE id = $1", &[&id])
            .await
            .map_err(ApiError::from)?;

        Ok(rows_affected > 0)
    }

    async fn list(&self, limit: i64, offset: i64) -> ApiResult<Vec<Message>> {
        let client = self.get_connection().await?;

        let query = format!(
            "SELECT {} FROM messages ORDER BY id ASC LIMIT $1 OFFSET $2",
            MESSAGE_COLUMNS
        );

        let rows = client
            .query(&query, &[&limit, &offset])
            .await
            .map_err(ApiError::from)?;

        Ok(rows.iter().map(row_to_message).collect())
    }

    async fn count(&self) -> ApiResult<i64> {
        let client = self.get_connection().await?;

        let row = client
            .query_one("SELECT COUNT(*) FROM messages", &[])
            .await
            .map_err(ApiError::from)?;

        Ok(row.get(0))
    }

    async fn ping(&self) -> ApiResult<()> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[]).await.map_err(|e| {
            error!("Database health check failed: {}", e);
            ApiError::Database(format!("Health check failed: {}", e))
        })?;

        Ok(())
    }
}
