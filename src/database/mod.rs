use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};

pub const FOODS: &str = "foods";
pub const PREMIUM: &str = "premium";
pub const REQUESTED: &str = "requested";
pub const USERS: &str = "users";
pub const PAYMENTS: &str = "payments";

/// Transactions need a replica set member or a `mongos` router.
fn supports_transactions(hello: &Document) -> bool {
    hello.contains_key("setName") || hello.get_str("msg").map_or(false, |msg| msg == "isdbgrid")
}

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, mongodb::error::Error> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.app_name = Some("hall-server".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        match db.run_command(doc! { "hello": 1 }).await {
            Ok(hello) if !supports_transactions(&hello) => log::warn!(
                "⚠️  MongoDB is a standalone server: meal promotion and checkout need a replica set"
            ),
            Ok(_) => {}
            Err(e) => log::warn!("⚠️  Could not read MongoDB topology: {}", e),
        }

        let mongodb = Self { client, db };
        mongodb.ensure_indexes().await;

        Ok(mongodb)
    }

    /// Creates the indexes the handlers rely on. Failures are logged, not fatal.
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        let unique = IndexOptions::builder().unique(true).build();
        let indexes = [
            (USERS, doc! { "email": 1 }, Some(unique)),
            (FOODS, doc! { "reviews.user": 1 }, None),
            (REQUESTED, doc! { "email": 1 }, None),
            (PAYMENTS, doc! { "email": 1 }, None),
        ];

        for (collection, keys, options) in indexes {
            let label = format!("{}({})", collection, keys.keys().cloned().collect::<Vec<_>>().join(", "));
            let index = IndexModel::builder().keys(keys).options(options).build();

            match self.collection::<Document>(collection).create_index(index).await {
                Ok(_) => log::info!("   ✅ Index ready: {}", label),
                Err(e) => log::warn!("   ⚠️  Could not create index {}: {}", label, e),
            }
        }
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Waits for in-flight operations and closes the pool.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        log::info!("👋 MongoDB connection closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_support_from_topology() {
        assert!(supports_transactions(&doc! { "isWritablePrimary": true, "setName": "rs0" }));
        assert!(supports_transactions(&doc! { "isWritablePrimary": true, "msg": "isdbgrid" }));
        assert!(!supports_transactions(&doc! { "isWritablePrimary": true }));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let db = MongoDB::new(&uri, "hall_server_test").await;
        assert!(db.is_ok());
        db.unwrap().shutdown().await;
    }
}
