use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};
use std::time::Duration;

use crate::{config::Config, errors::AppResult};

pub const QUIZZES_COLLECTION: &str = "quizzes";
pub const QUESTIONS_COLLECTION: &str = "questions";
pub const ATTEMPTS_COLLECTION: &str = "attempts";

const APP_NAME: &str = "quiz-server";

#[derive(Clone)]
pub struct Database {
    client: Client,
    db_name: String,
}

/// Pool size and timeouts come from `Config`; the rest is fixed for this server.
fn apply_client_settings(options: &mut ClientOptions, config: &Config) {
    let timeout = Duration::from_secs(config.mongo_timeout_secs);

    options.app_name = Some(APP_NAME.to_string());
    options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
    options.max_pool_size = Some(config.mongo_max_pool_size);
    options.min_pool_size = Some(config.mongo_min_pool_size);
    options.connect_timeout = Some(timeout);
    options.server_selection_timeout = Some(timeout);
}

impl Database {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut client_options = ClientOptions::parse(&config.mongo_conn_string).await?;
        apply_client_settings(&mut client_options, config);

        let client = Client::with_options(client_options)?;
        let database = Self {
            client,
            db_name: config.mongo_db_name.clone(),
        };
        database.health_check().await?;

        log::info!(
            "Connected to MongoDB database '{}' (pool {}..={}, timeout {}s)",
            config.mongo_db_name,
            config.mongo_min_pool_size,
            config.mongo_max_pool_size,
            config.mongo_timeout_secs
        );

        Ok(database)
    }

    pub fn get_collection<T>(&self, collection_name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client
            .database(&self.db_name)
            .collection(collection_name)
    }

    /// Pings the server; backs the readiness probe.
    pub async fn health_check(&self) -> AppResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}
