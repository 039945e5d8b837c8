use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::config::{UsersConfig, ViewerConfig};
use crate::files::catalog::DataDir;
use crate::users::repo::{PgUserRepo, UserRepo};

/// Request state for the file viewer.
#[derive(Clone)]
pub struct FilesState {
    pub data_dir: Arc<DataDir>,
}

impl FilesState {
    pub async fn init(config: &ViewerConfig) -> anyhow::Result<Self> {
        let data_dir = DataDir::open(&config.data_dir).await?;
        Ok(Self {
            data_dir: Arc::new(data_dir),
        })
    }
}

/// Request state for the user directory API.
#[derive(Clone)]
pub struct UsersState {
    pub users: Arc<dyn UserRepo>,
}

impl UsersState {
    pub async fn init(config: &UsersConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        Ok(Self {
            users: Arc::new(PgUserRepo::new(db)),
        })
    }
}
