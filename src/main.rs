use std::sync::Arc;
use std::time::Duration;

use actix_web::{middleware::Logger, App, HttpServer};
use log::{info, warn};
use mongodb::bson::doc;
use mongodb::Client;

use user_management::config::{StorageBackend, CONFIG};
use user_management::repositories::{
    InMemoryRetentionRepository, InMemoryUserRepository, MongoRetentionRepository,
    MongoUserRepository, RetentionRepository, UserRepository,
};
use user_management::services::analytics_service::spawn_retention_job;
use user_management::services::LogMailer;
use user_management::AppState;

type Repositories = (Arc<dyn UserRepository>, Arc<dyn RetentionRepository>);

async fn connect_storage() -> std::io::Result<Repositories> {
    match CONFIG.storage_backend {
        StorageBackend::Memory => {
            warn!("Using in-memory storage; all data is lost on shutdown");
            let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
            let snapshots: Arc<dyn RetentionRepository> =
                Arc::new(InMemoryRetentionRepository::new());
            Ok((users, snapshots))
        }
        StorageBackend::MongoDb => {
            info!("Connecting to MongoDB...");
            let client = Client::with_uri_str(&CONFIG.mongodb_uri)
                .await
                .map_err(std::io::Error::other)?;
            let db = client.database(&CONFIG.database_name);

            db.run_command(doc! { "ping": 1 })
                .await
                .map_err(std::io::Error::other)?;
            info!("Connected to MongoDB successfully!");

            let users: Arc<dyn UserRepository> = Arc::new(MongoUserRepository::new(&db));
            let snapshots: Arc<dyn RetentionRepository> =
                Arc::new(MongoRetentionRepository::new(&db));
            Ok((users, snapshots))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let (users, snapshots) = connect_storage().await?;
    users.init().await.map_err(std::io::Error::other)?;
    snapshots.init().await.map_err(std::io::Error::other)?;

    let state = AppState::new(users, snapshots, Arc::new(LogMailer));

    spawn_retention_job(
        state.analytics_service.clone().into_inner(),
        Duration::from_secs(CONFIG.retention_interval_secs.max(1)),
    );
    info!(
        "Retention metrics scheduled every {}s",
        CONFIG.retention_interval_secs
    );

    let server_addr = format!("{}:{}", CONFIG.server_host, CONFIG.server_port);
    info!("Starting server at http://{}", server_addr);

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Logger::default())
            .configure(move |cfg| state.configure(cfg))
    })
    .bind(&server_addr)?
    .run()
    .await
}
