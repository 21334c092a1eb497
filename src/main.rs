use actix_web::{web, App, HttpServer};
use clap::Parser;
use tracing::info;

use banner_rotator::api::middleware::RequestIdMiddleware;
use banner_rotator::api::services::{catalog, health, rotation, stats};
use banner_rotator::cli::{Cli, Command};
use banner_rotator::config;
use banner_rotator::services::{AppStartTime, BannerSelector};
use banner_rotator::storage::StorageFactory;
use banner_rotator::system::init_logging;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 记录程序启动时间
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    config::init_config(cli.config.as_deref());
    let config = config::get_config();

    // guard 需要存活到进程结束，否则缓冲日志丢失
    let _log_guard = init_logging(&config);

    if let Some(Command::Migrate) = cli.command {
        return run_migrations(&config).await;
    }

    // 检查存储后端
    let storage = StorageFactory::create()
        .await
        .expect("Failed to create storage");
    info!(
        "Using storage backend: {}",
        storage.get_backend_name().await
    );

    let storage_data = web::Data::new(storage.clone());
    let selector = web::Data::new(BannerSelector::new(storage));

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(storage_data.clone())
            .app_data(selector.clone())
            .app_data(web::Data::new(app_start_time.clone()))
            .wrap(RequestIdMiddleware)
            .service(rotation::rotation_routes())
            .service(catalog::banner_routes())
            .service(catalog::slot_routes())
            .service(catalog::group_routes())
            .service(stats::click_routes())
            .service(stats::stats_routes())
            .service(health::health_routes())
    })
    .bind(bind_address)?
    .run()
    .await
}

/// `migrate` 子命令：建表后直接退出
async fn run_migrations(config: &config::AppConfig) -> std::io::Result<()> {
    use migration::{Migrator, MigratorTrait};

    if config.database.backend == "memory" {
        eprintln!("migrate requires a SQL database backend, check [database] in config");
        std::process::exit(1);
    }

    let db = sea_orm::Database::connect(config.database.url.as_str())
        .await
        .map_err(std::io::Error::other)?;
    Migrator::up(&db, None).await.map_err(std::io::Error::other)?;

    info!("Database migrations completed");
    Ok(())
}
