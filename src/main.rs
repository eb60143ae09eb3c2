use anyhow::Result;
use gym_manager::api::create_routes;
use gym_manager::auth::JwtService;
use gym_manager::config::{run_migrations, AppConfig, DatabaseConfig, DatabaseSeeder};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let app_config = AppConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&app_config.log_level)),
        )
        .init();

    let db_config = DatabaseConfig::from_env()?;
    let pool = db_config.create_pool().await?;
    run_migrations(&pool).await?;

    if app_config.seed_demo_data {
        let admin = DatabaseSeeder::new(pool.clone()).seed_all().await?;

        if app_config.is_development() {
            let token = JwtService::new(&app_config.jwt_secret).create_access_token(
                admin.id,
                &admin.email,
                admin.role,
            )?;
            info!("Demo admin token for {}: {}", admin.email, token);
        }
    }

    let app = create_routes(pool, &app_config.jwt_secret);

    let address = app_config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Gym Manager server starting on http://{} ({})", address, app_config.environment);
    info!("Health check available at http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
