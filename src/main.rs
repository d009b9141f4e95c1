use poem::endpoint::StaticFilesEndpoint;
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;

use lostfound_backend::api::{AdminApi, HealthApi, ItemsApi};
use lostfound_backend::config::{self, Settings};
use lostfound_backend::stores::blob_store::MEDIA_MOUNT;
use lostfound_backend::AppData;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    config::init_logging().expect("Failed to initialize logging");

    let settings = Settings::from_env().expect("Invalid configuration");

    let db = config::init_database(&settings.database_url)
        .await
        .expect("Failed to connect to database");
    config::migrate_database(&db)
        .await
        .expect("Failed to run migrations");

    let app_data = AppData::init(settings.clone(), db);

    let items_api = ItemsApi::new(app_data.item_store.clone());
    let admin_api = AdminApi::new(app_data.item_store.clone(), settings.admin_token.clone());

    let api_service = OpenApiService::new(
        (HealthApi, items_api, admin_api),
        "Lost & Found API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("{}/api", settings.public_base_url));

    let ui = api_service.swagger_ui();

    let app = Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui)
        .nest(MEDIA_MOUNT, StaticFilesEndpoint::new(&settings.media_dir));

    tracing::info!("Starting server on {}", settings.bind_addr);
    tracing::info!("Swagger UI available at {}/swagger", settings.public_base_url);

    Server::new(TcpListener::bind(settings.bind_addr.clone()))
        .run(app)
        .await
}
