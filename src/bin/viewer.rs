use datadesk::{app, config::ViewerConfig, state::FilesState, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("datadesk=debug,axum=info,tower_http=info");

    let config = ViewerConfig::from_env();
    let state = FilesState::init(&config).await?;

    let app = app::build_viewer_app(state);
    app::serve(app, config.server.socket_addr()?).await
}
