use datadesk::{app, config::UsersConfig, state::UsersState, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("datadesk=debug,axum=info,tower_http=info,sqlx=warn");

    let config = UsersConfig::from_env()?;
    let state = UsersState::init(&config).await?;

    let app = app::build_users_app(state);
    app::serve(app, config.server.socket_addr()?).await
}
