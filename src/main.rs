use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;

use gmpl_notebook::config::Config;
use gmpl_notebook::domain::solvers::GlpsolSolver;
use gmpl_notebook::routes::{configure, json_config, AppState};

// ---------- Server bootstrap ----------
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();

    let _sentry = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let solver = GlpsolSolver::new(&config.glpsol_path);
    match solver.version() {
        Some(version) => log::info!("Using {}", version),
        None => log::warn!(
            "{:?} could not be run; solve commands will fail until it is installed",
            config.glpsol_path
        ),
    }

    let state = web::Data::new(AppState::new(
        Box::new(solver),
        config.scratch_dir.clone(),
        config.session_capacity,
    ));
    let json_limit = config.json_limit;

    log::info!("Starting server on http://127.0.0.1:{}", config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(sentry_actix::Sentry::new())
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(json_config(json_limit))
            .configure(configure)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}
