use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::info;

use shift_scheduler::config::Config;
use shift_scheduler::routes::{configure, json_config};
use shift_scheduler::solve::AppState;

// ---------- Server bootstrap ----------
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();

    // Must outlive the server so events get flushed on shutdown.
    let _sentry = config.sentry_dsn.as_ref().map(|dsn| {
        sentry::init((
            dsn.as_str(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    actix_web::rt::System::new().block_on(run(config))
}

async fn run(config: Config) -> std::io::Result<()> {
    let port = config.port;
    let json_limit = config.json_limit;
    info!(
        "Starting server on http://0.0.0.0:{} (solver {:?}, timeout {}s, cache {})",
        port, config.solver, config.solve_timeout_secs, config.cache_size
    );

    let state = web::Data::new(AppState::new(config));

    HttpServer::new(move || {
        App::new()
            .wrap(sentry_actix::Sentry::new())
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(json_config(json_limit))
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
