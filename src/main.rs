use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::info;

use milp_workbench::config::Settings;
use milp_workbench::controller::FormController;
use milp_workbench::routes::{self, UploadLimit};

// ---------- Server bootstrap ----------
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env();

    let _sentry = settings.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let controller = FormController::from_settings(&settings).map_err(std::io::Error::other)?;
    let controller = web::Data::new(controller);
    let upload_limit = web::Data::new(UploadLimit(settings.upload_limit));

    info!("Starting server on http://127.0.0.1:{}", settings.port);
    HttpServer::new(move || {
        App::new()
            .wrap(sentry_actix::Sentry::new())
            .wrap(Logger::default())
            .app_data(controller.clone())
            .app_data(upload_limit.clone())
            .configure(routes::configure)
    })
    .bind(("0.0.0.0", settings.port))?
    .run()
    .await
}
