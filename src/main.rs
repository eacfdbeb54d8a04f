use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;

use taskdeck::auth::{AuthService, Authentication, TokenService};
use taskdeck::config::Config;
use taskdeck::error::ErrorEnvelope;
use taskdeck::routes;
use taskdeck::store::postgres::{PgTaskStore, PgUserStore};
use taskdeck::store::{TaskStore, UserStore};
use taskdeck::tasks::TaskService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let tokens = TokenService::new(&config.jwt_secret, config.token_lifetime_minutes);
    let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool.clone()));
    let task_store: Arc<dyn TaskStore> = Arc::new(PgTaskStore::new(pool));
    let auth_service = AuthService::new(users, tokens.clone());
    let task_service = TaskService::new(task_store);

    log::info!("Starting taskdeck server at {}", config.server_url());

    let bind_addr = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(task_service.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(
                web::scope("/api")
                    .wrap(Authentication::new(tokens.clone()))
                    .wrap(ErrorEnvelope)
                    .configure(routes::config),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
