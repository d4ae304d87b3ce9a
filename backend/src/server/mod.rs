//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_cors::Cors;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, http::Method, web};

use routeslip::Trace;
#[cfg(debug_assertions)]
use routeslip::doc::ApiDoc;
use routeslip::inbound::http::configure_api;
use routeslip::inbound::http::health::{HealthState, live, ready};
use routeslip::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const CORS_MAX_AGE_SECS: usize = 86_400;

fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_any_header()
        .max_age(CORS_MAX_AGE_SECS)
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    upload_limit: usize,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api")
        .app_data(web::JsonConfig::default().limit(upload_limit))
        .configure(configure_api);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(cors())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));
    let upload_limit = config.upload_limit;

    let server = HttpServer::new(move || {
        build_app(
            server_health_state.clone(),
            http_state.clone(),
            upload_limit,
        )
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
