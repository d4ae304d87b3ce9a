//! HTTP inbound adapter exposing the `/api` REST endpoints.

pub mod analyze;
pub mod cache_control;
pub mod delivery;
pub mod error;
pub mod health;
pub mod history;
pub mod images;
pub mod multipart;
pub mod routes;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api` handler on `cfg`.
///
/// Callers wrap this in the `/api` scope so tests and the server share one
/// route table.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(analyze::analyze)
        .service(routes::create_route)
        .service(routes::get_route)
        .service(images::get_image)
        .service(images::get_delivery_photo)
        .service(history::verify)
        .service(history::list)
        .service(history::detail)
        .service(history::delete)
        .service(delivery::upload_delivery_photo)
        .service(delivery::list_delivery_photos)
        .service(delivery::complete_order);
}
