//! Tracing middleware attaching a request-scoped trace identifier.
//!
//! Each request runs inside a [`TraceId`] scope and a `request` span, and
//! every response carries the identifier in the `trace-id` header.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, debug, error, info_span};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware adding a `trace-id` header to every response.
///
/// Handlers can read the identifier via [`TraceId::current`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use routeslip::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::generate();
        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path()
        );
        let header_value = trace_id.to_string();
        let inner = self.service.call(req);
        Box::pin(
            TraceId::scope(trace_id, async move {
                let mut res = inner.await?;
                debug!(status = res.status().as_u16(), "request finished");
                match HeaderValue::from_str(&header_value) {
                    Ok(value) => {
                        res.response_mut()
                            .headers_mut()
                            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                    }
                    Err(error) => {
                        error!(%error, "failed to encode trace identifier header");
                    }
                }
                Ok(res)
            })
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Error;
    use crate::inbound::http::error::ErrorEnvelope;
    use actix_web::{App, HttpResponse, test, web};

    async fn call_traced<F, Fut, Res>(handler: F) -> (ServiceResponse, String)
    where
        F: Fn() -> Fut + Clone + 'static,
        Fut: std::future::Future<Output = Res> + 'static,
        Res: actix_web::Responder + 'static,
    {
        let app =
            test::init_service(App::new().wrap(Trace).route("/", web::get().to(handler))).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let trace_id = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("header is ascii")
            .to_owned();
        (res, trace_id)
    }

    #[actix_web::test]
    async fn handler_sees_the_header_trace_id() {
        let (res, trace_id) = call_traced(|| async move {
            let id = TraceId::current().expect("trace id in scope");
            HttpResponse::Ok().body(id.to_string())
        })
        .await;
        let body = test::read_body(res).await;
        assert_eq!(std::str::from_utf8(&body).expect("utf8 body"), trace_id);
    }

    #[actix_web::test]
    async fn error_bodies_carry_the_trace_id() {
        let (res, trace_id) = call_traced(|| async move {
            Err::<HttpResponse, Error>(Error::not_found("route zz99 not found"))
        })
        .await;
        let body: ErrorEnvelope = test::read_body_json(res).await;
        assert_eq!(body.trace_id.as_deref(), Some(trace_id.as_str()));
        assert!(!body.success);
    }

    #[actix_web::test]
    async fn each_request_gets_a_fresh_id() {
        let (_, first) = call_traced(|| async { HttpResponse::Ok().finish() }).await;
        let (_, second) = call_traced(|| async { HttpResponse::Ok().finish() }).await;
        assert_ne!(first, second);
    }
}
