//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::{App, dev::ServiceResponse, test, web};

use super::configure_api;
use super::state::{HttpState, HttpStatePorts};
use crate::domain::AccessGate;
use crate::domain::ports::{
    MockDeliveryPhotos, MockHistoryIndex, MockImageLibrary, MockReceiptAnalysis,
    MockRouteDocuments,
};

/// Password configured on every test gate.
pub const TEST_PASSWORD: &str = "letmein";

/// Mocked ports; tests set expectations on the ones they exercise.
#[derive(Default)]
pub struct MockPorts {
    pub routes: MockRouteDocuments,
    pub images: MockImageLibrary,
    pub history: MockHistoryIndex,
    pub photos: MockDeliveryPhotos,
    pub analysis: MockReceiptAnalysis,
}

impl MockPorts {
    /// Build handler state guarded by [`TEST_PASSWORD`].
    pub fn into_state(self) -> HttpState {
        self.into_state_with(AccessGate::new(Some(TEST_PASSWORD.to_owned())))
    }

    pub fn into_state_with(self, access: AccessGate) -> HttpState {
        HttpState::new(
            HttpStatePorts {
                routes: Arc::new(self.routes),
                images: Arc::new(self.images),
                history: Arc::new(self.history),
                photos: Arc::new(self.photos),
                analysis: Arc::new(self.analysis),
            },
            access,
        )
    }
}

/// Send `request` through the `/api` scope backed by `state`.
pub async fn call_api(state: HttpState, request: test::TestRequest) -> ServiceResponse {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api").configure(configure_api)),
    )
    .await;
    test::call_service(&app, request.to_request()).await
}

const BOUNDARY: &str = "routeslip-test-boundary";

/// One part of a multipart test body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        mime_type: &'a str,
        bytes: &'a [u8],
    },
}

/// Build a `multipart/form-data` POST to `uri`.
pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> test::TestRequest {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                mime_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"upload\"\r\nContent-Type: {mime_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    test::TestRequest::post()
        .uri(uri)
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}
