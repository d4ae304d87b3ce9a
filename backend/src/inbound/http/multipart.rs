//! Multipart form collection for image uploads.
//!
//! Both upload endpoints take one `image` file part plus a few short text
//! parts. The whole form is buffered with a byte limit; text parts are
//! decoded as UTF-8 and file parts keep their declared content type.

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures_util::StreamExt;

use super::validation::IMAGE;
use crate::domain::{Error, ImagePayload};

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Buffered multipart form.
#[derive(Debug, Default)]
pub struct UploadForm {
    image: Option<ImagePayload>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Drain `payload`, rejecting forms larger than `limit` bytes.
    pub async fn read(mut payload: Multipart, limit: usize) -> Result<Self, Error> {
        let mut form = Self::default();
        let mut total = 0_usize;

        while let Some(item) = payload.next().await {
            let mut field = item.map_err(malformed)?;
            let name = field.name().unwrap_or_default().to_owned();
            let is_file = field.content_disposition().and_then(|cd| cd.get_filename()).is_some();
            let mime_type = field
                .content_type()
                .map(|mime| mime.essence_str().to_owned())
                .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_owned());

            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk.map_err(malformed)?;
                total = total.saturating_add(chunk.len());
                if total > limit {
                    return Err(Error::invalid_request(format!(
                        "upload exceeds the {limit} byte limit"
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }

            if name == IMAGE.as_str() && is_file {
                form.image = Some(ImagePayload { mime_type, bytes });
            } else {
                let text = String::from_utf8(bytes).map_err(|_| {
                    Error::invalid_request(format!("field {name} must be UTF-8 text"))
                })?;
                form.fields.insert(name, text);
            }
        }
        Ok(form)
    }

    /// Take the uploaded image, failing when none was sent.
    pub fn take_image(&mut self) -> Result<ImagePayload, Error> {
        self.image
            .take()
            .filter(|image| !image.bytes.is_empty())
            .ok_or_else(|| Error::invalid_request("No image uploaded"))
    }

    /// Remove and return a text field.
    pub fn take_text(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }
}

fn malformed(err: actix_multipart::MultipartError) -> Error {
    Error::invalid_request(format!("malformed multipart body: {err}"))
}
