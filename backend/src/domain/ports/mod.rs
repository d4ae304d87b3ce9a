//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (`KeyValueStore`, `ReceiptExtractor`) are implemented by
//! outbound adapters and expose typed adapter errors. Driving ports are
//! implemented by the domain services and consumed by inbound adapters; they
//! speak the domain [`Error`](crate::domain::Error).

mod macros;
pub(crate) use macros::define_port_error;

mod delivery_photos;
mod history_index;
mod image_library;
mod key_value_store;
mod receipt_analysis;
mod receipt_extractor;
mod route_documents;

pub use delivery_photos::DeliveryPhotos;
#[cfg(test)]
pub use delivery_photos::MockDeliveryPhotos;
pub use history_index::HistoryIndex;
#[cfg(test)]
pub use history_index::MockHistoryIndex;
pub use image_library::ImageLibrary;
#[cfg(test)]
pub use image_library::MockImageLibrary;
#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
pub use key_value_store::{KeyValueStore, KeyValueStoreError};
#[cfg(test)]
pub use receipt_analysis::MockReceiptAnalysis;
pub use receipt_analysis::{ReceiptAnalysis, ReceiptUpload};
#[cfg(test)]
pub use receipt_extractor::MockReceiptExtractor;
pub use receipt_extractor::{ReceiptExtractor, ReceiptExtractorError};
#[cfg(test)]
pub use route_documents::MockRouteDocuments;
pub use route_documents::RouteDocuments;
