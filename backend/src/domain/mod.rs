//! Domain primitives, services, and ports.
//!
//! Purpose: model delivery routes persisted on a flat key-value store and
//! implement every operation on them without knowledge of HTTP or of the
//! concrete store. Inbound adapters call the driving ports in [`ports`];
//! services reach the store and the extraction service through the driven
//! ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure taxonomy.
//! - RouteDocument / Order / RouteId / OrderIndex: the route record.
//! - StoreKey / KeyPrefix: the key layout shared by every record family.
//! - AccessGate / RouteWriteLocks: history secret check and per-route
//!   single-writer locks.
//! - *Service types: implementations of the driving ports.

mod access;
mod data_url;
mod delivery;
mod delivery_photo_service;
pub mod error;
mod extraction;
mod history;
mod history_index_service;
mod image_lifecycle_service;
mod keys;
pub mod ports;
mod receipt_analysis_service;
mod route;
mod route_document_service;
mod route_locks;
mod route_records;
mod trace_id;

pub use self::access::AccessGate;
pub use self::data_url::{DataUrl, DataUrlError, ImagePayload};
pub use self::delivery::{
    DELIVERY_PHOTO_URL_PREFIX, DeliveryPhotoReceipt, DeliveryPhotoRef, MAX_DELIVERY_PHOTOS,
};
pub use self::delivery_photo_service::DeliveryPhotoService;
pub use self::error::{DIAGNOSTIC_EXCERPT_LIMIT, Error, ErrorCode, TRACE_ID_HEADER, truncate_excerpt};
pub use self::extraction::{
    DEFAULT_EXTRACTION_PROMPT, ExtractedOrders, parse_extracted_orders, strip_code_fences,
};
pub use self::history::{HistoryDate, HistoryDateParseError, HistoryEntry};
pub use self::history_index_service::HistoryIndexService;
pub use self::image_lifecycle_service::{DEFAULT_DRAFT_TTL, ImageLifecycleService, ImageSource};
pub use self::keys::{KeyPrefix, StoreKey, StoreKeyValidationError};
pub use self::receipt_analysis_service::ReceiptAnalysisService;
pub use self::route::{
    NewOrder, Order, OrderIndex, OrderIndexParseError, OrderStatus, RouteDocument, RouteId,
    RouteIdValidationError,
};
pub use self::route_document_service::RouteDocumentService;
pub use self::route_locks::RouteWriteLocks;
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use routeslip::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::unauthorized("incorrect history password"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
