//! Shared cache-control policies for HTTP handlers.

/// Stored images never change once written, so clients may keep them a day.
pub const PUBLIC_ONE_DAY: &str = "public, max-age=86400";

/// Build the cache-control header tuple for image responses.
pub const fn public_image_header() -> (&'static str, &'static str) {
    ("Cache-Control", PUBLIC_ONE_DAY)
}
