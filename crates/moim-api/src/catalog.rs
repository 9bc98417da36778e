//! Handlers for `/catalog` vocabulary endpoints.
//!
//! Serve the wire names of each vocabulary enum so clients can render
//! pickers without hardcoding the variants.

use axum::Json;
use moim_core::party::{ActivityLocation, Category, ContactMethod, DurationUnit};
use strum::IntoEnumIterator;

fn names<T: IntoEnumIterator + ToString>() -> Json<Vec<String>> {
  Json(T::iter().map(|variant| variant.to_string()).collect())
}

/// `GET /catalog/categories`
pub async fn categories() -> Json<Vec<String>> { names::<Category>() }

/// `GET /catalog/locations`
pub async fn locations() -> Json<Vec<String>> { names::<ActivityLocation>() }

/// `GET /catalog/contact-methods`
pub async fn contact_methods() -> Json<Vec<String>> {
  names::<ContactMethod>()
}

/// `GET /catalog/duration-units`
pub async fn duration_units() -> Json<Vec<String>> { names::<DurationUnit>() }
