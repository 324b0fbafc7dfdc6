//! SQLite-backed store for the site's own data.
//!
//! - [`Store`] - Async handle used by the HTTP layer
//! - [`repositories`] - Synchronous queries over a `&Connection`
//! - [`ImageProvider`] - Dated uploads exposed as an event source

pub mod error;
mod image_provider;
pub mod repositories;
mod schema;
mod store;

pub use error::{StoreError, StoreResult};
pub use image_provider::{IMAGE_EVENT_TYPE, ImageProvider};
pub use repositories::{ImageRecord, NewImage, NewOrganization, Organization};
pub use store::Store;
