//! Dialogs domain: direct messages between two identities

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::Message;
pub use domain::validation::{is_identity_key, is_peer_id};

// Re-export repository types
pub use repository::{DialogStore, DialogStoreFactory, InMemoryDialogStore, PgDialogStore};

// Re-export API types
pub use api::errors::{InternalApiError, PublicApiError};
pub use api::routes::{internal_routes, public_routes};
pub use api::DialogsState;
