mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Place, User};
use crate::error::Error;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Document storage for users and places.
///
/// `create_place` and `delete_place` touch both the place document and the
/// creator's place list; implementations must apply both writes or neither.
#[async_trait]
pub trait Store {
    async fn insert_user(&self, user: &User) -> Result<(), Error>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, Error>;

    async fn find_place(&self, id: Uuid) -> Result<Option<Place>, Error>;

    async fn find_places_by_creator(&self, creator: Uuid) -> Result<Vec<Place>, Error>;

    /// Overwrites an existing place document. Fails with not found if the
    /// place is gone.
    async fn update_place(&self, place: &Place) -> Result<(), Error>;

    async fn create_place(&self, place: &Place) -> Result<(), Error>;

    async fn delete_place(&self, place: &Place) -> Result<(), Error>;
}

pub type DynStore = Arc<dyn Store + Send + Sync>;
