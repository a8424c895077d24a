use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::Caller;
use crate::entities::{NewPlace, Place, PlaceUpdate};
use crate::error::Error;
use crate::images::Upload;

#[async_trait]
pub trait PlaceAPI {
    async fn find_place(&self, id: Uuid) -> Result<Place, Error>;

    /// An empty result is reported as not found.
    async fn find_places_by_user(&self, user_id: Uuid) -> Result<Vec<Place>, Error>;

    async fn create_place(
        &self,
        caller: Caller,
        input: NewPlace,
        upload: Upload,
    ) -> Result<Place, Error>;

    async fn update_place(
        &self,
        caller: Caller,
        id: Uuid,
        update: PlaceUpdate,
    ) -> Result<Place, Error>;

    async fn delete_place(&self, caller: Caller, id: Uuid) -> Result<(), Error>;
}

pub trait API: PlaceAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
