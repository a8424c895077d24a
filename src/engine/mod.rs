mod place_api;

use oso::Oso;

use crate::{
    api::API,
    auth::{authorizor, Caller},
    db::DynStore,
    entities::Place,
    error::Error,
    external::DynGeocoder,
    images::ImageStore,
};

/// Place service: lookups, ownership checks, geocoding and the transactional
/// place/user writes.
pub struct Engine {
    store: DynStore,
    geocoder: DynGeocoder,
    images: ImageStore,
    authorizor: Oso,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(store: DynStore, geocoder: DynGeocoder, images: ImageStore) -> Result<Self, Error> {
        Ok(Self {
            store,
            geocoder,
            images,
            authorizor: authorizor::new()?,
        })
    }
}

impl Engine {
    /// Fails with 401 unless the policy lets `caller` perform `action` on `place`.
    pub fn authorize(&self, caller: &Caller, action: &str, place: &Place) -> Result<(), Error> {
        if self
            .authorizor
            .is_allowed(caller.clone(), action.to_string(), place.clone())?
        {
            return Ok(());
        }

        tracing::info!(caller = %caller.id, place = %place.id, action, "caller is not the creator");

        Err(Error::unauthorized(format!(
            "You are not allowed to {} this place!",
            action
        )))
    }
}

impl API for Engine {}
