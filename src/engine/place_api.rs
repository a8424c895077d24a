use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::PlaceAPI,
    auth::Caller,
    entities::{Coordinates, NewPlace, Place, PlaceUpdate},
    error::Error,
    images::Upload,
};

#[async_trait]
impl PlaceAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn find_place(&self, id: Uuid) -> Result<Place, Error> {
        self.store
            .find_place(id)
            .await
            .map_err(|_| Error::internal("Something went wrong, could not find a place"))?
            .ok_or_else(|| Error::not_found("Could not find a place for provided id"))
    }

    #[tracing::instrument(skip(self))]
    async fn find_places_by_user(&self, user_id: Uuid) -> Result<Vec<Place>, Error> {
        let places = self
            .store
            .find_places_by_creator(user_id)
            .await
            .map_err(|_| Error::internal("Something went wrong, fetching failed!"))?;

        if places.is_empty() {
            return Err(Error::not_found(
                "Could not find places for the provided creator id!",
            ));
        }

        Ok(places)
    }

    #[tracing::instrument(skip(self, upload))]
    async fn create_place(
        &self,
        caller: Caller,
        input: NewPlace,
        upload: Upload,
    ) -> Result<Place, Error> {
        self.images.check(&upload)?;
        input.validate()?;

        let location = self.geocoder.resolve_address(&input.address).await?;

        let image = self.images.save(&upload).await?;

        let result = self.persist_new_place(&caller, input, location, image.clone()).await;

        if result.is_err() {
            self.images.remove(&image).await;
        }

        result
    }

    #[tracing::instrument(skip(self))]
    async fn update_place(
        &self,
        caller: Caller,
        id: Uuid,
        update: PlaceUpdate,
    ) -> Result<Place, Error> {
        update.validate()?;

        let mut place = self
            .store
            .find_place(id)
            .await
            .map_err(|_| Error::internal("Something went wrong, could not update a place!"))?
            .ok_or_else(|| Error::not_found("Could not find a place for the provided id!"))?;

        self.authorize(&caller, "edit", &place)?;

        place.apply(update);

        self.store.update_place(&place).await.map_err(|err| {
            tracing::error!(?err, "saving place failed");
            Error::internal("Updating place failed, please try again.")
        })?;

        Ok(place)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_place(&self, caller: Caller, id: Uuid) -> Result<(), Error> {
        let place = self
            .store
            .find_place(id)
            .await
            .map_err(|_| Error::internal("Something went wrong, could not delete a place!"))?
            .ok_or_else(|| Error::not_found("Could not find a place for the provided id!"))?;

        self.authorize(&caller, "delete", &place)?;

        self.store.delete_place(&place).await.map_err(|err| {
            tracing::error!(?err, "delete transaction failed");
            Error::internal("Deleting place failed, please try again.")
        })?;

        // the documents are gone at this point; a leftover file is only logged
        self.images.remove(&place.image).await;

        Ok(())
    }
}

impl Engine {
    async fn persist_new_place(
        &self,
        caller: &Caller,
        input: NewPlace,
        location: Coordinates,
        image: String,
    ) -> Result<Place, Error> {
        let place = Place::new(input, location, image, caller.id);

        let user = self
            .store
            .find_user(caller.id)
            .await
            .map_err(|_| Error::internal("Creating place failed, please try again."))?;

        if user.is_none() {
            return Err(Error::not_found("Could not find user provided by id."));
        }

        self.store.create_place(&place).await.map_err(|err| {
            tracing::error!(?err, "create transaction failed");
            Error::internal("Creating place failed, please try again.")
        })?;

        tracing::info!(place = %place.id, "place created");

        Ok(place)
    }
}
