use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Coordinates;
use crate::error::Error;

const MIN_DESCRIPTION_LENGTH: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub location: Coordinates,
    pub image: String,
    pub creator: Uuid,
}

impl Place {
    pub fn new(input: NewPlace, location: Coordinates, image: String, creator: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            address: input.address,
            location,
            image,
            creator,
        }
    }

    pub fn apply(&mut self, update: PlaceUpdate) {
        self.title = update.title;
        self.description = update.description;
    }
}

impl PolarClass for Place {
    fn get_polar_class_builder() -> oso::ClassBuilder<Place> {
        oso::Class::builder()
            .name("Place")
            .add_attribute_getter("creator", |recv: &Place| recv.creator.to_string())
    }

    fn get_polar_class() -> oso::Class {
        let builder = Place::get_polar_class_builder();
        builder.build()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewPlace {
    pub title: String,
    pub description: String,
    pub address: String,
}

impl NewPlace {
    pub fn validate(&self) -> Result<(), Error> {
        if is_blank(&self.title) || is_short(&self.description) || is_blank(&self.address) {
            return Err(Self::invalid());
        }

        Ok(())
    }

    /// Rejection for a create form that is missing or malformed.
    pub fn invalid() -> Error {
        Error::unprocessable(
            "Invalid inputs passed: title, description or address. Please, check your data!",
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaceUpdate {
    pub title: String,
    pub description: String,
}

impl PlaceUpdate {
    pub fn validate(&self) -> Result<(), Error> {
        if is_blank(&self.title) || is_short(&self.description) {
            return Err(Self::invalid());
        }

        Ok(())
    }

    pub fn invalid() -> Error {
        Error::unprocessable("Invalid inputs passed: title, description. Please, check your data!")
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_short(value: &str) -> bool {
    value.trim().chars().count() < MIN_DESCRIPTION_LENGTH
}
