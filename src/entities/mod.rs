mod location;
mod place;
mod user;

pub use location::Coordinates;
pub use place::{NewPlace, Place, PlaceUpdate};
pub use user::User;
