use oso::{Oso, PolarClass};

use crate::auth::Caller;
use crate::entities::Place;
use crate::error::Error;

pub fn new() -> Result<Oso, Error> {
    let mut o = Oso::new();

    o.register_class(Caller::get_polar_class())?;
    o.register_class(Place::get_polar_class())?;

    o.load_str(include_str!("rules.polar"))?;

    Ok(o)
}

#[cfg(test)]
fn sample_place(creator: uuid::Uuid) -> Place {
    use crate::entities::{Coordinates, NewPlace};

    let input = NewPlace {
        title: "Empire State Building".into(),
        description: "One of the most famous sky scrapers in the world!".into(),
        address: "20 W 34th St, New York, NY 10001".into(),
    };
    let location = Coordinates {
        lat: 40.7484405,
        lng: -73.9878584,
    };

    Place::new(input, location, "uploads/images/esb.png".into(), creator)
}

#[test]
fn creator_can_edit_and_delete_test() {
    use uuid::Uuid;

    let authorizor = new().unwrap();

    let creator = Caller::new(Uuid::new_v4());
    let place = sample_place(creator.id);

    let result = authorizor.is_allowed(creator.clone(), "edit", place.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(creator.clone(), "delete", place.clone());
    assert_eq!(result.unwrap(), true);
}

#[test]
fn stranger_cannot_edit_or_delete_test() {
    use uuid::Uuid;

    let authorizor = new().unwrap();

    let stranger = Caller::new(Uuid::new_v4());
    let place = sample_place(Uuid::new_v4());

    let result = authorizor.is_allowed(stranger.clone(), "edit", place.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(stranger.clone(), "delete", place.clone());
    assert_eq!(result.unwrap(), false);
}

#[test]
fn unknown_action_is_denied_test() {
    use uuid::Uuid;

    let authorizor = new().unwrap();

    let creator = Caller::new(Uuid::new_v4());
    let place = sample_place(creator.id);

    let result = authorizor.is_allowed(creator.clone(), "transfer", place.clone());
    assert_eq!(result.unwrap(), false);
}
