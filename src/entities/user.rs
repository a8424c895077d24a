use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Owner of places. Users are registered elsewhere; this service only reads
/// them and maintains their `places` back-references.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub places: Vec<Uuid>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            image: String::new(),
            places: vec![],
        }
    }

    pub fn add_place(&mut self, place_id: Uuid) {
        if !self.places.contains(&place_id) {
            self.places.push(place_id);
        }
    }

    pub fn remove_place(&mut self, place_id: Uuid) {
        self.places.retain(|id| *id != place_id);
    }
}

#[test]
fn add_place_is_idempotent() {
    let mut user = User::new("Ada", "ada@example.com");
    let place_id = Uuid::new_v4();

    user.add_place(place_id);
    user.add_place(place_id);

    assert_eq!(user.places, vec![place_id]);
}

#[test]
fn remove_place_keeps_others() {
    let mut user = User::new("Ada", "ada@example.com");
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    user.add_place(a);
    user.add_place(b);

    user.remove_place(a);

    assert_eq!(user.places, vec![b]);
}
