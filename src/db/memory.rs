use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::Store;
use crate::{
    entities::{Place, User},
    error::Error,
};

#[derive(Clone, Default)]
struct Documents {
    users: HashMap<Uuid, User>,
    places: HashMap<Uuid, Place>,
}

/// In-process store with the same all-or-nothing contract as [`super::PgStore`].
///
/// Multi-document writes are applied to a staged copy and swapped in only
/// once every step succeeded. `fail_user_writes` makes the user step of those
/// writes fail, which is how rollback is exercised.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<Documents>,
    fail_user_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_user_writes(&self, fail: bool) {
        self.fail_user_writes.store(fail, Ordering::SeqCst);
    }

    fn write_user(&self, documents: &mut Documents, user: User) -> Result<(), Error> {
        if self.fail_user_writes.load(Ordering::SeqCst) {
            tracing::warn!(user = %user.id, "simulated user write failure");
            return Err(Error::internal("user write failed"));
        }

        documents.users.insert(user.id, user);

        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), Error> {
        let mut documents = self.documents.lock().await;

        if documents.users.contains_key(&user.id) {
            return Err(Error::internal("user already exists"));
        }

        documents.users.insert(user.id, user.clone());

        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, Error> {
        Ok(self.documents.lock().await.users.get(&id).cloned())
    }

    async fn find_place(&self, id: Uuid) -> Result<Option<Place>, Error> {
        Ok(self.documents.lock().await.places.get(&id).cloned())
    }

    async fn find_places_by_creator(&self, creator: Uuid) -> Result<Vec<Place>, Error> {
        let documents = self.documents.lock().await;

        Ok(documents
            .places
            .values()
            .filter(|place| place.creator == creator)
            .cloned()
            .collect())
    }

    async fn update_place(&self, place: &Place) -> Result<(), Error> {
        let mut documents = self.documents.lock().await;

        match documents.places.get_mut(&place.id) {
            Some(stored) => {
                *stored = place.clone();
                Ok(())
            }
            None => Err(Error::not_found("place no longer exists")),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn create_place(&self, place: &Place) -> Result<(), Error> {
        let mut documents = self.documents.lock().await;
        let mut staged = documents.clone();

        if staged.places.insert(place.id, place.clone()).is_some() {
            return Err(Error::internal("place already exists"));
        }

        let mut user = staged
            .users
            .get(&place.creator)
            .cloned()
            .ok_or_else(|| Error::not_found("user does not exist"))?;
        user.add_place(place.id);
        self.write_user(&mut staged, user)?;

        *documents = staged;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_place(&self, place: &Place) -> Result<(), Error> {
        let mut documents = self.documents.lock().await;
        let mut staged = documents.clone();

        if staged.places.remove(&place.id).is_none() {
            return Err(Error::not_found("place no longer exists"));
        }

        let mut user = staged
            .users
            .get(&place.creator)
            .cloned()
            .ok_or_else(|| Error::not_found("user does not exist"))?;
        user.remove_place(place.id);
        self.write_user(&mut staged, user)?;

        *documents = staged;

        Ok(())
    }
}
