use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, types::Json, Executor, Pool, Postgres, Row, Transaction};
use uuid::Uuid;

use super::Store;
use crate::{
    entities::{Place, User},
    error::Error,
};

type Database = Postgres;

/// Postgres-backed store keeping each user and place as a JSONB document.
pub struct PgStore {
    pool: Pool<Database>,
}

impl PgStore {
    #[tracing::instrument(name = "PgStore::new", skip(db_uri))]
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        pool.execute("CREATE TABLE IF NOT EXISTS users (id UUID PRIMARY KEY, data JSONB NOT NULL)")
            .await?;
        pool.execute("CREATE TABLE IF NOT EXISTS places (id UUID PRIMARY KEY, creator UUID NOT NULL, data JSONB NOT NULL)")
            .await?;
        pool.execute("CREATE INDEX IF NOT EXISTS places_creator_idx ON places (creator)")
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for PgStore {
    #[tracing::instrument(skip(self))]
    async fn insert_user(&self, user: &User) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query("INSERT INTO users (id, data) VALUES ($1, $2)")
                .bind(&user.id)
                .bind(Json(user)),
        )
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT data FROM users WHERE id = $1").bind(&id))
            .await?;

        match maybe_result {
            Some(result) => {
                let Json(user): Json<User> = result.try_get("data")?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_place(&self, id: Uuid) -> Result<Option<Place>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT data FROM places WHERE id = $1").bind(&id))
            .await?;

        match maybe_result {
            Some(result) => {
                let Json(place): Json<Place> = result.try_get("data")?;
                Ok(Some(place))
            }
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_places_by_creator(&self, creator: Uuid) -> Result<Vec<Place>, Error> {
        let mut conn = self.pool.acquire().await?;

        let results = conn
            .fetch_all(sqlx::query("SELECT data FROM places WHERE creator = $1").bind(&creator))
            .await?;

        let mut places = Vec::with_capacity(results.len());

        for result in results.iter() {
            let Json(place): Json<Place> = result.try_get("data")?;
            places.push(place);
        }

        Ok(places)
    }

    #[tracing::instrument(skip(self))]
    async fn update_place(&self, place: &Place) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        let result = conn
            .execute(
                sqlx::query("UPDATE places SET data = $2 WHERE id = $1")
                    .bind(&place.id)
                    .bind(Json(place)),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("place no longer exists"));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn create_place(&self, place: &Place) -> Result<(), Error> {
        let mut tx = self.pool.begin().await?;

        tx.execute(
            sqlx::query("INSERT INTO places (id, creator, data) VALUES ($1, $2, $3)")
                .bind(&place.id)
                .bind(&place.creator)
                .bind(Json(place)),
        )
        .await?;

        let mut user = fetch_user_for_update(&mut tx, &place.creator).await?;
        user.add_place(place.id);
        update_user(&mut tx, &user).await?;

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_place(&self, place: &Place) -> Result<(), Error> {
        let mut tx = self.pool.begin().await?;

        let result = tx
            .execute(sqlx::query("DELETE FROM places WHERE id = $1").bind(&place.id))
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("place no longer exists"));
        }

        let mut user = fetch_user_for_update(&mut tx, &place.creator).await?;
        user.remove_place(place.id);
        update_user(&mut tx, &user).await?;

        tx.commit().await?;

        Ok(())
    }
}

#[tracing::instrument(skip(tx))]
async fn fetch_user_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<User, Error> {
    let Json(user): Json<User> = tx
        .fetch_optional(sqlx::query("SELECT data FROM users WHERE id = $1 FOR UPDATE").bind(id))
        .await?
        .ok_or_else(|| Error::not_found("user does not exist"))?
        .try_get("data")?;

    Ok(user)
}

#[tracing::instrument(skip(tx))]
async fn update_user(tx: &mut Transaction<'_, Database>, user: &User) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE users SET data = $2 WHERE id = $1")
            .bind(&user.id)
            .bind(Json(user)),
    )
    .await?;

    Ok(())
}
