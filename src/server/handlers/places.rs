use axum::extract::rejection::{JsonRejection, MultipartRejection};
use axum::extract::{Extension, Json, Multipart, Path};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::DynAPI;
use crate::auth::Caller;
use crate::entities::{NewPlace, Place, PlaceUpdate};
use crate::error::Error;
use crate::images::Upload;

#[derive(Serialize, Deserialize)]
pub struct PlaceResponse {
    pub place: Place,
}

#[derive(Serialize, Deserialize)]
pub struct PlacesResponse {
    pub places: Vec<Place>,
}

#[derive(Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateParams {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

fn place_id(raw: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw)
        .map_err(|_| Error::not_found("Could not find a place for the provided id!"))
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(pid): Path<String>,
) -> Result<Json<PlaceResponse>, Error> {
    let place = api.find_place(place_id(&pid)?).await?;

    Ok(PlaceResponse { place }.into())
}

pub async fn find_by_user(
    Extension(api): Extension<DynAPI>,
    Path(uid): Path<String>,
) -> Result<Json<PlacesResponse>, Error> {
    let user_id = Uuid::parse_str(&uid)
        .map_err(|_| Error::not_found("Could not find places for the provided creator id!"))?;

    let places = api.find_places_by_user(user_id).await?;

    Ok(PlacesResponse { places }.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Extension(caller): Extension<Caller>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<PlaceResponse>), Error> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(%rejection, "create body is not multipart");
        NewPlace::invalid()
    })?;

    let (input, upload) = read_place_form(multipart).await?;

    let place = api.create_place(caller, input, upload).await?;

    Ok((StatusCode::CREATED, PlaceResponse { place }.into()))
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Extension(caller): Extension<Caller>,
    Path(pid): Path<String>,
    params: Result<Json<UpdateParams>, JsonRejection>,
) -> Result<Json<PlaceResponse>, Error> {
    let Json(params) = params.map_err(|rejection| {
        tracing::debug!(%rejection, "update body rejected");
        PlaceUpdate::invalid()
    })?;

    let update = PlaceUpdate {
        title: params.title,
        description: params.description,
    };

    let place = api.update_place(caller, place_id(&pid)?, update).await?;

    Ok(PlaceResponse { place }.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Extension(caller): Extension<Caller>,
    Path(pid): Path<String>,
) -> Result<Json<MessageResponse>, Error> {
    api.delete_place(caller, place_id(&pid)?).await?;

    Ok(MessageResponse {
        message: "Deleted Successfully!".into(),
    }
    .into())
}

/// Splits the create form into text fields and the `image` file.
async fn read_place_form(mut multipart: Multipart) -> Result<(NewPlace, Upload), Error> {
    let mut title = String::new();
    let mut description = String::new();
    let mut address = String::new();
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "title" => title = field.text().await?,
            "description" => description = field.text().await?,
            "address" => address = field.text().await?,
            "image" => {
                let content_type = field
                    .content_type()
                    .map(|mime| mime.to_string())
                    .unwrap_or_default();
                let bytes = field.bytes().await?;

                upload = Some(Upload {
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => tracing::debug!(field = %name, "ignoring unexpected form field"),
        }
    }

    let upload = upload.ok_or_else(|| Error::unprocessable("No image provided."))?;

    Ok((
        NewPlace {
            title,
            description,
            address,
        },
        upload,
    ))
}
