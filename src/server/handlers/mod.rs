pub mod places;

use crate::error::Error;

pub async fn not_found() -> Error {
    Error::not_found("Could not find this route.")
}
