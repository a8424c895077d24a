use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Caller;
use crate::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    exp: i64,
}

/// Verifies HS256 bearer tokens signed with the server secret.
///
/// The caller identity is trusted from the token payload alone; it is not
/// looked up in the datastore. Every rejection looks the same to the client.
pub struct Authenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Authenticator {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Caller, Error> {
        let value = headers
            .get(AUTHORIZATION)
            .ok_or_else(Error::authentication_failed)?
            .to_str()
            .map_err(|_| Error::authentication_failed())?;

        let token = value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(Error::authentication_failed)?;

        self.verify(token)
    }

    pub fn verify(&self, token: &str) -> Result<Caller, Error> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        let id = Uuid::parse_str(&data.claims.user_id).map_err(|_| Error::authentication_failed())?;

        Ok(Caller::new(id))
    }

    pub fn issue_token(
        &self,
        user_id: Uuid,
        email: Option<String>,
        ttl: Duration,
    ) -> Result<String, Error> {
        let claims = Claims {
            user_id: user_id.to_string(),
            email,
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|err| {
            tracing::error!(?err, "could not sign token");
            Error::internal("Signing token failed, please try again.")
        })
    }
}
