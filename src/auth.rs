//! Bearer-token authentication for the API.
//!
//! The identity service that registers users and verifies credentials lives
//! outside this crate; all this module does is validate the signed token it
//! issues and recover the owner ID that scopes every query. [issue_token] is
//! the counterpart used by that service (and by tests and the `mint_token`
//! utility binary).

use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejectionReason,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, models::OwnerID};

/// How long issued bearer tokens remain valid.
pub const TOKEN_DURATION: Duration = Duration::days(1);

/// The keys used to sign and verify bearer tokens, derived from a shared
/// secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenKeys {
    /// Derive signing and verification keys from `secret`.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }
}

/// The contents of a bearer token.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// The owner the token was issued to.
    pub sub: i64,
    /// The time the token was issued, as a unix timestamp.
    pub iat: i64,
    /// The expiry time of the token, as a unix timestamp.
    pub exp: i64,
}

impl Claims {
    /// The owner that requests carrying this token act on behalf of.
    pub fn owner(&self) -> OwnerID {
        OwnerID::new(self.sub)
    }
}

impl<S> FromRequestParts<S> for Claims
where
    TokenKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|rejection| match rejection.reason() {
                TypedHeaderRejectionReason::Missing => Error::MissingToken,
                _ => Error::InvalidToken,
            })?;

        let keys = TokenKeys::from_ref(state);

        decode_token(bearer.token(), &keys)
    }
}

/// Create a signed bearer token for `owner`, valid for [TOKEN_DURATION].
///
/// # Errors
/// Returns an [Error::TokenCreation] if the claims could not be signed.
pub fn issue_token(owner: OwnerID, keys: &TokenKeys) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: owner.as_i64(),
        iat: now.unix_timestamp(),
        exp: (now + TOKEN_DURATION).unix_timestamp(),
    };

    encode(&Header::default(), &claims, &keys.encoding_key)
        .map_err(|error| Error::TokenCreation(error.to_string()))
}

fn decode_token(token: &str, keys: &TokenKeys) -> Result<Claims, Error> {
    decode::<Claims>(token, &keys.decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|_| Error::InvalidToken)
}
