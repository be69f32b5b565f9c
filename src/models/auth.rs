//! JWT claims issued by the auth service and the Actix extractor for them.

use actix_identity::Identity;
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{FromRequest, HttpRequest, web};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::models::config::ServerConfig;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    /// Auth service subject, stable per user.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub church_id: i32,
    pub roles: Vec<String>,
    pub exp: usize,
}

impl AuthenticatedUser {
    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let decoded = decode::<AuthenticatedUser>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(decoded.claims)
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let token = match Identity::from_request(req, payload).into_inner() {
            Ok(identity) => identity.id().ok(),
            Err(_) => None,
        }
        .or_else(|| bearer_token(req));

        let result = match (token, req.app_data::<web::Data<ServerConfig>>()) {
            (Some(token), Some(config)) => {
                AuthenticatedUser::from_jwt(&token, &config.secret).map_err(|e| {
                    log::debug!("Rejecting invalid JWT: {e}");
                    ErrorUnauthorized("invalid token")
                })
            }
            _ => Err(ErrorUnauthorized("missing token")),
        };

        std::future::ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "u1".to_string(),
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            church_id: 1,
            roles: vec!["church".to_string(), "church_admin".to_string()],
            exp: usize::MAX,
        }
    }

    #[test]
    fn jwt_round_trip_preserves_claims() {
        let user = sample_user();
        let token = user.to_jwt("secret").unwrap();
        let decoded = AuthenticatedUser::from_jwt(&token, "secret").unwrap();
        assert_eq!(decoded, user);
    }

    #[test]
    fn jwt_with_wrong_secret_is_rejected() {
        let token = sample_user().to_jwt("secret").unwrap();
        assert!(AuthenticatedUser::from_jwt(&token, "other").is_err());
    }
}
