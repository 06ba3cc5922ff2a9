//! JWT claims stored in the identity cookie and the request extractor
//! handlers use to learn who is calling.

use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, FromRequest, HttpRequest, web};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::user::{Role, User};
use crate::models::config::ServerConfig;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    /// User id as a string, per JWT convention.
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub exp: usize,
}

impl AuthenticatedUser {
    pub fn new(user: &User, ttl_secs: i64) -> Self {
        let exp = Utc::now() + Duration::seconds(ttl_secs);
        Self {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            exp: exp.timestamp() as usize,
        }
    }

    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
            return ready(Err(ErrorUnauthorized("server configuration missing")));
        };
        let identity = match Identity::from_request(req, payload).into_inner() {
            Ok(identity) => identity,
            Err(_) => return ready(Err(ErrorUnauthorized("not signed in"))),
        };
        let token = match identity.id() {
            Ok(token) => token,
            Err(_) => return ready(Err(ErrorUnauthorized("corrupt identity"))),
        };
        match Self::from_jwt(&token, &config.secret) {
            Ok(user) => ready(Ok(user)),
            Err(_) => {
                // Expired or tampered token; drop the cookie so the next
                // request starts clean.
                identity.logout();
                ready(Err(ErrorUnauthorized("invalid token")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserType;

    fn sample_user(role: Role) -> User {
        User {
            id: 7,
            username: "gulnora".into(),
            email: None,
            role,
            user_type: UserType::Individual,
            fio: None,
            phone: None,
            address: None,
            company_name: None,
            inn: None,
            bank_details: None,
            legal_address: None,
            responsible_person: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn jwt_round_trip() {
        let claims = AuthenticatedUser::new(&sample_user(Role::Admin), 3600);
        let token = claims.to_jwt("secret").unwrap();
        let decoded = AuthenticatedUser::from_jwt(&token, "secret").unwrap();
        assert_eq!(decoded, claims);
        assert_eq!(decoded.user_id(), Some(7));
        assert!(decoded.role.is_admin());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = AuthenticatedUser::new(&sample_user(Role::Customer), 3600);
        let token = claims.to_jwt("secret").unwrap();
        assert!(AuthenticatedUser::from_jwt(&token, "other").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = AuthenticatedUser::new(&sample_user(Role::Customer), -3600);
        let token = claims.to_jwt("secret").unwrap();
        assert!(AuthenticatedUser::from_jwt(&token, "secret").is_err());
    }
}
