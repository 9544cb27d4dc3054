use actix_web::dev::ServiceRequest;
use actix_web::{web, Error, HttpMessage};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use anyhow::anyhow;
use bcrypt::{hash, verify};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Settings;
use crate::db::{self, DbPool};
use crate::errors::ApiError;

const ISSUER: &str = "MovieCatalogBackend";
const SUBJECT: &str = "MovieCatalogClient";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub exp: i64,
    pub iss: String,
    pub sub: String,
    pub user_id: i32,
    pub connection_id: Uuid,
    pub kind: TokenKind,
}

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Identity attached to a request by [`validator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i32,
    pub connection_id: Uuid,
}

pub fn generate_tokens(
    settings: &Settings,
    user_id: i32,
    connection_id: Uuid,
) -> anyhow::Result<TokenPair> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(settings.secret.as_ref());
    let now = chrono::Utc::now();

    let expiration_access = now + chrono::Duration::seconds(settings.access_token_exp_sec);
    let claims = TokenClaims {
        sub: SUBJECT.to_string(),
        iss: ISSUER.to_string(),
        exp: expiration_access.timestamp(),
        user_id,
        connection_id,
        kind: TokenKind::Access,
    };
    let access_token = encode(&header, &claims, &key).map_err(|e| anyhow!("{}", e))?;

    let expiration_refresh = now + chrono::Duration::days(settings.refresh_token_exp_day);
    let claims = TokenClaims {
        exp: expiration_refresh.timestamp(),
        kind: TokenKind::Refresh,
        ..claims
    };
    let refresh_token = encode(&header, &claims, &key).map_err(|e| anyhow!("{}", e))?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        expires_in: expiration_access.timestamp() - now.timestamp(),
    })
}

/// Decodes a token and checks its signature, expiry, issuer and kind.
pub fn get_claims_and_validate(
    settings: &Settings,
    token: &str,
    expected: TokenKind,
) -> Result<TokenClaims, ApiError> {
    let token = token.trim_start_matches("Bearer ").trim();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    let claims = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_ref()),
        &validation,
    )
    .map_err(|e| {
        log::debug!("rejected token: {}", e);
        ApiError::InvalidToken
    })?
    .claims;

    if claims.kind != expected {
        return Err(ApiError::InvalidToken);
    }
    Ok(claims)
}

pub fn hash_password(password: &str, cost: u32) -> anyhow::Result<String> {
    hash(password, cost).map_err(|e| anyhow!("Failed to hash password: {}", e))
}

pub fn verify_password(password: &str, hashed: &str) -> bool {
    verify(password, hashed).unwrap_or(false)
}

/// Bearer middleware body: the access token must be valid and its connection still open.
pub async fn validator(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let state = (
        req.app_data::<web::Data<Settings>>().cloned(),
        req.app_data::<web::Data<DbPool>>().cloned(),
    );
    let (Some(settings), Some(pool)) = state else {
        let err = ApiError::InternalError(anyhow!("auth state is not configured"));
        return Err((err.into(), req));
    };

    let claims = match get_claims_and_validate(&settings, credentials.token(), TokenKind::Access)
    {
        Ok(claims) => claims,
        Err(e) => return Err((e.into(), req)),
    };

    let (user_id, connection_id) = (claims.user_id, claims.connection_id);
    let open = db::run(&pool, move |conn| {
        db::users::validate_connection(conn, user_id, connection_id)
    })
    .await;
    if let Err(e) = open {
        return Err((e.into(), req));
    }

    req.extensions_mut().insert(AuthUser {
        user_id,
        connection_id,
    });
    Ok(req)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_validate_tokens() {
        let settings = Settings::for_tests();
        let connection_id = Uuid::new_v4();
        let pair = generate_tokens(&settings, 42, connection_id).unwrap();

        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());
        assert_ne!(pair.access_token, pair.refresh_token);
        assert_eq!(pair.expires_in, settings.access_token_exp_sec);

        let claims =
            get_claims_and_validate(&settings, &pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.connection_id, connection_id);

        let claims =
            get_claims_and_validate(&settings, &pair.refresh_token, TokenKind::Refresh).unwrap();
        assert_eq!(claims.kind, TokenKind::Refresh);
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let settings = Settings::for_tests();
        let pair = generate_tokens(&settings, 1, Uuid::new_v4()).unwrap();

        assert!(matches!(
            get_claims_and_validate(&settings, &pair.refresh_token, TokenKind::Access),
            Err(ApiError::InvalidToken)
        ));
        assert!(matches!(
            get_claims_and_validate(&settings, &pair.access_token, TokenKind::Refresh),
            Err(ApiError::InvalidToken)
        ));
    }

    #[test]
    fn test_bearer_prefix_is_accepted() {
        let settings = Settings::for_tests();
        let pair = generate_tokens(&settings, 7, Uuid::new_v4()).unwrap();
        let header = format!("Bearer {}", pair.access_token);
        assert!(get_claims_and_validate(&settings, &header, TokenKind::Access).is_ok());
    }

    #[test]
    fn test_wrong_secret_and_expired_tokens_are_rejected() {
        let settings = Settings::for_tests();
        let pair = generate_tokens(&settings, 1, Uuid::new_v4()).unwrap();
        let other = Settings {
            secret: "another-secret".to_string(),
            ..Settings::for_tests()
        };
        assert!(get_claims_and_validate(&other, &pair.access_token, TokenKind::Access).is_err());

        let expired = Settings {
            access_token_exp_sec: -3600,
            ..Settings::for_tests()
        };
        let pair = generate_tokens(&expired, 1, Uuid::new_v4()).unwrap();
        assert!(get_claims_and_validate(&expired, &pair.access_token, TokenKind::Access).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let settings = Settings::for_tests();
        assert!(matches!(
            get_claims_and_validate(&settings, "invalid.token.here", TokenKind::Access),
            Err(ApiError::InvalidToken)
        ));
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hashed = hash_password("SuperSecure123!", 4).unwrap();
        assert_ne!(hashed, "SuperSecure123!");
        assert!(verify_password("SuperSecure123!", &hashed));
        assert!(!verify_password("wrong", &hashed));
        assert!(!verify_password("SuperSecure123!", "not-a-bcrypt-hash"));
    }
}
