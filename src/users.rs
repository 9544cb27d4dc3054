use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::auth::{self, AuthUser, TokenKind};
use crate::config::Settings;
use crate::db::{self, DbPool};
use crate::dto::{
    LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, TokenResponse,
    UserProfileRequest, UserProfileResponse, UserResponse,
};
use crate::errors::Result;

async fn create_user(
    pool: &web::Data<DbPool>,
    settings: &Settings,
    request: RegisterRequest,
) -> Result<UserResponse> {
    let request = request.validated()?;
    let cost = settings.bcrypt_cost;
    let user = db::run(pool, move |conn| {
        let hashed = auth::hash_password(&request.password, cost)?;
        db::users::save_new_user(conn, request.into_new_user(hashed))
    })
    .await?;
    log::info!("registered user {} ({})", user.username, user.id);
    Ok(UserResponse::from(user))
}

#[post("/register/")]
pub async fn register_user(
    pool: web::Data<DbPool>,
    settings: web::Data<Settings>,
    new_user: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let user = create_user(&pool, &settings, new_user.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

#[post("/login/")]
pub async fn login(
    pool: web::Data<DbPool>,
    settings: web::Data<Settings>,
    login_request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let request = login_request.into_inner().validated()?;
    let (user, connection_id) = db::run(&pool, move |conn| {
        let user = db::users::login(conn, &request.username, &request.password)?;
        let connection_id = db::users::generate_new_connection(conn, user.id)?;
        Ok((user, connection_id))
    })
    .await?;

    let tokens = auth::generate_tokens(&settings, user.id, connection_id)?;
    log::info!("user {} logged in", user.id);
    Ok(HttpResponse::Ok().json(LoginResponse::new(user, tokens)))
}

#[post("/token/refresh/")]
pub async fn refresh_auth(
    pool: web::Data<DbPool>,
    settings: web::Data<Settings>,
    refresh_request: web::Json<RefreshRequest>,
) -> Result<HttpResponse> {
    let claims =
        auth::get_claims_and_validate(&settings, &refresh_request.refresh, TokenKind::Refresh)?;
    let user_id = claims.user_id;
    let connection_id = db::run(&pool, move |conn| {
        db::users::rotate_connection(conn, user_id, claims.connection_id)
    })
    .await?;

    let tokens = auth::generate_tokens(&settings, user_id, connection_id)?;
    Ok(HttpResponse::Ok().json(TokenResponse {
        access: tokens.access_token,
        refresh: tokens.refresh_token,
        expires_in: tokens.expires_in,
    }))
}

#[post("/logout/")]
pub async fn logout(pool: web::Data<DbPool>, user: web::ReqData<AuthUser>) -> Result<HttpResponse> {
    let AuthUser {
        user_id,
        connection_id,
    } = user.into_inner();
    db::run(&pool, move |conn| {
        db::users::end_connection(conn, user_id, connection_id)
    })
    .await?;
    log::info!("user {} logged out", user_id);
    Ok(HttpResponse::NoContent().finish())
}

#[get("/users/")]
pub async fn list_users(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let users = db::run(&pool, db::users::list_users).await?;
    let body: Vec<UserProfileResponse> = users.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[post("/users/")]
pub async fn create_user_profile(
    pool: web::Data<DbPool>,
    settings: web::Data<Settings>,
    new_user: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let user = create_user(&pool, &settings, new_user.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

#[get("/users/{id}/")]
pub async fn get_user(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let user = db::run(&pool, move |conn| db::users::get_user(conn, id)).await?;
    Ok(HttpResponse::Ok().json(UserProfileResponse::from(user)))
}

#[put("/users/{id}/")]
pub async fn update_user(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<UserProfileRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let changes = body.into_inner().into_changeset()?;
    let user = db::run(&pool, move |conn| db::users::update_profile(conn, id, changes)).await?;
    Ok(HttpResponse::Ok().json(UserProfileResponse::from(user)))
}

#[delete("/users/{id}/")]
pub async fn delete_user(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    db::run(&pool, move |conn| db::users::delete_user(conn, id)).await?;
    log::info!("deleted user {}", id);
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use uuid::Uuid;

    use super::*;
    use crate::db::test_support::{sample_user, test_connection};
    use crate::model::NewUser;

    #[test]
    fn test_login_response_shape() {
        let settings = Settings::for_tests();
        let Some(mut conn) = test_connection() else {
            return;
        };
        let hashed = auth::hash_password("there-is-no-spoon", settings.bcrypt_cost).unwrap();
        db::users::save_new_user(
            &mut conn,
            NewUser {
                password: hashed,
                ..sample_user("neo")
            },
        )
        .unwrap();

        let user = db::users::login(&mut conn, "neo", "there-is-no-spoon").unwrap();
        let connection_id = db::users::generate_new_connection(&mut conn, user.id).unwrap();
        let tokens = auth::generate_tokens(&settings, user.id, connection_id).unwrap();
        let body = serde_json::to_value(LoginResponse::new(user, tokens)).unwrap();

        let object = body.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["access", "refresh", "user"]);
        assert_eq!(
            body["user"],
            serde_json::json!({ "username": "neo", "email": "neo@example.com" })
        );

        let access = body["access"].as_str().unwrap();
        let claims = auth::get_claims_and_validate(&settings, access, TokenKind::Access).unwrap();
        assert_eq!(claims.connection_id, connection_id);
        let refresh = body["refresh"].as_str().unwrap();
        assert!(auth::get_claims_and_validate(&settings, refresh, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_login_response_carries_no_password() {
        let settings = Settings::for_tests();
        let user = crate::model::User {
            id: 3,
            username: "trinity".to_string(),
            email: "trinity@example.com".to_string(),
            password: "$2b$04$hash".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            age: Some(30),
            phone_number: None,
            status: "pro".to_string(),
            is_active: true,
            date_joined: chrono::Utc::now().naive_utc(),
        };
        let tokens = auth::generate_tokens(&settings, user.id, Uuid::new_v4()).unwrap();
        let body: Value = serde_json::to_value(LoginResponse::new(user, tokens)).unwrap();
        assert_eq!(body["user"]["username"], "trinity");
        assert!(body["user"].get("password").is_none());
        assert!(body.get("expires_in").is_none());
    }
}
