use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::auth::AuthUser;
use crate::db::{self, DbPool};
use crate::dto::{FavoriteMovieRequest, FavoriteMovieResponse, FavoriteRequest, FavoriteResponse};
use crate::errors::Result;

#[get("/favorite/")]
pub async fn list_favorites(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let lists = db::run(&pool, db::favorites::list_favorites).await?;
    let body: Vec<FavoriteResponse> = lists.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[post("/favorite/")]
pub async fn create_favorite(
    pool: web::Data<DbPool>,
    user: web::ReqData<AuthUser>,
    body: Option<web::Json<FavoriteRequest>>,
) -> Result<HttpResponse> {
    let new_favorite = body
        .map(web::Json::into_inner)
        .unwrap_or_default()
        .into_new(user.user_id);
    let list = db::run(&pool, move |conn| {
        let favorite = db::favorites::create_favorite(conn, new_favorite)?;
        db::favorites::get_favorite(conn, favorite.id)
    })
    .await?;
    Ok(HttpResponse::Created().json(FavoriteResponse::from(list)))
}

#[get("/favorite/{id}/")]
pub async fn get_favorite(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let list = db::run(&pool, move |conn| db::favorites::get_favorite(conn, id)).await?;
    Ok(HttpResponse::Ok().json(FavoriteResponse::from(list)))
}

#[put("/favorite/{id}/")]
pub async fn update_favorite(
    pool: web::Data<DbPool>,
    user: web::ReqData<AuthUser>,
    path: web::Path<i32>,
    body: web::Json<FavoriteRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let changes = body.into_inner().into_new(user.user_id);
    let list = db::run(&pool, move |conn| {
        db::favorites::update_favorite(conn, id, changes)?;
        db::favorites::get_favorite(conn, id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(FavoriteResponse::from(list)))
}

#[delete("/favorite/{id}/")]
pub async fn delete_favorite(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    db::run(&pool, move |conn| db::favorites::delete_favorite(conn, id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/favorite_movie/")]
pub async fn list_favorite_movies(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let entries = db::run(&pool, db::favorites::list_favorite_movies).await?;
    let body: Vec<FavoriteMovieResponse> = entries.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Without an explicit `cart` the movie goes to the caller's own list.
#[post("/favorite_movie/")]
pub async fn create_favorite_movie(
    pool: web::Data<DbPool>,
    user: web::ReqData<AuthUser>,
    body: web::Json<FavoriteMovieRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    let user_id = user.user_id;
    let entry = db::run(&pool, move |conn| {
        let cart_id = match request.cart {
            Some(cart_id) => cart_id,
            None => db::favorites::favorite_for_user(conn, user_id)?.id,
        };
        db::favorites::create_favorite_movie(conn, request.into_new(cart_id))
    })
    .await?;
    Ok(HttpResponse::Created().json(FavoriteMovieResponse::from(entry)))
}

#[get("/favorite_movie/{id}/")]
pub async fn get_favorite_movie(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let entry = db::run(&pool, move |conn| db::favorites::get_favorite_movie(conn, id)).await?;
    Ok(HttpResponse::Ok().json(FavoriteMovieResponse::from(entry)))
}

#[put("/favorite_movie/{id}/")]
pub async fn update_favorite_movie(
    pool: web::Data<DbPool>,
    user: web::ReqData<AuthUser>,
    path: web::Path<i32>,
    body: web::Json<FavoriteMovieRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let request = body.into_inner();
    let user_id = user.user_id;
    let entry = db::run(&pool, move |conn| {
        let cart_id = match request.cart {
            Some(cart_id) => cart_id,
            None => db::favorites::favorite_for_user(conn, user_id)?.id,
        };
        db::favorites::update_favorite_movie(conn, id, request.into_new(cart_id))
    })
    .await?;
    Ok(HttpResponse::Ok().json(FavoriteMovieResponse::from(entry)))
}

#[delete("/favorite_movie/{id}/")]
pub async fn delete_favorite_movie(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    db::run(&pool, move |conn| db::favorites::delete_favorite_movie(conn, id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
