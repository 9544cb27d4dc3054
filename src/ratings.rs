use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::auth::AuthUser;
use crate::db::{self, DbPool};
use crate::dto::{RatingRequest, RatingResponse};
use crate::errors::Result;

#[get("/rating/")]
pub async fn list_ratings(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let ratings = db::run(&pool, db::ratings::list_ratings).await?;
    let body: Vec<RatingResponse> = ratings.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[post("/rating/")]
pub async fn create_rating(
    pool: web::Data<DbPool>,
    user: web::ReqData<AuthUser>,
    body: web::Json<RatingRequest>,
) -> Result<HttpResponse> {
    let new_rating = body.into_inner().into_new(user.user_id)?;
    let rating = db::run(&pool, move |conn| db::ratings::create_rating(conn, new_rating)).await?;
    log::info!("user {} rated movie {}", rating.user_id, rating.movie_id);
    Ok(HttpResponse::Created().json(RatingResponse::from(rating)))
}

#[get("/rating/{id}/")]
pub async fn get_rating(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let rating = db::run(&pool, move |conn| db::ratings::get_rating(conn, id)).await?;
    Ok(HttpResponse::Ok().json(RatingResponse::from(rating)))
}

#[get("/rating/{id}/replies/")]
pub async fn list_replies(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let replies = db::run(&pool, move |conn| db::ratings::list_replies(conn, id)).await?;
    let body: Vec<RatingResponse> = replies.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[put("/rating/{id}/")]
pub async fn update_rating(
    pool: web::Data<DbPool>,
    user: web::ReqData<AuthUser>,
    path: web::Path<i32>,
    body: web::Json<RatingRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let changes = body.into_inner().into_new(user.user_id)?;
    let rating = db::run(&pool, move |conn| db::ratings::update_rating(conn, id, changes)).await?;
    Ok(HttpResponse::Ok().json(RatingResponse::from(rating)))
}

#[delete("/rating/{id}/")]
pub async fn delete_rating(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    db::run(&pool, move |conn| db::ratings::delete_rating(conn, id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
