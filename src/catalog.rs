use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::db::{self, DbPool};
use crate::dto::{
    ActorDetailResponse, ActorListResponse, ActorRequest, CountryRequest, CountryResponse,
    DirectorDetailResponse, DirectorListResponse, DirectorRequest, JanreRequest, JanreResponse,
};
use crate::errors::Result;

#[get("/country/")]
pub async fn list_countries(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let countries = db::run(&pool, db::catalog::list_countries).await?;
    let body: Vec<CountryResponse> = countries.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[post("/country/")]
pub async fn create_country(
    pool: web::Data<DbPool>,
    body: web::Json<CountryRequest>,
) -> Result<HttpResponse> {
    let new_country = body.into_inner().into_new()?;
    let country =
        db::run(&pool, move |conn| db::catalog::create_country(conn, new_country)).await?;
    Ok(HttpResponse::Created().json(CountryResponse::from(country)))
}

#[get("/country/{id}/")]
pub async fn get_country(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let country = db::run(&pool, move |conn| db::catalog::get_country(conn, id)).await?;
    Ok(HttpResponse::Ok().json(CountryResponse::from(country)))
}

#[put("/country/{id}/")]
pub async fn update_country(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<CountryRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let changes = body.into_inner().into_new()?;
    let country =
        db::run(&pool, move |conn| db::catalog::update_country(conn, id, changes)).await?;
    Ok(HttpResponse::Ok().json(CountryResponse::from(country)))
}

#[delete("/country/{id}/")]
pub async fn delete_country(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    db::run(&pool, move |conn| db::catalog::delete_country(conn, id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/director/")]
pub async fn list_directors(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let directors = db::run(&pool, db::catalog::list_directors).await?;
    let body: Vec<DirectorListResponse> = directors.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[post("/director/")]
pub async fn create_director(
    pool: web::Data<DbPool>,
    body: web::Json<DirectorRequest>,
) -> Result<HttpResponse> {
    let new_director = body.into_inner().into_new()?;
    let director =
        db::run(&pool, move |conn| db::catalog::create_director(conn, new_director)).await?;
    Ok(HttpResponse::Created().json(DirectorDetailResponse::from(director)))
}

#[get("/director/{id}/")]
pub async fn get_director(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let director = db::run(&pool, move |conn| db::catalog::get_director(conn, id)).await?;
    Ok(HttpResponse::Ok().json(DirectorDetailResponse::from(director)))
}

#[put("/director/{id}/")]
pub async fn update_director(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<DirectorRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let changes = body.into_inner().into_new()?;
    let director =
        db::run(&pool, move |conn| db::catalog::update_director(conn, id, changes)).await?;
    Ok(HttpResponse::Ok().json(DirectorDetailResponse::from(director)))
}

#[delete("/director/{id}/")]
pub async fn delete_director(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    db::run(&pool, move |conn| db::catalog::delete_director(conn, id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/actor/")]
pub async fn list_actors(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let actors = db::run(&pool, db::catalog::list_actors).await?;
    let body: Vec<ActorListResponse> = actors.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[post("/actor/")]
pub async fn create_actor(
    pool: web::Data<DbPool>,
    body: web::Json<ActorRequest>,
) -> Result<HttpResponse> {
    let new_actor = body.into_inner().into_new()?;
    let actor = db::run(&pool, move |conn| db::catalog::create_actor(conn, new_actor)).await?;
    Ok(HttpResponse::Created().json(ActorDetailResponse::from(actor)))
}

#[get("/actor/{id}/")]
pub async fn get_actor(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let actor = db::run(&pool, move |conn| db::catalog::get_actor(conn, id)).await?;
    Ok(HttpResponse::Ok().json(ActorDetailResponse::from(actor)))
}

#[put("/actor/{id}/")]
pub async fn update_actor(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<ActorRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let changes = body.into_inner().into_new()?;
    let actor = db::run(&pool, move |conn| db::catalog::update_actor(conn, id, changes)).await?;
    Ok(HttpResponse::Ok().json(ActorDetailResponse::from(actor)))
}

#[delete("/actor/{id}/")]
pub async fn delete_actor(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    db::run(&pool, move |conn| db::catalog::delete_actor(conn, id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/janre/")]
pub async fn list_janres(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let janres = db::run(&pool, db::catalog::list_janres).await?;
    let body: Vec<JanreResponse> = janres.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[post("/janre/")]
pub async fn create_janre(
    pool: web::Data<DbPool>,
    body: web::Json<JanreRequest>,
) -> Result<HttpResponse> {
    let new_janre = body.into_inner().into_new()?;
    let janre = db::run(&pool, move |conn| db::catalog::create_janre(conn, new_janre)).await?;
    Ok(HttpResponse::Created().json(JanreResponse::from(janre)))
}

#[get("/janre/{id}/")]
pub async fn get_janre(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let janre = db::run(&pool, move |conn| db::catalog::get_janre(conn, id)).await?;
    Ok(HttpResponse::Ok().json(JanreResponse::from(janre)))
}

#[put("/janre/{id}/")]
pub async fn update_janre(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<JanreRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let changes = body.into_inner().into_new()?;
    let janre = db::run(&pool, move |conn| db::catalog::update_janre(conn, id, changes)).await?;
    Ok(HttpResponse::Ok().json(JanreResponse::from(janre)))
}

#[delete("/janre/{id}/")]
pub async fn delete_janre(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    db::run(&pool, move |conn| db::catalog::delete_janre(conn, id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
