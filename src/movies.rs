use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::db::{self, DbPool};
use crate::dto::{
    self, MomentRequest, MomentResponse, MovieDetailResponse, MovieLanguageRequest,
    MovieLanguageResponse, MovieListResponse, MovieRequest,
};
use crate::errors::Result;

#[get("/")]
pub async fn list_movies(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let movies = db::run(&pool, db::movies::list_movies).await?;
    let body: Vec<MovieListResponse> = movies.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[post("/")]
pub async fn create_movie(
    pool: web::Data<DbPool>,
    body: web::Json<MovieRequest>,
) -> Result<HttpResponse> {
    let (new_movie, links) = body.into_inner().into_new(dto::today())?;
    let graph = db::run(&pool, move |conn| {
        let movie = db::movies::create_movie(conn, new_movie, links)?;
        db::movies::load_movie_graph(conn, movie.id)
    })
    .await?;
    log::info!("created movie {} ({})", graph.movie.movie_name, graph.movie.id);
    Ok(HttpResponse::Created().json(MovieDetailResponse::from(graph)))
}

#[get(r"/{id:\d+}/")]
pub async fn get_movie(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let graph = db::run(&pool, move |conn| db::movies::load_movie_graph(conn, id)).await?;
    Ok(HttpResponse::Ok().json(MovieDetailResponse::from(graph)))
}

#[put(r"/{id:\d+}/")]
pub async fn update_movie(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<MovieRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let (changes, links) = body.into_inner().into_new(dto::today())?;
    let graph = db::run(&pool, move |conn| {
        db::movies::update_movie(conn, id, changes, links)?;
        db::movies::load_movie_graph(conn, id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(MovieDetailResponse::from(graph)))
}

#[delete(r"/{id:\d+}/")]
pub async fn delete_movie(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    db::run(&pool, move |conn| db::movies::delete_movie(conn, id)).await?;
    log::info!("deleted movie {}", id);
    Ok(HttpResponse::NoContent().finish())
}

#[get("/languages/")]
pub async fn list_languages(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let languages = db::run(&pool, db::movies::list_languages).await?;
    let body: Vec<MovieLanguageResponse> = languages.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[post("/languages/")]
pub async fn create_language(
    pool: web::Data<DbPool>,
    body: web::Json<MovieLanguageRequest>,
) -> Result<HttpResponse> {
    let new_language = body.into_inner().into_new()?;
    let language =
        db::run(&pool, move |conn| db::movies::create_language(conn, new_language)).await?;
    Ok(HttpResponse::Created().json(MovieLanguageResponse::from(language)))
}

#[get("/languages/{id}/")]
pub async fn get_language(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let language = db::run(&pool, move |conn| db::movies::get_language(conn, id)).await?;
    Ok(HttpResponse::Ok().json(MovieLanguageResponse::from(language)))
}

#[put("/languages/{id}/")]
pub async fn update_language(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<MovieLanguageRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let changes = body.into_inner().into_new()?;
    let language =
        db::run(&pool, move |conn| db::movies::update_language(conn, id, changes)).await?;
    Ok(HttpResponse::Ok().json(MovieLanguageResponse::from(language)))
}

#[delete("/languages/{id}/")]
pub async fn delete_language(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    db::run(&pool, move |conn| db::movies::delete_language(conn, id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/moments/")]
pub async fn list_moments(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let moments = db::run(&pool, db::movies::list_moments).await?;
    let body: Vec<MomentResponse> = moments.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[post("/moments/")]
pub async fn create_moment(
    pool: web::Data<DbPool>,
    body: web::Json<MomentRequest>,
) -> Result<HttpResponse> {
    let new_moment = body.into_inner().into_new()?;
    let moment = db::run(&pool, move |conn| db::movies::create_moment(conn, new_moment)).await?;
    Ok(HttpResponse::Created().json(MomentResponse::from(moment)))
}

#[get("/moments/{id}/")]
pub async fn get_moment(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let moment = db::run(&pool, move |conn| db::movies::get_moment(conn, id)).await?;
    Ok(HttpResponse::Ok().json(MomentResponse::from(moment)))
}

#[put("/moments/{id}/")]
pub async fn update_moment(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<MomentRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let changes = body.into_inner().into_new()?;
    let moment = db::run(&pool, move |conn| db::movies::update_moment(conn, id, changes)).await?;
    Ok(HttpResponse::Ok().json(MomentResponse::from(moment)))
}

#[delete("/moments/{id}/")]
pub async fn delete_moment(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    db::run(&pool, move |conn| db::movies::delete_moment(conn, id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
