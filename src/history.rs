use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::auth::AuthUser;
use crate::db::{self, DbPool};
use crate::dto::{HistoryRequest, HistoryResponse};
use crate::errors::Result;

#[get("/history/")]
pub async fn list_history(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let entries = db::run(&pool, db::history::list_history).await?;
    let body: Vec<HistoryResponse> = entries.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[post("/history/")]
pub async fn create_history(
    pool: web::Data<DbPool>,
    user: web::ReqData<AuthUser>,
    body: web::Json<HistoryRequest>,
) -> Result<HttpResponse> {
    let new_entry = body.into_inner().into_new(user.user_id);
    let entry = db::run(&pool, move |conn| db::history::create_history(conn, new_entry)).await?;
    Ok(HttpResponse::Created().json(HistoryResponse::from(entry)))
}

#[get("/history/{id}/")]
pub async fn get_history(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let entry = db::run(&pool, move |conn| db::history::get_history(conn, id)).await?;
    Ok(HttpResponse::Ok().json(HistoryResponse::from(entry)))
}

#[put("/history/{id}/")]
pub async fn update_history(
    pool: web::Data<DbPool>,
    user: web::ReqData<AuthUser>,
    path: web::Path<i32>,
    body: web::Json<HistoryRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let changes = body.into_inner().into_new(user.user_id);
    let entry = db::run(&pool, move |conn| db::history::update_history(conn, id, changes)).await?;
    Ok(HttpResponse::Ok().json(HistoryResponse::from(entry)))
}

#[delete("/history/{id}/")]
pub async fn delete_history(pool: web::Data<DbPool>, path: web::Path<i32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    db::run(&pool, move |conn| db::history::delete_history(conn, id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
