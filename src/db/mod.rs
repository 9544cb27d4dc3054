//! Repository functions. Every function takes the connection it runs on; callers
//! decide the transaction scope.

use actix_web::web;
use diesel::r2d2::ConnectionManager;
use diesel::{Connection, PgConnection};
use r2d2::Pool;

use crate::config::Settings;
use crate::errors::ApiError;

pub mod catalog;
pub mod favorites;
pub mod history;
pub mod movies;
pub mod ratings;
pub mod users;

#[cfg(test)]
pub mod test_support;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

pub fn build_pool(settings: &Settings) -> Result<DbPool, r2d2::Error> {
    let manager = ConnectionManager::<PgConnection>::new(&settings.database_url);
    Pool::builder().max_size(settings.pool_size).build(manager)
}

/// Runs `f` on a pooled connection inside `web::block`. The whole closure is
/// one transaction, so a failing request leaves nothing behind.
pub async fn run<F, T>(pool: &web::Data<DbPool>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut PgConnection) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    web::block(move || {
        let mut conn = pool.get()?;
        atomic(&mut conn, f)
    })
    .await?
}

pub(crate) fn atomic<F, T>(conn: &mut PgConnection, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut PgConnection) -> Result<T, ApiError>,
{
    conn.transaction(f)
}

/// Maps a zero-row update or delete to a not-found error.
pub(crate) fn expect_affected(rows: usize, entity: &'static str) -> Result<(), ApiError> {
    if rows == 0 {
        Err(ApiError::NotFound(entity))
    } else {
        Ok(())
    }
}

/// Narrows a generic diesel `NotFound` to the entity that was looked up.
pub(crate) fn not_found(entity: &'static str) -> impl Fn(diesel::result::Error) -> ApiError {
    move |e| match e {
        diesel::result::Error::NotFound => ApiError::NotFound(entity),
        other => ApiError::from(other),
    }
}
