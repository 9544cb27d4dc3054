use diesel::{
    Connection, ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl,
    SelectableHelper,
};

use crate::db::{expect_affected, not_found};
use crate::errors::{ApiError, Result};
use crate::model::{Favorite, FavoriteMovie, Movie, NewFavorite, NewFavoriteMovie};
use crate::schema::{favorite_movies, favorites, movies};

/// A favorites list with its entries and the movies they point at.
#[derive(Debug, Clone)]
pub struct FavoriteWithItems {
    pub favorite: Favorite,
    pub items: Vec<(FavoriteMovie, Movie)>,
}

pub fn list_favorites(conn: &mut PgConnection) -> Result<Vec<FavoriteWithItems>> {
    let lists = favorites::table
        .order(favorites::id.asc())
        .select(Favorite::as_select())
        .load(conn)?;
    lists
        .into_iter()
        .map(|favorite| with_items(conn, favorite))
        .collect()
}

pub fn get_favorite(conn: &mut PgConnection, favorite_id: i32) -> Result<FavoriteWithItems> {
    let favorite = favorites::table
        .find(favorite_id)
        .select(Favorite::as_select())
        .first(conn)
        .map_err(not_found("Favorite"))?;
    with_items(conn, favorite)
}

fn with_items(conn: &mut PgConnection, favorite: Favorite) -> Result<FavoriteWithItems> {
    let items = favorite_movies::table
        .inner_join(movies::table)
        .filter(favorite_movies::cart_id.eq(favorite.id))
        .order(favorite_movies::id.asc())
        .select((FavoriteMovie::as_select(), Movie::as_select()))
        .load(conn)?;
    Ok(FavoriteWithItems { favorite, items })
}

pub fn create_favorite(conn: &mut PgConnection, new_favorite: NewFavorite) -> Result<Favorite> {
    diesel::insert_into(favorites::table)
        .values(&new_favorite)
        .returning(Favorite::as_returning())
        .get_result(conn)
        .map_err(|e| match ApiError::from(e) {
            ApiError::AlreadyExists(_) => {
                ApiError::field("user", "This user already has a favorites list.")
            }
            other => other,
        })
}

/// Returns the user's favorites list, creating it on first use.
pub fn favorite_for_user(conn: &mut PgConnection, user_id: i32) -> Result<Favorite> {
    conn.transaction(|conn| {
        let existing = favorites::table
            .filter(favorites::user_id.eq(user_id))
            .select(Favorite::as_select())
            .first(conn)
            .optional()?;
        match existing {
            Some(favorite) => Ok(favorite),
            None => create_favorite(conn, NewFavorite { user_id }),
        }
    })
}

pub fn update_favorite(
    conn: &mut PgConnection,
    favorite_id: i32,
    changes: NewFavorite,
) -> Result<Favorite> {
    diesel::update(favorites::table.find(favorite_id))
        .set(&changes)
        .returning(Favorite::as_returning())
        .get_result(conn)
        .map_err(not_found("Favorite"))
}

pub fn delete_favorite(conn: &mut PgConnection, favorite_id: i32) -> Result<()> {
    let rows = diesel::delete(favorites::table.find(favorite_id)).execute(conn)?;
    expect_affected(rows, "Favorite")
}

pub fn list_favorite_movies(conn: &mut PgConnection) -> Result<Vec<(FavoriteMovie, Movie)>> {
    Ok(favorite_movies::table
        .inner_join(movies::table)
        .order(favorite_movies::id.asc())
        .select((FavoriteMovie::as_select(), Movie::as_select()))
        .load(conn)?)
}

pub fn get_favorite_movie(
    conn: &mut PgConnection,
    entry_id: i32,
) -> Result<(FavoriteMovie, Movie)> {
    favorite_movies::table
        .inner_join(movies::table)
        .filter(favorite_movies::id.eq(entry_id))
        .select((FavoriteMovie::as_select(), Movie::as_select()))
        .first(conn)
        .map_err(not_found("FavoriteMovie"))
}

/// Adding the same movie twice yields two entries.
pub fn create_favorite_movie(
    conn: &mut PgConnection,
    new_entry: NewFavoriteMovie,
) -> Result<(FavoriteMovie, Movie)> {
    let entry = diesel::insert_into(favorite_movies::table)
        .values(&new_entry)
        .returning(FavoriteMovie::as_returning())
        .get_result(conn)?;
    get_favorite_movie(conn, entry.id)
}

pub fn update_favorite_movie(
    conn: &mut PgConnection,
    entry_id: i32,
    changes: NewFavoriteMovie,
) -> Result<(FavoriteMovie, Movie)> {
    let rows = diesel::update(favorite_movies::table.find(entry_id))
        .set(&changes)
        .execute(conn)?;
    expect_affected(rows, "FavoriteMovie")?;
    get_favorite_movie(conn, entry_id)
}

pub fn delete_favorite_movie(conn: &mut PgConnection, entry_id: i32) -> Result<()> {
    let rows = diesel::delete(favorite_movies::table.find(entry_id)).execute(conn)?;
    expect_affected(rows, "FavoriteMovie")
}
