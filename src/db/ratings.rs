use std::collections::HashSet;

use diesel::{
    Connection, ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl,
    SelectableHelper,
};

use crate::db::{expect_affected, not_found};
use crate::errors::{ApiError, Result};
use crate::model::{NewRating, Rating};
use crate::schema::ratings;

/// Walks up from `parent` and reports whether `rating_id` is among its ancestors
/// (or is `parent` itself). `parent_of` returns `None` for a root and errors for
/// an unknown id.
pub fn creates_cycle<F>(rating_id: i32, parent: i32, mut parent_of: F) -> Result<bool>
where
    F: FnMut(i32) -> Result<Option<i32>>,
{
    let mut seen = HashSet::new();
    let mut current = Some(parent);
    while let Some(id) = current {
        if id == rating_id || !seen.insert(id) {
            return Ok(true);
        }
        current = parent_of(id)?;
    }
    Ok(false)
}

fn parent_of(conn: &mut PgConnection, rating_id: i32) -> Result<Option<i32>> {
    ratings::table
        .find(rating_id)
        .select(ratings::parent_review_id)
        .first::<Option<i32>>(conn)
        .optional()?
        .ok_or_else(|| ApiError::field("parent_review", "Unknown parent review."))
}

pub fn list_ratings(conn: &mut PgConnection) -> Result<Vec<Rating>> {
    Ok(ratings::table
        .order(ratings::id.asc())
        .select(Rating::as_select())
        .load(conn)?)
}

pub fn get_rating(conn: &mut PgConnection, rating_id: i32) -> Result<Rating> {
    ratings::table
        .find(rating_id)
        .select(Rating::as_select())
        .first(conn)
        .map_err(not_found("Rating"))
}

/// Direct replies to a rating, oldest first.
pub fn list_replies(conn: &mut PgConnection, rating_id: i32) -> Result<Vec<Rating>> {
    get_rating(conn, rating_id)?;
    Ok(ratings::table
        .filter(ratings::parent_review_id.eq(rating_id))
        .order(ratings::id.asc())
        .select(Rating::as_select())
        .load(conn)?)
}

pub fn create_rating(conn: &mut PgConnection, new_rating: NewRating) -> Result<Rating> {
    conn.transaction(|conn| {
        if let Some(parent) = new_rating.parent_review_id {
            parent_of(conn, parent)?;
        }
        Ok(diesel::insert_into(ratings::table)
            .values(&new_rating)
            .returning(Rating::as_returning())
            .get_result(conn)?)
    })
}

pub fn update_rating(conn: &mut PgConnection, rating_id: i32, changes: NewRating) -> Result<Rating> {
    conn.transaction(|conn| {
        get_rating(conn, rating_id)?;
        if let Some(parent) = changes.parent_review_id {
            if creates_cycle(rating_id, parent, |id| parent_of(conn, id))? {
                return Err(ApiError::field(
                    "parent_review",
                    "A review cannot reply to itself or to one of its replies.",
                ));
            }
        }
        diesel::update(ratings::table.find(rating_id))
            .set(&changes)
            .returning(Rating::as_returning())
            .get_result(conn)
            .map_err(not_found("Rating"))
    })
}

/// Replies are removed with their parent through `ON DELETE CASCADE`.
pub fn delete_rating(conn: &mut PgConnection, rating_id: i32) -> Result<()> {
    let rows = diesel::delete(ratings::table.find(rating_id)).execute(conn)?;
    expect_affected(rows, "Rating")
}
