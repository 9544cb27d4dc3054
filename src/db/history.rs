use diesel::{ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper};

use crate::db::{expect_affected, not_found};
use crate::errors::Result;
use crate::model::{HistoryEntry, NewHistoryEntry};
use crate::schema::{history, movies};

/// History rows come back with the name of the watched movie.
pub fn list_history(conn: &mut PgConnection) -> Result<Vec<(HistoryEntry, String)>> {
    Ok(history::table
        .inner_join(movies::table)
        .order(history::viewed_at.desc())
        .then_order_by(history::id.desc())
        .select((HistoryEntry::as_select(), movies::movie_name))
        .load(conn)?)
}

pub fn get_history(conn: &mut PgConnection, entry_id: i32) -> Result<(HistoryEntry, String)> {
    history::table
        .inner_join(movies::table)
        .filter(history::id.eq(entry_id))
        .select((HistoryEntry::as_select(), movies::movie_name))
        .first(conn)
        .map_err(not_found("History"))
}

pub fn create_history(
    conn: &mut PgConnection,
    new_entry: NewHistoryEntry,
) -> Result<(HistoryEntry, String)> {
    let entry = diesel::insert_into(history::table)
        .values(&new_entry)
        .returning(HistoryEntry::as_returning())
        .get_result(conn)?;
    get_history(conn, entry.id)
}

pub fn update_history(
    conn: &mut PgConnection,
    entry_id: i32,
    changes: NewHistoryEntry,
) -> Result<(HistoryEntry, String)> {
    let rows = diesel::update(history::table.find(entry_id))
        .set(&changes)
        .execute(conn)?;
    expect_affected(rows, "History")?;
    get_history(conn, entry_id)
}

pub fn delete_history(conn: &mut PgConnection, entry_id: i32) -> Result<()> {
    let rows = diesel::delete(history::table.find(entry_id)).execute(conn)?;
    expect_affected(rows, "History")
}
