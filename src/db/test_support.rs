//! Database fixtures for tests. Tests that need PostgreSQL read `TEST_DATABASE_URL`;
//! when it is unset they log and return early.

use chrono::NaiveDate;
use diesel::connection::SimpleConnection;
use diesel::{Connection, PgConnection};
use uuid::Uuid;

use crate::model::{NewMovie, NewUser};

const MIGRATION: &str = include_str!("../../migrations/2024-01-15-000000_create_catalog/up.sql");

/// Opens a connection inside a test transaction with the schema created in a
/// private namespace. Nothing outlives the connection.
pub fn test_connection() -> Option<PgConnection> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        log::warn!("TEST_DATABASE_URL is not set, skipping database test");
        return None;
    };
    let mut conn = PgConnection::establish(&url).expect("test database must be reachable");
    conn.begin_test_transaction()
        .expect("failed to open test transaction");

    let schema = format!("test_{}", Uuid::new_v4().simple());
    conn.batch_execute(&format!(
        "CREATE SCHEMA {schema}; SET LOCAL search_path TO {schema};"
    ))
    .expect("failed to create test schema");
    conn.batch_execute(MIGRATION)
        .expect("failed to apply migration");
    Some(conn)
}

pub fn sample_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "not-a-real-hash".to_string(),
        first_name: String::new(),
        last_name: String::new(),
        age: None,
        phone_number: None,
        status: "simple".to_string(),
    }
}

pub fn sample_movie(name: &str) -> NewMovie {
    NewMovie {
        movie_name: name.to_string(),
        year: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default(),
        types: vec!["720".to_string(), "1080".to_string()],
        movie_time: Some(136),
        description: format!("{name} description"),
        video: format!("movie_vid/{name}.mp4"),
        movie_image: format!("product_images/{name}.jpg"),
        movie_trailer: None,
        status_movie: "simple".to_string(),
    }
}
