use chrono::{NaiveDate, NaiveDateTime};
use diesel::{AsChangeset, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::*;

/// Account tier, shared by users and movies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pro,
    #[default]
    Simple,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pro => "pro",
            Status::Simple => "simple",
        }
    }
}

/// Video resolutions a movie can be offered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "144")]
    P144,
    #[serde(rename = "360")]
    P360,
    #[serde(rename = "480")]
    P480,
    #[serde(rename = "720")]
    P720,
    #[serde(rename = "1080")]
    P1080,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::P144 => "144",
            Resolution::P360 => "360",
            Resolution::P480 => "480",
            Resolution::P720 => "720",
            Resolution::P1080 => "1080",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub phone_number: Option<String>,
    pub status: String,
    pub is_active: bool,
    pub date_joined: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub phone_number: Option<String>,
    pub status: String,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub struct UserProfileChangeset {
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub phone_number: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = connections)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ConnectionModel {
    pub id_connection: Uuid,
    pub id_user: i32,
    pub connect_at: Option<NaiveDateTime>,
    pub ended_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = countries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Country {
    pub id: i32,
    pub country_name: String,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = countries)]
pub struct NewCountry {
    pub country_name: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = directors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Director {
    pub id: i32,
    pub director_name: String,
    pub country_id: i32,
    pub bio: String,
    pub age: i32,
    pub director_image: Option<String>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = directors)]
#[diesel(treat_none_as_null = true)]
pub struct NewDirector {
    pub director_name: String,
    pub country_id: i32,
    pub bio: String,
    pub age: i32,
    pub director_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = actors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Actor {
    pub id: i32,
    pub actor_name: String,
    pub bio: String,
    pub age: i32,
    pub actor_image: Option<String>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = actors)]
#[diesel(treat_none_as_null = true)]
pub struct NewActor {
    pub actor_name: String,
    pub bio: String,
    pub age: i32,
    pub actor_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = janres)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Janre {
    pub id: i32,
    pub janre_name: String,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = janres)]
pub struct NewJanre {
    pub janre_name: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = movies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Movie {
    pub id: i32,
    pub movie_name: String,
    pub year: NaiveDate,
    pub types: Vec<String>,
    pub movie_time: Option<i32>,
    pub description: String,
    pub video: String,
    pub movie_image: String,
    pub movie_trailer: Option<String>,
    pub status_movie: String,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = movies)]
#[diesel(treat_none_as_null = true)]
pub struct NewMovie {
    pub movie_name: String,
    pub year: NaiveDate,
    pub types: Vec<String>,
    pub movie_time: Option<i32>,
    pub description: String,
    pub video: String,
    pub movie_image: String,
    pub movie_trailer: Option<String>,
    pub status_movie: String,
}

/// Ids of the people, places and genres linked to a movie.
#[derive(Debug, Clone, Default)]
pub struct MovieLinks {
    pub countries: Vec<i32>,
    pub directors: Vec<i32>,
    pub actors: Vec<i32>,
    pub janres: Vec<i32>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = movie_countries)]
pub struct MovieCountry {
    pub movie_id: i32,
    pub country_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = movie_directors)]
pub struct MovieDirector {
    pub movie_id: i32,
    pub director_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = movie_actors)]
pub struct MovieActor {
    pub movie_id: i32,
    pub actor_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = movie_janres)]
pub struct MovieJanre {
    pub movie_id: i32,
    pub janre_id: i32,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = movie_languages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MovieLanguage {
    pub id: i32,
    pub language: String,
    pub video: String,
    pub movie_id: i32,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = movie_languages)]
pub struct NewMovieLanguage {
    pub language: String,
    pub video: String,
    pub movie_id: i32,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = moments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Moment {
    pub id: i32,
    pub movie_id: i32,
    pub movie_moments: String,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = moments)]
pub struct NewMoment {
    pub movie_id: i32,
    pub movie_moments: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = ratings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Rating {
    pub id: i32,
    pub user_id: i32,
    pub movie_id: i32,
    pub stars: Option<i32>,
    pub parent_review_id: Option<i32>,
    pub text: Option<String>,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = ratings)]
#[diesel(treat_none_as_null = true)]
pub struct NewRating {
    pub user_id: i32,
    pub movie_id: i32,
    pub stars: Option<i32>,
    pub parent_review_id: Option<i32>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Favorite {
    pub id: i32,
    pub user_id: i32,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = favorites)]
pub struct NewFavorite {
    pub user_id: i32,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = favorite_movies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FavoriteMovie {
    pub id: i32,
    pub cart_id: i32,
    pub movie_id: i32,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = favorite_movies)]
pub struct NewFavoriteMovie {
    pub cart_id: i32,
    pub movie_id: i32,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoryEntry {
    pub id: i32,
    pub user_id: i32,
    pub movie_id: i32,
    pub viewed_at: NaiveDateTime,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = history)]
pub struct NewHistoryEntry {
    pub user_id: i32,
    pub movie_id: i32,
}
