//! Wire representations. Requests are validated here before they reach the
//! repositories; responses are built from rows by explicit mappings, one shape
//! per view.

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::db::favorites::FavoriteWithItems;
use crate::db::movies::MovieGraph;
use crate::auth::TokenPair;
use crate::errors::Result;
use crate::model::{
    Actor, Country, Director, FavoriteMovie, HistoryEntry, Janre, Moment, Movie, MovieLanguage,
    MovieLinks, NewActor, NewCountry, NewDirector, NewFavorite, NewFavoriteMovie,
    NewHistoryEntry, NewJanre, NewMoment, NewMovie, NewMovieLanguage, NewRating, NewUser, Rating,
    Resolution, Status, User, UserProfileChangeset,
};

/// Runs the derived checks plus any hand-written ones and folds them into one
/// field map.
fn check<T: Validate>(request: &T, extra: impl FnOnce(&mut ValidationErrors)) -> Result<()> {
    let mut errors = request.validate().err().unwrap_or_else(ValidationErrors::new);
    extra(&mut errors);
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// `+` followed by 7 to 15 digits.
pub fn is_valid_phone(phone: &str) -> bool {
    match phone.strip_prefix('+') {
        Some(digits) => {
            (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

fn check_phone(phone: &Option<String>, errors: &mut ValidationErrors) {
    if let Some(phone) = phone {
        if !is_valid_phone(phone) {
            errors.add(
                "phone_number",
                invalid("phone", "Enter a valid phone number."),
            );
        }
    }
}

fn dedup(mut ids: Vec<i32>) -> Vec<i32> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

// ---- users & auth ----

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    #[validate(range(min = 18, max = 100))]
    pub age: Option<i32>,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub status: Status,
}

impl RegisterRequest {
    pub fn validated(self) -> Result<Self> {
        check(&self, |errors| check_phone(&self.phone_number, errors))?;
        Ok(self)
    }

    /// Builds the row; `password_hash` replaces the plain password.
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            username: self.username,
            email: self.email,
            password: password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            phone_number: self.phone_number,
            status: self.status.as_str().to_string(),
        }
    }
}

/// Registration output. The password is write-only.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub phone_number: Option<String>,
    pub status: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            age: user.age,
            phone_number: user.phone_number,
            status: user.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl LoginRequest {
    pub fn validated(self) -> Result<Self> {
        check(&self, |_| {})?;
        Ok(self)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginUser {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: LoginUser,
    pub access: String,
    pub refresh: String,
}

impl LoginResponse {
    pub fn new(user: User, tokens: TokenPair) -> Self {
        LoginResponse {
            user: LoginUser {
                username: user.username,
                email: user.email,
            },
            access: tokens.access_token,
            refresh: tokens.refresh_token,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access: String,
    pub refresh: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UserProfileRequest {
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[validate(range(min = 18, max = 100))]
    pub age: Option<i32>,
}

impl UserProfileRequest {
    pub fn into_changeset(self) -> Result<UserProfileChangeset> {
        check(&self, |errors| check_phone(&self.phone_number, errors))?;
        Ok(UserProfileChangeset {
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            phone_number: self.phone_number,
            status: self.status.as_str().to_string(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfileResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub status: String,
    pub age: Option<i32>,
}

impl From<User> for UserProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: user.phone_number,
            status: user.status,
            age: user.age,
        }
    }
}

// ---- countries, people, genres ----

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CountryRequest {
    #[validate(length(min = 1, max = 16))]
    pub country_name: String,
}

impl CountryRequest {
    pub fn into_new(self) -> Result<NewCountry> {
        check(&self, |_| {})?;
        Ok(NewCountry {
            country_name: self.country_name,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CountryResponse {
    pub id: i32,
    pub country_name: String,
}

impl From<Country> for CountryResponse {
    fn from(country: Country) -> Self {
        Self {
            id: country.id,
            country_name: country.country_name,
        }
    }
}

/// Country as nested in a movie.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CountryName {
    pub country_name: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct DirectorRequest {
    #[validate(length(min = 1, max = 32))]
    pub director_name: String,
    pub country: i32,
    #[serde(default)]
    pub bio: String,
    #[validate(range(min = 0, max = 150))]
    pub age: i32,
    pub director_image: Option<String>,
}

impl DirectorRequest {
    pub fn into_new(self) -> Result<NewDirector> {
        check(&self, |_| {})?;
        Ok(NewDirector {
            director_name: self.director_name,
            country_id: self.country,
            bio: self.bio,
            age: self.age,
            director_image: self.director_image,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DirectorListResponse {
    pub id: i32,
    pub director_name: String,
}

impl From<Director> for DirectorListResponse {
    fn from(director: Director) -> Self {
        Self {
            id: director.id,
            director_name: director.director_name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DirectorDetailResponse {
    pub id: i32,
    pub director_name: String,
    pub country: i32,
    pub bio: String,
    pub age: i32,
    pub director_image: Option<String>,
}

impl From<Director> for DirectorDetailResponse {
    fn from(director: Director) -> Self {
        Self {
            id: director.id,
            director_name: director.director_name,
            country: director.country_id,
            bio: director.bio,
            age: director.age,
            director_image: director.director_image,
        }
    }
}

/// Director as nested in a movie.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DirectorName {
    pub director_name: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ActorRequest {
    #[validate(length(min = 1, max = 32))]
    pub actor_name: String,
    pub bio: String,
    #[validate(range(min = 0, max = 150))]
    pub age: i32,
    pub actor_image: Option<String>,
}

impl ActorRequest {
    pub fn into_new(self) -> Result<NewActor> {
        check(&self, |_| {})?;
        Ok(NewActor {
            actor_name: self.actor_name,
            bio: self.bio,
            age: self.age,
            actor_image: self.actor_image,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ActorListResponse {
    pub id: i32,
    pub actor_name: String,
    pub actor_image: Option<String>,
}

impl From<Actor> for ActorListResponse {
    fn from(actor: Actor) -> Self {
        Self {
            id: actor.id,
            actor_name: actor.actor_name,
            actor_image: actor.actor_image,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ActorDetailResponse {
    pub id: i32,
    pub actor_name: String,
    pub bio: String,
    pub age: i32,
    pub actor_image: Option<String>,
}

impl From<Actor> for ActorDetailResponse {
    fn from(actor: Actor) -> Self {
        Self {
            id: actor.id,
            actor_name: actor.actor_name,
            bio: actor.bio,
            age: actor.age,
            actor_image: actor.actor_image,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct JanreRequest {
    #[validate(length(min = 1, max = 35))]
    pub janre_name: String,
}

impl JanreRequest {
    pub fn into_new(self) -> Result<NewJanre> {
        check(&self, |_| {})?;
        Ok(NewJanre {
            janre_name: self.janre_name,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct JanreResponse {
    pub id: i32,
    pub janre_name: String,
}

impl From<Janre> for JanreResponse {
    fn from(janre: Janre) -> Self {
        Self {
            id: janre.id,
            janre_name: janre.janre_name,
        }
    }
}

// ---- movies and their sub-resources ----

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct MovieRequest {
    #[validate(length(min = 1))]
    pub movie_name: String,
    #[serde(default)]
    pub country: Vec<i32>,
    #[serde(default)]
    pub director: Vec<i32>,
    #[serde(default)]
    pub actor: Vec<i32>,
    #[serde(default)]
    pub janre: Vec<i32>,
    #[validate(length(min = 1))]
    pub types: Vec<Resolution>,
    #[validate(range(min = 1))]
    pub movie_time: Option<i32>,
    pub description: String,
    #[validate(length(min = 1))]
    pub video: String,
    #[validate(length(min = 1))]
    pub movie_image: String,
    pub movie_trailer: Option<String>,
    #[serde(default)]
    pub status_movie: Status,
}

impl MovieRequest {
    /// The release date is stamped with today's date on every save.
    pub fn into_new(self, today: NaiveDate) -> Result<(NewMovie, MovieLinks)> {
        check(&self, |_| {})?;
        let mut types = self.types;
        types.sort();
        types.dedup();
        let links = MovieLinks {
            countries: dedup(self.country),
            directors: dedup(self.director),
            actors: dedup(self.actor),
            janres: dedup(self.janre),
        };
        let movie = NewMovie {
            movie_name: self.movie_name,
            year: today,
            types: types.iter().map(|t| t.as_str().to_string()).collect(),
            movie_time: self.movie_time,
            description: self.description,
            video: self.video,
            movie_image: self.movie_image,
            movie_trailer: self.movie_trailer,
            status_movie: self.status_movie.as_str().to_string(),
        };
        Ok((movie, links))
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MovieListResponse {
    pub id: i32,
    pub movie_name: String,
    pub year: NaiveDate,
    pub movie_time: Option<i32>,
    pub status_movie: String,
}

impl From<Movie> for MovieListResponse {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            movie_name: movie.movie_name,
            year: movie.year,
            movie_time: movie.movie_time,
            status_movie: movie.status_movie,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MovieDetailResponse {
    pub id: i32,
    pub movie_name: String,
    pub country: Vec<CountryName>,
    pub janre: Vec<JanreResponse>,
    pub description: String,
    pub actor: Vec<ActorListResponse>,
    pub movie_trailer: Option<String>,
    pub average_rating: f64,
    pub ratings: Vec<RatingResponse>,
    pub year: String,
    pub director: Vec<DirectorName>,
    pub status_movie: String,
    pub types: Vec<String>,
    pub movie_time: Option<i32>,
    pub languages: Vec<MovieLanguageResponse>,
    pub moments: Vec<MomentResponse>,
}

impl From<MovieGraph> for MovieDetailResponse {
    fn from(graph: MovieGraph) -> Self {
        let movie = graph.movie;
        Self {
            id: movie.id,
            movie_name: movie.movie_name,
            country: graph
                .countries
                .into_iter()
                .map(|c| CountryName {
                    country_name: c.country_name,
                })
                .collect(),
            janre: graph.janres.into_iter().map(JanreResponse::from).collect(),
            description: movie.description,
            actor: graph.actors.into_iter().map(ActorListResponse::from).collect(),
            movie_trailer: movie.movie_trailer,
            average_rating: graph.average_rating,
            ratings: graph.ratings.into_iter().map(RatingResponse::from).collect(),
            year: movie.year.format("%Y").to_string(),
            director: graph
                .directors
                .into_iter()
                .map(|d| DirectorName {
                    director_name: d.director_name,
                })
                .collect(),
            status_movie: movie.status_movie,
            types: movie.types,
            movie_time: movie.movie_time,
            languages: graph
                .languages
                .into_iter()
                .map(MovieLanguageResponse::from)
                .collect(),
            moments: graph.moments.into_iter().map(MomentResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct MovieLanguageRequest {
    #[validate(length(min = 1, max = 32))]
    pub language: String,
    #[validate(length(min = 1))]
    pub video: String,
    pub movie: i32,
}

impl MovieLanguageRequest {
    pub fn into_new(self) -> Result<NewMovieLanguage> {
        check(&self, |_| {})?;
        Ok(NewMovieLanguage {
            language: self.language,
            video: self.video,
            movie_id: self.movie,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MovieLanguageResponse {
    pub id: i32,
    pub language: String,
    pub video: String,
    pub movie: i32,
}

impl From<MovieLanguage> for MovieLanguageResponse {
    fn from(language: MovieLanguage) -> Self {
        Self {
            id: language.id,
            language: language.language,
            video: language.video,
            movie: language.movie_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct MomentRequest {
    pub movie: i32,
    #[validate(length(min = 1))]
    pub movie_moments: String,
}

impl MomentRequest {
    pub fn into_new(self) -> Result<NewMoment> {
        check(&self, |_| {})?;
        Ok(NewMoment {
            movie_id: self.movie,
            movie_moments: self.movie_moments,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MomentResponse {
    pub id: i32,
    pub movie: i32,
    pub movie_moments: String,
}

impl From<Moment> for MomentResponse {
    fn from(moment: Moment) -> Self {
        Self {
            id: moment.id,
            movie: moment.movie_id,
            movie_moments: moment.movie_moments,
        }
    }
}

// ---- ratings, favorites, history ----
//
// Owner fields default to the authenticated user when left out.

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RatingRequest {
    pub user: Option<i32>,
    pub movie: i32,
    #[validate(range(min = 1, max = 9))]
    pub stars: Option<i32>,
    pub parent_review: Option<i32>,
    pub text: Option<String>,
}

impl RatingRequest {
    pub fn into_new(self, current_user: i32) -> Result<NewRating> {
        check(&self, |_| {})?;
        Ok(NewRating {
            user_id: self.user.unwrap_or(current_user),
            movie_id: self.movie,
            stars: self.stars,
            parent_review_id: self.parent_review,
            text: self.text,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RatingResponse {
    pub id: i32,
    pub user: i32,
    pub movie: i32,
    pub stars: Option<i32>,
    pub parent_review: Option<i32>,
    pub text: Option<String>,
    pub created_date: NaiveDateTime,
}

impl From<Rating> for RatingResponse {
    fn from(rating: Rating) -> Self {
        Self {
            id: rating.id,
            user: rating.user_id,
            movie: rating.movie_id,
            stars: rating.stars,
            parent_review: rating.parent_review_id,
            text: rating.text,
            created_date: rating.created_date,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FavoriteRequest {
    pub user: Option<i32>,
}

impl FavoriteRequest {
    pub fn into_new(self, current_user: i32) -> NewFavorite {
        NewFavorite {
            user_id: self.user.unwrap_or(current_user),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FavoriteMovieRequest {
    pub movie_id: i32,
    pub cart: Option<i32>,
}

impl FavoriteMovieRequest {
    pub fn into_new(self, cart_id: i32) -> NewFavoriteMovie {
        NewFavoriteMovie {
            cart_id,
            movie_id: self.movie_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FavoriteMovieResponse {
    pub id: i32,
    pub movie: MovieListResponse,
}

impl From<(FavoriteMovie, Movie)> for FavoriteMovieResponse {
    fn from((entry, movie): (FavoriteMovie, Movie)) -> Self {
        Self {
            id: entry.id,
            movie: MovieListResponse::from(movie),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FavoriteResponse {
    pub id: i32,
    pub user: i32,
    pub items: Vec<FavoriteMovieResponse>,
}

impl From<FavoriteWithItems> for FavoriteResponse {
    fn from(list: FavoriteWithItems) -> Self {
        Self {
            id: list.favorite.id,
            user: list.favorite.user_id,
            items: list
                .items
                .into_iter()
                .map(FavoriteMovieResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryRequest {
    pub user: Option<i32>,
    pub movie: i32,
}

impl HistoryRequest {
    pub fn into_new(self, current_user: i32) -> NewHistoryEntry {
        NewHistoryEntry {
            user_id: self.user.unwrap_or(current_user),
            movie_id: self.movie,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryResponse {
    pub id: i32,
    pub user: i32,
    pub movie: i32,
    pub movie_name: String,
    pub viewed_at: NaiveDateTime,
}

impl From<(HistoryEntry, String)> for HistoryResponse {
    fn from((entry, movie_name): (HistoryEntry, String)) -> Self {
        Self {
            id: entry.id,
            user: entry.user_id,
            movie: entry.movie_id,
            movie_name,
            viewed_at: entry.viewed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::errors::ApiError;

    fn register_json(overrides: serde_json::Value) -> RegisterRequest {
        let mut base = json!({
            "username": "neo",
            "email": "neo@example.com",
            "password": "there-is-no-spoon",
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), overrides.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base).unwrap()
    }

    fn fields(err: ApiError) -> Vec<String> {
        match err {
            ApiError::Validation(fields) => fields.into_keys().collect(),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_register_defaults() {
        let req = register_json(json!({})).validated().unwrap();
        assert_eq!(req.status, Status::Simple);
        assert_eq!(req.age, None);
        let row = req.into_new_user("$2b$hash".to_string());
        assert_eq!(row.password, "$2b$hash");
        assert_eq!(row.status, "simple");
    }

    #[test]
    fn test_register_age_bounds() {
        assert!(register_json(json!({ "age": 18 })).validated().is_ok());
        assert!(register_json(json!({ "age": 100 })).validated().is_ok());
        let err = register_json(json!({ "age": 17 })).validated().unwrap_err();
        assert_eq!(fields(err), vec!["age"]);
        let err = register_json(json!({ "age": 101 })).validated().unwrap_err();
        assert_eq!(fields(err), vec!["age"]);
    }

    #[test]
    fn test_register_collects_every_bad_field() {
        let err = register_json(json!({
            "email": "not-an-email",
            "phone_number": "12ab",
            "username": "",
        }))
        .validated()
        .unwrap_err();
        assert_eq!(fields(err), vec!["email", "phone_number", "username"]);
    }

    #[test]
    fn test_unknown_status_is_rejected_by_serde() {
        let parsed: std::result::Result<RegisterRequest, _> = serde_json::from_value(json!({
            "username": "neo",
            "email": "neo@example.com",
            "password": "x",
            "status": "vip",
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_phone_numbers() {
        assert!(is_valid_phone("+996555123456"));
        assert!(!is_valid_phone("0555123456"));
        assert!(is_valid_phone("+1234567"));
        assert!(!is_valid_phone("+123456"));
        assert!(!is_valid_phone("+99655512345678901"));
        assert!(!is_valid_phone("555-1234"));
        assert!(!is_valid_phone("+"));
    }

    #[test]
    fn test_user_response_has_no_password() {
        let user = User {
            id: 1,
            username: "neo".to_string(),
            email: "neo@example.com".to_string(),
            password: "$2b$secret".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            age: Some(30),
            phone_number: None,
            status: "pro".to_string(),
            is_active: true,
            date_joined: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        };
        let body = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(body.get("password").is_none());
        assert_eq!(body["username"], "neo");
        assert_eq!(body["status"], "pro");
    }

    #[test]
    fn test_stars_must_be_between_one_and_nine() {
        let rating = |stars: serde_json::Value| -> RatingRequest {
            serde_json::from_value(json!({ "movie": 1, "stars": stars })).unwrap()
        };
        assert!(rating(json!(1)).into_new(5).is_ok());
        assert!(rating(json!(9)).into_new(5).is_ok());
        assert!(rating(json!(null)).into_new(5).is_ok());
        assert!(rating(json!(0)).into_new(5).is_err());
        assert!(rating(json!(10)).into_new(5).is_err());
    }

    #[test]
    fn test_owner_defaults_to_current_user() {
        let req: RatingRequest = serde_json::from_value(json!({ "movie": 3 })).unwrap();
        assert_eq!(req.into_new(42).unwrap().user_id, 42);
        let req: RatingRequest = serde_json::from_value(json!({ "movie": 3, "user": 7 })).unwrap();
        assert_eq!(req.into_new(42).unwrap().user_id, 7);
        let req: HistoryRequest = serde_json::from_value(json!({ "movie": 3 })).unwrap();
        assert_eq!(req.into_new(42).user_id, 42);
        assert_eq!(FavoriteRequest::default().into_new(42).user_id, 42);
    }

    fn movie_request(types: serde_json::Value) -> serde_json::Value {
        json!({
            "movie_name": "Heat",
            "country": [2, 1, 2],
            "actor": [5],
            "types": types,
            "movie_time": 170,
            "description": "LA crime saga",
            "video": "movie_vid/heat.mp4",
            "movie_image": "product_images/heat.jpg",
            "status_movie": "pro",
        })
    }

    #[test]
    fn test_movie_request_normalises_links_and_types() {
        let req: MovieRequest =
            serde_json::from_value(movie_request(json!(["1080", "720", "1080"]))).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let (movie, links) = req.into_new(today).unwrap();
        assert_eq!(movie.types, vec!["720", "1080"]);
        assert_eq!(movie.year, today);
        assert_eq!(movie.status_movie, "pro");
        assert_eq!(links.countries, vec![1, 2]);
        assert_eq!(links.actors, vec![5]);
        assert!(links.directors.is_empty());
    }

    #[test]
    fn test_movie_request_needs_known_resolutions() {
        let parsed: std::result::Result<MovieRequest, _> =
            serde_json::from_value(movie_request(json!(["4k"])));
        assert!(parsed.is_err());

        let req: MovieRequest = serde_json::from_value(movie_request(json!([]))).unwrap();
        let err = req.into_new(today()).unwrap_err();
        assert_eq!(fields(err), vec!["types"]);
    }

    #[test]
    fn test_movie_detail_shape() {
        let movie = Movie {
            id: 3,
            movie_name: "Heat".to_string(),
            year: NaiveDate::from_ymd_opt(1995, 12, 15).unwrap(),
            types: vec!["1080".to_string()],
            movie_time: Some(170),
            description: "LA crime saga".to_string(),
            video: "movie_vid/heat.mp4".to_string(),
            movie_image: "product_images/heat.jpg".to_string(),
            movie_trailer: None,
            status_movie: "simple".to_string(),
        };
        let graph = MovieGraph {
            movie,
            countries: vec![Country {
                id: 1,
                country_name: "USA".to_string(),
            }],
            directors: vec![Director {
                id: 1,
                director_name: "Michael Mann".to_string(),
                country_id: 1,
                bio: "Chicago".to_string(),
                age: 81,
                director_image: None,
            }],
            actors: vec![],
            janres: vec![],
            ratings: vec![],
            languages: vec![],
            moments: vec![],
            average_rating: 0.0,
        };
        let body = serde_json::to_value(MovieDetailResponse::from(graph)).unwrap();
        assert_eq!(body["year"], "1995");
        assert_eq!(body["country"], json!([{ "country_name": "USA" }]));
        assert_eq!(body["director"], json!([{ "director_name": "Michael Mann" }]));
        assert_eq!(body["average_rating"], json!(0.0));
        assert!(body.get("video").is_none());
    }
}
