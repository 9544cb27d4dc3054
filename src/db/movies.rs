use diesel::{Connection, ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper};

use crate::db::{expect_affected, not_found};
use crate::errors::Result;
use crate::model::{
    Actor, Country, Director, Janre, Moment, Movie, MovieActor, MovieCountry, MovieDirector,
    MovieJanre, MovieLanguage, MovieLinks, NewMoment, NewMovie, NewMovieLanguage, Rating,
};
use crate::schema::{
    actors, countries, directors, janres, moments, movie_actors, movie_countries,
    movie_directors, movie_janres, movie_languages, movies, ratings,
};

/// A movie with everything the detail view renders.
#[derive(Debug, Clone)]
pub struct MovieGraph {
    pub movie: Movie,
    pub countries: Vec<Country>,
    pub directors: Vec<Director>,
    pub actors: Vec<Actor>,
    pub janres: Vec<Janre>,
    pub ratings: Vec<Rating>,
    pub languages: Vec<MovieLanguage>,
    pub moments: Vec<Moment>,
    pub average_rating: f64,
}

/// Mean of the given stars rounded to one decimal, ignoring unscored ratings.
/// A movie nobody scored averages 0.
pub fn average_rating(stars: &[Option<i32>]) -> f64 {
    let scored: Vec<i32> = stars.iter().flatten().copied().collect();
    if scored.is_empty() {
        return 0.0;
    }
    let mean = f64::from(scored.iter().sum::<i32>()) / scored.len() as f64;
    // round the binary value itself, half to even
    format!("{mean:.1}").parse().unwrap_or(mean)
}

pub fn list_movies(conn: &mut PgConnection) -> Result<Vec<Movie>> {
    Ok(movies::table
        .order(movies::id.asc())
        .select(Movie::as_select())
        .load(conn)?)
}

pub fn get_movie(conn: &mut PgConnection, movie_id: i32) -> Result<Movie> {
    movies::table
        .find(movie_id)
        .select(Movie::as_select())
        .first(conn)
        .map_err(not_found("Movie"))
}

pub fn load_movie_graph(conn: &mut PgConnection, movie_id: i32) -> Result<MovieGraph> {
    let movie = get_movie(conn, movie_id)?;

    let countries = countries::table
        .inner_join(movie_countries::table)
        .filter(movie_countries::movie_id.eq(movie_id))
        .order(countries::id.asc())
        .select(Country::as_select())
        .load(conn)?;
    let directors = directors::table
        .inner_join(movie_directors::table)
        .filter(movie_directors::movie_id.eq(movie_id))
        .order(directors::id.asc())
        .select(Director::as_select())
        .load(conn)?;
    let actors = actors::table
        .inner_join(movie_actors::table)
        .filter(movie_actors::movie_id.eq(movie_id))
        .order(actors::id.asc())
        .select(Actor::as_select())
        .load(conn)?;
    let janres = janres::table
        .inner_join(movie_janres::table)
        .filter(movie_janres::movie_id.eq(movie_id))
        .order(janres::id.asc())
        .select(Janre::as_select())
        .load(conn)?;
    let ratings = ratings::table
        .filter(ratings::movie_id.eq(movie_id))
        .order(ratings::id.asc())
        .select(Rating::as_select())
        .load(conn)?;
    let languages = movie_languages::table
        .filter(movie_languages::movie_id.eq(movie_id))
        .order(movie_languages::id.asc())
        .select(MovieLanguage::as_select())
        .load(conn)?;
    let moments = moments::table
        .filter(moments::movie_id.eq(movie_id))
        .order(moments::id.asc())
        .select(Moment::as_select())
        .load(conn)?;

    let stars: Vec<Option<i32>> = ratings.iter().map(|r| r.stars).collect();
    Ok(MovieGraph {
        movie,
        countries,
        directors,
        actors,
        janres,
        ratings,
        languages,
        moments,
        average_rating: average_rating(&stars),
    })
}

fn insert_links(conn: &mut PgConnection, movie_id: i32, links: &MovieLinks) -> Result<()> {
    if !links.countries.is_empty() {
        let rows: Vec<MovieCountry> = links
            .countries
            .iter()
            .map(|&country_id| MovieCountry {
                movie_id,
                country_id,
            })
            .collect();
        diesel::insert_into(movie_countries::table)
            .values(rows)
            .execute(conn)?;
    }
    if !links.directors.is_empty() {
        let rows: Vec<MovieDirector> = links
            .directors
            .iter()
            .map(|&director_id| MovieDirector {
                movie_id,
                director_id,
            })
            .collect();
        diesel::insert_into(movie_directors::table)
            .values(rows)
            .execute(conn)?;
    }
    if !links.actors.is_empty() {
        let rows: Vec<MovieActor> = links
            .actors
            .iter()
            .map(|&actor_id| MovieActor { movie_id, actor_id })
            .collect();
        diesel::insert_into(movie_actors::table)
            .values(rows)
            .execute(conn)?;
    }
    if !links.janres.is_empty() {
        let rows: Vec<MovieJanre> = links
            .janres
            .iter()
            .map(|&janre_id| MovieJanre { movie_id, janre_id })
            .collect();
        diesel::insert_into(movie_janres::table)
            .values(rows)
            .execute(conn)?;
    }
    Ok(())
}

fn clear_links(conn: &mut PgConnection, movie_id: i32) -> Result<()> {
    diesel::delete(movie_countries::table.filter(movie_countries::movie_id.eq(movie_id)))
        .execute(conn)?;
    diesel::delete(movie_directors::table.filter(movie_directors::movie_id.eq(movie_id)))
        .execute(conn)?;
    diesel::delete(movie_actors::table.filter(movie_actors::movie_id.eq(movie_id)))
        .execute(conn)?;
    diesel::delete(movie_janres::table.filter(movie_janres::movie_id.eq(movie_id)))
        .execute(conn)?;
    Ok(())
}

pub fn create_movie(conn: &mut PgConnection, new_movie: NewMovie, links: MovieLinks) -> Result<Movie> {
    conn.transaction(|conn| {
        let movie = diesel::insert_into(movies::table)
            .values(&new_movie)
            .returning(Movie::as_returning())
            .get_result(conn)?;
        insert_links(conn, movie.id, &links)?;
        Ok(movie)
    })
}

/// Full replacement: columns and every link set are overwritten.
pub fn update_movie(
    conn: &mut PgConnection,
    movie_id: i32,
    changes: NewMovie,
    links: MovieLinks,
) -> Result<Movie> {
    conn.transaction(|conn| {
        let movie = diesel::update(movies::table.find(movie_id))
            .set(&changes)
            .returning(Movie::as_returning())
            .get_result(conn)
            .map_err(not_found("Movie"))?;
        clear_links(conn, movie_id)?;
        insert_links(conn, movie_id, &links)?;
        Ok(movie)
    })
}

/// Languages, moments, ratings, favorite entries and history go with the movie
/// through `ON DELETE CASCADE`.
pub fn delete_movie(conn: &mut PgConnection, movie_id: i32) -> Result<()> {
    let rows = diesel::delete(movies::table.find(movie_id)).execute(conn)?;
    expect_affected(rows, "Movie")
}

pub fn list_languages(conn: &mut PgConnection) -> Result<Vec<MovieLanguage>> {
    Ok(movie_languages::table
        .order(movie_languages::id.asc())
        .select(MovieLanguage::as_select())
        .load(conn)?)
}

pub fn get_language(conn: &mut PgConnection, language_id: i32) -> Result<MovieLanguage> {
    movie_languages::table
        .find(language_id)
        .select(MovieLanguage::as_select())
        .first(conn)
        .map_err(not_found("MovieLanguage"))
}

pub fn create_language(
    conn: &mut PgConnection,
    new_language: NewMovieLanguage,
) -> Result<MovieLanguage> {
    Ok(diesel::insert_into(movie_languages::table)
        .values(&new_language)
        .returning(MovieLanguage::as_returning())
        .get_result(conn)?)
}

pub fn update_language(
    conn: &mut PgConnection,
    language_id: i32,
    changes: NewMovieLanguage,
) -> Result<MovieLanguage> {
    diesel::update(movie_languages::table.find(language_id))
        .set(&changes)
        .returning(MovieLanguage::as_returning())
        .get_result(conn)
        .map_err(not_found("MovieLanguage"))
}

pub fn delete_language(conn: &mut PgConnection, language_id: i32) -> Result<()> {
    let rows = diesel::delete(movie_languages::table.find(language_id)).execute(conn)?;
    expect_affected(rows, "MovieLanguage")
}

pub fn list_moments(conn: &mut PgConnection) -> Result<Vec<Moment>> {
    Ok(moments::table
        .order(moments::id.asc())
        .select(Moment::as_select())
        .load(conn)?)
}

pub fn get_moment(conn: &mut PgConnection, moment_id: i32) -> Result<Moment> {
    moments::table
        .find(moment_id)
        .select(Moment::as_select())
        .first(conn)
        .map_err(not_found("Moment"))
}

pub fn create_moment(conn: &mut PgConnection, new_moment: NewMoment) -> Result<Moment> {
    Ok(diesel::insert_into(moments::table)
        .values(&new_moment)
        .returning(Moment::as_returning())
        .get_result(conn)?)
}

pub fn update_moment(conn: &mut PgConnection, moment_id: i32, changes: NewMoment) -> Result<Moment> {
    diesel::update(moments::table.find(moment_id))
        .set(&changes)
        .returning(Moment::as_returning())
        .get_result(conn)
        .map_err(not_found("Moment"))
}

pub fn delete_moment(conn: &mut PgConnection, moment_id: i32) -> Result<()> {
    let rows = diesel::delete(moments::table.find(moment_id)).execute(conn)?;
    expect_affected(rows, "Moment")
}

#[cfg(test)]
mod tests {
    use diesel::OptionalExtension;

    use super::*;
    use crate::db::test_support::{sample_movie, sample_user, test_connection};
    use crate::db::{catalog, favorites, ratings as rating_repo, users};
    use crate::errors::ApiError;
    use crate::model::{NewCountry, NewFavoriteMovie, NewJanre, NewRating};

    #[test]
    fn test_average_rating_of_nothing_is_zero() {
        assert_eq!(average_rating(&[]), 0.0);
        assert_eq!(average_rating(&[None, None]), 0.0);
    }

    #[test]
    fn test_average_rating_rounds_to_one_decimal() {
        assert_eq!(average_rating(&[Some(7)]), 7.0);
        assert_eq!(average_rating(&[Some(1), Some(2), Some(2)]), 1.7);
        assert_eq!(average_rating(&[Some(9), Some(8), Some(8)]), 8.3);
        assert_eq!(average_rating(&[Some(2), Some(2), Some(2), Some(3)]), 2.2);

        let mut twenty = vec![Some(1); 19];
        twenty.push(Some(2));
        assert_eq!(average_rating(&twenty), 1.1);

        let mut twenty = vec![Some(2); 17];
        twenty.extend([Some(3); 3]);
        assert_eq!(average_rating(&twenty), 2.1);
    }

    #[test]
    fn test_average_rating_skips_unscored_reviews() {
        assert_eq!(average_rating(&[Some(4), None, Some(5)]), 4.5);
    }

    #[test]
    fn test_movie_graph_collects_links_and_average() {
        let Some(mut conn) = test_connection() else {
            return;
        };
        let user = users::save_new_user(&mut conn, sample_user("critic")).unwrap();
        let country = catalog::create_country(
            &mut conn,
            NewCountry {
                country_name: "Japan".to_string(),
            },
        )
        .unwrap();
        let janre = catalog::create_janre(
            &mut conn,
            NewJanre {
                janre_name: "Anime".to_string(),
            },
        )
        .unwrap();
        let movie = create_movie(
            &mut conn,
            sample_movie("spirited-away"),
            MovieLinks {
                countries: vec![country.id],
                janres: vec![janre.id],
                ..MovieLinks::default()
            },
        )
        .unwrap();
        assert_eq!(load_movie_graph(&mut conn, movie.id).unwrap().average_rating, 0.0);

        for stars in [Some(9), Some(8), None] {
            rating_repo::create_rating(
                &mut conn,
                NewRating {
                    user_id: user.id,
                    movie_id: movie.id,
                    stars,
                    parent_review_id: None,
                    text: None,
                },
            )
            .unwrap();
        }

        let graph = load_movie_graph(&mut conn, movie.id).unwrap();
        assert_eq!(graph.countries, vec![country]);
        assert_eq!(graph.janres, vec![janre]);
        assert_eq!(graph.ratings.len(), 3);
        assert_eq!(graph.average_rating, 8.5);
    }

    #[test]
    fn test_update_replaces_links() {
        let Some(mut conn) = test_connection() else {
            return;
        };
        let first = catalog::create_janre(
            &mut conn,
            NewJanre {
                janre_name: "Drama".to_string(),
            },
        )
        .unwrap();
        let second = catalog::create_janre(
            &mut conn,
            NewJanre {
                janre_name: "Comedy".to_string(),
            },
        )
        .unwrap();
        let movie = create_movie(
            &mut conn,
            sample_movie("amelie"),
            MovieLinks {
                janres: vec![first.id],
                ..MovieLinks::default()
            },
        )
        .unwrap();

        update_movie(
            &mut conn,
            movie.id,
            sample_movie("amelie"),
            MovieLinks {
                janres: vec![second.id],
                ..MovieLinks::default()
            },
        )
        .unwrap();
        let graph = load_movie_graph(&mut conn, movie.id).unwrap();
        assert_eq!(graph.janres, vec![second]);
    }

    #[test]
    fn test_unknown_link_is_an_invalid_reference() {
        let Some(mut conn) = test_connection() else {
            return;
        };
        let err = create_movie(
            &mut conn,
            sample_movie("ghost"),
            MovieLinks {
                actors: vec![404],
                ..MovieLinks::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidReference(_)));
    }

    #[test]
    fn test_deleting_a_movie_cascades_to_dependents() {
        let Some(mut conn) = test_connection() else {
            return;
        };
        let user = users::save_new_user(&mut conn, sample_user("viewer")).unwrap();
        let movie = create_movie(&mut conn, sample_movie("heat"), MovieLinks::default()).unwrap();

        let language = create_language(
            &mut conn,
            NewMovieLanguage {
                language: "English".to_string(),
                video: "movie_vid/heat-en.mp4".to_string(),
                movie_id: movie.id,
            },
        )
        .unwrap();
        let moment = create_moment(
            &mut conn,
            NewMoment {
                movie_id: movie.id,
                movie_moments: "product_images/heat-1.jpg".to_string(),
            },
        )
        .unwrap();
        let rating = rating_repo::create_rating(
            &mut conn,
            NewRating {
                user_id: user.id,
                movie_id: movie.id,
                stars: Some(8),
                parent_review_id: None,
                text: Some("tense".to_string()),
            },
        )
        .unwrap();
        let favorite = favorites::favorite_for_user(&mut conn, user.id).unwrap();
        let entry = favorites::create_favorite_movie(
            &mut conn,
            NewFavoriteMovie {
                cart_id: favorite.id,
                movie_id: movie.id,
            },
        )
        .unwrap();

        delete_movie(&mut conn, movie.id).unwrap();

        assert!(matches!(
            get_language(&mut conn, language.id),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            get_moment(&mut conn, moment.id),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            rating_repo::get_rating(&mut conn, rating.id),
            Err(ApiError::NotFound(_))
        ));
        let leftover = crate::schema::favorite_movies::table
            .find(entry.0.id)
            .select(crate::schema::favorite_movies::id)
            .first::<i32>(&mut conn)
            .optional()
            .unwrap();
        assert!(leftover.is_none());
        // the list itself belongs to the user and survives
        assert!(favorites::get_favorite(&mut conn, favorite.id).is_ok());
        assert!(matches!(
            delete_movie(&mut conn, movie.id),
            Err(ApiError::NotFound("Movie"))
        ));
    }
}
