use diesel::{ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper};

use crate::db::{expect_affected, not_found};
use crate::errors::Result;
use crate::model::{
    Actor, Country, Director, Janre, NewActor, NewCountry, NewDirector, NewJanre,
};

pub fn list_countries(conn: &mut PgConnection) -> Result<Vec<Country>> {
    use crate::schema::countries::dsl::*;

    Ok(countries
        .order(id.asc())
        .select(Country::as_select())
        .load(conn)?)
}

pub fn get_country(conn: &mut PgConnection, country_id: i32) -> Result<Country> {
    use crate::schema::countries::dsl::*;

    countries
        .find(country_id)
        .select(Country::as_select())
        .first(conn)
        .map_err(not_found("Country"))
}

pub fn create_country(conn: &mut PgConnection, new_country: NewCountry) -> Result<Country> {
    use crate::schema::countries::dsl::*;

    Ok(diesel::insert_into(countries)
        .values(&new_country)
        .returning(Country::as_returning())
        .get_result(conn)?)
}

pub fn update_country(
    conn: &mut PgConnection,
    country_id: i32,
    changes: NewCountry,
) -> Result<Country> {
    use crate::schema::countries::dsl::*;

    diesel::update(countries.find(country_id))
        .set(&changes)
        .returning(Country::as_returning())
        .get_result(conn)
        .map_err(not_found("Country"))
}

pub fn delete_country(conn: &mut PgConnection, country_id: i32) -> Result<()> {
    use crate::schema::countries::dsl::*;

    let rows = diesel::delete(countries.find(country_id)).execute(conn)?;
    expect_affected(rows, "Country")
}

pub fn list_directors(conn: &mut PgConnection) -> Result<Vec<Director>> {
    use crate::schema::directors::dsl::*;

    Ok(directors
        .order(id.asc())
        .select(Director::as_select())
        .load(conn)?)
}

pub fn get_director(conn: &mut PgConnection, director_id: i32) -> Result<Director> {
    use crate::schema::directors::dsl::*;

    directors
        .find(director_id)
        .select(Director::as_select())
        .first(conn)
        .map_err(not_found("Director"))
}

pub fn create_director(conn: &mut PgConnection, new_director: NewDirector) -> Result<Director> {
    use crate::schema::directors::dsl::*;

    Ok(diesel::insert_into(directors)
        .values(&new_director)
        .returning(Director::as_returning())
        .get_result(conn)?)
}

pub fn update_director(
    conn: &mut PgConnection,
    director_id: i32,
    changes: NewDirector,
) -> Result<Director> {
    use crate::schema::directors::dsl::*;

    diesel::update(directors.find(director_id))
        .set(&changes)
        .returning(Director::as_returning())
        .get_result(conn)
        .map_err(not_found("Director"))
}

pub fn delete_director(conn: &mut PgConnection, director_id: i32) -> Result<()> {
    use crate::schema::directors::dsl::*;

    let rows = diesel::delete(directors.find(director_id)).execute(conn)?;
    expect_affected(rows, "Director")
}

pub fn list_actors(conn: &mut PgConnection) -> Result<Vec<Actor>> {
    use crate::schema::actors::dsl::*;

    Ok(actors
        .order(id.asc())
        .select(Actor::as_select())
        .load(conn)?)
}

pub fn get_actor(conn: &mut PgConnection, actor_id: i32) -> Result<Actor> {
    use crate::schema::actors::dsl::*;

    actors
        .find(actor_id)
        .select(Actor::as_select())
        .first(conn)
        .map_err(not_found("Actor"))
}

pub fn create_actor(conn: &mut PgConnection, new_actor: NewActor) -> Result<Actor> {
    use crate::schema::actors::dsl::*;

    Ok(diesel::insert_into(actors)
        .values(&new_actor)
        .returning(Actor::as_returning())
        .get_result(conn)?)
}

pub fn update_actor(conn: &mut PgConnection, actor_id: i32, changes: NewActor) -> Result<Actor> {
    use crate::schema::actors::dsl::*;

    diesel::update(actors.find(actor_id))
        .set(&changes)
        .returning(Actor::as_returning())
        .get_result(conn)
        .map_err(not_found("Actor"))
}

pub fn delete_actor(conn: &mut PgConnection, actor_id: i32) -> Result<()> {
    use crate::schema::actors::dsl::*;

    let rows = diesel::delete(actors.find(actor_id)).execute(conn)?;
    expect_affected(rows, "Actor")
}

pub fn list_janres(conn: &mut PgConnection) -> Result<Vec<Janre>> {
    use crate::schema::janres::dsl::*;

    Ok(janres
        .order(id.asc())
        .select(Janre::as_select())
        .load(conn)?)
}

pub fn get_janre(conn: &mut PgConnection, janre_id: i32) -> Result<Janre> {
    use crate::schema::janres::dsl::*;

    janres
        .find(janre_id)
        .select(Janre::as_select())
        .first(conn)
        .map_err(not_found("Janre"))
}

pub fn create_janre(conn: &mut PgConnection, new_janre: NewJanre) -> Result<Janre> {
    use crate::schema::janres::dsl::*;

    Ok(diesel::insert_into(janres)
        .values(&new_janre)
        .returning(Janre::as_returning())
        .get_result(conn)?)
}

pub fn update_janre(conn: &mut PgConnection, janre_id: i32, changes: NewJanre) -> Result<Janre> {
    use crate::schema::janres::dsl::*;

    diesel::update(janres.find(janre_id))
        .set(&changes)
        .returning(Janre::as_returning())
        .get_result(conn)
        .map_err(not_found("Janre"))
}

pub fn delete_janre(conn: &mut PgConnection, janre_id: i32) -> Result<()> {
    use crate::schema::janres::dsl::*;

    let rows = diesel::delete(janres.find(janre_id)).execute(conn)?;
    expect_affected(rows, "Janre")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_connection;
    use crate::errors::ApiError;

    #[test]
    fn test_country_name_is_unique() {
        let Some(mut conn) = test_connection() else {
            return;
        };
        create_country(
            &mut conn,
            NewCountry {
                country_name: "Kyrgyzstan".to_string(),
            },
        )
        .unwrap();
        let err = create_country(
            &mut conn,
            NewCountry {
                country_name: "Kyrgyzstan".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::AlreadyExists(_)));
    }

    #[test]
    fn test_deleting_a_country_removes_its_directors() {
        let Some(mut conn) = test_connection() else {
            return;
        };
        let country = create_country(
            &mut conn,
            NewCountry {
                country_name: "France".to_string(),
            },
        )
        .unwrap();
        let director = create_director(
            &mut conn,
            NewDirector {
                director_name: "Agnes Varda".to_string(),
                country_id: country.id,
                bio: String::new(),
                age: 90,
                director_image: None,
            },
        )
        .unwrap();

        delete_country(&mut conn, country.id).unwrap();
        assert!(matches!(
            get_director(&mut conn, director.id),
            Err(ApiError::NotFound("Director"))
        ));
    }

    #[test]
    fn test_update_and_delete_missing_rows_are_not_found() {
        let Some(mut conn) = test_connection() else {
            return;
        };
        assert!(matches!(
            update_janre(
                &mut conn,
                999,
                NewJanre {
                    janre_name: "Drama".to_string()
                }
            ),
            Err(ApiError::NotFound("Janre"))
        ));
        assert!(matches!(
            delete_actor(&mut conn, 999),
            Err(ApiError::NotFound("Actor"))
        ));
    }
}
