use chrono::Utc;
use diesel::{
    BoolExpressionMethods, Connection, ExpressionMethods, OptionalExtension, PgConnection,
    QueryDsl, RunQueryDsl, SelectableHelper,
};
use uuid::Uuid;

use crate::auth;
use crate::db::{expect_affected, not_found};
use crate::errors::{ApiError, Result};
use crate::model::{ConnectionModel, NewUser, User, UserProfileChangeset};

pub fn save_new_user(conn: &mut PgConnection, new_user: NewUser) -> Result<User> {
    use crate::schema::users::dsl::*;

    let taken = users
        .filter(username.eq(new_user.username.as_str()))
        .select(id)
        .first::<i32>(conn)
        .optional()?;
    if taken.is_some() {
        return Err(ApiError::field(
            "username",
            "A user with that username already exists.",
        ));
    }

    let user = diesel::insert_into(users)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(conn)?;
    Ok(user)
}

pub fn list_users(conn: &mut PgConnection) -> Result<Vec<User>> {
    use crate::schema::users::dsl::*;

    Ok(users
        .order(id.asc())
        .select(User::as_select())
        .load(conn)?)
}

pub fn get_user(conn: &mut PgConnection, user_id: i32) -> Result<User> {
    use crate::schema::users::dsl::*;

    users
        .find(user_id)
        .select(User::as_select())
        .first(conn)
        .map_err(not_found("User"))
}

pub fn update_profile(
    conn: &mut PgConnection,
    user_id: i32,
    changes: UserProfileChangeset,
) -> Result<User> {
    use crate::schema::users::dsl::*;

    diesel::update(users.find(user_id))
        .set(&changes)
        .returning(User::as_returning())
        .get_result(conn)
        .map_err(not_found("User"))
}

pub fn delete_user(conn: &mut PgConnection, user_id: i32) -> Result<()> {
    use crate::schema::users::dsl::*;

    let rows = diesel::delete(users.find(user_id)).execute(conn)?;
    expect_affected(rows, "User")
}

/// Checks credentials. Unknown users, wrong passwords and inactive accounts all
/// fail the same way.
pub fn login(conn: &mut PgConnection, username_login: &str, password_login: &str) -> Result<User> {
    use crate::schema::users::dsl::*;

    let user = users
        .filter(username.eq(username_login))
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::InvalidCredentials)?;

    if !user.is_active || !auth::verify_password(password_login, &user.password) {
        return Err(ApiError::InvalidCredentials);
    }
    Ok(user)
}

pub fn generate_new_connection(conn: &mut PgConnection, user_id: i32) -> Result<Uuid> {
    use crate::schema::connections::dsl::*;

    let new_connection = ConnectionModel {
        id_connection: Uuid::new_v4(),
        id_user: user_id,
        connect_at: Some(Utc::now().naive_utc()),
        ended_at: None,
    };
    let connection_id = new_connection.id_connection;

    diesel::insert_into(connections)
        .values(new_connection)
        .execute(conn)?;

    Ok(connection_id)
}

pub fn validate_connection(
    conn: &mut PgConnection,
    user_id: i32,
    connection_id: Uuid,
) -> Result<()> {
    use crate::schema::connections::dsl::*;

    let connection = connections
        .filter(id_user.eq(user_id).and(id_connection.eq(connection_id)))
        .select(ConnectionModel::as_select())
        .first(conn)
        .optional()?;

    match connection {
        Some(ConnectionModel { ended_at: None, .. }) => Ok(()),
        Some(_) => Err(ApiError::ExpiredToken),
        None => {
            log::info!("unknown connection {} for user {}", connection_id, user_id);
            Err(ApiError::ExpiredToken)
        }
    }
}

/// Ends a connection; every token issued for it stops validating.
pub fn end_connection(conn: &mut PgConnection, user_id: i32, connection_id: Uuid) -> Result<()> {
    use crate::schema::connections::dsl::*;

    let rows = diesel::update(
        connections.filter(
            id_user
                .eq(user_id)
                .and(id_connection.eq(connection_id))
                .and(ended_at.is_null()),
        ),
    )
    .set(ended_at.eq(Some(Utc::now().naive_utc())))
    .execute(conn)?;

    if rows == 0 {
        return Err(ApiError::ExpiredToken);
    }
    Ok(())
}

/// Swaps an open connection for a fresh one, as done on token refresh.
pub fn rotate_connection(
    conn: &mut PgConnection,
    user_id: i32,
    connection_id: Uuid,
) -> Result<Uuid> {
    conn.transaction(|conn| {
        validate_connection(conn, user_id, connection_id)?;
        end_connection(conn, user_id, connection_id)?;
        generate_new_connection(conn, user_id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{sample_user, test_connection};

    #[test]
    fn test_duplicate_username_is_a_validation_error() {
        let Some(mut conn) = test_connection() else {
            return;
        };
        save_new_user(&mut conn, sample_user("neo")).unwrap();
        let err = save_new_user(&mut conn, sample_user("neo")).unwrap_err();
        match err {
            ApiError::Validation(fields) => assert!(fields.contains_key("username")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_login_checks_password_and_activity() {
        let Some(mut conn) = test_connection() else {
            return;
        };
        let mut new_user = sample_user("trinity");
        new_user.password = auth::hash_password("follow-the-rabbit", 4).unwrap();
        let user = save_new_user(&mut conn, new_user).unwrap();

        assert_eq!(login(&mut conn, "trinity", "follow-the-rabbit").unwrap().id, user.id);
        assert!(matches!(
            login(&mut conn, "trinity", "wrong"),
            Err(ApiError::InvalidCredentials)
        ));
        assert!(matches!(
            login(&mut conn, "nobody", "follow-the-rabbit"),
            Err(ApiError::InvalidCredentials)
        ));

        {
            use crate::schema::users::dsl::*;
            diesel::update(users.find(user.id))
                .set(is_active.eq(false))
                .execute(&mut conn)
                .unwrap();
        }
        assert!(matches!(
            login(&mut conn, "trinity", "follow-the-rabbit"),
            Err(ApiError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_ended_connection_no_longer_validates() {
        let Some(mut conn) = test_connection() else {
            return;
        };
        let user = save_new_user(&mut conn, sample_user("morpheus")).unwrap();
        let connection_id = generate_new_connection(&mut conn, user.id).unwrap();
        validate_connection(&mut conn, user.id, connection_id).unwrap();

        let rotated = rotate_connection(&mut conn, user.id, connection_id).unwrap();
        assert_ne!(rotated, connection_id);
        assert!(matches!(
            validate_connection(&mut conn, user.id, connection_id),
            Err(ApiError::ExpiredToken)
        ));

        end_connection(&mut conn, user.id, rotated).unwrap();
        assert!(matches!(
            validate_connection(&mut conn, user.id, rotated),
            Err(ApiError::ExpiredToken)
        ));
        assert!(matches!(
            end_connection(&mut conn, user.id, rotated),
            Err(ApiError::ExpiredToken)
        ));
    }

    #[test]
    fn test_age_check_is_enforced_by_the_store() {
        let Some(mut conn) = test_connection() else {
            return;
        };
        let user = save_new_user(&mut conn, sample_user("oracle")).unwrap();
        let err = update_profile(
            &mut conn,
            user.id,
            UserProfileChangeset {
                first_name: String::new(),
                last_name: String::new(),
                age: Some(12),
                phone_number: None,
                status: "simple".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
