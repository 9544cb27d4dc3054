use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use actix_web_httpauth::middleware::HttpAuthentication;
use dotenvy::dotenv;
use env_logger::Env;

use crate::config::Settings;
use crate::errors::ApiError;

mod auth;
mod catalog;
mod config;
mod db;
mod dto;
mod errors;
mod favorites;
mod history;
mod model;
mod movies;
mod ratings;
mod schema;
mod users;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let settings = Settings::from_env().map_err(|e| {
        log::error!("invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;
    let pool = db::build_pool(&settings).map_err(|e| {
        log::error!("failed to create database pool: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    let bind = (settings.host.clone(), settings.port);
    log::info!("listening on {}:{}", bind.0, bind.1);

    let settings = web::Data::new(settings);
    let pool = web::Data::new(pool);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(settings.clone())
            .app_data(pool.clone())
            .configure(configure)
    })
    .bind(bind)?
    .run()
    .await
}

/// Full route table. Register, login and token refresh are public; everything
/// else sits behind the bearer middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .service(users::register_user)
    .service(users::login)
    .service(users::refresh_auth)
    .service(
        web::scope("")
            .wrap(HttpAuthentication::bearer(auth::validator))
            .service(users::logout)
            .service(users::list_users)
            .service(users::create_user_profile)
            .service(users::get_user)
            .service(users::update_user)
            .service(users::delete_user)
            .service(catalog::list_countries)
            .service(catalog::create_country)
            .service(catalog::get_country)
            .service(catalog::update_country)
            .service(catalog::delete_country)
            .service(catalog::list_directors)
            .service(catalog::create_director)
            .service(catalog::get_director)
            .service(catalog::update_director)
            .service(catalog::delete_director)
            .service(catalog::list_actors)
            .service(catalog::create_actor)
            .service(catalog::get_actor)
            .service(catalog::update_actor)
            .service(catalog::delete_actor)
            .service(catalog::list_janres)
            .service(catalog::create_janre)
            .service(catalog::get_janre)
            .service(catalog::update_janre)
            .service(catalog::delete_janre)
            .service(movies::list_languages)
            .service(movies::create_language)
            .service(movies::get_language)
            .service(movies::update_language)
            .service(movies::delete_language)
            .service(movies::list_moments)
            .service(movies::create_moment)
            .service(movies::get_moment)
            .service(movies::update_moment)
            .service(movies::delete_moment)
            .service(ratings::list_ratings)
            .service(ratings::create_rating)
            .service(ratings::list_replies)
            .service(ratings::get_rating)
            .service(ratings::update_rating)
            .service(ratings::delete_rating)
            .service(favorites::list_favorites)
            .service(favorites::create_favorite)
            .service(favorites::get_favorite)
            .service(favorites::update_favorite)
            .service(favorites::delete_favorite)
            .service(favorites::list_favorite_movies)
            .service(favorites::create_favorite_movie)
            .service(favorites::get_favorite_movie)
            .service(favorites::update_favorite_movie)
            .service(favorites::delete_favorite_movie)
            .service(history::list_history)
            .service(history::create_history)
            .service(history::get_history)
            .service(history::update_history)
            .service(history::delete_history)
            // movie routes match on bare numeric ids, so they go last
            .service(movies::list_movies)
            .service(movies::create_movie)
            .service(movies::get_movie)
            .service(movies::update_movie)
            .service(movies::delete_movie),
    );
}
