use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::TokenService;
use crate::configuration::JwtSettings;
use crate::logger::RequestLogger;
use crate::routes::{
    authenticate, change_password, get_user_by_token, health_check, refresh_token, register,
};
use crate::session::SessionManager;
use crate::store::{CredentialStore, SettingsStore};

pub fn run(
    listener: TcpListener,
    store: Arc<dyn CredentialStore>,
    settings: Arc<dyn SettingsStore>,
    jwt_config: JwtSettings,
) -> Result<Server, std::io::Error> {
    let sessions = web::Data::new(SessionManager::new(
        store,
        settings,
        TokenService::new(jwt_config),
    ));

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default()) // Standard logging
            .wrap(RequestLogger) // Custom logging
            // Shared state
            .app_data(sessions.clone())
            // All session endpoints are public; tokens arrive in request bodies
            .route("/health_check", web::get().to(health_check))
            .route("/authenticate", web::post().to(authenticate))
            .route("/getUserByToken", web::post().to(get_user_by_token))
            .route("/refreshToken", web::post().to(refresh_token))
            .route("/register", web::post().to(register))
            .route("/changePassword", web::post().to(change_password))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
