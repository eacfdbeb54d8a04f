use std::env;

/// Runtime configuration, loaded once at startup.
///
/// The signing secret and token lifetime are deliberately plain fields on an
/// explicitly constructed value: they are handed to `TokenService::new` by the
/// caller instead of being read from the environment at use sites, so tests
/// can build token services with secrets of their own.
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub token_lifetime_minutes: i64,
}

impl Config {
    /// Reads configuration from the environment.
    ///
    /// Panics when a required variable is missing or malformed; the process
    /// must not come up half-configured.
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            token_lifetime_minutes: env::var("JWT_EXPIRATION_MINUTES")
                .expect("JWT_EXPIRATION_MINUTES must be set")
                .parse()
                .expect("JWT_EXPIRATION_MINUTES must be a number"),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
