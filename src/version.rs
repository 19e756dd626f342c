// Package identity, baked in at build time

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const NAME: &str = env!("CARGO_PKG_NAME");

/// `User-Agent` sent with registry pushes, e.g. `marco-docker/0.1.0`.
pub fn user_agent() -> String {
    format!("{NAME}/{VERSION}")
}
