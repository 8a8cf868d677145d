//! CLI command implementations.

pub mod admin;
pub mod migrate;

/// Read the database URL, preferring the app-specific variable.
pub(crate) fn database_url() -> Result<String, MissingEnvVar> {
    dotenvy::dotenv().ok();

    std::env::var("MANDARIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MissingEnvVar("MANDARIN_DATABASE_URL"))
}

/// Required environment variable is missing.
#[derive(Debug, thiserror::Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVar(pub &'static str);
