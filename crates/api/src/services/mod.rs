//! Business logic services.
//!
//! - [`auth`] - Registration, activation, login, password changes
//! - [`activation`] - Signed activation tokens
//! - [`email`] - Transactional mail over SMTP
//! - [`media`] - External image host client

pub mod activation;
pub mod auth;
pub mod email;
pub mod media;
