//! Remote theme store access
//!
//! The [`Gateway`] trait is the only way the sync engine talks to the store.
//! [`HttpGateway`] implements it over HTTP; tests substitute a mock.

mod http;
mod types;

pub use http::HttpGateway;
pub use types::{ApiResponse, RemoteTemplate, Template, TemplatePayload, Theme};

use crate::error::GatewayError;

/// Result of a gateway call
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Theme and template CRUD against the remote store
///
/// Non-success HTTP statuses are not errors: they come back as an
/// [`ApiResponse`] whose `ok()` is false. Errors mean the request itself
/// failed.
#[cfg_attr(test, mockall::automock)]
pub trait Gateway {
    /// Create a template, or update it when one with the same name exists
    fn create_or_update_template(
        &self,
        theme_id: u64,
        template: &Template,
    ) -> GatewayResult<ApiResponse>;

    /// Fetch a single template by name
    fn get_template(&self, theme_id: u64, name: &str) -> GatewayResult<ApiResponse>;

    /// List every template of a theme
    fn get_templates(&self, theme_id: u64) -> GatewayResult<ApiResponse>;

    /// Delete a template by name
    fn delete_template(&self, theme_id: u64, name: &str) -> GatewayResult<ApiResponse>;

    /// Create a new theme
    fn create_theme(&self, name: &str) -> GatewayResult<ApiResponse>;

    /// List themes of the store
    fn get_themes(&self) -> GatewayResult<ApiResponse>;

    /// Download a media file
    fn download(&self, url: &str) -> GatewayResult<Vec<u8>>;
}
