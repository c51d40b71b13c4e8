//! Blocking HTTP implementation of the gateway

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::AUTHORIZATION;
use serde_json::{Value, json};
use tracing::debug;

use super::types::{ApiResponse, Template, TemplatePayload};
use super::{Gateway, GatewayResult};
use crate::error::GatewayError;

/// Theme store client over HTTP
///
/// One client (and its connection pool) is reused for every call of an
/// invocation.
pub struct HttpGateway {
    http: Client,
    store: String,
    apikey: String,
}

impl HttpGateway {
    /// Create a gateway for `store`, authenticating with `apikey`
    ///
    /// # Errors
    ///
    /// Returns an error if the store URL is not an http(s) URL or the client
    /// cannot be built.
    pub fn new(store: &str, apikey: &str) -> GatewayResult<Self> {
        if store.is_empty() {
            return Err(GatewayError::InvalidUrl("URL cannot be empty".into()));
        }

        let store = store.trim_end_matches('/').to_string();
        if !store.starts_with("http://") && !store.starts_with("https://") {
            return Err(GatewayError::InvalidUrl(format!(
                "{store} must start with http:// or https://"
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("themesync/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            store,
            apikey: apikey.to_string(),
        })
    }

    fn themes_url(&self) -> String {
        format!("{}/api/admin/themes/", self.store)
    }

    fn templates_url(&self, theme_id: u64) -> String {
        format!("{}/api/admin/themes/{theme_id}/templates/", self.store)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, format!("Token {}", self.apikey))
    }

    fn send(&self, request: RequestBuilder) -> GatewayResult<ApiResponse> {
        let response = self.authorized(request).send()?;
        let status = response.status().as_u16();
        let text = response.text()?;

        debug!(status, bytes = text.len(), "Store responded");

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(ApiResponse::new(status, body))
    }
}

impl Gateway for HttpGateway {
    fn create_or_update_template(
        &self,
        theme_id: u64,
        template: &Template,
    ) -> GatewayResult<ApiResponse> {
        let form = Form::new().text("name", template.name.clone());
        let form = match &template.payload {
            TemplatePayload::Text(content) => form.text("content", content.clone()),
            TemplatePayload::Media(bytes) => form.text("content", String::new()).part(
                "file",
                Part::bytes(bytes.clone()).file_name(template.file_name().to_string()),
            ),
        };

        debug!(theme_id, name = %template.name, "Uploading template");
        self.send(self.http.post(self.templates_url(theme_id)).multipart(form))
    }

    fn get_template(&self, theme_id: u64, name: &str) -> GatewayResult<ApiResponse> {
        self.send(
            self.http
                .get(self.templates_url(theme_id))
                .query(&[("name", name)]),
        )
    }

    fn get_templates(&self, theme_id: u64) -> GatewayResult<ApiResponse> {
        self.send(self.http.get(self.templates_url(theme_id)))
    }

    fn delete_template(&self, theme_id: u64, name: &str) -> GatewayResult<ApiResponse> {
        self.send(
            self.http
                .delete(self.templates_url(theme_id))
                .query(&[("name", name)]),
        )
    }

    fn create_theme(&self, name: &str) -> GatewayResult<ApiResponse> {
        self.send(self.http.post(self.themes_url()).json(&json!({ "name": name })))
    }

    fn get_themes(&self) -> GatewayResult<ApiResponse> {
        self.send(self.http.get(self.themes_url()))
    }

    fn download(&self, url: &str) -> GatewayResult<Vec<u8>> {
        let response = self.authorized(self.http.get(url)).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Download {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes()?.to_vec())
    }
}
