//! Template and response types exchanged with the theme store

use serde::Deserialize;
use serde_json::Value;

use crate::classifier::TemplateKind;

/// Payload of a local template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePayload {
    /// UTF-8 content sent inline
    Text(String),
    /// Raw bytes sent as a file attachment
    Media(Vec<u8>),
}

/// A local template ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Root-relative, forward-slash name
    pub name: String,
    /// Content or binary payload; never both
    pub payload: TemplatePayload,
}

impl Template {
    /// Text template
    #[must_use]
    pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: TemplatePayload::Text(content.into()),
        }
    }

    /// Media template
    #[must_use]
    pub fn media(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            payload: TemplatePayload::Media(bytes),
        }
    }

    /// Transport kind of the payload
    #[must_use]
    pub const fn kind(&self) -> TemplateKind {
        match self.payload {
            TemplatePayload::Text(_) => TemplateKind::Text,
            TemplatePayload::Media(_) => TemplateKind::Media,
        }
    }

    /// Inline content, for text templates
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match &self.payload {
            TemplatePayload::Text(content) => Some(content),
            TemplatePayload::Media(_) => None,
        }
    }

    /// File name used for the attachment (last path segment)
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// A template as listed or fetched from the store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteTemplate {
    /// Root-relative name
    pub name: String,
    /// Inline text content
    #[serde(default)]
    pub content: Option<String>,
    /// Download URL for media templates
    #[serde(default)]
    pub file: Option<String>,
}

impl RemoteTemplate {
    /// Download URL, if this is a media template
    #[must_use]
    pub fn file_url(&self) -> Option<&str> {
        self.file.as_deref().filter(|url| !url.is_empty())
    }
}

/// A theme as listed by the store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Theme {
    /// Theme id
    pub id: u64,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Whether this is the published theme
    #[serde(default)]
    pub active: bool,
}

/// Status and decoded body of a store response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// JSON body; a non-JSON body is kept as a string, an empty one is `Null`
    pub body: Value,
}

impl ApiResponse {
    /// Build a response from a status and body
    #[must_use]
    pub const fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Whether the status is 2xx
    #[must_use]
    pub const fn ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decoded body
    #[must_use]
    pub const fn json(&self) -> &Value {
        &self.body
    }

    /// Join a field-level error message (`["a", "b"]` or `"a"`) from the body
    #[must_use]
    pub fn field_message(&self, field: &str) -> Option<String> {
        match self.body.get(field)? {
            Value::String(message) if !message.is_empty() => Some(message.clone()),
            Value::Array(items) if !items.is_empty() => Some(
                items
                    .iter()
                    .map(|item| {
                        item.as_str()
                            .map_or_else(|| item.to_string(), ToString::to_string)
                    })
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_payloads() {
        let text = Template::text("templates/index.html", "<h1>hi</h1>");
        assert_eq!(text.kind(), TemplateKind::Text);
        assert_eq!(text.content(), Some("<h1>hi</h1>"));

        let media = Template::media("assets/img/logo.png", vec![1, 2, 3]);
        assert_eq!(media.kind(), TemplateKind::Media);
        assert_eq!(media.content(), None);
        assert_eq!(media.file_name(), "logo.png");
    }

    #[test]
    fn test_remote_template_deserialize() {
        let text: RemoteTemplate =
            serde_json::from_value(json!({"name": "templates/index.html", "content": "x", "file": null}))
                .unwrap();
        assert_eq!(text.content.as_deref(), Some("x"));
        assert!(text.file_url().is_none());

        let media: RemoteTemplate = serde_json::from_value(
            json!({"name": "assets/logo.png", "file": "https://cdn.example.com/logo.png"}),
        )
        .unwrap();
        assert_eq!(media.file_url(), Some("https://cdn.example.com/logo.png"));

        let empty_file: RemoteTemplate =
            serde_json::from_value(json!({"name": "a.html", "content": "", "file": ""})).unwrap();
        assert!(empty_file.file_url().is_none());
    }

    #[test]
    fn test_response_ok() {
        assert!(ApiResponse::new(200, Value::Null).ok());
        assert!(ApiResponse::new(201, Value::Null).ok());
        assert!(!ApiResponse::new(400, Value::Null).ok());
        assert!(!ApiResponse::new(404, Value::Null).ok());
    }

    #[test]
    fn test_field_message() {
        let response = ApiResponse::new(
            400,
            json!({"content": ["Invalid", "syntax"], "detail": "not found", "file": []}),
        );

        assert_eq!(response.field_message("content").as_deref(), Some("Invalid syntax"));
        assert_eq!(response.field_message("detail").as_deref(), Some("not found"));
        assert_eq!(response.field_message("file"), None);
        assert_eq!(response.field_message("missing"), None);
    }
}
