//! HTTP gateway tests against a local mock store

use serde_json::json;
use themesync_core::error::GatewayError;
use themesync_core::gateway::{Gateway, HttpGateway, Template};
use tokio::runtime::Runtime;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// The blocking client must not run inside the runtime; the mock server
// serves from its own thread.
fn start() -> (Runtime, MockServer) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let server = rt.block_on(MockServer::start());
    (rt, server)
}

fn mount(rt: &Runtime, server: &MockServer, mock: Mock) {
    rt.block_on(mock.mount(server));
}

#[test]
fn test_get_themes_sends_token() {
    let (rt, server) = start();
    mount(
        &rt,
        &server,
        Mock::given(method("GET"))
            .and(path("/api/admin/themes/"))
            .and(header("Authorization", "Token secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": 1, "name": "Default", "active": true}]
            })))
            .expect(1),
    );

    let gateway = HttpGateway::new(&server.uri(), "secret").unwrap();
    let response = gateway.get_themes().unwrap();

    assert!(response.ok());
    assert_eq!(response.json()["results"][0]["name"], "Default");
}

#[test]
fn test_create_theme_posts_name() {
    let (rt, server) = start();
    mount(
        &rt,
        &server,
        Mock::given(method("POST"))
            .and(path("/api/admin/themes/"))
            .and(body_string_contains("\"name\":\"Summer\""))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"id": 9, "name": "Summer"})),
            )
            .expect(1),
    );

    let gateway = HttpGateway::new(&server.uri(), "secret").unwrap();
    let response = gateway.create_theme("Summer").unwrap();

    assert_eq!(response.status, 201);
    assert_eq!(response.json()["id"], 9);
}

#[test]
fn test_upload_text_template_as_multipart() {
    let (rt, server) = start();
    mount(
        &rt,
        &server,
        Mock::given(method("POST"))
            .and(path("/api/admin/themes/7/templates/"))
            .and(body_string_contains("templates/index.html"))
            .and(body_string_contains("<h1>hello</h1>"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1),
    );

    let gateway = HttpGateway::new(&server.uri(), "secret").unwrap();
    let template = Template::text("templates/index.html", "<h1>hello</h1>");
    let response = gateway.create_or_update_template(7, &template).unwrap();

    assert!(response.ok());
}

#[test]
fn test_upload_media_template_as_file_part() {
    let (rt, server) = start();
    mount(
        &rt,
        &server,
        Mock::given(method("POST"))
            .and(path("/api/admin/themes/7/templates/"))
            .and(body_string_contains("filename=\"logo.png\""))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1),
    );

    let gateway = HttpGateway::new(&server.uri(), "secret").unwrap();
    let template = Template::media("assets/img/logo.png", b"PNGDATA".to_vec());
    let response = gateway.create_or_update_template(7, &template).unwrap();

    assert!(response.ok());
}

#[test]
fn test_rejection_is_a_response_not_an_error() {
    let (rt, server) = start();
    mount(
        &rt,
        &server,
        Mock::given(method("DELETE"))
            .and(path("/api/admin/themes/7/templates/"))
            .and(query_param("name", "templates/old.html"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"detail": ["not found"]})),
            )
            .expect(1),
    );

    let gateway = HttpGateway::new(&server.uri(), "secret").unwrap();
    let response = gateway.delete_template(7, "templates/old.html").unwrap();

    assert!(!response.ok());
    assert_eq!(response.field_message("detail").as_deref(), Some("not found"));
}

#[test]
fn test_get_template_by_name() {
    let (rt, server) = start();
    mount(
        &rt,
        &server,
        Mock::given(method("GET"))
            .and(path("/api/admin/themes/7/templates/"))
            .and(query_param("name", "snippets/nav.liquid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "snippets/nav.liquid", "content": "{% nav %}", "file": null}
            ])))
            .expect(1),
    );

    let gateway = HttpGateway::new(&server.uri(), "secret").unwrap();
    let response = gateway.get_template(7, "snippets/nav.liquid").unwrap();

    assert_eq!(response.json()[0]["content"], "{% nav %}");
}

#[test]
fn test_non_json_body_is_kept_as_text() {
    let (rt, server) = start();
    mount(
        &rt,
        &server,
        Mock::given(method("GET"))
            .and(path("/api/admin/themes/404/templates/"))
            .respond_with(ResponseTemplate::new(404).set_body_string("<html>Not Found</html>")),
    );

    let gateway = HttpGateway::new(&server.uri(), "secret").unwrap();
    let response = gateway.get_templates(404).unwrap();

    assert!(!response.ok());
    assert!(!response.json().is_array());
    assert_eq!(response.json().as_str(), Some("<html>Not Found</html>"));
}

#[test]
fn test_download_bytes_and_failure() {
    let (rt, server) = start();
    mount(
        &rt,
        &server,
        Mock::given(method("GET"))
            .and(path("/media/logo.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1_u8, 2, 3])),
    );
    mount(
        &rt,
        &server,
        Mock::given(method("GET"))
            .and(path("/media/missing.png"))
            .respond_with(ResponseTemplate::new(404)),
    );

    let gateway = HttpGateway::new(&server.uri(), "secret").unwrap();

    let bytes = gateway
        .download(&format!("{}/media/logo.png", server.uri()))
        .unwrap();
    assert_eq!(bytes, vec![1, 2, 3]);

    let err = gateway
        .download(&format!("{}/media/missing.png", server.uri()))
        .unwrap_err();
    assert!(matches!(err, GatewayError::Download { status: 404, .. }));
}
