use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use library_api::database::{DefaultAuthorRepository, establish_pool};
use library_api::http::{AppState, router};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let pool = establish_pool("sqlite::memory:", 1)
        .await
        .expect("failed to open in-memory database");
    router(AppState::new(DefaultAuthorRepository::new(pool)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    app.clone().oneshot(request).await.unwrap()
}

async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create(app: &Router, name: &str, birth_date: &str, nationality: &str) -> String {
    let response = send(
        app,
        "POST",
        "/autores",
        Some(json!({
            "name": name,
            "birthDate": birth_date,
            "nationality": nationality,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let location = response.headers()[header::LOCATION].to_str().unwrap();
    location.rsplit('/').next().unwrap().to_string()
}

#[tokio::test]
async fn created_author_is_reachable_at_location() {
    let app = spawn_app().await;
    let id = create(&app, "Clarice Lispector", "1920-12-10", "Brasileira").await;

    let response = send(&app, "GET", &format!("/autores/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await,
        json!({
            "id": id,
            "name": "Clarice Lispector",
            "birthDate": "1920-12-10",
            "nationality": "Brasileira",
        })
    );
}

#[tokio::test]
async fn duplicate_registration_is_conflict() {
    let app = spawn_app().await;
    create(&app, "Jorge Amado", "1912-08-10", "Brasileira").await;

    let response = send(
        &app,
        "POST",
        "/autores",
        Some(json!({
            "name": "Jorge Amado",
            "birthDate": "1912-08-10",
            "nationality": "Brasileira",
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json(response).await;
    assert_eq!(body["status"], 409);
    assert!(body["message"].as_str().unwrap().contains("Jorge Amado"));
}

#[tokio::test]
async fn delete_then_fetch_is_not_found() {
    let app = spawn_app().await;
    let id = create(&app, "Lima Barreto", "1881-05-13", "Brasileira").await;

    let response = send(&app, "DELETE", &format!("/autores/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", &format!("/autores/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "DELETE", &format!("/autores/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_filters_by_name_and_nationality() {
    let app = spawn_app().await;
    create(&app, "Machado de Assis", "1839-06-21", "Brasileira").await;
    create(&app, "José Saramago", "1922-11-16", "Portuguesa").await;
    create(&app, "Fernando Pessoa", "1888-06-13", "Portuguesa").await;

    let all = read_json(send(&app, "GET", "/autores", None).await).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let portuguese = read_json(send(&app, "GET", "/autores?nacionalidade=portug", None).await).await;
    let names: Vec<_> = portuguese
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Fernando Pessoa", "José Saramago"]);

    let both = read_json(
        send(
            &app,
            "GET",
            "/autores?nome=pessoa&nacionalidade=Portuguesa",
            None,
        )
        .await,
    )
    .await;
    assert_eq!(both.as_array().unwrap().len(), 1);

    let none = read_json(send(&app, "GET", "/autores?nome=Tolkien", None).await).await;
    assert_eq!(none, json!([]));
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_id() {
    let app = spawn_app().await;
    let id = create(&app, "Graciliano", "1892-10-27", "Brasileira").await;

    let response = send(
        &app,
        "PUT",
        &format!("/autores/{id}"),
        Some(json!({
            "id": "00000000-0000-0000-0000-000000000000",
            "name": "Graciliano Ramos",
            "birthDate": "1892-10-28",
            "nationality": "Brasileiro",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = read_json(send(&app, "GET", &format!("/autores/{id}"), None).await).await;
    assert_eq!(
        body,
        json!({
            "id": id,
            "name": "Graciliano Ramos",
            "birthDate": "1892-10-28",
            "nationality": "Brasileiro",
        })
    );
}

#[tokio::test]
async fn update_missing_is_not_found_and_writes_nothing() {
    let app = spawn_app().await;
    let id = "6f1c2b8e-3d4a-4c5b-9e6f-7a8b9c0d1e2f";

    let response = send(
        &app,
        "PUT",
        &format!("/autores/{id}"),
        Some(json!({
            "name": "Ghost",
            "birthDate": "1900-01-01",
            "nationality": "Unknown",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let all = read_json(send(&app, "GET", "/autores", None).await).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn update_into_existing_registration_is_conflict() {
    let app = spawn_app().await;
    create(&app, "Cecília Meireles", "1901-11-07", "Brasileira").await;
    let id = create(&app, "Cecilia", "1901-11-07", "Brasileira").await;

    let response = send(
        &app,
        "PUT",
        &format!("/autores/{id}"),
        Some(json!({
            "name": "Cecília Meireles",
            "birthDate": "1901-11-07",
            "nationality": "Brasileira",
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let app = spawn_app().await;

    let response = send(&app, "GET", "/autores/not-a-uuid", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["status"], 400);
}
