//! Integration tests: the real HTTP backend against an in-process lookup server.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::config::FormConfig;
use crate::errors::FormError;
use crate::form::{FieldValue, FormEvent, FormSession, UiEffect};
use crate::models::{OptionItem, RowField, RowIndex, Severity};
use crate::remote::{self, HttpBackend, OptionFetcher, PersonService, RemoteRequest};

async fn brigades(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let data = match params.get("point_id").map(String::as_str) {
        Some("1") => json!([
            {"id": 12, "nombre": "Brigada Sur"},
            {"id": 11, "nombre": "Brigada Norte"}
        ]),
        Some("2") => json!([{"id": 21, "nombre": "Brigada Huaraz"}]),
        _ => json!([]),
    };
    Json(json!({ "data": data }))
}

async fn roles(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let personnel_type = params.get("personnel_type").cloned().unwrap_or_default();
    Json(json!({
        "data": [{"id": format!("{}-r1", personnel_type), "nombre": "Vacunador"}]
    }))
}

async fn delete_person(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    match id.as_str() {
        "1" => Ok(Json(json!({"msg": "Persona eliminada correctamente", "tipo_msg": ""}))),
        "2" => Ok(Json(
            json!({"msg": "La persona tiene asignaciones registradas", "tipo_msg": "warning"}),
        )),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

/// Test fixture running the lookup server on a random port.
struct TestFixture {
    base_url: String,
}

impl TestFixture {
    async fn new() -> Self {
        let app = Router::new()
            .route("/brigadas", get(brigades))
            .route("/roles", get(roles))
            .route("/roles-caidos", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/basura", get(|| async { "<html>login</html>" }))
            .route("/persona/eliminar/{id}", get(delete_person));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestFixture {
            base_url: format!("http://{}", addr),
        }
    }

    fn config(&self) -> FormConfig {
        FormConfig {
            person_type_context: None,
            list_url: self.url("/persona/listar-persona"),
            delete_url_template: self.url("/persona/eliminar/{id}"),
            id_placeholder: "{id}".to_string(),
            brigades_url: self.url("/brigadas"),
            roles_url: self.url("/roles"),
            coordination_team_id: "9".to_string(),
            home_url: "/".to_string(),
            create_person_url: "/persona/crear-persona".to_string(),
            locale_url: "/static/es.json".to_string(),
            request_timeout: Duration::from_secs(5),
            normalize_delay: Duration::from_millis(50),
            log_level: "warn".to_string(),
        }
    }

    fn backend(&self, config: FormConfig) -> HttpBackend {
        HttpBackend::new(Arc::new(config)).expect("Failed to build client")
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Address nobody listens on.
async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_brigades_in_server_order() {
    let fixture = TestFixture::new().await;
    let backend = fixture.backend(fixture.config());

    let options = backend.fetch_brigades("1").await.unwrap();
    assert_eq!(
        options,
        vec![
            OptionItem::new("12", "Brigada Sur"),
            OptionItem::new("11", "Brigada Norte"),
        ]
    );

    assert!(backend.fetch_brigades("404").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_roles_use_personnel_type_param() {
    let fixture = TestFixture::new().await;
    let backend = fixture.backend(fixture.config());

    let options = backend.fetch_roles("4").await.unwrap();
    assert_eq!(options, vec![OptionItem::new("4-r1", "Vacunador")]);
}

#[tokio::test]
async fn test_error_status_propagates() {
    let fixture = TestFixture::new().await;
    let mut config = fixture.config();
    config.roles_url = fixture.url("/roles-caidos");
    let backend = fixture.backend(config);

    let err = backend.fetch_roles("4").await.unwrap_err();
    assert!(matches!(err, FormError::Status { status: 500, .. }), "{:?}", err);
}

#[tokio::test]
async fn test_undecodable_body_propagates() {
    let fixture = TestFixture::new().await;
    let mut config = fixture.config();
    config.brigades_url = fixture.url("/basura");
    let backend = fixture.backend(config);

    let err = backend.fetch_brigades("1").await.unwrap_err();
    assert!(matches!(err, FormError::Decode(_)), "{:?}", err);
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let fixture = TestFixture::new().await;
    let mut config = fixture.config();
    config.brigades_url = format!("{}/brigadas", dead_address().await);
    let backend = fixture.backend(config);

    let err = backend.fetch_brigades("1").await.unwrap_err();
    assert!(matches!(err, FormError::Transport(_)), "{:?}", err);
}

#[tokio::test]
async fn test_row_cascade_end_to_end() {
    let fixture = TestFixture::new().await;
    let config = fixture.config();
    let backend = fixture.backend(config.clone());
    let mut session = FormSession::new(Arc::new(config));

    session.handle(FormEvent::RowChanged {
        row: RowIndex(0),
        field: RowField::Brigades,
        value: FieldValue::Many(vec!["11".to_string(), "99".to_string()]),
    });
    let outcome = session.handle(FormEvent::ControlChanged {
        control_id: "id_asignacionpersonal_set-0-punto_vacunacion".to_string(),
        value: FieldValue::from("1"),
    });
    assert_eq!(outcome.requests.len(), 1);

    for request in outcome.requests {
        let completion = remote::execute(&backend, request).await;
        session.complete(completion);
    }

    let row = session.row(RowIndex(0)).unwrap();
    let ids: Vec<&str> = row.brigades.options.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["12", "11"]);
    assert_eq!(row.brigades.selected, vec!["11".to_string()]);
}

#[tokio::test]
async fn test_stale_point_fetch_over_http() {
    let fixture = TestFixture::new().await;
    let config = fixture.config();
    let backend = fixture.backend(config.clone());
    let mut session = FormSession::new(Arc::new(config));

    let first = session.handle(FormEvent::RowChanged {
        row: RowIndex(3),
        field: RowField::Point,
        value: FieldValue::from("1"),
    });
    let second = session.handle(FormEvent::RowChanged {
        row: RowIndex(3),
        field: RowField::Point,
        value: FieldValue::from("2"),
    });

    let second = remote::execute(&backend, second.requests[0].clone()).await;
    let first = remote::execute(&backend, first.requests[0].clone()).await;
    assert_eq!(session.complete(second).len(), 2);
    assert!(session.complete(first).is_empty());

    let row = session.row(RowIndex(3)).unwrap();
    assert_eq!(row.brigades.options, vec![OptionItem::new("21", "Brigada Huaraz")]);
}

async fn delete_through_session(backend: &HttpBackend, config: FormConfig, id: &str) -> Vec<UiEffect> {
    let mut session = FormSession::new(Arc::new(config));
    session.handle(FormEvent::DeleteRequested {
        entity_id: id.to_string(),
    });
    let outcome = session.handle(FormEvent::ConfirmResolved { confirmed: true });
    let [request] = outcome.requests.as_slice() else {
        panic!("expected one delete request, got {:?}", outcome.requests);
    };
    assert!(matches!(request, RemoteRequest::DeletePerson { .. }));

    let completion = remote::execute(backend, request.clone()).await;
    session.complete(completion)
}

#[tokio::test]
async fn test_delete_success_navigates_home() {
    let fixture = TestFixture::new().await;
    let backend = fixture.backend(fixture.config());

    let effects = delete_through_session(&backend, fixture.config(), "1").await;
    assert_eq!(
        effects,
        vec![
            UiEffect::Notify {
                text: "Persona eliminada correctamente".to_string(),
                severity: Severity::Success,
            },
            UiEffect::Navigate {
                url: "/".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn test_delete_refusal_stays_on_page() {
    let fixture = TestFixture::new().await;
    let backend = fixture.backend(fixture.config());

    let effects = delete_through_session(&backend, fixture.config(), "2").await;
    assert_eq!(
        effects,
        vec![UiEffect::Notify {
            text: "La persona tiene asignaciones registradas".to_string(),
            severity: Severity::Warning,
        }]
    );
}

#[tokio::test]
async fn test_delete_failure_shows_generic_error() {
    let fixture = TestFixture::new().await;
    let backend = fixture.backend(fixture.config());

    let effects = delete_through_session(&backend, fixture.config(), "404").await;
    assert!(matches!(
        effects.as_slice(),
        [UiEffect::Notify {
            severity: Severity::Error,
            ..
        }]
    ));

    let mut config = fixture.config();
    config.delete_url_template = format!("{}/persona/eliminar/{{id}}", dead_address().await);
    let backend = fixture.backend(config.clone());
    let err = backend.delete_person("1").await.unwrap_err();
    assert!(matches!(err, FormError::Transport(_)));

    let effects = delete_through_session(&backend, config, "1").await;
    assert_eq!(
        effects,
        vec![UiEffect::Notify {
            text: crate::form::DELETE_FAILED_TEXT.to_string(),
            severity: Severity::Error,
        }]
    );
}
