//! HTTP routes mapping the store operations onto the wire.
//!
//! Every handler takes the shared store handle injected at startup; there
//! is no ambient connection state.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;
use tokio::sync::RwLock;
use trackit_core::storage::RowStore;
use trackit_core::types::{Archive, Json as JsonValue};
use trackit_core::Store;

use crate::error::ApiError;
use crate::response::PrettyJson;

pub type SharedStore<S> = Arc<RwLock<Store<S>>>;

pub fn router<S>(store: SharedStore<S>) -> Router
where
    S: RowStore + Send + Sync + 'static,
{
    Router::new()
        .route("/schemata/{namespace}/", get(get_schemata::<S>))
        .route("/schemata/{namespace}/{name}/", put(set_schema::<S>))
        .route("/data/{namespace}/{schema}/", get(get_data::<S>))
        .route(
            "/data/{namespace}/{schema}/{key}/",
            get(get_datum::<S>).put(set_datum::<S>),
        )
        .route("/archive/", get(get_archive::<S>).put(restore_archive::<S>))
        .route("/purge/", post(purge::<S>))
        .with_state(store)
}

async fn get_schemata<S: RowStore + Send + Sync + 'static>(
    State(store): State<SharedStore<S>>,
    Path(namespace): Path<String>,
) -> Result<PrettyJson<BTreeMap<String, JsonValue>>, ApiError> {
    let schemata = store.read().await.get_schemata(&namespace)?;
    Ok(PrettyJson(schemata))
}

async fn set_schema<S: RowStore + Send + Sync + 'static>(
    State(store): State<SharedStore<S>>,
    Path((namespace, name)): Path<(String, String)>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<PrettyJson<BTreeMap<String, JsonValue>>, ApiError> {
    let Json(body) = body?;
    let stored = store.write().await.set_schema(&namespace, &name, body)?;
    Ok(PrettyJson(BTreeMap::from([(name, stored)])))
}

async fn get_data<S: RowStore + Send + Sync + 'static>(
    State(store): State<SharedStore<S>>,
    Path((namespace, schema)): Path<(String, String)>,
) -> Result<PrettyJson<BTreeMap<String, JsonValue>>, ApiError> {
    let data = store.read().await.get_data(&namespace, &schema)?;
    Ok(PrettyJson(data))
}

async fn set_datum<S: RowStore + Send + Sync + 'static>(
    State(store): State<SharedStore<S>>,
    Path((namespace, schema, key)): Path<(String, String, String)>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<PrettyJson<BTreeMap<String, JsonValue>>, ApiError> {
    let Json(value) = body?;
    let stored = store
        .write()
        .await
        .set_datum(&namespace, &schema, &key, value)?;
    Ok(PrettyJson(BTreeMap::from([(key, stored)])))
}

async fn get_datum<S: RowStore + Send + Sync + 'static>(
    State(store): State<SharedStore<S>>,
    Path((namespace, schema, key)): Path<(String, String, String)>,
) -> Result<PrettyJson<JsonValue>, ApiError> {
    let value = store.read().await.get_datum(&namespace, &schema, &key)?;
    Ok(PrettyJson(value))
}

async fn get_archive<S: RowStore + Send + Sync + 'static>(
    State(store): State<SharedStore<S>>,
) -> Result<PrettyJson<Archive>, ApiError> {
    let archive = store.read().await.get_archive()?;
    Ok(PrettyJson(archive))
}

async fn restore_archive<S: RowStore + Send + Sync + 'static>(
    State(store): State<SharedStore<S>>,
    body: Result<Json<Archive>, JsonRejection>,
) -> Result<PrettyJson<Archive>, ApiError> {
    let Json(archive) = body?;
    store.write().await.restore_archive(&archive)?;
    Ok(PrettyJson(archive))
}

async fn purge<S: RowStore + Send + Sync + 'static>(
    State(store): State<SharedStore<S>>,
) -> Result<PrettyJson<JsonValue>, ApiError> {
    store.write().await.purge()?;
    Ok(PrettyJson(json!({})))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> Router {
        router(Arc::new(RwLock::new(Store::in_memory())))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<JsonValue>,
    ) -> (StatusCode, JsonValue) {
        let request = match body {
            Some(value) => Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn schema_put_then_list() {
        let app = test_app();
        let (status, body) = send(
            &app,
            Method::PUT,
            "/schemata/alice/daily/",
            Some(json!({"mood": {"type": "string"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"daily": {"mood": {"type": "string"}}}));

        let (status, body) = send(&app, Method::GET, "/schemata/alice/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"daily": {"mood": {"type": "string"}}}));
    }

    #[tokio::test]
    async fn empty_namespace_lists_empty_object() {
        let app = test_app();
        let (status, body) = send(&app, Method::GET, "/schemata/nobody/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn datum_put_get_and_list() {
        let app = test_app();
        let (status, body) = send(
            &app,
            Method::PUT,
            "/data/alice/daily/2024-01-01/",
            Some(json!({"mood": "good"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"2024-01-01": {"mood": "good"}}));

        let (status, body) = send(&app, Method::GET, "/data/alice/daily/2024-01-01/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"mood": "good"}));

        let (status, body) = send(&app, Method::GET, "/data/alice/daily/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"2024-01-01": {"mood": "good"}}));
    }

    #[tokio::test]
    async fn unknown_datum_is_404() {
        let app = test_app();
        let (status, body) = send(&app, Method::GET, "/data/alice/daily/nope/", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let app = test_app();
        let request = Request::builder()
            .method(Method::PUT)
            .uri("/schemata/alice/daily/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn namespace_with_encoded_separator_is_400() {
        // %2F decodes to '/' inside the path segment
        let app = test_app();
        let (status, body) = send(
            &app,
            Method::PUT,
            "/schemata/a%2Fb/daily/",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid key"));
    }

    #[tokio::test]
    async fn archive_round_trip_over_http() {
        let app = test_app();
        send(
            &app,
            Method::PUT,
            "/schemata/alice/daily/",
            Some(json!({"mood": {"type": "string"}})),
        )
        .await;
        send(
            &app,
            Method::PUT,
            "/data/alice/daily/2024-01-01/",
            Some(json!({"mood": "good"})),
        )
        .await;

        let (status, archive) = send(&app, Method::GET, "/archive/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            archive,
            json!({
                "alice": {
                    "daily": {
                        "schema": {"mood": {"type": "string"}},
                        "data": {"2024-01-01": {"mood": "good"}}
                    }
                }
            })
        );

        let (status, body) = send(&app, Method::POST, "/purge/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));

        let (status, echoed) = send(&app, Method::PUT, "/archive/", Some(archive.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(echoed, archive);

        let (_, restored) = send(&app, Method::GET, "/archive/", None).await;
        assert_eq!(restored, archive);
    }

    #[tokio::test]
    async fn purge_clears_all_namespaces() {
        let app = test_app();
        send(&app, Method::PUT, "/schemata/alice/daily/", Some(json!({}))).await;
        send(&app, Method::PUT, "/data/bob/log/k1/", Some(json!(1))).await;

        send(&app, Method::POST, "/purge/", None).await;

        let (_, schemata) = send(&app, Method::GET, "/schemata/alice/", None).await;
        assert_eq!(schemata, json!({}));
        let (_, data) = send(&app, Method::GET, "/data/bob/log/", None).await;
        assert_eq!(data, json!({}));
    }
}
