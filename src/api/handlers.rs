// Puppy CRUD handlers
// One function per operation; method dispatch happens in the module entry

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::sync::Arc;

use super::response::{created_response, error_response, json_response, no_content};
use super::types::{parse_new_puppy, parse_puppy_patch};
use crate::config::AppState;
use crate::logger;
use crate::routing::COLLECTION_PATH;

/// GET on the collection: every record, ordered by id.
pub async fn list_puppies(state: Arc<AppState>) -> Response<Full<Bytes>> {
    match state.store.list().await {
        Ok(puppies) => json_response(StatusCode::OK, &puppies),
        Err(e) => {
            logger::log_error(&format!("list failed: {e}"));
            error_response(&e.into())
        }
    }
}

/// POST on the collection: validate, assign an id, persist.
pub async fn create_puppy(state: Arc<AppState>, body: &Bytes) -> Response<Full<Bytes>> {
    let new = match parse_new_puppy(body) {
        Ok(new) => new,
        Err(e) => {
            logger::log_warning(&format!("create rejected: {e}"));
            return error_response(&e);
        }
    };

    match state.store.create(new).await {
        Ok(puppy) => {
            let location = format!("{COLLECTION_PATH}{}", puppy.id);
            created_response(&location, &puppy)
        }
        Err(e) => {
            logger::log_error(&format!("create failed: {e}"));
            error_response(&e.into())
        }
    }
}

/// GET on an item.
pub async fn get_puppy(state: Arc<AppState>, id: u64) -> Response<Full<Bytes>> {
    match state.store.get(id).await {
        Ok(puppy) => json_response(StatusCode::OK, &puppy),
        Err(e) => error_response(&e.into()),
    }
}

/// PUT on an item: full replacement of the descriptive fields.
pub async fn replace_puppy(state: Arc<AppState>, id: u64, body: &Bytes) -> Response<Full<Bytes>> {
    let new = match parse_new_puppy(body) {
        Ok(new) => new,
        Err(e) => {
            logger::log_warning(&format!("replace rejected: {e}"));
            return error_response(&e);
        }
    };

    match state.store.replace(id, new).await {
        Ok(puppy) => json_response(StatusCode::OK, &puppy),
        Err(e) => error_response(&e.into()),
    }
}

/// PATCH on an item: merge the supplied fields.
pub async fn patch_puppy(state: Arc<AppState>, id: u64, body: &Bytes) -> Response<Full<Bytes>> {
    let patch = match parse_puppy_patch(body) {
        Ok(patch) => patch,
        Err(e) => {
            logger::log_warning(&format!("patch rejected: {e}"));
            return error_response(&e);
        }
    };

    match state.store.patch(id, patch).await {
        Ok(puppy) => json_response(StatusCode::OK, &puppy),
        Err(e) => error_response(&e.into()),
    }
}

/// DELETE on an item: permanent removal, no body on success.
pub async fn delete_puppy(state: Arc<AppState>, id: u64) -> Response<Full<Bytes>> {
    match state.store.delete(id).await {
        Ok(()) => no_content(),
        Err(e) => error_response(&e.into()),
    }
}

/// GET liveness probe.
pub async fn liveness(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "status": "ok",
        "uptime_secs": state.started_at.elapsed().as_secs(),
    });
    json_response(StatusCode::OK, &body)
}

/// GET readiness probe: verifies the store answers.
pub async fn readiness(state: Arc<AppState>) -> Response<Full<Bytes>> {
    match state.store.list().await {
        Ok(puppies) => json_response(
            StatusCode::OK,
            &serde_json::json!({ "status": "ready", "puppies": puppies.len() }),
        ),
        Err(e) => {
            logger::log_error(&format!("readiness probe failed: {e}"));
            json_response(
                StatusCode::SERVICE_UNAVAILABLE,
                &serde_json::json!({ "status": "unavailable", "error": e.to_string() }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        Config, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
        StoreConfig,
    };
    use crate::store::MemoryPuppyStore;
    use http_body_util::BodyExt;

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
                access_log_format: "combined".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            http: HttpConfig {
                server_name: "PuppyStore/test".to_string(),
                enable_cors: false,
                max_body_size: 1_048_576,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 0,
                read_timeout: 5,
                write_timeout: 5,
                max_connections: None,
            },
            store: StoreConfig::default(),
            health: HealthConfig::default(),
        }
    }

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(
            test_config(),
            Arc::new(MemoryPuppyStore::new()),
        ))
    }

    async fn body_json(response: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_read_delete_scenario() {
        let state = test_state();

        // POST {"name":"Rex"} -> 201 {"id":1,"name":"Rex"}
        let response = create_puppy(state.clone(), &Bytes::from(r#"{"name":"Rex"}"#)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response
                .headers()
                .get("Location")
                .and_then(|v| v.to_str().ok()),
            Some("/api/v1/puppies/1")
        );
        let created = body_json(response).await;
        assert_eq!(created["id"], 1);
        assert_eq!(created["name"], "Rex");

        // GET /api/v1/puppies/1 -> 200 with the same fields
        let response = get_puppy(state.clone(), 1).await;
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = body_json(response).await;
        assert_eq!(fetched["id"], 1);
        assert_eq!(fetched["name"], "Rex");

        // DELETE -> 204 with no body
        let response = delete_puppy(state.clone(), 1).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // GET again -> 404
        let response = get_puppy(state, 1).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_returns_all_created() {
        let state = test_state();
        for name in ["Rex", "Fido", "Spot"] {
            let body = Bytes::from(format!(r#"{{"name":"{name}"}}"#));
            let response = create_puppy(state.clone(), &body).await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = list_puppies(state).await;
        assert_eq!(response.status(), StatusCode::OK);
        let all = body_json(response).await;
        let all = all.as_array().unwrap();
        assert_eq!(all.len(), 3);
        let names: Vec<&str> = all.iter().map(|p| p["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Rex", "Fido", "Spot"]);
    }

    #[tokio::test]
    async fn test_list_empty_collection() {
        let response = list_puppies(test_state()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payloads() {
        let state = test_state();
        let payloads: [&[u8]; 4] = [
            b"{not json",
            br#"{"breed":"Labrador"}"#,
            br#"{"name":""}"#,
            br#"{"id":5,"name":"Rex"}"#,
        ];
        for body in payloads {
            let response = create_puppy(state.clone(), &Bytes::copy_from_slice(body)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found() {
        let state = test_state();

        let response =
            replace_puppy(state.clone(), 42, &Bytes::from(r#"{"name":"Rex"}"#)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = patch_puppy(state.clone(), 42, &Bytes::from(r#"{"name":"Rex"}"#)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = delete_puppy(state, 42).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_replace_overwrites_optionals() {
        let state = test_state();
        let body = Bytes::from(r#"{"name":"Rex","breed":"Labrador","color":"black"}"#);
        create_puppy(state.clone(), &body).await;

        let response =
            replace_puppy(state.clone(), 1, &Bytes::from(r#"{"name":"Fido"}"#)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let replaced = body_json(response).await;
        assert_eq!(replaced["name"], "Fido");
        // Absent optionals are cleared and omitted from the wire record
        assert!(replaced.get("breed").is_none());
        assert!(replaced.get("color").is_none());
    }

    #[tokio::test]
    async fn test_patch_changes_only_supplied_fields() {
        let state = test_state();
        let body = Bytes::from(r#"{"name":"Rex","breed":"Labrador","age":2}"#);
        create_puppy(state.clone(), &body).await;

        let response = patch_puppy(state.clone(), 1, &Bytes::from(r#"{"age":3}"#)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let patched = body_json(response).await;
        assert_eq!(patched["name"], "Rex");
        assert_eq!(patched["breed"], "Labrador");
        assert_eq!(patched["age"], 3);
    }

    #[tokio::test]
    async fn test_liveness_reports_ok() {
        let response = liveness(test_state()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_readiness_reports_record_count() {
        let state = test_state();
        create_puppy(state.clone(), &Bytes::from(r#"{"name":"Rex"}"#)).await;

        let response = readiness(state).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["puppies"], 1);
    }
}
