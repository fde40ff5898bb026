pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use primer_http::error::AppError;
use primer_kernel::{InitCtx, Module};
use primer_store::TutorialStore;

use models::{Tutorial, TutorialPayload};

type Store = Arc<dyn TutorialStore>;

/// Tutorials module exposing the CRUD surface over a tutorial store.
pub struct TutorialsModule {
    store: Store,
}

impl TutorialsModule {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for TutorialsModule {
    fn name(&self) -> &'static str {
        "tutorials"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "tutorials module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route(
                "/",
                get(list_tutorials)
                    .post(create_tutorial)
                    .delete(delete_all_tutorials),
            )
            .route("/published", get(list_published))
            .route(
                "/{id}",
                get(get_tutorial)
                    .put(update_tutorial)
                    .delete(delete_tutorial),
            )
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "tutorials module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "tutorials module stopped");
        Ok(())
    }
}

/// Create a new instance of the tutorials module over the given store
pub fn create_module(store: Store) -> Arc<dyn Module> {
    Arc::new(TutorialsModule::new(store))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    title: Option<String>,
}

/// Create a tutorial; the store assigns the id
async fn create_tutorial(
    State(store): State<Store>,
    Json(payload): Json<TutorialPayload>,
) -> Result<impl IntoResponse, AppError> {
    let created = store
        .save(Tutorial {
            id: 0,
            title: payload.title,
            description: payload.description,
            published: payload.published,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Fetch a single tutorial by id
async fn get_tutorial(
    State(store): State<Store>,
    Path(id): Path<i64>,
) -> Result<Json<Tutorial>, AppError> {
    match store.find_by_id(id).await? {
        Some(tutorial) => Ok(Json(tutorial)),
        None => Err(AppError::not_found(format!("tutorial {id} not found"))),
    }
}

/// List tutorials, optionally filtered by a title substring
async fn list_tutorials(
    State(store): State<Store>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let tutorials = match query.title {
        Some(title) => store.find_by_title_containing(&title).await?,
        None => store.find_all().await?,
    };

    Ok(list_response(tutorials))
}

/// List only published tutorials
async fn list_published(State(store): State<Store>) -> Result<Response, AppError> {
    let tutorials = store.find_by_published(true).await?;
    Ok(list_response(tutorials))
}

/// Replace a tutorial's mutable fields
async fn update_tutorial(
    State(store): State<Store>,
    Path(id): Path<i64>,
    Json(payload): Json<TutorialPayload>,
) -> Result<Json<Tutorial>, AppError> {
    let Some(mut tutorial) = store.find_by_id(id).await? else {
        return Err(AppError::not_found(format!("tutorial {id} not found")));
    };

    tutorial.title = payload.title;
    tutorial.description = payload.description;
    tutorial.published = payload.published;

    let updated = store.save(tutorial).await?;
    Ok(Json(updated))
}

/// Delete a tutorial by id; absent ids delete successfully
async fn delete_tutorial(
    State(store): State<Store>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    store.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete every tutorial
async fn delete_all_tutorials(State(store): State<Store>) -> Result<StatusCode, AppError> {
    store.delete_all().await?;
    Ok(StatusCode::NO_CONTENT)
}

// An empty result set is 204 No Content, never an empty 200 array.
fn list_response(tutorials: Vec<Tutorial>) -> Response {
    if tutorials.is_empty() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        Json(tutorials).into_response()
    }
}

fn openapi_fragment() -> serde_json::Value {
    serde_json::json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List tutorials, optionally filtered by title substring",
                    "tags": ["Tutorials"],
                    "parameters": [
                        {
                            "name": "title",
                            "in": "query",
                            "required": false,
                            "schema": {
                                "type": "string"
                            }
                        }
                    ],
                    "responses": {
                        "200": {
                            "description": "Matching tutorials",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": {
                                            "$ref": "#/components/schemas/Tutorial"
                                        }
                                    }
                                }
                            }
                        },
                        "204": {
                            "description": "No tutorials matched"
                        }
                    }
                },
                "post": {
                    "summary": "Create a tutorial",
                    "tags": ["Tutorials"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {
                                    "$ref": "#/components/schemas/TutorialPayload"
                                }
                            }
                        }
                    },
                    "responses": {
                        "201": {
                            "description": "Created tutorial",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/Tutorial"
                                    }
                                }
                            }
                        }
                    }
                },
                "delete": {
                    "summary": "Delete all tutorials",
                    "tags": ["Tutorials"],
                    "responses": {
                        "204": {
                            "description": "All tutorials deleted"
                        }
                    }
                }
            },
            "/published": {
                "get": {
                    "summary": "List published tutorials",
                    "tags": ["Tutorials"],
                    "responses": {
                        "200": {
                            "description": "Published tutorials",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": {
                                            "$ref": "#/components/schemas/Tutorial"
                                        }
                                    }
                                }
                            }
                        },
                        "204": {
                            "description": "No published tutorials"
                        }
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a tutorial by id",
                    "tags": ["Tutorials"],
                    "parameters": [
                        {
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": {
                                "type": "integer",
                                "format": "int64"
                            }
                        }
                    ],
                    "responses": {
                        "200": {
                            "description": "The tutorial",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/Tutorial"
                                    }
                                }
                            }
                        },
                        "404": {
                            "description": "Tutorial not found",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/ErrorResponse"
                                    }
                                }
                            }
                        }
                    }
                },
                "put": {
                    "summary": "Replace a tutorial's fields",
                    "tags": ["Tutorials"],
                    "parameters": [
                        {
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": {
                                "type": "integer",
                                "format": "int64"
                            }
                        }
                    ],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {
                                    "$ref": "#/components/schemas/TutorialPayload"
                                }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Updated tutorial",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/Tutorial"
                                    }
                                }
                            }
                        },
                        "404": {
                            "description": "Tutorial not found",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/ErrorResponse"
                                    }
                                }
                            }
                        }
                    }
                },
                "delete": {
                    "summary": "Delete a tutorial by id",
                    "tags": ["Tutorials"],
                    "parameters": [
                        {
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": {
                                "type": "integer",
                                "format": "int64"
                            }
                        }
                    ],
                    "responses": {
                        "204": {
                            "description": "Deleted (or already absent)"
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Tutorial": {
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "integer",
                            "format": "int64",
                            "description": "Store-assigned identifier"
                        },
                        "title": {
                            "type": "string",
                            "description": "Title of the tutorial"
                        },
                        "description": {
                            "type": "string",
                            "description": "Longer free-form description"
                        },
                        "published": {
                            "type": "boolean",
                            "description": "Whether the tutorial is published"
                        }
                    },
                    "required": ["id", "title", "description", "published"]
                },
                "TutorialPayload": {
                    "type": "object",
                    "properties": {
                        "title": {
                            "type": "string",
                            "description": "Title of the tutorial"
                        },
                        "description": {
                            "type": "string",
                            "description": "Longer free-form description"
                        },
                        "published": {
                            "type": "boolean",
                            "description": "Defaults to false when omitted",
                            "default": false
                        }
                    },
                    "required": ["title", "description"]
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use http_body_util::BodyExt;
    use primer_http::router::RouterBuilder;
    use primer_store::MemoryStore;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app(store: Arc<MemoryStore>) -> Router {
        RouterBuilder::new()
            .mount_module("tutorials", TutorialsModule::new(store).routes())
            .build()
    }

    async fn seed(store: &MemoryStore, title: &str, description: &str, published: bool) -> Tutorial {
        store
            .save(Tutorial {
                id: 0,
                title: title.to_string(),
                description: description.to_string(),
                published,
            })
            .await
            .unwrap()
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_returns_created_entity_with_assigned_id() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app(store);

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/tutorials",
                json!({
                    "title": "Spring Boot @WebMvcTest",
                    "description": "Description",
                    "published": true
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["title"], "Spring Boot @WebMvcTest");
        assert_eq!(body["description"], "Description");
        assert_eq!(body["published"], true);
    }

    #[tokio::test]
    async fn create_defaults_published_to_false() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app(store);

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/tutorials",
                json!({ "title": "Draft", "description": "Description" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["published"], false);
    }

    #[tokio::test]
    async fn get_returns_tutorial() {
        let store = Arc::new(MemoryStore::new());
        let tutorial = seed(&store, "Spring Boot @WebMvcTest", "Description", true).await;
        let app = test_app(store);

        let response = app
            .oneshot(empty_request(
                Method::GET,
                &format!("/api/tutorials/{}", tutorial.id),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["id"], tutorial.id);
        assert_eq!(body["title"], tutorial.title);
        assert_eq!(body["description"], tutorial.description);
        assert_eq!(body["published"], tutorial.published);
    }

    #[tokio::test]
    async fn get_unknown_id_returns_not_found() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app(store);

        let response = app
            .oneshot(empty_request(Method::GET, "/api/tutorials/1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_returns_all_tutorials() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, "Spring Boot @WebMvcTest 1", "Description 1", true).await;
        seed(&store, "Spring Boot @WebMvcTest 2", "Description 2", true).await;
        seed(&store, "Spring Boot @WebMvcTest 3", "Description 3", true).await;
        let app = test_app(store);

        let response = app
            .oneshot(empty_request(Method::GET, "/api/tutorials"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn list_empty_store_returns_no_content() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app(store);

        let response = app
            .oneshot(empty_request(Method::GET, "/api/tutorials"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn list_filters_by_title_substring() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, "Spring Boot @WebMvcTest", "Description 1", true).await;
        seed(&store, "Spring Boot Web MVC", "Description 3", true).await;
        let app = test_app(store);

        let response = app
            .oneshot(empty_request(Method::GET, "/api/tutorials?title=Boot"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn list_filter_without_match_returns_no_content() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, "Spring Boot @WebMvcTest", "Description 1", true).await;
        seed(&store, "Spring Boot Web MVC", "Description 3", true).await;
        let app = test_app(store);

        let response = app
            .oneshot(empty_request(Method::GET, "/api/tutorials?title=BezKoder"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_id() {
        let store = Arc::new(MemoryStore::new());
        let tutorial = seed(&store, "Spring Boot @WebMvcTest", "Description", false).await;
        let app = test_app(store);

        let response = app
            .oneshot(json_request(
                Method::PUT,
                &format!("/api/tutorials/{}", tutorial.id),
                json!({
                    "title": "Updated",
                    "description": "Updated",
                    "published": true
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["id"], tutorial.id);
        assert_eq!(body["title"], "Updated");
        assert_eq!(body["description"], "Updated");
        assert_eq!(body["published"], true);
    }

    #[tokio::test]
    async fn update_unknown_id_returns_not_found_and_does_not_create() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app(store.clone());

        let response = app
            .oneshot(json_request(
                Method::PUT,
                "/api/tutorials/1",
                json!({
                    "title": "Updated",
                    "description": "Updated",
                    "published": true
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_returns_no_content() {
        let store = Arc::new(MemoryStore::new());
        let tutorial = seed(&store, "Spring Boot @WebMvcTest", "Description", true).await;
        let app = test_app(store.clone());

        let response = app
            .oneshot(empty_request(
                Method::DELETE,
                &format!("/api/tutorials/{}", tutorial.id),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(store.find_by_id(tutorial.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_unknown_id_still_returns_no_content() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app(store);

        let response = app
            .oneshot(empty_request(Method::DELETE, "/api/tutorials/99"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn delete_all_returns_no_content() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, "Spring Boot @WebMvcTest 1", "Description 1", true).await;
        seed(&store, "Spring Boot @WebMvcTest 2", "Description 2", true).await;
        let app = test_app(store.clone());

        let response = app
            .oneshot(empty_request(Method::DELETE, "/api/tutorials"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn published_listing_filters_on_flag() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, "Published", "Description", true).await;
        seed(&store, "Draft", "Description", false).await;
        let app = test_app(store);

        let response = app
            .oneshot(empty_request(Method::GET, "/api/tutorials/published"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let titles: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|tutorial| tutorial["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Published"]);
    }

    #[tokio::test]
    async fn published_listing_empty_returns_no_content() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, "Draft", "Description", false).await;
        let app = test_app(store);

        let response = app
            .oneshot(empty_request(Method::GET, "/api/tutorials/published"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
