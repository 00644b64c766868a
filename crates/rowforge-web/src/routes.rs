//! Route definitions for the grid admin.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Create the admin router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/grids/{grid}", get(handlers::grid_index))
        .route(
            "/grids/{grid}/item/{item}",
            get(handlers::item_edit).post(handlers::item_save),
        )
        .route("/grids/{grid}/item/{item}/view", get(handlers::item_view))
        .route("/grids/{grid}/item/{item}/delete", post(handlers::item_delete))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use rowforge_core::config::{GridConfig, GridFilterConfig, RowforgeConfig, UserConfig};
    use rowforge_core::descriptor::{EntityDescriptor, FieldDescriptor, FieldKind};
    use rowforge_core::policy::AccessPolicy;
    use serde_json::json;
    use tower::ServiceExt;

    fn sample_config() -> RowforgeConfig {
        let mut page = EntityDescriptor::new(
            "page",
            vec![
                FieldDescriptor::text("title").required(),
                FieldDescriptor::text("status")
                    .with_kind(FieldKind::Select {
                        options: vec!["draft".into(), "published".into()],
                    })
                    .with_default(json!("draft")),
            ],
        );
        page.policy = AccessPolicy::default();

        RowforgeConfig {
            entities: vec![page],
            grids: vec![
                GridConfig {
                    name: "pages".to_string(),
                    entity: "page".to_string(),
                    title: Some("Pages".to_string()),
                    filter: None,
                    many_many: false,
                },
                GridConfig {
                    name: "published".to_string(),
                    entity: "page".to_string(),
                    title: None,
                    filter: Some(GridFilterConfig {
                        field: "status".to_string(),
                        equals: json!("published"),
                    }),
                    many_many: false,
                },
            ],
            users: vec![UserConfig {
                id: "alice".to_string(),
                roles: ["admin".to_string()].into(),
            }],
            ..RowforgeConfig::default()
        }
    }

    fn app() -> Router {
        create_router(AppState::new(sample_config()))
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_req(uri: &str, actor: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(actor) = actor {
            builder = builder.header("x-actor", actor);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_req(uri: &str, actor: &str, form: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("x-actor", actor)
            .header(
                header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn home_lists_grids() {
        let response = app().oneshot(get_req("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("/grids/pages"));
        assert!(body.contains("/grids/published"));
    }

    #[tokio::test]
    async fn unknown_grid_is_404() {
        let response = app()
            .oneshot(get_req("/grids/nope", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn new_item_form_renders_for_admin() {
        let response = app()
            .oneshot(get_req("/grids/pages/item/new", Some("alice")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("New page"));
        assert!(body.contains(r#"name="title""#));
        assert!(body.contains("Create"));
    }

    #[tokio::test]
    async fn bad_item_segment_is_400() {
        let response = app()
            .oneshot(get_req("/grids/pages/item/xyz", Some("alice")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_item_is_404() {
        let response = app()
            .oneshot(get_req("/grids/pages/item/42", Some("alice")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_redirects_to_the_new_edit_url() {
        let app = app();
        let response = app
            .clone()
            .oneshot(post_req(
                "/grids/pages/item/new",
                "alice",
                "title=Hello&status=draft&action=create",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("/grids/pages/item/1?good="));

        // The record is now editable at its own URL.
        let response = app
            .oneshot(get_req("/grids/pages/item/1", Some("alice")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Hello"));
    }

    #[tokio::test]
    async fn invalid_submission_is_422_with_message() {
        let response = app()
            .oneshot(post_req(
                "/grids/pages/item/new",
                "alice",
                "title=&status=draft&action=create",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_text(response).await;
        assert!(body.contains("message bad"));
    }

    #[tokio::test]
    async fn anonymous_cannot_save() {
        let response = app()
            .oneshot(post_req(
                "/grids/pages/item/new",
                "nobody",
                "title=Hi&action=create",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn fragment_save_redirects_via_header() {
        let mut request = post_req(
            "/grids/pages/item/new",
            "alice",
            "title=Frag&status=draft&action=create",
        );
        request
            .headers_mut()
            .insert("hx-request", "true".parse().unwrap());
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("hx-redirect"));
    }

    #[tokio::test]
    async fn delete_redirects_back_to_the_grid() {
        let app = app();
        app.clone()
            .oneshot(post_req(
                "/grids/pages/item/new",
                "alice",
                "title=Doomed&status=draft&action=create",
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(post_req("/grids/pages/item/1/delete", "alice", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("/grids/pages?good="));

        let response = app
            .oneshot(get_req("/grids/pages/item/1", Some("alice")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn filtered_grid_hides_non_matching_records() {
        let app = app();
        app.clone()
            .oneshot(post_req(
                "/grids/pages/item/new",
                "alice",
                "title=Draft+one&status=draft&action=create",
            ))
            .await
            .unwrap();

        // Visible through the unfiltered grid, missing from the filtered one.
        let response = app
            .clone()
            .oneshot(get_req("/grids/pages/item/1", Some("alice")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(get_req("/grids/published/item/1", Some("alice")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
