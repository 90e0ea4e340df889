//! User API operations.

use async_trait::async_trait;
use registrar_core::api::{self, UsersApi};
use registrar_core::users::{CreateUserInput, User, UserPatch};

use super::{transport, RegistrarClient};

#[async_trait]
impl UsersApi for RegistrarClient {
    async fn get_users(&self) -> api::Result<Vec<User>> {
        let response = self
            .client
            .get(self.url("/users"))
            .send()
            .await
            .map_err(transport)?;
        self.handle_response(response, "").await
    }

    async fn search_user(&self, term: &str) -> api::Result<Vec<User>> {
        let response = self
            .client
            .get(self.url("/users/search"))
            .query(&[("q", term)])
            .send()
            .await
            .map_err(transport)?;
        self.handle_response(response, "").await
    }

    async fn create_user(&self, input: CreateUserInput) -> api::Result<User> {
        let response = self
            .client
            .post(self.url("/users"))
            .json(&input)
            .send()
            .await
            .map_err(transport)?;
        self.handle_response(response, "").await
    }

    async fn update_user(&self, id: &str, patch: UserPatch) -> api::Result<User> {
        let response = self
            .client
            .patch(self.user_url(id))
            .json(&patch)
            .send()
            .await
            .map_err(transport)?;
        self.handle_response(response, id).await
    }

    async fn delete_user(&self, id: &str) -> api::Result<()> {
        let response = self
            .client
            .delete(self.user_url(id))
            .send()
            .await
            .map_err(transport)?;
        self.handle_empty_response(response, id).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        routing::{get, patch},
        Json, Router,
    };
    use registrar_core::api::ApiError;

    use super::*;
    use crate::inmemory::InMemoryUsersApi;

    type Backend = Arc<InMemoryUsersApi>;

    fn status_for(err: &ApiError) -> StatusCode {
        match err {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    async fn list(State(backend): State<Backend>) -> Json<Vec<User>> {
        Json(backend.get_users().await.unwrap_or_default())
    }

    async fn search(
        State(backend): State<Backend>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Vec<User>> {
        let term = params.get("q").cloned().unwrap_or_default();
        Json(backend.search_user(&term).await.unwrap_or_default())
    }

    async fn create(
        State(backend): State<Backend>,
        Json(input): Json<CreateUserInput>,
    ) -> Result<(StatusCode, Json<User>), StatusCode> {
        backend
            .create_user(input)
            .await
            .map(|user| (StatusCode::CREATED, Json(user)))
            .map_err(|e| status_for(&e))
    }

    async fn update(
        State(backend): State<Backend>,
        Path(id): Path<String>,
        Json(patch): Json<UserPatch>,
    ) -> Result<Json<User>, StatusCode> {
        backend
            .update_user(&id, patch)
            .await
            .map(Json)
            .map_err(|e| status_for(&e))
    }

    async fn remove(State(backend): State<Backend>, Path(id): Path<String>) -> StatusCode {
        match backend.delete_user(&id).await {
            Ok(()) => StatusCode::NO_CONTENT,
            Err(e) => status_for(&e),
        }
    }

    async fn broken() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable")
    }

    /// Serves the users API over HTTP on an ephemeral port.
    async fn spawn_server(backend: InMemoryUsersApi) -> String {
        let app = Router::new()
            .route("/api/users", get(list).post(create))
            .route("/api/users/search", get(search))
            .route("/api/users/{id}", patch(update).delete(remove))
            .route("/broken/users", get(broken))
            .with_state(Arc::new(backend));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_crud_over_http() {
        let base = spawn_server(InMemoryUsersApi::new()).await;
        let client = RegistrarClient::new(format!("{}/api", base));

        assert!(client.get_users().await.unwrap().is_empty());

        let ada = client
            .create_user(CreateUserInput::new("Ada", "Lovelace"))
            .await
            .unwrap();
        assert!(!ada.id.is_empty());
        assert_eq!(ada.first_name, "Ada");

        let updated = client
            .update_user(&ada.id, UserPatch::default().with_first_name("Augusta"))
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Augusta");
        assert_eq!(updated.last_name, "Lovelace");

        assert_eq!(client.get_users().await.unwrap(), vec![updated]);

        client.delete_user(&ada.id).await.unwrap();
        assert!(client.get_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reserved_characters_in_ids_stay_in_one_segment() {
        let backend = InMemoryUsersApi::with_users(vec![
            User::new("a", "Ada", "Lovelace"),
            User::new("a?b", "Grace", "Hopper"),
            User::new("a#b", "Jane", "Austen"),
            User::new("a/b", "Alan", "Turing"),
        ]);
        let base = spawn_server(backend.clone()).await;
        let client = RegistrarClient::new(format!("{}/api", base));

        client.delete_user("a?b").await.unwrap();
        client.delete_user("a#b").await.unwrap();
        let updated = client
            .update_user("a/b", UserPatch::default().with_first_name("Alonzo"))
            .await
            .unwrap();
        assert_eq!(updated, User::new("a/b", "Alonzo", "Turing"));

        let ids: Vec<String> = backend
            .get_users()
            .await
            .unwrap()
            .into_iter()
            .map(|user| user.id)
            .collect();
        assert_eq!(ids, vec!["a", "a/b"]);
    }

    #[tokio::test]
    async fn test_search_sends_term_as_query_param() {
        let backend = InMemoryUsersApi::with_users(vec![
            User::new("1", "Jane", "Austen"),
            User::new("2", "Ada", "Lovelace"),
        ]);
        let base = spawn_server(backend).await;
        let client = RegistrarClient::new(format!("{}/api", base));

        let found = client.search_user("jane austen").await.unwrap();
        assert!(found.is_empty());

        let found = client.search_user("Jane").await.unwrap();
        assert_eq!(found, vec![User::new("1", "Jane", "Austen")]);
    }

    #[tokio::test]
    async fn test_missing_user_maps_to_not_found() {
        let base = spawn_server(InMemoryUsersApi::new()).await;
        let client = RegistrarClient::new(format!("{}/api", base));

        assert_eq!(
            client.delete_user("nope").await,
            Err(ApiError::NotFound {
                id: "nope".to_string()
            })
        );
        assert_eq!(
            client
                .update_user("nope", UserPatch::default().with_last_name("X"))
                .await,
            Err(ApiError::NotFound {
                id: "nope".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_server_error_carries_body() {
        let base = spawn_server(InMemoryUsersApi::new()).await;
        let client = RegistrarClient::new(format!("{}/broken", base));

        assert_eq!(
            client.get_users().await,
            Err(ApiError::Server {
                status: 500,
                message: "database unavailable".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = RegistrarClient::new(format!("http://{}", addr));
        assert!(matches!(
            client.get_users().await,
            Err(ApiError::Transport(_))
        ));
    }
}
