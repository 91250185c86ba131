//! reqwest-backed [`UserDirectory`] / [`PermissionDelegate`].

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use portal_auth::{PermissionSet, Role};
use portal_core::{Credential, UserId};

use crate::directory::{PermissionDelegate, UserDirectory};
use crate::error::ApiError;
use crate::models::{CreateUserRequest, UpdateRolesRequest, UpdateUserRequest, User};

/// HTTP client for the user-management API.
///
/// Requests carry the credential as a bearer token. Without one, every call
/// fails with [`ApiError::NotAuthenticated`] before touching the network.
#[derive(Debug, Clone)]
pub struct HttpUserDirectory {
    client: Client,
    base_url: String,
    credential: Option<Credential>,
}

impl HttpUserDirectory {
    pub fn new(base_url: impl Into<String>, credential: Option<Credential>) -> Self {
        Self::with_client(Client::new(), base_url, credential)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        credential: Option<Credential>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            credential,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let credential = self.credential.as_ref().ok_or(ApiError::NotAuthenticated)?;
        Ok(req.bearer_auth(credential.as_str()))
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = self
            .authorized(req)?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "user-management API rejected request");
            return Err(ApiError::Api(status.as_u16(), error_message(&body)));
        }
        Ok(resp)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        self.send(req)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Pull `message` out of a JSON error body; fall back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait::async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn me(&self) -> Result<User, ApiError> {
        self.send_json(self.client.get(self.url("/users/me"))).await
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.send_json(self.client.get(self.url("/users"))).await
    }

    async fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        self.send_json(self.client.get(self.url(&format!("/users/{id}"))))
            .await
    }

    async fn create_user(&self, request: &CreateUserRequest) -> Result<User, ApiError> {
        self.send_json(self.client.post(self.url("/users")).json(request))
            .await
    }

    async fn update_user(&self, id: UserId, request: &UpdateUserRequest) -> Result<User, ApiError> {
        let req = self.client.put(self.url(&format!("/users/{id}"))).json(request);
        self.send_json(req).await
    }

    async fn update_roles(&self, id: UserId, roles: &[Role]) -> Result<User, ApiError> {
        let req = self
            .client
            .put(self.url(&format!("/users/{id}/roles")))
            .json(&UpdateRolesRequest { roles });
        self.send_json(req).await
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        self.send(self.client.delete(self.url(&format!("/users/{id}"))))
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl PermissionDelegate for HttpUserDirectory {
    async fn fetch_permissions(&self, id: UserId) -> Result<PermissionSet, ApiError> {
        let url = self.url(&format!("/admin/users/{id}/permissions"));
        self.send_json(self.client.get(url)).await
    }

    async fn replace_permissions(
        &self,
        id: UserId,
        permissions: &PermissionSet,
    ) -> Result<(), ApiError> {
        let url = self.url(&format!("/admin/users/{id}/permissions"));
        self.send(self.client.put(url).json(permissions)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_json_message_field() {
        assert_eq!(
            error_message(r#"{"message":"Username already taken","status":409}"#),
            "Username already taken"
        );
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
        assert_eq!(error_message(r#"{"error":"x"}"#), r#"{"error":"x"}"#);
    }

    #[test]
    fn base_url_is_normalised() {
        let dir = HttpUserDirectory::new("http://localhost:8080/", None);
        assert_eq!(dir.base_url(), "http://localhost:8080");
        assert_eq!(dir.url("/users"), "http://localhost:8080/users");
    }

    #[tokio::test]
    async fn missing_credential_fails_without_network() {
        // Nothing listens on port 9; NotAuthenticated must win over Network.
        let dir = HttpUserDirectory::new("http://127.0.0.1:9", None);
        assert!(matches!(dir.me().await, Err(ApiError::NotAuthenticated)));
    }
}
