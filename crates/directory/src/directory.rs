//! User-management and permission-delegation seams.

use portal_auth::roles::{assignable_roles, is_admin};
use portal_auth::{Identity, PermissionCode, PermissionSet, Role};
use portal_core::UserId;

use crate::error::ApiError;
use crate::models::{CreateUserRequest, UpdateUserRequest, User};

/// Account administration against the user-management API.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// The account behind the current credential.
    async fn me(&self) -> Result<User, ApiError>;

    async fn list_users(&self) -> Result<Vec<User>, ApiError>;

    async fn get_user(&self, id: UserId) -> Result<User, ApiError>;

    async fn create_user(&self, request: &CreateUserRequest) -> Result<User, ApiError>;

    async fn update_user(&self, id: UserId, request: &UpdateUserRequest) -> Result<User, ApiError>;

    /// Replace the user's roles wholesale.
    async fn update_roles(&self, id: UserId, roles: &[Role]) -> Result<User, ApiError>;

    async fn delete_user(&self, id: UserId) -> Result<(), ApiError>;
}

/// Fine-grained permission grants on top of roles.
///
/// The server is authoritative; `replace_permissions` sends the complete set.
#[async_trait::async_trait]
pub trait PermissionDelegate: Send + Sync {
    async fn fetch_permissions(&self, id: UserId) -> Result<PermissionSet, ApiError>;

    async fn replace_permissions(
        &self,
        id: UserId,
        permissions: &PermissionSet,
    ) -> Result<(), ApiError>;
}

/// Flip one permission for `id` and push the resulting set.
///
/// Returns the set as sent to the server.
pub async fn toggle_permission<D>(
    delegate: &D,
    id: UserId,
    code: PermissionCode,
) -> Result<PermissionSet, ApiError>
where
    D: PermissionDelegate + ?Sized,
{
    let mut permissions = delegate.fetch_permissions(id).await?;
    let granted = permissions.toggle(code.clone());
    delegate.replace_permissions(id, &permissions).await?;

    tracing::info!(user_id = %id, code = %code, granted, "permission toggled");
    Ok(permissions)
}

/// Create an account on behalf of `actor`.
///
/// The roles sent are narrowed to what the actor may hand out. Initial
/// permissions are only pushed when the actor is an admin and picked some;
/// a failure there is reported after the account already exists.
pub async fn provision_user<D>(
    directory: &D,
    actor: &Identity,
    request: CreateUserRequest,
    requested_role: Option<&Role>,
    permissions: &PermissionSet,
) -> Result<User, ApiError>
where
    D: UserDirectory + PermissionDelegate + ?Sized,
{
    let request = request.with_roles(assignable_roles(actor, requested_role));
    let user = directory.create_user(&request).await?;
    tracing::info!(
        actor = %actor.username,
        user_id = %user.id,
        roles = ?request.roles,
        "user provisioned"
    );

    if is_admin(actor) && !permissions.is_empty() {
        directory.replace_permissions(user.id, permissions).await?;
    }

    Ok(user)
}
