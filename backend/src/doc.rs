//! OpenAPI document aggregating the portal's HTTP surface.

use utoipa::OpenApi;

/// Public OpenAPI surface used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::health::live,
        crate::api::health::ready,
        crate::api::session::login,
        crate::api::session::current,
        crate::api::session::logout,
        crate::api::session::setup,
        crate::api::users::list_users,
        crate::api::users::update_user,
        crate::api::users::delete_user,
        crate::api::users::list_invites,
        crate::api::users::create_invite,
        crate::api::users::delete_invite,
        crate::api::clients::list_clients,
        crate::api::clients::own_account,
        crate::api::clients::get_client,
        crate::api::clients::create_client,
        crate::api::clients::update_client,
        crate::api::clients::assign_professionals,
        crate::api::clients::delete_client,
        crate::api::documents::list_for_client,
        crate::api::documents::upload,
        crate::api::documents::recent,
        crate::api::documents::pending_count,
        crate::api::documents::review,
        crate::api::documents::delete,
        crate::api::todos::list_for_client,
        crate::api::todos::create,
        crate::api::todos::recent_open,
        crate::api::todos::resolve,
    ),
    components(schemas(
        crate::api::error::ApiError,
        crate::api::session::LoginRequest,
        crate::api::session::SessionView,
        crate::api::users::InviteRequest,
        crate::api::clients::AssignmentRequest,
        crate::api::documents::ReviewRequest,
        crate::api::todos::NewTodoRequest,
        crate::domain::ClientAccount,
        crate::domain::ClientAccountPatch,
        crate::domain::DocumentFile,
        crate::domain::DocumentStatus,
        crate::domain::ErrorCode,
        crate::domain::Invite,
        crate::domain::NewClientAccount,
        crate::domain::OwnerLinkage,
        crate::domain::Role,
        crate::domain::Todo,
        crate::domain::TodoAudience,
        crate::domain::TodoStatus,
        crate::domain::UserProfile,
        crate::domain::UserProfilePatch,
    )),
    tags(
        (name = "session", description = "Login, logout and invite redemption"),
        (name = "users", description = "User profile administration"),
        (name = "invites", description = "Invite administration"),
        (name = "clients", description = "Client account management"),
        (name = "documents", description = "Document upload and review"),
        (name = "todos", description = "Task management"),
        (name = "health", description = "Probes"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn document_includes_the_session_paths() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("document serialises");
        assert!(json.contains("/api/session"));
        assert!(json.contains("/api/clients/{id}/documents"));
    }
}
