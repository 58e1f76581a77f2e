//! The route table: ordered declarations bound to use cases.
//!
//! Lookup is first-match-wins in declaration order, so the order below is a
//! behavioral contract, not a style choice.

pub mod common;
pub mod memberships;
pub mod organizations;
pub mod users;

use std::sync::Arc;

use axum::http::Method;

use orgkit_auth::AuthRequirement;
use orgkit_gateway::{Route, RouteTable};

use crate::rules::FieldRules;
use crate::store::Directory;

const ROLES: &[&str] = &["owner", "admin", "member"];

pub fn route_table(base_path: &str, directory: Arc<Directory>) -> RouteTable {
    RouteTable::builder(base_path)
        // Users
        .route(
            Route::new(
                Method::GET,
                "/users",
                AuthRequirement::Required,
                Arc::new(users::ListUsers::new(directory.clone())),
            )
            .with_validator(Arc::new(list_shape())),
        )
        .route(
            Route::new(
                Method::POST,
                "/users",
                AuthRequirement::None,
                Arc::new(users::CreateUser::new(directory.clone())),
            )
            .with_validator(Arc::new(create_user_shape())),
        )
        .route(Route::new(
            Method::GET,
            "/users/:userId",
            AuthRequirement::Required,
            Arc::new(users::GetUser::new(directory.clone())),
        ))
        .route(
            Route::new(
                Method::PUT,
                "/users/:userId",
                AuthRequirement::Required,
                Arc::new(users::UpdateUser::new(directory.clone())),
            )
            .with_validator(Arc::new(update_user_shape())),
        )
        .route(Route::new(
            Method::DELETE,
            "/users/:userId",
            AuthRequirement::Required,
            Arc::new(users::DeleteUser::new(directory.clone())),
        ))
        // Organizations
        .route(
            Route::new(
                Method::GET,
                "/organizations",
                AuthRequirement::Optional,
                Arc::new(organizations::ListOrganizations::new(directory.clone())),
            )
            .with_validator(Arc::new(list_shape())),
        )
        .route(
            Route::new(
                Method::POST,
                "/organizations",
                AuthRequirement::Required,
                Arc::new(organizations::CreateOrganization::new(directory.clone())),
            )
            .with_validator(Arc::new(create_organization_shape())),
        )
        .route(Route::new(
            Method::GET,
            "/organizations/:organizationId",
            AuthRequirement::Optional,
            Arc::new(organizations::GetOrganization::new(directory.clone())),
        ))
        .route(Route::new(
            Method::DELETE,
            "/organizations/:organizationId",
            AuthRequirement::Required,
            Arc::new(organizations::DeleteOrganization::new(directory.clone())),
        ))
        // Memberships
        .route(
            Route::new(
                Method::GET,
                "/organizations/:organizationId/members",
                AuthRequirement::Required,
                Arc::new(memberships::ListMembers::new(directory.clone())),
            )
            .with_validator(Arc::new(list_shape())),
        )
        .route(
            Route::new(
                Method::POST,
                "/organizations/:organizationId/members",
                AuthRequirement::Required,
                Arc::new(memberships::AddMember::new(directory.clone())),
            )
            .with_validator(Arc::new(add_member_shape())),
        )
        .route(
            Route::new(
                Method::PUT,
                "/organizations/:organizationId/members/:memberId",
                AuthRequirement::Required,
                Arc::new(memberships::ChangeMemberRole::new(directory.clone())),
            )
            .with_validator(Arc::new(change_role_shape())),
        )
        .route(Route::new(
            Method::DELETE,
            "/organizations/:organizationId/members/:memberId",
            AuthRequirement::Required,
            Arc::new(memberships::RemoveMember::new(directory)),
        ))
        .build()
}

fn create_user_shape() -> FieldRules {
    FieldRules::new()
        .required("body.email")
        .email("body.email")
        .required("body.name")
        .min_len("body.name", 1)
        .max_len("body.name", 200)
}

fn update_user_shape() -> FieldRules {
    FieldRules::new()
        .email("body.email")
        .min_len("body.name", 1)
        .max_len("body.name", 200)
}

fn create_organization_shape() -> FieldRules {
    FieldRules::new()
        .required("body.name")
        .min_len("body.name", 1)
        .max_len("body.name", 120)
        .required("body.slug")
        .min_len("body.slug", 2)
        .max_len("body.slug", 64)
        .required("body.ownerUserId")
}

fn add_member_shape() -> FieldRules {
    FieldRules::new()
        .required("body.userId")
        .required("body.role")
        .one_of("body.role", ROLES)
}

fn change_role_shape() -> FieldRules {
    FieldRules::new().required("body.role").one_of("body.role", ROLES)
}

fn list_shape() -> FieldRules {
    FieldRules::new().numeric("query.page").numeric("query.pageSize")
}
