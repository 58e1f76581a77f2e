//! Organization use cases.

use std::sync::Arc;

use async_trait::async_trait;

use orgkit_core::{OrganizationId, UserId};
use orgkit_gateway::{UseCaseHandler, UseCaseRequest, UseCaseResponse, UseCaseResult};

use crate::routes::common::{body_str, page_request, parse_body_id, parse_id, to_items, to_json};
use crate::store::Directory;

pub struct ListOrganizations {
    directory: Arc<Directory>,
}

impl ListOrganizations {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl UseCaseHandler for ListOrganizations {
    async fn handle(&self, request: UseCaseRequest) -> UseCaseResult {
        let (records, pagination) = self.directory.list_organizations(page_request(&request));
        Ok(UseCaseResponse::collection(to_items(&records)?, pagination))
    }
}

pub struct CreateOrganization {
    directory: Arc<Directory>,
}

impl CreateOrganization {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl UseCaseHandler for CreateOrganization {
    async fn handle(&self, request: UseCaseRequest) -> UseCaseResult {
        let name = body_str(&request, "name")?;
        let slug = body_str(&request, "slug")?;
        let owner: UserId = parse_body_id(&request, "ownerUserId")?;
        let record = self.directory.create_organization(name, slug, owner)?;
        let location = format!("/organizations/{}", record.id);
        Ok(UseCaseResponse::created(to_json(&record)?).with_header("location", location))
    }
}

pub struct GetOrganization {
    directory: Arc<Directory>,
}

impl GetOrganization {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl UseCaseHandler for GetOrganization {
    async fn handle(&self, request: UseCaseRequest) -> UseCaseResult {
        let id: OrganizationId = parse_id(&request, "organizationId")?;
        let record = self.directory.get_organization(id)?;
        Ok(UseCaseResponse::ok(to_json(&record)?))
    }
}

pub struct DeleteOrganization {
    directory: Arc<Directory>,
}

impl DeleteOrganization {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl UseCaseHandler for DeleteOrganization {
    async fn handle(&self, request: UseCaseRequest) -> UseCaseResult {
        let id: OrganizationId = parse_id(&request, "organizationId")?;
        self.directory.delete_organization(id)?;
        Ok(UseCaseResponse::no_content())
    }
}
