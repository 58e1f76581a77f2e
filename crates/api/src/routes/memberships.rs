//! Membership use cases.

use std::sync::Arc;

use async_trait::async_trait;

use orgkit_core::{DomainError, OrganizationId, UserId};
use orgkit_gateway::{UseCaseHandler, UseCaseRequest, UseCaseResponse, UseCaseResult};

use crate::routes::common::{body_str, page_request, parse_body_id, parse_id, to_items, to_json};
use crate::store::{Directory, MemberRole};

fn parse_role(request: &UseCaseRequest) -> Result<MemberRole, orgkit_gateway::UseCaseFailure> {
    let raw = body_str(request, "role")?;
    MemberRole::parse(raw).ok_or_else(|| {
        DomainError::validation_field("body.role", "must be one of: owner, admin, member").into()
    })
}

pub struct ListMembers {
    directory: Arc<Directory>,
}

impl ListMembers {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl UseCaseHandler for ListMembers {
    async fn handle(&self, request: UseCaseRequest) -> UseCaseResult {
        let organization: OrganizationId = parse_id(&request, "organizationId")?;
        let (records, pagination) = self
            .directory
            .list_members(organization, page_request(&request))?;
        Ok(UseCaseResponse::collection(to_items(&records)?, pagination))
    }
}

pub struct AddMember {
    directory: Arc<Directory>,
}

impl AddMember {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl UseCaseHandler for AddMember {
    async fn handle(&self, request: UseCaseRequest) -> UseCaseResult {
        let organization: OrganizationId = parse_id(&request, "organizationId")?;
        let user: UserId = parse_body_id(&request, "userId")?;
        let role = parse_role(&request)?;
        let record = self.directory.add_member(organization, user, role)?;
        Ok(UseCaseResponse::created(to_json(&record)?))
    }
}

pub struct ChangeMemberRole {
    directory: Arc<Directory>,
}

impl ChangeMemberRole {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl UseCaseHandler for ChangeMemberRole {
    async fn handle(&self, request: UseCaseRequest) -> UseCaseResult {
        let organization: OrganizationId = parse_id(&request, "organizationId")?;
        let user: UserId = parse_id(&request, "memberId")?;
        let role = parse_role(&request)?;
        let record = self.directory.change_role(organization, user, role)?;
        Ok(UseCaseResponse::ok(to_json(&record)?))
    }
}

pub struct RemoveMember {
    directory: Arc<Directory>,
}

impl RemoveMember {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl UseCaseHandler for RemoveMember {
    async fn handle(&self, request: UseCaseRequest) -> UseCaseResult {
        let organization: OrganizationId = parse_id(&request, "organizationId")?;
        let user: UserId = parse_id(&request, "memberId")?;
        self.directory.remove_member(organization, user)?;
        Ok(UseCaseResponse::no_content())
    }
}
