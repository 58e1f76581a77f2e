//! User use cases.

use std::sync::Arc;

use async_trait::async_trait;

use orgkit_core::UserId;
use orgkit_gateway::{UseCaseHandler, UseCaseRequest, UseCaseResponse, UseCaseResult};

use crate::routes::common::{body_str, body_str_opt, page_request, parse_id, to_items, to_json};
use crate::store::Directory;

pub struct ListUsers {
    directory: Arc<Directory>,
}

impl ListUsers {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl UseCaseHandler for ListUsers {
    async fn handle(&self, request: UseCaseRequest) -> UseCaseResult {
        let (records, pagination) = self.directory.list_users(page_request(&request));
        Ok(UseCaseResponse::collection(to_items(&records)?, pagination))
    }
}

pub struct CreateUser {
    directory: Arc<Directory>,
}

impl CreateUser {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl UseCaseHandler for CreateUser {
    async fn handle(&self, request: UseCaseRequest) -> UseCaseResult {
        let email = body_str(&request, "email")?;
        let name = body_str(&request, "name")?;
        let record = self.directory.create_user(email, name)?;
        let location = format!("/users/{}", record.id);
        Ok(UseCaseResponse::created(to_json(&record)?).with_header("location", location))
    }
}

pub struct GetUser {
    directory: Arc<Directory>,
}

impl GetUser {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl UseCaseHandler for GetUser {
    async fn handle(&self, request: UseCaseRequest) -> UseCaseResult {
        let id: UserId = parse_id(&request, "userId")?;
        let record = self.directory.get_user(id)?;
        Ok(UseCaseResponse::ok(to_json(&record)?))
    }
}

pub struct UpdateUser {
    directory: Arc<Directory>,
}

impl UpdateUser {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl UseCaseHandler for UpdateUser {
    async fn handle(&self, request: UseCaseRequest) -> UseCaseResult {
        let id: UserId = parse_id(&request, "userId")?;
        let email = body_str_opt(&request, "email");
        let name = body_str_opt(&request, "name");
        let record = self.directory.update_user(id, email, name)?;
        Ok(UseCaseResponse::ok(to_json(&record)?))
    }
}

pub struct DeleteUser {
    directory: Arc<Directory>,
}

impl DeleteUser {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl UseCaseHandler for DeleteUser {
    async fn handle(&self, request: UseCaseRequest) -> UseCaseResult {
        let id: UserId = parse_id(&request, "userId")?;
        self.directory.delete_user(id)?;
        Ok(UseCaseResponse::no_content())
    }
}
