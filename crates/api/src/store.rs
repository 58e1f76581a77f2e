//! In-memory directory store.
//!
//! The only repository implementation in the workspace: `Mutex<HashMap>` per
//! collection, shared via `Arc`, suitable for dev and tests. Lock order is
//! always users → organizations → memberships.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orgkit_core::{DomainError, DomainResult, OrganizationId, PageRequest, Pagination, UserId};

/// A registered user account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An organization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRecord {
    pub id: OrganizationId,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Membership role inside an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
}

impl MemberRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "owner" => Some(Self::Owner),
            "admin" => Some(Self::Admin),
            "member" => Some(Self::Member),
            _ => None,
        }
    }
}

/// A user's membership in an organization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRecord {
    pub organization_id: OrganizationId,
    pub user_id: UserId,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

/// The in-memory directory of users, organizations, and memberships.
#[derive(Debug, Default)]
pub struct Directory {
    users: Mutex<HashMap<UserId, UserRecord>>,
    organizations: Mutex<HashMap<OrganizationId, OrganizationRecord>>,
    memberships: Mutex<HashMap<(OrganizationId, UserId), MembershipRecord>>,
}

impl Directory {
    // ----- users -----

    pub fn create_user(&self, email: &str, name: &str) -> DomainResult<UserRecord> {
        let mut users = self.users.lock().unwrap();
        if users
            .values()
            .any(|user| user.email.eq_ignore_ascii_case(email))
        {
            return Err(DomainError::conflict(format!(
                "a user with email '{email}' already exists"
            )));
        }

        let now = Utc::now();
        let record = UserRecord {
            id: UserId::new(),
            email: email.to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    pub fn get_user(&self, id: UserId) -> DomainResult<UserRecord> {
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("user", id.to_string()))
    }

    pub fn update_user(
        &self,
        id: UserId,
        email: Option<&str>,
        name: Option<&str>,
    ) -> DomainResult<UserRecord> {
        let mut users = self.users.lock().unwrap();
        if let Some(email) = email {
            let taken = users
                .values()
                .any(|user| user.id != id && user.email.eq_ignore_ascii_case(email));
            if taken {
                return Err(DomainError::conflict(format!(
                    "a user with email '{email}' already exists"
                )));
            }
        }

        let user = users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("user", id.to_string()))?;
        if let Some(email) = email {
            user.email = email.to_string();
        }
        if let Some(name) = name {
            user.name = name.to_string();
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    pub fn delete_user(&self, id: UserId) -> DomainResult<()> {
        let mut users = self.users.lock().unwrap();
        if !users.contains_key(&id) {
            return Err(DomainError::not_found("user", id.to_string()));
        }

        let mut memberships = self.memberships.lock().unwrap();
        let owns_organization = memberships
            .values()
            .any(|m| m.user_id == id && m.role == MemberRole::Owner);
        if owns_organization {
            return Err(DomainError::business_rule(
                "organization-ownership",
                "user owns an organization; transfer ownership before deletion",
            ));
        }

        memberships.retain(|_, m| m.user_id != id);
        users.remove(&id);
        Ok(())
    }

    pub fn list_users(&self, page: PageRequest) -> (Vec<UserRecord>, Pagination) {
        let users = self.users.lock().unwrap();
        let mut records: Vec<UserRecord> = users.values().cloned().collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        paginate(records, page)
    }

    // ----- organizations -----

    pub fn create_organization(
        &self,
        name: &str,
        slug: &str,
        owner: UserId,
    ) -> DomainResult<OrganizationRecord> {
        let users = self.users.lock().unwrap();
        if !users.contains_key(&owner) {
            return Err(DomainError::not_found("user", owner.to_string()));
        }

        let mut organizations = self.organizations.lock().unwrap();
        if organizations
            .values()
            .any(|org| org.slug.eq_ignore_ascii_case(slug))
        {
            return Err(DomainError::conflict(format!(
                "an organization with slug '{slug}' already exists"
            )));
        }

        let now = Utc::now();
        let record = OrganizationRecord {
            id: OrganizationId::new(),
            name: name.to_string(),
            slug: slug.to_string(),
            created_at: now,
        };
        organizations.insert(record.id, record.clone());

        let mut memberships = self.memberships.lock().unwrap();
        memberships.insert(
            (record.id, owner),
            MembershipRecord {
                organization_id: record.id,
                user_id: owner,
                role: MemberRole::Owner,
                joined_at: now,
            },
        );

        Ok(record)
    }

    pub fn get_organization(&self, id: OrganizationId) -> DomainResult<OrganizationRecord> {
        self.organizations
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("organization", id.to_string()))
    }

    pub fn delete_organization(&self, id: OrganizationId) -> DomainResult<()> {
        let mut organizations = self.organizations.lock().unwrap();
        if organizations.remove(&id).is_none() {
            return Err(DomainError::not_found("organization", id.to_string()));
        }
        let mut memberships = self.memberships.lock().unwrap();
        memberships.retain(|_, m| m.organization_id != id);
        Ok(())
    }

    pub fn list_organizations(&self, page: PageRequest) -> (Vec<OrganizationRecord>, Pagination) {
        let organizations = self.organizations.lock().unwrap();
        let mut records: Vec<OrganizationRecord> = organizations.values().cloned().collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        paginate(records, page)
    }

    // ----- memberships -----

    pub fn list_members(
        &self,
        organization: OrganizationId,
        page: PageRequest,
    ) -> DomainResult<(Vec<MembershipRecord>, Pagination)> {
        let organizations = self.organizations.lock().unwrap();
        if !organizations.contains_key(&organization) {
            return Err(DomainError::not_found(
                "organization",
                organization.to_string(),
            ));
        }

        let memberships = self.memberships.lock().unwrap();
        let mut records: Vec<MembershipRecord> = memberships
            .values()
            .filter(|m| m.organization_id == organization)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.user_id.as_uuid().cmp(b.user_id.as_uuid()))
        });
        Ok(paginate(records, page))
    }

    pub fn add_member(
        &self,
        organization: OrganizationId,
        user: UserId,
        role: MemberRole,
    ) -> DomainResult<MembershipRecord> {
        let users = self.users.lock().unwrap();
        if !users.contains_key(&user) {
            return Err(DomainError::not_found("user", user.to_string()));
        }

        let organizations = self.organizations.lock().unwrap();
        if !organizations.contains_key(&organization) {
            return Err(DomainError::not_found(
                "organization",
                organization.to_string(),
            ));
        }

        let mut memberships = self.memberships.lock().unwrap();
        if memberships.contains_key(&(organization, user)) {
            return Err(DomainError::conflict(
                "user is already a member of this organization",
            ));
        }

        let record = MembershipRecord {
            organization_id: organization,
            user_id: user,
            role,
            joined_at: Utc::now(),
        };
        memberships.insert((organization, user), record.clone());
        Ok(record)
    }

    pub fn remove_member(&self, organization: OrganizationId, user: UserId) -> DomainResult<()> {
        let mut memberships = self.memberships.lock().unwrap();
        let membership = memberships
            .get(&(organization, user))
            .ok_or_else(|| membership_not_found(organization, user))?;

        if membership.role == MemberRole::Owner {
            return Err(DomainError::business_rule(
                "owner-removal",
                "organization owners cannot be removed",
            ));
        }

        memberships.remove(&(organization, user));
        Ok(())
    }

    pub fn change_role(
        &self,
        organization: OrganizationId,
        user: UserId,
        role: MemberRole,
    ) -> DomainResult<MembershipRecord> {
        let mut memberships = self.memberships.lock().unwrap();
        let current = memberships
            .get(&(organization, user))
            .ok_or_else(|| membership_not_found(organization, user))?
            .clone();

        if current.role == MemberRole::Owner && role != MemberRole::Owner {
            let other_owner = memberships.values().any(|m| {
                m.organization_id == organization
                    && m.user_id != user
                    && m.role == MemberRole::Owner
            });
            if !other_owner {
                return Err(DomainError::business_rule(
                    "last-owner",
                    "an organization must retain at least one owner",
                ));
            }
        }

        let updated = MembershipRecord {
            role,
            ..current
        };
        memberships.insert((organization, user), updated.clone());
        Ok(updated)
    }
}

fn membership_not_found(organization: OrganizationId, user: UserId) -> DomainError {
    DomainError::not_found("membership", format!("{organization}/{user}"))
}

fn paginate<T>(records: Vec<T>, page: PageRequest) -> (Vec<T>, Pagination) {
    let pagination = Pagination::new(records.len() as u64, page);
    let items = records
        .into_iter()
        .skip(page.offset())
        .take(page.page_size() as usize)
        .collect();
    (items, pagination)
}
