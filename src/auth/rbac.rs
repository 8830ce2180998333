//! Role-based access control.
//!
//! A static table maps each role tier to the resources it may touch per HTTP
//! method. The table is built once at startup and shared read-only; the
//! decision itself is a pure lookup with no request state involved.

use std::collections::{HashMap, HashSet};
use std::fmt;

use axum::http::Method;

/// Role tiers stored on users and carried in token claims.
pub const ROLE_STAFF: i32 = 1;
pub const ROLE_EDITOR: i32 = 2;
pub const ROLE_ADMIN: i32 = 3;

/// Resource names; each is mounted at `/api/<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    Products,
    Employees,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Products => "products",
            Resource::Employees => "employees",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four verbs the table knows about. Anything else is denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Get,
    Post,
    Put,
    Delete,
}

impl Action {
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Action::Get),
            Method::POST => Some(Action::Post),
            Method::PUT => Some(Action::Put),
            Method::DELETE => Some(Action::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PermissionTable {
    grants: HashMap<(i32, Action), HashSet<Resource>>,
}

impl PermissionTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn grant(mut self, role: i32, action: Action, resources: &[Resource]) -> Self {
        self.grants
            .entry((role, action))
            .or_default()
            .extend(resources.iter().copied());
        self
    }

    pub fn is_allowed(&self, role: i32, method: &Method, resource: Resource) -> bool {
        let Some(action) = Action::from_method(method) else {
            return false;
        };
        self.grants
            .get(&(role, action))
            .is_some_and(|resources| resources.contains(&resource))
    }
}

impl PermissionTable {
    /// The production table:
    ///
    /// | role | GET | POST / PUT / DELETE |
    /// |---|---|---|
    /// | 1 | products, employees | none |
    /// | 2 | products, employees | products |
    /// | 3 | users, products, employees | users, products, employees |
    ///
    /// Only products and users are mounted behind the gate. `/api/employees`
    /// is public, so the employees rows are reserved and not enforced today.
    pub fn standard() -> Self {
        use Resource::*;

        let mut table = Self::empty()
            .grant(ROLE_STAFF, Action::Get, &[Products, Employees])
            .grant(ROLE_EDITOR, Action::Get, &[Products, Employees])
            .grant(ROLE_ADMIN, Action::Get, &[Users, Products, Employees]);

        for action in [Action::Post, Action::Put, Action::Delete] {
            table = table
                .grant(ROLE_EDITOR, action, &[Products])
                .grant(ROLE_ADMIN, action, &[Users, Products, Employees]);
        }
        table
    }
}

/// Tier floor used by handlers that demand a minimum role regardless of the table.
pub fn meets_tier(role: i32, minimum: i32) -> bool {
    role >= minimum
}
