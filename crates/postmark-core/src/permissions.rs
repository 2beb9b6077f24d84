//! Static role to permission table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::session::Role;
use crate::session::Role::{Admin, Editor, MasterAdmin, SuperAdmin, Viewer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    TenantsView,
    TenantsCreate,
    TenantsDelete,
    UsersView,
    UsersCreate,
    UsersDelete,
    ContentView,
    ContentCreate,
    ContentDelete,
    ImagesView,
    ImagesUpload,
    ImagesDelete,
    PostShare,
    HistoryView,
}

const MASTER: &[Role] = &[MasterAdmin];
const MANAGERS: &[Role] = &[MasterAdmin, SuperAdmin];
const ADMINS: &[Role] = &[MasterAdmin, SuperAdmin, Admin];
const EDITORS: &[Role] = &[MasterAdmin, SuperAdmin, Admin, Editor];
const EVERYONE: &[Role] = &[MasterAdmin, SuperAdmin, Admin, Editor, Viewer];

/// `(permission, roles allowed)`.
pub const PERMISSIONS: [(Permission, &[Role]); 14] = [
    (Permission::TenantsView, MASTER),
    (Permission::TenantsCreate, MASTER),
    (Permission::TenantsDelete, MASTER),
    (Permission::UsersView, MANAGERS),
    (Permission::UsersCreate, MANAGERS),
    (Permission::UsersDelete, MANAGERS),
    (Permission::ContentView, EVERYONE),
    (Permission::ContentCreate, EDITORS),
    (Permission::ContentDelete, ADMINS),
    (Permission::ImagesView, EVERYONE),
    (Permission::ImagesUpload, EDITORS),
    (Permission::ImagesDelete, ADMINS),
    (Permission::PostShare, EVERYONE),
    (Permission::HistoryView, EVERYONE),
];

/// Dashboard routes and the permission each one requires.
pub const ROUTES: [(&str, Permission); 6] = [
    ("/dashboard/tenants", Permission::TenantsView),
    ("/dashboard/users", Permission::UsersView),
    ("/dashboard/content", Permission::ContentView),
    ("/dashboard/images", Permission::ImagesView),
    ("/dashboard/post", Permission::PostShare),
    ("/dashboard/history", Permission::HistoryView),
];

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::TenantsView => "tenants_view",
            Permission::TenantsCreate => "tenants_create",
            Permission::TenantsDelete => "tenants_delete",
            Permission::UsersView => "users_view",
            Permission::UsersCreate => "users_create",
            Permission::UsersDelete => "users_delete",
            Permission::ContentView => "content_view",
            Permission::ContentCreate => "content_create",
            Permission::ContentDelete => "content_delete",
            Permission::ImagesView => "images_view",
            Permission::ImagesUpload => "images_upload",
            Permission::ImagesDelete => "images_delete",
            Permission::PostShare => "post_share",
            Permission::HistoryView => "history_view",
        }
    }

    pub fn allowed_roles(self) -> &'static [Role] {
        PERMISSIONS
            .iter()
            .find(|(permission, _)| *permission == self)
            .map(|(_, roles)| *roles)
            .unwrap_or(&[])
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PERMISSIONS
            .iter()
            .map(|(permission, _)| *permission)
            .find(|permission| permission.as_str() == s)
            .ok_or_else(|| format!("unknown permission: {}", s))
    }
}

pub fn has_permission(role: Role, permission: Permission) -> bool {
    permission.allowed_roles().contains(&role)
}

/// Whether `role` may open `route`. Unknown routes are denied.
pub fn can_access_route(role: Role, route: &str) -> bool {
    ROUTES
        .iter()
        .find(|(path, _)| *path == route)
        .is_some_and(|(_, permission)| has_permission(role, *permission))
}
