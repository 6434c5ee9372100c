use super::{page::Page, role::Role};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AppUser {
    pub id: i64,
    pub company_id: i64,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub pin_code: String,
    pub role: Role,
    pub group: String,
    pub assigned_projects: Vec<i64>, // ⇔ app_users.assigned_projects (JSON array)
    pub is_active: bool,
    pub is_admin: bool,
    pub allowed_pages: Vec<Page>, // ⇔ app_users.allowed_pages (JSON array)
    pub approves_users: Vec<i64>, // ⇔ app_users.approves_users (JSON array)
    pub phone: Option<String>,
}

impl AppUser {
    /// Admin rights come from the role table or from the explicit flag.
    pub fn has_admin_access(&self) -> bool {
        self.is_admin || self.role.is_admin()
    }

    /// Admins reach every page; otherwise an empty list means no restriction.
    pub fn can_open(&self, page: Page) -> bool {
        self.has_admin_access() || self.allowed_pages.is_empty() || self.allowed_pages.contains(&page)
    }
}

/// Fields accepted when creating or editing a user.
#[derive(Debug, Clone, Default)]
pub struct UserDraft {
    pub full_name: Option<String>,
    pub pin_code: Option<String>,
    pub role: Option<Role>,
    pub group: Option<String>,
    pub assigned_projects: Option<Vec<i64>>,
    pub is_admin: Option<bool>,
    pub allowed_pages: Option<Vec<Page>>,
    pub approves_users: Option<Vec<i64>>,
    pub phone: Option<String>,
}
