use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub project_number: String,
    pub address: Option<String>,
    pub assigned_users: Vec<i64>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectDraft {
    pub name: Option<String>,
    pub project_number: Option<String>,
    pub address: Option<String>,
    pub assigned_users: Option<Vec<i64>>,
}
