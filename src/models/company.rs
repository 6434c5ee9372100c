use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub join_code: String,
    pub logo_path: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: String,
}
