use serde::{Deserialize, Serialize};

use crate::expenses::category::Category;

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub ai_summary: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub category: Category,
}
