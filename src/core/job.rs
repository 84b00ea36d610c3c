use serde::{Deserialize, Serialize};

use crate::core::stage::StageId;

/// One tracked application. Serialized with camelCase keys; absent text
/// fields read back as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: String,
    pub status: StageId,
    #[serde(default)]
    pub applied_date: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub notes: String,
}

pub fn seed() -> Vec<JobRecord> {
    vec![
        JobRecord {
            id: "1".to_string(),
            company: "Apple".to_string(),
            role: "Product Designer".to_string(),
            location: "Cupertino (Remote)".to_string(),
            salary: "45 LPA".to_string(),
            status: StageId::Interview,
            applied_date: "2023-11-01".to_string(),
            url: "https://apple.com/careers".to_string(),
            notes: "Prepare portfolio for the design critique.".to_string(),
        },
        JobRecord {
            id: "2".to_string(),
            company: "Linear".to_string(),
            role: "Frontend Engineer".to_string(),
            location: "Remote".to_string(),
            salary: "28 LPA".to_string(),
            status: StageId::Applied,
            applied_date: "2023-11-02".to_string(),
            url: "https://linear.app/jobs".to_string(),
            notes: "Love their UI. Referral from internal dev.".to_string(),
        },
    ]
}
