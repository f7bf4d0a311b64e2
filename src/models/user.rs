//! User model

use serde::{Deserialize, Serialize};

use super::registration::StudentSnapshot;

/// The signed-in user held by the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u8>,
}

impl User {
    /// Copy of the fields embedded into registrations and interests
    pub fn snapshot(&self) -> StudentSnapshot {
        StudentSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            roll_number: self.roll_number.clone(),
            branch: self.branch.clone(),
            year: self.year,
        }
    }
}

/// Fields submitted on the sign-in form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub roll_number: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub year: Option<u8>,
}
