use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

use super::document::DocumentMap;
use super::registration::RegistrationDraft;

/// Verification state of a submitted profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    PendingVerification,
    Verified,
    Rejected,
}

impl ProfileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileStatus::PendingVerification => "pending_verification",
            ProfileStatus::Verified => "verified",
            ProfileStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ProfileStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_verification" => Ok(ProfileStatus::PendingVerification),
            "verified" => Ok(ProfileStatus::Verified),
            "rejected" => Ok(ProfileStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid profile status: {}", s)),
        }
    }
}

impl Display for ProfileStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized registration record handed to the profile store.
///
/// One profile per `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerProfile {
    pub user_id: Uuid,
    pub full_name: String,
    #[serde(flatten)]
    pub details: RegistrationDraft,
    pub documents: DocumentMap,
    pub status: ProfileStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FarmerProfile {
    /// Build a pending-verification profile from a completed draft.
    ///
    /// `fpo_name` is dropped when the farmer is not an FPO member.
    pub fn from_draft(
        user_id: Uuid,
        draft: &RegistrationDraft,
        documents: DocumentMap,
        now: DateTime<Utc>,
    ) -> Self {
        let mut details = draft.clone();
        if !details.belongs_to_fpo {
            details.fpo_name.clear();
        }

        Self {
            user_id,
            full_name: draft.full_name(),
            details,
            documents,
            status: ProfileStatus::PendingVerification,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A profile as persisted. The store assigns `id` on first insert and keeps
/// it, along with `created_at`, across resubmissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProfile {
    pub id: Uuid,
    #[serde(flatten)]
    pub profile: FarmerProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_draft() {
        let mut draft = RegistrationDraft::default();
        draft.first_name = " Sunita".to_string();
        draft.last_name = "Pawar ".to_string();
        draft.fpo_name = "Sahyadri".to_string();

        let now = Utc::now();
        let user_id = Uuid::new_v4();
        let profile = FarmerProfile::from_draft(user_id, &draft, DocumentMap::new(), now);

        assert_eq!(profile.full_name, "Sunita Pawar");
        assert_eq!(profile.status, ProfileStatus::PendingVerification);
        assert_eq!(profile.user_id, user_id);
        assert_eq!(profile.created_at, now);
        assert!(profile.details.fpo_name.is_empty());
    }

    #[test]
    fn test_profile_keeps_fpo_name_for_members() {
        let mut draft = RegistrationDraft::default();
        draft.belongs_to_fpo = true;
        draft.fpo_name = "Sahyadri".to_string();

        let profile =
            FarmerProfile::from_draft(Uuid::new_v4(), &draft, DocumentMap::new(), Utc::now());
        assert_eq!(profile.details.fpo_name, "Sahyadri");
    }

    #[test]
    fn test_profile_serializes_flat() {
        let mut draft = RegistrationDraft::default();
        draft.bank_name = "SBI".to_string();
        let profile =
            FarmerProfile::from_draft(Uuid::new_v4(), &draft, DocumentMap::new(), Utc::now());

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["bank_name"], "SBI");
        assert_eq!(json["status"], "pending_verification");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "verified".parse::<ProfileStatus>().unwrap(),
            ProfileStatus::Verified
        );
        assert!("approved".parse::<ProfileStatus>().is_err());
    }
}
