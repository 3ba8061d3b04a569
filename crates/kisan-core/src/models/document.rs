use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Supporting document categories accepted by the registration form.
///
/// The set is closed: the registry (display name, required flag) is derived
/// from the variant, so adding a category is a compile-time change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Aadhaar,
    Pan,
    SevenTwelve,
    EightA,
    Passbook,
    LandRecords,
    CasteCertificate,
    IncomeCertificate,
    FarmerCertificate,
    Photo,
}

impl DocumentType {
    /// Registry order, as presented on the form.
    pub const ALL: [DocumentType; 10] = [
        DocumentType::Aadhaar,
        DocumentType::Pan,
        DocumentType::SevenTwelve,
        DocumentType::EightA,
        DocumentType::Passbook,
        DocumentType::LandRecords,
        DocumentType::CasteCertificate,
        DocumentType::IncomeCertificate,
        DocumentType::FarmerCertificate,
        DocumentType::Photo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Aadhaar => "aadhaar",
            DocumentType::Pan => "pan",
            DocumentType::SevenTwelve => "seven_twelve",
            DocumentType::EightA => "eight_a",
            DocumentType::Passbook => "passbook",
            DocumentType::LandRecords => "land_records",
            DocumentType::CasteCertificate => "caste_certificate",
            DocumentType::IncomeCertificate => "income_certificate",
            DocumentType::FarmerCertificate => "farmer_certificate",
            DocumentType::Photo => "photo",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::Aadhaar => "Aadhaar Card",
            DocumentType::Pan => "PAN Card",
            DocumentType::SevenTwelve => "7/12 Extract",
            DocumentType::EightA => "8A Document",
            DocumentType::Passbook => "Bank Passbook",
            DocumentType::LandRecords => "Land Records/Revenue Records",
            DocumentType::CasteCertificate => "Caste Certificate",
            DocumentType::IncomeCertificate => "Income Certificate",
            DocumentType::FarmerCertificate => "Farmer Certificate",
            DocumentType::Photo => "Passport Size Photo",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(
            self,
            DocumentType::Aadhaar
                | DocumentType::Pan
                | DocumentType::SevenTwelve
                | DocumentType::EightA
                | DocumentType::Passbook
                | DocumentType::Photo
        )
    }

    /// Required document types in registry order.
    pub fn required() -> impl Iterator<Item = DocumentType> {
        Self::ALL.into_iter().filter(|t| t.is_required())
    }
}

impl FromStr for DocumentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| anyhow::anyhow!("Unknown document type: {}", s))
    }
}

impl Display for DocumentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata kept for a successfully uploaded document.
///
/// Only ever constructed after the storage gateway accepted the file. A
/// re-upload replaces the record for its type wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub file_path: String,
    pub file_name: String,
    pub public_url: String,
    pub uploaded_at: DateTime<Utc>,
    pub file_size: u64,
    pub file_type: String,
}

/// At most one live record per document type.
pub type DocumentMap = BTreeMap<DocumentType, DocumentRecord>;

/// Document types from the registry that are required but absent from `documents`.
pub fn missing_required_documents(documents: &DocumentMap) -> Vec<DocumentType> {
    DocumentType::required()
        .filter(|t| !documents.contains_key(t))
        .collect()
}
