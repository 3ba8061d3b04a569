use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;

use super::field::{validate_field, FieldError};
use crate::models::{missing_required_documents, DocumentMap, DocumentType, FormField, RegistrationDraft};

/// Everything standing between a draft and a successful submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionErrors {
    pub missing_documents: Vec<DocumentType>,
    pub missing_fields: Vec<FormField>,
    #[serde(skip)]
    pub invalid_fields: Vec<FieldError>,
}

impl SubmissionErrors {
    pub fn is_empty(&self) -> bool {
        self.missing_documents.is_empty()
            && self.missing_fields.is_empty()
            && self.invalid_fields.is_empty()
    }
}

impl Display for SubmissionErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut sections = Vec::new();

        if !self.missing_documents.is_empty() {
            let items: Vec<_> = self
                .missing_documents
                .iter()
                .map(|d| format!("• {}", d.display_name()))
                .collect();
            sections.push(format!(
                "Please upload the following required documents:\n{}",
                items.join("\n")
            ));
        }

        if !self.missing_fields.is_empty() {
            let items: Vec<_> = self
                .missing_fields
                .iter()
                .map(|field| format!("• {}", field.label()))
                .collect();
            sections.push(format!(
                "Please fill in all required fields:\n{}",
                items.join("\n")
            ));
        }

        if !self.invalid_fields.is_empty() {
            let items: Vec<_> = self
                .invalid_fields
                .iter()
                .map(|e| format!("• {}", e))
                .collect();
            sections.push(format!("Please correct the following:\n{}", items.join("\n")));
        }

        write!(f, "{}", sections.join("\n\n"))
    }
}

impl std::error::Error for SubmissionErrors {}

/// Submit-time sweep over the whole draft.
///
/// Collects every missing required document, every blank required field and
/// every malformed non-blank field instead of stopping at the first problem.
pub fn required_sweep(
    draft: &RegistrationDraft,
    documents: &DocumentMap,
) -> Result<(), SubmissionErrors> {
    let mut errors = SubmissionErrors {
        missing_documents: missing_required_documents(documents),
        ..Default::default()
    };

    for field in FormField::REQUIRED {
        if draft.get(field).trim().is_empty() {
            errors.missing_fields.push(field);
        }
    }

    for field in FormField::ALL {
        if let Err(e) = validate_field(field, draft.get(field)) {
            errors.invalid_fields.push(e);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentRecord;
    use chrono::Utc;

    fn complete_draft() -> RegistrationDraft {
        let mut draft = RegistrationDraft::default();
        for field in FormField::REQUIRED {
            draft.set(field, "value");
        }
        draft.set(FormField::Pincode, "411001");
        draft.set(FormField::Phone, "9876543210");
        draft
    }

    fn documents(types: impl IntoIterator<Item = DocumentType>) -> DocumentMap {
        types
            .into_iter()
            .map(|t| {
                (
                    t,
                    DocumentRecord {
                        file_path: format!("user/{}_1.pdf", t),
                        file_name: "doc.pdf".to_string(),
                        public_url: format!("https://cdn.example.com/user/{}_1.pdf", t),
                        uploaded_at: Utc::now(),
                        file_size: 100,
                        file_type: "application/pdf".to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_complete_draft_passes() {
        let docs = documents(DocumentType::required());
        assert!(required_sweep(&complete_draft(), &docs).is_ok());
    }

    #[test]
    fn test_lists_exactly_the_missing_field() {
        let mut draft = complete_draft();
        draft.set(FormField::BankName, "   ");
        let docs = documents(DocumentType::required());

        let errors = required_sweep(&draft, &docs).unwrap_err();
        assert_eq!(errors.missing_fields, vec![FormField::BankName]);
        assert!(errors.missing_documents.is_empty());
        assert!(errors.invalid_fields.is_empty());
        assert!(errors.to_string().contains("• Bank Name"));
    }

    #[test]
    fn test_lists_missing_document() {
        let docs = documents(DocumentType::required().filter(|t| *t != DocumentType::Pan));

        let errors = required_sweep(&complete_draft(), &docs).unwrap_err();
        assert_eq!(errors.missing_documents, vec![DocumentType::Pan]);
        assert!(errors.missing_fields.is_empty());
        assert!(errors.to_string().contains("• PAN Card"));
    }

    #[test]
    fn test_optional_documents_not_needed() {
        let docs = documents(DocumentType::required());
        assert!(!docs.contains_key(&DocumentType::CasteCertificate));
        assert!(required_sweep(&complete_draft(), &docs).is_ok());
    }

    #[test]
    fn test_malformed_phone_reported() {
        let mut draft = complete_draft();
        draft.set(FormField::Phone, "12345");
        let docs = documents(DocumentType::required());

        let errors = required_sweep(&draft, &docs).unwrap_err();
        assert!(errors.missing_fields.is_empty());
        assert_eq!(errors.invalid_fields.len(), 1);
        assert_eq!(errors.invalid_fields[0].field(), FormField::Phone);
    }

    #[test]
    fn test_everything_aggregated() {
        let errors = required_sweep(&RegistrationDraft::default(), &DocumentMap::new()).unwrap_err();
        assert_eq!(errors.missing_fields, FormField::REQUIRED.to_vec());
        assert_eq!(
            errors.missing_documents,
            DocumentType::required().collect::<Vec<_>>()
        );
    }
}
