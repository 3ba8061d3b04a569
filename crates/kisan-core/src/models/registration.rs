use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::user::UserContext;

/// Free-text and select inputs of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    // Personal
    FirstName,
    LastName,
    FatherName,
    DateOfBirth,
    Gender,
    Category,
    // Contact
    Phone,
    Email,
    Address,
    Pincode,
    // Location
    State,
    District,
    Tehsil,
    Village,
    // Land
    TotalLandArea,
    CultivableLandArea,
    LandType,
    SurveyNumber,
    KhasraNumber,
    // Crop
    PrimaryCrop,
    SecondaryCrop,
    CroppingSeason,
    IrrigationSource,
    // Bank
    BankName,
    BranchName,
    AccountNumber,
    IfscCode,
    // Household
    FamilyMembers,
    Dependents,
    AnnualIncome,
    // Only meaningful when `FormFlag::BelongsToFpo` is set
    FpoName,
}

impl FormField {
    pub const ALL: [FormField; 31] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::FatherName,
        FormField::DateOfBirth,
        FormField::Gender,
        FormField::Category,
        FormField::Phone,
        FormField::Email,
        FormField::Address,
        FormField::Pincode,
        FormField::State,
        FormField::District,
        FormField::Tehsil,
        FormField::Village,
        FormField::TotalLandArea,
        FormField::CultivableLandArea,
        FormField::LandType,
        FormField::SurveyNumber,
        FormField::KhasraNumber,
        FormField::PrimaryCrop,
        FormField::SecondaryCrop,
        FormField::CroppingSeason,
        FormField::IrrigationSource,
        FormField::BankName,
        FormField::BranchName,
        FormField::AccountNumber,
        FormField::IfscCode,
        FormField::FamilyMembers,
        FormField::Dependents,
        FormField::AnnualIncome,
        FormField::FpoName,
    ];

    /// Fields that must be non-blank before a submission is accepted, in the
    /// order they are reported back.
    pub const REQUIRED: [FormField; 13] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::FatherName,
        FormField::DateOfBirth,
        FormField::Gender,
        FormField::Address,
        FormField::Pincode,
        FormField::TotalLandArea,
        FormField::PrimaryCrop,
        FormField::BankName,
        FormField::BranchName,
        FormField::AccountNumber,
        FormField::IfscCode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::FirstName => "first_name",
            FormField::LastName => "last_name",
            FormField::FatherName => "father_name",
            FormField::DateOfBirth => "date_of_birth",
            FormField::Gender => "gender",
            FormField::Category => "category",
            FormField::Phone => "phone",
            FormField::Email => "email",
            FormField::Address => "address",
            FormField::Pincode => "pincode",
            FormField::State => "state",
            FormField::District => "district",
            FormField::Tehsil => "tehsil",
            FormField::Village => "village",
            FormField::TotalLandArea => "total_land_area",
            FormField::CultivableLandArea => "cultivable_land_area",
            FormField::LandType => "land_type",
            FormField::SurveyNumber => "survey_number",
            FormField::KhasraNumber => "khasra_number",
            FormField::PrimaryCrop => "primary_crop",
            FormField::SecondaryCrop => "secondary_crop",
            FormField::CroppingSeason => "cropping_season",
            FormField::IrrigationSource => "irrigation_source",
            FormField::BankName => "bank_name",
            FormField::BranchName => "branch_name",
            FormField::AccountNumber => "account_number",
            FormField::IfscCode => "ifsc_code",
            FormField::FamilyMembers => "family_members",
            FormField::Dependents => "dependents",
            FormField::AnnualIncome => "annual_income",
            FormField::FpoName => "fpo_name",
        }
    }

    /// Human-readable label: `bank_name` becomes `Bank Name`.
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }
}

impl FromStr for FormField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown form field: {}", s))
    }
}

impl Display for FormField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Checkbox inputs of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormFlag {
    HasKisanCreditCard,
    HasCropInsurance,
    BelongsToFpo,
}

impl FormFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormFlag::HasKisanCreditCard => "has_kisan_credit_card",
            FormFlag::HasCropInsurance => "has_crop_insurance",
            FormFlag::BelongsToFpo => "belongs_to_fpo",
        }
    }
}

impl FromStr for FormFlag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "has_kisan_credit_card" => Ok(FormFlag::HasKisanCreditCard),
            "has_crop_insurance" => Ok(FormFlag::HasCropInsurance),
            "belongs_to_fpo" => Ok(FormFlag::BelongsToFpo),
            _ => Err(anyhow::anyhow!("Unknown form flag: {}", s)),
        }
    }
}

/// In-progress registration owned by the active session.
///
/// Serializes to the flat snake_case record persisted in the profile's
/// `details` column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDraft {
    pub first_name: String,
    pub last_name: String,
    pub father_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub category: String,

    pub phone: String,
    pub email: String,
    pub address: String,
    pub pincode: String,

    pub state: String,
    pub district: String,
    pub tehsil: String,
    pub village: String,

    pub total_land_area: String,
    pub cultivable_land_area: String,
    pub land_type: String,
    pub survey_number: String,
    pub khasra_number: String,

    pub primary_crop: String,
    pub secondary_crop: String,
    pub cropping_season: String,
    pub irrigation_source: String,

    pub bank_name: String,
    pub branch_name: String,
    pub account_number: String,
    pub ifsc_code: String,

    pub family_members: String,
    pub dependents: String,
    pub annual_income: String,

    pub has_kisan_credit_card: bool,
    pub has_crop_insurance: bool,
    pub belongs_to_fpo: bool,
    pub fpo_name: String,
}

impl RegistrationDraft {
    /// Start a draft pre-filled from the identity profile.
    ///
    /// The display name is split on whitespace: the first word becomes the
    /// first name and the remaining words the last name.
    pub fn for_user(user: &UserContext) -> Self {
        let mut draft = Self::default();

        if let Some(name) = user.display_name.as_deref() {
            let mut words = name.split_whitespace();
            draft.first_name = words.next().unwrap_or_default().to_string();
            draft.last_name = words.collect::<Vec<_>>().join(" ");
        }
        draft.phone = user.phone.clone().unwrap_or_default();
        draft.email = user.email.clone().unwrap_or_default();

        draft
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::FatherName => &self.father_name,
            FormField::DateOfBirth => &self.date_of_birth,
            FormField::Gender => &self.gender,
            FormField::Category => &self.category,
            FormField::Phone => &self.phone,
            FormField::Email => &self.email,
            FormField::Address => &self.address,
            FormField::Pincode => &self.pincode,
            FormField::State => &self.state,
            FormField::District => &self.district,
            FormField::Tehsil => &self.tehsil,
            FormField::Village => &self.village,
            FormField::TotalLandArea => &self.total_land_area,
            FormField::CultivableLandArea => &self.cultivable_land_area,
            FormField::LandType => &self.land_type,
            FormField::SurveyNumber => &self.survey_number,
            FormField::KhasraNumber => &self.khasra_number,
            FormField::PrimaryCrop => &self.primary_crop,
            FormField::SecondaryCrop => &self.secondary_crop,
            FormField::CroppingSeason => &self.cropping_season,
            FormField::IrrigationSource => &self.irrigation_source,
            FormField::BankName => &self.bank_name,
            FormField::BranchName => &self.branch_name,
            FormField::AccountNumber => &self.account_number,
            FormField::IfscCode => &self.ifsc_code,
            FormField::FamilyMembers => &self.family_members,
            FormField::Dependents => &self.dependents,
            FormField::AnnualIncome => &self.annual_income,
            FormField::FpoName => &self.fpo_name,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
            FormField::FatherName => &mut self.father_name,
            FormField::DateOfBirth => &mut self.date_of_birth,
            FormField::Gender => &mut self.gender,
            FormField::Category => &mut self.category,
            FormField::Phone => &mut self.phone,
            FormField::Email => &mut self.email,
            FormField::Address => &mut self.address,
            FormField::Pincode => &mut self.pincode,
            FormField::State => &mut self.state,
            FormField::District => &mut self.district,
            FormField::Tehsil => &mut self.tehsil,
            FormField::Village => &mut self.village,
            FormField::TotalLandArea => &mut self.total_land_area,
            FormField::CultivableLandArea => &mut self.cultivable_land_area,
            FormField::LandType => &mut self.land_type,
            FormField::SurveyNumber => &mut self.survey_number,
            FormField::KhasraNumber => &mut self.khasra_number,
            FormField::PrimaryCrop => &mut self.primary_crop,
            FormField::SecondaryCrop => &mut self.secondary_crop,
            FormField::CroppingSeason => &mut self.cropping_season,
            FormField::IrrigationSource => &mut self.irrigation_source,
            FormField::BankName => &mut self.bank_name,
            FormField::BranchName => &mut self.branch_name,
            FormField::AccountNumber => &mut self.account_number,
            FormField::IfscCode => &mut self.ifsc_code,
            FormField::FamilyMembers => &mut self.family_members,
            FormField::Dependents => &mut self.dependents,
            FormField::AnnualIncome => &mut self.annual_income,
            FormField::FpoName => &mut self.fpo_name,
        };
        *slot = value.into();
    }

    pub fn flag(&self, flag: FormFlag) -> bool {
        match flag {
            FormFlag::HasKisanCreditCard => self.has_kisan_credit_card,
            FormFlag::HasCropInsurance => self.has_crop_insurance,
            FormFlag::BelongsToFpo => self.belongs_to_fpo,
        }
    }

    pub fn set_flag(&mut self, flag: FormFlag, value: bool) {
        match flag {
            FormFlag::HasKisanCreditCard => self.has_kisan_credit_card = value,
            FormFlag::HasCropInsurance => self.has_crop_insurance = value,
            FormFlag::BelongsToFpo => self.belongs_to_fpo = value,
        }
    }

    /// `first_name + " " + last_name`, trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
