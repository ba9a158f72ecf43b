//! Name-based access to profile values.
//!
//! Specs reference profile fields and attachments by string. Names are matched after dropping
//! underscores and case, so `business_name`, `businessName` and `BusinessName` resolve alike.

use super::domain::{Attachments, UserProfile};

/// A resolved profile value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    List(&'a [String]),
    Number(u64),
    Absent,
}

impl FieldValue<'_> {
    /// Blank text and empty lists count as absent.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(text) => !text.trim().is_empty(),
            FieldValue::List(values) => values.iter().any(|value| !value.trim().is_empty()),
            FieldValue::Number(_) => true,
            FieldValue::Absent => false,
        }
    }

    /// String form used in prefilled payloads. `None` when the value is not present.
    pub fn render(&self) -> Option<String> {
        if !self.is_present() {
            return None;
        }
        match self {
            FieldValue::Text(text) => Some(text.trim().to_string()),
            FieldValue::List(values) => Some(
                values
                    .iter()
                    .map(|value| value.trim())
                    .filter(|value| !value.is_empty())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            FieldValue::Number(number) => Some(number.to_string()),
            FieldValue::Absent => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    UserName,
    BusinessName,
    Tin,
    LegalForm,
    DirectorName,
    Phone,
    Email,
    Address,
    Region,
    ActivityType,
    OkedCodes,
    EmployeeCount,
    AnnualTurnover,
}

impl ProfileField {
    pub fn from_name(name: &str) -> Option<Self> {
        let field = match normalize(name).as_str() {
            "username" | "name" => Self::UserName,
            "businessname" => Self::BusinessName,
            "tin" | "inn" | "stir" => Self::Tin,
            "legalform" => Self::LegalForm,
            "directorname" => Self::DirectorName,
            "phone" => Self::Phone,
            "email" => Self::Email,
            "address" => Self::Address,
            "region" => Self::Region,
            "activitytype" => Self::ActivityType,
            "okedcodes" | "oked" => Self::OkedCodes,
            "employeecount" => Self::EmployeeCount,
            "annualturnover" | "turnover" => Self::AnnualTurnover,
            _ => return None,
        };
        Some(field)
    }

    pub fn value(self, profile: &UserProfile) -> FieldValue<'_> {
        match self {
            Self::UserName => FieldValue::Text(&profile.user_name),
            Self::BusinessName => FieldValue::Text(&profile.business_name),
            Self::Tin => FieldValue::Text(&profile.tin),
            Self::LegalForm => FieldValue::Text(&profile.legal_form),
            Self::DirectorName => FieldValue::Text(&profile.director_name),
            Self::Phone => FieldValue::Text(&profile.phone),
            Self::Email => FieldValue::Text(&profile.email),
            Self::Address => FieldValue::Text(&profile.address),
            Self::Region => FieldValue::Text(&profile.region),
            Self::ActivityType => FieldValue::Text(&profile.activity_type),
            Self::OkedCodes => FieldValue::List(&profile.oked_codes),
            Self::EmployeeCount => profile
                .employee_count
                .map_or(FieldValue::Absent, |count| FieldValue::Number(count.into())),
            Self::AnnualTurnover => profile
                .annual_turnover
                .map_or(FieldValue::Absent, FieldValue::Number),
        }
    }
}

/// Resolve a spec field name against the profile. Unknown names resolve to `Absent`.
pub fn profile_value<'a>(profile: &'a UserProfile, name: &str) -> FieldValue<'a> {
    ProfileField::from_name(name).map_or(FieldValue::Absent, |field| field.value(profile))
}

/// Resolve an attachment name to its file reference, if one is present.
pub fn attachment_value<'a>(attachments: &'a Attachments, name: &str) -> Option<&'a str> {
    let typed = match normalize(name).as_str() {
        "charter" | "ustav" => attachments.charter.as_deref(),
        "registrationcertificate" | "guvohnoma" => attachments.registration_certificate.as_deref(),
        "taxcertificate" => attachments.tax_certificate.as_deref(),
        "financialstatement" => attachments.financial_statement.as_deref(),
        "businessplan" => attachments.business_plan.as_deref(),
        "passportcopy" | "passport" => attachments.passport_copy.as_deref(),
        _ => attachments.other.get(name.trim()).map(String::as_str).or_else(|| {
            let wanted = normalize(name);
            attachments
                .other
                .iter()
                .find(|(key, _)| normalize(key) == wanted)
                .map(|(_, value)| value.as_str())
        }),
    };

    typed.map(str::trim).filter(|value| !value.is_empty())
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}
