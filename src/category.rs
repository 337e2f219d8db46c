use serde::{Deserialize, Serialize};

/// Canonical field identifier. Declaration order mirrors the profile layout,
/// not classification priority (that lives in `classifier::rules`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    FirstName,
    MiddleName,
    LastName,
    FullName,
    Email,
    PhoneNational,
    PhoneInternational,
    CountryCode,
    AltPhoneNational,
    AltPhoneInternational,
    AltCountryCode,
    DateOfBirth,
    Age,
    Gender,
    Nationality,
    HouseNo,
    Building,
    Area,
    Landmark,
    Address,
    City,
    CurrentLocation,
    Location,
    State,
    Country,
    Pincode,
    JobTitle,
    Organization,
    Qualification,
    StartingYear,
    PassingYear,
    LinkedinUrl,
    PortfolioUrl,
    GithubUrl,
}

impl Category {
    pub const ALL: &'static [Category] = &[
        Category::FirstName,
        Category::MiddleName,
        Category::LastName,
        Category::FullName,
        Category::Email,
        Category::PhoneNational,
        Category::PhoneInternational,
        Category::CountryCode,
        Category::AltPhoneNational,
        Category::AltPhoneInternational,
        Category::AltCountryCode,
        Category::DateOfBirth,
        Category::Age,
        Category::Gender,
        Category::Nationality,
        Category::HouseNo,
        Category::Building,
        Category::Area,
        Category::Landmark,
        Category::Address,
        Category::City,
        Category::CurrentLocation,
        Category::Location,
        Category::State,
        Category::Country,
        Category::Pincode,
        Category::JobTitle,
        Category::Organization,
        Category::Qualification,
        Category::StartingYear,
        Category::PassingYear,
        Category::LinkedinUrl,
        Category::PortfolioUrl,
        Category::GithubUrl,
    ];

    /// Stable key, matching the profile's storage key where one exists.
    pub fn key(self) -> &'static str {
        match self {
            Category::FirstName => "firstName",
            Category::MiddleName => "middleName",
            Category::LastName => "lastName",
            Category::FullName => "fullName",
            Category::Email => "email",
            Category::PhoneNational => "phoneNational",
            Category::PhoneInternational => "phoneInternational",
            Category::CountryCode => "countryCode",
            Category::AltPhoneNational => "altPhoneNational",
            Category::AltPhoneInternational => "altPhoneInternational",
            Category::AltCountryCode => "altCountryCode",
            Category::DateOfBirth => "dateOfBirth",
            Category::Age => "age",
            Category::Gender => "gender",
            Category::Nationality => "nationality",
            Category::HouseNo => "houseNo",
            Category::Building => "building",
            Category::Area => "area",
            Category::Landmark => "landmark",
            Category::Address => "address",
            Category::City => "city",
            Category::CurrentLocation => "currentLocation",
            Category::Location => "location",
            Category::State => "state",
            Category::Country => "country",
            Category::Pincode => "pincode",
            Category::JobTitle => "jobTitle",
            Category::Organization => "organization",
            Category::Qualification => "qualification",
            Category::StartingYear => "startingYear",
            Category::PassingYear => "passingYear",
            Category::LinkedinUrl => "linkedinUrl",
            Category::PortfolioUrl => "portfolioUrl",
            Category::GithubUrl => "githubUrl",
        }
    }

    pub fn from_key(key: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::FirstName => "First Name",
            Category::MiddleName => "Middle Name",
            Category::LastName => "Last Name",
            Category::FullName => "Full Name",
            Category::Email => "Email",
            Category::PhoneNational => "Phone",
            Category::PhoneInternational => "Phone (International)",
            Category::CountryCode => "Country Code",
            Category::AltPhoneNational => "Alternate Phone",
            Category::AltPhoneInternational => "Alternate Phone (International)",
            Category::AltCountryCode => "Alternate Country Code",
            Category::DateOfBirth => "Date of Birth",
            Category::Age => "Age",
            Category::Gender => "Gender",
            Category::Nationality => "Nationality",
            Category::HouseNo => "House No",
            Category::Building => "Building/Street",
            Category::Area => "Area/Locality",
            Category::Landmark => "Landmark",
            Category::Address => "Address",
            Category::City => "City",
            Category::CurrentLocation => "Current Location",
            Category::Location => "Location",
            Category::State => "State",
            Category::Country => "Country",
            Category::Pincode => "Pincode",
            Category::JobTitle => "Job Title",
            Category::Organization => "College/Organization",
            Category::Qualification => "Qualification",
            Category::StartingYear => "Starting Year",
            Category::PassingYear => "Passing Year",
            Category::LinkedinUrl => "LinkedIn",
            Category::PortfolioUrl => "Portfolio",
            Category::GithubUrl => "GitHub",
        }
    }

    pub fn is_phone(self) -> bool {
        matches!(
            self,
            Category::PhoneNational
                | Category::PhoneInternational
                | Category::CountryCode
                | Category::AltPhoneNational
                | Category::AltPhoneInternational
                | Category::AltCountryCode
        )
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Attribute hints about one form control. Built once, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    pub id: String,
    pub placeholder: String,
    pub label: String,
    pub autocomplete: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub max_length: Option<u32>,
}

impl FieldDescriptor {
    /// Normalized concatenation of every string attribute except `type`.
    pub fn combined_text(&self) -> String {
        let joined = [
            self.name.as_str(),
            self.id.as_str(),
            self.placeholder.as_str(),
            self.label.as_str(),
            self.autocomplete.as_str(),
        ]
        .join(" ");
        normalize_text(&joined)
    }

    pub fn input_type(&self) -> String {
        let t = self.input_type.trim().to_lowercase();
        if t.is_empty() {
            "text".to_string()
        } else {
            t
        }
    }

    pub fn placeholder_text(&self) -> String {
        normalize_text(&self.placeholder)
    }

    pub fn autocomplete_hint(&self) -> String {
        self.autocomplete.trim().to_lowercase()
    }

    pub fn is_select(&self) -> bool {
        self.input_type().starts_with("select")
    }
}

/// Lowercase, turn `_ - : *` into spaces, collapse whitespace.
pub fn normalize_text(text: &str) -> String {
    let replaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '_' | '-' | ':' | '*' => ' ',
            other => other,
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_text_normalizes_separators() {
        let d = FieldDescriptor {
            name: "first_name".into(),
            id: "applicant-First".into(),
            label: "First Name*:".into(),
            ..Default::default()
        };
        assert_eq!(d.combined_text(), "first name applicant first first name");
    }

    #[test]
    fn empty_type_reads_as_text() {
        assert_eq!(FieldDescriptor::default().input_type(), "text");
    }

    #[test]
    fn keys_round_trip() {
        for c in Category::ALL {
            assert_eq!(Category::from_key(c.key()), Some(*c));
        }
        assert_eq!(Category::from_key("nope"), None);
    }

    #[test]
    fn descriptor_deserializes_dom_style_keys() {
        let d: FieldDescriptor =
            serde_json::from_str(r#"{"label":"Country Code","type":"tel","maxLength":4}"#).unwrap();
        assert_eq!(d.input_type, "tel");
        assert_eq!(d.max_length, Some(4));
        assert!(d.name.is_empty());
    }
}
