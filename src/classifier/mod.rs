//! First-match-wins classification of form controls.
//!
//! Order: the `type="email"` gate, then the phone gate (which hands off to
//! [`phone::resolve`]), then [`rules::RULES`] top to bottom. No scoring.

pub mod phone;
pub mod rules;

use rayon::prelude::*;
use tracing::trace;

use crate::category::{Category, FieldDescriptor};

/// The descriptor attributes the rules read, normalized once per call.
#[derive(Debug, Clone)]
pub struct FieldContext {
    pub text: String,
    pub input_type: String,
    pub placeholder: String,
    pub autocomplete: String,
    pub max_length: Option<u32>,
    pub is_select: bool,
}

impl FieldContext {
    pub fn new(descriptor: &FieldDescriptor) -> FieldContext {
        FieldContext {
            text: descriptor.combined_text(),
            input_type: descriptor.input_type(),
            placeholder: descriptor.placeholder_text(),
            autocomplete: descriptor.autocomplete_hint(),
            max_length: descriptor.max_length,
            is_select: descriptor.is_select(),
        }
    }
}

/// `None` is the unmatched outcome: leave the field alone.
pub fn classify(descriptor: &FieldDescriptor) -> Option<Category> {
    let ctx = FieldContext::new(descriptor);

    if rules::EMAIL_TYPE_GATE.matches(&ctx) {
        trace!(rule = rules::EMAIL_TYPE_GATE.name, text = %ctx.text, "matched");
        return Some(Category::Email);
    }

    if ctx.input_type != "email" && phone::is_phone_field(&ctx) {
        let category = phone::resolve(&ctx);
        trace!(rule = "phone", %category, text = %ctx.text, "matched");
        return Some(category);
    }

    let hit = rules::RULES.iter().find(|r| r.matches(&ctx));
    match hit {
        Some(rule) => trace!(rule = rule.name, category = %rule.category, text = %ctx.text, "matched"),
        None => trace!(text = %ctx.text, "unmatched"),
    }
    hit.map(|r| r.category)
}

/// Classify many descriptors at once; output order follows input order.
pub fn classify_all(descriptors: &[FieldDescriptor]) -> Vec<Option<Category>> {
    descriptors.par_iter().map(classify).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(label: &str) -> FieldDescriptor {
        FieldDescriptor {
            label: label.into(),
            ..Default::default()
        }
    }

    fn typed(label: &str, input_type: &str) -> FieldDescriptor {
        FieldDescriptor {
            label: label.into(),
            input_type: input_type.into(),
            ..Default::default()
        }
    }

    #[test]
    fn first_name_from_name_and_label() {
        let d = FieldDescriptor {
            name: "fname".into(),
            label: "First Name".into(),
            input_type: "text".into(),
            ..Default::default()
        };
        assert_eq!(classify(&d), Some(Category::FirstName));
    }

    #[test]
    fn country_code_from_short_tel() {
        let d = FieldDescriptor {
            label: "Country Code".into(),
            input_type: "tel".into(),
            max_length: Some(4),
            ..Default::default()
        };
        assert_eq!(classify(&d), Some(Category::CountryCode));
    }

    #[test]
    fn company_website_is_not_portfolio() {
        assert_ne!(classify(&labeled("Company Website")), Some(Category::PortfolioUrl));
        assert_eq!(classify(&labeled("Personal Website")), Some(Category::PortfolioUrl));
    }

    #[test]
    fn email_type_wins_over_other_words() {
        for label in ["Contact", "First contact", "Work", "Your name", "Alternate phone"] {
            assert_eq!(classify(&typed(label, "email")), Some(Category::Email), "{label}");
        }
    }

    #[test]
    fn email_type_never_matches_login_fields() {
        for label in ["Username", "Login", "User ID", "user_name"] {
            assert_ne!(classify(&typed(label, "email")), Some(Category::Email), "{label}");
        }
    }

    #[test]
    fn email_by_keyword_or_autocomplete() {
        assert_eq!(classify(&labeled("E-mail")), Some(Category::Email));
        let d = FieldDescriptor {
            name: "contact_addr".into(),
            autocomplete: "email".into(),
            input_type: "text".into(),
            ..Default::default()
        };
        // "contact" is a phone word, so the phone gate claims it first.
        assert_eq!(classify(&d), Some(Category::PhoneNational));
        let d = FieldDescriptor {
            name: "addr1".into(),
            autocomplete: "email".into(),
            ..Default::default()
        };
        assert_eq!(classify(&d), Some(Category::Email));
    }

    #[test]
    fn phone_gate_runs_before_name_rules() {
        assert_eq!(classify(&labeled("Mobile Number")), Some(Category::PhoneNational));
        assert_eq!(classify(&labeled("Phone (with country code)")), Some(Category::CountryCode));
        assert_eq!(classify(&labeled("International phone")), Some(Category::PhoneInternational));
        assert_eq!(classify(&labeled("Secondary Phone")), Some(Category::AltPhoneNational));
    }

    #[test]
    fn name_family() {
        assert_eq!(classify(&labeled("Middle Name")), Some(Category::MiddleName));
        assert_eq!(classify(&labeled("Surname")), Some(Category::LastName));
        assert_eq!(classify(&labeled("Family name")), Some(Category::LastName));
        assert_eq!(classify(&labeled("Full Name")), Some(Category::FullName));
        assert_eq!(classify(&labeled("Applicant Name")), Some(Category::FullName));
        assert_eq!(classify(&labeled("Name")), Some(Category::FullName));
        assert_eq!(classify(&labeled("Company Name")), Some(Category::Organization));
        assert_eq!(classify(&labeled("File name")), None);
        assert_eq!(classify(&labeled("Server name")), None);
    }

    #[test]
    fn birth_and_age() {
        assert_eq!(classify(&labeled("Date of Birth")), Some(Category::DateOfBirth));
        assert_eq!(classify(&labeled("DOB")), Some(Category::DateOfBirth));
        assert_eq!(classify(&labeled("Age")), Some(Category::Age));
        assert_eq!(classify(&labeled("Average score")), None);
        assert_eq!(classify(&labeled("Stage")), None);
    }

    #[test]
    fn nationality_before_country() {
        assert_eq!(classify(&labeled("Nationality")), Some(Category::Nationality));
        assert_eq!(classify(&labeled("Country of citizenship")), Some(Category::Nationality));
        assert_eq!(classify(&labeled("Country")), Some(Category::Country));
    }

    #[test]
    fn structured_address_most_specific_first() {
        assert_eq!(classify(&labeled("House / Flat No.")), Some(Category::HouseNo));
        assert_eq!(classify(&labeled("Building / Street")), Some(Category::Building));
        assert_eq!(classify(&labeled("Area / Locality")), Some(Category::Area));
        assert_eq!(classify(&labeled("Nearby Landmark")), Some(Category::Landmark));
        assert_eq!(classify(&labeled("Residential Address")), Some(Category::Address));
        assert_eq!(classify(&labeled("City")), Some(Category::City));
        assert_eq!(classify(&labeled("Present location")), Some(Category::CurrentLocation));
        assert_eq!(classify(&labeled("Preferred location")), Some(Category::Location));
        assert_eq!(classify(&labeled("State / Province")), Some(Category::State));
        assert_eq!(classify(&labeled("ZIP")), Some(Category::Pincode));
        assert_eq!(classify(&labeled("PIN code")), Some(Category::Pincode));
    }

    #[test]
    fn organization_family() {
        assert_eq!(classify(&labeled("College")), Some(Category::Organization));
        assert_eq!(classify(&labeled("Employer")), Some(Category::Organization));
        assert_eq!(classify(&labeled("Job Title")), Some(Category::JobTitle));
        assert_eq!(classify(&labeled("Designation")), Some(Category::JobTitle));
    }

    #[test]
    fn years_and_qualification() {
        assert_eq!(classify(&labeled("Year of Passing")), Some(Category::PassingYear));
        assert_eq!(classify(&labeled("Graduation Year")), Some(Category::PassingYear));
        assert_eq!(classify(&labeled("Starting Year")), Some(Category::StartingYear));
        assert_eq!(classify(&labeled("Highest Qualification")), Some(Category::Qualification));
        assert_eq!(classify(&labeled("Degree")), Some(Category::Qualification));
        assert_eq!(classify(&labeled("Year")), None);
        assert_eq!(classify(&labeled("Years of experience")), None);
    }

    #[test]
    fn social_urls() {
        assert_eq!(classify(&labeled("LinkedIn Profile")), Some(Category::LinkedinUrl));
        assert_eq!(classify(&labeled("GitHub")), Some(Category::GithubUrl));
        assert_eq!(classify(&labeled("Portfolio")), Some(Category::PortfolioUrl));
    }

    #[test]
    fn gender_needs_a_select() {
        assert_eq!(classify(&labeled("Gender")), None);
        assert_eq!(classify(&typed("Gender", "select-one")), Some(Category::Gender));
    }

    #[test]
    fn unmatched_is_not_an_error() {
        assert_eq!(classify(&FieldDescriptor::default()), None);
        assert_eq!(classify(&labeled("Favourite colour")), None);
    }

    #[test]
    fn batch_keeps_input_order() {
        let ds = vec![labeled("City"), labeled("xyz"), labeled("Email")];
        assert_eq!(
            classify_all(&ds),
            vec![Some(Category::City), None, Some(Category::Email)]
        );
    }
}
