//! What to put into a form. Decides values only; applying them to a live
//! page belongs to whoever drives the form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::{normalize_text, Category, FieldDescriptor};
use crate::classifier::{self, phone, FieldContext};
use crate::normalize::{match_gender_option, normalize_phone, SelectOption};
use crate::parser::ParsedField;
use crate::profile::Profile;

const EXCLUDED_TYPES: &[&str] = &[
    "password", "hidden", "submit", "button", "reset", "file", "image", "checkbox", "radio",
];
const ONE_TIME_CODE_WORDS: &[&str] = &["otp", "verification", "verify", "captcha"];

/// Phone controls further apart than this are not treated as one number.
const PHONE_PAIR_DISTANCE: usize = 3;

/// A live form control as the page reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormControl {
    #[serde(flatten)]
    pub descriptor: FieldDescriptor,
    pub value: String,
    pub disabled: bool,
    pub read_only: bool,
    pub options: Vec<SelectOption>,
}

impl FormControl {
    pub fn new(descriptor: FieldDescriptor) -> FormControl {
        FormControl {
            descriptor,
            ..Default::default()
        }
    }

    /// Passwords, buttons, checkboxes and one-time-code boxes are never filled.
    pub fn is_excluded(&self) -> bool {
        let d = &self.descriptor;
        if EXCLUDED_TYPES.contains(&d.input_type().as_str()) {
            return true;
        }
        let text = normalize_text(&format!("{} {} {}", d.name, d.id, d.placeholder));
        let lone_pin = text.split(' ').any(|t| t == "pin") && !text.contains("code");
        ONE_TIME_CODE_WORDS.iter().any(|w| text.contains(w)) || lone_pin
    }

    /// Only empty, enabled, writable controls get a value.
    pub fn accepts_value(&self) -> bool {
        self.value.trim().is_empty() && !self.disabled && !self.read_only
    }
}

/// Decision for one control, in the same position as the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Outcome {
    Fill { category: Category, value: String },
    Excluded,
    Occupied,
    Unmatched,
    Missing { category: Category },
}

impl Outcome {
    pub fn value(&self) -> Option<&str> {
        match self {
            Outcome::Fill { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Decide a value for every control of a form.
///
/// Split phone numbers (a country-code box followed closely by a number box)
/// are settled first and only as a pair; everything else goes through the
/// classifier one control at a time.
pub fn plan_form(controls: &[FormControl], profile: &Profile, today: NaiveDate) -> Vec<Outcome> {
    let mut outcomes: Vec<Option<Outcome>> = vec![None; controls.len()];

    for (cc_pos, national_pos) in phone_pairs(controls) {
        let alternate = phone::is_alternate(&FieldContext::new(&controls[cc_pos].descriptor));
        let (code_cat, national_cat) = if alternate {
            (Category::AltCountryCode, Category::AltPhoneNational)
        } else {
            (Category::CountryCode, Category::PhoneNational)
        };
        let code = profile.value_for(code_cat, today);
        let national = profile.value_for(national_cat, today);
        if let (Some(code), Some(national)) = (code, national) {
            debug!(cc_pos, national_pos, "filling split phone number");
            outcomes[cc_pos] = Some(Outcome::Fill {
                category: code_cat,
                value: code,
            });
            outcomes[national_pos] = Some(Outcome::Fill {
                category: national_cat,
                value: national,
            });
        }
    }

    controls
        .iter()
        .zip(outcomes)
        .map(|(control, decided)| decided.unwrap_or_else(|| plan_control(control, profile, today)))
        .collect()
}

/// Decide a value for a single control.
pub fn plan_control(control: &FormControl, profile: &Profile, today: NaiveDate) -> Outcome {
    if control.is_excluded() {
        return Outcome::Excluded;
    }
    if !control.accepts_value() {
        return Outcome::Occupied;
    }
    let Some(category) = classifier::classify(&control.descriptor) else {
        return Outcome::Unmatched;
    };
    let value = profile.value_for(category, today).and_then(|v| match category {
        Category::Gender => match_gender_option(&control.options, &v),
        c if c.is_phone() => Some(normalize_phone(&v)),
        _ => Some(v),
    });
    match value {
        Some(value) => Outcome::Fill { category, value },
        None => Outcome::Missing { category },
    }
}

/// `(country code position, national number position)` pairs among fillable
/// phone controls.
fn phone_pairs(controls: &[FormControl]) -> Vec<(usize, usize)> {
    let phones: Vec<(usize, FieldContext)> = controls
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_excluded() && c.accepts_value())
        .map(|(i, c)| (i, FieldContext::new(&c.descriptor)))
        .filter(|(_, ctx)| ctx.input_type != "email" && phone::is_phone_field(ctx))
        .collect();

    let mut pairs = Vec::new();
    for (k, (i, ctx)) in phones.iter().enumerate() {
        if !phone::is_country_code_field(ctx) {
            continue;
        }
        let partner = phones[k + 1..]
            .iter()
            .take_while(|(j, _)| j - i <= PHONE_PAIR_DISTANCE)
            .find(|(_, other)| !phone::is_country_code_field(other));
        if let Some((j, _)) = partner {
            pairs.push((*i, *j));
        }
    }
    pairs
}

/// One value waiting to be handed out by a sequential fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    pub category: Option<Category>,
    pub label: String,
    pub value: String,
}

const PROFILE_QUEUE_ORDER: &[Category] = &[
    Category::FirstName,
    Category::MiddleName,
    Category::LastName,
    Category::Email,
    Category::PhoneInternational,
    Category::DateOfBirth,
    Category::Age,
    Category::Gender,
    Category::Nationality,
    Category::HouseNo,
    Category::Building,
    Category::Area,
    Category::Landmark,
    Category::City,
    Category::State,
    Category::Pincode,
    Category::Qualification,
    Category::Organization,
    Category::StartingYear,
    Category::PassingYear,
    Category::LinkedinUrl,
    Category::PortfolioUrl,
    Category::GithubUrl,
];

/// The profile as an ordered queue, skipping empty values. A phone number
/// saved without a country code gets `default_country_code`.
pub fn profile_queue(profile: &Profile, default_country_code: &str, today: NaiveDate) -> Vec<QueueItem> {
    let mut profile = profile.clone();
    if profile.country_code.trim().is_empty() {
        profile.set("countryCode", default_country_code);
    }
    PROFILE_QUEUE_ORDER
        .iter()
        .filter_map(|&category| {
            let value = profile.value_for(category, today)?;
            let label = match category {
                Category::PhoneInternational => "Phone",
                c => c.label(),
            };
            Some(QueueItem {
                category: Some(category),
                label: label.to_string(),
                value,
            })
        })
        .collect()
}

/// Parsed pasted text as a queue, in parse order.
pub fn parsed_queue(fields: &[ParsedField]) -> Vec<QueueItem> {
    fields
        .iter()
        .map(|f| QueueItem {
            category: f.category(),
            label: f.label.clone(),
            value: f.value.clone(),
        })
        .collect()
}

/// Result of asking the cursor for the next value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    Fill(&'a QueueItem),
    /// Every item was handed out; the cursor is back at the start.
    Finished,
    Empty,
}

/// Position in a fill queue. Owned by the caller; nothing here keeps it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillCursor {
    pub index: usize,
}

impl FillCursor {
    pub fn at(index: usize) -> FillCursor {
        FillCursor { index }
    }

    pub fn next<'a>(&mut self, queue: &'a [QueueItem]) -> Step<'a> {
        if queue.is_empty() {
            return Step::Empty;
        }
        match queue.get(self.index) {
            Some(item) => {
                self.index += 1;
                Step::Fill(item)
            }
            None => {
                self.index = 0;
                Step::Finished
            }
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn remaining(&self, queue_len: usize) -> usize {
        queue_len.saturating_sub(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn profile() -> Profile {
        let json = std::fs::read_to_string("tests/fixtures/profile.json").unwrap();
        serde_json::from_str::<Profile>(&json).unwrap().normalized()
    }

    fn form() -> Vec<FormControl> {
        let json = std::fs::read_to_string("tests/fixtures/form.json").unwrap();
        serde_json::from_str(&json).unwrap()
    }

    fn control(label: &str) -> FormControl {
        FormControl::new(FieldDescriptor {
            label: label.into(),
            ..Default::default()
        })
    }

    #[test]
    fn excluded_controls() {
        let mut c = control("Password");
        c.descriptor.input_type = "password".into();
        assert!(c.is_excluded());

        let mut c = control("Enter OTP");
        c.descriptor.name = "otp_input".into();
        assert!(c.is_excluded());

        let mut c = control("PIN");
        c.descriptor.name = "pin".into();
        assert!(c.is_excluded());

        let mut c = control("Pincode");
        c.descriptor.name = "pin_code".into();
        assert!(!c.is_excluded());
        assert!(!control("City").is_excluded());
    }

    #[test]
    fn occupied_controls_are_left_alone() {
        let p = profile();
        let mut c = control("City");
        c.value = "Mumbai".into();
        assert_eq!(plan_control(&c, &p, today()), Outcome::Occupied);
        let mut c = control("City");
        c.read_only = true;
        assert_eq!(plan_control(&c, &p, today()), Outcome::Occupied);
    }

    #[test]
    fn missing_profile_value_is_not_an_error() {
        let p = Profile::default();
        assert_eq!(
            plan_control(&control("City"), &p, today()),
            Outcome::Missing {
                category: Category::City
            }
        );
        assert_eq!(plan_control(&control("Hobbies"), &p, today()), Outcome::Unmatched);
    }

    #[test]
    fn gender_goes_through_options() {
        let p = profile();
        let mut c = control("Gender");
        c.descriptor.input_type = "select-one".into();
        c.options = vec![
            SelectOption::new("", "Select"),
            SelectOption::new("1", "Male"),
            SelectOption::new("2", "Female"),
        ];
        assert_eq!(plan_control(&c, &p, today()).value(), Some("2"));
        c.options.truncate(2);
        assert_eq!(
            plan_control(&c, &p, today()),
            Outcome::Missing {
                category: Category::Gender
            }
        );
    }

    #[test]
    fn form_fixture_plan() {
        let outcomes = plan_form(&form(), &profile(), today());
        let values: Vec<Option<&str>> = outcomes.iter().map(Outcome::value).collect();
        assert_eq!(
            values,
            vec![
                Some("Priya"),
                Some("Sharma"),
                Some("priya.sharma@example.com"),
                Some("+91"),
                Some("9876543210"),
                None,
                Some("Kothrud, Pune"),
                Some("411038"),
                Some("Indian"),
                Some("2"),
                None,
                None,
            ]
        );
        assert_eq!(outcomes[5], Outcome::Excluded);
        assert_eq!(outcomes[10], Outcome::Unmatched);
        assert_eq!(outcomes[11], Outcome::Occupied);
    }

    #[test]
    fn split_phone_needs_both_parts() {
        let mut p = profile();
        p.set("phoneNational", "");
        let controls = vec![
            FormControl::new(FieldDescriptor {
                label: "Country code".into(),
                input_type: "tel".into(),
                max_length: Some(4),
                ..Default::default()
            }),
            FormControl::new(FieldDescriptor {
                label: "Mobile".into(),
                input_type: "tel".into(),
                ..Default::default()
            }),
        ];
        let outcomes = plan_form(&controls, &p, today());
        // Not paired, so each control is decided on its own.
        assert_eq!(outcomes[0].value(), Some("+91"));
        assert_eq!(
            outcomes[1],
            Outcome::Missing {
                category: Category::PhoneNational
            }
        );
    }

    #[test]
    fn far_apart_phone_controls_are_not_paired() {
        let mut controls = vec![FormControl::new(FieldDescriptor {
            label: "Dial code".into(),
            input_type: "tel".into(),
            ..Default::default()
        })];
        controls.extend(["A", "B", "C", "D"].map(control));
        controls.push(control("Mobile"));
        assert!(phone_pairs(&controls).is_empty());
        controls.swap(1, 5);
        assert_eq!(phone_pairs(&controls), vec![(0, 1)]);
    }

    #[test]
    fn profile_queue_order_and_default_code() {
        let mut p = profile();
        p.set("countryCode", "");
        let queue = profile_queue(&p, "+44", today());
        let labels: Vec<&str> = queue.iter().map(|q| q.label.as_str()).collect();
        assert_eq!(&labels[..5], &["First Name", "Last Name", "Email", "Phone", "Date of Birth"]);
        assert_eq!(queue[3].value, "+449876543210");
        assert!(queue.iter().all(|q| !q.value.is_empty()));
    }

    #[test]
    fn cursor_walks_then_wraps() {
        let fields = crate::parser::parse("First Name: A\nLast Name: B");
        let queue = parsed_queue(&fields);
        let mut cursor = FillCursor::default();
        assert!(matches!(cursor.next(&queue), Step::Fill(q) if q.value == "A"));
        assert_eq!(cursor.remaining(queue.len()), 1);
        assert!(matches!(cursor.next(&queue), Step::Fill(q) if q.value == "B"));
        assert_eq!(cursor.next(&queue), Step::Finished);
        assert_eq!(cursor.index, 0);
        cursor.next(&queue);
        cursor.reset();
        assert_eq!(cursor.index, 0);
        assert_eq!(FillCursor::default().next(&[]), Step::Empty);
    }
}
