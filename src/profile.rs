use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::normalize::{convert_to_nationality, normalize_country_code, normalize_phone};

pub const DEFAULT_COUNTRY_CODE: &str = "+91";

/// The user's saved data, keyed the way the browser extension stored it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub age: String,
    pub gender: String,
    pub nationality: String,

    pub email: String,
    pub country_code: String,
    pub phone_national: String,
    pub alt_country_code: String,
    pub alt_phone_national: String,

    pub house_no: String,
    pub building: String,
    pub area: String,
    pub landmark: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: String,

    pub job_title: String,
    pub organization: String,
    pub qualification: String,
    pub starting_year: String,
    pub passing_year: String,

    pub linkedin_url: String,
    pub portfolio_url: String,
    pub github_url: String,
}

/// Fields stored as-is, keyed by the category they hold. Expands to the
/// stored key order and both field accessors.
macro_rules! stored_fields {
    ($($category:ident => $field:ident),+ $(,)?) => {
        /// Categories the profile stores directly, in form order. Their
        /// [`Category::key`] is the stored key.
        pub const STORED: &[Category] = &[$(Category::$category),+];

        impl Profile {
            fn slot(&self, category: Category) -> Option<&String> {
                match category {
                    $(Category::$category => Some(&self.$field),)+
                    _ => None,
                }
            }

            fn slot_mut(&mut self, category: Category) -> Option<&mut String> {
                match category {
                    $(Category::$category => Some(&mut self.$field),)+
                    _ => None,
                }
            }
        }
    };
}

stored_fields! {
    FirstName => first_name,
    MiddleName => middle_name,
    LastName => last_name,
    DateOfBirth => date_of_birth,
    Age => age,
    Gender => gender,
    Nationality => nationality,
    Email => email,
    CountryCode => country_code,
    PhoneNational => phone_national,
    AltCountryCode => alt_country_code,
    AltPhoneNational => alt_phone_national,
    HouseNo => house_no,
    Building => building,
    Area => area,
    Landmark => landmark,
    City => city,
    State => state,
    Country => country,
    Pincode => pincode,
    JobTitle => job_title,
    Organization => organization,
    Qualification => qualification,
    StartingYear => starting_year,
    PassingYear => passing_year,
    LinkedinUrl => linkedin_url,
    PortfolioUrl => portfolio_url,
    GithubUrl => github_url,
}

/// Stored keys in form order.
pub fn profile_keys() -> impl Iterator<Item = &'static str> {
    STORED.iter().map(|c| c.key())
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

fn join_present(parts: &[&str], sep: &str) -> Option<String> {
    let present: Vec<&str> = parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    if present.is_empty() {
        None
    } else {
        Some(present.join(sep))
    }
}

impl Profile {
    /// Set one stored key. Phone parts are normalized on the way in.
    /// Returns `false` for an unknown key.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let Some(category) = Category::from_key(key) else {
            return false;
        };
        let value = match category {
            Category::CountryCode | Category::AltCountryCode => normalize_country_code(value),
            Category::PhoneNational | Category::AltPhoneNational => normalize_phone(value),
            _ => value.trim().to_string(),
        };
        match self.slot_mut(category) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.slot(Category::from_key(key)?).map(String::as_str)
    }

    /// Stored `(key, value)` pairs that are not empty, in form order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        profile_keys()
            .filter_map(|key| Some((key, non_empty(self.get(key)?)?)))
            .collect()
    }

    /// Re-apply phone normalization, e.g. after a JSON import.
    pub fn normalized(mut self) -> Profile {
        self.country_code = normalize_country_code(&self.country_code);
        self.alt_country_code = normalize_country_code(&self.alt_country_code);
        self.phone_national = normalize_phone(&self.phone_national);
        self.alt_phone_national = normalize_phone(&self.alt_phone_national);
        self
    }

    pub fn full_name(&self) -> Option<String> {
        join_present(
            &[
                self.first_name.as_str(),
                self.middle_name.as_str(),
                self.last_name.as_str(),
            ],
            " ",
        )
    }

    /// Age as stored, else whole years since the date of birth.
    pub fn age_on(&self, today: NaiveDate) -> Option<String> {
        non_empty(&self.age).or_else(|| {
            let dob = parse_birth_date(&self.date_of_birth)?;
            let mut years = today.year() - dob.year();
            if (today.month(), today.day()) < (dob.month(), dob.day()) {
                years -= 1;
            }
            (years >= 0).then(|| years.to_string())
        })
    }

    fn phone_parts(&self, alternate: bool) -> (&str, &str) {
        if alternate {
            (self.alt_country_code.as_str(), self.alt_phone_national.as_str())
        } else {
            (self.country_code.as_str(), self.phone_national.as_str())
        }
    }

    /// `+<code><number>` with no separator; national number alone when the
    /// code is missing.
    fn international(&self, alternate: bool) -> Option<String> {
        let (code, national) = self.phone_parts(alternate);
        let code = normalize_country_code(code);
        let national = normalize_phone(national);
        match (code.is_empty(), national.is_empty()) {
            (_, true) => None,
            (true, false) => Some(national),
            (false, false) => Some(format!("{code}{national}")),
        }
    }

    /// Value to offer for a category. `None` means there is nothing to fill.
    pub fn value_for(&self, category: Category, today: NaiveDate) -> Option<String> {
        match category {
            Category::FirstName => non_empty(&self.first_name),
            Category::MiddleName => non_empty(&self.middle_name),
            Category::LastName => non_empty(&self.last_name),
            Category::FullName => self.full_name(),
            Category::Email => non_empty(&self.email),
            Category::PhoneNational => non_empty(&normalize_phone(&self.phone_national)),
            Category::AltPhoneNational => non_empty(&normalize_phone(&self.alt_phone_national)),
            Category::PhoneInternational => self.international(false),
            Category::AltPhoneInternational => self.international(true),
            Category::CountryCode => non_empty(&normalize_country_code(&self.country_code)),
            Category::AltCountryCode => non_empty(&normalize_country_code(&self.alt_country_code)),
            Category::DateOfBirth => non_empty(&self.date_of_birth),
            Category::Age => self.age_on(today),
            Category::Gender => non_empty(&self.gender),
            Category::Nationality => non_empty(&convert_to_nationality(&self.nationality)),
            Category::HouseNo => non_empty(&self.house_no),
            Category::Building => non_empty(&self.building),
            Category::Area => non_empty(&self.area),
            Category::Landmark => non_empty(&self.landmark),
            Category::Address => join_present(
                &[
                    self.house_no.as_str(),
                    self.building.as_str(),
                    self.area.as_str(),
                    self.landmark.as_str(),
                ],
                ", ",
            ),
            Category::City => non_empty(&self.city),
            Category::CurrentLocation => self.current_location(),
            Category::Location => match (non_empty(&self.city), non_empty(&self.state)) {
                (Some(city), Some(state)) => Some(format!("{city}, {state}")),
                (city, state) => city.or(state),
            },
            Category::State => non_empty(&self.state),
            Category::Country => non_empty(&self.country),
            Category::Pincode => non_empty(&self.pincode),
            Category::JobTitle => non_empty(&self.job_title),
            Category::Organization => non_empty(&self.organization),
            Category::Qualification => non_empty(&self.qualification),
            Category::StartingYear => non_empty(&self.starting_year),
            Category::PassingYear => non_empty(&self.passing_year),
            Category::LinkedinUrl => non_empty(&self.linkedin_url),
            Category::PortfolioUrl => non_empty(&self.portfolio_url),
            Category::GithubUrl => non_empty(&self.github_url),
        }
    }

    /// Area + city, else city + state, else whichever of city/state/area is set.
    fn current_location(&self) -> Option<String> {
        let (area, city, state) = (self.area.trim(), self.city.trim(), self.state.trim());
        if !area.is_empty() && !city.is_empty() {
            return Some(format!("{area}, {city}"));
        }
        if !city.is_empty() && !state.is_empty() {
            return Some(format!("{city}, {state}"));
        }
        [city, state, area]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Dates as the extension's date input saved them (`YYYY-MM-DD`), plus the
/// common day-first forms people type by hand.
fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}
