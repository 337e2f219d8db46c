use crate::category::Category;

/// Map a pasted-text label to a category by substring tables.
///
/// Pasted text carries no DOM attributes, so this is a lighter table than
/// the classifier's: label wording only, checked in order.
pub fn detect_field_type(label: &str) -> Option<Category> {
    let l = label.trim().to_lowercase();
    let has = |kw: &str| l.contains(kw);

    let category = if has("first") && has("name") {
        Category::FirstName
    } else if has("last") && has("name") {
        Category::LastName
    } else if has("middle") && has("name") {
        Category::MiddleName
    } else if (has("full") && has("name")) || l == "name" {
        Category::FullName
    } else if includes_any(&l, &["email", "e-mail"]) {
        Category::Email
    } else if includes_any(&l, &["country code", "dial code"]) {
        Category::CountryCode
    } else if includes_any(&l, &["phone", "mobile", "cell"]) {
        if includes_any(&l, &["alternate", "secondary"]) {
            Category::AltPhoneNational
        } else {
            Category::PhoneNational
        }
    } else if includes_any(&l, &["house no", "flat no", "house number"]) {
        Category::HouseNo
    } else if has("landmark") {
        Category::Landmark
    } else if includes_any(&l, &["address", "street"]) {
        Category::Address
    } else if has("city") {
        Category::City
    } else if includes_any(&l, &["state", "province"]) {
        Category::State
    } else if includes_any(&l, &["zip", "postal", "pincode", "pin code"]) {
        Category::Pincode
    } else if has("country") {
        Category::Country
    } else if includes_any(&l, &["birth", "dob"]) {
        Category::DateOfBirth
    } else if l == "age" {
        Category::Age
    } else if includes_any(&l, &["gender", "sex"]) {
        Category::Gender
    } else if has("nationality") {
        Category::Nationality
    } else if includes_any(&l, &["passing year", "graduation year", "year of passing"]) {
        Category::PassingYear
    } else if includes_any(&l, &["starting year", "start year", "year of joining"]) {
        Category::StartingYear
    } else if includes_any(&l, &["organization", "organisation", "company", "college", "university"]) {
        Category::Organization
    } else if includes_any(&l, &["qualification", "degree"]) {
        Category::Qualification
    } else if includes_any(&l, &["designation", "job title"]) {
        Category::JobTitle
    } else if has("linkedin") {
        Category::LinkedinUrl
    } else if has("github") {
        Category::GithubUrl
    } else if includes_any(&l, &["portfolio", "website"]) {
        Category::PortfolioUrl
    } else {
        return None;
    };
    Some(category)
}

/// Label wording seen on forms beyond the category names themselves.
const COMMON_LABELS: &[&str] = &[
    "name",
    "e-mail",
    "email address",
    "email id",
    "mobile",
    "mobile number",
    "mobile no",
    "phone number",
    "phone no",
    "contact number",
    "dob",
    "sex",
    "address",
    "street",
    "pin code",
    "zip",
    "zip code",
    "postal code",
    "college",
    "university",
    "company",
    "organisation",
    "designation",
    "degree",
    "graduation year",
    "year of passing",
    "website",
    "github",
    "linkedin profile",
];

/// Whole-line label check. Unlike [`detect_field_type`] it never matches
/// inside a longer word, so values like "Dobbs" or "Marcella" stay values.
pub fn is_known_label(line: &str) -> bool {
    let l = line.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    if l.is_empty() {
        return false;
    }
    COMMON_LABELS.contains(&l.as_str())
        || Category::ALL.iter().any(|c| c.label().to_lowercase() == l)
}

fn includes_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}
