use crate::category::Category;

use super::FieldContext;

/// A positive hint that fires independently of the keyword sets.
#[derive(Debug, Clone, Copy)]
pub enum Signal {
    /// `type` equals the value.
    InputType(&'static str),
    /// `autocomplete` contains the value.
    Autocomplete(&'static str),
    /// `type` equals the first value and the text contains the second.
    TypedText(&'static str, &'static str),
}

impl Signal {
    fn fires(&self, ctx: &FieldContext) -> bool {
        match *self {
            Signal::InputType(t) => ctx.input_type == t,
            Signal::Autocomplete(a) => ctx.autocomplete.contains(a),
            Signal::TypedText(t, kw) => ctx.input_type == t && ctx.text.contains(kw),
        }
    }
}

/// One row of the classification table.
///
/// Matches when (`any` hits and, if `also` is non-empty, `also` hits) or one
/// of `signals` fires; and nothing in `none` hits; and, for `select_only`
/// rules, the control is a selection list.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub category: Category,
    pub any: &'static [&'static str],
    pub also: &'static [&'static str],
    pub none: &'static [&'static str],
    pub signals: &'static [Signal],
    pub select_only: bool,
}

impl Rule {
    const fn new(name: &'static str, category: Category) -> Rule {
        Rule {
            name,
            category,
            any: &[],
            also: &[],
            none: &[],
            signals: &[],
            select_only: false,
        }
    }

    const fn any(mut self, keywords: &'static [&'static str]) -> Rule {
        self.any = keywords;
        self
    }

    const fn also(mut self, keywords: &'static [&'static str]) -> Rule {
        self.also = keywords;
        self
    }

    const fn none(mut self, keywords: &'static [&'static str]) -> Rule {
        self.none = keywords;
        self
    }

    const fn signals(mut self, signals: &'static [Signal]) -> Rule {
        self.signals = signals;
        self
    }

    const fn select_only(mut self) -> Rule {
        self.select_only = true;
        self
    }

    pub fn matches(&self, ctx: &FieldContext) -> bool {
        let keyword_hit = !self.any.is_empty()
            && includes_any(&ctx.text, self.any)
            && (self.also.is_empty() || includes_any(&ctx.text, self.also));
        let positive = keyword_hit || self.signals.iter().any(|s| s.fires(ctx));

        positive
            && !includes_any(&ctx.text, self.none)
            && (!self.select_only || ctx.is_select)
    }
}

pub fn includes_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

const LOGIN_WORDS: &[&str] = &["username", "user name", "login", "user id"];

/// `type="email"` wins over any wording, except login-style fields.
pub const EMAIL_TYPE_GATE: Rule = Rule::new("email-type", Category::Email)
    .signals(&[Signal::InputType("email")])
    .none(LOGIN_WORDS);

/// Rules evaluated after the phone gate. Order is priority.
pub static RULES: &[Rule] = &[
    Rule::new("first-name", Category::FirstName)
        .any(&["first", "fname", "firstname", "given", "forename"])
        .none(&["last", "sur"]),
    Rule::new("middle-name", Category::MiddleName).any(&["middle", "mname", "middlename"]),
    Rule::new("last-name", Category::LastName)
        .any(&["last", "lname", "lastname", "surname", "family"]),
    Rule::new("full-name", Category::FullName)
        .any(&[
            "full name",
            "fullname",
            "complete name",
            "your name",
            "applicant name",
            "candidate name",
            "student name",
            "person name",
        ])
        .none(&["first", "last", "middle", "user", "company"]),
    Rule::new("bare-name", Category::FullName).any(&["name"]).none(&[
        "first",
        "last",
        "middle",
        "user",
        "company",
        "organization",
        "file",
        "domain",
        "host",
        "server",
        "database",
    ]),
    Rule::new("date-of-birth", Category::DateOfBirth)
        .any(&["dob", "birth", "birthdate", "dateofbirth", "date of birth"])
        .signals(&[Signal::TypedText("date", "birth")]),
    Rule::new("age", Category::Age)
        .any(&["age"])
        .none(&["page", "stage", "average"]),
    Rule::new("nationality", Category::Nationality).any(&[
        "nationality",
        "citizen",
        "citizenship",
        "country of citizenship",
    ]),
    Rule::new("email", Category::Email)
        .any(&["email", "e mail", "mail address", "email address", "e mail address"])
        .signals(&[Signal::InputType("email"), Signal::Autocomplete("email")])
        .none(LOGIN_WORDS),
    Rule::new("house-no", Category::HouseNo)
        .any(&["house", "flat", "apartment", "apt", "unit", "door", "plot"])
        .also(&["no", "number", "#"]),
    Rule::new("building", Category::Building)
        .any(&["building", "street", "block"])
        .none(&["city", "state", "pin"]),
    Rule::new("area", Category::Area).any(&[
        "area",
        "locality",
        "sector",
        "colony",
        "neighborhood",
        "neighbourhood",
    ]),
    Rule::new("landmark", Category::Landmark).any(&["landmark", "near", "nearby"]),
    Rule::new("address", Category::Address)
        .any(&["address", "addr", "residence"])
        .none(&["email", "mail", "city", "state", "zip", "postal", "pin"]),
    Rule::new("city", Category::City)
        .any(&["city", "town", "municipality"])
        .signals(&[Signal::Autocomplete("city")]),
    Rule::new("current-location", Category::CurrentLocation)
        .any(&[
            "current location",
            "present location",
            "current address",
            "present address",
        ])
        .none(&["permanent", "home", "postal"]),
    Rule::new("location", Category::Location)
        .any(&["location", "current city"])
        .none(&["permanent", "home", "full address", "complete address"]),
    Rule::new("state", Category::State)
        .any(&["state", "province", "region"])
        .signals(&[Signal::Autocomplete("state"), Signal::Autocomplete("province")]),
    Rule::new("country", Category::Country)
        .any(&["country"])
        .signals(&[Signal::Autocomplete("country")])
        .none(&["code", "dial", "nationality", "citizen"]),
    Rule::new("pincode", Category::Pincode)
        .any(&["zip", "postal", "pincode", "pin code", "postcode", "zipcode", "pin"])
        .signals(&[Signal::Autocomplete("postal")]),
    Rule::new("job-title", Category::JobTitle)
        .any(&["job", "title", "designation", "position", "role", "occupation"])
        .none(&["college", "university", "school"]),
    Rule::new("institution", Category::Organization)
        .any(&[
            "college",
            "university",
            "institute",
            "institution",
            "school name",
            "educational institution",
            "alma mater",
        ])
        .none(&["high school", "secondary school"]),
    Rule::new("employer", Category::Organization)
        .any(&["organization", "organisation", "company", "employer", "firm", "workplace"])
        .none(&["college", "university", "school"]),
    Rule::new("passing-year", Category::PassingYear).any(&[
        "passing year",
        "graduation year",
        "year of passing",
        "year of graduation",
        "completion year",
        "passout year",
        "pass out year",
        "graduated year",
        "graduating year",
    ]),
    Rule::new("graduation-context-year", Category::PassingYear)
        .any(&["year"])
        .also(&["passing", "graduation", "graduated", "completion", "passout", "pass out"])
        .none(&["birth", "dob", "experience"]),
    Rule::new("starting-year", Category::StartingYear).any(&[
        "starting year",
        "start year",
        "year of joining",
        "joining year",
        "admission year",
        "year of admission",
        "commencement year",
    ]),
    Rule::new("qualification", Category::Qualification)
        .any(&[
            "qualification",
            "educational qualification",
            "education qualification",
            "degree",
            "education level",
            "highest qualification",
            "academic qualification",
            "education",
            "course",
        ])
        .none(&["year", "college", "university", "school name"]),
    Rule::new("linkedin", Category::LinkedinUrl)
        .any(&["linkedin", "linked in", "linkedin profile", "linkedin url"])
        .signals(&[Signal::TypedText("url", "linkedin")]),
    Rule::new("portfolio", Category::PortfolioUrl)
        .any(&["portfolio", "website", "personal site", "web site"])
        .none(&["company", "organization"]),
    Rule::new("github", Category::GithubUrl)
        .any(&["github", "git hub", "github profile", "github url"]),
    Rule::new("gender", Category::Gender)
        .any(&["gender", "sex"])
        .select_only(),
];
