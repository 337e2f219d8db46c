use serde::{Deserialize, Serialize};

const DEMONYMS: &[(&str, &str)] = &[
    ("india", "Indian"),
    ("america", "American"),
    ("united states", "American"),
    ("usa", "American"),
    ("us", "American"),
    ("britain", "British"),
    ("uk", "British"),
    ("united kingdom", "British"),
    ("england", "English"),
    ("france", "French"),
    ("spain", "Spanish"),
    ("germany", "German"),
    ("italy", "Italian"),
    ("china", "Chinese"),
    ("japan", "Japanese"),
    ("korea", "Korean"),
    ("south korea", "Korean"),
    ("north korea", "Korean"),
    ("russia", "Russian"),
    ("canada", "Canadian"),
    ("australia", "Australian"),
    ("brazil", "Brazilian"),
    ("mexico", "Mexican"),
    ("argentina", "Argentinian"),
    ("egypt", "Egyptian"),
    ("greece", "Greek"),
    ("turkey", "Turkish"),
    ("iran", "Iranian"),
    ("iraq", "Iraqi"),
    ("israel", "Israeli"),
    ("saudi arabia", "Saudi"),
    ("uae", "Emirati"),
    ("united arab emirates", "Emirati"),
    ("pakistan", "Pakistani"),
    ("bangladesh", "Bangladeshi"),
    ("sri lanka", "Sri Lankan"),
    ("nepal", "Nepali"),
    ("thailand", "Thai"),
    ("vietnam", "Vietnamese"),
    ("philippines", "Filipino"),
    ("indonesia", "Indonesian"),
    ("malaysia", "Malaysian"),
    ("singapore", "Singaporean"),
    ("netherlands", "Dutch"),
    ("holland", "Dutch"),
    ("belgium", "Belgian"),
    ("switzerland", "Swiss"),
    ("sweden", "Swedish"),
    ("norway", "Norwegian"),
    ("denmark", "Danish"),
    ("finland", "Finnish"),
    ("poland", "Polish"),
    ("portugal", "Portuguese"),
    ("ireland", "Irish"),
    ("scotland", "Scottish"),
    ("wales", "Welsh"),
    ("new zealand", "New Zealander"),
    ("south africa", "South African"),
    ("nigeria", "Nigerian"),
    ("kenya", "Kenyan"),
    ("ethiopia", "Ethiopian"),
    ("ghana", "Ghanaian"),
];

const DEMONYM_SUFFIXES: &[&str] = &["an", "ian", "ese", "ish", "i"];

/// Country name to demonym. Best effort: curated table first, then suffix
/// rules, which are wrong for plenty of countries outside the table.
pub fn convert_to_nationality(country: &str) -> String {
    let trimmed = country.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let lower = trimmed.to_lowercase();

    if let Some((_, demonym)) = DEMONYMS.iter().find(|(name, _)| *name == lower) {
        return demonym.to_string();
    }

    let capitalized = capitalize_first(trimmed);
    if DEMONYM_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return capitalized;
    }
    match capitalized.strip_suffix(['a', 'A']) {
        Some(stem) => format!("{stem}an"),
        None => format!("{capitalized}an"),
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strip spaces, hyphens and parentheses.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect()
}

/// Normalized country code, always with a leading `+` when non-empty.
pub fn normalize_country_code(raw: &str) -> String {
    let digits = normalize_phone(raw);
    if digits.is_empty() || digits.starts_with('+') {
        digits
    } else {
        format!("+{digits}")
    }
}

/// One `<option>` of a selection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    #[serde(default)]
    pub text: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> SelectOption {
        SelectOption {
            value: value.into(),
            text: text.into(),
        }
    }
}

/// Exact (case-insensitive) match on option values, else substring match on
/// option text. Returns the chosen option's value.
pub fn match_gender_option(options: &[SelectOption], saved: &str) -> Option<String> {
    let saved = saved.trim().to_lowercase();
    if saved.is_empty() {
        return None;
    }
    options
        .iter()
        .find(|o| o.value.to_lowercase() == saved)
        .or_else(|| options.iter().find(|o| o.text.to_lowercase().contains(&saved)))
        .map(|o| o.value.clone())
}

/// `FIRST name*:` -> `First Name`.
pub fn display_label(label: &str) -> String {
    label
        .replace(['*', ':'], "")
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            capitalize_first(&lower)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
