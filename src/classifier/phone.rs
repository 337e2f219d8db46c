use crate::category::Category;

use super::rules::includes_any;
use super::FieldContext;

const PHONE_WORDS: &[&str] = &["phone", "mobile", "cell", "tel", "contact"];
const COUNTRY_CODE_WORDS: &[&str] = &["country", "code", "dial"];
const COMBINED_WORDS: &[&str] = &["with country", "including country", "international"];
const ALTERNATE_WORDS: &[&str] = &[
    "alternate",
    "alternative",
    "alt",
    "secondary",
    "second",
    "other",
];

/// Shape of value a phone control expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneShape {
    CountryCode,
    International,
    National,
}

pub fn is_phone_field(ctx: &FieldContext) -> bool {
    ctx.input_type == "tel" || includes_any(&ctx.text, PHONE_WORDS)
}

pub fn is_country_code_field(ctx: &FieldContext) -> bool {
    let short = ctx.max_length.is_some_and(|n| n > 0 && n <= 5);
    includes_any(&ctx.text, COUNTRY_CODE_WORDS) || (ctx.placeholder.contains('+') && short)
}

pub fn is_alternate(ctx: &FieldContext) -> bool {
    includes_any(&ctx.text, ALTERNATE_WORDS)
}

pub fn shape(ctx: &FieldContext) -> PhoneShape {
    if is_country_code_field(ctx) {
        return PhoneShape::CountryCode;
    }
    let combined = ctx.max_length.is_some_and(|n| n >= 12)
        || includes_any(&ctx.text, COMBINED_WORDS)
        || ctx.placeholder.contains('+')
        || ctx.autocomplete == "tel";
    if combined {
        PhoneShape::International
    } else {
        PhoneShape::National
    }
}

/// Resolve a control already known to be phone-like into one of the six
/// phone categories.
pub fn resolve(ctx: &FieldContext) -> Category {
    let alternate = is_alternate(ctx);
    match (shape(ctx), alternate) {
        (PhoneShape::CountryCode, false) => Category::CountryCode,
        (PhoneShape::CountryCode, true) => Category::AltCountryCode,
        (PhoneShape::International, false) => Category::PhoneInternational,
        (PhoneShape::International, true) => Category::AltPhoneInternational,
        (PhoneShape::National, false) => Category::PhoneNational,
        (PhoneShape::National, true) => Category::AltPhoneNational,
    }
}
