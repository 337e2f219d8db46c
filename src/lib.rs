pub mod category;
pub mod classifier;
pub mod error;
pub mod fill;
pub mod normalize;
pub mod parser;
pub mod profile;
pub mod settings;
pub mod store;

pub use category::{Category, FieldDescriptor};
pub use classifier::{classify, classify_all};
pub use parser::{parse, ParsedField};
pub use profile::Profile;
