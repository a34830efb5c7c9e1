pub mod dictionary;
pub mod punctuate;
pub mod selector;

pub use dictionary::Dictionary;
pub use selector::WordSelector;
