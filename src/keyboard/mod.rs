pub mod finger;

pub use finger::{Finger, Hand, KeyAssignment, Row};
