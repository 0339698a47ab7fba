use crate::common::{current_millis, ID_ALPHABET, ID_SUFFIX_LEN};
use rand::Rng;

/// Generates record identifiers of the form `<millis>-<suffix>`.
///
/// The suffix is drawn from a 36-symbol alphabet. Identifiers are unique with
/// high probability only; no collision check is made against stored records.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdGenerator;

impl IdGenerator {
    pub fn new() -> Self {
        IdGenerator
    }

    pub fn next_id(&self) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect();
        format!("{}-{}", current_millis(), suffix)
    }
}
