//! ALFA PassVault - Password Generator

use std::collections::BTreeSet;

use rand::{rngs::OsRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::error::{VaultError, VaultResult};

/// Longest password `generate` will produce
pub const MAX_PASSWORD_LENGTH: usize = 1024;

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_=+[]{};:,.<>?/~";

/// Glyphs that are easy to misread
const AMBIGUOUS: &[u8] = b"0Oo1lI|";

/// Character class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharClass {
    Lower,
    Upper,
    Digit,
    Symbol,
}

impl CharClass {
    pub const ALL: [CharClass; 4] = [
        CharClass::Lower,
        CharClass::Upper,
        CharClass::Digit,
        CharClass::Symbol,
    ];

    pub fn charset(&self) -> &'static [u8] {
        match self {
            Self::Lower => LOWER,
            Self::Upper => UPPER,
            Self::Digit => DIGITS,
            Self::Symbol => SYMBOLS,
        }
    }

    /// Class a character belongs to; anything outside ASCII alphanumerics
    /// counts as a symbol.
    pub fn of(c: char) -> Self {
        if c.is_ascii_lowercase() {
            Self::Lower
        } else if c.is_ascii_uppercase() {
            Self::Upper
        } else if c.is_ascii_digit() {
            Self::Digit
        } else {
            Self::Symbol
        }
    }
}

/// Generation policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    pub length: usize,
    pub classes: BTreeSet<CharClass>,
    /// Drop look-alike glyphs such as `0`/`O` and `1`/`l`
    #[serde(default)]
    pub exclude_ambiguous: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(20, &CharClass::ALL)
    }
}

impl PasswordPolicy {
    pub fn new(length: usize, classes: &[CharClass]) -> Self {
        Self {
            length,
            classes: classes.iter().copied().collect(),
            exclude_ambiguous: false,
        }
    }

    /// Union of the requested classes.
    ///
    /// An empty selection falls back to letters and digits. This is the
    /// intended behavior: asking for "no classes" yields a usable
    /// alphanumeric password instead of an error.
    pub fn effective_charset(&self) -> Vec<u8> {
        let classes: Vec<CharClass> = if self.classes.is_empty() {
            log::debug!("no character classes requested, falling back to alphanumeric");
            vec![CharClass::Lower, CharClass::Upper, CharClass::Digit]
        } else {
            self.classes.iter().copied().collect()
        };

        classes
            .iter()
            .flat_map(|class| class.charset().iter().copied())
            .filter(|b| !(self.exclude_ambiguous && AMBIGUOUS.contains(b)))
            .collect()
    }
}

/// Generate a password according to `policy`
pub fn generate(policy: &PasswordPolicy) -> VaultResult<String> {
    generate_from_charset(&policy.effective_charset(), policy.length)
}

/// Draw `length` characters uniformly from an ASCII charset.
///
/// `choose` samples its index with `gen_range`, which rejects out-of-range
/// draws, so there is no modulo bias.
pub fn generate_from_charset(charset: &[u8], length: usize) -> VaultResult<String> {
    if length == 0 || length > MAX_PASSWORD_LENGTH {
        return Err(VaultError::Validation(format!(
            "password length must be between 1 and {}, got {}",
            MAX_PASSWORD_LENGTH, length
        )));
    }
    if charset.is_empty() {
        return Err(VaultError::Validation("character set is empty".into()));
    }
    if !charset.is_ascii() {
        return Err(VaultError::Validation("character set must be ASCII".into()));
    }

    let mut rng = OsRng;
    (0..length)
        .map(|_| {
            charset
                .choose(&mut rng)
                .map(|&b| b as char)
                .ok_or_else(|| VaultError::Validation("character set is empty".into()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_full_policy_conformance() {
        let policy = PasswordPolicy::new(20, &CharClass::ALL);
        let charset = policy.effective_charset();

        for _ in 0..100 {
            let password = generate(&policy).unwrap();
            assert_eq!(password.chars().count(), 20);
            assert!(password.bytes().all(|b| charset.contains(&b)));
        }
    }

    #[test]
    fn test_single_class() {
        let policy = PasswordPolicy::new(64, &[CharClass::Digit]);
        let password = generate(&policy).unwrap();
        assert_eq!(password.len(), 64);
        assert!(password.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_empty_classes_fall_back_to_alphanumeric() {
        let policy = PasswordPolicy::new(200, &[]);
        let password = generate(&policy).unwrap();
        assert_eq!(password.len(), 200);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_exclude_ambiguous() {
        let mut policy = PasswordPolicy::default();
        policy.exclude_ambiguous = true;
        policy.length = 500;

        let password = generate(&policy).unwrap();
        assert!(!password.bytes().any(|b| AMBIGUOUS.contains(&b)));
    }

    #[test]
    fn test_zero_length_rejected() {
        let policy = PasswordPolicy::new(0, &CharClass::ALL);
        assert!(matches!(generate(&policy), Err(VaultError::Validation(_))));
    }

    #[test]
    fn test_too_long_rejected() {
        let policy = PasswordPolicy::new(MAX_PASSWORD_LENGTH + 1, &CharClass::ALL);
        assert!(matches!(generate(&policy), Err(VaultError::Validation(_))));
    }

    #[test]
    fn test_empty_charset_rejected() {
        assert!(matches!(
            generate_from_charset(&[], 10),
            Err(VaultError::Validation(_))
        ));
    }

    #[test]
    fn test_exact_length_from_single_char() {
        for length in [1, 7, MAX_PASSWORD_LENGTH] {
            let password = generate_from_charset(b"x", length).unwrap();
            assert_eq!(password.len(), length);
            assert!(password.bytes().all(|b| b == b'x'));
        }
    }

    #[test]
    fn test_roughly_uniform() {
        // 10 digits x 20_000 draws: each bucket expects 2_000.
        let password = {
            let mut s = String::new();
            for _ in 0..20 {
                s.push_str(&generate_from_charset(DIGITS, 1000).unwrap());
            }
            s
        };

        let mut counts: HashMap<char, usize> = HashMap::new();
        for c in password.chars() {
            *counts.entry(c).or_default() += 1;
        }

        assert_eq!(counts.len(), 10);
        for (_, n) in counts {
            assert!((1_600..=2_400).contains(&n), "bucket count {}", n);
        }
    }

    #[test]
    fn test_char_class_of() {
        assert_eq!(CharClass::of('a'), CharClass::Lower);
        assert_eq!(CharClass::of('Z'), CharClass::Upper);
        assert_eq!(CharClass::of('7'), CharClass::Digit);
        assert_eq!(CharClass::of('#'), CharClass::Symbol);
        assert_eq!(CharClass::of('é'), CharClass::Symbol);
    }

    #[test]
    fn test_policy_serde() {
        let json = r#"{"length":12,"classes":["lower","digit"]}"#;
        let policy: PasswordPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(policy, PasswordPolicy::new(12, &[CharClass::Digit, CharClass::Lower]));
    }
}
