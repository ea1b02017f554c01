#![forbid(unsafe_code)]

/// Native-Korean single-digit words. Duplicate surface forms (determiner
/// and standalone variants) map to the same value.
const TIER_ONE: &[(&str, i32)] = &[
    ("한", 1),
    ("하나", 1),
    ("두", 2),
    ("둘", 2),
    ("세", 3),
    ("셋", 3),
    ("네", 4),
    ("넷", 4),
    ("다섯", 5),
    ("여섯", 6),
    ("일곱", 7),
    ("여덟", 8),
    ("아홉", 9),
];

/// Tens and magnitude words, native and Sino-Korean variants side by side.
const TIER_TEN_UP: &[(&str, i32)] = &[
    ("열", 10),
    ("십", 10),
    ("스무", 20),
    ("스물", 20),
    ("이십", 20),
    ("서른", 30),
    ("삼십", 30),
    ("마흔", 40),
    ("사십", 40),
    ("쉰", 50),
    ("오십", 50),
    ("예순", 60),
    ("육십", 60),
    ("일흔", 70),
    ("칠십", 70),
    ("여든", 80),
    ("팔십", 80),
    ("아흔", 90),
    ("구십", 90),
    ("백", 100),
    ("천", 1000),
    ("만", 10000),
];

/// Static two-tier mapping from number-word surface forms to values.
///
/// The lexicon does no composition across tiers; a word either matches a
/// key exactly or it does not. Callers sum whatever the tiers yield for a
/// single surface form (`resolve`), which for ordinary one-word tokens is
/// just the one matching value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLexicon {
    tier_one: &'static [(&'static str, i32)],
    tier_ten_up: &'static [(&'static str, i32)],
}

impl NumberLexicon {
    pub fn default_ko_v1() -> Self {
        Self {
            tier_one: TIER_ONE,
            tier_ten_up: TIER_TEN_UP,
        }
    }

    /// Sum of every key equal to `word` across both tiers, or `None` when
    /// nothing matches. Unresolvable words are not an error.
    pub fn resolve(&self, word: &str) -> Option<i32> {
        let sum = self.tier_sum(self.tier_one, word) + self.tier_sum(self.tier_ten_up, word);
        if sum == 0 {
            None
        } else {
            Some(sum)
        }
    }

    fn tier_sum(&self, tier: &[(&str, i32)], word: &str) -> i32 {
        tier.iter()
            .filter(|(key, _)| *key == word)
            .map(|(_, value)| value)
            .sum()
    }
}
