//! Language-aware title ordering and the domestic/foreign split.
//!
//! Titles are compared in three levels: base letters first, then accents,
//! then case (lower before upper). With Turkish rules ç ğ ı ö ş ü are letters
//! of their own placed after c g h o s u, and I/İ lowercase to ı/i.

use std::cmp::Ordering;

const TURKISH_ALPHABET: &str = "abcçdefgğhıijklmnoöpqrsştuüvwxyz";
const LATIN_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    language: String,
    turkish: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Weight {
    primary: (u8, u32),
    secondary: u8,
    tertiary: u8,
}

impl Locale {
    pub fn new(language: impl Into<String>) -> Self {
        let language = primary_subtag(&language.into()).to_lowercase();
        let turkish = language == "tr";
        Self { language, turkish }
    }

    /// Whether an original-language code counts as a domestic production.
    /// Only primary subtags are compared, so `tr-TR` and `tr` agree.
    pub fn is_domestic(&self, original_language: Option<&str>) -> bool {
        original_language
            .map(|l| primary_subtag(l).eq_ignore_ascii_case(&self.language))
            .unwrap_or(false)
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let wa = self.weights(a);
        let wb = self.weights(b);

        wa.iter()
            .map(|w| w.primary)
            .cmp(wb.iter().map(|w| w.primary))
            .then_with(|| wa.iter().map(|w| w.secondary).cmp(wb.iter().map(|w| w.secondary)))
            .then_with(|| wa.iter().map(|w| w.tertiary).cmp(wb.iter().map(|w| w.tertiary)))
            .then_with(|| a.cmp(b))
    }

    fn weights(&self, s: &str) -> Vec<Weight> {
        s.chars().map(|c| self.weight(c)).collect()
    }

    fn weight(&self, c: char) -> Weight {
        let (lower, tertiary) = self.lowercase(c);
        let (base, secondary) = self.strip_accent(lower);

        let alphabet = if self.turkish { TURKISH_ALPHABET } else { LATIN_ALPHABET };
        let primary = if let Some(index) = alphabet.chars().position(|l| l == base) {
            (2, index as u32)
        } else if let Some(digit) = base.to_digit(10) {
            (1, digit)
        } else if base.is_whitespace() || base.is_ascii_punctuation() {
            (0, base as u32)
        } else {
            (3, base as u32)
        };

        Weight {
            primary,
            secondary,
            tertiary,
        }
    }

    fn lowercase(&self, c: char) -> (char, u8) {
        let upper = u8::from(c.is_uppercase());
        let lower = match c {
            'I' if self.turkish => 'ı',
            'İ' => 'i',
            _ => c.to_lowercase().next().unwrap_or(c),
        };
        (lower, upper)
    }

    fn strip_accent(&self, c: char) -> (char, u8) {
        if self.turkish && matches!(c, 'ç' | 'ğ' | 'ı' | 'ö' | 'ş' | 'ü') {
            return (c, 0);
        }
        let base = match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
            'ç' => 'c',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'ğ' => 'g',
            'í' | 'ì' | 'î' | 'ï' | 'ı' => 'i',
            'ñ' => 'n',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
            'ş' => 's',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ý' | 'ÿ' => 'y',
            _ => return (c, 0),
        };
        (base, 1)
    }
}

/// `tr` from `tr-TR`, `pt` from `pt_BR`
fn primary_subtag(tag: &str) -> &str {
    tag.trim().split(['-', '_']).next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(locale: &Locale, words: &[&str]) -> Vec<String> {
        let mut out: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        out.sort_by(|a, b| locale.compare(a, b));
        out
    }

    #[test]
    fn test_turkish_letters_follow_their_base() {
        let tr = Locale::new("tr");
        assert_eq!(
            sorted(&tr, &["Şahsiyet", "Sen Anlat Karadeniz", "Tüm Zamanlar", "Çukur", "Cesur"]),
            vec!["Cesur", "Çukur", "Sen Anlat Karadeniz", "Şahsiyet", "Tüm Zamanlar"]
        );
        assert_eq!(sorted(&tr, &["Ömer", "Oyun", "Zebra"]), vec!["Oyun", "Ömer", "Zebra"]);
    }

    #[test]
    fn test_turkish_dotted_and_dotless_i() {
        let tr = Locale::new("tr-TR");
        // I is the capital of ı, which sorts before i
        assert_eq!(tr.compare("Işık", "İnci"), Ordering::Less);
        assert_eq!(tr.compare("ılık", "Işık"), Ordering::Less);
    }

    #[test]
    fn test_case_is_a_tertiary_difference() {
        let tr = Locale::new("tr");
        assert_eq!(sorted(&tr, &["b", "A", "a"]), vec!["a", "A", "b"]);
    }

    #[test]
    fn test_latin_rules_fold_accents() {
        let en = Locale::new("en");
        assert_eq!(sorted(&en, &["Zorro", "Éclair", "Apple"]), vec!["Apple", "Éclair", "Zorro"]);
        assert_eq!(en.compare("cote", "côte"), Ordering::Less);
    }

    #[test]
    fn test_is_domestic() {
        let tr = Locale::new("tr");
        assert!(tr.is_domestic(Some("tr")));
        assert!(!tr.is_domestic(Some("en")));
        assert!(!tr.is_domestic(None));
    }

    #[test]
    fn test_is_domestic_compares_primary_subtags() {
        assert!(Locale::new("tr-TR").is_domestic(Some("tr")));
        assert!(Locale::new("tr").is_domestic(Some("tr-TR")));
        assert!(Locale::new("pt_BR").is_domestic(Some("PT")));
        assert!(!Locale::new("tr-TR").is_domestic(Some("en")));
        assert!(Locale::new("tr-TR").compare("Işık", "İnci").is_lt());
    }
}
