//! Repairs role text where the text layer glued words together.
//!
//! PDF text extraction regularly loses the space between two words of a role
//! ("ΥπουργόςΟικονομικών"). Each whitespace-delimited part is checked against a
//! short list of boundary rules in priority order; the first rule that splits the
//! part wins and the resulting words are checked again.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BOUNDARY_RULES: Vec<Regex> = vec![
        // lower-case letter directly followed by an upper-case one
        Regex::new("([α-ω])([Α-Ω])").unwrap(),
        // final sigma can only end a word
        Regex::new("(ς)([Α-Ωα-ωά-ώ])").unwrap(),
        // connective "και" glued to a word ending in ύ
        Regex::new("(ύ)(και)").unwrap(),
    ];
}

/// Split glued words and return the role single-spaced and trimmed
pub fn normalize_role(text: &str) -> String {
    let mut words = Vec::new();
    for part in text.split_whitespace() {
        split_part(part, &mut words);
    }
    words.join(" ")
}

fn split_part(part: &str, words: &mut Vec<String>) {
    for rule in BOUNDARY_RULES.iter() {
        let replaced = rule.replace_all(part, "$1 $2");
        let pieces: Vec<&str> = replaced.split_whitespace().collect();
        if pieces.len() > 1 {
            for piece in pieces {
                split_part(piece, words);
            }
            return;
        }
    }
    words.push(part.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_boundary() {
        assert_eq!(
            normalize_role("ΥπουργόςΟικονομικών"),
            "Υπουργός Οικονομικών"
        );
        assert_eq!(
            normalize_role("Αναπληρωτής ΥπουργόςΕσωτερικών"),
            "Αναπληρωτής Υπουργός Εσωτερικών"
        );
    }

    #[test]
    fn test_final_sigma_boundary() {
        assert_eq!(normalize_role("Υπουργόςοικονομικών"), "Υπουργός οικονομικών");
        assert_eq!(normalize_role("Παιδείαςκαι Θρησκευμάτων"), "Παιδείας και Θρησκευμάτων");
    }

    #[test]
    fn test_glued_connective() {
        assert_eq!(
            normalize_role("Υπουργός Πολιτισμούκαι Αθλητισμού"),
            "Υπουργός Πολιτισμού και Αθλητισμού"
        );
    }

    #[test]
    fn test_clean_text_is_untouched() {
        assert_eq!(normalize_role("Υπουργός Υγείας"), "Υπουργός Υγείας");
        assert_eq!(normalize_role("ΠΡΩΘΥΠΟΥΡΓΟΣ"), "ΠΡΩΘΥΠΟΥΡΓΟΣ");
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        assert_eq!(normalize_role("  Υπουργός   Υγείας "), "Υπουργός Υγείας");
        assert_eq!(normalize_role("   "), "");
    }

    #[test]
    fn test_rules_are_reapplied_to_split_words() {
        // the camel-case split leaves "ςα" behind, which the sigma rule then splits
        assert_eq!(normalize_role("ΑπόςαΒ"), "Απός α Β");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let samples = [
            "ΥπουργόςΟικονομικών",
            "Παιδείαςκαι Θρησκευμάτων",
            "Υπουργός Πολιτισμούκαι Αθλητισμού",
            "ΑπόςαΒ",
            "Υφυπουργός  στον Πρωθυπουργό",
            "ΥΠΟΥΡΓΟΣ ΕΡΓΑΣΙΑΣ",
            "",
        ];
        for sample in samples {
            let once = normalize_role(sample);
            assert_eq!(normalize_role(&once), once, "sample: {}", sample);
        }
    }
}
