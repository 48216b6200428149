//! Token-level heuristics turning a signature block into (role, name) pairs.
//!
//! Names are printed in capitals ("ΙΩΑΝΝΗΣ ΠΑΠΑΔΟΠΟΥΛΟΣ") and roles in mixed case.
//! A role either precedes its name, accumulating word by word until the name
//! arrives, or follows it as a run of lines closed by a blank line.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::role_text::normalize_role;
use super::segmenter::Block;
use super::types::ExtractedSignature;
use super::TARGET_SIGNATURE;
use crate::config::NameRules;

lazy_static! {
    // a line break, or a column gap of two or more whitespace characters
    static ref TOKEN_SEPARATOR: Regex = Regex::new(r"\n|\s{2,}").unwrap();
    static ref DECIMAL_DIGIT: Regex = Regex::new(r"\d").unwrap();
}

#[derive(Debug)]
enum State<'t> {
    AwaitingName,
    // A name was read before any role text. Short fragments read meanwhile are
    // kept in `role` and complete the pair at the end of the block.
    HaveName { name: &'t str, role: Vec<&'t str> },
    AccumulatingRole { role: Vec<&'t str> },
}

/// Split a block into tokens, dropping the header line
pub fn tokenize(text: &str) -> Vec<&str> {
    TOKEN_SEPARATOR.split(text).skip(1).collect()
}

/// Extract the signatures of one block.
///
/// When the block end is unknown, the first token holding a digit ends the
/// signature section: page numbers, dates and issue references follow it.
pub fn extract_signatures(block: &Block<'_>, rules: &NameRules) -> Vec<ExtractedSignature> {
    let tokens = tokenize(block.text);
    let mut signatures = Vec::new();
    let mut state = State::AwaitingName;
    let mut index = 0;

    while index < tokens.len() {
        let token = tokens[index];
        if !block.end_known && is_break_point(token) {
            debug!(target: TARGET_SIGNATURE, "Stopping at '{}'", token);
            break;
        }
        index += 1;

        let mut stop = false;
        state = match state {
            State::AwaitingName => {
                if is_name_token(token, rules) {
                    State::HaveName {
                        name: token.trim(),
                        role: Vec::new(),
                    }
                } else if is_blank(token) {
                    State::AwaitingName
                } else {
                    State::AccumulatingRole { role: vec![token] }
                }
            }
            State::AccumulatingRole { mut role } => {
                if is_name_token(token, rules) {
                    push_signature(&mut signatures, &normalize_role(&role.join(" ")), token);
                    State::AwaitingName
                } else {
                    role.push(token);
                    State::AccumulatingRole { role }
                }
            }
            State::HaveName { name, mut role } => {
                if is_name_token(token, rules) {
                    if has_text(&role) {
                        push_signature(&mut signatures, &normalize_role(&role.join(" ")), token);
                        State::HaveName {
                            name,
                            role: Vec::new(),
                        }
                    } else {
                        // a second name with no role in between replaces the first
                        State::HaveName {
                            name: token.trim(),
                            role: Vec::new(),
                        }
                    }
                } else if is_long(token, rules) {
                    let (run, consumed) = read_role_run(&tokens[index - 1..]);
                    push_signature(&mut signatures, &run, name);

                    let skipped = &tokens[index..index - 1 + consumed];
                    stop = !block.end_known && skipped.iter().any(|t| is_break_point(t));
                    index += consumed - 1;

                    if has_text(&role) {
                        State::AccumulatingRole { role }
                    } else {
                        State::AwaitingName
                    }
                } else {
                    role.push(token);
                    State::HaveName { name, role }
                }
            }
        };

        if stop {
            debug!(target: TARGET_SIGNATURE, "Stopping inside a role run");
            break;
        }
    }

    if let State::HaveName { name, role } = state {
        if has_text(&role) {
            push_signature(&mut signatures, &normalize_role(&role.join(" ")), name);
        }
    }

    signatures
}

/// Read a role printed below its name: this token and the following ones up to a
/// blank line. Returns the joined role and the number of tokens it spans.
fn read_role_run(tokens: &[&str]) -> (String, usize) {
    let consumed = tokens.iter().take_while(|t| !is_blank(t)).count().max(1);
    let role = tokens[..consumed].join(" ").trim().to_string();
    (role, consumed)
}

fn push_signature(signatures: &mut Vec<ExtractedSignature>, role: &str, name: &str) {
    let name = name.trim();
    if role.is_empty() || name.is_empty() {
        debug!(target: TARGET_SIGNATURE, "Dropping incomplete pair '{}' / '{}'", role, name);
        return;
    }
    signatures.push(ExtractedSignature::new(role, name));
}

/// Digits never appear inside the signature section itself
pub fn is_break_point(token: &str) -> bool {
    DECIMAL_DIGIT.is_match(token)
}

/// All-capital token long enough, and with enough words, to be a person's name
pub fn is_name_token(token: &str, rules: &NameRules) -> bool {
    is_long(token, rules)
        && token.chars().any(char::is_alphabetic)
        && token.to_uppercase() == token
        && token.split_whitespace().count() >= rules.min_words
}

fn is_long(token: &str, rules: &NameRules) -> bool {
    token.chars().count() > rules.min_chars_exclusive
}

fn is_blank(token: &str) -> bool {
    token.trim().is_empty()
}

fn has_text(role: &[&str]) -> bool {
    role.iter().any(|t| !is_blank(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &str, end_known: bool) -> Block<'_> {
        Block {
            start: 0,
            text,
            end_known,
        }
    }

    fn extract(text: &str, end_known: bool) -> Vec<ExtractedSignature> {
        extract_signatures(&block(text, end_known), &NameRules::default())
    }

    #[test]
    fn test_tokenize_splits_lines_and_column_gaps() {
        let tokens = tokenize("ΟΙ ΥΠΟΥΡΓΟΙ\nΟικονομικών    Υγείας\n\nΝΙΚΟΣ ΒΟΥΤΣΗΣ\n");
        assert_eq!(tokens, vec!["Οικονομικών", "Υγείας", "", "ΝΙΚΟΣ ΒΟΥΤΣΗΣ", ""]);
    }

    #[test]
    fn test_name_token_rules() {
        let rules = NameRules::default();
        assert!(is_name_token("ΙΩΑΝΝΗΣ ΠΑΠΑΔΟΠΟΥΛΟΣ", &rules));
        assert!(!is_name_token("ΟΙΚΟΝΟΜΙΚΩΝ", &rules));
        assert!(!is_name_token("Ιωάννης Παπαδόπουλος", &rules));
        assert!(!is_name_token("Α Β", &rules));
        assert!(!is_name_token("---- ----", &rules));

        let single_word = NameRules {
            min_words: 1,
            ..NameRules::default()
        };
        assert!(is_name_token("ΟΙΚΟΝΟΜΙΚΩΝ", &single_word));
    }

    #[test]
    fn test_upper_case_role_then_name() {
        let signatures = extract("ΟΙ ΥΠΟΥΡΓΟΙ\nΟΙΚΟΝΟΜΙΚΩΝ\nΙΩΑΝΝΗΣ ΠΑΠΑΔΟΠΟΥΛΟΣ\n", true);
        assert_eq!(
            signatures,
            vec![ExtractedSignature::new("ΟΙΚΟΝΟΜΙΚΩΝ", "ΙΩΑΝΝΗΣ ΠΑΠΑΔΟΠΟΥΛΟΣ")]
        );
    }

    #[test]
    fn test_role_words_then_name_then_blank_line() {
        let signatures = extract(
            "ΟΙ ΥΠΟΥΡΓΟΙ\nΑναπληρωτής Υπουργός\nΟικονομικών\nΙΩΑΝΝΗΣ ΠΑΠΑΔΟΠΟΥΛΟΣ\n\n",
            false,
        );
        assert_eq!(signatures.len(), 1);
        assert_eq!(signatures[0].name, "ΙΩΑΝΝΗΣ ΠΑΠΑΔΟΠΟΥΛΟΣ");
        assert_eq!(signatures[0].role, "Αναπληρωτής Υπουργός Οικονομικών");
    }

    #[test]
    fn test_accumulated_role_is_repaired() {
        let signatures = extract("ΟΙ ΥΠΟΥΡΓΟΙ\nΥπουργόςΟικονομικών\nΝΙΚΟΣ ΒΟΥΤΣΗΣ\n", true);
        assert_eq!(signatures[0].role, "Υπουργός Οικονομικών");
    }

    #[test]
    fn test_name_then_role_run() {
        let signatures = extract(
            "ΟΙ ΥΠΟΥΡΓΟΙ\nΙΩΑΝΝΗΣ ΠΑΠΑΔΟΠΟΥΛΟΣ\nΥπουργός\nΟικονομικών\n\nΝΙΚΟΣ ΒΟΥΤΣΗΣ\nΥγείας\n",
            true,
        );
        assert_eq!(
            signatures,
            vec![
                ExtractedSignature::new("Υπουργός Οικονομικών", "ΙΩΑΝΝΗΣ ΠΑΠΑΔΟΠΟΥΛΟΣ"),
                ExtractedSignature::new("Υγείας", "ΝΙΚΟΣ ΒΟΥΤΣΗΣ"),
            ]
        );
    }

    #[test]
    fn test_role_run_tokens_are_not_reprocessed() {
        // "ΓΙΑΝΝΗΣ ΚΩΣΤΑΣ" sits inside the run, so it must not start a new pair
        let signatures = extract(
            "ΟΙ ΥΠΟΥΡΓΟΙ\nΝΙΚΟΣ ΒΟΥΤΣΗΣ\nΥγείας\nΓΙΑΝΝΗΣ ΚΩΣΤΑΣ\n\n",
            true,
        );
        assert_eq!(
            signatures,
            vec![ExtractedSignature::new("Υγείας ΓΙΑΝΝΗΣ ΚΩΣΤΑΣ", "ΝΙΚΟΣ ΒΟΥΤΣΗΣ")]
        );
    }

    #[test]
    fn test_trailing_name_with_short_role() {
        let signatures = extract("ΟΙ ΥΠΟΥΡΓΟΙ\nΝΙΚΟΣ ΒΟΥΤΣΗΣ\nΕπί\nτων", true);
        assert_eq!(
            signatures,
            vec![ExtractedSignature::new("Επί των", "ΝΙΚΟΣ ΒΟΥΤΣΗΣ")]
        );
    }

    #[test]
    fn test_trailing_name_without_role_is_dropped() {
        assert!(extract("ΟΙ ΥΠΟΥΡΓΟΙ\nΝΙΚΟΣ ΒΟΥΤΣΗΣ\n\n", true).is_empty());
        assert!(extract("ΟΙ ΥΠΟΥΡΓΟΙ\n", true).is_empty());
        assert!(extract("", false).is_empty());
    }

    #[test]
    fn test_digits_end_an_open_block() {
        let text = "ΟΙ ΥΠΟΥΡΓΟΙ\nΥγείας\nΝΙΚΟΣ ΒΟΥΤΣΗΣ\nΟικονομικών 2ας\nΓΙΑΝΝΗΣ ΚΩΣΤΑΣ\n";

        let open = extract(text, false);
        assert_eq!(open, vec![ExtractedSignature::new("Υγείας", "ΝΙΚΟΣ ΒΟΥΤΣΗΣ")]);

        let closed = extract(text, true);
        assert_eq!(
            closed,
            vec![
                ExtractedSignature::new("Υγείας", "ΝΙΚΟΣ ΒΟΥΤΣΗΣ"),
                ExtractedSignature::new("Οικονομικών 2ας", "ΓΙΑΝΝΗΣ ΚΩΣΤΑΣ"),
            ]
        );
    }

    #[test]
    fn test_break_point_needs_a_decimal_digit() {
        assert!(is_break_point("ΦΕΚ 12"));
        assert!(is_break_point("Αρ.5"));
        assert!(!is_break_point("½ μερίδα"));
        assert!(!is_break_point("Ⅳ"));
        assert!(!is_break_point("Οικονομικών"));

        let text = "ΟΙ ΥΠΟΥΡΓΟΙ\nΥγείας ½\nΝΙΚΟΣ ΒΟΥΤΣΗΣ\n";
        assert_eq!(
            extract(text, false),
            vec![ExtractedSignature::new("Υγείας ½", "ΝΙΚΟΣ ΒΟΥΤΣΗΣ")]
        );
    }

    #[test]
    fn test_digits_inside_role_run_end_an_open_block() {
        let text = "ΟΙ ΥΠΟΥΡΓΟΙ\nΝΙΚΟΣ ΒΟΥΤΣΗΣ\nΥγείας\nΑρ. 5\n\nΟικονομικών\nΓΙΑΝΝΗΣ ΚΩΣΤΑΣ\n";

        let open = extract(text, false);
        assert_eq!(
            open,
            vec![ExtractedSignature::new("Υγείας Αρ. 5", "ΝΙΚΟΣ ΒΟΥΤΣΗΣ")]
        );

        let closed = extract(text, true);
        assert_eq!(closed.len(), 2);
        assert_eq!(closed[1], ExtractedSignature::new("Οικονομικών", "ΓΙΑΝΝΗΣ ΚΩΣΤΑΣ"));
    }

    #[test]
    fn test_multiple_pairs_in_order() {
        let signatures = extract(
            "Οι Υπουργοί\nΕσωτερικών\nΠΑΝΑΓΙΩΤΗΣ ΣΚΟΥΡΛΕΤΗΣ\nΟικονομικών\nΕΥΚΛΕΙΔΗΣ ΤΣΑΚΑΛΩΤΟΣ\n",
            true,
        );
        let names: Vec<&str> = signatures.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["ΠΑΝΑΓΙΩΤΗΣ ΣΚΟΥΡΛΕΤΗΣ", "ΕΥΚΛΕΙΔΗΣ ΤΣΑΚΑΛΩΤΟΣ"]);
        assert_eq!(signatures[1].role, "Οικονομικών");
    }
}
