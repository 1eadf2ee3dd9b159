/// Canonicalize a card or theme name for comparison: trim, unify curly
/// quotes and long dashes to their ASCII forms, collapse whitespace runs.
///
/// Card lists come from several upstream exports that disagree on
/// typography; matching on the canonical form keeps "Krenko's Command" and
/// "Krenko\u{2019}s Command" from being treated as different cards.
pub fn canon(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_space = false;

    for ch in name.trim().chars() {
        let ch = match ch {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            c => c,
        };
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }

    out
}

/// Canonicalized and case-folded form used for all membership tests.
pub fn canon_fold(name: &str) -> String {
    canon(name).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_collapses_whitespace() {
        assert_eq!(canon("  Sol   Ring\t"), "Sol Ring");
        assert_eq!(canon("a \n b"), "a b");
    }

    #[test]
    fn test_normalizes_quotes_and_dashes() {
        assert_eq!(canon("Krenko\u{2019}s Command"), "Krenko's Command");
        assert_eq!(canon("\u{201C}quoted\u{201D}"), "\"quoted\"");
        assert_eq!(canon("Will-o\u{2019}-the\u{2013}Wisp"), "Will-o'-the-Wisp");
        assert_eq!(canon("em\u{2014}dash"), "em-dash");
    }

    #[test]
    fn test_fold_is_case_insensitive() {
        assert_eq!(
            canon_fold("KIKI-JIKI, Mirror Breaker"),
            canon_fold("kiki-jiki, mirror breaker")
        );
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(canon(""), "");
        assert_eq!(canon("   "), "");
    }
}
