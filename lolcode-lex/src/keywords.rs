//! The closed keyword table and longest-match lookup over it.
//!
//! LOLCODE keywords range from one word (`VISIBLE`) to four (`IF U SAY
//! SO`). Rather than a hand-rolled trie, the table below is grouped by
//! word count and probed longest-first, which gives the same longest-match
//! guarantee the lexer contract requires with a much smaller surface than
//! a full trie for a keyword set this size.

use crate::token::TokenKind;

const FOUR_WORD: &[(&[&str; 4], TokenKind)] = &[(&["IF", "U", "SAY", "SO"], TokenKind::IfUSaySo)];

const THREE_WORD: &[(&[&str; 3], TokenKind)] = &[
    (&["I", "HAS", "A"], TokenKind::IHasA),
    (&["IS", "NOW", "A"], TokenKind::IsNowA),
    (&["IM", "IN", "YR"], TokenKind::ImInYr),
    (&["IM", "OUTTA", "YR"], TokenKind::ImOuttaYr),
    (&["HOW", "IZ", "I"], TokenKind::HowIzI),
];

const TWO_WORD: &[(&[&str; 2], TokenKind)] = &[
    (&["MAEK", "A"], TokenKind::MaekA),
    (&["BOTH", "OF"], TokenKind::BothOf),
    (&["EITHER", "OF"], TokenKind::EitherOf),
    (&["WON", "OF"], TokenKind::WonOf),
    (&["ALL", "OF"], TokenKind::AllOf),
    (&["ANY", "OF"], TokenKind::AnyOf),
    (&["BOTH", "SAEM"], TokenKind::BothSaem),
    (&["SUM", "OF"], TokenKind::SumOf),
    (&["DIFF", "OF"], TokenKind::DiffOf),
    (&["PRODUKT", "OF"], TokenKind::ProduktOf),
    (&["QUOSHUNT", "OF"], TokenKind::QuoshuntOf),
    (&["MOD", "OF"], TokenKind::ModOf),
    (&["BIGGR", "OF"], TokenKind::BiggrOf),
    (&["SMALLR", "OF"], TokenKind::SmallrOf),
    (&["YA", "RLY"], TokenKind::YaRly),
    (&["NO", "WAI"], TokenKind::NoWai),
    (&["AN", "YR"], TokenKind::AnYr),
    (&["FOUND", "YR"], TokenKind::FoundYr),
    (&["I", "IZ"], TokenKind::IIz),
];

const ONE_WORD: &[(&str, TokenKind)] = &[
    ("HAI", TokenKind::Hai),
    ("KTHXBYE", TokenKind::KThxBye),
    ("WAZZUP", TokenKind::Wazzup),
    ("BUHBYE", TokenKind::Buhbye),
    ("ITZ", TokenKind::Itz),
    ("R", TokenKind::R),
    ("NUMBR", TokenKind::TypeNumbr),
    ("NUMBAR", TokenKind::TypeNumbar),
    ("YARN", TokenKind::TypeYarn),
    ("TROOF", TokenKind::TypeTroof),
    ("AN", TokenKind::An),
    ("NOT", TokenKind::Not),
    ("MKAY", TokenKind::Mkay),
    ("DIFFRINT", TokenKind::Diffrint),
    ("SMOOSH", TokenKind::Smoosh),
    ("VISIBLE", TokenKind::Visible),
    ("GIMMEH", TokenKind::Gimmeh),
    ("OIC", TokenKind::Oic),
    // spec.md writes the switch keyword as bare `WTF` both in its keyword-tag
    // enumeration and in the `switch` grammar production, unlike `O RLY?`
    // (where the `?` is kept); `WTF?` is also accepted since a glued `?` is
    // how canonical LOLCODE source tends to write it.
    ("WTF", TokenKind::Wtf),
    ("WTF?", TokenKind::Wtf),
    ("OMG", TokenKind::Omg),
    ("OMGWTF", TokenKind::OmgWtf),
    ("GTFO", TokenKind::Gtfo),
    ("UPPIN", TokenKind::Uppin),
    ("NERFIN", TokenKind::Nerfin),
    ("YR", TokenKind::Yr),
    ("TIL", TokenKind::Til),
    ("WILE", TokenKind::Wile),
    ("NOOB", TokenKind::Noob),
];

/// `O RLY?` is the one keyword whose final word has a `?` glued onto it
/// with no intervening space; the lexer special-cases it before falling
/// back to this table.
pub const O_RLY_WORDS: [&str; 2] = ["O", "RLY?"];

/// Attempts to match the longest keyword phrase starting at `words[0]`,
/// probing four words down to one. `words` may be shorter than four at
/// end of input. Returns the number of words consumed and the matched
/// kind, or `None` if no keyword starts here.
pub fn match_keyword(words: &[&str]) -> Option<(usize, TokenKind)> {
    if words.len() >= 2 && words[0] == O_RLY_WORDS[0] && words[1] == O_RLY_WORDS[1] {
        return Some((2, TokenKind::ORly));
    }

    if words.len() >= 4 {
        for (phrase, kind) in FOUR_WORD {
            if phrase.iter().zip(words).all(|(p, w)| p == w) {
                return Some((4, kind.clone()));
            }
        }
    }

    if words.len() >= 3 {
        for (phrase, kind) in THREE_WORD {
            if phrase.iter().zip(words).all(|(p, w)| p == w) {
                return Some((3, kind.clone()));
            }
        }
    }

    if words.len() >= 2 {
        for (phrase, kind) in TWO_WORD {
            if phrase.iter().zip(words).all(|(p, w)| p == w) {
                return Some((2, kind.clone()));
            }
        }
    }

    if !words.is_empty() {
        for (word, kind) in ONE_WORD {
            if *word == words[0] {
                return Some((1, kind.clone()));
            }
        }
    }

    None
}

/// `true` when `word` is `WIN`/`FAIL`, the two boolean literals.
pub fn boolean_literal(word: &str) -> Option<bool> {
    match word {
        "WIN" => Some(true),
        "FAIL" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_longest_three_word_phrase_over_shorter_prefixes() {
        let words = ["I", "HAS", "A", "X"];
        let (consumed, kind) = match_keyword(&words).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(kind, TokenKind::IHasA);
    }

    #[test]
    fn matches_four_word_phrase() {
        let words = ["IF", "U", "SAY", "SO"];
        let (consumed, kind) = match_keyword(&words).unwrap();
        assert_eq!(consumed, 4);
        assert_eq!(kind, TokenKind::IfUSaySo);
    }

    #[test]
    fn i_iz_matches_as_a_two_word_phrase() {
        let words = ["I", "IZ", "add"];
        let (consumed, kind) = match_keyword(&words).unwrap();
        assert_eq!(consumed, 2);
        assert_eq!(kind, TokenKind::IIz);
    }

    #[test]
    fn unknown_word_does_not_match() {
        assert!(match_keyword(&["POTATO"]).is_none());
    }

    #[test]
    fn wtf_matches_bare_as_spec_md_writes_it() {
        let (consumed, kind) = match_keyword(&["WTF"]).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(kind, TokenKind::Wtf);
    }

    #[test]
    fn wtf_with_glued_question_mark_also_matches() {
        let (consumed, kind) = match_keyword(&["WTF?"]).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(kind, TokenKind::Wtf);
    }
}
