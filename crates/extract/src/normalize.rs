use regex::Regex;
use std::sync::OnceLock;

fn re_runs_of_spaces() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(" {2,}").expect("invalid regex"))
}

/// Normalize raw extracted page text before any pattern matching: unify line
/// endings, turn tabs into spaces, collapse runs of spaces, trim the ends.
/// Newlines are preserved: the multi-line fallback depends on them.
pub fn normalize(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n").replace('\t', " ");
    re_runs_of_spaces()
        .replace_all(&unified, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unifies_line_endings() {
        assert_eq!(normalize("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn tabs_become_single_spaces() {
        assert_eq!(normalize("01/06/2024\tSALARY\t\t20000.00"), "01/06/2024 SALARY 20000.00");
    }

    #[test]
    fn collapses_space_runs_but_keeps_newlines() {
        assert_eq!(normalize("a    b\n\nc  d"), "a b\n\nc d");
    }

    #[test]
    fn trims_outer_whitespace() {
        assert_eq!(normalize("  \n text \n  "), "text");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \r\n "), "");
    }
}
