//! Case-insensitive scope set operations.
//!
//! Scopes keep the spelling the caller used; every comparison ignores ASCII
//! case.

/// Scopes parsed from one access attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeRequest {
    /// Distinct scopes in request order; the first spelling of a scope wins.
    pub scopes: Vec<String>,
    /// The metadata scope was requested.
    pub meta: bool,
    /// The content scope was requested.
    pub content: bool,
}

impl ScopeRequest {
    /// Parse a space-delimited scope string.
    #[must_use]
    pub fn parse(text: &str, meta_scope: &str, content_scope: &str) -> Self {
        let mut scopes: Vec<String> = Vec::new();
        for scope in text.split_whitespace() {
            if !contains(&scopes, scope) {
                scopes.push(scope.to_owned());
            }
        }

        Self {
            meta: contains(&scopes, meta_scope),
            content: contains(&scopes, content_scope),
            scopes,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

/// How a requested scope set relates to a granted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixClass {
    /// Every requested scope is granted.
    AllIn,
    /// No requested scope is granted (also for an empty request).
    AllOut,
    /// Some requested scopes are granted and some are not.
    Mixed,
}

/// Case-insensitive equality that folds non-ASCII letters as well.
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// `true` if `set` holds `scope`, ignoring case.
#[must_use]
pub fn contains<S: AsRef<str>>(set: &[S], scope: &str) -> bool {
    set.iter().any(|s| eq_ignore_case(s.as_ref(), scope))
}

/// Every requested scope is part of `universe`.
///
/// An empty request is never a subset; an empty universe admits nothing.
#[must_use]
pub fn is_subset<R: AsRef<str>, U: AsRef<str>>(requested: &[R], universe: &[U]) -> bool {
    !requested.is_empty() && requested.iter().all(|r| contains(universe, r.as_ref()))
}

#[must_use]
pub fn classify_mix<R: AsRef<str>, G: AsRef<str>>(requested: &[R], granted: &[G]) -> MixClass {
    let matched = requested
        .iter()
        .filter(|r| contains(granted, r.as_ref()))
        .count();
    let missed = requested.len() - matched;

    match (matched, missed) {
        (0, _) => MixClass::AllOut,
        (_, 0) => MixClass::AllIn,
        _ => MixClass::Mixed,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    const NONE: &[&str] = &[];

    #[test]
    fn parse_splits_on_any_whitespace_and_dedupes() {
        let req = ScopeRequest::parse("  view\tDownload view  VIEW ", "meta", "content");

        assert_eq!(req.scopes, vec!["view", "Download"]);
        assert!(!req.meta);
        assert!(!req.content);
    }

    #[test]
    fn parse_detects_meta_and_content_flags_case_insensitively() {
        let req = ScopeRequest::parse("view META Content", "meta", "content");

        assert!(req.meta);
        assert!(req.content);
        assert_eq!(req.scopes.len(), 3);
    }

    #[test]
    fn parse_empty_text_is_empty() {
        assert!(ScopeRequest::parse("   ", "meta", "content").is_empty());
    }

    #[test]
    fn subset_ignores_case() {
        assert!(is_subset(&["VIEW", "download"], &["view", "Download", "print"]));
        assert!(!is_subset(&["view", "markup"], &["view", "download"]));
    }

    #[test]
    fn case_folding_covers_non_ascii_letters() {
        assert!(eq_ignore_case("\u{c4}NDERN", "\u{e4}ndern"));
        assert!(eq_ignore_case("J\u{dc}RGEN", "j\u{fc}rgen"));
        assert!(!eq_ignore_case("\u{e4}ndern", "andern"));
        assert!(is_subset(&["\u{c4}NDERN"], &["\u{e4}ndern", "view"]));
        assert_eq!(
            classify_mix(&["\u{c4}NDERN", "view"], &["\u{e4}ndern"]),
            MixClass::Mixed
        );
    }

    #[test]
    fn subset_of_empty_request_is_false() {
        assert!(!is_subset(NONE, &["view"]));
        assert!(!is_subset(NONE, NONE));
    }

    #[test]
    fn subset_of_empty_universe_is_false() {
        assert!(!is_subset(&["view"], NONE));
    }

    #[test]
    fn mix_all_in_when_request_is_covered() {
        assert_eq!(classify_mix(&["view"], &["VIEW", "download"]), MixClass::AllIn);
    }

    #[test]
    fn mix_all_out_when_disjoint_or_no_grant() {
        assert_eq!(classify_mix(&["print"], &["view"]), MixClass::AllOut);
        assert_eq!(classify_mix(&["view", "download"], NONE), MixClass::AllOut);
        assert_eq!(classify_mix(NONE, &["view"]), MixClass::AllOut);
    }

    #[test]
    fn mix_detected_on_partial_cover() {
        assert_eq!(
            classify_mix(&["view", "download"], &["view"]),
            MixClass::Mixed
        );
    }

    #[test]
    fn mixed_iff_both_counts_positive() {
        let universe = ["a", "b", "c", "d"];
        // every subset of the universe as request, against a fixed grant
        let granted = ["a", "B"];
        for mask in 0u8..16 {
            let requested: Vec<&str> = universe
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, s)| *s)
                .collect();
            let inside = requested.iter().filter(|r| contains(&granted, r)).count();
            let outside = requested.len() - inside;

            let mixed = classify_mix(&requested, &granted) == MixClass::Mixed;
            assert_eq!(mixed, inside > 0 && outside > 0, "request {requested:?}");
        }
    }
}
