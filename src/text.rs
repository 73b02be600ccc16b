use crate::error::{Result, ScrapeError};

/// Keeps letters and digits only, lowercased. Catalogue keys and caller
/// supplied series names both go through this before lookup.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Rewrites a catalogue link path into the search path segment:
/// `/a/b/c` becomes `/a--b--c`.
pub fn rewrite_href(path: &str) -> Result<String> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err(ScrapeError::invalid_argument(
            "href",
            format!("must start with '/': {path:?}"),
        ));
    };
    Ok(format!("/{}", rest.replace('/', "--")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_whitespace_and_underscores() {
        assert_eq!(normalize("test QUery here ##::;___"), "testqueryhere");
        assert_eq!(normalize("Yes Series Test"), "yesseriestest");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_is_case_and_punctuation_insensitive() {
        assert_eq!(normalize("Test QUery!!"), normalize("testquery"));
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in [
            "Calendar of State Papers, Domestic: 1547-80",
            "  Survey of London (vol. 12) ",
            "Ælfric's_Colloquy",
            "",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn rewrite_href_joins_later_segments_with_double_hyphen() -> anyhow::Result<()> {
        assert_eq!(rewrite_href("/a/b/c")?, "/a--b--c");
        assert_eq!(rewrite_href("/test/href")?, "/test--href");
        assert_eq!(rewrite_href("/single")?, "/single");
        assert_eq!(rewrite_href("/")?, "/");
        Ok(())
    }

    #[test]
    fn rewrite_href_rejects_relative_paths() {
        let err = rewrite_href("a/b").unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidArgument { .. }));
    }
}
