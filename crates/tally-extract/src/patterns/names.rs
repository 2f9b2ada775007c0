//! Name-list splitting and honorific stripping.

use std::sync::LazyLock;

use regex::Regex;

static HONORIFIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:vice\s+)?mayor\s+pro\s*-?\s*tem(?:pore)?|vice\s+mayor|mayor|council\s*members?|councilm[ae]n|councilwom[ae]n|council\s*persons?|boardmembers?|board\s+members?|commissioners?|members?|chair(?:man|woman|person)?|vice\s+chair|mr|mrs|ms|dr|hon)\b\.?\s*",
    )
    .expect("honorific regex")
});

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*(?:[,;\n]|\s&\s|\band\b)\s*").expect("separator regex"));

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)|\[[^\]]*\]").expect("parenthetical regex"));

static UNANIMOUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:all(?:\s+(?:council\s*)?members?(?:\s+present)?)?|unanimous(?:ly)?)$")
        .expect("unanimous regex")
});

const PLACEHOLDERS: &[&str] = &["none", "n/a", "na", "nil", "-", "0"];

/// Remove leading titles such as `Councilmember` or `Mayor Pro Tem`.
///
/// A bare title with no name after it is returned unchanged, so `Mayor`
/// can still be resolved through the roster's title holder.
#[must_use]
pub fn strip_honorific(raw: &str) -> &str {
    let trimmed = raw.trim();
    let mut rest = trimmed;
    while let Some(found) = HONORIFIC.find(rest) {
        if found.end() >= rest.len() {
            break;
        }
        rest = &rest[found.end()..];
    }
    rest.trim()
}

/// True for `All`, `All members present`, `Unanimous`.
#[must_use]
pub fn is_unanimous_marker(list: &str) -> bool {
    UNANIMOUS.is_match(list.trim().trim_end_matches('.'))
}

/// Split a raw name list into individual name tokens.
///
/// Separators are commas, semicolons, newlines, `and`, and `&`.
/// Parentheticals and placeholders like `None` are dropped.
#[must_use]
pub fn split_names(list: &str) -> Vec<String> {
    let without_notes = PARENTHETICAL.replace_all(list, " ");
    SEPARATOR
        .split(&without_notes)
        .map(|token| token.trim().trim_end_matches(['.', ':']).trim())
        .filter(|token| !token.is_empty())
        .filter(|token| !PLACEHOLDERS.contains(&token.to_ascii_lowercase().as_str()))
        .filter(|token| token.chars().any(char::is_alphabetic))
        .map(|token| strip_honorific(token).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_on_commas_and_conjunctions() {
        assert_eq!(
            split_names("Penaloza, Phan; Lopez and Bacerra & Hernandez"),
            vec!["Penaloza", "Phan", "Lopez", "Bacerra", "Hernandez"]
        );
    }

    #[test]
    fn strips_titles_and_notes() {
        assert_eq!(
            split_names("Councilmember Lopez (arrived 6:05 p.m.), Mayor Pro Tem Sarmiento, Mayor"),
            vec!["Lopez", "Sarmiento", "Mayor"]
        );
    }

    #[test]
    fn drops_placeholders() {
        assert!(split_names("None").is_empty());
        assert!(split_names(" N/A ").is_empty());
    }

    #[test]
    fn unanimous_markers() {
        assert!(is_unanimous_marker("All"));
        assert!(is_unanimous_marker("All Council Members Present."));
        assert!(!is_unanimous_marker("Alley"));
    }

    #[test]
    fn bare_titles_survive() {
        assert_eq!(strip_honorific("Mayor Pro Tem"), "Mayor Pro Tem");
        assert_eq!(strip_honorific("Dr. Hernandez"), "Hernandez");
    }
}
