//! Text normalization for OCR-derived agendas and minutes.
//!
//! Produces cleaned text plus two side tables: the original line number of
//! every cleaned line, and the cleaned line on which each page starts. The
//! transformation is pure and deterministic.
//!
//! Applied per line, in order:
//! - dash variants (em, en, minus, ...) become `-`; exotic spaces become ` `;
//!   smart quotes become ASCII quotes; zero-width and control characters go
//! - `KEYWORD ;` / `KEYWORD :` after a vote or motion keyword becomes `KEYWORD: `
//! - `0`/`1`/`8` inside name-like tokens become `o`/`l`/`b` (or `O`/`I`/`B`
//!   at the start of a word or inside an upper-case word)
//! - runs of whitespace collapse to one space; lines are trimmed
//! - page-break markers are dropped and recorded in the page table
//! - runs of blank lines collapse to a single blank line

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static PAGE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:-+\s*)?(?:\[?\s*page\s+break\s*\]?|page\s+\d+(?:\s+of\s+\d+)?)(?:\s*-+)?$")
        .expect("page marker regex")
});

static KEYWORD_PUNCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(ayes?|yes|yeas|noes|nos|no|nays?|abstain(?:ed|ing)?|abstentions?|absent|excused|recused|recusals?|status|motion|second(?:ed)?)\s*[;:]+\s*",
    )
    .expect("keyword punctuation regex")
});

static ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d+(?:st|nd|rd|th)$").expect("ordinal regex"));

/// Cleaned text with line and page side tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    line_map: Vec<usize>,
    page_starts: Vec<usize>,
}

impl NormalizedText {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True when the cleaned text holds nothing but whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_map.len()
    }

    /// 1-based line number in the raw input for a 0-based cleaned line.
    #[must_use]
    pub fn source_line(&self, line: usize) -> usize {
        self.line_map
            .get(line)
            .or_else(|| self.line_map.last())
            .copied()
            .unwrap_or(1)
    }

    /// 1-based page number of a 0-based cleaned line.
    #[must_use]
    pub fn page_of_line(&self, line: usize) -> u32 {
        let pages = self.page_starts.partition_point(|&start| start <= line);
        u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
    }

    /// Number of pages detected (at least one).
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page_starts.len()
    }
}

/// Normalize raw (possibly OCR'd) text.
#[must_use]
pub fn normalize(raw: &str) -> NormalizedText {
    let uses_form_feeds = raw.contains('\u{c}');
    let mut lines: Vec<String> = Vec::new();
    let mut line_map = Vec::new();
    let mut page_starts = vec![0usize];
    let mut page_has_content = false;
    let mut previous_blank = true;

    for (index, raw_line) in raw.split('\n').enumerate() {
        let source_line = index + 1;

        let feeds = raw_line.matches('\u{c}').count();
        for _ in 0..feeds {
            start_page(&mut page_starts, lines.len());
            page_has_content = false;
            previous_blank = true;
        }

        let cleaned = clean_line(raw_line);

        if PAGE_MARKER.is_match(&cleaned) {
            // Without form feeds a marker after content is a footer: the
            // next line starts a new page. A marker before content is a
            // header of the page already started.
            if !uses_form_feeds && page_has_content {
                start_page(&mut page_starts, lines.len());
                page_has_content = false;
                previous_blank = true;
            }
            continue;
        }

        if cleaned.is_empty() {
            if previous_blank {
                continue;
            }
            previous_blank = true;
        } else {
            previous_blank = false;
            page_has_content = true;
        }

        lines.push(cleaned);
        line_map.push(source_line);
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
        line_map.pop();
    }

    NormalizedText {
        text: lines.join("\n"),
        line_map,
        page_starts,
    }
}

fn start_page(page_starts: &mut Vec<usize>, next_line: usize) {
    if page_starts.last() == Some(&next_line) {
        // Consecutive breaks with nothing between them do not create empty pages.
        return;
    }
    page_starts.push(next_line);
}

fn clean_line(raw_line: &str) -> String {
    let mut mapped = String::with_capacity(raw_line.len());
    for ch in raw_line.chars() {
        match ch {
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}'
            | '\u{2212}' | '\u{fe58}' | '\u{fe63}' | '\u{ff0d}' => mapped.push('-'),
            '\u{2018}' | '\u{2019}' | '\u{201a}' | '\u{2032}' => mapped.push('\''),
            '\u{201c}' | '\u{201d}' | '\u{201e}' | '\u{2033}' => mapped.push('"'),
            '\u{ff1a}' => mapped.push(':'),
            '\u{ff1b}' => mapped.push(';'),
            '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{feff}' => {}
            c if c.is_whitespace() => mapped.push(' '),
            c if c.is_control() => {}
            c => mapped.push(c),
        }
    }

    let punctuated = KEYWORD_PUNCT.replace_all(&mapped, "${1}: ");
    let repaired = repair_name_tokens(&punctuated);
    collapse_whitespace(&repaired)
}

fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Undo digit-for-letter OCR confusions inside tokens that look like names.
fn repair_name_tokens(line: &str) -> Cow<'_, str> {
    if !line.chars().any(|c| matches!(c, '0' | '1' | '8')) {
        return Cow::Borrowed(line);
    }

    let mut out = String::with_capacity(line.len());
    let mut token_start: Option<usize> = None;
    for (index, ch) in line.char_indices() {
        if ch.is_ascii_alphanumeric() {
            token_start.get_or_insert(index);
        } else {
            if let Some(start) = token_start.take() {
                out.push_str(&repair_token(&line[start..index]));
            }
            out.push(ch);
        }
    }
    if let Some(start) = token_start {
        out.push_str(&repair_token(&line[start..]));
    }
    Cow::Owned(out)
}

fn repair_token(token: &str) -> Cow<'_, str> {
    if !is_name_like(token) {
        return Cow::Borrowed(token);
    }

    let upper = token
        .chars()
        .filter(char::is_ascii_alphabetic)
        .all(|c| c.is_ascii_uppercase());
    let repaired = token
        .chars()
        .enumerate()
        .map(|(position, ch)| match (ch, position == 0 || upper) {
            ('0', true) => 'O',
            ('1', true) => 'I',
            ('8', _) if position == 0 || upper => 'B',
            ('0', false) => 'o',
            ('1', false) => 'l',
            ('8', false) => 'b',
            (other, _) => other,
        })
        .collect();
    Cow::Owned(repaired)
}

fn is_name_like(token: &str) -> bool {
    let letters = token.chars().filter(char::is_ascii_alphabetic).count();
    let digits = token.chars().filter(char::is_ascii_digit).count();
    if token.len() < 4 || letters < 3 || digits == 0 || digits >= letters {
        return false;
    }
    if ORDINAL.is_match(token) {
        return false;
    }
    if token
        .chars()
        .any(|c| c.is_ascii_digit() && !matches!(c, '0' | '1' | '8'))
    {
        return false;
    }

    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(first), _) if first.is_ascii_uppercase() => true,
        (Some('0' | '1' | '8'), Some(second)) => second.is_ascii_lowercase(),
        _ => false,
    }
}
