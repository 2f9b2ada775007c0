//! Plain aligned tables for `--format table`.

const MIN_COLUMN: usize = 5;
const GAP: &str = "  ";

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Rows of string cells under a header line.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Missing trailing cells render as `-`.
    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn render(&self, options: TableOptions) -> String {
        let mut widths = self.natural_widths();
        shrink_to_fit(&mut widths, &self.headers, options.max_width);

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        let header = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(text, width)| pad(&clip(text, *width), *width, false))
            .collect::<Vec<_>>()
            .join(GAP);
        let divider = "-".repeat(header.chars().count());
        lines.push(header);
        lines.push(divider);

        for row in &self.rows {
            let cells = widths
                .iter()
                .enumerate()
                .map(|(index, width)| {
                    let text = clip(row.get(index).map_or("-", String::as_str), *width);
                    let padded = pad(&text, *width, is_numeric(&text));
                    if options.color {
                        paint(&padded, &text)
                    } else {
                        padded
                    }
                })
                .collect::<Vec<_>>();
            lines.push(cells.join(GAP).trim_end().to_string());
        }

        lines.join("\n")
    }

    fn natural_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| cell.chars().count())
                    .chain([header.chars().count(), MIN_COLUMN])
                    .max()
                    .unwrap_or(MIN_COLUMN)
            })
            .collect()
    }
}

/// Narrow the widest shrinkable column one character at a time until the
/// table fits.
fn shrink_to_fit(widths: &mut [usize], headers: &[String], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };
    let gaps = widths.len().saturating_sub(1) * GAP.len();

    while widths.iter().sum::<usize>() + gaps > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(index, width)| **width > headers[*index].chars().count().max(MIN_COLUMN))
            .max_by_key(|(_, width)| **width)
            .map(|(index, _)| index);
        let Some(index) = widest else {
            break;
        };
        widths[index] -= 1;
    }
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(text: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{text:>width$}")
    } else {
        format!("{text:<width$}")
    }
}

fn is_numeric(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && text.chars().all(|ch| ch.is_ascii_digit() || ch == '-')
}

/// Color outcome and status words; everything else is left alone.
fn paint(padded: &str, word: &str) -> String {
    let code = match word.to_ascii_lowercase().as_str() {
        "pass" | "adopted" | "accepted" | "extracted" | "true" => "32",
        "review" | "pending" | "continued" | "tabled" | "skipped" | "tie" => "33",
        "fail" | "failed" | "unextracted" | "false" => "31",
        _ => return padded.to_string(),
    };
    format!("\u{1b}[{code}m{padded}\u{1b}[0m")
}
