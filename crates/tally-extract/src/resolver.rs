//! Member name resolution against the roster seated on the meeting date.
//!
//! Stages, first hit wins:
//! 1. exact match on a seated member's name, full name, or surname; a bare
//!    `Mayor` / `Mayor Pro Tem` resolves to the title holder
//! 2. exact match on a registered alias
//! 3. match after folding common OCR confusions (`0`/`o`, `1`/`l`/`i`, `rn`/`m`, ...)
//! 4. Jaro-Winkler similarity above the threshold, clear of the runner-up
//!
//! Only members whose term covers the meeting date are candidates. A name
//! that matches several members equally well stays unresolved.

use chrono::NaiveDate;
use tally_config::ResolverConfig;
use tally_core::enums::{ResolutionMethod, Title};
use tally_core::ids::MemberId;
use tally_roster::RosterStore;

use crate::patterns::names::strip_honorific;

/// A resolved name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub member: MemberId,
    pub method: ResolutionMethod,
}

#[derive(Debug)]
struct Candidate<'r> {
    id: &'r MemberId,
    /// Canonical name, full name, and surname, normalized.
    names: Vec<String>,
    aliases: Vec<String>,
}

impl Candidate<'_> {
    fn keys(&self) -> impl Iterator<Item = &str> {
        self.names.iter().chain(&self.aliases).map(String::as_str)
    }
}

/// Resolves raw name tokens for one meeting date.
#[derive(Debug)]
pub struct MemberResolver<'r> {
    date: NaiveDate,
    candidates: Vec<Candidate<'r>>,
    mayor: Option<&'r MemberId>,
    mayor_pro_tem: Option<&'r MemberId>,
    threshold: f64,
    margin: f64,
}

impl<'r> MemberResolver<'r> {
    #[must_use]
    pub fn new(roster: &'r RosterStore, date: NaiveDate, config: &ResolverConfig) -> Self {
        let candidates = roster
            .seated_members(date)
            .into_iter()
            .map(|seated| {
                let member = seated.member;
                let mut names = vec![plain(&member.name)];
                if let Some(full) = &member.full_name {
                    names.push(plain(full));
                    if let Some(surname) = full.split_whitespace().last() {
                        names.push(plain(surname));
                    }
                }
                names.retain(|name| !name.is_empty());
                names.dedup();
                Candidate {
                    id: &member.id,
                    names,
                    aliases: member.aliases.iter().map(|a| plain(a)).collect(),
                }
            })
            .collect();

        Self {
            date,
            candidates,
            mayor: roster.holder_of(Title::Mayor, date).map(|m| &m.id),
            mayor_pro_tem: roster.holder_of(Title::MayorProTem, date).map(|m| &m.id),
            threshold: config.fuzzy_threshold,
            margin: config.ambiguity_margin,
        }
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Members seated on the meeting date, in seat order.
    pub fn seated(&self) -> impl Iterator<Item = &MemberId> {
        self.candidates.iter().map(|c| c.id)
    }

    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.candidates.len()
    }

    /// Resolve one raw token. The same token always resolves the same way.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Option<Resolution> {
        let key = plain(raw);
        if key.is_empty() {
            return None;
        }

        if let Some(holder) = self.title_holder(&key) {
            return Some(Resolution {
                member: holder.clone(),
                method: ResolutionMethod::Exact,
            });
        }

        let stripped = plain(strip_honorific(raw));
        // `J. Lopez` or `Michele Tinajero`: also try the last word alone.
        let last_word = stripped
            .rsplit(' ')
            .next()
            .filter(|word| *word != stripped)
            .map(str::to_string);
        let forms: Vec<String> = std::iter::once(stripped.clone()).chain(last_word).collect();

        let found = forms.iter().find_map(|form| self.exact(form)).or_else(|| {
            forms
                .iter()
                .find_map(|form| self.folded(form))
                .or_else(|| self.fuzzy(&forms[0]))
        });

        match &found {
            Some(resolution) => tracing::trace!(
                raw,
                member = %resolution.member,
                method = %resolution.method,
                "name resolved"
            ),
            None => tracing::debug!(raw, date = %self.date, "name unresolved"),
        }
        found
    }

    fn title_holder(&self, key: &str) -> Option<&'r MemberId> {
        match key {
            "mayor" => self.mayor,
            "mayor pro tem" | "mayor pro tempore" | "vice mayor" => self.mayor_pro_tem,
            _ => None,
        }
    }

    fn exact(&self, form: &str) -> Option<Resolution> {
        unique(
            self.candidates
                .iter()
                .filter(|c| c.names.iter().any(|n| n == form))
                .map(|c| c.id),
        )
        .map(|member| Resolution {
            member,
            method: ResolutionMethod::Exact,
        })
        .or_else(|| {
            unique(
                self.candidates
                    .iter()
                    .filter(|c| c.aliases.iter().any(|a| a == form))
                    .map(|c| c.id),
            )
            .map(|member| Resolution {
                member,
                method: ResolutionMethod::Alias,
            })
        })
    }

    fn folded(&self, form: &str) -> Option<Resolution> {
        let folded = fold_ocr(form);
        unique(
            self.candidates
                .iter()
                .filter(|c| c.keys().any(|key| fold_ocr(key) == folded))
                .map(|c| c.id),
        )
        .map(|member| Resolution {
            member,
            method: ResolutionMethod::OcrCorrected,
        })
    }

    fn fuzzy(&self, form: &str) -> Option<Resolution> {
        let folded = fold_ocr(form);
        let mut scored: Vec<(f64, &MemberId)> = self
            .candidates
            .iter()
            .map(|c| {
                let best = c
                    .keys()
                    .map(|key| strsim::jaro_winkler(&folded, &fold_ocr(key)))
                    .fold(0.0_f64, f64::max);
                (best, c.id)
            })
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));

        let (best, member) = *scored.first()?;
        let runner_up = scored.get(1).map_or(0.0, |(score, _)| *score);
        if best >= self.threshold && best - runner_up >= self.margin {
            Some(Resolution {
                member: member.clone(),
                method: ResolutionMethod::Fuzzy,
            })
        } else {
            None
        }
    }
}

/// The single distinct id in `ids`, if exactly one.
fn unique<'a>(ids: impl Iterator<Item = &'a MemberId>) -> Option<MemberId> {
    let mut ids = ids;
    let first = ids.next()?;
    if ids.any(|other| other != first) {
        return None;
    }
    Some(first.clone())
}

/// Lowercase, ASCII-fold common accents, keep letters, digits, `|` and
/// single spaces.
fn plain(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars().flat_map(char::to_lowercase) {
        let ch = match ch {
            'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        };
        if ch.is_ascii_alphanumeric() || ch == '|' {
            out.push(ch);
        } else if (ch.is_whitespace() || ch == '-' || ch == '.') && !out.ends_with(' ') {
            out.push(' ');
        }
    }
    out.trim().to_string()
}

/// Collapse characters OCR commonly confuses onto one representative.
fn fold_ocr(plain: &str) -> String {
    let replaced = plain.replace("rn", "m").replace("vv", "w").replace("cl", "d");
    replaced
        .chars()
        .filter_map(|ch| match ch {
            '0' => Some('o'),
            '1' | 'i' | '|' | '!' => Some('l'),
            '3' => Some('e'),
            '4' => Some('a'),
            '5' => Some('s'),
            '6' => Some('g'),
            '7' => Some('t'),
            '8' => Some('b'),
            ' ' => None,
            other => Some(other),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ROSTER: &str = r#"
[[members]]
id = "tinajero"
name = "Tinajero"
full_name = "Michele Tinajero"
aliases = ["Tinaj3ro"]

[[members]]
id = "penaloza"
name = "Penaloza"
full_name = "Thai Viet Peñaloza"

[[members]]
id = "sarmiento"
name = "Sarmiento"

[[members]]
id = "hernandez"
name = "Hernandez"

[[members]]
id = "hernandes"
name = "Hernandes"

[[members]]
id = "newcomer"
name = "Newcomer"

[[terms]]
member = "tinajero"
seat = "Ward 1"
title = "member"
start = "2016-12-06"

[[terms]]
member = "penaloza"
seat = "Ward 2"
title = "member"
start = "2018-12-04"

[[terms]]
member = "sarmiento"
seat = "Mayor"
title = "mayor"
start = "2020-12-01"

[[terms]]
member = "hernandez"
seat = "Ward 3"
title = "member"
start = "2020-12-01"

[[terms]]
member = "hernandes"
seat = "Ward 4"
title = "member"
start = "2020-12-01"

[[terms]]
member = "newcomer"
seat = "Ward 5"
title = "member"
start = "2023-01-01"
"#;

    fn resolver(roster: &RosterStore) -> MemberResolver<'_> {
        let date = NaiveDate::from_ymd_opt(2021, 3, 2).unwrap();
        MemberResolver::new(roster, date, &ResolverConfig::default())
    }

    fn resolve(resolver: &MemberResolver<'_>, raw: &str) -> Option<(String, ResolutionMethod)> {
        resolver
            .resolve(raw)
            .map(|r| (r.member.as_str().to_string(), r.method))
    }

    #[test]
    fn exact_alias_and_title() {
        let roster = RosterStore::from_toml_str(ROSTER).unwrap();
        let resolver = resolver(&roster);
        assert_eq!(
            resolve(&resolver, "Tinajero"),
            Some(("tinajero".into(), ResolutionMethod::Exact))
        );
        assert_eq!(
            resolve(&resolver, "Tinaj3ro"),
            Some(("tinajero".into(), ResolutionMethod::Alias))
        );
        assert_eq!(
            resolve(&resolver, "Mayor"),
            Some(("sarmiento".into(), ResolutionMethod::Exact))
        );
        assert_eq!(
            resolve(&resolver, "Peñaloza"),
            Some(("penaloza".into(), ResolutionMethod::Exact))
        );
    }

    #[test]
    fn ocr_folding_and_fuzzy() {
        let roster = RosterStore::from_toml_str(ROSTER).unwrap();
        let resolver = resolver(&roster);
        assert_eq!(
            resolve(&resolver, "5armient0"),
            Some(("sarmiento".into(), ResolutionMethod::OcrCorrected))
        );
        assert_eq!(
            resolve(&resolver, "Sarmeinto"),
            Some(("sarmiento".into(), ResolutionMethod::Fuzzy))
        );
    }

    #[test]
    fn near_ties_stay_unresolved() {
        let roster = RosterStore::from_toml_str(ROSTER).unwrap();
        let resolver = resolver(&roster);
        assert_eq!(resolve(&resolver, "Hernandex"), None);
    }

    #[test]
    fn members_not_seated_on_the_date_never_match() {
        let roster = RosterStore::from_toml_str(ROSTER).unwrap();
        let resolver = resolver(&roster);
        assert_eq!(resolve(&resolver, "Newcomer"), None);
        assert_eq!(resolver.seat_count(), 5);
    }

    #[test]
    fn resolution_is_deterministic() {
        let roster = RosterStore::from_toml_str(ROSTER).unwrap();
        let first = resolver(&roster).resolve("Tinajer0");
        let second = resolver(&roster).resolve("Tinajer0");
        assert_eq!(first, second);
    }
}
