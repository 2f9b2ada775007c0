use chrono::NaiveDate;
use serde::Serialize;
use tally_config::TallyConfig;
use tally_extract::patterns::CompiledPatternSet;
use tally_extract::{PatternLibrary, PatternSet, VariantKind};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PatternsArgs;
use crate::commands::shared::load_library;
use crate::output::output;

/// One pattern set as shown by `tally patterns`.
#[derive(Debug, Serialize)]
struct SetView<'a> {
    label: String,
    city: &'a str,
    effective_from: Option<NaiveDate>,
    effective_to: Option<NaiveDate>,
    /// Variants in the order the extractor tries them.
    variants: Vec<VariantKind>,
}

/// Handle `tally patterns`.
///
/// With `--date`, shows the set selected for that meeting after checking it
/// compiles; without, lists every set in the library.
pub fn handle(args: &PatternsArgs, config: &TallyConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(path) = &args.patterns {
        config.patterns.library = Some(path.clone());
    }
    let library = load_library(&config)?;
    let city = args.city.as_deref().unwrap_or(&config.patterns.city);

    match args.date {
        Some(date) => output(&selected(&library, city, date)?, flags.format),
        None => {
            let views = library
                .sets
                .iter()
                .map(view)
                .collect::<anyhow::Result<Vec<_>>>()?;
            output(&views, flags.format)
        }
    }
}

fn selected<'a>(
    library: &'a PatternLibrary,
    city: &str,
    date: NaiveDate,
) -> anyhow::Result<SetView<'a>> {
    view(library.select(city, date))
}

fn view(set: &PatternSet) -> anyhow::Result<SetView<'_>> {
    let compiled = CompiledPatternSet::compile(set)?;
    Ok(SetView {
        label: set.label(),
        city: &set.city,
        effective_from: set.effective_from,
        effective_to: set.effective_to,
        variants: compiled.variants().to_vec(),
    })
}
