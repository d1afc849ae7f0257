//! One-shot subcommands. Each writes plain text to `out`.

use std::io::Write;

use anyhow::{Context as _, Result, bail};
use chrono::Local;
use deficit_core::{
  Error,
  catalog::{Catalog, Substance},
  history::HistoryStore,
  scoring::{self, ScoreResult},
  selection::Selection,
  store::KeyValueStore,
};

pub const NO_RESULT_HINT: &str =
  "No clear result was found. Please consult a doctor.";
pub const EMPTY_SELECTION_HINT: &str = "Please select at least one symptom.";

/// `deficit symptoms`
pub fn symptoms(catalog: &Catalog, out: &mut impl Write) -> Result<()> {
  for entry in catalog.symptoms() {
    writeln!(out, "{:<22} {}", entry.id, entry.label)?;
  }
  Ok(())
}

/// `deficit score <SYMPTOM>... [--save]`
pub fn score<S: KeyValueStore>(
  catalog: &Catalog,
  history: &mut HistoryStore<S>,
  symptoms: &[String],
  save: bool,
  out: &mut impl Write,
) -> Result<()> {
  let selection: Selection = symptoms.iter().cloned().collect();
  for symptom in selection.iter() {
    if catalog.symptom_label(symptom).is_none() {
      writeln!(out, "note: unknown symptom {symptom:?} ignored")?;
    }
  }

  let results = match scoring::score(catalog, &selection) {
    Ok(results) => results,
    Err(Error::EmptySelection) => {
      writeln!(out, "{EMPTY_SELECTION_HINT}")?;
      return Ok(());
    }
    Err(e) => return Err(e).context("scoring failed"),
  };
  write_results(&results, out)?;

  if save {
    history
      .save_session(&selection, &results)
      .context("could not save results")?;
    writeln!(out, "\nResults saved.")?;
  }
  Ok(())
}

/// `deficit history`
pub fn history<S: KeyValueStore>(
  catalog: &Catalog,
  history: &HistoryStore<S>,
  out: &mut impl Write,
) -> Result<()> {
  let records = history.load_history().context("reading history")?;
  if records.is_empty() {
    writeln!(out, "No saved results.")?;
    return Ok(());
  }
  for (i, record) in records.iter().enumerate() {
    let date = record.date.with_timezone(&Local).format("%Y-%m-%d %H:%M");
    writeln!(out, "{:>2}. {date}  {}", i + 1, record.summary())?;
    let labels = record
      .symptoms
      .iter()
      .map(|s| catalog.symptom_label(s).unwrap_or(s))
      .collect::<Vec<_>>()
      .join(", ");
    writeln!(out, "    {labels}")?;
  }
  Ok(())
}

/// `deficit replay <N>`. `position` is 1-based, newest first.
pub fn replay<S: KeyValueStore>(
  catalog: &Catalog,
  history: &HistoryStore<S>,
  position: usize,
  out: &mut impl Write,
) -> Result<()> {
  let Some(index) = position.checked_sub(1) else {
    bail!("history positions start at 1");
  };
  match history.replay(catalog, index).context("replaying history")? {
    Some(results) => write_results(&results, out),
    None => bail!("no saved result at position {position}"),
  }
}

/// `deficit favorite <ID>`
pub fn favorite<S: KeyValueStore>(
  catalog: &Catalog,
  history: &mut HistoryStore<S>,
  id: &str,
  out: &mut impl Write,
) -> Result<()> {
  let substance = catalog
    .get_substance(id)
    .with_context(|| format!("unknown substance {id:?}"))?;
  let now = history
    .toggle_favorite(id)
    .context("could not update favorites")?;
  let verb = if now { "added to" } else { "removed from" };
  writeln!(out, "{} {verb} favorites.", substance.name)?;
  Ok(())
}

/// `deficit favorites`
pub fn favorites<S: KeyValueStore>(
  catalog: &Catalog,
  history: &HistoryStore<S>,
  out: &mut impl Write,
) -> Result<()> {
  if history.favorites().is_empty() {
    writeln!(out, "No favorites yet.")?;
  }
  for id in history.favorites() {
    match catalog.get_substance(id.as_str()) {
      Ok(s) => writeln!(out, "{} {} ({})", s.icon, s.name, s.id)?,
      Err(_) => writeln!(out, "? {id} (not in catalog)")?,
    }
  }
  Ok(())
}

/// `deficit theme [dark|light]`
pub fn theme<S: KeyValueStore>(
  history: &mut HistoryStore<S>,
  set: Option<bool>,
  out: &mut impl Write,
) -> Result<()> {
  if let Some(dark) = set {
    history
      .set_theme(dark)
      .context("could not save theme preference")?;
  }
  let label = if history.theme() { "dark" } else { "light" };
  writeln!(out, "{label}")?;
  Ok(())
}

/// `deficit show <ID>`
pub fn show<S: KeyValueStore>(
  catalog: &Catalog,
  history: &HistoryStore<S>,
  id: &str,
  out: &mut impl Write,
) -> Result<()> {
  let substance = catalog
    .get_substance(id)
    .with_context(|| format!("unknown substance {id:?}"))?;
  write_detail(substance, history.is_favorite(id), out)
}

// ─── Formatting ──────────────────────────────────────────────────────────────

/// Ranked result cards, or the no-result hint.
pub fn write_results(results: &[ScoreResult], out: &mut impl Write) -> Result<()> {
  if results.is_empty() {
    writeln!(out, "{NO_RESULT_HINT}")?;
    return Ok(());
  }
  for (rank, r) in results.iter().enumerate() {
    let s = &r.substance;
    writeln!(
      out,
      "{}. {} {} ({})  likelihood: {}  [{} symptom(s), {:.0}%]",
      rank + 1,
      s.icon,
      s.name,
      s.scientific_name,
      r.band(),
      r.support_count,
      r.confidence * 100.0
    )?;
    writeln!(out, "   symptoms: {}", s.card_symptoms().join(", "))?;
    writeln!(out, "   sources:  {}", s.card_sources().join(", "))?;
    writeln!(out, "   daily:    {}", s.daily_requirement)?;
  }
  if let Some(text) = scoring::share_text(results) {
    writeln!(out, "\n{text}")?;
  }
  Ok(())
}

fn write_detail(
  s: &Substance,
  favorite: bool,
  out: &mut impl Write,
) -> Result<()> {
  let heart = if favorite { " ♥" } else { "" };
  writeln!(out, "{} {} ({}){heart}", s.icon, s.name, s.scientific_name)?;
  writeln!(out, "category: {}  severity: {}/3", s.category, s.severity)?;
  writeln!(out, "\nDeficiency symptoms:")?;
  for line in &s.detailed_symptoms {
    writeln!(out, "  - {line}")?;
  }
  writeln!(out, "\nFood sources: {}", s.sources.join(", "))?;
  writeln!(out, "Daily requirement: {}", s.daily_requirement)?;
  writeln!(out, "\nMost at risk:")?;
  for group in &s.risk_groups {
    writeln!(out, "  - {group}")?;
  }
  Ok(())
}
