//! Unit tests for the catalog, selection, scoring, and browse modules.

use crate::{
  Error,
  browse::{Filter, filter_substances},
  catalog::{Catalog, Category, Substance, SubstanceId, SymptomEntry},
  scoring::{ConfidenceBand, MAX_RESULTS, score, share_text},
  selection::Selection,
};

fn substance(id: &str, category: Category) -> Substance {
  Substance {
    id:                SubstanceId::from(id),
    name:              format!("Name of {id}"),
    scientific_name:   format!("Scientia {id}"),
    category,
    symptoms:          vec!["a".into(), "b".into(), "c".into(), "d".into()],
    detailed_symptoms: Vec::new(),
    sources:           vec!["s1".into(), "s2".into()],
    daily_requirement: "some".into(),
    risk_groups:       Vec::new(),
    severity:          2,
    icon:              "*".into(),
  }
}

fn entry(id: &str, substances: &[&str]) -> SymptomEntry {
  SymptomEntry {
    id:         id.into(),
    label:      id.into(),
    substances: substances.iter().map(|&s| SubstanceId::from(s)).collect(),
  }
}

/// fatigue → [vitaminD, vitaminB12, iron], hairLoss → [vitaminB7, iron].
fn small_catalog() -> Catalog {
  Catalog::new(
    vec![
      substance("vitaminD", Category::Vitamin),
      substance("vitaminB12", Category::Vitamin),
      substance("vitaminB7", Category::Vitamin),
      substance("iron", Category::Mineral),
    ],
    vec![
      entry("fatigue", &["vitaminD", "vitaminB12", "iron"]),
      entry("hairLoss", &["vitaminB7", "iron"]),
    ],
  )
  .expect("valid catalog")
}

fn ids(results: &[crate::scoring::ScoreResult]) -> Vec<&str> {
  results.iter().map(|r| r.substance.id.as_str()).collect()
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[test]
fn builtin_catalog_loads() {
  let catalog = Catalog::builtin().expect("builtin catalog");
  assert_eq!(catalog.symptoms().len(), 24);
  assert_eq!(catalog.substances().len(), 17);
  assert_eq!(
    catalog.lookup_substances_for("fatigue"),
    &[
      SubstanceId::from("vitamin-d"),
      SubstanceId::from("vitamin-b12"),
      SubstanceId::from("iron"),
      SubstanceId::from("vitamin-c"),
    ]
  );
  assert_eq!(catalog.get_substance("iron").unwrap().category, Category::Mineral);
  assert_eq!(
    catalog.symptom_label("night-blindness"),
    Some("Poor night vision")
  );
}

#[test]
fn unknown_symptom_has_no_evidence() {
  let catalog = small_catalog();
  assert!(catalog.lookup_substances_for("sneezing").is_empty());
  assert!(catalog.symptom_label("sneezing").is_none());
}

#[test]
fn get_substance_missing_is_not_found() {
  let catalog = small_catalog();
  let err = catalog.get_substance("vitaminQ").unwrap_err();
  assert!(matches!(err, Error::NotFound(id) if id.as_str() == "vitaminQ"));
}

#[test]
fn catalog_rejects_dangling_reference() {
  let err = Catalog::new(
    vec![substance("iron", Category::Mineral)],
    vec![entry("fatigue", &["iron", "vitaminD"])],
  )
  .unwrap_err();
  assert!(matches!(err, Error::InvalidCatalog(msg) if msg.contains("vitaminD")));
}

#[test]
fn catalog_rejects_duplicates() {
  let dup_substance = Catalog::new(
    vec![
      substance("iron", Category::Mineral),
      substance("iron", Category::Mineral),
    ],
    Vec::new(),
  );
  assert!(matches!(dup_substance, Err(Error::InvalidCatalog(_))));

  let dup_evidence = Catalog::new(
    vec![substance("iron", Category::Mineral)],
    vec![entry("fatigue", &["iron", "iron"])],
  );
  assert!(matches!(dup_evidence, Err(Error::InvalidCatalog(_))));

  let dup_symptom = Catalog::new(
    vec![substance("iron", Category::Mineral)],
    vec![entry("fatigue", &["iron"]), entry("fatigue", &[])],
  );
  assert!(matches!(dup_symptom, Err(Error::InvalidCatalog(_))));
}

#[test]
fn catalog_rejects_out_of_range_severity() {
  let mut bad = substance("iron", Category::Mineral);
  bad.severity = 4;
  assert!(matches!(
    Catalog::new(vec![bad], Vec::new()),
    Err(Error::InvalidCatalog(_))
  ));
}

#[test]
fn catalog_json_accepts_plural_categories() {
  let json = r#"{
    "substances": [{
      "id": "zinc", "name": "Zinc", "scientific_name": "Zn",
      "category": "minerals", "symptoms": [], "detailed_symptoms": [],
      "sources": [], "daily_requirement": "8 mg", "risk_groups": [],
      "severity": 1, "icon": "z"
    }],
    "symptoms": [{ "id": "taste", "label": "Taste", "substances": ["zinc"] }]
  }"#;
  let catalog = Catalog::from_json(json).expect("parses");
  assert_eq!(catalog.get_substance("zinc").unwrap().category, Category::Mineral);
}

#[test]
fn card_helpers_truncate() {
  let s = substance("iron", Category::Mineral);
  assert_eq!(s.card_symptoms().len(), 3);
  assert_eq!(s.card_sources().len(), 2);
}

// ─── Selection ───────────────────────────────────────────────────────────────

#[test]
fn selection_keeps_unique_insertion_order() {
  let mut selection: Selection =
    ["hairLoss", "fatigue", "hairLoss"].into_iter().collect();
  assert_eq!(selection.as_slice(), &["hairLoss", "fatigue"]);

  assert!(!selection.add("fatigue"));
  assert!(!selection.toggle("hairLoss"));
  assert!(selection.toggle("hairLoss"));
  assert_eq!(selection.as_slice(), &["fatigue", "hairLoss"]);

  selection.clear();
  assert!(selection.is_empty());
}

// ─── Scoring ─────────────────────────────────────────────────────────────────

#[test]
fn fatigue_and_hair_loss_scenario() {
  let catalog = small_catalog();
  let selection: Selection = ["fatigue", "hairLoss"].into_iter().collect();

  let results = score(&catalog, &selection).unwrap();
  assert_eq!(ids(&results), ["iron", "vitaminD", "vitaminB12", "vitaminB7"]);

  assert_eq!(results[0].support_count, 2);
  assert_eq!(results[0].confidence, 1.0);
  assert_eq!(results[0].band(), ConfidenceBand::High);
  for r in &results[1..] {
    assert_eq!(r.support_count, 1);
    assert_eq!(r.confidence, 0.5);
    assert_eq!(r.band(), ConfidenceBand::Medium);
  }
}

#[test]
fn ties_follow_selection_order() {
  let catalog = small_catalog();
  let selection: Selection = ["hairLoss", "fatigue"].into_iter().collect();
  let results = score(&catalog, &selection).unwrap();
  assert_eq!(ids(&results), ["iron", "vitaminB7", "vitaminD", "vitaminB12"]);
}

#[test]
fn empty_selection_is_rejected() {
  let catalog = small_catalog();
  let err = score(&catalog, &Selection::new()).unwrap_err();
  assert!(matches!(err, Error::EmptySelection));
}

#[test]
fn unknown_symptom_contributes_nothing() {
  let catalog = small_catalog();

  let only_unknown: Selection = ["sneezing"].into_iter().collect();
  assert!(score(&catalog, &only_unknown).unwrap().is_empty());

  let mixed: Selection = ["fatigue", "sneezing"].into_iter().collect();
  let results = score(&catalog, &mixed).unwrap();
  assert_eq!(ids(&results), ["vitaminD", "vitaminB12", "iron"]);
  // The unknown symptom still counts towards |selection|.
  assert!(results.iter().all(|r| r.confidence == 0.5));
}

#[test]
fn builtin_results_are_capped_and_sorted() {
  let catalog = Catalog::builtin().unwrap();
  let selection: Selection =
    catalog.symptoms().iter().map(|e| e.id.clone()).collect();

  let results = score(&catalog, &selection).unwrap();
  assert_eq!(results.len(), MAX_RESULTS);
  assert!(results.windows(2).all(|w| w[0].support_count >= w[1].support_count));
  for r in &results {
    assert!(r.confidence > 0.0 && r.confidence <= 1.0);
    let expected = catalog
      .symptoms()
      .iter()
      .filter(|e| e.substances.contains(&r.substance.id))
      .count();
    assert_eq!(r.support_count, expected);
    assert_eq!(r.confidence, expected as f64 / selection.len() as f64);
  }
}

#[test]
fn builtin_tie_break_and_truncation() {
  let catalog = Catalog::builtin().unwrap();
  let selection: Selection = ["fatigue", "hair-loss"].into_iter().collect();
  let results = score(&catalog, &selection).unwrap();
  // zinc also has one vote but is cut by the five-result cap.
  assert_eq!(
    ids(&results),
    ["vitamin-d", "iron", "vitamin-b12", "vitamin-c", "vitamin-b7"]
  );
}

#[test]
fn confidence_band_boundaries() {
  assert_eq!(ConfidenceBand::of(1.0), ConfidenceBand::High);
  assert_eq!(ConfidenceBand::of(0.6), ConfidenceBand::High);
  assert_eq!(ConfidenceBand::of(0.59), ConfidenceBand::Medium);
  assert_eq!(ConfidenceBand::of(0.3), ConfidenceBand::Medium);
  assert_eq!(ConfidenceBand::of(0.29), ConfidenceBand::Low);
  assert_eq!(ConfidenceBand::High.to_string(), "high");
  assert_eq!("low".parse::<ConfidenceBand>().unwrap(), ConfidenceBand::Low);
}

#[test]
fn share_text_names_top_three() {
  let catalog = small_catalog();
  let selection: Selection = ["fatigue", "hairLoss"].into_iter().collect();
  let results = score(&catalog, &selection).unwrap();
  assert_eq!(
    share_text(&results).unwrap(),
    "Based on the symptoms, you may need: Name of iron, Name of vitaminD, Name of vitaminB12"
  );
  assert!(share_text(&[]).is_none());
}

// ─── Browse ──────────────────────────────────────────────────────────────────

#[test]
fn browse_filters_by_category_favorites_and_term() {
  let catalog = Catalog::builtin().unwrap();
  let none = |_: &str| false;

  let all = filter_substances(&catalog, Filter::All, "", none);
  assert_eq!(all.len(), 17);

  let minerals =
    filter_substances(&catalog, Filter::Category(Category::Mineral), "", none);
  assert_eq!(minerals.len(), 5);
  assert!(minerals.iter().all(|s| s.category == Category::Mineral));

  let favorites = filter_substances(&catalog, Filter::Favorites, "", |id| {
    id == "zinc" || id == "vitamin-c"
  });
  let fav_ids: Vec<_> = favorites.iter().map(|s| s.id.as_str()).collect();
  assert_eq!(fav_ids, ["vitamin-c", "zinc"]);

  // Scientific name matches case-insensitively.
  let by_science = filter_substances(&catalog, Filter::All, "COBALAMIN", none);
  assert_eq!(by_science.len(), 1);
  assert_eq!(by_science[0].id.as_str(), "vitamin-b12");

  // Display name matches as written.
  let by_name = filter_substances(&catalog, Filter::All, " Iron ", none);
  assert_eq!(by_name.len(), 1);
  assert!(filter_substances(&catalog, Filter::All, "iron", none).is_empty());
}

#[test]
fn filter_cycle_returns_to_all() {
  let mut filter = Filter::All;
  let mut seen = Vec::new();
  for _ in 0..4 {
    seen.push(filter.label());
    filter = filter.next();
  }
  assert_eq!(filter, Filter::All);
  assert_eq!(seen, ["all", "vitamins", "minerals", "favorites"]);
}
