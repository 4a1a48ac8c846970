//! End-to-end pipeline tests: configuration to follow-up decision.

mod support;

use serde_json::json;

use support::{program_document, swift_alert, FailingProvider, ScriptedProvider};
use transient_followup::config::ScienceConfig;
use transient_followup::models::Site;
use transient_followup::pipeline::Pipeline;
use transient_followup::plugins::PluginRegistry;

fn load(document: &serde_json::Value, plugins: &PluginRegistry) -> ScienceConfig {
    ScienceConfig::from_json(document, plugins).unwrap()
}

#[test]
fn test_accepted_alert_gets_pointing_pattern() {
    let plugins = PluginRegistry::new();
    let program = load(&program_document("grb", 100), &plugins);
    let site = Site::cta_north();
    let provider = ScriptedProvider::clear_night();
    let pipeline = Pipeline::new(&site, &provider, &plugins);

    let alert = swift_alert();
    let outcomes = pipeline.process(&alert, std::slice::from_ref(&program), alert.received_time);
    assert_eq!(outcomes.len(), 1);
    let outcome = &outcomes[0];

    assert!(outcome.accepted);
    assert!(outcome.window.valid);

    // 4 wobble blocks splitting the 40-minute exposure cap.
    let pattern = outcome.pointing.as_ref().unwrap();
    assert_eq!(pattern.blocks.len(), 4);
    for block in &pattern.blocks {
        assert!((block.exposure.value() - 10.0 / 60.0).abs() < 1e-9);
    }
    assert_eq!(pattern.blocks[0].ra.value(), alert.coords.ra.value() + 0.5);
    assert_eq!(pattern.blocks[3].dec.value(), alert.coords.dec.value() + 0.5);
}

#[test]
fn test_rejected_alert_gets_no_pointing() {
    let plugins = PluginRegistry::new();
    let program = load(&program_document("grb", 100), &plugins);
    let site = Site::cta_north();
    let provider = ScriptedProvider::daytime();
    let pipeline = Pipeline::new(&site, &provider, &plugins);

    let alert = swift_alert();
    let outcomes = pipeline.process(&alert, std::slice::from_ref(&program), alert.received_time);
    assert!(!outcomes[0].accepted);
    assert!(outcomes[0].pointing.is_none());
}

#[test]
fn test_outcomes_ordered_by_descending_priority() {
    let plugins = PluginRegistry::new();
    let programs = vec![
        load(&program_document("backup", 10), &plugins),
        load(&program_document("prime", 100), &plugins),
    ];
    let site = Site::cta_north();
    let provider = ScriptedProvider::clear_night();
    let pipeline = Pipeline::new(&site, &provider, &plugins);

    let alert = swift_alert();
    let outcomes = pipeline.process(&alert, &programs, alert.received_time);
    let names: Vec<&str> = outcomes.iter().map(|o| o.program.as_str()).collect();
    assert_eq!(names, vec!["prime", "backup"]);
}

#[test]
fn test_non_matching_alert_type_is_ignored() {
    let plugins = PluginRegistry::new();
    let mut document = program_document("fermi_only", 100);
    document["AllowedAlertTypes"] = json!({ "FERMI": ["GBM_Flt_Pos"] });
    let program = load(&document, &plugins);
    let site = Site::cta_north();
    let provider = ScriptedProvider::clear_night();
    let pipeline = Pipeline::new(&site, &provider, &plugins);

    let alert = swift_alert();
    let outcomes = pipeline.process(&alert, std::slice::from_ref(&program), alert.received_time);
    assert!(outcomes.is_empty());
}

#[test]
fn test_ephemeris_failure_rejects_program_without_panicking() {
    let plugins = PluginRegistry::new();
    let program = load(&program_document("grb", 100), &plugins);
    let site = Site::cta_north();
    let pipeline = Pipeline::new(&site, &FailingProvider, &plugins);

    let alert = swift_alert();
    let outcomes = pipeline.process(&alert, std::slice::from_ref(&program), alert.received_time);
    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].accepted);
    assert!(!outcomes[0].window.valid);
    // Cuts stayed unevaluated.
    assert!(outcomes[0].cuts.common().iter().all(|c| !c.state.performed));
}

#[test]
fn test_wobble_candidates_all_accepted() {
    let plugins = PluginRegistry::with_builtins();
    let mut document = program_document("grb_custom", 100);
    document["ObservationConfig"]["UseCustomCoords"] = json!(true);
    document["ProcessingCuts"]["CustomCuts"] = json!({
        "swift_grb.GRB_selection": ["true", "=="],
        "swift_grb.Custom_coords": ["true", "=="]
    });
    let program = load(&document, &plugins);
    let site = Site::cta_north();
    let provider = ScriptedProvider::clear_night();
    let pipeline = Pipeline::new(&site, &provider, &plugins);

    let alert = swift_alert();
    let outcomes = pipeline.process(&alert, std::slice::from_ref(&program), alert.received_time);
    let outcome = &outcomes[0];

    assert!(outcome.accepted);
    assert_eq!(outcome.custom_coordinates.len(), 4);
    for (i, candidate) in outcome.custom_coordinates.iter().enumerate() {
        let expected_ra = alert.coords.ra.value() + i as f64 * 0.1;
        assert!((candidate.ra.value() - expected_ra).abs() < 1e-9);
        assert_eq!(candidate.dec, alert.coords.dec);
    }

    // With UseCustomCoords the pattern points at the vetted positions,
    // not at wobble offsets around the nominal target.
    let pattern = outcome.pointing.as_ref().unwrap();
    assert_eq!(pattern.blocks.len(), 4);
    for (block, candidate) in pattern.blocks.iter().zip(&outcome.custom_coordinates) {
        assert_eq!(block.ra, candidate.ra);
        assert_eq!(block.dec, candidate.dec);
    }
}

#[test]
fn test_one_bad_wobble_candidate_fails_the_whole_cut() {
    let plugins = PluginRegistry::with_builtins();
    let mut document = program_document("grb_custom", 100);
    document["ProcessingCuts"]["CustomCuts"] = json!({
        "swift_grb.Custom_coords": ["true", "=="]
    });
    let program = load(&document, &plugins);
    let site = Site::cta_north();
    // Candidates at RA offsets 0.2 and 0.3 degrees never rise.
    let provider = ScriptedProvider {
        blocked_ra_above: Some(alert_ra() + 0.15),
        ..ScriptedProvider::clear_night()
    };
    let pipeline = Pipeline::new(&site, &provider, &plugins);

    let alert = swift_alert();
    let outcomes = pipeline.process(&alert, std::slice::from_ref(&program), alert.received_time);
    let outcome = &outcomes[0];

    // Partial success is total failure: no candidates surface.
    assert!(!outcome.accepted);
    assert!(outcome.custom_coordinates.is_empty());
    let cut = &outcome.cuts.custom()[0];
    assert!(cut.state.performed);
    assert!(!cut.state.passed);
}

fn alert_ra() -> f64 {
    swift_alert().coords.ra.value()
}
