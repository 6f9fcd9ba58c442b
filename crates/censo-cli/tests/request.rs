//! Integration tests for turning CLI flags into a session selection.

use std::collections::BTreeSet;
use std::sync::Arc;

use censo_classify::SelectionEvent;
use censo_cli::request::{parse_report_date, selection_events};
use censo_core::{CensusSession, ReportKind};
use censo_model::Coordination;
use censo_standards::load_default_rules;

fn header_row(text: &str) -> String {
    format!("<tr><td colspan=\"10\">ESPECIALIDAD: {text}</td></tr>")
}

fn patient_row(bed: &str, registry: &str) -> String {
    format!(
        "<tr><td>{bed}</td><td>{registry}</td><td>PACIENTE {bed}</td><td>M</td><td>61</td>\
         <td>-</td><td>NEUMONIA</td><td>-</td><td>-</td><td>01/03/2024</td></tr>"
    )
}

fn session() -> CensusSession {
    let html = format!(
        "<html><body><table>{}</table></body></html>",
        [
            header_row("CARDIOLOGIA"),
            patient_row("501", "A12345"),
            header_row("CIRUGIA GENERAL"),
            patient_row("820", "B67890"),
            patient_row("821", "C13579"),
        ]
        .concat()
    );
    let rules = Arc::new(load_default_rules().expect("default rules"));
    CensusSession::open(&html, rules).expect("census opens")
}

fn names(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

#[test]
fn coordination_flag_selects_its_specialties() {
    let mut session = session();
    for event in selection_events(false, &[Coordination::Cirugia], &[], session.buckets()) {
        session.apply(event);
    }
    assert_eq!(session.selected_specialties(), names(&["CIRUGIA GENERAL"]));
}

#[test]
fn all_flag_reaches_every_specialty() {
    let mut session = session();
    for event in selection_events(true, &[], &[], session.buckets()) {
        session.apply(event);
    }
    assert_eq!(
        session.selected_specialties(),
        names(&["CARDIOLOGIA", "CIRUGIA GENERAL"])
    );

    let date = parse_report_date("05/03/2024").expect("valid date");
    let report = session
        .generate(ReportKind::Census, date)
        .expect("census generates");
    assert_eq!(report.rows, 3);
    assert_eq!(report.file_name, "Censo_Epidemio_05032024.xlsx");
}

#[test]
fn absent_coordination_still_emits_event() {
    let session = session();
    let events = selection_events(false, &[Coordination::Terapias], &[], session.buckets());
    assert_eq!(
        events,
        vec![SelectionEvent::ToggleAll {
            coordination: Coordination::Terapias,
            selected: true
        }]
    );
}

#[test]
fn specialty_flag_is_case_insensitive() {
    let mut session = session();
    let flags = ["  cardiologia ".to_string()];
    for event in selection_events(false, &[], &flags, session.buckets()) {
        session.apply(event);
    }
    assert_eq!(session.selected_specialties(), names(&["CARDIOLOGIA"]));
}
