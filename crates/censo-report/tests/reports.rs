//! Assembly and rendering of both report kinds.

use std::collections::BTreeSet;

use censo_model::PatientRecord;
use censo_report::{
    LengthOfStay, ReportError, assemble, assemble_supplies, default_supply_selection,
    supplies_title, validity_window, write_census_workbook, write_supplies_workbook,
};
use censo_standards::{RuleSet, ValidityPolicy, load_default_rules};
use chrono::NaiveDate;
use proptest::prelude::*;

fn rules() -> RuleSet {
    load_default_rules().expect("default rules")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn record(bed: &str, specialty: &str, admission: &str) -> PatientRecord {
    PatientRecord {
        bed: bed.to_string(),
        registry_id: format!("R{bed}00"),
        name: format!("PACIENTE {bed}"),
        sex: "M".to_string(),
        age: "60".to_string(),
        diagnosis: "DX".to_string(),
        admission_date: admission.to_string(),
        specialty: specialty.to_string(),
    }
}

fn selection(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

fn records() -> Vec<PatientRecord> {
    vec![
        record("502", "CARDIOLOGIA", "01/03/2024"),
        record("7402", "TERAPIA POSQUIRURGICA", "29/02/2024"),
        record("A-1", "CARDIOLOGIA", "28/02/2024"),
        record("6401", "UNIDAD CORONARIA", "31/02/2024"),
        record("98", "CARDIOLOGIA", "01/03/2024"),
        record("7301", "UCIA", "01/03/2024"),
        record("901", "ONCOLOGIA MEDICA", "25/02/2024"),
        record("903", "HEMATOLOGIA", "01/03/2024"),
    ]
}

#[test]
fn census_rows_follow_therapy_priority_then_name_then_bed() {
    let rules = rules();
    let selected = selection(&[
        "CARDIOLOGIA",
        "TERAPIA POSQUIRURGICA",
        "UNIDAD CORONARIA",
        "UCIA",
    ]);
    let report = assemble(&records(), &selected, date(2024, 3, 1), &rules).expect("assemble");
    let order: Vec<(&str, &str)> = report
        .rows
        .iter()
        .map(|row| (row.specialty.as_str(), row.bed.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("UNIDAD CORONARIA", "6401"),
            ("UCIA", "7301"),
            ("TERAPIA POSQUIRURGICA", "7402"),
            ("CARDIOLOGIA", "98"),
            ("CARDIOLOGIA", "502"),
            ("CARDIOLOGIA", "A-1"),
        ]
    );
}

#[test]
fn impossible_admission_date_needs_review_but_row_is_kept() {
    let rules = rules();
    let report = assemble(
        &records(),
        &selection(&["UNIDAD CORONARIA", "TERAPIA POSQUIRURGICA"]),
        date(2024, 3, 1),
        &rules,
    )
    .expect("assemble");
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].length_of_stay, LengthOfStay::NeedsReview);
    assert_eq!(report.rows[1].length_of_stay, LengthOfStay::Days(2));
    assert_eq!(report.needs_review_count(), 1);
    assert_eq!(report.report_date_text(), "01/03/2024");
}

#[test]
fn empty_selection_and_empty_result_are_errors() {
    let rules = rules();
    let err = assemble(&records(), &BTreeSet::new(), date(2024, 3, 1), &rules)
        .expect_err("empty selection");
    assert!(matches!(err, ReportError::EmptySelection));

    let err = assemble(&records(), &selection(&["UROLOGIA"]), date(2024, 3, 1), &rules)
        .expect_err("empty result");
    assert!(matches!(err, ReportError::EmptyResultSet));

    let err = assemble_supplies(&records(), &selection(&["UROLOGIA"]), date(2024, 3, 1), &rules)
        .expect_err("empty supplies");
    assert!(matches!(err, ReportError::EmptyResultSet));
}

#[test]
fn supplies_default_selection_uses_filter() {
    let rules = rules();
    let observed = selection(&["CARDIOLOGIA", "ONCOLOGIA MEDICA", "HEMATOLOGIA", "UCIA"]);
    let selected = default_supply_selection(&observed, &rules.supplies);
    assert_eq!(selected, selection(&["HEMATOLOGIA", "ONCOLOGIA MEDICA"]));
}

#[test]
fn supplies_sheets_carry_precaution_and_title() {
    let rules = rules();
    let report = assemble_supplies(
        &records(),
        &selection(&["ONCOLOGIA MEDICA", "HEMATOLOGIA"]),
        date(2024, 3, 6),
        &rules,
    )
    .expect("supplies");

    assert_eq!(report.sheets.len(), 2);
    assert_eq!(report.sheets[0].specialty, "HEMATOLOGIA");
    assert_eq!(report.sheets[0].rows[0].precaution, "ESTÁNDAR");
    assert_eq!(report.sheets[1].specialty, "ONCOLOGIA MEDICA");
    assert_eq!(report.sheets[1].rows[0].precaution, "ESTÁNDAR / PROTECTOR");
    assert_eq!(report.sheets[1].rows[0].supply_item, "JABÓN/SANITAS");
    insta::assert_snapshot!(
        report.sheets[1].title,
        @"ONCOLOGIA MEDICA DEL 11/03/2024 AL 17/03/2024 (PARA LOS 3 TURNOS Y FINES DE SEMANA)"
    );
}

#[test]
fn rolling_title_starts_on_report_date() {
    let window = validity_window(date(2024, 3, 6), ValidityPolicy::Rolling, 7);
    insta::assert_snapshot!(
        supplies_title("HEMATOLOGIA", &window, "(PARA LOS 3 TURNOS Y FINES DE SEMANA)"),
        @"HEMATOLOGIA DEL 06/03/2024 AL 13/03/2024 (PARA LOS 3 TURNOS Y FINES DE SEMANA)"
    );
}

#[test]
fn workbooks_are_xlsx_archives() {
    let rules = rules();
    let report = assemble(
        &records(),
        &selection(&["CARDIOLOGIA", "UNIDAD CORONARIA"]),
        date(2024, 3, 1),
        &rules,
    )
    .expect("assemble");
    let bytes = write_census_workbook(&report, &rules.report).expect("census workbook");
    assert!(bytes.starts_with(b"PK"));

    let supplies = assemble_supplies(
        &records(),
        &selection(&["ONCOLOGIA MEDICA"]),
        date(2024, 3, 1),
        &rules,
    )
    .expect("supplies");
    let bytes = write_supplies_workbook(&supplies, &rules.supplies).expect("supplies workbook");
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn census_without_length_of_stay_column() {
    let mut rules = rules();
    rules.report.include_length_of_stay = false;
    let report = assemble(&records(), &selection(&["UCIA"]), date(2024, 3, 1), &rules)
        .expect("assemble");
    let bytes = write_census_workbook(&report, &rules.report).expect("census workbook");
    assert!(bytes.starts_with(b"PK"));
}

proptest! {
    #[test]
    fn upcoming_week_window_is_monday_to_sunday(offset in 0i64..3650) {
        use chrono::{Datelike, Weekday};
        let report_date = date(2020, 1, 1) + chrono::Duration::days(offset);
        let window = validity_window(report_date, ValidityPolicy::UpcomingWeek, 7);
        prop_assert_eq!(window.start.weekday(), Weekday::Mon);
        prop_assert_eq!(window.end.weekday(), Weekday::Sun);
        prop_assert!(window.start >= report_date);
        prop_assert!((window.start - report_date).num_days() < 7);
    }

    #[test]
    fn length_of_stay_counts_inclusively(days in -400i64..20000) {
        let report_date = date(2024, 6, 30);
        let admission = report_date - chrono::Duration::days(days);
        let text = admission.format("%d/%m/%Y").to_string();
        prop_assert_eq!(
            censo_report::length_of_stay_from_str(&text, report_date),
            LengthOfStay::Days(days + 1)
        );
    }
}
