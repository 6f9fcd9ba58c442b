use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::Table;
use serde::Serialize;
use tracing::{info, info_span, trace};

use censo_classify::Buckets;
use censo_cli::logging::redact_value;
use censo_cli::request::selection_events;
use censo_core::{CensusSession, GeneratedReport, ReportKind};
use censo_model::{Extraction, SkipCounts};
use censo_standards::{RuleSet, load_rules};

use crate::cli::{ReportArgs, RulesArgs, SpecialtiesArgs};
use crate::summary::apply_table_style;
use crate::types::{CensusOverview, ReportResult, SpecialtySummary};

pub fn load_rule_set(path: Option<&Path>) -> Result<Arc<RuleSet>> {
    let rules = load_rules(path).context("load rules")?;
    Ok(Arc::new(rules))
}

/// Extract a census and summarize it. Returns `None` when JSON was printed.
pub fn run_specialties(
    args: &SpecialtiesArgs,
    rules: Arc<RuleSet>,
) -> Result<Option<CensusOverview>> {
    let span = info_span!("specialties", input = %args.input.display());
    let _guard = span.enter();
    let session = open_session(&args.input, rules)?;

    if args.json {
        #[derive(Serialize)]
        struct Overview<'a> {
            patients: usize,
            skipped: SkipCounts,
            buckets: &'a Buckets,
        }
        let overview = Overview {
            patients: session.extraction().patient_count(),
            skipped: session.extraction().skipped,
            buckets: session.buckets(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&overview).context("serialize overview")?
        );
        return Ok(None);
    }

    Ok(Some(CensusOverview {
        patients: session.extraction().patient_count(),
        skipped: session.extraction().skipped,
        specialties: specialty_summaries(session.buckets(), session.extraction()),
    }))
}

pub fn run_report(
    kind: ReportKind,
    args: &ReportArgs,
    rules: Arc<RuleSet>,
) -> Result<ReportResult> {
    let span = info_span!("report", %kind, input = %args.input.display());
    let _guard = span.enter();

    let mut session = open_session(&args.input, rules)?;
    for event in selection_events(
        args.selection.all,
        &args.selection.coordination,
        &args.selection.specialty,
        session.buckets(),
    ) {
        session.apply(event);
    }

    let report_date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let generated = session
        .generate(kind, report_date)
        .with_context(|| format!("generate {kind} report"))?;
    trace_rows(session.extraction(), &generated);

    let output = output_path(args.output.as_deref(), &generated.file_name);
    std::fs::write(&output, &generated.bytes)
        .with_context(|| format!("write {}", output.display()))?;
    info!(output = %output.display(), bytes = generated.bytes.len(), "workbook saved");

    let specialties = specialty_summaries(session.buckets(), session.extraction())
        .into_iter()
        .filter(|summary| generated.specialties.contains(&summary.specialty))
        .collect();

    Ok(ReportResult {
        kind,
        output,
        report_date: report_date.format("%d/%m/%Y").to_string(),
        rows: generated.rows,
        sheets: generated.sheets,
        specialties,
    })
}

pub fn run_rules(args: &RulesArgs, rules: &RuleSet) -> Result<()> {
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(rules).context("serialize rules")?
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Priority", "Therapy unit", "Home coordination"]);
    apply_table_style(&mut table);
    for (priority, unit) in rules.therapy_units.iter().enumerate() {
        table.add_row(vec![
            (priority + 1).to_string(),
            unit.name.clone(),
            unit.home.code().to_string(),
        ]);
    }
    println!("{table}");

    let mut table = Table::new();
    table.set_header(vec!["Bed rule", "Specialty"]);
    apply_table_style(&mut table);
    for rule in &rules.resolver.bed_prefix {
        table.add_row(vec![format!("{}xx", rule.prefix), rule.specialty.clone()]);
    }
    for rule in &rules.resolver.bed_range {
        table.add_row(vec![
            format!("{}-{}", rule.start, rule.end),
            rule.specialty.clone(),
        ]);
    }
    println!("{table}");

    let mut table = Table::new();
    table.set_header(vec!["Coordination", "Keywords"]);
    apply_table_style(&mut table);
    table.add_row(vec![
        "PEDIATRIA (markers)".to_string(),
        rules.classifier.pediatric_markers.join(", "),
    ]);
    for entry in &rules.classifier.catalog {
        table.add_row(vec![
            entry.coordination.code().to_string(),
            entry.keywords.join(", "),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn open_session(input: &Path, rules: Arc<RuleSet>) -> Result<CensusSession> {
    CensusSession::open_path(input, rules)
        .with_context(|| format!("read census {}", input.display()))
}

fn output_path(requested: Option<&Path>, file_name: &str) -> PathBuf {
    match requested {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

fn patient_counts(extraction: &Extraction) -> BTreeMap<&str, usize> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &extraction.records {
        *counts.entry(record.specialty.as_str()).or_default() += 1;
    }
    counts
}

fn specialty_summaries(buckets: &Buckets, extraction: &Extraction) -> Vec<SpecialtySummary> {
    let counts = patient_counts(extraction);
    buckets
        .iter()
        .flat_map(|(coordination, specialties)| {
            specialties.iter().map(move |specialty| (coordination, specialty))
        })
        .map(|(coordination, specialty)| SpecialtySummary {
            coordination,
            specialty: specialty.clone(),
            patients: counts.get(specialty.as_str()).copied().unwrap_or(0),
        })
        .collect()
}

fn trace_rows(extraction: &Extraction, generated: &GeneratedReport) {
    for record in extraction.records_in(&generated.specialties) {
        trace!(
            bed = %record.bed,
            specialty = %record.specialty,
            registry = redact_value(&record.registry_id),
            name = redact_value(&record.name),
            "row exported"
        );
    }
}
