pub mod coordination;
pub mod record;

pub use coordination::Coordination;
pub use record::{Extraction, PatientRecord, SkipCounts, UNCLASSIFIED_SPECIALTY};

#[cfg(test)]
mod tests {
    use super::*;

    fn record(bed: &str, specialty: &str) -> PatientRecord {
        PatientRecord {
            bed: bed.to_string(),
            registry_id: "A12345".to_string(),
            name: "PACIENTE".to_string(),
            sex: "F".to_string(),
            age: "40".to_string(),
            diagnosis: "DX".to_string(),
            admission_date: "01/01/2024".to_string(),
            specialty: specialty.to_string(),
        }
    }

    #[test]
    fn skip_counts_exclude_headers_from_dropped() {
        let counts = SkipCounts {
            headers: 4,
            noise: 2,
            short: 1,
            inadmissible: 3,
        };
        assert_eq!(counts.dropped(), 6);
    }

    #[test]
    fn records_in_keeps_document_order() {
        let extraction = Extraction {
            records: vec![
                record("501", "CARDIOLOGIA"),
                record("6401", "UNIDAD CORONARIA"),
                record("502", "CARDIOLOGIA"),
            ],
            observed: ["CARDIOLOGIA", "UNIDAD CORONARIA"]
                .into_iter()
                .map(String::from)
                .collect(),
            skipped: SkipCounts::default(),
        };
        let wanted = ["CARDIOLOGIA".to_string()].into_iter().collect();
        let beds: Vec<&str> = extraction
            .records_in(&wanted)
            .map(|r| r.bed.as_str())
            .collect();
        assert_eq!(beds, vec!["501", "502"]);
    }

    #[test]
    fn record_serializes() {
        let json = serde_json::to_string(&record("501", "CARDIOLOGIA")).expect("serialize record");
        let round: PatientRecord = serde_json::from_str(&json).expect("deserialize record");
        assert_eq!(round.specialty, "CARDIOLOGIA");
    }
}
