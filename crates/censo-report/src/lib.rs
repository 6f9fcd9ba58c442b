//! Report assembly and xlsx rendering for the bed census.
//!
//! Two reports are produced from the same selected records:
//! - the general census ([`assemble`] + [`write_census_workbook`]),
//! - the supplies report ([`assemble_supplies`] + [`write_supplies_workbook`]).

#![deny(unsafe_code)]

pub mod assemble;
pub mod error;
pub mod length_of_stay;
pub mod supplies;
pub mod xlsx;

pub use assemble::{
    BedKey, CENSUS_COLUMNS, CensusReport, CensusRow, assemble, report_order, specialty_rank,
};
pub use error::{ReportError, Result};
pub use length_of_stay::{
    CENSUS_DATE_FORMAT, LengthOfStay, length_of_stay, length_of_stay_from_str, parse_census_date,
};
pub use supplies::{
    SUPPLY_COLUMNS, SheetNames, SuppliesReport, SupplyRow, SupplySheet, ValidityWindow,
    assemble_supplies, default_supply_selection, precaution_for, sanitize_sheet_name,
    supplies_title, validity_window,
};
pub use xlsx::{
    census_file_name, column_widths, supplies_file_name, write_census_workbook,
    write_supplies_workbook,
};
