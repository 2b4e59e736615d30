pub mod submission;
pub mod export;

pub use submission::{parse_priority, DivisionRequest, PirateEdit, RawCount, TreasureForm};
pub use export::{export_results_to_csv, results_to_csv_string};
