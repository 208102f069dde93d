/// Missing-data ceiling of the first, fixed individual pass.
pub const INITIAL_INDIVIDUAL_MISSING_CEILING: f64 = 0.5;

pub const DEFAULT_LOG_FILE: &str = "vcfLog.log";
pub const DEFAULT_OUT: &str = "vcfgeno.csv";

pub const THRESHOLD_DELIMITER: char = ',';
pub const THRESHOLD_NAMES: [&str; 4] = [
    "individual_missing_max",
    "marker_missing_max",
    "heterozygosity_max",
    "maf_min",
];
