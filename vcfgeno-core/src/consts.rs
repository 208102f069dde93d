pub const VCF_META_PREFIX: &str = "##";
pub const VCF_HEADER_PREFIX: &str = "#CHROM";
pub const VCF_DELIMITER: char = '\t';
pub const VCF_FIXED_COLUMNS: [&str; 9] = [
    "CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT",
];
pub const VCF_MISSING_ALT: &str = ".";
pub const VCF_ALT_DELIMITER: char = ',';

pub const GT_FIELD_DELIMITER: char = ':';
pub const MISSING_SYMBOL: &str = ".";
pub const MARKER_ID_SEPARATOR: &str = "_";

pub const OUTPUT_ID_COLUMN: &str = "ID";
