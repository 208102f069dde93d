use clap::{Arg, Command, arg};

pub const FILTER_CMD: &str = "filter";

pub fn create_filter_cli() -> Command {
    Command::new(FILTER_CMD)
        .about("Run the missing-data, heterozygosity and minor allele frequency filter cascade over a VCF and write a 0/1/2 genotype table.")
        .arg(
            Arg::new("vcf")
                .required(true)
                .help("VCF file to filter (.vcf or .vcf.gz), or '-' for stdin"),
        )
        .arg(arg!(--output <output>).help("Output CSV (gzip-compressed if it ends in .gz)"))
        .arg(
            arg!(--filters <filters>)
                .help("Thresholds as 'individual_missing,marker_missing,heterozygosity,maf', e.g. 0.2,0.3,0.4,0.05")
                .conflicts_with("config"),
        )
        .arg(arg!(--config <config>).help("TOML file with the four thresholds"))
        .arg(arg!(--log <log>).help("Run log (defaults to vcfLog.log next to the input)"))
        .arg(arg!(--report <report>).help("Also write the run report as JSON"))
}
