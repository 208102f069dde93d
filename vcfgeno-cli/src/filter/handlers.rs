use std::fs::File;
use std::io::{BufWriter, Write, stdin, stdout};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use vcfgeno_core::models::GenotypeMatrix;
use vcfgeno_core::utils::get_dynamic_reader_w_stdin;
use vcfgeno_filter::consts::{DEFAULT_LOG_FILE, DEFAULT_OUT};
use vcfgeno_filter::{Cascade, FilterThresholds};

use super::prompt::prompt_for_thresholds;

pub fn run_filter(matches: &ArgMatches) -> Result<()> {
    // get arguments from CLI
    let vcf = matches
        .get_one::<String>("vcf")
        .expect("A path to a VCF file is required.");

    let default_out = DEFAULT_OUT.to_string();
    let output = matches.get_one::<String>("output").unwrap_or(&default_out);

    let log_path = match matches.get_one::<String>("log") {
        Some(log) => PathBuf::from(log),
        None => default_log_path(vcf),
    };

    // coerce arguments to types
    let thresholds = resolve_thresholds(matches, vcf)?;
    info!(
        "Thresholds (individual missing, marker missing, heterozygosity, maf): {:?}",
        thresholds.as_array()
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed}] {msg}")?
            .tick_strings(&["-", "\\", "|", "/"]),
    );

    spinner.set_message(format!("Loading {}...", vcf));
    let reader = get_dynamic_reader_w_stdin(vcf)
        .with_context(|| format!("Failed to open VCF: {}", vcf))?;
    let matrix = GenotypeMatrix::from_reader(reader)
        .with_context(|| format!("Failed to load VCF: {}", vcf))?;

    let (table, report) = Cascade::new(thresholds)
        .run_with(matrix, |stage| {
            spinner.set_message(stage.to_string());
            spinner.inc(1);
        })
        .context("Filter cascade failed")?;
    spinner.finish_and_clear();

    table
        .to_csv(output)
        .with_context(|| format!("Failed to write output: {}", output))?;
    report
        .to_log_file(&log_path)
        .with_context(|| format!("Failed to write log file: {}", log_path.display()))?;

    if let Some(report_path) = matches.get_one::<String>("report") {
        let file = File::create(report_path)
            .with_context(|| format!("Failed to create report: {}", report_path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writer
            .flush()
            .with_context(|| format!("Failed to write report: {}", report_path))?;
    }

    info!(
        "Wrote {} markers x {} individuals to {}",
        table.shape().0,
        table.shape().1,
        output
    );

    Ok(())
}

///
/// Thresholds from `--filters`, then `--config`, otherwise asked for interactively.
///
/// The prompt reads stdin, so it is unavailable when the VCF itself comes from stdin.
///
fn resolve_thresholds(matches: &ArgMatches, vcf: &str) -> Result<FilterThresholds> {
    if let Some(filters) = matches.get_one::<String>("filters") {
        return filters
            .parse::<FilterThresholds>()
            .with_context(|| format!("Invalid --filters: {}", filters));
    }

    if let Some(config) = matches.get_one::<String>("config") {
        return FilterThresholds::from_toml_file(Path::new(config))
            .with_context(|| format!("Invalid thresholds config: {}", config));
    }

    if vcf == "-" {
        bail!("Reading the VCF from stdin requires thresholds via --filters or --config");
    }

    prompt_for_thresholds(stdin().lock(), stdout())
}

///
/// `vcfLog.log` in the directory of the input file.
///
fn default_log_path(vcf: &str) -> PathBuf {
    Path::new(vcf)
        .parent()
        .filter(|p| vcf != "-" && !p.as_os_str().is_empty())
        .map(|p| p.join(DEFAULT_LOG_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::{read_to_string, write};

    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::tempdir;

    use crate::filter::cli::create_filter_cli;

    const PANEL: &str = "##fileformat=VCFv4.2\n\
        #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tInd1\tInd2\tInd3\tInd4\n\
        1\t100\t.\tA\tG\t.\tPASS\t.\tGT\t0/0\t./.\t0/1\t1/1\n\
        1\t200\t.\tA\tG\t.\tPASS\t.\tGT\t0/1\t./.\t0/0\t1/1\n\
        1\t300\t.\tA\tG,T\t.\tPASS\t.\tGT\t0/1\t./.\t0/0\t1/1\n\
        2\t50\t.\tA\tG\t.\tPASS\t.\tGT\t1/1\t./.\t0/0\t0/1\n";

    #[rstest]
    #[case("data/run/panel.vcf", "data/run/vcfLog.log")]
    #[case("panel.vcf.gz", "vcfLog.log")]
    #[case("-", "vcfLog.log")]
    fn test_default_log_path(#[case] vcf: &str, #[case] expected: &str) {
        assert_eq!(default_log_path(vcf), PathBuf::from(expected));
    }

    #[rstest]
    fn test_run_filter_writes_outputs() {
        let dir = tempdir().unwrap();
        let vcf = dir.path().join("panel.vcf");
        write(&vcf, PANEL).unwrap();
        let output = dir.path().join("geno.csv");
        let report = dir.path().join("report.json");

        let matches = create_filter_cli()
            .try_get_matches_from([
                "filter",
                vcf.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
                "--filters",
                "0.5,0.3,0.4,0.05",
                "--report",
                report.to_str().unwrap(),
            ])
            .unwrap();

        run_filter(&matches).unwrap();

        assert_eq!(
            read_to_string(&output).unwrap(),
            "ID,Ind1,Ind3,Ind4\n1_100,0,1,2\n1_200,1,0,2\n2_50,2,0,1\n"
        );

        let log = read_to_string(dir.path().join("vcfLog.log")).unwrap();
        assert!(log.contains("Ind2\t1\n"));

        let json: serde_json::Value =
            serde_json::from_str(&read_to_string(&report).unwrap()).unwrap();
        assert_eq!(json["shape_after"], serde_json::json!([3, 3]));
    }

    #[rstest]
    fn test_run_filter_with_config() {
        let dir = tempdir().unwrap();
        let vcf = dir.path().join("panel.vcf");
        write(&vcf, PANEL).unwrap();
        let config = dir.path().join("thresholds.toml");
        write(
            &config,
            "individual_missing_max = 0.5\nmarker_missing_max = 0.3\nheterozygosity_max = 0.4\nmaf_min = 0.05\n",
        )
        .unwrap();
        let output = dir.path().join("geno.csv.gz");
        let log = dir.path().join("logs.txt");

        let matches = create_filter_cli()
            .try_get_matches_from([
                "filter",
                vcf.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
                "--config",
                config.to_str().unwrap(),
                "--log",
                log.to_str().unwrap(),
            ])
            .unwrap();

        run_filter(&matches).unwrap();

        assert!(output.exists());
        assert!(read_to_string(&log).unwrap().starts_with("Missing individual filter: 0.5"));
    }

    #[rstest]
    fn test_run_filter_rejects_out_of_range_filters() {
        let matches = create_filter_cli()
            .try_get_matches_from(["filter", "panel.vcf", "--filters", "0.5,0.3,1.4,0.05"])
            .unwrap();

        let err = run_filter(&matches).unwrap_err();
        assert!(format!("{:#}", err).contains("heterozygosity_max"));
    }

    #[rstest]
    fn test_stdin_input_requires_thresholds_on_command_line() {
        let matches = create_filter_cli()
            .try_get_matches_from(["filter", "-"])
            .unwrap();

        let err = run_filter(&matches).unwrap_err();
        assert!(err.to_string().contains("--filters or --config"));
    }

    #[rstest]
    fn test_stdin_input_with_filters_resolves_thresholds() {
        let matches = create_filter_cli()
            .try_get_matches_from(["filter", "-", "--filters", "0.5,0.3,0.4,0.05"])
            .unwrap();

        let thresholds = resolve_thresholds(&matches, "-").unwrap();
        assert_eq!(thresholds.as_array(), [0.5, 0.3, 0.4, 0.05]);
    }

    #[rstest]
    fn test_filters_and_config_conflict() {
        let result = create_filter_cli().try_get_matches_from([
            "filter",
            "panel.vcf",
            "--filters",
            "0.5,0.3,0.4,0.05",
            "--config",
            "thresholds.toml",
        ]);
        assert!(result.is_err());
    }
}
