use std::io::Cursor;
use std::path::Path;

use rstest::*;
use tempfile::tempdir;

use vcfgeno_core::models::{Axis, GenotypeCode, GenotypeMatrix};
use vcfgeno_core::{GenotypeFrequencies, VcfGenoError};
use vcfgeno_filter::{
    Cascade, FilterStage, FilterThresholds, MissingDataFilter, RareAlleleFilter, StageKind,
};

const HEADER: &str = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT";

fn vcf(individuals: &[&str], rows: &[&[&str]]) -> GenotypeMatrix {
    let mut text = format!("##fileformat=VCFv4.2\n{}\t{}\n", HEADER, individuals.join("\t"));
    for (i, row) in rows.iter().enumerate() {
        text.push_str(&format!(
            "1\t{}\t.\tA\tG\t.\tPASS\t.\tGT\t{}\n",
            (i + 1) * 100,
            row.join("\t")
        ));
    }
    GenotypeMatrix::from_reader(Cursor::new(text)).unwrap()
}

fn survivors(matrix: &GenotypeMatrix) -> (Vec<String>, Vec<String>) {
    (
        matrix.markers().iter().map(|m| m.id.clone()).collect(),
        matrix.individuals().to_vec(),
    )
}

#[fixture]
fn path_to_panel() -> &'static str {
    "tests/data/panel.vcf"
}

#[fixture]
fn thresholds() -> FilterThresholds {
    "0.2,0.3,0.6,0.05".parse().unwrap()
}

mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[rstest]
    fn test_fully_missing_individual_is_removed_first() {
        let matrix = vcf(
            &["Ind1", "Ind2", "Ind3", "Ind4"],
            &[
                &["0/0", "./.", "0/1", "1/1"],
                &["0/1", "./.", "0/0", "1/1"],
                &["1/1", "./.", "0/0", "0/1"],
            ],
        );
        let thresholds = FilterThresholds::new(0.5, 0.3, 0.4, 0.05).unwrap();

        let (table, report) = Cascade::new(thresholds).run(matrix).unwrap();

        let first = &report.stages[0];
        assert_eq!(first.stage, "initial-individual-missing");
        assert_eq!(first.removed_ids().collect::<Vec<_>>(), vec!["Ind2"]);
        assert_eq!(first.failed[0].1, 1.0);
        assert_eq!(first.removed_percent, 25.0);

        assert_eq!(table.individuals(), &["Ind1", "Ind3", "Ind4"]);
        assert_eq!(table.shape(), (3, 3));
        assert!(report.stages[1..].iter().all(|s| s.removed == 0));
    }

    #[rstest]
    #[case(0.05, false)]
    #[case(0.0, true)]
    fn test_monomorphic_marker_and_maf_threshold(#[case] maf: f64, #[case] survives: bool) {
        let matrix = vcf(
            &["A", "B", "C", "D"],
            &[&["0/0", "0/0", "0/0", "0/0"], &["0/1", "0/0", "1/1", "0/0"]],
        );
        let thresholds = FilterThresholds::new(0.5, 0.5, 1.0, maf).unwrap();

        let (table, report) = Cascade::new(thresholds).run(matrix).unwrap();

        let ids: Vec<&str> = table.rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.contains(&"1_100"), survives);
        assert!(ids.contains(&"1_200"));

        let rare = report.stage("rare-allele").unwrap();
        assert_eq!(rare.kind, StageKind::RareAllele);
        assert_eq!(rare.removed, if survives { 0 } else { 1 });
    }

    #[rstest]
    fn test_stage_order_matters() {
        // Ind2 is missing everywhere: each marker is 25% missing until Ind2 is gone.
        let rows: &[&[&str]] = &[
            &["0/0", "./.", "0/1", "1/1"],
            &["0/1", "./.", "0/0", "0/0"],
            &["1/1", "./.", "0/1", "0/0"],
        ];
        let individuals = &["Ind1", "Ind2", "Ind3", "Ind4"];
        let s0 = MissingDataFilter::individuals(0.5);
        let s1 = MissingDataFilter::markers(0.2);

        // fixed order: individuals, then markers
        let mut fixed = vcf(individuals, rows);
        let summaries = fixed.summarize_both().unwrap();
        let (_, summaries) = s0.apply(&mut fixed, summaries).unwrap();
        s1.apply(&mut fixed, summaries).unwrap();

        // swapped: markers, then individuals
        let mut swapped = vcf(individuals, rows);
        let summaries = swapped.summarize_both().unwrap();
        let (_, summaries) = s1.apply(&mut swapped, summaries).unwrap();
        s0.apply(&mut swapped, summaries).unwrap();

        assert_eq!(
            survivors(&fixed),
            (
                vec!["1_100".into(), "1_200".into(), "1_300".into()],
                vec!["Ind1".into(), "Ind3".into(), "Ind4".into()]
            )
        );
        assert_eq!(survivors(&swapped).0, Vec::<String>::new());
        assert_ne!(survivors(&fixed), survivors(&swapped));
    }

    #[rstest]
    fn test_percentages_use_each_stages_own_population() {
        let matrix = vcf(
            &["Ind1", "Ind2", "Ind3", "Ind4"],
            &[
                &["0/0", "./.", "0/1", "./."],
                &["0/1", "./.", "0/0", "1/1"],
                &["1/1", "./.", "0/1", "0/0"],
            ],
        );
        let thresholds = FilterThresholds::new(0.3, 0.5, 0.9, 0.0).unwrap();

        let (table, report) = Cascade::new(thresholds).run(matrix).unwrap();

        let first = report.stage("initial-individual-missing").unwrap();
        assert_eq!((first.evaluated, first.removed), (4, 1));
        assert_eq!(first.removed_percent, 25.0);

        let last = report.stage("individual-missing").unwrap();
        assert_eq!((last.evaluated, last.removed), (3, 1));
        assert!((last.removed_percent - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(last.removed_ids().collect::<Vec<_>>(), vec!["Ind4"]);

        assert_eq!(table.individuals(), &["Ind1", "Ind3"]);
        assert_eq!(table.shape(), (3, 2));
    }

    #[rstest]
    fn test_unrecognized_genotype_aborts_cascade() {
        let matrix = vcf(&["A", "B"], &[&["0/0", "0|1"]]);
        let thresholds = FilterThresholds::new(0.5, 0.5, 0.5, 0.0).unwrap();

        let err = Cascade::new(thresholds).run(matrix).unwrap_err();
        assert!(matches!(err, VcfGenoError::UnrecognizedGenotypeAt { .. }));
    }

    #[rstest]
    fn test_empty_individual_pool_is_an_error() {
        let matrix = vcf(&["A", "B"], &[&["./.", "./."], &["./.", "./."]]);
        let thresholds = FilterThresholds::new(0.5, 0.5, 0.5, 0.0).unwrap();

        let err = Cascade::new(thresholds).run(matrix).unwrap_err();
        match err {
            VcfGenoError::EmptyEvaluation { stage, axis } => {
                assert_eq!(stage, "individual-missing");
                assert_eq!(axis, Axis::Individuals);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn test_stale_map_is_rejected_after_prune() {
        let mut matrix = vcf(&["A", "B", "C"], &[&["0/0", "./.", "0/1"], &["0/0", "0/0", "0/0"]]);
        let before = matrix.summarize(Axis::Markers).unwrap();

        let individuals = matrix.summarize(Axis::Individuals).unwrap();
        MissingDataFilter::individuals(0.4)
            .prune(&mut matrix, individuals)
            .unwrap();

        let err = RareAlleleFilter::new(0.1)
            .prune(&mut matrix, before)
            .unwrap_err();
        assert!(matches!(err, VcfGenoError::StaleFrequencyMap { .. }));
    }

    #[rstest]
    #[case("tests/data/panel.vcf")]
    #[case("tests/data/panel.vcf.gz")]
    fn test_cascade_on_panel(#[case] path: &str, thresholds: FilterThresholds) {
        let matrix = GenotypeMatrix::try_from(Path::new(path)).unwrap();
        assert_eq!(matrix.shape(), (5, 5));

        let mut seen: Vec<String> = Vec::new();
        let (table, report) = Cascade::new(thresholds)
            .run_with(matrix, |stage| seen.push(stage.stage.clone()))
            .unwrap();

        assert_eq!(
            seen,
            vec![
                "initial-individual-missing",
                "marker-missing",
                "heterozygosity",
                "rare-allele",
                "individual-missing"
            ]
        );

        let removed: Vec<Vec<&str>> = report
            .stages
            .iter()
            .map(|s| s.removed_ids().collect())
            .collect();
        assert_eq!(
            removed,
            vec![
                vec!["Ind2"],
                vec!["2_900"],
                vec!["2_500"],
                vec!["1_2000"],
                vec!["Ind4"]
            ]
        );
        assert_eq!(report.shape_before, (5, 5));
        assert_eq!(report.shape_after, (2, 3));

        assert_eq!(table.individuals(), &["Ind1", "Ind3", "Ind5"]);
        assert_eq!(table.get("1_1000", "Ind3"), Some(GenotypeCode::Het));
        assert_eq!(table.get("2_1500", "Ind1"), Some(GenotypeCode::HomAlt));

        let mut buffer: Vec<u8> = Vec::new();
        table.write_csv(&mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "ID,Ind1,Ind3,Ind5\n1_1000,0,1,0\n2_1500,2,0,1\n"
        );
    }

    #[rstest]
    fn test_run_log(path_to_panel: &str, thresholds: FilterThresholds) {
        let matrix = GenotypeMatrix::try_from(path_to_panel).unwrap();
        let (_, report) = Cascade::new(thresholds).run(matrix).unwrap();

        let dir = tempdir().unwrap();
        let log_path = dir.path().join("vcfLog.log");
        report.to_log_file(&log_path).unwrap();
        let log = std::fs::read_to_string(&log_path).unwrap();

        assert!(log.starts_with(
            "Missing individual filter: 0.2\n\
             Missing marker filter: 0.3\n\
             Maximum Heterozygosity filter: 0.6\n\
             Minimum Minor Allele Frequency: 0.05\n"
        ));
        assert!(log.contains("Failed individuals\nInd2\t0.8\n"));
        assert!(log.contains("No missing individuals data found for Ind5\n"));
        assert!(log.contains("Failed initial-individual-missing Percent: 20.00 of 5 individuals"));
        assert!(log.contains("Failed rare-allele Percent: 33.33 of 3 markers"));
        assert!(log.contains("Failed individual-missing Percent: 25.00 of 4 individuals"));
        // heterozygosity does not list entities
        assert!(!log.contains("2_500\t"));
    }

    #[rstest]
    fn test_report_serializes(path_to_panel: &str, thresholds: FilterThresholds) {
        let matrix = GenotypeMatrix::try_from(path_to_panel).unwrap();
        let (_, report) = Cascade::new(thresholds).run(matrix).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["thresholds"]["maf_min"], 0.05);
        assert_eq!(json["stages"][2]["kind"], "heterozygosity");
        assert_eq!(json["stages"][2]["axis"], "markers");
        assert_eq!(json["stages"].as_array().unwrap().len(), 5);
    }
}
