use quasispecies_tools::clusters::{export_as_labeled_sequences, renormalize_percentages, write_clusters};
use quasispecies_tools::{ClusterDiversityEngine, CutoffMetric, DiversityError};
use std::io::Write;

// Five haplotypes from an amplicon run, the last two below a 1% error rate.
const CLUSTERS: &str = "\
>Hap1;size=5200_52.0%
ACGTACGTACGTTTGA
>Hap2;size=3100_31.0%
ACGTACGAACGTTTGA
>Hap3;size=1560_15.6%
ACGTACGAACGTTAGA
>Hap4;size=90_0.9%
ACGTTCGAACGTTAGA
>Hap5;size=50_0.5%
ACGTACGTACCTTTGA
";

fn write_fixture(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create fixture");
    file.write_all(content.as_bytes()).expect("write fixture");
    file.flush().expect("flush fixture");
    file
}

#[test]
fn paper_example_from_disk() {
    let fixture = write_fixture(">ReadA;size=180_90.0%\nAAATTTCCCGGG\n>ReadB;size=20_10.0%\nTTTAAATTTGGG\n");
    let engine = ClusterDiversityEngine::from_path(fixture.path()).expect("load clusters");

    assert_eq!(engine.len(), 2);
    assert_eq!(engine.total_reads(), 200);
    assert_eq!(engine.simpsons_index().unwrap(), 0.82);
    assert_eq!(engine.simpsons_index_of_diversity().unwrap(), 0.18);
    assert_eq!(engine.shannon_entropy(0.0).unwrap(), 0.469);
}

#[test]
fn filter_then_renormalize_then_reload() {
    let fixture = write_fixture(CLUSTERS);
    let engine = ClusterDiversityEngine::from_path(fixture.path()).unwrap();
    assert_eq!(engine.total_reads(), 10_000);

    let kept = engine.filter_by_relative_abundance(0.01).unwrap();
    assert_eq!(kept.len(), 3);
    let renormalized = renormalize_percentages(&kept).unwrap();
    let sum: f64 = renormalized.iter().map(|r| r.percentage).sum();
    assert!((sum - 100.0).abs() < 0.03, "sum was {}", sum);

    let out = tempfile::NamedTempFile::new().unwrap();
    write_clusters(&renormalized, out.reopen().unwrap()).unwrap();
    let reloaded = ClusterDiversityEngine::from_path(out.path()).unwrap();

    assert_eq!(reloaded.len(), 3);
    for (before, after) in kept.iter().zip(reloaded.records()) {
        assert_eq!(before.name, after.name);
        assert_eq!(before.sequence, after.sequence);
        assert_eq!(before.read_count, after.read_count);
    }
    // the original engine is untouched by filtering
    assert_eq!(engine.len(), 5);
}

#[test]
fn entropy_cutoff_matches_haplotype_count() {
    let engine = ClusterDiversityEngine::from_reader(CLUSTERS.as_bytes()).unwrap();
    let count = engine
        .count_haplotypes_above_cutoff(CutoffMetric::Percentage, 1.0)
        .unwrap();
    assert_eq!((count.above, count.total), (3, 5));

    let filtered = engine.shannon_entropy(1.0).unwrap();
    let unfiltered = engine.shannon_entropy(0.0).unwrap();
    assert!(filtered > 0.0 && filtered <= 1.0);
    assert!(unfiltered > 0.0 && unfiltered <= 1.0);
    assert_ne!(filtered, unfiltered);

    let by_reads = engine
        .count_haplotypes_above_cutoff(CutoffMetric::NumberReads, 90.0)
        .unwrap();
    assert_eq!(by_reads.above, 4);
}

#[test]
fn labels_use_canonical_annotation() {
    let engine = ClusterDiversityEngine::from_reader(CLUSTERS.as_bytes()).unwrap();
    let labeled = export_as_labeled_sequences(engine.records());
    assert_eq!(labeled[0].0, "Hap1;size=5200_52.00%");
    assert_eq!(labeled[4].0, "Hap5;size=50_0.50%");
    assert_eq!(labeled[4].1, "ACGTACGTACCTTTGA");
}

#[test]
fn header_without_annotation_aborts_load() {
    let fixture = write_fixture(">Hap1;size=10_50.0%\nACGT\n>Hap2\nACGA\n");
    match ClusterDiversityEngine::from_path(fixture.path()) {
        Err(DiversityError::MalformedRecord { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected MalformedRecord, got {:?}", other.map(|e| e.len())),
    }
}

#[test]
fn empty_file_loads_as_empty_population() {
    for content in ["", "\n"] {
        let fixture = write_fixture(content);
        let engine = ClusterDiversityEngine::from_path(fixture.path()).expect("load empty clusters");

        assert_eq!(engine.len(), 0);
        assert!(matches!(
            engine.simpsons_index(),
            Err(DiversityError::EmptyPopulation(_))
        ));
    }
}
