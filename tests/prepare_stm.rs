//! Integration tests for the STM preparation pipeline, driven through the
//! library API on scratch directories.

use std::collections::HashSet;

use stm_tools::stm::{self, append_suffix, CharHistogram};

fn write_table(dir: &std::path::Path, name: &str, rows: &str) {
    std::fs::write(dir.join(name), rows).unwrap();
}

#[test]
fn english_table_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    write_table(dir.path(), "rec_a.tsv", "0.500\t1.000\tSPK1\t(( uh hello))\n");

    let stem = dir.path().join("st-test");
    let report = stm::prepare_stm(dir.path(), &stem, "<eng>", "1", &HashSet::new()).unwrap();
    assert_eq!(report.emitted, 1);
    assert_eq!(report.excluded, 0);

    let raw = std::fs::read_to_string(append_suffix(&stem, ".raw.stm")).unwrap();
    assert_eq!(raw, "rec_a\t1\tSPK1\t0.500\t1.000\t<eng>\t(( uh hello))\n");

    let norm = std::fs::read_to_string(append_suffix(&stem, ".norm.stm")).unwrap();
    assert!(norm.ends_with("uh hello\n"));
    assert_eq!(norm, "rec_a\t1\tSPK1\t0.500\t1.000\t<eng>\t uh hello\n");
}

#[test]
fn excluded_rows_appear_in_no_output() {
    let dir = tempfile::tempdir().unwrap();
    write_table(
        dir.path(),
        "rec_a.tsv",
        "0.500\t1.000\tSPK1\tkeep me\n2.000\t3.000\tSPK1\tdrop me\n",
    );

    let exclusions: HashSet<String> = ["rec_a 2.000 3.000".to_string()].into_iter().collect();
    let stem = dir.path().join("st-test");
    let report = stm::prepare_stm(dir.path(), &stem, "<eng>", "1", &exclusions).unwrap();
    assert_eq!(report.emitted, 1);
    assert_eq!(report.excluded, 1);

    let raw = std::fs::read_to_string(append_suffix(&stem, ".raw.stm")).unwrap();
    let norm = std::fs::read_to_string(append_suffix(&stem, ".norm.stm")).unwrap();
    assert!(!raw.contains("drop me"));
    assert!(!norm.contains("drop me"));
    assert!(raw.contains("keep me"));
}

#[test]
fn output_sorted_by_file_then_numeric_time() {
    let dir = tempfile::tempdir().unwrap();
    // Times chosen so lexicographic order would be wrong: "10.0" < "2.0"
    write_table(
        dir.path(),
        "rec_b.tsv",
        "10.000\t11.000\tSPK1\tsecond in rec_b\n2.000\t3.000\tSPK1\tfirst in rec_b\n",
    );
    write_table(dir.path(), "rec_a.tsv", "400.000\t401.000\tSPK2\tonly in rec_a\n");

    let stem = dir.path().join("st-test");
    stm::prepare_stm(dir.path(), &stem, "<eng>", "1", &HashSet::new()).unwrap();

    let raw = std::fs::read_to_string(append_suffix(&stem, ".raw.stm")).unwrap();
    let texts: Vec<&str> = raw
        .lines()
        .map(|line| line.rsplit('\t').next().unwrap())
        .collect();
    assert_eq!(
        texts,
        vec!["only in rec_a", "first in rec_b", "second in rec_b"]
    );
}

#[test]
fn duplicate_start_times_keep_last_row() {
    let dir = tempfile::tempdir().unwrap();
    write_table(
        dir.path(),
        "rec_a.tsv",
        "1.500\t2.000\tSPK1\tsuperseded\n1.500\t2.500\tSPK1\tfinal version\n",
    );

    let stem = dir.path().join("st-test");
    let report = stm::prepare_stm(dir.path(), &stem, "<eng>", "1", &HashSet::new()).unwrap();
    assert_eq!(report.emitted, 1);

    let raw = std::fs::read_to_string(append_suffix(&stem, ".raw.stm")).unwrap();
    assert!(raw.contains("final version"));
    assert!(!raw.contains("superseded"));
}

#[test]
fn histogram_counts_match_emitted_text() {
    let dir = tempfile::tempdir().unwrap();
    write_table(
        dir.path(),
        "rec_a.tsv",
        "0.500\t1.000\tSPK1\tabba\n2.000\t3.000\tSPK1\tcc\n",
    );

    let stem = dir.path().join("st-test");
    stm::prepare_stm(dir.path(), &stem, "<eng>", "1", &HashSet::new()).unwrap();

    let histogram = std::fs::read_to_string(append_suffix(&stem, ".char_histogram")).unwrap();
    let mut lines = histogram.lines();
    assert_eq!(
        lines.next().unwrap(),
        "#character count_in_raw count_in_norm count_equal?"
    );

    // Sum of per-character raw counts equals total raw characters emitted
    let mut raw_sum = 0u64;
    let mut rows = 0;
    for line in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(fields.len(), 4);
        raw_sum += fields[1].parse::<u64>().unwrap();
        rows += 1;
    }
    assert_eq!(raw_sum, 6); // "abba" + "cc"
    assert_eq!(rows, 3); // a, b, c

    // Rebuilding the histogram from the emitted files gives the same totals
    let raw = std::fs::read_to_string(append_suffix(&stem, ".raw.stm")).unwrap();
    let mut check = CharHistogram::default();
    for line in raw.lines() {
        check.record_raw(line.rsplit('\t').next().unwrap());
    }
    assert_eq!(check.raw_total(), raw_sum);
}

#[test]
fn ignores_non_tsv_files_in_table_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_table(dir.path(), "rec_a.tsv", "0.500\t1.000\tSPK1\thello\n");
    std::fs::write(dir.path().join("README.txt"), "not a table\n").unwrap();

    let stem = dir.path().join("st-test");
    let report = stm::prepare_stm(dir.path(), &stem, "<eng>", "1", &HashSet::new()).unwrap();
    assert_eq!(report.tables, 1);
    assert_eq!(report.emitted, 1);
}
