//! CSVサーフェスの統合テスト
//!
//! ルール・タクソノミー・入力のCSVを組み立てて、読み込みから
//! マッピング・書き出しまでを通しで検証する。

use specialty_mapper_rust::config::Config;
use specialty_mapper_rust::loader;
use specialty_mapper_rust::loader::rules::RuleStore;
use specialty_mapper_rust::matcher::taxonomy::TaxonomyIndex;
use specialty_mapper_rust::matcher::Matcher;
use specialty_mapper_rust::normalizer::expander::SynonymExpander;
use specialty_mapper_rust::normalizer::junk::JunkClassifier;
use specialty_mapper_rust::normalizer::Normalizer;
use specialty_mapper_rust::pipeline::Pipeline;
use std::path::Path;
use tempfile::tempdir;

const SYNONYMS_CSV: &str = "\
type,pattern,replacement
abbreviation,ent,otolaryngology
abbreviation,peds,pediatrics
abbreviation,cardio,cardiology
synonym,heart,cardiology
comment,not a rule,ignored
";

const NUCC_CSV: &str = "\
code,classification,specialization,display_name
207Y00000X,Otolaryngology,,
208000000X,Pediatrics,,
207RC0000X,Cardiology,,
2084N0400X,Psychiatry & Neurology,Neurology,
";

const INPUT_CSV: &str = "\
id,provider_specialty
1,ENT
2,Dept of Cardiology
3,TBD
4,Peds / Cardio
5,Qzxcvbnmasdf
6,207Y00000X
";

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write fixture");
    path
}

struct Mapped {
    rows: Vec<specialty_mapper_rust::pipeline::OutputRow>,
}

fn map_fixture(dir: &Path) -> Mapped {
    let config = Config::default();
    let store = RuleStore::from_csv(&write_file(dir, "synonyms.csv", SYNONYMS_CSV)).unwrap();
    let taxonomy =
        loader::taxonomy::load_taxonomy(&write_file(dir, "nucc.csv", NUCC_CSV)).unwrap();
    let (column, input) = loader::read_input(&write_file(dir, "input.csv", INPUT_CSV)).unwrap();
    assert_eq!(column, "provider_specialty");

    let normalizer = Normalizer::new(&config);
    let junk = JunkClassifier::new(&config);
    let expander = SynonymExpander::new(&store);
    let index = TaxonomyIndex::build(taxonomy, &normalizer);
    let matcher = Matcher::new(&index, &config);
    let pipeline = Pipeline::new(&normalizer, &junk, &expander, &matcher);

    let work: Vec<(String, String, bool)> = input
        .into_iter()
        .map(|row| (row.raw, row.text, row.pre_junk))
        .collect();
    Mapped {
        rows: pipeline.run(&work, false),
    }
}

#[test]
fn test_end_to_end_mapping() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mapped = map_fixture(dir.path());
    let rows = &mapped.rows;
    assert_eq!(rows.len(), 6);

    // ENT → シノニム展開 → 完全一致
    assert_eq!(rows[0].raw_specialty, "ENT");
    assert_eq!(rows[0].nucc_codes, "207Y00000X");
    assert_eq!(rows[0].is_junk, 0);
    assert!((rows[0].confidence - 1.0).abs() < 1e-9);

    // ノイズ語除去後に完全一致
    assert_eq!(rows[1].processed, "cardiology");
    assert_eq!(rows[1].nucc_codes, "207RC0000X");

    // プレースホルダ
    assert_eq!(rows[2].is_junk, 1);
    assert_eq!(rows[2].nucc_codes, "JUNK");
    assert_eq!(rows[2].explain, "junk-flagged");
    assert_eq!(rows[2].confidence, 0.0);

    // 複数診療科はパイプ連結、信頼度は両フレーズの平均
    assert_eq!(rows[3].nucc_codes, "208000000X|207RC0000X");
    assert!((rows[3].confidence - 1.0).abs() < 1e-9);

    // どの戦略も候補を出さない → 空コード経由でjunk
    assert_eq!(rows[4].is_junk, 1);
    assert_eq!(rows[4].nucc_codes, "JUNK");
    assert_eq!(rows[4].confidence, 0.0);

    // コード素通し
    assert_eq!(rows[5].processed, "207Y00000X");
    assert_eq!(rows[5].nucc_codes, "207Y00000X");
    assert!((rows[5].confidence - 1.0).abs() < 1e-9);
}

#[test]
fn test_output_csv_written_with_rounded_confidence() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mapped = map_fixture(dir.path());

    let out = dir.path().join("out").join("mapped.csv");
    loader::write_output(&out, &mapped.rows).unwrap();
    let content = std::fs::read_to_string(&out).unwrap();

    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "raw_specialty,processed,is_junk,nucc_codes,confidence,explain"
    );
    // 信頼度は3桁丸めで書き出す
    assert!(content.contains("1.000"));
    assert!(content.contains("JUNK"));
}

#[test]
fn test_preprocessed_roundtrip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config::default();
    let store = RuleStore::from_csv(&write_file(dir.path(), "synonyms.csv", SYNONYMS_CSV)).unwrap();
    let (_, input) = loader::read_input(&write_file(dir.path(), "input.csv", INPUT_CSV)).unwrap();

    let normalizer = Normalizer::new(&config);
    let junk = JunkClassifier::new(&config);
    let expander = SynonymExpander::new(&store);
    let index = TaxonomyIndex::build(Vec::new(), &normalizer);
    let matcher = Matcher::new(&index, &config);
    let pipeline = Pipeline::new(&normalizer, &junk, &expander, &matcher);

    let processed: Vec<(String, String, u8)> = input
        .iter()
        .map(|row| {
            let (text, is_junk) = pipeline.preprocess_one(&row.raw);
            (row.raw.clone(), text, is_junk)
        })
        .collect();

    let pre_path = dir.path().join("preprocessed.csv");
    loader::write_preprocessed(&pre_path, &processed).unwrap();

    // 前処理済みCSVは専用の列構成として読み戻される
    let (column, rows) = loader::read_input(&pre_path).unwrap();
    assert_eq!(column, "processed");
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0].raw, "ENT");
    assert_eq!(rows[0].text, "ent");
    assert!(rows[2].pre_junk);
}
