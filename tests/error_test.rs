//! エラーケーステスト
//!
//! 必須ファイル欠損と各エラー型の表示を検証

use specialty_mapper_rust::error::SpecialtyMapperError;
use specialty_mapper_rust::loader;
use specialty_mapper_rust::loader::rules::RuleStore;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないタクソノミーファイルは致命的エラー
#[test]
fn test_missing_taxonomy_is_file_not_found() {
    let result = loader::taxonomy::load_taxonomy(Path::new("/nonexistent/nucc.csv"));
    assert!(matches!(
        result,
        Err(SpecialtyMapperError::FileNotFound(_))
    ));
}

/// 存在しないシノニムファイルは致命的エラー
#[test]
fn test_missing_synonyms_is_file_not_found() {
    let result = RuleStore::from_csv(Path::new("/nonexistent/synonyms.csv"));
    assert!(matches!(
        result,
        Err(SpecialtyMapperError::FileNotFound(_))
    ));
}

/// 必須列の欠けたルールCSV
#[test]
fn test_rules_missing_columns() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("synonyms.csv");
    std::fs::write(&path, "pattern,replacement\nent,otolaryngology\n").unwrap();

    let result = RuleStore::from_csv(&path);
    assert!(matches!(
        result,
        Err(SpecialtyMapperError::InvalidColumn(_))
    ));
}

/// 行が1件も無いタクソノミーは不正
#[test]
fn test_empty_taxonomy_is_invalid() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nucc.csv");
    std::fs::write(&path, "code,classification\n").unwrap();

    let result = loader::taxonomy::load_taxonomy(&path);
    assert!(matches!(
        result,
        Err(SpecialtyMapperError::InvalidTaxonomy(_))
    ));
}

/// 各エラー型のDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        SpecialtyMapperError::Config("テスト設定エラー".to_string()),
        SpecialtyMapperError::FileNotFound("nucc.csv".to_string()),
        SpecialtyMapperError::InvalidTaxonomy("code列がありません".to_string()),
        SpecialtyMapperError::InvalidColumn("input.csv".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}
