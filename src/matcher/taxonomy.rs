//! タクソノミーインデックス
//!
//! 各エントリの正規化済みカノニカルフレーズを一度だけ計算し、
//! 完全一致用・コード素通し用の索引を構築する。構築後は読み取り専用で、
//! 並列マッピング中は参照共有のみ。

use crate::loader::taxonomy::TaxonomyRow;
use crate::normalizer::Normalizer;
use std::collections::HashMap;

/// カノニカルフレーズ付きタクソノミーエントリ
#[derive(Debug, Clone)]
pub struct TaxonomyEntry {
    pub code: String,
    pub classification: String,
    pub specialization: String,
    pub display_name: Option<String>,
    /// display_name（無ければ classification + specialization）の正規形
    pub canonical: String,
}

/// 構築済みインデックス
#[derive(Debug)]
pub struct TaxonomyIndex {
    entries: Vec<TaxonomyEntry>,
    by_canonical: HashMap<String, usize>,
    by_code: HashMap<String, usize>,
    empty_canonical: usize,
}

impl TaxonomyIndex {
    /// タクソノミー行からインデックスを構築する
    pub fn build(rows: Vec<TaxonomyRow>, normalizer: &Normalizer) -> Self {
        let mut entries = Vec::with_capacity(rows.len());
        let mut by_canonical: HashMap<String, usize> = HashMap::new();
        let mut by_code: HashMap<String, usize> = HashMap::new();
        let mut empty_canonical = 0;

        for row in rows {
            let source = match &row.display_name {
                Some(name) => name.clone(),
                None => format!("{} {}", row.classification, row.specialization),
            };
            let canonical = normalizer.normalize(&source);

            let index = entries.len();
            if canonical.is_empty() {
                // 空カノニカルは何にも一致しないが読み込みは継続する
                empty_canonical += 1;
            } else {
                // 同一フレーズは最初に見たコードを保持する
                by_canonical.entry(canonical.clone()).or_insert(index);
            }
            by_code.entry(row.code.to_uppercase()).or_insert(index);

            entries.push(TaxonomyEntry {
                code: row.code,
                classification: row.classification,
                specialization: row.specialization,
                display_name: row.display_name,
                canonical,
            });
        }

        Self {
            entries,
            by_canonical,
            by_code,
            empty_canonical,
        }
    }

    pub fn entries(&self) -> &[TaxonomyEntry] {
        &self.entries
    }

    /// カノニカルフレーズの完全一致検索
    pub fn lookup_canonical(&self, phrase: &str) -> Option<&TaxonomyEntry> {
        self.by_canonical.get(phrase).map(|&i| &self.entries[i])
    }

    /// コード自体による検索（大文字小文字を無視）
    pub fn lookup_code(&self, code: &str) -> Option<&TaxonomyEntry> {
        self.by_code
            .get(&code.to_uppercase())
            .map(|&i| &self.entries[i])
    }

    /// カノニカルフレーズが空だったエントリ数（データ品質警告用）
    pub fn empty_canonical(&self) -> usize {
        self.empty_canonical
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn row(code: &str, class: &str, spec: &str, display: Option<&str>) -> TaxonomyRow {
        TaxonomyRow {
            code: code.to_string(),
            classification: class.to_string(),
            specialization: spec.to_string(),
            display_name: display.map(|s| s.to_string()),
        }
    }

    fn build(rows: Vec<TaxonomyRow>) -> TaxonomyIndex {
        TaxonomyIndex::build(rows, &Normalizer::new(&Config::default()))
    }

    #[test]
    fn test_canonical_from_classification_and_specialization() {
        let index = build(vec![row(
            "207RC0000X",
            "Internal Medicine",
            "Cardiovascular Disease",
            None,
        )]);
        assert_eq!(
            index.entries()[0].canonical,
            "internal medicine cardiovascular disease"
        );
    }

    #[test]
    fn test_display_name_takes_precedence() {
        let index = build(vec![row(
            "208000000X",
            "Pediatrics",
            "",
            Some("General Pediatrics"),
        )]);
        assert_eq!(index.entries()[0].canonical, "general pediatrics");
        assert!(index.lookup_canonical("general pediatrics").is_some());
    }

    #[test]
    fn test_first_seen_code_wins_on_identical_phrase() {
        let index = build(vec![
            row("AAA000000X", "Cardiology", "", None),
            row("BBB000000X", "Cardiology", "", None),
        ]);
        let entry = index.lookup_canonical("cardiology").unwrap();
        assert_eq!(entry.code, "AAA000000X");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_empty_canonical_counted_not_fatal() {
        let index = build(vec![
            row("XXX000000X", "", "", None),
            row("207RC0000X", "Internal Medicine", "Cardiovascular Disease", None),
        ]);
        assert_eq!(index.empty_canonical(), 1);
        assert_eq!(index.len(), 2);
        assert!(index.lookup_canonical("").is_none());
    }

    #[test]
    fn test_lookup_code_case_insensitive() {
        let index = build(vec![row("207RC0000X", "Internal Medicine", "", None)]);
        assert!(index.lookup_code("207rc0000x").is_some());
        assert!(index.lookup_code("000000000X").is_none());
    }
}
