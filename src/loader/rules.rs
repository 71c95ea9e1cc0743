//! シノニムルールの読み込み
//!
//! `type,pattern,replacement[,priority]` 列のCSVからルールストアを構築する。
//! 語彙はすべてファイル駆動で、コード内にハードコードしない。

use crate::error::{Result, SpecialtyMapperError};
use crate::normalizer::basic_clean;
use csv::ReaderBuilder;
use std::path::Path;

/// 展開対象として認識するルール種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Abbreviation,
    Synonym,
    Phrase,
    Variation,
    Department,
    ProfessionalPrefix,
    Institutional,
}

impl RuleKind {
    /// CSVの`type`列から種別を解釈する。認識できない種別は`None`。
    pub fn parse(s: &str) -> Option<RuleKind> {
        match s.trim().to_lowercase().as_str() {
            "abbreviation" => Some(RuleKind::Abbreviation),
            "synonym" => Some(RuleKind::Synonym),
            "phrase" => Some(RuleKind::Phrase),
            "variation" => Some(RuleKind::Variation),
            "department" => Some(RuleKind::Department),
            "professional_prefix" => Some(RuleKind::ProfessionalPrefix),
            "institutional" => Some(RuleKind::Institutional),
            _ => None,
        }
    }
}

/// シノニムルール（pattern/replacementは正規化済みで保持）
#[derive(Debug, Clone)]
pub struct SynonymRule {
    pub kind: RuleKind,
    pub pattern: String,
    pub replacement: String,
    pub priority: Option<i32>,
}

/// 読み込み済みルールの不変ストア。
/// 明示的に再読み込みしない限りプロセス内で共有される。
#[derive(Debug, Default)]
pub struct RuleStore {
    rules: Vec<SynonymRule>,
    skipped_kinds: usize,
    dropped_noops: usize,
}

impl RuleStore {
    /// CSVファイルからルールを読み込む。ファイル欠損は致命的エラー。
    pub fn from_csv(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SpecialtyMapperError::FileNotFound(
                path.display().to_string(),
            ));
        }

        let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        let col = |name: &str| headers.iter().position(|h| h == name);

        let kind_i = col("type").ok_or_else(|| {
            SpecialtyMapperError::InvalidColumn(format!("type列がありません: {}", path.display()))
        })?;
        let pattern_i = col("pattern").ok_or_else(|| {
            SpecialtyMapperError::InvalidColumn(format!(
                "pattern列がありません: {}",
                path.display()
            ))
        })?;
        let replacement_i = col("replacement").ok_or_else(|| {
            SpecialtyMapperError::InvalidColumn(format!(
                "replacement列がありません: {}",
                path.display()
            ))
        })?;
        let priority_i = col("priority");

        let mut rules = Vec::new();
        let mut skipped_kinds = 0;
        let mut dropped_noops = 0;

        for record in reader.records() {
            let record = record?;
            let field = |i: usize| record.get(i).unwrap_or("");

            let kind = match RuleKind::parse(field(kind_i)) {
                Some(kind) => kind,
                None => {
                    skipped_kinds += 1;
                    continue;
                }
            };

            let pattern = basic_clean(field(pattern_i)).to_lowercase();
            let replacement = basic_clean(field(replacement_i)).to_lowercase();
            if pattern.is_empty() || replacement.is_empty() {
                continue;
            }
            if pattern == replacement {
                // 無操作ルールは捨てる
                dropped_noops += 1;
                continue;
            }

            let priority = priority_i
                .and_then(|i| record.get(i))
                .and_then(|v| v.trim().parse::<i32>().ok());

            rules.push(SynonymRule {
                kind,
                pattern,
                replacement,
                priority,
            });
        }

        let mut store = Self {
            rules,
            skipped_kinds,
            dropped_noops,
        };
        store.sort_rules();
        Ok(store)
    }

    /// 構築済みルール列からストアを作る（テスト・組み込み用）
    pub fn from_rules(rules: Vec<SynonymRule>) -> Self {
        let mut store = Self {
            rules,
            skipped_kinds: 0,
            dropped_noops: 0,
        };
        store.sort_rules();
        store
    }

    /// 最長パターン優先（同長はpriority降順、次に読み込み順）
    fn sort_rules(&mut self) {
        self.rules.sort_by(|a, b| {
            b.pattern
                .len()
                .cmp(&a.pattern.len())
                .then_with(|| b.priority.unwrap_or(0).cmp(&a.priority.unwrap_or(0)))
        });
    }

    /// 適用順（最長優先）のルール一覧
    pub fn rules(&self) -> &[SynonymRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 種別が認識できずスキップした行数
    pub fn skipped_kinds(&self) -> usize {
        self.skipped_kinds
    }

    /// pattern==replacementで捨てた行数
    pub fn dropped_noops(&self) -> usize {
        self.dropped_noops
    }
}
