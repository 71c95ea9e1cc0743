//! 行単位のマッピングパイプライン
//!
//! 正規化 → junk判定 → シノニム展開 → 分割マッチング → 集計を
//! 1行ずつ適用する。各行は独立で、共有状態はタクソノミーインデックスと
//! ルールストア（いずれも構築後読み取り専用）だけなので、行の処理は
//! rayonのワーカープールへそのまま分配できる。出力順は行ごとに持ち回る
//! インデックスで入力順へ復元する。

use crate::matcher::Matcher;
use crate::normalizer::expander::SynonymExpander;
use crate::normalizer::junk::JunkClassifier;
use crate::normalizer::{to_text, Normalizer};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

/// 出力CSVの1行
#[derive(Debug, Clone)]
pub struct OutputRow {
    pub raw_specialty: String,
    pub processed: String,
    pub is_junk: u8,
    /// パイプ連結のコードリスト。空なら"JUNK"
    pub nucc_codes: String,
    pub confidence: f64,
    pub explain: String,
}

/// 1行分のパイプライン。構成要素はすべて参照で持つ。
pub struct Pipeline<'a> {
    normalizer: &'a Normalizer,
    junk: &'a JunkClassifier,
    expander: &'a SynonymExpander,
    matcher: &'a Matcher<'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        normalizer: &'a Normalizer,
        junk: &'a JunkClassifier,
        expander: &'a SynonymExpander,
        matcher: &'a Matcher<'a>,
    ) -> Self {
        Self {
            normalizer,
            junk,
            expander,
            matcher,
        }
    }

    /// 生テキスト1件を正規化のみ行う（preprocessサーフェス）。
    /// 戻り値は（processed, is_junk）。
    pub fn preprocess_one(&self, raw: &str) -> (String, u8) {
        let normalized = self.normalizer.normalize(&to_text(Some(raw)));
        if self.junk.is_junk(&normalized) {
            let processed = if normalized.is_empty() {
                "junk".to_string()
            } else {
                normalized
            };
            (processed, 1)
        } else {
            (normalized, 0)
        }
    }

    /// 1行を最後までマッピングする。
    /// `text`はマッピング対象（runでは生値、mapでは前処理済み値）、
    /// `pre_junk`は前段で確定済みのjunkフラグ。
    pub fn process_row(&self, raw: &str, text: &str, pre_junk: bool) -> OutputRow {
        let normalized = self.normalizer.normalize(&to_text(Some(text)));

        if pre_junk || self.junk.is_junk(&normalized) {
            let processed = if normalized.is_empty() {
                "junk".to_string()
            } else {
                normalized
            };
            return OutputRow {
                raw_specialty: raw.to_string(),
                processed,
                is_junk: 1,
                nucc_codes: "JUNK".to_string(),
                confidence: 0.0,
                explain: "junk-flagged".to_string(),
            };
        }

        let expanded = self.expander.expand(&normalized);
        let result = self.matcher.map_text(&expanded);

        OutputRow {
            raw_specialty: raw.to_string(),
            processed: normalized,
            // junk分類を通過してもコードが出なければ最終的なjunk扱い
            is_junk: if result.is_junk { 1 } else { 0 },
            nucc_codes: if result.codes.is_empty() {
                "JUNK".to_string()
            } else {
                result.codes.join("|")
            },
            confidence: result.confidence,
            explain: result.explain,
        }
    }

    /// 全行を並列にマッピングする。入力順は保存される。
    pub fn run(&self, rows: &[(String, String, bool)], show_progress: bool) -> Vec<OutputRow> {
        let progress = if show_progress {
            let bar = ProgressBar::new(rows.len() as u64);
            bar.set_style(
                ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            Some(bar)
        } else {
            None
        };

        let mut indexed: Vec<(usize, OutputRow)> = rows
            .par_iter()
            .enumerate()
            .map(|(i, (raw, text, pre_junk))| {
                let row = self.process_row(raw, text, *pre_junk);
                if let Some(bar) = &progress {
                    bar.inc(1);
                }
                (i, row)
            })
            .collect();

        if let Some(bar) = progress {
            bar.finish_and_clear();
        }

        indexed.sort_by_key(|(i, _)| *i);
        indexed.into_iter().map(|(_, row)| row).collect()
    }
}
