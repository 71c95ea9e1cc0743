//! シノニム展開モジュール
//!
//! ルールストアのpattern→replacementを語境界セーフに適用する。
//! パターンは最長優先で1回ずつ順に適用し、前段の置換結果に
//! 後段のルールがさらに一致するカスケード展開を許す。

use crate::loader::rules::RuleStore;
use crate::normalizer::collapse_whitespace;
use regex::{NoExpand, Regex};

/// コンパイル済みシノニム展開器
#[derive(Debug)]
pub struct SynonymExpander {
    rules: Vec<(Regex, String)>,
    compile_failures: usize,
}

impl SynonymExpander {
    /// ルールストアから展開器を構築する。
    /// コンパイルできないパターンはそのルールだけ飛ばして件数を記録する。
    pub fn new(store: &RuleStore) -> Self {
        let mut rules = Vec::with_capacity(store.len());
        let mut compile_failures = 0;

        for rule in store.rules() {
            let pattern = format!(r"\b{}\b", regex::escape(&rule.pattern));
            match Regex::new(&pattern) {
                Ok(rx) => rules.push((rx, rule.replacement.clone())),
                Err(_) => compile_failures += 1,
            }
        }

        Self {
            rules,
            compile_failures,
        }
    }

    /// 正規化済みテキストへ全ルールを順に適用する
    pub fn expand(&self, text: &str) -> String {
        if self.rules.is_empty() {
            return text.to_string();
        }

        let mut out = text.to_string();
        for (rx, replacement) in &self.rules {
            // $記号の展開を避けてリテラル置換
            out = rx.replace_all(&out, NoExpand(replacement)).into_owned();
        }
        collapse_whitespace(&out)
    }

    /// コンパイルに失敗してスキップしたルール数
    pub fn compile_failures(&self) -> usize {
        self.compile_failures
    }

    /// 適用可能なルール数
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
