//! junk判定モジュール
//!
//! 正規化済みテキストがマッピングに使える入力かどうかを判定する。
//! ルールは上から順に評価し、最初に該当した理由を返す。

use crate::config::Config;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"[a-z0-9]+").unwrap();
}

/// junk判定器。語彙セットは設定から受け取り、構築後は不変。
#[derive(Debug, Clone)]
pub struct JunkClassifier {
    placeholders: HashSet<String>,
    non_medical: HashSet<String>,
    medical_hints: HashSet<String>,
    short_whitelist: HashSet<String>,
    min_letters: usize,
}

impl JunkClassifier {
    pub fn new(config: &Config) -> Self {
        Self {
            placeholders: config.placeholders.clone(),
            non_medical: config.non_medical.clone(),
            medical_hints: config.medical_hints.clone(),
            short_whitelist: config.short_whitelist.clone(),
            min_letters: config.min_letters,
        }
    }

    /// junkなら理由を返す。使える入力なら`None`。
    pub fn classify(&self, normalized: &str) -> Option<&'static str> {
        if normalized.is_empty() || self.placeholders.contains(normalized) {
            return Some("placeholder");
        }

        // コード素通し結果はそのままマッチャへ渡す
        if crate::normalizer::find_taxonomy_code(normalized).is_some() {
            return None;
        }

        let letters = normalized.chars().filter(|c| c.is_ascii_alphabetic()).count();
        if letters == 0 {
            return Some("non-alphabetic");
        }

        if letters < self.min_letters && !self.short_whitelist.contains(normalized) {
            return Some("too-short");
        }

        let tokens: Vec<&str> = TOKEN_RE.find_iter(normalized).map(|m| m.as_str()).collect();
        let has_non_medical = tokens.iter().any(|t| self.non_medical.contains(*t));
        let has_hint = tokens.iter().any(|t| self.medical_hints.contains(*t));
        if has_non_medical && !has_hint {
            return Some("non-medical");
        }

        None
    }

    /// junkかどうかだけを返す
    pub fn is_junk(&self, normalized: &str) -> bool {
        self.classify(normalized).is_some()
    }
}
