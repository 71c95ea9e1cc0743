//! 3段階マッチングモジュール
//!
//! 正規化済みフレーズをタクソノミーエントリへ照合する。
//! 完全一致・トークン重複（Jaccard）・あいまい一致（token-sort比）の
//! 3戦略を常に全部実行して候補をプールする。安い戦略が成功しても
//! 打ち切らない（高い戦略の方が高スコアになる場合があるため）。
//!
//! ## スコアリング
//! - 完全一致: 1.0
//! - トークン重複: Jaccard ≥ token_threshold
//! - あいまい一致: token-sort比 ≥ fuzzy_threshold かつトークン重複が非ゼロ
//!   （文字形状だけで無関係な短い文字列が一致するのを防ぐ）

pub mod taxonomy;
pub mod types;

use crate::config::Config;
use crate::normalizer::find_taxonomy_code;
use crate::normalizer::splitter::split_specialties;
use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashSet;
use taxonomy::TaxonomyIndex;
use types::{MappingResult, MatchCandidate, PhraseMatch};

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"[a-z0-9]+").unwrap();
}

fn tokens(s: &str) -> Vec<&str> {
    TOKEN_RE.find_iter(s).map(|m| m.as_str()).collect()
}

/// 2フレーズの語トークン集合のJaccard類似度
pub fn token_overlap(a: &str, b: &str) -> f64 {
    let ta: HashSet<&str> = tokens(a).into_iter().collect();
    let tb: HashSet<&str> = tokens(b).into_iter().collect();
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let inter = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    inter as f64 / union as f64
}

/// トークンをソートして連結した文字列同士の正規化編集距離類似度
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let mut ta = tokens(a);
    let mut tb = tokens(b);
    ta.sort_unstable();
    tb.sort_unstable();
    strsim::normalized_levenshtein(&ta.join(" "), &tb.join(" "))
}

/// フレーズ単位のマッチャ＋行単位のアグリゲータ。
/// インデックスは読み取り専用参照で、並列実行間で共有できる。
#[derive(Debug)]
pub struct Matcher<'a> {
    index: &'a TaxonomyIndex,
    map_threshold: f64,
    token_threshold: f64,
    fuzzy_threshold: f64,
    max_codes: usize,
    explain_max_len: usize,
    min_phrase_len: usize,
}

impl<'a> Matcher<'a> {
    pub fn new(index: &'a TaxonomyIndex, config: &Config) -> Self {
        Self {
            index,
            map_threshold: config.map_threshold,
            token_threshold: config.token_threshold,
            fuzzy_threshold: config.fuzzy_threshold,
            max_codes: config.max_codes,
            explain_max_len: config.explain_max_len,
            min_phrase_len: config.min_phrase_len,
        }
    }

    /// 1フレーズを照合して高々1コードへ解決する
    pub fn match_phrase(&self, phrase: &str) -> PhraseMatch {
        let phrase = phrase.trim();
        if phrase.is_empty() {
            return PhraseMatch {
                code: None,
                score: 0.0,
                reason: "empty".to_string(),
            };
        }

        // コードそのものの入力は照合をスキップして直接解決する
        if let Some(code) = find_taxonomy_code(phrase) {
            if let Some(entry) = self.index.lookup_code(&code) {
                return PhraseMatch {
                    code: Some(entry.code.clone()),
                    score: 1.0,
                    reason: "code".to_string(),
                };
            }
        }

        let mut pool: Vec<MatchCandidate> = Vec::new();

        if let Some(entry) = self.index.lookup_canonical(phrase) {
            pool.push(MatchCandidate {
                code: entry.code.clone(),
                score: 1.0,
                reason: "exact".to_string(),
            });
        }

        for entry in self.index.entries() {
            if entry.canonical.is_empty() {
                continue;
            }

            let overlap = token_overlap(phrase, &entry.canonical);
            if overlap >= self.token_threshold {
                pool.push(MatchCandidate {
                    code: entry.code.clone(),
                    score: overlap,
                    reason: format!("token_overlap:{:.2}", overlap),
                });
            }

            let fuzzy = token_sort_ratio(phrase, &entry.canonical);
            if fuzzy >= self.fuzzy_threshold && overlap > 0.0 {
                pool.push(MatchCandidate {
                    code: entry.code.clone(),
                    score: fuzzy,
                    reason: format!("fuzzy:{:.2}", fuzzy),
                });
            }
        }

        if pool.is_empty() {
            return PhraseMatch {
                code: None,
                score: 0.0,
                reason: "no match".to_string(),
            };
        }

        // コードごとに最高スコアだけ残す（初出順は保存）
        let mut merged: Vec<MatchCandidate> = Vec::new();
        for candidate in pool {
            match merged.iter_mut().find(|m| m.code == candidate.code) {
                Some(best) => {
                    if candidate.score > best.score {
                        best.score = candidate.score;
                        best.reason = candidate.reason;
                    }
                }
                None => merged.push(candidate),
            }
        }
        merged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        let best = &merged[0];
        if best.score < self.map_threshold {
            return PhraseMatch {
                code: None,
                score: best.score,
                reason: "junk-low-confidence".to_string(),
            };
        }

        PhraseMatch {
            code: Some(best.code.clone()),
            score: best.score,
            reason: best.reason.clone(),
        }
    }

    /// 複数診療科テキスト全体をマッピングする（アグリゲータ）
    pub fn map_text(&self, text: &str) -> MappingResult {
        let parts = split_specialties(text, self.min_phrase_len);
        if parts.is_empty() {
            return MappingResult {
                codes: Vec::new(),
                confidence: 0.0,
                explain: "no match".to_string(),
                is_junk: true,
            };
        }

        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut scores: Vec<f64> = Vec::new();
        let mut reasons: Vec<String> = Vec::new();

        for part in &parts {
            let result = self.match_phrase(part);
            if let Some(code) = &result.code {
                match counts.iter_mut().find(|(c, _)| c == code) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((code.clone(), 1)),
                }
            }
            let label = result.code.as_deref().unwrap_or("none");
            reasons.push(format!("[{}]→{}({:.2})", part, label, result.score));
            scores.push(result.score);
        }

        let mut explain = reasons.join("; ");
        if explain.chars().count() > self.explain_max_len {
            explain = explain.chars().take(self.explain_max_len).collect();
        }

        // 頻度降順・同数は初出順
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        let codes: Vec<String> = counts
            .into_iter()
            .take(self.max_codes)
            .map(|(code, _)| code)
            .collect();

        if codes.is_empty() {
            return MappingResult {
                codes,
                confidence: 0.0,
                explain,
                is_junk: true,
            };
        }

        // マッピングできなかったフレーズのスコアも平均に含める
        // （複数診療科の一部が未解決なら全体の信頼度が下がる）
        let confidence = scores.iter().sum::<f64>() / scores.len() as f64;

        MappingResult {
            codes,
            confidence,
            explain,
            is_junk: false,
        }
    }
}
