//! テキスト正規化モジュール
//!
//! 生の診療科テキストをマッチング可能な正規形へ変換する。
//! 全ステップは決定的・全域的（不正入力でも落ちない）で、
//! `normalize(normalize(x)) == normalize(x)` の冪等性を満たす。
//!
//! ## 処理フロー
//! 1. 文字化け修復・HTMLエンティティ復号・空白正規化
//! 2. NUCCコードそのものを含む入力はコードをそのまま通す
//! 3. 括弧の平坦化・数字→英字補正
//! 4. ノイズ語除去（組織名・地名・敬称・ストップワード）
//! 5. 連結記号の統一（`&` `+` `,` `;` `|` `and` → `" / "`）

pub mod expander;
pub mod junk;
pub mod splitter;

use crate::config::Config;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref WS_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref PARENS_RE: Regex = Regex::new(r"\(([^)]*)\)").unwrap();
    static ref ALNUM_TOKEN_RE: Regex = Regex::new(r"[A-Za-z0-9]+").unwrap();
    static ref NOISE_TOKEN_RE: Regex = Regex::new(r"[A-Za-z0-9.]+|[&+,;/|]").unwrap();
    static ref NUCC_CODE_RE: Regex = Regex::new(r"\b[0-9A-Z]{9}X\b").unwrap();
    static ref AND_RE: Regex = Regex::new(r"(?i)\band\b").unwrap();
    static ref CONNECTOR_RE: Regex = Regex::new(r"[&+,;|]").unwrap();
    static ref DASH_RE: Regex = Regex::new(r"[-–—]").unwrap();
    static ref PUNCT_RE: Regex = Regex::new(r"[^a-z0-9/ ]").unwrap();
}

/// セル値をテキストへ全域変換する（欠損はすべて空文字列）
pub fn to_text(value: Option<&str>) -> String {
    value.unwrap_or("").trim().to_string()
}

/// 空白の連続を1個のASCIIスペースへ畳み込む
pub fn collapse_whitespace(s: &str) -> String {
    WS_RE.replace_all(s.trim(), " ").into_owned()
}

/// 文字化け修復＋エンティティ復号＋空白正規化（軽量クリーニング）
///
/// シノニムルールのpattern/replacementにも同じ処理を適用するため公開。
pub fn basic_clean(s: &str) -> String {
    let s = fix_mojibake(s);
    let s = decode_entities(&s);
    let s = s.replace('\u{00A0}', " ");
    collapse_whitespace(&s)
}

/// 大文字化したテキストからNUCCコード形状のトークンを検出する
pub fn find_taxonomy_code(s: &str) -> Option<String> {
    NUCC_CODE_RE
        .find(&s.to_uppercase())
        .map(|m| m.as_str().to_string())
}

fn fix_mojibake(s: &str) -> String {
    // UTF-8→CP1252誤変換で混入する既知のバイト列
    s.replace("Ã¢â‚¬â€œ", "")
        .replace("ÃƒÂ¢Ã¢â€šÂ¬Ã¢â‚¬Å“", "")
        .replace("Ã¢â‚¬", "")
        .replace("Â", "")
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn flatten_parens(s: &str) -> String {
    let s = PARENS_RE.replace_all(s, " $1");
    collapse_whitespace(&s)
}

fn map_digit(c: char) -> char {
    match c {
        '0' => 'o',
        '1' => 'i',
        '3' => 'e',
        '5' => 's',
        '7' => 't',
        '8' => 'b',
        _ => c,
    }
}

/// 英数字混在トークン内の数字をタイポとみなして英字へ置換する。
/// 純粋な数値トークンはここでは触らない（junk判定・コード検出に委ねる）。
fn digits_to_letters(s: &str) -> String {
    ALNUM_TOKEN_RE
        .replace_all(s, |caps: &regex::Captures| {
            let token = &caps[0];
            let has_digit = token.chars().any(|c| c.is_ascii_digit());
            let has_alpha = token.chars().any(|c| c.is_ascii_alphabetic());
            if has_digit && has_alpha {
                token.chars().map(map_digit).collect::<String>()
            } else {
                token.to_string()
            }
        })
        .into_owned()
}

/// 連結記号を正規の区切り `" / "` へ統一し、連続・端の区切りを畳む
fn standardize_separators(s: &str) -> String {
    let s = AND_RE.replace_all(s, "/");
    let s = CONNECTOR_RE.replace_all(&s, "/");
    let parts: Vec<&str> = s
        .split('/')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    parts.join(" / ")
}

/// 区切り・英数字・スペース以外の記号を除去する
fn strip_punct(s: &str) -> String {
    let s = DASH_RE.replace_all(s, " ");
    let s = PUNCT_RE.replace_all(&s, " ");
    collapse_whitespace(&s)
}

/// テキスト正規化器。ノイズ語彙は設定から受け取り、構築後は不変。
#[derive(Debug, Clone)]
pub struct Normalizer {
    org_noise: HashSet<String>,
    geo_noise: HashSet<String>,
    honorifics: HashSet<String>,
    stopwords: HashSet<String>,
}

impl Normalizer {
    pub fn new(config: &Config) -> Self {
        Self {
            org_noise: config.org_noise.clone(),
            geo_noise: config.geo_noise.clone(),
            honorifics: config.honorifics.clone(),
            stopwords: config.stopwords.clone(),
        }
    }

    /// 生テキストを正規形へ変換する
    pub fn normalize(&self, raw: &str) -> String {
        let s = basic_clean(raw);

        // コード形状の入力は以降の変換をバイパスして素通しする
        if let Some(code) = find_taxonomy_code(&s) {
            return code;
        }

        let s = flatten_parens(&s);
        let s = digits_to_letters(&s);
        let s = s.to_lowercase();
        let s = self.strip_noise(&s);
        let s = standardize_separators(&s);
        strip_punct(&s)
    }

    fn is_noise(&self, word: &str) -> bool {
        self.honorifics.contains(word)
            || self.org_noise.contains(word)
            || self.geo_noise.contains(word)
            || self.stopwords.contains(word)
    }

    /// ノイズ語をトークン単位で除去する（部分文字列は対象外）。
    /// 全トークンがノイズ語の場合は除去せず残す。`ed` 等の短縮診療科が
    /// 単独入力されたときにjunk判定側のホワイトリストへ委ねるため。
    fn strip_noise(&self, s: &str) -> String {
        let words: Vec<&str> = NOISE_TOKEN_RE
            .find_iter(s)
            .map(|m| m.as_str())
            .filter(|t| !(t.len() == 1 && "&+,;/|".contains(*t)))
            .collect();
        let all_noise =
            !words.is_empty() && words.iter().all(|w| self.is_noise(w.trim_matches('.')));
        if all_noise {
            return collapse_whitespace(s);
        }

        let kept: Vec<&str> = NOISE_TOKEN_RE
            .find_iter(s)
            .map(|m| m.as_str())
            .filter(|t| {
                if t.len() == 1 && "&+,;/|".contains(*t) {
                    return true;
                }
                !self.is_noise(t.trim_matches('.'))
            })
            .collect();
        kept.join(" ")
    }
}
