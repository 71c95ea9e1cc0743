//! マッピング設定
//!
//! 閾値と語彙セットを保持する。閾値は元実装で値がばらついていたため
//! 固定値ではなく設定項目とし、相対順序（完全一致 ≥ トークン重複 ≥
//! あいまい一致の厳しさ）だけを前提とする。

use crate::error::{Result, SpecialtyMapperError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// マッピング採用の最低スコア
    #[serde(default = "default_map_threshold")]
    pub map_threshold: f64,
    /// トークン重複（Jaccard）の最低スコア
    #[serde(default = "default_token_threshold")]
    pub token_threshold: f64,
    /// あいまい一致（token-sort比）の最低スコア
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
    /// 1行あたりの最大コード数
    #[serde(default = "default_max_codes")]
    pub max_codes: usize,
    /// explain列の最大文字数
    #[serde(default = "default_explain_max_len")]
    pub explain_max_len: usize,
    /// 分割後フレーズの最小文字数
    #[serde(default = "default_min_phrase_len")]
    pub min_phrase_len: usize,
    /// junk判定の最小英字数
    #[serde(default = "default_min_letters")]
    pub min_letters: usize,

    /// プレースホルダ語（正規化後の完全一致でjunk）
    #[serde(default = "default_placeholders")]
    pub placeholders: HashSet<String>,
    /// 非医療語彙（医療ヒント語が無ければjunk）
    #[serde(default = "default_non_medical")]
    pub non_medical: HashSet<String>,
    /// 医療ヒント語彙
    #[serde(default = "default_medical_hints")]
    pub medical_hints: HashSet<String>,
    /// 有効な短縮診療科（3文字未満でもjunkにしない）
    #[serde(default = "default_short_whitelist")]
    pub short_whitelist: HashSet<String>,
    /// 組織ノイズ語（dept/clinic等、トークン単位で除去）
    #[serde(default = "default_org_noise")]
    pub org_noise: HashSet<String>,
    /// 地理ノイズ語
    #[serde(default = "default_geo_noise")]
    pub geo_noise: HashSet<String>,
    /// 敬称（dr/prof等）
    #[serde(default = "default_honorifics")]
    pub honorifics: HashSet<String>,
    /// ストップワード（of/for/the）
    #[serde(default = "default_stopwords")]
    pub stopwords: HashSet<String>,
}

fn default_map_threshold() -> f64 {
    0.65
}
fn default_token_threshold() -> f64 {
    0.70
}
fn default_fuzzy_threshold() -> f64 {
    0.75
}
fn default_max_codes() -> usize {
    3
}
fn default_explain_max_len() -> usize {
    250
}
fn default_min_phrase_len() -> usize {
    2
}
fn default_min_letters() -> usize {
    3
}

fn set_of(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn default_placeholders() -> HashSet<String> {
    set_of(&[
        "tbd",
        "temporary",
        "unknown",
        "n/a",
        "n / a",
        "na",
        "none",
        "no data",
        "random data",
        "unk",
        "-",
        "",
        "####",
        "n a",
        "n.a.",
        "nil",
        "null",
        "junk",
    ])
}

fn default_non_medical() -> HashSet<String> {
    set_of(&[
        "taxi",
        "ambulance",
        "driver",
        "contractor",
        "agency",
        "public",
        "sector",
        "admin",
        "accounts",
        "billing",
    ])
}

fn default_medical_hints() -> HashSet<String> {
    set_of(&[
        "medicine",
        "surgery",
        "cardiology",
        "neurology",
        "dermatology",
        "radiology",
        "oncology",
        "pediatrics",
        "psychiatry",
        "pathology",
        "anesthesiology",
        "urology",
        "nephrology",
        "endocrinology",
        "gastroenterology",
        "hematology",
        "ophthalmology",
        "otolaryngology",
        "rehabilitation",
        "genetics",
        "rheumatology",
        "pulmonology",
    ])
}

fn default_short_whitelist() -> HashSet<String> {
    set_of(&["ir", "gi", "ed", "er", "ob", "gyn", "icu", "ent", "pt", "ot"])
}

fn default_org_noise() -> HashSet<String> {
    set_of(&[
        "dept",
        "department",
        "division",
        "program",
        "service",
        "center",
        "centre",
        "unit",
        "office",
        "hospital",
        "clinic",
        "outpatient",
        "inpatient",
        "opd",
        "ed",
        "er",
    ])
}

fn default_geo_noise() -> HashSet<String> {
    set_of(&["usa", "us", "united", "states", "india", "canada", "uk", "kingdom"])
}

fn default_honorifics() -> HashSet<String> {
    set_of(&["dr", "mr", "mrs", "ms", "prof", "md"])
}

fn default_stopwords() -> HashSet<String> {
    set_of(&["of", "for", "the"])
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map_threshold: default_map_threshold(),
            token_threshold: default_token_threshold(),
            fuzzy_threshold: default_fuzzy_threshold(),
            max_codes: default_max_codes(),
            explain_max_len: default_explain_max_len(),
            min_phrase_len: default_min_phrase_len(),
            min_letters: default_min_letters(),
            placeholders: default_placeholders(),
            non_medical: default_non_medical(),
            medical_hints: default_medical_hints(),
            short_whitelist: default_short_whitelist(),
            org_noise: default_org_noise(),
            geo_noise: default_geo_noise(),
            honorifics: default_honorifics(),
            stopwords: default_stopwords(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SpecialtyMapperError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("specialty-mapper").join("config.json"))
    }

    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SpecialtyMapperError::Config(format!(
                "閾値は0.0〜1.0で指定してください: {}",
                threshold
            )));
        }
        self.map_threshold = threshold;
        self.save()
    }
}
