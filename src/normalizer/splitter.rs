//! 複数診療科の分割モジュール
//!
//! 正規化・シノニム展開済みテキストを個別の診療科フレーズへ分割する。
//! 全連結子を1パスの選択肢として同時に適用するため、どの連結子でも
//! 同じ分割結果になる（順序保存・重複はそのまま残す）。

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SPLIT_RE: Regex = Regex::new(r"\s*[|,/;&+]\s*|\band\b").unwrap();
}

/// テキストをフレーズ列へ分割する。`min_phrase_len`未満の断片は捨てる。
pub fn split_specialties(text: &str, min_phrase_len: usize) -> Vec<String> {
    SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty() && p.len() >= min_phrase_len)
        .map(|p| p.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_canonical_separator() {
        assert_eq!(
            split_specialties("cardiology / neurology", 2),
            vec!["cardiology", "neurology"]
        );
    }

    #[test]
    fn test_split_determinism_across_connectors() {
        // どの連結子でも同じ2フレーズに分割される
        let expected = vec!["cardio".to_string(), "neuro".to_string()];
        assert_eq!(split_specialties("cardio, neuro", 2), expected);
        assert_eq!(split_specialties("cardio / neuro", 2), expected);
        assert_eq!(split_specialties("cardio; neuro", 2), expected);
        assert_eq!(split_specialties("cardio & neuro", 2), expected);
        assert_eq!(split_specialties("cardio + neuro", 2), expected);
        assert_eq!(split_specialties("cardio|neuro", 2), expected);
        assert_eq!(split_specialties("cardio and neuro", 2), expected);
    }

    #[test]
    fn test_order_preserved_and_duplicates_kept() {
        assert_eq!(
            split_specialties("neuro / cardio / neuro", 2),
            vec!["neuro", "cardio", "neuro"]
        );
    }

    #[test]
    fn test_short_fragments_dropped() {
        assert_eq!(split_specialties("cardiology / x", 2), vec!["cardiology"]);
        assert_eq!(split_specialties("", 2), Vec::<String>::new());
    }

    #[test]
    fn test_same_input_same_output() {
        let text = "internal medicine / geriatrics";
        assert_eq!(split_specialties(text, 2), split_specialties(text, 2));
    }
}
