//! マッチング結果の型定義

/// 戦略ごとに生成される候補コード。スコアは常に[0,1]。
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub code: String,
    pub score: f64,
    pub reason: String,
}

/// 1フレーズ分の照合結果（コードは高々1個）
#[derive(Debug, Clone)]
pub struct PhraseMatch {
    pub code: Option<String>,
    pub score: f64,
    pub reason: String,
}

/// 入力1行分の最終マッピング結果
#[derive(Debug, Clone)]
pub struct MappingResult {
    /// 頻度順の上位コード（最大max_codes個）
    pub codes: Vec<String>,
    /// 全フレーズスコアの算術平均
    pub confidence: f64,
    /// フレーズごとの根拠を連結した説明文（長さ上限あり）
    pub explain: String,
    /// コードが1つも確定しなかったか
    pub is_junk: bool,
}
