//! specialty-mapper-rust
//!
//! 診療科のフリーテキスト（医療機関の入力・請求システム・名簿由来）を
//! NUCCタクソノミーコードへマッピングするライブラリ＆CLI。
//!
//! ## 処理フロー
//! 1. テキスト正規化（文字化け修復・ノイズ除去・区切り統一）
//! 2. junk判定（プレースホルダ・非医療テキストの除外）
//! 3. シノニム展開（外部ルールCSV駆動、語境界セーフ）
//! 4. 複数診療科の分割 → 3段階マッチング（完全一致/トークン重複/あいまい）
//! 5. コード集計・信頼度・説明文の生成

pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod matcher;
pub mod normalizer;
pub mod pipeline;
