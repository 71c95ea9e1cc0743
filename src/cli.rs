use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "specialty-mapper")]
#[command(about = "診療科フリーテキスト→NUCCタクソノミーコード マッピングツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 生テキストを前処理してjunk判定付きCSVを出力
    Preprocess {
        /// 入力CSV（診療科テキスト列を自動検出）
        #[arg(required = true)]
        input: PathBuf,

        /// シノニムルールCSV（type,pattern,replacement[,priority]）
        #[arg(short, long)]
        synonyms: PathBuf,

        /// 出力CSV（raw_specialty, processed, is_junk）
        #[arg(short, long)]
        out: PathBuf,
    },

    /// 前処理済み（または生）CSVをNUCCコードへマッピング
    Map {
        /// 入力CSV（raw_specialty/processed/is_junk列があれば尊重）
        #[arg(required = true)]
        input: PathBuf,

        /// NUCCタクソノミーCSV（code/classification/...）
        #[arg(short, long)]
        nucc: PathBuf,

        /// シノニムルールCSV
        #[arg(short, long)]
        synonyms: PathBuf,

        /// 出力CSV
        #[arg(short, long)]
        out: PathBuf,

        /// マッピング採用閾値（設定値を上書き）
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// 前処理からマッピングまで一括実行
    Run {
        /// 入力CSV
        #[arg(required = true)]
        input: PathBuf,

        /// NUCCタクソノミーCSV
        #[arg(short, long)]
        nucc: PathBuf,

        /// シノニムルールCSV
        #[arg(short, long)]
        synonyms: PathBuf,

        /// 出力CSV
        #[arg(short, long)]
        out: PathBuf,

        /// マッピング採用閾値（設定値を上書き）
        #[arg(long)]
        threshold: Option<f64>,

        /// ワーカースレッド数（省略時はCPU数）
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// 設定を表示/編集
    Config {
        /// マッピング採用閾値を設定
        #[arg(long)]
        set_threshold: Option<f64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
