use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpecialtyMapperError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("タクソノミーファイルが不正: {0}")]
    InvalidTaxonomy(String),

    #[error("入力カラムが特定できません: {0}")]
    InvalidColumn(String),

    #[error("CSV処理エラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SpecialtyMapperError>;
