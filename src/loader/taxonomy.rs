//! NUCCタクソノミーCSVの読み込み
//!
//! 列名は大文字小文字・前後空白を無視して解決する。

use crate::error::{Result, SpecialtyMapperError};
use csv::ReaderBuilder;
use std::path::Path;

/// タクソノミーCSVの1行（正規化前の生データ）
#[derive(Debug, Clone, Default)]
pub struct TaxonomyRow {
    pub code: String,
    pub classification: String,
    pub specialization: String,
    pub display_name: Option<String>,
}

/// タクソノミーCSVを読み込む。`code`列は必須、他は欠損可。
pub fn load_taxonomy(path: &Path) -> Result<Vec<TaxonomyRow>> {
    if !path.exists() {
        return Err(SpecialtyMapperError::FileNotFound(
            path.display().to_string(),
        ));
    }

    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    let col = |name: &str| headers.iter().position(|h| h == name);

    let code_i = col("code").ok_or_else(|| {
        SpecialtyMapperError::InvalidTaxonomy(format!("code列がありません: {}", path.display()))
    })?;
    let classification_i = col("classification");
    let specialization_i = col("specialization");
    let display_name_i = col("display_name");

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |i: Option<usize>| {
            i.and_then(|i| record.get(i))
                .map(str::trim)
                .unwrap_or("")
                .to_string()
        };

        let code = field(Some(code_i));
        if code.is_empty() {
            continue;
        }

        let display_name = {
            let value = field(display_name_i);
            if value.is_empty() {
                None
            } else {
                Some(value)
            }
        };

        rows.push(TaxonomyRow {
            code,
            classification: field(classification_i),
            specialization: field(specialization_i),
            display_name,
        });
    }

    if rows.is_empty() {
        return Err(SpecialtyMapperError::InvalidTaxonomy(format!(
            "有効な行がありません: {}",
            path.display()
        )));
    }

    Ok(rows)
}
