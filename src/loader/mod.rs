//! CSV入出力（コアの外側のI/O層）
//!
//! 入力列の自動検出、前処理済みCSVの読み書き、最終結果の書き出し。

pub mod rules;
pub mod taxonomy;

use crate::error::{Result, SpecialtyMapperError};
use crate::pipeline::OutputRow;
use csv::{ReaderBuilder, Writer};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref COLUMN_HINT_RE: Regex =
        Regex::new(r"(?i)(special|dept|discipline|service|category|name)").unwrap();
}

/// 入力行。`map`コマンドでは前処理済みの値を、`run`では生値をそのまま持つ。
#[derive(Debug, Clone)]
pub struct InputRow {
    pub raw: String,
    pub text: String,
    pub pre_junk: bool,
}

/// 診療科テキストらしい列を列名から推定する（見つからなければ先頭列）
pub fn detect_input_column(headers: &[String]) -> usize {
    headers
        .iter()
        .position(|h| COLUMN_HINT_RE.is_match(h))
        .unwrap_or(0)
}

/// 生の入力CSVを読み込む。戻り値は（使用した列名, 行リスト）。
pub fn read_input(path: &Path) -> Result<(String, Vec<InputRow>)> {
    if !path.exists() {
        return Err(SpecialtyMapperError::FileNotFound(
            path.display().to_string(),
        ));
    }

    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() {
        return Err(SpecialtyMapperError::InvalidColumn(
            path.display().to_string(),
        ));
    }

    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let col = |name: &str| lowered.iter().position(|h| h == name);

    // 前処理済みCSV（raw_specialty/processed/is_junk）ならその列構成を尊重する
    if let (Some(processed_i), Some(raw_i)) = (col("processed"), col("raw_specialty")) {
        let junk_i = col("is_junk");
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let get = |i: usize| record.get(i).unwrap_or("").to_string();
            rows.push(InputRow {
                raw: get(raw_i),
                text: get(processed_i),
                pre_junk: junk_i
                    .and_then(|i| record.get(i))
                    .map(|v| v.trim() == "1")
                    .unwrap_or(false),
            });
        }
        return Ok(("processed".to_string(), rows));
    }

    let column_i = detect_input_column(&lowered);
    let column_name = headers[column_i].clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let value = record.get(column_i).unwrap_or("").to_string();
        rows.push(InputRow {
            raw: value.clone(),
            text: value,
            pre_junk: false,
        });
    }

    Ok((column_name, rows))
}

/// 前処理結果（raw_specialty, processed, is_junk）を書き出す
pub fn write_preprocessed(path: &Path, rows: &[(String, String, u8)]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = Writer::from_path(path)?;
    writer.write_record(["raw_specialty", "processed", "is_junk"])?;
    for (raw, processed, is_junk) in rows {
        let is_junk = is_junk.to_string();
        writer.write_record([raw.as_str(), processed.as_str(), is_junk.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// 最終マッピング結果CSVを書き出す（confidenceは3桁丸め）
pub fn write_output(path: &Path, rows: &[OutputRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = Writer::from_path(path)?;
    writer.write_record([
        "raw_specialty",
        "processed",
        "is_junk",
        "nucc_codes",
        "confidence",
        "explain",
    ])?;
    for row in rows {
        let is_junk = row.is_junk.to_string();
        let confidence = format!("{:.3}", row.confidence);
        writer.write_record([
            row.raw_specialty.as_str(),
            row.processed.as_str(),
            is_junk.as_str(),
            row.nucc_codes.as_str(),
            confidence.as_str(),
            row.explain.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
