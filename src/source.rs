use std::path::Path;

use reqwest::Client;
use tracing::{debug, info};

use crate::error::PipelineError;
use crate::records::HypertensionRecord;

pub static DEFAULT_CSV_URL: &str = "https://raw.githubusercontent.com/licvincent/Hipertension_Arterial_Mexico/refs/heads/main/Hipertension_Arterial_Mexico_v3.csv";

/// The downloaded bytes alongside the records parsed from them.
#[derive(Debug)]
pub struct Dataset {
    pub raw: Vec<u8>,
    pub records: Vec<HypertensionRecord>,
}

fn is_http(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

async fn fetch_http(client: &Client, url: &str) -> Result<Vec<u8>, PipelineError> {
    debug!("checking {} with HEAD", url);
    client
        .head(url)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| PipelineError::fetch(url, e))?;
    info!("source verified: {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| PipelineError::fetch(url, e))?;
    let body = response
        .bytes()
        .await
        .map_err(|e| PipelineError::fetch(url, e))?;

    Ok(body.to_vec())
}

async fn fetch_file(source: &str) -> Result<Vec<u8>, PipelineError> {
    let path = Path::new(source.strip_prefix("file://").unwrap_or(source));
    tokio::fs::read(path)
        .await
        .map_err(|e| PipelineError::fetch(source, e))
}

pub async fn fetch(client: &Client, source: &str) -> Result<Vec<u8>, PipelineError> {
    if is_http(source) {
        fetch_http(client, source).await
    } else {
        fetch_file(source).await
    }
}

/// Parses CSV content into records. The first bad row aborts the parse.
pub fn parse_records(content: &[u8]) -> Result<Vec<HypertensionRecord>, PipelineError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers = rdr.headers()?.clone();
    for column in HypertensionRecord::required_columns() {
        if !headers.iter().any(|h| h == column) {
            return Err(PipelineError::parse(
                Some(1),
                format!("missing column `{}`", column),
            ));
        }
    }

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let line = row.position().map(|p| p.line());
        let record: HypertensionRecord = row.deserialize(Some(&headers)).map_err(|e| {
            let line = e.position().map(|p| p.line()).or(line);
            PipelineError::parse(line, e)
        })?;
        let risk = record.hypertension_risk;
        if !risk.is_finite() || !(0.0..=1.0).contains(&risk) {
            return Err(PipelineError::parse(
                line,
                format!("hypertension risk {} is outside [0, 1]", risk),
            ));
        }
        records.push(record);
    }

    Ok(records)
}

/// Fetches `source` (an http(s) URL, a `file://` URI or a path) and parses it.
pub async fn load_dataset(client: &Client, source: &str) -> Result<Dataset, PipelineError> {
    info!("loading dataset from {}", source);
    let raw = fetch(client, source).await?;
    debug!("fetched {} bytes", raw.len());

    let records = parse_records(&raw)?;
    info!("parsed {} records", records.len());

    Ok(Dataset { raw, records })
}
