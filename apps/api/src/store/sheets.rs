//! Google Sheets backend for `RecordStore`.
//!
//! Stores are located by spreadsheet name through the Drive API, the way a
//! user would pick the file in the Drive UI. Values are read and appended
//! through the Sheets v4 `values` endpoints as raw strings.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::store::auth::ServiceAccountAuth;
use crate::store::{RecordStore, StoreError, StoreHandle};

const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
struct AppendBody<'a> {
    values: &'a [Vec<String>],
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

pub struct GoogleSheetsStore {
    client: Client,
    auth: ServiceAccountAuth,
}

impl GoogleSheetsStore {
    pub fn new(auth: ServiceAccountAuth) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client, auth })
    }

    /// `.../spreadsheets/{id}/values/{range}{suffix}` with the range percent-encoded.
    fn values_url(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
        suffix: &str,
    ) -> Result<Url, StoreError> {
        let mut url = Url::parse(SHEETS_API_URL)
            .map_err(|e| StoreError::InvalidRequest(format!("Sheets API URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidRequest("Sheets API URL has no path".to_string()))?
            .push(spreadsheet_id)
            .push("values")
            .push(&format!("{}{suffix}", sheet_range(sheet)));
        Ok(url)
    }
}

/// A1 range covering a whole sheet. Titles are quoted so spaces and
/// non-ASCII names resolve.
fn sheet_range(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}

/// Drive query matching a spreadsheet by exact name.
fn drive_name_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!("name = '{escaped}' and mimeType = '{SPREADSHEET_MIME}' and trashed = false")
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

async fn api_error(response: Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GoogleError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    StoreError::Api { status, message }
}

#[async_trait]
impl RecordStore for GoogleSheetsStore {
    async fn open_store(&self, name: &str) -> Result<StoreHandle, StoreError> {
        let token = self.auth.access_token().await?;
        let response = self
            .client
            .get(DRIVE_FILES_URL)
            .bearer_auth(&token)
            .query(&[
                ("q", drive_name_query(name).as_str()),
                ("fields", "files(id,name)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ])
            .send()
            .await?;

        match response.status() {
            StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                return Err(StoreError::NotFoundOrUnshared(name.to_string()))
            }
            status if !status.is_success() => return Err(api_error(response).await),
            _ => {}
        }

        let list: DriveFileList = response.json().await?;
        let file = list
            .files
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFoundOrUnshared(name.to_string()))?;

        debug!("Resolved store '{}' to spreadsheet {}", file.name, file.id);
        Ok(StoreHandle {
            id: file.id,
            name: file.name,
        })
    }

    async fn read_rows(
        &self,
        handle: &StoreHandle,
        sheet: &str,
    ) -> Result<Vec<Vec<String>>, StoreError> {
        let token = self.auth.access_token().await?;
        let url = self.values_url(&handle.id, sheet, "")?;
        let response = self.client.get(url).bearer_auth(&token).send().await?;

        match response.status() {
            // Sheets reports an unknown tab as an unparsable range.
            StatusCode::BAD_REQUEST => return Err(StoreError::SheetNotFound(sheet.to_string())),
            StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                return Err(StoreError::NotFoundOrUnshared(handle.name.clone()))
            }
            status if !status.is_success() => return Err(api_error(response).await),
            _ => {}
        }

        let range: ValueRange = response.json().await?;
        let rows: Vec<Vec<String>> = range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect();

        debug!("Read {} rows from '{}'/'{}'", rows.len(), handle.name, sheet);
        Ok(rows)
    }

    async fn append_rows(
        &self,
        handle: &StoreHandle,
        sheet: &str,
        rows: &[Vec<String>],
    ) -> Result<(), StoreError> {
        let token = self.auth.access_token().await?;
        let url = self.values_url(&handle.id, sheet, ":append")?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&token)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&AppendBody { values: rows })
            .send()
            .await?;

        match response.status() {
            StatusCode::BAD_REQUEST => Err(StoreError::SheetNotFound(sheet.to_string())),
            StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                Err(StoreError::NotFoundOrUnshared(handle.name.clone()))
            }
            status if !status.is_success() => Err(api_error(response).await),
            _ => {
                info!("Appended {} rows to '{}'/'{}'", rows.len(), handle.name, sheet);
                Ok(())
            }
        }
    }
}
