//! Remote service contracts.
//!
//! Two collaborators live outside the engine: the template catalog
//! (`GET /templates`, `GET /templates/{id}`) and the PDF render service
//! (`POST /render/pdf`). These are the only asynchronous operations in
//! the crate — their completion feeds a template into the session or
//! consumes a render snapshot out of it; the layout engine itself never
//! awaits.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::content::Content;
use crate::error::FolioError;
use crate::model::{HeaderSettings, TemplateDetail, TemplateSummary};
use crate::style::{PagePadding, StyleOverride};

/// Body of `GET /templates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateSummary>,
}

/// Body of `POST /render/pdf`: a snapshot of everything the render
/// service needs to reproduce the session's sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPayload {
    pub template_id: String,
    pub content: Content,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub overrides: HashMap<String, StyleOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_padding: Option<PagePadding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderSettings>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStatus {
    Ok,
    Pending,
}

/// Body of the render service's reply. `pdf_base64` is present on a
/// completed render; on `pending` the `message` is surfaced to the user
/// as an informational notice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    pub status: RenderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_base64: Option<String>,
}

impl RenderResponse {
    /// Decode the PDF bytes out of a completed render. A reply without a
    /// payload (the `pending` path) is an `Export` error carrying the
    /// server's message, so the caller can surface it verbatim.
    pub fn decode_pdf(&self) -> Result<Vec<u8>, FolioError> {
        match &self.pdf_base64 {
            Some(payload) => Ok(BASE64.decode(payload.trim())?),
            None => Err(FolioError::Export(
                self.message
                    .clone()
                    .unwrap_or_else(|| "render service returned no PDF payload".to_string()),
            )),
        }
    }
}

/// Download filename for an exported template: the name lowercased with
/// whitespace runs collapsed to single hyphens.
pub fn pdf_file_name(template_name: &str) -> String {
    let slug = template_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    format!("{slug}.pdf")
}

/// Thin client over the template and render services.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn fetch_templates(&self) -> Result<Vec<TemplateSummary>, FolioError> {
        let url = format!("{}/templates", self.base_url);
        let response: TemplateListResponse =
            self.http.get(url).send().await?.error_for_status()?.json().await?;
        Ok(response.templates)
    }

    pub async fn fetch_template_detail(&self, id: &str) -> Result<TemplateDetail, FolioError> {
        let url = format!("{}/templates/{id}", self.base_url);
        Ok(self.http.get(url).send().await?.error_for_status()?.json().await?)
    }

    pub async fn render_pdf(&self, payload: &RenderPayload) -> Result<RenderResponse, FolioError> {
        let url = format!("{}/render/pdf", self.base_url);
        Ok(self
            .http
            .post(url)
            .json(payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}
