//! Company registry lookup by CNPJ.
//!
//! Queries a public CNPJ registry so a client form can be pre-filled. The
//! endpoint comes from `lookup.api_url`; `{document}` in the URL is replaced
//! by the CNPJ digits, otherwise the digits are appended as a path segment.
//! The response is expected in the BrasilAPI shape.

use crate::libs::config::LookupConfig;
use crate::libs::error::{AppError, AppResult};
use crate::libs::messages::Message;
use crate::libs::validation::{blank_to_none, format_document, only_digits, validate_cnpj, validate_cpf};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Registry data mapped onto client fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyRecord {
    pub document: String,
    pub legal_name: String,
    pub trade_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegistryResponse {
    razao_social: String,
    #[serde(default)]
    nome_fantasia: Option<String>,
    #[serde(default)]
    municipio: Option<String>,
    #[serde(default)]
    uf: Option<String>,
}

impl RegistryResponse {
    pub fn into_record(self, document: &str) -> CompanyRecord {
        CompanyRecord {
            document: document.to_string(),
            legal_name: self.razao_social.trim().to_string(),
            trade_name: blank_to_none(self.nome_fantasia.as_deref()),
            city: blank_to_none(self.municipio.as_deref()),
            state: blank_to_none(self.uf.as_deref()).map(|uf| uf.to_uppercase()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentLookup {
    client: Client,
    config: LookupConfig,
}

impl DocumentLookup {
    pub fn new(config: &LookupConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }

    /// Request URL for a CNPJ already reduced to digits.
    pub fn url_for(&self, digits: &str) -> AppResult<String> {
        let base = self.config.api_url.trim();
        if base.is_empty() {
            return Err(AppError::Lookup(Message::LookupNotConfigured));
        }
        if base.contains("{document}") {
            Ok(base.replace("{document}", digits))
        } else {
            Ok(format!("{}/{}", base.trim_end_matches('/'), digits))
        }
    }

    pub async fn lookup(&self, document: &str) -> AppResult<CompanyRecord> {
        let digits = only_digits(document);
        if !validate_cnpj(&digits) {
            if validate_cpf(&digits) {
                return Err(AppError::Lookup(Message::LookupUnsupported(format_document(&digits))));
            }
            return Err(AppError::Validation(Message::InvalidDocument(document.to_string())));
        }

        let url = self.url_for(&digits)?;
        tracing::debug!(%url, "registry lookup");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Lookup(Message::LookupFailed(e.to_string())))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(AppError::NotFound(Message::LookupNotFound(format_document(&digits)))),
            status if !status.is_success() => return Err(AppError::Lookup(Message::LookupFailed(status.to_string()))),
            _ => {}
        }

        let body = response
            .json::<RegistryResponse>()
            .await
            .map_err(|e| AppError::Lookup(Message::LookupFailed(e.to_string())))?;

        Ok(body.into_record(&digits))
    }
}
