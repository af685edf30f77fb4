use super::{Fragment, Translator, apply_fragments};
use crate::core::TranslationServiceError;
use md5::{Digest as _, Md5};
use mo_relay_toml::{APP_ID_ENV, APP_KEY_ENV, Language, TranslatorConfig};
use rand::Rng as _;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Range the per-request salt is drawn from.
const SALT_RANGE: std::ops::RangeInclusive<u32> = 32768..=65536;
/// `error_code` the service sends alongside a successful result.
const SUCCESS_CODE: &str = "52000";

/// The service's own code for a language.
pub fn provider_code(language: Language) -> &'static str {
    match language {
        Language::En => "en",
        Language::Ja => "jp",
        Language::Ko => "kor",
        Language::ZhHans => "zh",
        Language::ZhHant => "cht",
    }
}

/// Request signature: lowercase hex MD5 of `app_id + text + salt + app_key`.
pub fn sign(app_id: &str, text: &str, salt: u32, app_key: &str) -> String {
    let digest = Md5::digest(format!("{app_id}{text}{salt}{app_key}").as_bytes());
    format!("{digest:x}")
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    trans_result: Vec<Fragment>,
    error_code: Option<serde_json::Value>,
    error_msg: Option<String>,
}

fn parse_response(body: &str) -> Result<Vec<Fragment>, String> {
    let response: TranslateResponse =
        serde_json::from_str(body).map_err(|e| format!("unexpected response ({e}): {body}"))?;

    if let Some(code) = response.error_code {
        let code = match code {
            serde_json::Value::String(code) => code,
            other => other.to_string(),
        };
        if code != SUCCESS_CODE {
            let message = response.error_msg.unwrap_or_default();
            return Err(format!("error {code} {message}").trim_end().to_string());
        }
    }

    if response.trans_result.is_empty() {
        return Err(format!("response carries no translation: {body}"));
    }
    Ok(response.trans_result)
}

/// Client for the Baidu Fanyi general translation API.
///
/// Every call is one signed request with a fresh salt; there is no retry,
/// rate limiting or batching.
#[derive(Debug)]
pub struct BaiduTranslator {
    client: Client,
    endpoint: String,
    credentials: Option<(String, String)>,
}

impl BaiduTranslator {
    pub fn new(config: &TranslatorConfig) -> Result<Self, TranslationServiceError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TranslationServiceError {
                from: String::new(),
                to: String::new(),
                reason: format!("cannot create HTTP client: {e}"),
                help: None,
            })?;

        let credentials = match (&config.app_id, &config.app_key) {
            (Some(id), Some(key)) => Some((id.clone(), key.clone())),
            _ => None,
        };

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            credentials,
        })
    }

    fn request(&self, text: &str, from: Language, to: Language) -> Result<Vec<Fragment>, String> {
        let (app_id, app_key) = self
            .credentials
            .as_ref()
            .ok_or_else(|| "no credentials configured".to_string())?;

        let salt = rand::thread_rng().gen_range(SALT_RANGE);
        let signature = sign(app_id, text, salt, app_key);
        let salt = salt.to_string();

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("appid", app_id.as_str()),
                ("q", text),
                ("from", provider_code(from)),
                ("to", provider_code(to)),
                ("salt", salt.as_str()),
                ("sign", signature.as_str()),
            ])
            .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| e.to_string())?;

        let body = response.text().map_err(|e| e.to_string())?;
        parse_response(&body)
    }
}

impl Translator for BaiduTranslator {
    fn translate(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> Result<String, TranslationServiceError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        tracing::debug!(from = %from, to = %to, "translating {} byte(s)", text.len());

        let fragments = self.request(text, from, to).map_err(|reason| {
            let help = self.credentials.is_none().then(|| {
                format!(
                    "Set translator.app_id and translator.app_key in relay.toml, \
                     or the {APP_ID_ENV} and {APP_KEY_ENV} environment variables"
                )
            });
            TranslationServiceError {
                from: from.to_string(),
                to: to.to_string(),
                reason,
                help,
            }
        })?;

        Ok(apply_fragments(text, &fragments))
    }
}
