//! Client for the VNDirect industry-classification API.
//!
//! The endpoint takes two query parameters:
//! - `q`: `key:value` filters joined by `~`, always in the order
//!   codeList, industryCode, industryLevel, higherLevelCode, englishName,
//!   vietnameseName. List filters are comma separated.
//! - `size`: the number of industries on one result page.
//!
//! `:` and `,` must reach the server unescaped.

use crate::config::{self, AppConfig, MAX_QUERY_SIZE};
use crate::error::{Error, Result};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const PAYLOAD_Q_JOIN_CHAR: char = '~';
pub const LIST_JOIN_CHAR: char = ',';

pub const Q_KEY_CODE_LIST: &str = "codeList";
pub const Q_KEY_INDUSTRY_CODE: &str = "industryCode";
pub const Q_KEY_INDUSTRY_LEVEL: &str = "industryLevel";
pub const Q_KEY_HIGHER_LEVEL_CODE: &str = "higherLevelCode";
pub const Q_KEY_ENGLISH_NAME: &str = "englishName";
pub const Q_KEY_VIETNAMESE_NAME: &str = "vietnameseName";

const ERROR_BODY_SNIPPET_LEN: usize = 200;

/// Where the two name filters end up in `q`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameSlotMode {
    /// Each name filter goes to its own key.
    #[default]
    Corrected,
    /// The Vietnamese filter is written to `englishName`, the English filter is
    /// dropped and `vietnameseName` stays empty. Matches older vnquant releases.
    Legacy,
}

/// Filter criteria for one industry-classification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndustryQuery {
    pub code_list: Vec<String>,
    pub industry_codes: Vec<String>,
    /// 1 is the broadest level, 3 the narrowest.
    pub industry_levels: Vec<String>,
    pub higher_level_codes: Vec<String>,
    pub english_name: String,
    pub vietnamese_name: String,
    pub result_size: u32,
    pub name_slot_mode: NameSlotMode,
}

impl Default for IndustryQuery {
    fn default() -> Self {
        Self {
            code_list: Vec::new(),
            industry_codes: Vec::new(),
            industry_levels: Vec::new(),
            higher_level_codes: Vec::new(),
            english_name: String::new(),
            vietnamese_name: String::new(),
            result_size: MAX_QUERY_SIZE,
            name_slot_mode: NameSlotMode::default(),
        }
    }
}

fn collect_strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: ToString,
{
    values.into_iter().map(|v| v.to_string()).collect()
}

impl IndustryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty query carrying the page size and name-slot mode from `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            result_size: config.max_query_size,
            name_slot_mode: config.name_slot_mode,
            ..Self::default()
        }
    }

    pub fn with_code_list<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.code_list = collect_strings(codes);
        self
    }

    pub fn with_industry_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.industry_codes = collect_strings(codes);
        self
    }

    /// Accepts strings or integers, e.g. `[1, 2]`.
    pub fn with_industry_levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.industry_levels = collect_strings(levels);
        self
    }

    pub fn with_higher_level_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.higher_level_codes = collect_strings(codes);
        self
    }

    pub fn with_english_name(mut self, name: impl Into<String>) -> Self {
        self.english_name = name.into();
        self
    }

    pub fn with_vietnamese_name(mut self, name: impl Into<String>) -> Self {
        self.vietnamese_name = name.into();
        self
    }

    pub fn with_result_size(mut self, size: u32) -> Self {
        self.result_size = size;
        self
    }

    pub fn with_name_slot_mode(mut self, mode: NameSlotMode) -> Self {
        self.name_slot_mode = mode;
        self
    }

    /// The six `q` fields in wire order.
    pub fn q_fields(&self) -> [(&'static str, String); 6] {
        let (english_name, vietnamese_name) = match self.name_slot_mode {
            NameSlotMode::Corrected => (self.english_name.clone(), self.vietnamese_name.clone()),
            NameSlotMode::Legacy => (self.vietnamese_name.clone(), String::new()),
        };

        [
            (Q_KEY_CODE_LIST, join_list(&self.code_list)),
            (Q_KEY_INDUSTRY_CODE, join_list(&self.industry_codes)),
            (Q_KEY_INDUSTRY_LEVEL, join_list(&self.industry_levels)),
            (Q_KEY_HIGHER_LEVEL_CODE, join_list(&self.higher_level_codes)),
            (Q_KEY_ENGLISH_NAME, english_name),
            (Q_KEY_VIETNAMESE_NAME, vietnamese_name),
        ]
    }

    /// The unencoded `q` parameter.
    pub fn q_string(&self) -> String {
        self.q_fields()
            .iter()
            .map(|(key, value)| format!("{}:{}", key, value))
            .collect::<Vec<_>>()
            .join(&PAYLOAD_Q_JOIN_CHAR.to_string())
    }

    /// The unencoded `(q, size)` parameter pairs.
    pub fn payload(&self) -> [(&'static str, String); 2] {
        [("q", self.q_string()), ("size", self.result_size.to_string())]
    }

    /// The form-encoded query string, e.g. `q=codeList:AAA,ASM~industryCode:...&size=9999`.
    pub fn encoded_payload(&self) -> String {
        self.payload()
            .iter()
            .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn join_list(values: &[String]) -> String {
    values.join(&LIST_JOIN_CHAR.to_string())
}

/// Form-encode one key or value. Alphanumerics and `_ . - ~ : ,` pass through,
/// spaces become `+`, everything else is percent-encoded.
pub fn encode_component(value: &str) -> String {
    // byte_serialize keeps `*` and escapes `~ : ,`; adjust both ways
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('*', "%2A")
        .replace("%7E", "~")
        .replace("%3A", ":")
        .replace("%2C", ",")
}

pub struct IndustryClient {
    client: Client,
    base_url: String,
    user_agents: Vec<String>,
    random_agent: bool,
}

impl IndustryClient {
    /// Client for the production endpoint with the default settings.
    pub fn new(random_agent: bool) -> Result<Self> {
        let config = AppConfig {
            random_agent,
            ..AppConfig::default()
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        if config.user_agents.is_empty() {
            return Err(Error::Config("user agent pool is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(IndustryClient {
            client,
            base_url: config.industry_url.clone(),
            user_agents: config.user_agents.clone(),
            random_agent: config.random_agent,
        })
    }

    /// Point the client at another endpoint. Used for testing with wiremock.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_user_agent(&self) -> String {
        if self.random_agent {
            use rand::seq::IndexedRandom;
            self.user_agents
                .choose(&mut rand::rng())
                .unwrap_or(&self.user_agents[0])
                .clone()
        } else {
            self.user_agents[0].clone()
        }
    }

    /// Full request URL for `query`.
    pub fn request_url(&self, query: &IndustryQuery) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid industry URL {}: {}", self.base_url, e)))?;
        url.set_query(Some(&query.encoded_payload()));
        Ok(url)
    }

    /// Fetch industries and their tickers. The JSON body is returned untouched.
    pub async fn get_ind_class(&self, query: &IndustryQuery) -> Result<Value> {
        let url = self.request_url(query)?;
        let user_agent = self.get_user_agent();

        debug!(
            base_url = %self.base_url,
            payload = url.query().unwrap_or_default(),
            %user_agent,
            "Requesting industry classification"
        );

        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, timeout = e.is_timeout(), "Industry classification request failed");
                Error::from(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Industry classification returned an error status");
            let snippet: String = body.chars().take(ERROR_BODY_SNIPPET_LEN).collect();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let data: Value = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "Industry classification body is not JSON");
            Error::from(e)
        })?;
        Ok(data)
    }

    /// Blocking form of [`IndustryClient::get_ind_class`]. Runs the request on a
    /// private current-thread runtime, so it must not be called from async code.
    pub fn get_ind_class_blocking(&self, query: &IndustryQuery) -> Result<Value> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.get_ind_class(query))
    }
}

/// One-shot synchronous lookup using the process-wide configuration.
pub fn get_ind_class(query: &IndustryQuery) -> Result<Value> {
    let client = IndustryClient::from_config(config::global())?;
    client.get_ind_class_blocking(query)
}

// --- Typed view over the response envelope ---

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        _ => None,
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct IndustryRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub industry_code: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub industry_level: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub higher_level_code: Option<String>,
    pub english_name: Option<String>,
    pub vietnamese_name: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub code_list: Option<String>,
}

impl IndustryRecord {
    /// Tickers listed under this industry.
    pub fn tickers(&self) -> Vec<String> {
        self.code_list
            .as_deref()
            .unwrap_or_default()
            .split(LIST_JOIN_CHAR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

/// One page of the industry-classification response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct IndustryPage {
    pub data: Vec<IndustryRecord>,
    pub current_page: Option<u32>,
    pub size: Option<u32>,
    pub total_elements: Option<u64>,
    pub total_pages: Option<u32>,
}

impl IndustryPage {
    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(Self::deserialize(value)?)
    }

    /// Industries whose code list contains `ticker`.
    pub fn industries_of(&self, ticker: &str) -> Vec<&IndustryRecord> {
        self.data
            .iter()
            .filter(|record| record.tickers().iter().any(|t| t == ticker))
            .collect()
    }
}
