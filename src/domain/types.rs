use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%d-%b-%Y";

/// One per-client, per-day snapshot from the historical dataset.
/// Exactly one record exists per (client, date) pair; dates are business
/// days only. Wire names match the dataset CSV columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalRecord {
    #[serde(rename = "Date", with = "csv_date")]
    pub date: NaiveDate,
    #[serde(rename = "Client")]
    pub client: String,
    #[serde(rename = "MTM")]
    pub mtm: f64,
    #[serde(rename = "Collateral")]
    pub collateral: f64,
    #[serde(rename = "Threshold")]
    pub threshold: f64,
    #[serde(rename = "Volatility")]
    pub volatility: f64,
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "InterestRate")]
    pub interest_rate: f64,
    #[serde(rename = "MTA")]
    pub mta: f64,
    #[serde(rename = "MarginCallMade", with = "yes_no")]
    pub margin_call_made: bool,
    #[serde(rename = "MarginCallAmount")]
    pub margin_call_amount: f64,
}

impl HistoricalRecord {
    /// Renders the record as the flat `Key: value` text block that gets
    /// embedded into the vector index, one line per column.
    pub fn to_document(&self) -> String {
        format!(
            "Date: {}\nClient: {}\nMTM: {}\nCollateral: {}\nThreshold: {}\nVolatility: {}\nCurrency: {}\nInterestRate: {}\nMTA: {}\nMarginCallMade: {}\nMarginCallAmount: {}",
            self.date.format(DATE_FORMAT),
            self.client,
            self.mtm,
            self.collateral,
            self.threshold,
            self.volatility,
            self.currency,
            self.interest_rate,
            self.mta,
            if self.margin_call_made { "Yes" } else { "No" },
            self.margin_call_amount,
        )
    }
}

/// Raw per-request inputs: a client identifier plus the six numeric fields.
/// The encoder turns this into a `FeatureVector`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureInput {
    #[serde(rename = "Client")]
    pub client: String,
    #[serde(rename = "MTM")]
    pub mtm: f64,
    #[serde(rename = "Collateral")]
    pub collateral: f64,
    #[serde(rename = "Threshold")]
    pub threshold: f64,
    #[serde(rename = "Volatility")]
    pub volatility: f64,
    #[serde(rename = "InterestRate")]
    pub interest_rate: f64,
    #[serde(rename = "MTA")]
    pub mta: f64,
}

/// Encoded model input. Field order is fixed by the feature registry and
/// must match the order the models were trained against.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub client_code: u32,
    pub mtm: f64,
    pub collateral: f64,
    pub threshold: f64,
    pub volatility: f64,
    pub interest_rate: f64,
    pub mta: f64,
}

/// Synthetic inputs for one hypothetical day, bounded by historical ranges.
#[derive(Debug, Clone)]
pub struct ScenarioSample {
    pub date: NaiveDate,
    pub features: FeatureInput,
}

/// Outcome of the hybrid decision engine for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub required: bool,
    /// Call amount, two decimal places, never negative. Zero when not required.
    pub amount: Decimal,
    /// Probability-of-positive in percent, rounded to two decimal places.
    pub confidence: f64,
}

impl Decision {
    pub fn required_label(&self) -> &'static str {
        if self.required { "Yes" } else { "No" }
    }

    pub fn amount_string(&self) -> String {
        format_usd(self.amount)
    }

    pub fn confidence_string(&self) -> String {
        format!("{:.2}%", self.confidence)
    }
}

/// Final structured result for one (client, date). Immutable once produced.
/// Wire names match the report schema consumed downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "Client")]
    pub client: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "MarginCallRequired")]
    pub margin_call_required: String,
    #[serde(rename = "MarginCallAmount")]
    pub margin_call_amount: String,
    #[serde(rename = "ConfidenceScore")]
    pub confidence_score: String,
    #[serde(rename = "Comments")]
    pub comments: String,
}

/// Formats a non-negative monetary amount as `$N,NNN.NN`.
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let s = format!("{:.2}", rounded);
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    format!("${}.{}", grouped, frac_part)
}

/// Serde codec for the dataset's `%d-%b-%Y` date column.
pub mod csv_date {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Serde codec for the dataset's `Yes`/`No` outcome column.
pub mod yes_no {
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(if *value { "Yes" } else { "No" })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "Yes" => Ok(true),
            "No" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected Yes or No, got {other}"
            ))),
        }
    }
}
