use serde::{Deserialize, Deserializer, Serialize};

/// Substituted for amounts the upstream API (or a client) leaves out.
pub const ZERO_AMOUNT: &str = "0";

/// Company name used in the prompt when the caller does not send one.
pub const DEFAULT_COMPANY_NAME: &str = "해당 회사";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementDivision {
    /// 재무상태표 (`BS`)
    BalanceSheet,
    /// 손익계산서 (`IS`)
    IncomeStatement,
    /// 현금흐름표 (`CF`)
    CashFlow,
    /// 자본변동표 (`SC`)
    ChangesInEquity,
}

impl StatementDivision {
    pub const ALL: [StatementDivision; 4] = [
        StatementDivision::BalanceSheet,
        StatementDivision::IncomeStatement,
        StatementDivision::CashFlow,
        StatementDivision::ChangesInEquity,
    ];

    /// Maps an OpenDART `sj_div` code. Codes are matched exactly.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "BS" => Some(StatementDivision::BalanceSheet),
            "IS" => Some(StatementDivision::IncomeStatement),
            "CF" => Some(StatementDivision::CashFlow),
            "SC" => Some(StatementDivision::ChangesInEquity),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            StatementDivision::BalanceSheet => "BS",
            StatementDivision::IncomeStatement => "IS",
            StatementDivision::CashFlow => "CF",
            StatementDivision::ChangesInEquity => "SC",
        }
    }

    pub fn korean_name(&self) -> &'static str {
        match self {
            StatementDivision::BalanceSheet => "재무상태표",
            StatementDivision::IncomeStatement => "손익계산서",
            StatementDivision::CashFlow => "현금흐름표",
            StatementDivision::ChangesInEquity => "자본변동표",
        }
    }
}

/// One line item of the `fnlttSinglAcnt` list, as loosely typed as the API sends it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStatementRecord {
    #[serde(default)]
    pub sj_div: Option<String>,
    #[serde(default)]
    pub account_nm: Option<String>,
    #[serde(default)]
    pub thstrm_amount: Option<String>,
    #[serde(default)]
    pub frmtrm_amount: Option<String>,
    #[serde(default)]
    pub bfefrmtrm_amount: Option<String>,
    #[serde(default)]
    pub thstrm_dt: Option<String>,
    #[serde(default)]
    pub frmtrm_dt: Option<String>,
    #[serde(default)]
    pub bfefrmtrm_dt: Option<String>,
}

/// An element of the upstream list. Elements whose fields carry the wrong
/// JSON types are kept as `Malformed` so one bad row cannot sink the payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DisclosureItem {
    Record(RawStatementRecord),
    Malformed(serde_json::Value),
}

impl From<RawStatementRecord> for DisclosureItem {
    fn from(record: RawStatementRecord) -> Self {
        DisclosureItem::Record(record)
    }
}

/// Envelope of every OpenDART JSON reply.
#[derive(Debug, Clone, Deserialize)]
pub struct DisclosureResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub list: Option<Vec<DisclosureItem>>,
}

fn zero_amount() -> String {
    ZERO_AMOUNT.to_string()
}

/// An explicit `null` is treated like an absent amount.
fn amount_or_zero<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(zero_amount))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEntry {
    pub account_nm: String,
    pub thstrm_amount: String,
    pub frmtrm_amount: String,
    #[serde(default = "zero_amount", deserialize_with = "amount_or_zero")]
    pub bfefrmtrm_amount: String,
}

/// Comparative-period labels such as `2023년`; empty when unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearLabels {
    #[serde(default)]
    pub thstrm: String,
    #[serde(default)]
    pub frmtrm: String,
    #[serde(default)]
    pub bfefrmtrm: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialModel {
    #[serde(rename = "bs")]
    pub balance_sheet: Vec<NormalizedEntry>,
    #[serde(rename = "is")]
    pub income_statement: Vec<NormalizedEntry>,
    #[serde(rename = "cf")]
    pub cash_flow: Vec<NormalizedEntry>,
    #[serde(rename = "sc")]
    pub changes_in_equity: Vec<NormalizedEntry>,
    pub years: YearLabels,
}

impl FinancialModel {
    pub fn entries(&self, division: StatementDivision) -> &[NormalizedEntry] {
        match division {
            StatementDivision::BalanceSheet => &self.balance_sheet,
            StatementDivision::IncomeStatement => &self.income_statement,
            StatementDivision::CashFlow => &self.cash_flow,
            StatementDivision::ChangesInEquity => &self.changes_in_equity,
        }
    }

    pub(crate) fn entries_mut(&mut self, division: StatementDivision) -> &mut Vec<NormalizedEntry> {
        match division {
            StatementDivision::BalanceSheet => &mut self.balance_sheet,
            StatementDivision::IncomeStatement => &mut self.income_statement,
            StatementDivision::CashFlow => &mut self.cash_flow,
            StatementDivision::ChangesInEquity => &mut self.changes_in_equity,
        }
    }

    pub fn total_entries(&self) -> usize {
        StatementDivision::ALL
            .iter()
            .map(|division| self.entries(*division).len())
            .sum()
    }
}

fn default_company_name() -> String {
    DEFAULT_COMPANY_NAME.to_string()
}

/// Body of the explain call: a model the client received earlier plus the display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainRequest {
    #[serde(default = "default_company_name")]
    pub company: String,
    #[serde(default)]
    pub years: YearLabels,
    #[serde(default)]
    pub bs: Vec<NormalizedEntry>,
    #[serde(default, rename = "is")]
    pub is_: Vec<NormalizedEntry>,
    #[serde(default)]
    pub cf: Vec<NormalizedEntry>,
    #[serde(default)]
    pub sc: Vec<NormalizedEntry>,
}

impl ExplainRequest {
    pub fn from_model(company: impl Into<String>, model: FinancialModel) -> Self {
        Self {
            company: company.into(),
            years: model.years,
            bs: model.balance_sheet,
            is_: model.income_statement,
            cf: model.cash_flow,
            sc: model.changes_in_equity,
        }
    }

    pub fn entries(&self, division: StatementDivision) -> &[NormalizedEntry] {
        match division {
            StatementDivision::BalanceSheet => &self.bs,
            StatementDivision::IncomeStatement => &self.is_,
            StatementDivision::CashFlow => &self.cf,
            StatementDivision::ChangesInEquity => &self.sc,
        }
    }
}

/// A row of the reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub corp_name: String,
    pub corp_code: String,
    pub stock_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    FirstQuarter,
    HalfYear,
    ThirdQuarter,
    Annual,
}

impl ReportType {
    pub const ALL: [ReportType; 4] = [
        ReportType::FirstQuarter,
        ReportType::HalfYear,
        ReportType::ThirdQuarter,
        ReportType::Annual,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ReportType::FirstQuarter => "11013",
            ReportType::HalfYear => "11012",
            ReportType::ThirdQuarter => "11014",
            ReportType::Annual => "11011",
        }
    }

    pub fn korean_name(&self) -> &'static str {
        match self {
            ReportType::FirstQuarter => "1분기보고서",
            ReportType::HalfYear => "반기보고서",
            ReportType::ThirdQuarter => "3분기보고서",
            ReportType::Annual => "사업보고서",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementQuery {
    pub corp_code: String,
    pub bsns_year: String,
    pub reprt_code: String,
}
