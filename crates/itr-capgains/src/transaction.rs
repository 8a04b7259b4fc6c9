//! # Transaction Records
//!
//! Typed disposal records as delivered by the extraction collaborator.
//! Two statement sources exist:
//!
//! - **Domestic fund ledgers** ([`FundTransaction`]): amounts already in
//!   rupees, gain type pre-tagged by the statement.
//! - **Foreign equity ledgers** ([`ForeignTransaction`]): raw dates and
//!   foreign-currency amounts; the engine derives the gain type and the
//!   rupee conversion.
//!
//! Transactions are inputs only. Nothing in the engine mutates them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Asset category reported by the fund statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    /// Equity-oriented scheme or listed share.
    Equity,
    /// Debt scheme.
    Debt,
    /// Hybrid scheme; treated as debt-oriented for bucket placement.
    Hybrid,
}

impl AssetCategory {
    /// Return the string representation of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equity => "equity",
            Self::Debt => "debt",
            Self::Hybrid => "hybrid",
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holding-period classification of a gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GainType {
    /// Held for no more than the long-term threshold.
    #[serde(alias = "STCG")]
    ShortTerm,
    /// Held beyond the long-term threshold.
    #[serde(alias = "LTCG")]
    LongTerm,
}

impl GainType {
    /// Return the string representation of this gain type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortTerm => "short_term",
            Self::LongTerm => "long_term",
        }
    }
}

impl std::fmt::Display for GainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which statement family a transaction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Domestic mutual-fund capital-gain ledger (rupees).
    DomesticFund,
    /// Foreign equity capital-gain ledger (foreign currency).
    ForeignEquity,
}

impl SourceKind {
    /// Return the string representation of this source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DomesticFund => "domestic_fund",
            Self::ForeignEquity => "foreign_equity",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common view of a disposal, used by the classifier.
pub trait Disposal {
    /// ISIN when known, otherwise the security or scheme name.
    fn instrument(&self) -> &str;
    /// Date the units were acquired, if the statement carried it.
    fn acquisition_date(&self) -> Option<NaiveDate>;
    /// Date the units were sold or redeemed, if the statement carried it.
    fn disposal_date(&self) -> Option<NaiveDate>;
}

/// A redemption from a domestic mutual-fund statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundTransaction {
    /// Scheme ISIN.
    #[serde(default)]
    pub isin: Option<String>,
    /// Scheme name as printed on the statement.
    pub scheme_name: String,
    /// Asset category of the scheme.
    pub asset_category: AssetCategory,
    /// Purchase date of the redeemed units.
    #[serde(default)]
    pub acquisition_date: Option<NaiveDate>,
    /// Redemption date.
    #[serde(default)]
    pub disposal_date: Option<NaiveDate>,
    /// Units redeemed.
    pub units: Decimal,
    /// Purchase value of the redeemed units.
    pub acquisition_value: Decimal,
    /// Redemption value.
    pub disposal_value: Decimal,
    /// Realized gain (negative for a loss) as reported by the statement.
    pub gain_loss: Decimal,
    /// Gain type tagged by the statement.
    pub gain_type: GainType,
}

impl FundTransaction {
    /// Create a record with zero amounts and no dates.
    pub fn new(
        scheme_name: impl Into<String>,
        asset_category: AssetCategory,
        gain_type: GainType,
    ) -> Self {
        Self {
            isin: None,
            scheme_name: scheme_name.into(),
            asset_category,
            acquisition_date: None,
            disposal_date: None,
            units: Decimal::ZERO,
            acquisition_value: Decimal::ZERO,
            disposal_value: Decimal::ZERO,
            gain_loss: Decimal::ZERO,
            gain_type,
        }
    }

    /// Builder: set the ISIN.
    pub fn with_isin(mut self, isin: impl Into<String>) -> Self {
        self.isin = Some(isin.into());
        self
    }

    /// Builder: set acquisition and disposal dates.
    pub fn with_dates(mut self, acquired: NaiveDate, disposed: NaiveDate) -> Self {
        self.acquisition_date = Some(acquired);
        self.disposal_date = Some(disposed);
        self
    }

    /// Builder: set units and values; the gain is derived as
    /// `disposal_value - acquisition_value`.
    pub fn with_amounts(
        mut self,
        units: Decimal,
        acquisition_value: Decimal,
        disposal_value: Decimal,
    ) -> Self {
        self.units = units;
        self.acquisition_value = acquisition_value;
        self.disposal_value = disposal_value;
        self.gain_loss = disposal_value - acquisition_value;
        self
    }

    /// Builder: override the reported gain.
    pub fn with_gain(mut self, gain_loss: Decimal) -> Self {
        self.gain_loss = gain_loss;
        self
    }
}

impl Disposal for FundTransaction {
    fn instrument(&self) -> &str {
        self.isin.as_deref().unwrap_or(&self.scheme_name)
    }

    fn acquisition_date(&self) -> Option<NaiveDate> {
        self.acquisition_date
    }

    fn disposal_date(&self) -> Option<NaiveDate> {
        self.disposal_date
    }
}

/// A sale from a foreign broker statement, amounts in the foreign currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignTransaction {
    /// Security ISIN, if the statement carried one.
    #[serde(default)]
    pub isin: Option<String>,
    /// Security name.
    pub security_name: String,
    /// Purchase date.
    #[serde(default)]
    pub acquisition_date: Option<NaiveDate>,
    /// Sale date.
    #[serde(default)]
    pub disposal_date: Option<NaiveDate>,
    /// Shares sold.
    pub units: Decimal,
    /// Purchase cost in the foreign currency.
    pub acquisition_value: Decimal,
    /// Sale proceeds in the foreign currency.
    pub disposal_value: Decimal,
    /// Gain in the foreign currency as reported by the broker.
    pub gain_loss: Decimal,
    /// Tax withheld abroad on the sale, in the foreign currency.
    #[serde(default)]
    pub foreign_tax_paid: Decimal,
}

impl ForeignTransaction {
    /// Create a record with zero amounts and no dates.
    pub fn new(security_name: impl Into<String>) -> Self {
        Self {
            isin: None,
            security_name: security_name.into(),
            acquisition_date: None,
            disposal_date: None,
            units: Decimal::ZERO,
            acquisition_value: Decimal::ZERO,
            disposal_value: Decimal::ZERO,
            gain_loss: Decimal::ZERO,
            foreign_tax_paid: Decimal::ZERO,
        }
    }

    /// Builder: set the ISIN.
    pub fn with_isin(mut self, isin: impl Into<String>) -> Self {
        self.isin = Some(isin.into());
        self
    }

    /// Builder: set acquisition and disposal dates.
    pub fn with_dates(mut self, acquired: NaiveDate, disposed: NaiveDate) -> Self {
        self.acquisition_date = Some(acquired);
        self.disposal_date = Some(disposed);
        self
    }

    /// Builder: set units and values; the gain is derived as
    /// `disposal_value - acquisition_value`.
    pub fn with_amounts(
        mut self,
        units: Decimal,
        acquisition_value: Decimal,
        disposal_value: Decimal,
    ) -> Self {
        self.units = units;
        self.acquisition_value = acquisition_value;
        self.disposal_value = disposal_value;
        self.gain_loss = disposal_value - acquisition_value;
        self
    }

    /// Builder: set tax withheld abroad.
    pub fn with_foreign_tax(mut self, foreign_tax_paid: Decimal) -> Self {
        self.foreign_tax_paid = foreign_tax_paid;
        self
    }
}

impl Disposal for ForeignTransaction {
    fn instrument(&self) -> &str {
        self.isin.as_deref().unwrap_or(&self.security_name)
    }

    fn acquisition_date(&self) -> Option<NaiveDate> {
        self.acquisition_date
    }

    fn disposal_date(&self) -> Option<NaiveDate> {
        self.disposal_date
    }
}

/// A transaction of either statement family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Transaction {
    /// Domestic mutual-fund redemption.
    DomesticFund(FundTransaction),
    /// Foreign equity sale.
    ForeignEquity(ForeignTransaction),
}

impl Transaction {
    /// The statement family this transaction belongs to.
    pub fn source(&self) -> SourceKind {
        match self {
            Self::DomesticFund(_) => SourceKind::DomesticFund,
            Self::ForeignEquity(_) => SourceKind::ForeignEquity,
        }
    }
}

impl From<FundTransaction> for Transaction {
    fn from(tx: FundTransaction) -> Self {
        Self::DomesticFund(tx)
    }
}

impl From<ForeignTransaction> for Transaction {
    fn from(tx: ForeignTransaction) -> Self {
        Self::ForeignEquity(tx)
    }
}
