use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::money;

/// Generate a prefixed, sortable id: `<prefix>_<ulid>`.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", ulid::Ulid::new().to_string().to_lowercase())
}

// ── Enums ──

/// Lifecycle label of a quotation. Presentation only; no transition rules.
///
/// Stored labels decode through [`FromStr`]; an unknown label reads as
/// `Draft` rather than failing the whole record.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub enum QuoteStatus {
    #[default]
    Draft,
    Sent,
    Confirmed,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "Draft",
            QuoteStatus::Sent => "Sent",
            QuoteStatus::Confirmed => "Confirmed",
            QuoteStatus::OnHold => "On Hold",
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "draft" => Ok(QuoteStatus::Draft),
            "sent" => Ok(QuoteStatus::Sent),
            "confirmed" | "accepted" => Ok(QuoteStatus::Confirmed),
            "onhold" | "rejected" => Ok(QuoteStatus::OnHold),
            _ => Err(CoreError::unknown("status", s)),
        }
    }
}

/// How a milestone's `value` is interpreted. Unknown stored labels read as
/// `Percentage`.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneKind {
    #[default]
    Percentage,
    Fixed,
}

impl FromStr for MilestoneKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "percentage" | "percent" | "%" => Ok(MilestoneKind::Percentage),
            "fixed" => Ok(MilestoneKind::Fixed),
            _ => Err(CoreError::unknown("milestone kind", s)),
        }
    }
}

/// Unknown stored labels read as `Other`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Card,
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    Cheque,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Cheque => "Cheque",
            PaymentMethod::Other => "Other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "upi" => Ok(PaymentMethod::Upi),
            "banktransfer" | "bank" => Ok(PaymentMethod::BankTransfer),
            "cheque" | "check" => Ok(PaymentMethod::Cheque),
            "other" => Ok(PaymentMethod::Other),
            _ => Err(CoreError::unknown("payment method", s)),
        }
    }
}

/// Read a label through its `FromStr`. Non-strings and unknown labels are `None`.
fn decode_label<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let value = serde_json::Value::deserialize(d)?;
    Ok(value.as_str().and_then(|s| s.parse().ok()))
}

impl<'de> Deserialize<'de> for QuoteStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(decode_label(d)?.unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for MilestoneKind {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(decode_label(d)?.unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for PaymentMethod {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(decode_label(d)?.unwrap_or(PaymentMethod::Other))
    }
}

/// Lowercase and strip separators so `On Hold`, `on-hold` and `on_hold` match.
fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

// ── Aggregate ──

/// Client block of a quotation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientDetails {
    /// Client-master id this block was linked from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub tagline: String,
    pub locations: String,
    pub reference: String,
    /// Issue date, `YYYY-MM-DD`.
    pub date: String,
    /// Validity date, `YYYY-MM-DD`.
    pub valid_till: String,
    pub quote_number: String,
    pub status: QuoteStatus,
}

/// Headcount of one skill on an event team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamMember {
    pub skill_id: String,
    pub count: u32,
}

/// One coverage session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EventItem {
    pub id: String,
    pub name: String,
    /// Gates whether `date` and `time_range` are meaningful.
    pub is_date_decided: bool,
    pub date: String,
    pub time_range: String,
    /// Gates whether `venue` is meaningful.
    pub is_venue_decided: bool,
    pub venue: String,
    pub duration: String,
    pub team: Vec<TeamMember>,
    pub notes: String,
    #[serde(with = "money::lenient_price")]
    pub approx_cost: Decimal,
}

/// Optional line item added on top of the package.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AddOn {
    pub id: String,
    pub service: String,
    pub description: String,
    #[serde(with = "money::lenient_price")]
    pub price: Decimal,
}

/// A scheduled or recorded payment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaymentMilestone {
    pub id: String,
    pub name: String,
    pub kind: MilestoneKind,
    /// Percentage points or fixed currency, as entered.
    #[serde(with = "money::lenient")]
    pub value: Decimal,
    /// Derived currency amount; refreshed only when this milestone is edited.
    #[serde(with = "money::lenient")]
    pub amount: Decimal,
    pub due_date: String,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,
    /// Opaque reference to an uploaded payment proof.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<String>,
}

/// Financial configuration of a quotation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Financials {
    pub package_name: String,
    /// Stored sum of event costs, kept current by [`crate::sync`].
    #[serde(with = "money::lenient")]
    pub base_amount: Decimal,
    #[serde(with = "money::lenient")]
    pub discount: Decimal,
    /// Tax percentage, used only when the calculator runs in tax mode.
    #[serde(with = "money::lenient_opt", skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Decimal>,
    #[serde(with = "money::lenient")]
    pub advance_amount: Decimal,
    pub payment_milestones: Vec<PaymentMilestone>,
    pub notes: String,
}

/// Free-text terms and deliverables. Never parsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TermsAndDeliverables {
    pub deliverables: String,
    pub delivery_timeline: String,
    pub bank_details: String,
    pub payment_terms: String,
    pub terms: String,
    pub client_sign_name: String,
    pub studio_sign_name: String,
}

/// The quotation aggregate: everything one proposal is computed from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Quotation {
    pub client: ClientDetails,
    pub events: Vec<EventItem>,
    pub financials: Financials,
    pub add_ons: Vec<AddOn>,
    pub meta: TermsAndDeliverables,
}

impl Quotation {
    pub fn event(&self, id: &str) -> Option<&EventItem> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn add_on(&self, id: &str) -> Option<&AddOn> {
        self.add_ons.iter().find(|a| a.id == id)
    }

    pub fn milestone(&self, id: &str) -> Option<&PaymentMilestone> {
        self.financials
            .payment_milestones
            .iter()
            .find(|m| m.id == id)
    }
}

// ── Field selectors ──

/// Free-text client fields addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientField {
    Name,
    Company,
    Phone,
    Email,
    Address,
    Tagline,
    Locations,
    Reference,
    QuoteNumber,
    Date,
    ValidTill,
}

impl FromStr for ClientField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "name" => Ok(ClientField::Name),
            "company" => Ok(ClientField::Company),
            "phone" => Ok(ClientField::Phone),
            "email" => Ok(ClientField::Email),
            "address" => Ok(ClientField::Address),
            "tagline" => Ok(ClientField::Tagline),
            "locations" => Ok(ClientField::Locations),
            "reference" => Ok(ClientField::Reference),
            "quotenumber" | "number" => Ok(ClientField::QuoteNumber),
            "date" => Ok(ClientField::Date),
            "validtill" => Ok(ClientField::ValidTill),
            _ => Err(CoreError::unknown("client field", s)),
        }
    }
}

impl ClientField {
    pub(crate) fn slot<'a>(&self, client: &'a mut ClientDetails) -> &'a mut String {
        match self {
            ClientField::Name => &mut client.name,
            ClientField::Company => &mut client.company,
            ClientField::Phone => &mut client.phone,
            ClientField::Email => &mut client.email,
            ClientField::Address => &mut client.address,
            ClientField::Tagline => &mut client.tagline,
            ClientField::Locations => &mut client.locations,
            ClientField::Reference => &mut client.reference,
            ClientField::QuoteNumber => &mut client.quote_number,
            ClientField::Date => &mut client.date,
            ClientField::ValidTill => &mut client.valid_till,
        }
    }
}

/// Terms/deliverables fields addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaField {
    Deliverables,
    DeliveryTimeline,
    BankDetails,
    PaymentTerms,
    Terms,
    ClientSignName,
    StudioSignName,
}

impl FromStr for MetaField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "deliverables" => Ok(MetaField::Deliverables),
            "deliverytimeline" | "timeline" => Ok(MetaField::DeliveryTimeline),
            "bankdetails" | "bank" => Ok(MetaField::BankDetails),
            "paymentterms" => Ok(MetaField::PaymentTerms),
            "terms" => Ok(MetaField::Terms),
            "clientsignname" => Ok(MetaField::ClientSignName),
            "studiosignname" => Ok(MetaField::StudioSignName),
            _ => Err(CoreError::unknown("terms field", s)),
        }
    }
}

impl MetaField {
    pub(crate) fn slot<'a>(&self, meta: &'a mut TermsAndDeliverables) -> &'a mut String {
        match self {
            MetaField::Deliverables => &mut meta.deliverables,
            MetaField::DeliveryTimeline => &mut meta.delivery_timeline,
            MetaField::BankDetails => &mut meta.bank_details,
            MetaField::PaymentTerms => &mut meta.payment_terms,
            MetaField::Terms => &mut meta.terms,
            MetaField::ClientSignName => &mut meta.client_sign_name,
            MetaField::StudioSignName => &mut meta.studio_sign_name,
        }
    }
}
