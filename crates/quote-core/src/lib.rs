pub mod catalog;
pub mod defaults;
pub mod editor;
pub mod error;
pub mod milestone;
pub mod money;
pub mod sync;
pub mod totals;
pub mod types;

pub use catalog::Catalog;
pub use editor::QuoteEditor;
pub use error::CoreError;
pub use totals::{compute_totals, PaymentTracking, TaxMode, Totals, TotalsConfig};
pub use types::*;
