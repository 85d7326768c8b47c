pub mod audit;
pub mod error;
pub mod ledger;
pub mod report;
pub mod repository;

pub use audit::FieldChange;
pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use ledger::{InventoryModification, Sale, SaleDraft};
pub use report::Report;
pub use repository::InventoryRepository;
