pub mod insurance;
pub mod lenient;
pub mod medicine;
pub mod purchase;
pub mod report;
pub mod sale;
pub mod user;

// Re-export only the types we actually use
pub use insurance::{InsurancePayment, InsurancePaymentRow, InsuranceRecord, InsuranceRecordRow};
pub use medicine::{Medicine, MedicineRow};
pub use purchase::{Purchase, PurchaseRow, PurchaseStatus};
pub use report::{FinancialSummary, InsuranceStatusReport, NetProfitReport, PurchaseExpenses};
pub use sale::{Earning, EarningRow, Expense, ExpenseRow, Sale, SaleRow};
pub use user::LoginOutcome;
