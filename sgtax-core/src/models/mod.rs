mod citizenship;
mod payer_category;
mod relief_inputs;
mod tax_bracket;
mod tax_computation;

pub use citizenship::{CitizenshipCategory, ParseCitizenshipError};
pub use payer_category::{ParsePayerCategoryError, PayerCategory};
pub use relief_inputs::ReliefInputs;
pub use tax_bracket::TaxBracket;
pub use tax_computation::{BracketContribution, TaxComputationResult};
