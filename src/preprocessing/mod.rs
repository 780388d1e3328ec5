//! Data preprocessing for the credit-risk pipeline
//!
//! Converts the mixed numeric/categorical application table into the
//! all-numeric table the classifier consumes, using statistics learned once
//! from training data:
//! - Missing-value imputation (median for numeric, most frequent for
//!   categorical)
//! - Standardization of numeric features with training-time mean/std
//! - Ordinal encoding of categorical features with a reserved sentinel for
//!   unseen labels (one-hot as a non-default alternative)

mod encoder;
mod imputer;
mod pipeline;
mod scaler;

pub use encoder::{OneHotEncoder, OrdinalEncoder, UNSEEN_LABEL_CODE};
pub use imputer::{ImputeStrategy, Imputer};
pub use pipeline::{CreditPreprocessor, EncoderKind};
pub use scaler::StandardScaler;
