//! Push delivery port trait.
//!
//! The actual gateway call lives behind this seam; the core only produces
//! payload batches.

use crate::domain::alerts::PushMessage;
use crate::domain::error::CalldeskError;

pub trait PushPort {
    fn deliver(&self, messages: &[PushMessage]) -> Result<(), CalldeskError>;
}
