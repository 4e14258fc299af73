//! Contract signing state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::patch::Validate;

/// Captured signatures. The signature payloads are opaque to the engine
/// (typically an encoded image from the signing pad).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureData {
    pub contractor: Option<String>,
    pub customer: Option<String>,
    pub contractor_date: Option<DateTime<Utc>>,
    pub customer_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub signatures: SignatureData,
    pub agreed_to_terms: bool,
    pub deposit_paid: bool,
}

impl ContractConfig {
    pub fn apply(&mut self, patch: ContractPatch) {
        if let Some(signatures) = patch.signatures {
            self.signatures = signatures;
        }
        if let Some(agreed) = patch.agreed_to_terms {
            self.agreed_to_terms = agreed;
        }
        if let Some(paid) = patch.deposit_paid {
            self.deposit_paid = paid;
        }
    }

    /// Both parties have signed and the customer accepted the terms.
    pub fn is_executed(&self) -> bool {
        self.agreed_to_terms && self.signatures.contractor.is_some() && self.signatures.customer.is_some()
    }
}

/// Partial update for [`ContractConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContractPatch {
    pub signatures: Option<SignatureData>,
    pub agreed_to_terms: Option<bool>,
    pub deposit_paid: Option<bool>,
}

impl Validate for ContractPatch {
    fn validate(&self) -> EstimateResult<()> {
        if let Some(sig) = &self.signatures {
            if sig.customer_date.is_some() && sig.customer.is_none() {
                return Err(EstimateError::invalid_input(
                    "signatures.customer_date",
                    "set",
                    "Customer signature date given without a signature",
                ));
            }
            if sig.contractor_date.is_some() && sig.contractor.is_none() {
                return Err(EstimateError::invalid_input(
                    "signatures.contractor_date",
                    "set",
                    "Contractor signature date given without a signature",
                ));
            }
        }
        Ok(())
    }
}
