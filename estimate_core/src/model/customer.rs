//! Customer contact details.

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::patch::Validate;

/// Who the building is for and where it goes.
///
/// Every field is free-form and may stay empty until the estimate is
/// submitted; see [`CustomerInfo::is_complete`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Street address of the build site
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl CustomerInfo {
    /// Shallow-merge a patch into this record.
    pub fn apply(&mut self, patch: CustomerPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(state) = patch.state {
            self.state = state;
        }
        if let Some(zip) = patch.zip {
            self.zip = zip;
        }
    }

    /// True once every contact field has been filled in.
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.phone, &self.address, &self.city, &self.state, &self.zip]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// Partial update for [`CustomerInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl Validate for CustomerPatch {
    fn validate(&self) -> EstimateResult<()> {
        if let Some(email) = &self.email {
            if !email.is_empty() && !email.contains('@') {
                return Err(EstimateError::invalid_input("email", email.as_str(), "Email must contain '@'"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_merges_only_given_fields() {
        let mut info = CustomerInfo {
            name: "Dana".to_string(),
            city: "Tulsa".to_string(),
            ..Default::default()
        };
        info.apply(CustomerPatch {
            email: Some("dana@example.com".to_string()),
            ..Default::default()
        });
        assert_eq!(info.name, "Dana");
        assert_eq!(info.city, "Tulsa");
        assert_eq!(info.email, "dana@example.com");
    }

    #[test]
    fn test_is_complete() {
        let mut info = CustomerInfo::default();
        assert!(!info.is_complete());
        info = CustomerInfo {
            name: "A".into(),
            email: "a@b.c".into(),
            phone: "555".into(),
            address: "1 Main".into(),
            city: "X".into(),
            state: "OK".into(),
            zip: "74101".into(),
        };
        assert!(info.is_complete());
    }

    #[test]
    fn test_email_validation() {
        let bad = CustomerPatch {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        assert!(CustomerPatch::default().validate().is_ok());
    }
}
