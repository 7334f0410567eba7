//! # Payment Method
//!
//! The payment method a customer names at checkout. No money moves through
//! Folio; the method is a promise about how payment will happen at pickup,
//! so all we do is validate the shape of what was entered and keep a label.
//!
//! ## The Tagged Union
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PaymentMethod                                                          │
//! │                                                                         │
//! │  Cash ────────────────────────► label "Numerário"   no fields          │
//! │                                                                         │
//! │  MobileWallet                                                           │
//! │  ├── provider: MPesa ─────────► label "M-Pesa"      number: 84x/85x    │
//! │  └── provider: EMola ─────────► label "e-Mola"      number: 9 digits   │
//! │                                                                         │
//! │  CardTerminal ────────────────► label "POS"         card present at    │
//! │                                                     pickup, nothing    │
//! │                                                     persisted          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only the label string reaches the database. Wallet numbers are checked at
//! the boundary and then dropped.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::{validate_wallet_number, ValidationResult};

// =============================================================================
// Wallet Provider
// =============================================================================

/// Mobile wallet operators accepted at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum WalletProvider {
    MPesa,
    EMola,
}

impl WalletProvider {
    /// Display label, as printed on receipts.
    pub const fn label(&self) -> &'static str {
        match self {
            WalletProvider::MPesa => "M-Pesa",
            WalletProvider::EMola => "e-Mola",
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer intends to pay at pickup.
///
/// Each variant carries exactly the fields that need validating; variants
/// with no verifiable payload carry nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash at the counter.
    Cash,
    /// Mobile wallet transfer; the number is validated, never stored.
    MobileWallet {
        provider: WalletProvider,
        number: String,
    },
    /// Card on the physical terminal. Card data never enters the system.
    CardTerminal,
}

impl PaymentMethod {
    /// Display label, stored on the reservation header.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Numerário",
            PaymentMethod::MobileWallet { provider, .. } => provider.label(),
            PaymentMethod::CardTerminal => "POS",
        }
    }

    /// Validates the variant's payload.
    ///
    /// ## Rules
    /// - Cash and CardTerminal have nothing to check
    /// - Wallet numbers must be exactly 9 digits after stripping separators
    /// - M-Pesa numbers must start with 84 or 85
    pub fn validate(&self) -> ValidationResult<()> {
        match self {
            PaymentMethod::Cash | PaymentMethod::CardTerminal => Ok(()),
            PaymentMethod::MobileWallet { provider, number } => {
                validate_wallet_number(*provider, number)
            }
        }
    }

    /// Validates and returns the label in one step, for the builder path.
    pub fn validated_label(&self) -> Result<&'static str, ValidationError> {
        self.validate()?;
        Ok(self.label())
    }
}

/// Walk-in customers pay cash unless they say otherwise.
impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(PaymentMethod::Cash.label(), "Numerário");
        assert_eq!(PaymentMethod::CardTerminal.label(), "POS");
        assert_eq!(
            PaymentMethod::MobileWallet {
                provider: WalletProvider::MPesa,
                number: "841234567".to_string(),
            }
            .label(),
            "M-Pesa"
        );
        assert_eq!(
            PaymentMethod::MobileWallet {
                provider: WalletProvider::EMola,
                number: "861234567".to_string(),
            }
            .label(),
            "e-Mola"
        );
    }

    #[test]
    fn test_cash_and_terminal_always_valid() {
        assert!(PaymentMethod::Cash.validate().is_ok());
        assert!(PaymentMethod::CardTerminal.validate().is_ok());
    }

    #[test]
    fn test_mpesa_number_rules() {
        let valid = PaymentMethod::MobileWallet {
            provider: WalletProvider::MPesa,
            number: "84 123 4567".to_string(),
        };
        assert!(valid.validate().is_ok());

        let wrong_prefix = PaymentMethod::MobileWallet {
            provider: WalletProvider::MPesa,
            number: "861234567".to_string(),
        };
        assert!(wrong_prefix.validate().is_err());

        let too_short = PaymentMethod::MobileWallet {
            provider: WalletProvider::MPesa,
            number: "8412345".to_string(),
        };
        assert!(too_short.validate().is_err());
    }

    #[test]
    fn test_emola_number_rules() {
        // e-Mola only requires nine digits
        let valid = PaymentMethod::MobileWallet {
            provider: WalletProvider::EMola,
            number: "861234567".to_string(),
        };
        assert!(valid.validate().is_ok());

        let too_long = PaymentMethod::MobileWallet {
            provider: WalletProvider::EMola,
            number: "8612345678".to_string(),
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_default_is_cash() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
    }

    #[test]
    fn test_serde_tagged_shape() {
        let method = PaymentMethod::MobileWallet {
            provider: WalletProvider::MPesa,
            number: "841234567".to_string(),
        };
        let json = serde_json::to_string(&method).unwrap();
        assert!(json.contains("\"kind\":\"mobile_wallet\""));
        assert!(json.contains("\"provider\":\"m_pesa\""));

        let back: PaymentMethod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, method);
    }
}
