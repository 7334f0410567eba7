//! # Validation Module
//!
//! Boundary checks for everything typed by a human: names, phones,
//! emails, quantities, search text. The engine runs these before a
//! draft touches the database, so a reservation that passes validation
//! can only fail for stock or persistence reasons.
//!
//! A frontend may duplicate some of these checks for instant feedback,
//! and SQLite enforces its own NOT NULL and foreign-key rules further
//! down. This module is the layer in between, the one that owns the
//! business wording of each rejection.
//!
//! ## Usage
//! ```rust,no_run
//! use folio_core::validation::{validate_customer_name, validate_quantity};
//!
//! // Validate the checkout form before touching the database
//! validate_customer_name("Ana Macamo").unwrap();
//! validate_quantity(3).unwrap();
//! ```

use crate::error::ValidationError;
use crate::payment::WalletProvider;
use crate::MAX_LINE_QUANTITY;

/// Shorthand for results that fail with [`ValidationError`].
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a book title.
///
/// ## Rules
/// - Non-empty after trimming
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use folio_core::validation::validate_book_title;
///
/// assert!(validate_book_title("Dom Casmurro").is_ok());
/// assert!(validate_book_title("").is_err());
/// assert!(validate_book_title("A".repeat(300).as_str()).is_err());
/// ```
pub fn validate_book_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an author name. Non-empty after trimming, at most 120
/// characters.
pub fn validate_author(author: &str) -> ValidationResult<()> {
    let author = author.trim();

    if author.is_empty() {
        return Err(ValidationError::Required {
            field: "author".to_string(),
        });
    }

    if author.len() > 120 {
        return Err(ValidationError::TooLong {
            field: "author".to_string(),
            max: 120,
        });
    }

    Ok(())
}

/// Validates the customer name on a reservation draft.
///
/// This is the name staff will read off the slip at pickup, so an empty
/// or whitespace-only value is useless. Trimmed, at most 120 characters.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer name".to_string(),
        });
    }

    if name.len() > 120 {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: 120,
        });
    }

    Ok(())
}

/// Validates a contact phone number.
///
/// ## Rules
/// - Required, digits with optional spaces, `+`, `-`, parentheses
/// - At least 7 digits once separators are stripped
///
/// ## Example
/// ```rust
/// use folio_core::validation::validate_phone;
///
/// assert!(validate_phone("+258 84 123 4567").is_ok());
/// assert!(validate_phone("841234567").is_ok());
/// assert!(validate_phone("").is_err());
/// assert!(validate_phone("call me").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '+' || c == '-' || c == '(' || c == ')')
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, +, -, and parentheses".to_string(),
        });
    }

    let digit_count = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if digit_count < 7 {
        return Err(ValidationError::TooShort {
            field: "phone".to_string(),
            min: 7,
        });
    }

    Ok(())
}

/// Validates an optional e-mail address when one was provided.
///
/// Deliberately loose: a full RFC check buys nothing here, the address is
/// contact information staff dial or type by hand.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        });
    }

    Ok(())
}

/// Validates a mobile wallet number for the given provider.
///
/// ## Rules
/// - Separators (spaces, dashes) are stripped before checking
/// - Exactly 9 digits must remain
/// - M-Pesa numbers must start with 84 or 85
///
/// ## Example
/// ```rust
/// use folio_core::payment::WalletProvider;
/// use folio_core::validation::validate_wallet_number;
///
/// assert!(validate_wallet_number(WalletProvider::MPesa, "84 123 4567").is_ok());
/// assert!(validate_wallet_number(WalletProvider::MPesa, "861234567").is_err());
/// assert!(validate_wallet_number(WalletProvider::EMola, "861234567").is_ok());
/// ```
pub fn validate_wallet_number(provider: WalletProvider, number: &str) -> ValidationResult<()> {
    let cleaned: String = number.chars().filter(|c| c.is_ascii_digit()).collect();

    if cleaned.is_empty() {
        return Err(ValidationError::Required {
            field: "wallet number".to_string(),
        });
    }

    if cleaned.len() != 9 {
        return Err(ValidationError::InvalidFormat {
            field: "wallet number".to_string(),
            reason: "must be exactly 9 digits".to_string(),
        });
    }

    if provider == WalletProvider::MPesa
        && !(cleaned.starts_with("84") || cleaned.starts_with("85"))
    {
        return Err(ValidationError::InvalidFormat {
            field: "wallet number".to_string(),
            reason: "M-Pesa numbers start with 84 or 85".to_string(),
        });
    }

    Ok(())
}

/// Validates a free-text search needle for the reservation list.
///
/// An empty needle is fine and means no text filtering; anything past
/// 100 characters is rejected rather than fed to the matcher.
///
/// ## Returns
/// The trimmed needle.
pub fn validate_search_text(text: &str) -> ValidationResult<String> {
    let text = text.trim();

    if text.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "search text".to_string(),
            max: 100,
        });
    }

    Ok(text.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// Zero and negatives are rejected outright; anything above
/// [`MAX_LINE_QUANTITY`] is rejected as out of range. Stock clamping is
/// a separate concern and happens later, in the cart and at commit.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in centavos.
///
/// Negative prices are rejected. Zero passes, because giveaway titles
/// are a real thing at book fairs.
///
/// ## Example
/// ```rust
/// use folio_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(2500).is_ok());  // 25.00 MT
/// assert!(validate_price_cents(0).is_ok());     // Giveaway
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates that an id parses as a UUID.
///
/// Book and reservation ids are hyphenated UUID strings; anything else
/// is rejected before it can reach a query.
///
/// ## Example
/// ```rust
/// use folio_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    // Try to parse as UUID
    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
