//! New record validation.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::BoardError;
use crate::logging::structured::LogContext;
use crate::store::models::NewMachine;
use crate::store::record_store::RecordStore;
use crate::log_warn;

/// Longest hostname accepted in strict mode.
pub const MAX_HOSTNAME_LEN: usize = 253;

lazy_static! {
    /// RFC 1123 hostname: dot-separated labels of letters, digits and inner hyphens
    static ref HOSTNAME_PATTERN: Regex = Regex::new(
        r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$"
    ).unwrap();
}

/// Check that `hostname` is a well-formed RFC 1123 hostname.
pub fn is_valid_hostname(hostname: &str) -> bool {
    hostname.len() <= MAX_HOSTNAME_LEN && HOSTNAME_PATTERN.is_match(hostname)
}

/// Validate a new record against the store, returning it with a trimmed
/// hostname.
///
/// Rejects an empty hostname, a malformed one in strict mode, and a product
/// id that names no product. An undeclared sub-product only logs a warning.
pub fn validate_new_machine(
    mut data: NewMachine,
    store: &RecordStore,
    strict_hostnames: bool,
    ctx: &LogContext,
) -> Result<NewMachine, BoardError> {
    data.hostname = data.hostname.trim().to_string();

    if data.hostname.is_empty() {
        log_warn!(ctx, "VALIDATION_FAILED", field = "hostname", reason = "empty");
        return Err(BoardError::Validation("Hostname is required".to_string()));
    }

    if strict_hostnames && !is_valid_hostname(&data.hostname) {
        log_warn!(ctx, "VALIDATION_FAILED", field = "hostname", reason = "pattern", hostname = data.hostname);
        return Err(BoardError::Validation(format!(
            "Invalid hostname: {}",
            data.hostname
        )));
    }

    if let Some(pid) = data.product_id.as_deref() {
        match store.product(pid) {
            None => {
                log_warn!(ctx, "VALIDATION_FAILED", field = "productId", product = pid);
                return Err(BoardError::UnknownProduct(pid.to_string()));
            }
            Some(product) => {
                if let Some(sp) = data.sub_product.as_deref() {
                    if !product.declares(sp) {
                        log_warn!(ctx, "ORPHAN_SUB_PRODUCT", product = pid, sub_product = sp);
                    }
                }
            }
        }
    }

    Ok(data)
}
