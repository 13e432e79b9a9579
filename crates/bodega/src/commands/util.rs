//! Shared helpers for command handlers.

use std::io::IsTerminal;

use bodega_core::{DocumentType, Role, SaleStatus};

use crate::cli::{DocumentArg, RoleArg, SaleStatusArg};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal the prompt cannot be answered, so `--yes` is required.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::InvalidArgument {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Read a secret without echo.
pub fn prompt_secret(label: &str) -> Result<String, CliError> {
    rpassword::prompt_password(label).map_err(prompt_err)
}

/// `"Sí"` / `"No"` for boolean table cells.
pub fn yes_no(value: bool) -> &'static str {
    if value { "Sí" } else { "No" }
}

pub fn role(arg: RoleArg) -> Role {
    match arg {
        RoleArg::Admin => Role::Admin,
        RoleArg::Seller => Role::Seller,
        RoleArg::Customer => Role::Customer,
    }
}

pub fn document(arg: DocumentArg) -> DocumentType {
    match arg {
        DocumentArg::Cc => DocumentType::Cc,
        DocumentArg::Ce => DocumentType::Ce,
        DocumentArg::Ti => DocumentType::Ti,
        DocumentArg::Nit => DocumentType::Nit,
        DocumentArg::Passport => DocumentType::Passport,
    }
}

pub fn sale_status(arg: SaleStatusArg) -> SaleStatus {
    match arg {
        SaleStatusArg::Pending => SaleStatus::Pending,
        SaleStatusArg::Completed => SaleStatus::Completed,
        SaleStatusArg::Cancelled => SaleStatus::Cancelled,
    }
}

/// Parse a `PRODUCT_ID:QUANTITY` sale item.
pub fn parse_item(raw: &str) -> Result<(String, u32), CliError> {
    let invalid = || CliError::InvalidArgument {
        field: "item".into(),
        reason: format!("expected PRODUCT_ID:QUANTITY, got '{raw}'"),
    };
    let (id, qty) = raw.rsplit_once(':').ok_or_else(invalid)?;
    let qty: u32 = qty.trim().parse().map_err(|_| invalid())?;
    if id.trim().is_empty() || qty == 0 {
        return Err(invalid());
    }
    Ok((id.trim().to_owned(), qty))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sale_items_parse() {
        assert_eq!(parse_item("p1:3").unwrap(), ("p1".into(), 3));
        assert!(parse_item("p1").is_err());
        assert!(parse_item("p1:0").is_err());
        assert!(parse_item(":2").is_err());
    }
}
