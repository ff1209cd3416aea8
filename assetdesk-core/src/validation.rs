//! Required-field checks run before a form is submitted.
//!
//! These are deliberately shallow; the server remains the authority.

use crate::entities::{AssetUpdate, BranchInput, NewAsset, NewTransfer, NewUser};
use crate::error::ValidationError;
use crate::identity::{BranchId, EntityIdType};

pub const MIN_PASSWORD_LEN: usize = 6;

fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::missing(field));
    }
    Ok(())
}

fn non_negative(field: &str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(ValidationError::invalid(field, "must be a non-negative number"))
        }
        _ => Ok(()),
    }
}

fn valid_branch(branch_id: BranchId) -> Result<(), ValidationError> {
    if branch_id.as_i64() <= 0 {
        return Err(ValidationError::missing("branchId"));
    }
    Ok(())
}

pub fn validate_new_asset(asset: &NewAsset) -> Result<(), ValidationError> {
    require("category", &asset.category)?;
    require("assetId", &asset.asset_code)?;
    require("name", &asset.name)?;
    valid_branch(asset.branch_id)?;
    if asset.quantity == 0 {
        return Err(ValidationError::invalid("quantity", "must be at least 1"));
    }
    non_negative("value", Some(asset.value))?;
    non_negative("purchasePrice", asset.purchase_price)?;
    non_negative("revaluationPrice", asset.revaluation_price)?;
    Ok(())
}

pub fn validate_asset_update(update: &AssetUpdate) -> Result<(), ValidationError> {
    if let Some(name) = &update.name {
        require("name", name)?;
    }
    if let Some(category) = &update.category {
        require("category", category)?;
    }
    if let Some(branch_id) = update.branch_id {
        valid_branch(branch_id)?;
    }
    if update.quantity == Some(0) {
        return Err(ValidationError::invalid("quantity", "must be at least 1"));
    }
    non_negative("value", update.value)?;
    non_negative("purchasePrice", update.purchase_price)?;
    non_negative("revaluationPrice", update.revaluation_price)?;
    Ok(())
}

pub fn validate_dispose_reason(reason: &str) -> Result<(), ValidationError> {
    require("reason", reason)
}

/// Checks that can be made without knowing where the asset currently is.
pub fn validate_transfer_request(transfer: &NewTransfer) -> Result<(), ValidationError> {
    valid_branch(transfer.to_branch_id).map_err(|_| ValidationError::missing("toBranchId"))?;
    require("reason", &transfer.reason)
}

/// `from_branch` is the asset's current branch.
pub fn validate_transfer(
    transfer: &NewTransfer,
    from_branch: BranchId,
) -> Result<(), ValidationError> {
    validate_transfer_request(transfer)?;
    if transfer.to_branch_id == from_branch {
        return Err(ValidationError::SameBranchTransfer);
    }
    Ok(())
}

pub fn validate_branch(input: &BranchInput) -> Result<(), ValidationError> {
    require("name", &input.name)?;
    require("location", &input.location)
}

pub fn validate_new_user(user: &NewUser) -> Result<(), ValidationError> {
    require("name", &user.name)?;
    require("email", &user.email)?;
    if !user.email.contains('@') {
        return Err(ValidationError::invalid("email", "must be an email address"));
    }
    require("password", &user.password)
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    require("email", email)?;
    require("password", password)
}

/// Checks a new password and its confirmation.
pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::AssetId;

    #[test]
    fn new_asset_requires_name_and_code() {
        let mut asset = NewAsset::new("FUR-0001", "Desk", "Furniture", BranchId::new(1));
        assert!(validate_new_asset(&asset).is_ok());

        asset.name = "   ".into();
        assert_eq!(validate_new_asset(&asset), Err(ValidationError::missing("name")));

        asset.name = "Desk".into();
        asset.asset_code.clear();
        assert_eq!(validate_new_asset(&asset), Err(ValidationError::missing("assetId")));
    }

    #[test]
    fn new_asset_rejects_negative_prices() {
        let mut asset = NewAsset::new("FUR-0001", "Desk", "Furniture", BranchId::new(1));
        asset.purchase_price = Some(-1.0);
        assert!(matches!(
            validate_new_asset(&asset),
            Err(ValidationError::InvalidValue { ref field, .. }) if field == "purchasePrice"
        ));
    }

    #[test]
    fn transfer_to_same_branch_is_rejected() {
        let transfer = NewTransfer {
            asset_id: AssetId::new(9),
            to_branch_id: BranchId::new(2),
            reason: "Relocation".into(),
        };
        assert_eq!(
            validate_transfer(&transfer, BranchId::new(2)),
            Err(ValidationError::SameBranchTransfer)
        );
        assert!(validate_transfer(&transfer, BranchId::new(1)).is_ok());
    }

    #[test]
    fn transfer_needs_reason() {
        let transfer = NewTransfer {
            asset_id: AssetId::new(9),
            to_branch_id: BranchId::new(2),
            reason: String::new(),
        };
        assert_eq!(
            validate_transfer(&transfer, BranchId::new(1)),
            Err(ValidationError::missing("reason"))
        );
    }

    #[test]
    fn password_rules() {
        assert_eq!(
            validate_new_password("abc", "abc"),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert_eq!(
            validate_new_password("secret1", "secret2"),
            Err(ValidationError::PasswordMismatch)
        );
        assert!(validate_new_password("secret1", "secret1").is_ok());
    }

    #[test]
    fn partial_update_only_checks_present_fields() {
        assert!(validate_asset_update(&AssetUpdate::default()).is_ok());
        let update = AssetUpdate {
            name: Some(String::new()),
            ..AssetUpdate::default()
        };
        assert!(validate_asset_update(&update).is_err());
    }
}
