//! Form layouts for each modal and their conversion into mutations.

use crate::form::Form;
use crate::modal::ModalMode;
use crate::mutations::Mutation;
use assetdesk_core::validation::{
    validate_asset_update, validate_branch, validate_dispose_reason, validate_new_asset,
    validate_new_password, validate_new_user, validate_transfer,
};
use assetdesk_core::{
    Asset, AssetStatus, AssetUpdate, Branch, BranchId, BranchInput, EntityIdType, MasterData,
    NewAsset, NewTransfer, NewUser, TransferDecision, TransferRequest, User, UserRole,
    ValidationError, KNOWN_CATEGORIES,
};

/// What a modal acts on.
#[derive(Debug, Clone, PartialEq)]
pub enum Subject {
    New,
    Asset(Asset),
    Branch(Branch),
    Transfer(TransferRequest),
    User(User),
    /// The signed-in account.
    Account,
}

/// Modal target plus the ids behind each choice field, index for index.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalTarget {
    pub subject: Subject,
    pub branch_ids: Vec<Option<BranchId>>,
    pub survey_category_ids: Vec<Option<i64>>,
    pub survey_year_ids: Vec<Option<i64>>,
}

impl ModalTarget {
    pub fn new(subject: Subject) -> Self {
        Self {
            subject,
            branch_ids: Vec::new(),
            survey_category_ids: Vec::new(),
            survey_year_ids: Vec::new(),
        }
    }

    fn branch_at(&self, form: &Form, key: &str) -> Option<BranchId> {
        form.selected(key)
            .and_then(|idx| self.branch_ids.get(idx).copied())
            .flatten()
    }
}

fn branch_choice(branches: &[&Branch], with_global: bool) -> (Vec<String>, Vec<Option<BranchId>>) {
    let mut labels = Vec::with_capacity(branches.len() + 1);
    let mut ids = Vec::with_capacity(branches.len() + 1);
    if with_global {
        labels.push("Global (no branch)".to_string());
        ids.push(None);
    }
    for branch in branches {
        labels.push(branch.name.clone());
        ids.push(Some(branch.id));
    }
    (labels, ids)
}

fn position_of(ids: &[Option<BranchId>], wanted: Option<BranchId>) -> usize {
    ids.iter().position(|id| *id == wanted).unwrap_or(0)
}

fn categories_with(current: Option<&str>) -> Vec<String> {
    let mut categories: Vec<String> = KNOWN_CATEGORIES.iter().map(|c| c.to_string()).collect();
    if let Some(current) = current {
        if !categories.iter().any(|c| c == current) {
            categories.push(current.to_string());
        }
    }
    categories
}

fn statuses() -> Vec<String> {
    AssetStatus::all()
        .iter()
        .map(|s| s.as_wire_str().to_string())
        .collect()
}

fn roles() -> Vec<String> {
    UserRole::all()
        .iter()
        .map(|r| r.as_wire_str().to_string())
        .collect()
}

fn parse_amount(form: &Form, key: &str) -> Result<Option<f64>, ValidationError> {
    match form.optional(key) {
        None => Ok(None),
        Some(raw) => raw
            .replace(',', "")
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ValidationError::invalid(key, "must be a number")),
    }
}

fn parse_quantity(form: &Form, key: &str) -> Result<Option<u32>, ValidationError> {
    match form.optional(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u32>()
            .map(Some)
            .map_err(|_| ValidationError::invalid(key, "must be a whole number")),
    }
}

fn amount_text(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ============================================================================
// FORMS
// ============================================================================

/// Add-asset form. `code` is the suggested next asset code, if known.
pub fn create_asset(
    branches: &[Branch],
    default_branch: Option<BranchId>,
    code: &str,
) -> (ModalTarget, Form) {
    let sorted: Vec<&Branch> = branches.iter().collect();
    let (labels, ids) = branch_choice(&sorted, false);
    let selected = position_of(&ids, default_branch);
    let form = Form::new()
        .choice("category", "Category", categories_with(None), 0)
        .text("assetId", "Asset Code", code)
        .text("name", "Asset Name", "")
        .choice("branchId", "Branch", labels, selected)
        .text("quantity", "Quantity", "1")
        .text("value", "Current Value (LKR)", "0")
        .text("purchasePrice", "Purchase Price (LKR)", "")
        .text("revaluationPrice", "Reevaluation Price", "")
        .text("purchaseDate", "Purchase Date (YYYY-MM-DD)", "")
        .text("grnNumber", "GRN Number", "")
        .text("inventoryPageNo", "Inventory Page", "")
        .text("currentLocation", "Current Location", "")
        .text("newSection", "New Section", "")
        .text("remarks", "Remarks", "");
    let mut target = ModalTarget::new(Subject::New);
    target.branch_ids = ids;
    (target, form)
}

pub fn edit_asset(asset: &Asset, branches: &[Branch], master: &MasterData) -> (ModalTarget, Form) {
    let sorted: Vec<&Branch> = branches.iter().collect();
    let (branch_labels, branch_ids) = branch_choice(&sorted, false);
    let categories = categories_with(Some(&asset.category));
    let category_idx = categories
        .iter()
        .position(|c| *c == asset.category)
        .unwrap_or(0);
    let status_idx = AssetStatus::all()
        .iter()
        .position(|s| *s == asset.status)
        .unwrap_or(0);

    let mut survey_labels = vec!["(none)".to_string()];
    let mut survey_ids = vec![None];
    for category in &master.categories {
        survey_labels.push(format!("{} ({})", category.name, category.code));
        survey_ids.push(category.id);
    }
    let survey_idx = asset
        .board_of_survey_category
        .as_ref()
        .and_then(|current| {
            master
                .categories
                .iter()
                .position(|c| c.name == current.name)
        })
        .map_or(0, |idx| idx + 1);

    let mut year_labels = vec!["(none)".to_string()];
    let mut year_ids = vec![None];
    for year in &master.years {
        year_labels.push(year.year.to_string());
        year_ids.push(year.id);
    }
    let year_idx = asset
        .board_of_survey_year
        .as_ref()
        .and_then(|current| master.years.iter().position(|y| y.year == current.year))
        .map_or(0, |idx| idx + 1);

    let form = Form::new()
        .text("name", "Asset Name", &asset.name)
        .choice("category", "Category", categories, category_idx)
        .choice("status", "Status", statuses(), status_idx)
        .choice(
            "branchId",
            "Branch",
            branch_labels,
            position_of(&branch_ids, Some(asset.branch_id)),
        )
        .text("quantity", "Quantity", &asset.quantity.to_string())
        .text("value", "Current Value (LKR)", &asset.value.to_string())
        .text("purchasePrice", "Purchase Price (LKR)", &amount_text(asset.purchase_price))
        .text(
            "revaluationPrice",
            "Reevaluation Price",
            &amount_text(asset.revaluation_price),
        )
        .text(
            "purchaseDate",
            "Purchase Date (YYYY-MM-DD)",
            asset.purchase_date.as_deref().unwrap_or(""),
        )
        .text(
            "currentLocation",
            "Current Location",
            asset.current_location.as_deref().unwrap_or(""),
        )
        .text("remarks", "Remarks", asset.remarks.as_deref().unwrap_or(""))
        .choice("surveyCategory", "Board of Survey Category", survey_labels, survey_idx)
        .choice("surveyYear", "Board of Survey Year", year_labels, year_idx);

    let mut target = ModalTarget::new(Subject::Asset(asset.clone()));
    target.branch_ids = branch_ids;
    target.survey_category_ids = survey_ids;
    target.survey_year_ids = year_ids;
    (target, form)
}

pub fn dispose_asset(asset: &Asset) -> (ModalTarget, Form) {
    (
        ModalTarget::new(Subject::Asset(asset.clone())),
        Form::new().text("reason", "Reason for Disposal", ""),
    )
}

/// Destination choices exclude the asset's current branch.
pub fn transfer_asset(asset: &Asset, branches: &[Branch]) -> (ModalTarget, Form) {
    let others: Vec<&Branch> = branches.iter().filter(|b| b.id != asset.branch_id).collect();
    let (labels, ids) = branch_choice(&others, false);
    let form = Form::new()
        .choice("toBranchId", "Destination Branch", labels, 0)
        .text("reason", "Reason for Transfer", "");
    let mut target = ModalTarget::new(Subject::Asset(asset.clone()));
    target.branch_ids = ids;
    (target, form)
}

pub fn review_transfer(transfer: &TransferRequest) -> (ModalTarget, Form) {
    (
        ModalTarget::new(Subject::Transfer(transfer.clone())),
        Form::new().text("remarks", "Remarks (Optional)", ""),
    )
}

pub fn branch_form(branch: Option<&Branch>) -> (ModalTarget, Form) {
    let subject = branch.map_or(Subject::New, |b| Subject::Branch(b.clone()));
    let form = Form::new()
        .text("name", "Branch Name", branch.map_or("", |b| b.name.as_str()))
        .text("location", "Location", branch.map_or("", |b| b.location.as_str()));
    (ModalTarget::new(subject), form)
}

pub fn create_user(branches: &[Branch]) -> (ModalTarget, Form) {
    let sorted: Vec<&Branch> = branches.iter().collect();
    let (labels, ids) = branch_choice(&sorted, true);
    let staff = UserRole::all()
        .iter()
        .position(|r| *r == UserRole::Staff)
        .unwrap_or(0);
    let form = Form::new()
        .text("name", "Full Name", "")
        .text("email", "Email", "")
        .secret("password", "Password")
        .choice("role", "Role", roles(), staff)
        .choice("branchId", "Branch", labels, 0);
    let mut target = ModalTarget::new(Subject::New);
    target.branch_ids = ids;
    (target, form)
}

pub fn edit_role(user: &User) -> (ModalTarget, Form) {
    let current = UserRole::all()
        .iter()
        .position(|r| *r == user.role)
        .unwrap_or(0);
    (
        ModalTarget::new(Subject::User(user.clone())),
        Form::new().choice("role", "Select New Role", roles(), current),
    )
}

pub fn change_password() -> (ModalTarget, Form) {
    (
        ModalTarget::new(Subject::Account),
        Form::new()
            .secret("oldPassword", "Current Password")
            .secret("newPassword", "New Password")
            .secret("confirmPassword", "Confirm New Password"),
    )
}

/// Confirmation dialogs carry no fields.
pub fn confirm(subject: Subject) -> (ModalTarget, Form) {
    (ModalTarget::new(subject), Form::new())
}

// ============================================================================
// SUBMISSION
// ============================================================================

fn mismatch(mode: ModalMode) -> ValidationError {
    ValidationError::invalid("form", format!("{} has nothing to act on", mode.title()))
}

/// Validates the form and turns it into the request to send.
pub fn build_mutation(
    target: &ModalTarget,
    mode: ModalMode,
    form: &Form,
) -> Result<Mutation, ValidationError> {
    match (mode, &target.subject) {
        (ModalMode::CreateAsset, _) => {
            let branch = target
                .branch_at(form, "branchId")
                .ok_or_else(|| ValidationError::missing("branchId"))?;
            let mut asset = NewAsset::new(
                form.value("assetId"),
                form.value("name"),
                form.value("category"),
                branch,
            );
            if let Some(quantity) = parse_quantity(form, "quantity")? {
                asset.quantity = quantity;
            }
            asset.value = parse_amount(form, "value")?.unwrap_or(0.0);
            asset.purchase_price = parse_amount(form, "purchasePrice")?;
            asset.revaluation_price = parse_amount(form, "revaluationPrice")?;
            asset.purchase_date = form.optional("purchaseDate");
            asset.grn_number = form.optional("grnNumber");
            asset.inventory_page_no = form.optional("inventoryPageNo");
            asset.current_location = form.optional("currentLocation");
            asset.new_section = form.optional("newSection");
            asset.remarks = form.optional("remarks");
            validate_new_asset(&asset)?;
            Ok(Mutation::CreateAsset(asset))
        }
        (ModalMode::EditAsset, Subject::Asset(asset)) => {
            let status = AssetStatus::from_wire_str(&form.value("status"))
                .map_err(|e| ValidationError::invalid("status", e.to_string()))?;
            let update = AssetUpdate {
                name: Some(form.value("name")),
                category: Some(form.value("category")),
                status: Some(status),
                value: parse_amount(form, "value")?,
                branch_id: target.branch_at(form, "branchId"),
                quantity: parse_quantity(form, "quantity")?,
                purchase_date: form.optional("purchaseDate"),
                purchase_price: parse_amount(form, "purchasePrice")?,
                revaluation_price: parse_amount(form, "revaluationPrice")?,
                remarks: form.optional("remarks"),
                current_location: form.optional("currentLocation"),
                board_of_survey_category_id: form
                    .selected("surveyCategory")
                    .and_then(|idx| target.survey_category_ids.get(idx).copied())
                    .flatten(),
                board_of_survey_year_id: form
                    .selected("surveyYear")
                    .and_then(|idx| target.survey_year_ids.get(idx).copied())
                    .flatten(),
            };
            validate_asset_update(&update)?;
            Ok(Mutation::UpdateAsset {
                id: asset.id,
                update,
            })
        }
        (ModalMode::DisposeAsset, Subject::Asset(asset)) => {
            let reason = form.value("reason");
            validate_dispose_reason(&reason)?;
            Ok(Mutation::DisposeAsset {
                id: asset.id,
                reason,
            })
        }
        (ModalMode::RestoreAsset, Subject::Asset(asset)) => Ok(Mutation::RestoreAsset(asset.id)),
        (ModalMode::TransferAsset, Subject::Asset(asset)) => {
            let transfer = NewTransfer {
                asset_id: asset.id,
                to_branch_id: target
                    .branch_at(form, "toBranchId")
                    .unwrap_or_else(|| BranchId::new(0)),
                reason: form.value("reason"),
            };
            validate_transfer(&transfer, asset.branch_id)?;
            Ok(Mutation::RequestTransfer(transfer))
        }
        (ModalMode::ApproveTransfer | ModalMode::RejectTransfer, Subject::Transfer(transfer)) => {
            let decision = if mode == ModalMode::ApproveTransfer {
                TransferDecision::Approved
            } else {
                TransferDecision::Rejected
            };
            Ok(Mutation::ReviewTransfer {
                id: transfer.id,
                decision,
                remarks: form.optional("remarks"),
            })
        }
        (ModalMode::CreateBranch, _) => {
            let input = BranchInput {
                name: form.value("name"),
                location: form.value("location"),
            };
            validate_branch(&input)?;
            Ok(Mutation::CreateBranch(input))
        }
        (ModalMode::EditBranch, Subject::Branch(branch)) => {
            let input = BranchInput {
                name: form.value("name"),
                location: form.value("location"),
            };
            validate_branch(&input)?;
            Ok(Mutation::UpdateBranch {
                id: branch.id,
                input,
            })
        }
        (ModalMode::DeleteBranch, Subject::Branch(branch)) => Ok(Mutation::DeleteBranch(branch.id)),
        (ModalMode::CreateUser, _) => {
            let role = form
                .selected("role")
                .and_then(|idx| UserRole::all().get(idx).copied())
                .ok_or_else(|| ValidationError::missing("role"))?;
            let user = NewUser {
                name: form.value("name"),
                email: form.value("email"),
                password: form.raw_value("password"),
                role,
                branch_id: target.branch_at(form, "branchId"),
            };
            validate_new_user(&user)?;
            Ok(Mutation::CreateUser(user))
        }
        (ModalMode::EditRole, Subject::User(user)) => {
            let role = form
                .selected("role")
                .and_then(|idx| UserRole::all().get(idx).copied())
                .ok_or_else(|| ValidationError::missing("role"))?;
            Ok(Mutation::UpdateRole { id: user.id, role })
        }
        (ModalMode::DeleteUser, Subject::User(user)) => Ok(Mutation::DeleteUser(user.id)),
        (ModalMode::ChangePassword, _) => {
            let old_password = form.raw_value("oldPassword");
            if old_password.is_empty() {
                return Err(ValidationError::missing("oldPassword"));
            }
            let new_password = form.raw_value("newPassword");
            validate_new_password(&new_password, &form.raw_value("confirmPassword"))?;
            Ok(Mutation::ChangePassword {
                old_password,
                new_password,
            })
        }
        (mode, _) => Err(mismatch(mode)),
    }
}
