//! Application state, key routing and result handling.
//!
//! `App` never awaits. Key handling returns an [`Effect`] that the event loop
//! executes (spawning the request), and the outcome comes back as an event.
//! Page data lives in the query coordinator; pages only hold observers,
//! which are created when a page is shown and dropped when it is left.

use crate::config::AppConfig;
use crate::dialogs::{self, ModalTarget, Subject};
use crate::form::Form;
use crate::keys::{map_form_key, map_key, Action, FormKey};
use crate::modal::{ModalMode, ModalState};
use crate::mutations::Mutation;
use crate::nav::Page;
use crate::notifications::Toasts;
use crate::persistence::PersistedState;
use crate::queries;
use crate::theme::Theme;
use assetdesk_client::{ApiError, AuthOutcome, HttpClient, Session};
use assetdesk_core::validation::validate_login;
use assetdesk_core::{
    split_branches, write_assets_csv, Asset, AssetFilter, AssetHistoryEntry, Branch, BranchId,
    DashboardStats, ExportError, MasterData, TransferFilter, TransferRequest, User, UserFilter,
    KNOWN_CATEGORIES,
};
use assetdesk_query::{query_key, QueryClient, QueryError, QueryObserver, RefetchPolicy};
use crossterm::event::KeyEvent;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Main,
}

/// Work the event loop performs on behalf of the state.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    Login { email: String, password: String },
    Mutate { ticket: u64, mutation: Mutation },
}

#[derive(Clone)]
pub struct LoginState {
    pub form: Form,
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginState {
    pub fn new() -> Self {
        Self {
            form: Form::new()
                .text("email", "Email", "")
                .secret("password", "Password"),
            error: None,
            submitting: false,
        }
    }
}

impl Default for LoginState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
pub struct DashboardPage {
    pub stats: Option<QueryObserver<DashboardStats>>,
}

#[derive(Default)]
pub struct AssetsPage {
    pub filter: AssetFilter,
    pub selected: usize,
    pub assets: Option<QueryObserver<Vec<Asset>>>,
    /// Transfer destinations and the add-asset branch list.
    pub branches: Option<QueryObserver<Vec<Branch>>>,
}

#[derive(Default)]
pub struct BranchesPage {
    pub search: String,
    pub selected: usize,
    pub branches: Option<QueryObserver<Vec<Branch>>>,
}

#[derive(Default)]
pub struct BranchAssetsPage {
    pub branch_id: Option<BranchId>,
    pub filter: AssetFilter,
    pub selected: usize,
    pub branch: Option<QueryObserver<Branch>>,
    pub assets: Option<QueryObserver<Vec<Asset>>>,
    pub branches: Option<QueryObserver<Vec<Branch>>>,
}

#[derive(Default)]
pub struct TransfersPage {
    pub filter: TransferFilter,
    pub selected: usize,
    pub transfers: Option<QueryObserver<Vec<TransferRequest>>>,
}

#[derive(Default)]
pub struct UsersPage {
    pub filter: UserFilter,
    pub selected: usize,
    pub users: Option<QueryObserver<Vec<User>>>,
    pub branches: Option<QueryObserver<Vec<Branch>>>,
}

pub struct App {
    pub config: AppConfig,
    pub theme: Theme,
    pub api: HttpClient,
    pub queries: QueryClient,
    pub screen: Screen,
    pub login: LoginState,
    pub page: Page,

    pub dashboard: DashboardPage,
    pub assets: AssetsPage,
    pub branches: BranchesPage,
    pub branch_assets: BranchAssetsPage,
    pub transfers: TransfersPage,
    pub users: UsersPage,

    pub modal: ModalState<ModalTarget>,
    pub search: Option<Form>,
    pub toasts: Toasts,

    pub history: Option<QueryObserver<Vec<AssetHistoryEntry>>>,
    pub next_code: Option<QueryObserver<String>>,
    next_code_applied: Option<String>,
    pub master_data: Option<QueryObserver<MasterData>>,
}

/// Latest successful value behind an optional observer.
pub fn loaded<T: Send + Sync + 'static>(observer: &Option<QueryObserver<T>>) -> Option<Arc<T>> {
    observer.as_ref().and_then(|o| o.state().data)
}

fn collect_error<T: Send + Sync + 'static>(
    observer: &Option<QueryObserver<T>>,
    out: &mut Vec<QueryError>,
) {
    if let Some(error) = observer.as_ref().and_then(|o| o.state().error) {
        out.push(error);
    }
}

fn step(selected: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        return 0;
    }
    let current = selected.min(len - 1);
    if down {
        (current + 1).min(len - 1)
    } else {
        current.saturating_sub(1)
    }
}

impl App {
    pub fn new(config: AppConfig, api: HttpClient, queries: QueryClient) -> Self {
        let screen = if api.session().is_authenticated() {
            Screen::Main
        } else {
            Screen::Login
        };
        let toasts = Toasts::new(config.toast_duration());
        Self {
            config,
            theme: Theme::ledger(),
            api,
            queries,
            screen,
            login: LoginState::new(),
            page: Page::Dashboard,
            dashboard: DashboardPage::default(),
            assets: AssetsPage::default(),
            branches: BranchesPage::default(),
            branch_assets: BranchAssetsPage::default(),
            transfers: TransfersPage::default(),
            users: UsersPage::default(),
            modal: ModalState::Closed,
            search: None,
            toasts,
            history: None,
            next_code: None,
            next_code_applied: None,
            master_data: None,
        }
    }

    pub fn restore(&mut self, state: PersistedState) {
        self.page = state.active_page;
        self.assets.filter = state.asset_filter;
        self.transfers.filter = state.transfer_filter;
        self.users.filter = state.user_filter;
    }

    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            active_page: self.page,
            asset_filter: self.assets.filter.clone(),
            transfer_filter: self.transfers.filter,
            user_filter: self.users.filter.clone(),
        }
    }

    pub fn can_manage_users(&self) -> bool {
        self.api.session().can_manage_users()
    }

    pub fn current_user(&self) -> Option<User> {
        self.api.session().user()
    }

    fn policy(&self) -> RefetchPolicy {
        self.queries.config().default_policy()
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    fn unmount_all(&mut self) {
        self.dashboard = DashboardPage::default();
        self.assets.assets = None;
        self.assets.branches = None;
        self.branches.branches = None;
        self.branch_assets.branch = None;
        self.branch_assets.assets = None;
        self.branch_assets.branches = None;
        self.transfers.transfers = None;
        self.users.users = None;
        self.users.branches = None;
        self.history = None;
        self.next_code = None;
        self.next_code_applied = None;
        self.master_data = None;
    }

    /// Subscribes the current page to its queries and drops every other
    /// page's subscriptions.
    pub fn mount(&mut self) {
        let policy = self.policy();
        let (q, api) = (self.queries.clone(), self.api.clone());
        self.unmount_all();
        match self.page {
            Page::Dashboard => {
                self.dashboard.stats = Some(queries::dashboard(&q, &api, policy));
            }
            Page::Assets => {
                self.assets.assets = Some(queries::assets(&q, &api, policy));
                self.assets.branches = Some(queries::branches(&q, &api, policy));
                self.master_data = Some(queries::master_data(&q, &api));
            }
            Page::Branches => {
                self.branches.branches = Some(queries::branches(&q, &api, policy));
            }
            Page::BranchAssets(id) => {
                self.branch_assets.branch_id = Some(id);
                self.branch_assets.branch = Some(queries::branch(&q, &api, policy, id));
                self.branch_assets.assets = Some(queries::branch_assets(&q, &api, policy, id));
                self.branch_assets.branches = Some(queries::branches(&q, &api, policy));
                self.master_data = Some(queries::master_data(&q, &api));
            }
            Page::Transfers => {
                self.transfers.transfers = Some(queries::transfers(&q, &api, policy));
            }
            Page::Users => {
                self.users.users = Some(queries::users(&q, &api, policy));
                self.users.branches = Some(queries::branches(&q, &api, policy));
            }
        }
        tracing::debug!(page = self.page.title(), "mounted");
    }

    pub fn navigate(&mut self, page: Page) {
        let page = page.for_role(self.can_manage_users());
        if page == self.page {
            return;
        }
        if let Page::BranchAssets(id) = page {
            if self.branch_assets.branch_id != Some(id) {
                self.branch_assets.filter = AssetFilter::default();
                self.branch_assets.selected = 0;
            }
        }
        self.page = page;
        self.search = None;
        self.mount();
    }

    fn on_signed_in(&mut self, session: &Session) {
        self.screen = Screen::Main;
        self.login = LoginState::new();
        self.page = self.page.for_role(self.can_manage_users());
        self.toasts
            .success(format!("Welcome back, {}", session.user.name));
        self.mount();
    }

    /// Ends the session and returns to the login screen. Cached data of the
    /// previous user is invalidated so nothing is shown without a refetch.
    pub fn sign_out(&mut self, notice: Option<&str>) {
        self.api.auth().logout();
        self.unmount_all();
        self.modal.close();
        self.search = None;
        self.queries.invalidate(&[query_key![]]);
        self.screen = Screen::Login;
        self.login = LoginState::new();
        if let Some(notice) = notice {
            self.toasts.warning(notice);
        }
    }

    fn active_errors(&self) -> Vec<QueryError> {
        let mut errors = Vec::new();
        collect_error(&self.dashboard.stats, &mut errors);
        collect_error(&self.assets.assets, &mut errors);
        collect_error(&self.assets.branches, &mut errors);
        collect_error(&self.branches.branches, &mut errors);
        collect_error(&self.branch_assets.branch, &mut errors);
        collect_error(&self.branch_assets.assets, &mut errors);
        collect_error(&self.branch_assets.branches, &mut errors);
        collect_error(&self.transfers.transfers, &mut errors);
        collect_error(&self.users.users, &mut errors);
        collect_error(&self.users.branches, &mut errors);
        collect_error(&self.history, &mut errors);
        collect_error(&self.next_code, &mut errors);
        collect_error(&self.master_data, &mut errors);
        errors
    }

    /// A rejected credential on any query ends the session.
    fn check_query_auth(&mut self) {
        if self.screen != Screen::Main {
            return;
        }
        let signed_out = self.active_errors().iter().any(|err| {
            err.downcast_ref::<ApiError>()
                .is_some_and(|api_err| self.api.session().guard(api_err) == AuthOutcome::SignedOut)
        });
        if signed_out {
            self.sign_out(Some("Session expired, please sign in again"));
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.toasts.prune(now);
        self.sync_next_code();
        self.check_query_auth();
        let evicted = self.queries.gc();
        if evicted > 0 {
            tracing::debug!(evicted, "idle cache entries evicted");
        }
    }

    // ------------------------------------------------------------------
    // Selection helpers
    // ------------------------------------------------------------------

    fn asset_list(&self) -> Option<(&Option<QueryObserver<Vec<Asset>>>, &AssetFilter, usize)> {
        match self.page {
            Page::Assets => Some((&self.assets.assets, &self.assets.filter, self.assets.selected)),
            Page::BranchAssets(_) => Some((
                &self.branch_assets.assets,
                &self.branch_assets.filter,
                self.branch_assets.selected,
            )),
            _ => None,
        }
    }

    fn asset_filter_mut(&mut self) -> Option<(&mut AssetFilter, &mut usize)> {
        match self.page {
            Page::Assets => Some((&mut self.assets.filter, &mut self.assets.selected)),
            Page::BranchAssets(_) => Some((
                &mut self.branch_assets.filter,
                &mut self.branch_assets.selected,
            )),
            _ => None,
        }
    }

    pub fn selected_asset(&self) -> Option<Asset> {
        let (observer, filter, selected) = self.asset_list()?;
        let data = loaded(observer)?;
        let rows = filter.apply(&data);
        rows.get(selected.min(rows.len().saturating_sub(1)))
            .map(|a| (*a).clone())
    }

    pub fn selected_branch(&self) -> Option<Branch> {
        let data = loaded(&self.branches.branches)?;
        let ordered = split_branches(&data, &self.branches.search).ordered();
        let selected = self.branches.selected.min(ordered.len().saturating_sub(1));
        ordered.get(selected).map(|b| (*b).clone())
    }

    pub fn selected_transfer(&self) -> Option<TransferRequest> {
        let data = loaded(&self.transfers.transfers)?;
        let rows = self.transfers.filter.apply(&data);
        let selected = self.transfers.selected.min(rows.len().saturating_sub(1));
        rows.get(selected).map(|t| (*t).clone())
    }

    pub fn selected_user(&self) -> Option<User> {
        let data = loaded(&self.users.users)?;
        let rows = self.users.filter.apply(&data);
        let selected = self.users.selected.min(rows.len().saturating_sub(1));
        rows.get(selected).map(|u| (*u).clone())
    }

    fn row_count(&self) -> usize {
        match self.page {
            Page::Dashboard => 0,
            Page::Assets | Page::BranchAssets(_) => self
                .asset_list()
                .and_then(|(observer, filter, _)| loaded(observer).map(|d| filter.apply(&d).len()))
                .unwrap_or(0),
            Page::Branches => loaded(&self.branches.branches)
                .map(|d| split_branches(&d, &self.branches.search).len())
                .unwrap_or(0),
            Page::Transfers => loaded(&self.transfers.transfers)
                .map(|d| self.transfers.filter.apply(&d).len())
                .unwrap_or(0),
            Page::Users => loaded(&self.users.users)
                .map(|d| self.users.filter.apply(&d).len())
                .unwrap_or(0),
        }
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.row_count();
        let selected = match self.page {
            Page::Dashboard => return,
            Page::Assets => &mut self.assets.selected,
            Page::BranchAssets(_) => &mut self.branch_assets.selected,
            Page::Branches => &mut self.branches.selected,
            Page::Transfers => &mut self.transfers.selected,
            Page::Users => &mut self.users.selected,
        };
        *selected = step(*selected, len, down);
    }

    fn page_branches(&self) -> Option<Arc<Vec<Branch>>> {
        match self.page {
            Page::Assets => loaded(&self.assets.branches),
            Page::BranchAssets(_) => loaded(&self.branch_assets.branches),
            Page::Users => loaded(&self.users.branches),
            Page::Branches => loaded(&self.branches.branches),
            _ => None,
        }
    }

    /// Branch preselected in the add-asset form.
    fn default_branch(&self, branches: &[Branch]) -> Option<BranchId> {
        if let Page::BranchAssets(id) = self.page {
            return Some(id);
        }
        let user = self.current_user()?;
        let name = user.branch?.name;
        branches.iter().find(|b| b.name == name).map(|b| b.id)
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    fn search_text(&self) -> Option<&str> {
        match self.page {
            Page::Assets => Some(&self.assets.filter.search),
            Page::BranchAssets(_) => Some(&self.branch_assets.filter.search),
            Page::Branches => Some(&self.branches.search),
            Page::Users => Some(&self.users.filter.search),
            Page::Dashboard | Page::Transfers => None,
        }
    }

    fn set_search_text(&mut self, text: String) {
        match self.page {
            Page::Assets => {
                self.assets.filter.search = text;
                self.assets.selected = 0;
            }
            Page::BranchAssets(_) => {
                self.branch_assets.filter.search = text;
                self.branch_assets.selected = 0;
            }
            Page::Branches => {
                self.branches.search = text;
                self.branches.selected = 0;
            }
            Page::Users => {
                self.users.filter.search = text;
                self.users.selected = 0;
            }
            Page::Dashboard | Page::Transfers => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let Some(form) = self.search.as_mut() else {
            return;
        };
        match map_form_key(key) {
            FormKey::Submit => self.search = None,
            FormKey::Cancel => {
                self.search = None;
                self.set_search_text(String::new());
            }
            FormKey::NextField | FormKey::PrevField => {}
            FormKey::Edit(key) => {
                if form.handle_key(key) {
                    let text = form.raw_value("search");
                    self.set_search_text(text);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Keys
    // ------------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) -> Effect {
        if self.screen == Screen::Login {
            return self.handle_login_key(key);
        }
        if self.modal.is_open() {
            return self.handle_modal_key(key);
        }
        if self.search.is_some() {
            self.handle_search_key(key);
            return Effect::None;
        }
        match map_key(key) {
            Some(action) => self.handle_action(action),
            None => Effect::None,
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) -> Effect {
        if self.login.submitting {
            return Effect::None;
        }
        match map_form_key(key) {
            FormKey::Submit => {
                let email = self.login.form.value("email");
                let password = self.login.form.raw_value("password");
                if let Err(err) = validate_login(&email, &password) {
                    self.login.error = Some(err.to_string());
                    return Effect::None;
                }
                self.login.error = None;
                self.login.submitting = true;
                Effect::Login { email, password }
            }
            FormKey::Cancel => Effect::Quit,
            FormKey::NextField => {
                self.login.form.focus_next();
                Effect::None
            }
            FormKey::PrevField => {
                self.login.form.focus_prev();
                Effect::None
            }
            FormKey::Edit(key) => {
                if self.login.form.handle_key(key) {
                    self.login.error = None;
                }
                Effect::None
            }
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Effect {
        match map_form_key(key) {
            FormKey::Cancel => {
                self.close_modal();
                Effect::None
            }
            FormKey::Submit => match self.modal.submit(dialogs::build_mutation) {
                Some((ticket, mutation)) => Effect::Mutate { ticket, mutation },
                None => Effect::None,
            },
            FormKey::NextField => {
                if let Some(form) = self.modal.editable_form() {
                    form.focus_next();
                }
                Effect::None
            }
            FormKey::PrevField => {
                if let Some(form) = self.modal.editable_form() {
                    form.focus_prev();
                }
                Effect::None
            }
            FormKey::Edit(key) => {
                let category_changed = match self.modal.editable_form() {
                    Some(form) => form.handle_key(key) && form.focused_key() == Some("category"),
                    None => false,
                };
                if category_changed {
                    self.watch_next_code();
                }
                Effect::None
            }
        }
    }

    pub fn handle_action(&mut self, action: Action) -> Effect {
        let can_manage_users = self.can_manage_users();
        match action {
            Action::Quit => return Effect::Quit,
            Action::NextPage => self.navigate(self.page.next(can_manage_users)),
            Action::PrevPage => self.navigate(self.page.previous(can_manage_users)),
            Action::SwitchPage(index) => {
                if let Some(page) = Page::from_index(index, can_manage_users) {
                    self.navigate(page);
                }
            }
            Action::MoveUp => self.move_selection(false),
            Action::MoveDown => self.move_selection(true),
            Action::Refresh => {
                let count = self.queries.refetch_active();
                tracing::info!(count, "manual refresh");
            }
            Action::Search => {
                if let Some(current) = self.search_text() {
                    let form = Form::new().text("search", "Search", current);
                    self.search = Some(form);
                }
            }
            Action::ChangePassword => {
                let (target, form) = dialogs::change_password();
                self.modal.open(target, ModalMode::ChangePassword, form);
            }
            Action::Logout => {
                self.sign_out(None);
                self.toasts.info("Signed out");
            }
            other => self.page_action(other),
        }
        Effect::None
    }

    fn page_action(&mut self, action: Action) {
        match self.page {
            Page::Assets | Page::BranchAssets(_) => self.asset_action(action),
            Page::Branches => self.branch_action(action),
            Page::Transfers => self.transfer_action(action),
            Page::Users => self.user_action(action),
            Page::Dashboard => {}
        }
    }

    fn asset_action(&mut self, action: Action) {
        match action {
            Action::CycleStatus => {
                if let Some((filter, selected)) = self.asset_filter_mut() {
                    filter.status = filter.status.next();
                    *selected = 0;
                }
            }
            Action::CycleCategory => {
                if let Some((filter, selected)) = self.asset_filter_mut() {
                    filter.cycle_category(KNOWN_CATEGORIES);
                    *selected = 0;
                }
            }
            Action::CycleSort => {
                if let Some((filter, selected)) = self.asset_filter_mut() {
                    filter.sort = filter.sort.next();
                    *selected = 0;
                }
            }
            Action::New => {
                let branches = self.page_branches().unwrap_or_default();
                if branches.is_empty() {
                    self.toasts.warning("Branches are still loading");
                    return;
                }
                let default_branch = self.default_branch(&branches);
                let (target, form) = dialogs::create_asset(&branches, default_branch, "");
                self.modal.open(target, ModalMode::CreateAsset, form);
                self.watch_next_code();
            }
            Action::Edit => {
                let Some(asset) = self.selected_asset() else {
                    return;
                };
                let branches = self.page_branches().unwrap_or_default();
                let master = loaded(&self.master_data).unwrap_or_default();
                let (target, form) = dialogs::edit_asset(&asset, &branches, &master);
                self.modal.open(target, ModalMode::EditAsset, form);
            }
            Action::Delete => {
                let Some(asset) = self.selected_asset() else {
                    return;
                };
                if asset.status.is_disposed() {
                    self.toasts.warning("Asset is already disposed");
                    return;
                }
                let (target, form) = dialogs::dispose_asset(&asset);
                self.modal.open(target, ModalMode::DisposeAsset, form);
            }
            Action::Restore => {
                let Some(asset) = self.selected_asset() else {
                    return;
                };
                if !asset.status.is_disposed() {
                    self.toasts.warning("Only disposed assets can be restored");
                    return;
                }
                let (target, form) = dialogs::confirm(Subject::Asset(asset));
                self.modal.open(target, ModalMode::RestoreAsset, form);
            }
            Action::Transfer => {
                let Some(asset) = self.selected_asset() else {
                    return;
                };
                if asset.status.is_disposed() {
                    self.toasts.warning("Disposed assets cannot be transferred");
                    return;
                }
                let branches = self.page_branches().unwrap_or_default();
                let (target, form) = dialogs::transfer_asset(&asset, &branches);
                self.modal.open(target, ModalMode::TransferAsset, form);
            }
            Action::History | Action::Open => {
                let Some(asset) = self.selected_asset() else {
                    return;
                };
                self.history = Some(queries::asset_history(&self.queries, &self.api, asset.id));
                let (target, form) = dialogs::confirm(Subject::Asset(asset));
                self.modal.open(target, ModalMode::AssetHistory, form);
            }
            Action::Export => self.export_csv(),
            Action::Back => {
                if matches!(self.page, Page::BranchAssets(_)) {
                    self.navigate(Page::Branches);
                }
            }
            _ => {}
        }
    }

    fn branch_action(&mut self, action: Action) {
        match action {
            Action::New => {
                let (target, form) = dialogs::branch_form(None);
                self.modal.open(target, ModalMode::CreateBranch, form);
            }
            Action::Edit => {
                if let Some(branch) = self.selected_branch() {
                    let (target, form) = dialogs::branch_form(Some(&branch));
                    self.modal.open(target, ModalMode::EditBranch, form);
                }
            }
            Action::Delete => {
                if let Some(branch) = self.selected_branch() {
                    let (target, form) = dialogs::confirm(Subject::Branch(branch));
                    self.modal.open(target, ModalMode::DeleteBranch, form);
                }
            }
            Action::Open => {
                if let Some(branch) = self.selected_branch() {
                    self.navigate(Page::BranchAssets(branch.id));
                }
            }
            _ => {}
        }
    }

    fn transfer_action(&mut self, action: Action) {
        match action {
            Action::CycleStatus => {
                self.transfers.filter = self.transfers.filter.next();
                self.transfers.selected = 0;
            }
            Action::Approve | Action::Reject => {
                let Some(transfer) = self.selected_transfer() else {
                    return;
                };
                if !transfer.status.is_actionable() {
                    self.toasts.warning("Only pending transfers can be reviewed");
                    return;
                }
                let mode = if action == Action::Approve {
                    ModalMode::ApproveTransfer
                } else {
                    ModalMode::RejectTransfer
                };
                let (target, form) = dialogs::review_transfer(&transfer);
                self.modal.open(target, mode, form);
            }
            _ => {}
        }
    }

    fn user_action(&mut self, action: Action) {
        match action {
            Action::CycleCategory => {
                self.users.filter.cycle_role();
                self.users.selected = 0;
            }
            Action::New => {
                let branches = loaded(&self.users.branches).unwrap_or_default();
                let (target, form) = dialogs::create_user(&branches);
                self.modal.open(target, ModalMode::CreateUser, form);
            }
            Action::Edit => {
                if let Some(user) = self.selected_user() {
                    let (target, form) = dialogs::edit_role(&user);
                    self.modal.open(target, ModalMode::EditRole, form);
                }
            }
            Action::Delete => {
                let Some(user) = self.selected_user() else {
                    return;
                };
                if self.current_user().is_some_and(|me| me.id == user.id) {
                    self.toasts.warning("You cannot delete your own account");
                    return;
                }
                let (target, form) = dialogs::confirm(Subject::User(user));
                self.modal.open(target, ModalMode::DeleteUser, form);
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Modal helpers
    // ------------------------------------------------------------------

    fn close_modal(&mut self) {
        self.modal.close();
        self.history = None;
        self.next_code = None;
        self.next_code_applied = None;
    }

    /// Subscribes to the next asset code for the category chosen in the
    /// add-asset form.
    fn watch_next_code(&mut self) {
        let category = match self.modal.current() {
            Some(open) if open.mode == ModalMode::CreateAsset => open.form.value("category"),
            _ => return,
        };
        self.next_code = Some(queries::next_code(&self.queries, &self.api, &category));
    }

    /// Copies the suggested code into the add-asset form unless the user
    /// typed their own.
    fn sync_next_code(&mut self) {
        if self.modal.current().map(|m| m.mode) != Some(ModalMode::CreateAsset) {
            return;
        }
        let Some(code) = self.next_code.as_ref().and_then(|o| o.state().data) else {
            return;
        };
        let Some(form) = self.modal.editable_form() else {
            return;
        };
        let current = form.value("assetId");
        let untouched =
            current.is_empty() || self.next_code_applied.as_deref() == Some(current.as_str());
        if untouched && current != *code {
            form.set_text("assetId", &code);
            self.next_code_applied = Some(code.to_string());
        }
    }

    // ------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------

    pub fn on_login_finished(&mut self, result: Result<Session, ApiError>) {
        self.login.submitting = false;
        match result {
            Ok(session) => self.on_signed_in(&session),
            Err(err) => {
                tracing::warn!(error = %err, "login failed");
                self.login.error = Some(err.user_message());
            }
        }
    }

    pub fn on_mutation_finished(&mut self, ticket: u64, mutation: &Mutation, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                if self.modal.succeed(ticket) {
                    self.close_modal();
                }
                self.toasts.success(mutation.success_message());
                if let Mutation::DeleteBranch(id) = mutation {
                    if self.page == Page::BranchAssets(*id) {
                        self.navigate(Page::Branches);
                    }
                }
            }
            Err(err) => {
                if self.api.session().guard(&err) == AuthOutcome::SignedOut {
                    self.sign_out(Some("Session expired, please sign in again"));
                    return;
                }
                tracing::warn!(error = %err, "mutation failed");
                let message = err.user_message();
                if !self.modal.fail(ticket, message.clone()) {
                    self.toasts.error(message);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Writes the rows currently shown on an asset page.
    pub fn export_csv(&mut self) {
        let Some((observer, filter, _)) = self.asset_list() else {
            return;
        };
        let Some(data) = loaded(observer) else {
            self.toasts.warning("Assets are still loading");
            return;
        };
        let rows = filter.apply(&data);
        let branch_name = match self.page {
            Page::BranchAssets(_) => loaded(&self.branch_assets.branch).map(|b| b.name.clone()),
            _ => None,
        };
        let result = write_assets_csv(&self.config.export_dir, branch_name.as_deref(), &rows);
        let count = rows.len();
        match result {
            Ok(path) => {
                tracing::info!(rows = count, path = %path.display(), "exported assets");
                self.toasts
                    .success(format!("Exported {} rows to {}", count, path.display()));
            }
            Err(ExportError::Empty) => self.toasts.warning("No rows to export"),
            Err(err) => {
                tracing::error!(error = %err, "export failed");
                self.toasts.error(err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_clamps_to_rows() {
        assert_eq!(step(0, 0, true), 0);
        assert_eq!(step(0, 3, true), 1);
        assert_eq!(step(2, 3, true), 2);
        assert_eq!(step(0, 3, false), 0);
        assert_eq!(step(9, 3, false), 1);
    }
}
