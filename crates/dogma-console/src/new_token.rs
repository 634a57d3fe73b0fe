//! New-token form
//!
//! Holds the application id, the admin flag and the rule list, and drives a
//! single token creation request at a time. Submission is split into
//! [`NewTokenForm::begin_submit`] and [`NewTokenForm::finish_submit`] so that
//! an event loop can await the request itself; [`NewTokenForm::submit`] does
//! both.

use tracing::{info, warn};

use dogma_common::is_valid_file_name;
use dogma_maintainer_client::{
    MaintainerError,
    model::{AccessRule, CreateTokenForm, TokenDetail},
};

use crate::api::TokenCreator;
use crate::editor::{IpAccessControlEditor, RuleField};
use crate::error::{EditorError, FormError};
use crate::error_parser::ErrorMessageParser;
use crate::notification::{NotificationDispatcher, Severity};
use crate::session::Session;

/// Title of the notification raised when creation fails
pub const CREATE_FAILED_TITLE: &str = "Failed to create a new token";

/// Dialog that reveals a freshly created token's secret
#[derive(Debug, Clone, Default)]
pub struct SecretDialog {
    is_open: bool,
    token: Option<TokenDetail>,
}

impl SecretDialog {
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn token(&self) -> Option<&TokenDetail> {
        self.token.as_ref()
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    fn open(&mut self, token: TokenDetail) {
        self.token = Some(token);
        self.is_open = true;
    }
}

/// A creation request that has been started but not finished
#[derive(Debug)]
pub struct PendingSubmission {
    form: CreateTokenForm,
}

impl PendingSubmission {
    pub fn form(&self) -> &CreateTokenForm {
        &self.form
    }
}

/// How a submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(TokenDetail),
    /// The request failed; carries the message that was notified
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct NewTokenForm {
    session: Session,
    app_id: String,
    is_system_admin: bool,
    app_id_error: Option<FormError>,
    rules: Vec<AccessRule>,
    editor: IpAccessControlEditor,
    popover_open: bool,
    busy: bool,
    secret_dialog: SecretDialog,
}

impl NewTokenForm {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            app_id: String::new(),
            is_system_admin: false,
            app_id_error: None,
            rules: Vec::new(),
            editor: IpAccessControlEditor::new(),
            popover_open: false,
            busy: false,
            secret_dialog: SecretDialog::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ============================================================================
    // Popover
    // ============================================================================

    pub fn is_popover_open(&self) -> bool {
        self.popover_open
    }

    pub fn open_popover(&mut self) {
        self.popover_open = true;
    }

    pub fn close_popover(&mut self) {
        self.popover_open = false;
    }

    pub fn toggle_popover(&mut self) {
        self.popover_open = !self.popover_open;
    }

    // ============================================================================
    // Fields
    // ============================================================================

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn set_app_id(&mut self, app_id: &str) {
        self.app_id = app_id.to_string();
        self.app_id_error = None;
    }

    /// Validation error recorded by the last submit attempt
    pub fn app_id_error(&self) -> Option<&FormError> {
        self.app_id_error.as_ref()
    }

    /// Whether the system-admin checkbox is offered to this session
    pub fn is_system_admin_visible(&self) -> bool {
        self.session.is_system_admin()
    }

    pub fn set_system_admin(&mut self, is_system_admin: bool) {
        self.is_system_admin = is_system_admin;
    }

    /// Effective admin flag; only honored for system administrators
    pub fn is_system_admin(&self) -> bool {
        self.is_system_admin && self.is_system_admin_visible()
    }

    // ============================================================================
    // Rules
    // ============================================================================

    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }

    /// Replace the rule list with the one reported by the editor
    pub fn set_rules(&mut self, rules: Vec<AccessRule>) {
        self.rules = rules;
    }

    pub fn editor(&self) -> &IpAccessControlEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut IpAccessControlEditor {
        &mut self.editor
    }

    /// Add the editor's draft to the rule list
    pub fn add_rule(&mut self) -> Result<(), EditorError> {
        let rules = self.editor.add_rule(&self.rules)?;
        self.set_rules(rules);
        Ok(())
    }

    pub fn remove_rule(&mut self, index: usize) -> Result<(), EditorError> {
        let rules = self.editor.remove_rule(&self.rules, index)?;
        self.set_rules(rules);
        Ok(())
    }

    pub fn edit_rule_field(
        &mut self,
        index: usize,
        field: RuleField,
        value: &str,
    ) -> Result<(), EditorError> {
        let rules = self.editor.edit_rule_field(&self.rules, index, field, value)?;
        self.set_rules(rules);
        Ok(())
    }

    pub fn rule_notice(&self) -> Option<&'static str> {
        IpAccessControlEditor::notice(&self.rules)
    }

    // ============================================================================
    // Submission
    // ============================================================================

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn secret_dialog(&self) -> &SecretDialog {
        &self.secret_dialog
    }

    pub fn secret_dialog_mut(&mut self) -> &mut SecretDialog {
        &mut self.secret_dialog
    }

    /// Request body for the current state
    pub fn build_form(&self) -> Result<CreateTokenForm, FormError> {
        validate_app_id(&self.app_id)?;
        CreateTokenForm::new(&self.app_id, self.is_system_admin(), &self.rules)
            .map_err(|e| FormError::Encoding(e.to_string()))
    }

    /// Validate and mark the form busy
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, FormError> {
        if self.busy {
            return Err(FormError::Busy);
        }

        let form = match self.build_form() {
            Ok(form) => form,
            Err(e) => {
                if e.is_app_id_error() {
                    self.app_id_error = Some(e.clone());
                }
                return Err(e);
            }
        };

        self.app_id_error = None;
        self.busy = true;
        Ok(PendingSubmission { form })
    }

    /// Apply the result of a request started by [`NewTokenForm::begin_submit`]
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmission,
        result: Result<TokenDetail, MaintainerError>,
        notifier: &dyn NotificationDispatcher,
    ) -> SubmitOutcome {
        self.busy = false;

        match result {
            Ok(token) => {
                info!(
                    app_id = %pending.form.app_id,
                    rules = self.rules.len(),
                    "Created application token"
                );
                self.reset();
                self.popover_open = false;
                self.secret_dialog.open(token.clone());
                SubmitOutcome::Created(token)
            }
            Err(e) => {
                warn!(app_id = %pending.form.app_id, "Failed to create application token: {}", e);
                let message = ErrorMessageParser::parse(&e);
                notifier.dispatch(CREATE_FAILED_TITLE, &message, Severity::Error);
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Validate, send, and apply the outcome
    ///
    /// A local validation failure returns `Err` without contacting the server.
    /// A remote failure is notified and reported as [`SubmitOutcome::Failed`].
    pub async fn submit(
        &mut self,
        creator: &dyn TokenCreator,
        notifier: &dyn NotificationDispatcher,
    ) -> Result<SubmitOutcome, FormError> {
        let pending = self.begin_submit()?;
        let result = creator.create_token(pending.form()).await;
        Ok(self.finish_submit(pending, result, notifier))
    }

    fn reset(&mut self) {
        self.app_id.clear();
        self.is_system_admin = false;
        self.app_id_error = None;
        self.rules.clear();
        self.editor = IpAccessControlEditor::new();
    }
}

fn validate_app_id(app_id: &str) -> Result<(), FormError> {
    if app_id.is_empty() {
        Err(FormError::AppIdRequired)
    } else if !is_valid_file_name(app_id) {
        Err(FormError::InvalidAppId)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dogma_common::{IpAccessAction, LEVEL_SYSTEM_ADMIN, UserAndTimestamp};

    use crate::notification::NotificationQueue;

    fn admin_form() -> NewTokenForm {
        NewTokenForm::new(Session::new("admin", &[LEVEL_SYSTEM_ADMIN]))
    }

    fn token(app_id: &str) -> TokenDetail {
        TokenDetail {
            app_id: app_id.to_string(),
            secret: Some("appToken-0123".to_string()),
            system_admin: false,
            creation: UserAndTimestamp::of("admin"),
            deactivation: None,
            ip_access_control_rules: None,
        }
    }

    #[test]
    fn test_validate_app_id() {
        assert_eq!(validate_app_id(""), Err(FormError::AppIdRequired));
        assert_eq!(validate_app_id("-bad-"), Err(FormError::InvalidAppId));
        assert_eq!(validate_app_id("bad."), Err(FormError::InvalidAppId));
        assert!(validate_app_id("a").is_ok());
        assert!(validate_app_id("my-app.v2+beta_1").is_ok());
    }

    #[test]
    fn test_system_admin_only_for_admins() {
        let mut form = NewTokenForm::new(Session::new("dev", &["LEVEL_USER"]));
        assert!(!form.is_system_admin_visible());
        form.set_system_admin(true);
        assert!(!form.is_system_admin());

        let mut form = admin_form();
        assert!(form.is_system_admin_visible());
        form.set_system_admin(true);
        assert!(form.is_system_admin());
    }

    #[test]
    fn test_build_form() {
        let mut form = admin_form();
        form.set_app_id("my-app");
        let body = form.build_form().unwrap();
        assert_eq!(body.to_form_body().unwrap(), "appId=my-app&isSystemAdmin=false");

        form.editor_mut().set_draft_cidr("10.0.0.0/8").unwrap();
        form.add_rule().unwrap();
        let body = form.build_form().unwrap();
        assert_eq!(
            body.ip_access_control_rules.as_deref(),
            Some(r#"[{"action":"ALLOW","cidr":"10.0.0.0/8"}]"#)
        );
    }

    #[test]
    fn test_rule_operations_through_form() {
        let mut form = admin_form();
        assert!(form.rule_notice().is_some());

        form.editor_mut().set_draft_action(IpAccessAction::Deny).unwrap();
        form.editor_mut().set_draft_cidr("10.0.0.1").unwrap();
        form.add_rule().unwrap();
        assert!(form.rule_notice().is_none());

        form.edit_rule_field(0, RuleField::Description, "ci").unwrap();
        assert_eq!(form.rules()[0].description.as_deref(), Some("ci"));

        form.remove_rule(0).unwrap();
        assert!(form.rules().is_empty());
    }

    #[test]
    fn test_begin_submit_records_error() {
        let mut form = admin_form();
        form.set_app_id("-bad-");
        assert_eq!(form.begin_submit().unwrap_err(), FormError::InvalidAppId);
        assert_eq!(form.app_id_error(), Some(&FormError::InvalidAppId));
        assert!(!form.is_busy());

        form.set_app_id("good");
        assert!(form.app_id_error().is_none());
    }

    #[test]
    fn test_busy_refuses_second_submit() {
        let mut form = admin_form();
        form.set_app_id("my-app");
        let pending = form.begin_submit().unwrap();
        assert!(form.is_busy());
        assert_eq!(form.begin_submit().unwrap_err(), FormError::Busy);

        let queue = NotificationQueue::new();
        form.finish_submit(pending, Ok(token("my-app")), &queue);
        assert!(!form.is_busy());
    }

    #[test]
    fn test_finish_submit_success_resets() {
        let mut form = admin_form();
        form.open_popover();
        form.set_app_id("my-app");
        form.set_system_admin(true);
        form.editor_mut().set_draft_cidr("192.168.1.0/24").unwrap();
        form.add_rule().unwrap();

        let queue = NotificationQueue::new();
        let pending = form.begin_submit().unwrap();
        let outcome = form.finish_submit(pending, Ok(token("my-app")), &queue);

        assert!(matches!(outcome, SubmitOutcome::Created(ref t) if t.app_id == "my-app"));
        assert_eq!(
            form.secret_dialog().token().map(|t| t.app_id.as_str()),
            Some("my-app")
        );
        assert!(form.app_id().is_empty());
        assert!(!form.is_system_admin());
        assert!(form.rules().is_empty());
        assert!(!form.is_popover_open());
        assert!(form.secret_dialog().is_open());
        assert!(queue.is_empty());

        form.secret_dialog_mut().close();
        assert!(!form.secret_dialog().is_open());
    }

    #[test]
    fn test_finish_submit_failure_keeps_state() {
        let mut form = admin_form();
        form.open_popover();
        form.set_app_id("my-app");
        form.editor_mut().set_draft_cidr("10.0.0.1").unwrap();
        form.add_rule().unwrap();

        let queue = NotificationQueue::new();
        let pending = form.begin_submit().unwrap();
        let error = MaintainerError::RequestFailed {
            status: 409,
            body: r#"{"message":"Token 'my-app' already exists"}"#.to_string(),
        };
        let outcome = form.finish_submit(pending, Err(error), &queue);

        assert_eq!(
            outcome,
            SubmitOutcome::Failed("Token 'my-app' already exists".to_string())
        );
        assert_eq!(form.app_id(), "my-app");
        assert_eq!(form.rules().len(), 1);
        assert!(form.is_popover_open());
        assert!(!form.secret_dialog().is_open());

        let notifications = queue.drain();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Failed to create a new token");
        assert_eq!(notifications[0].message, "Token 'my-app' already exists");
        assert_eq!(notifications[0].severity, Severity::Error);
    }
}
