//! IP access-control rule editor
//!
//! The editor owns only the draft of the rule being added and the validation
//! error. The rule list itself belongs to the caller: every mutation takes the
//! current list and returns the updated one, which the caller stores.

use tracing::debug;

use dogma_common::IpAccessAction;
use dogma_maintainer_client::model::AccessRule;

use crate::cidr::is_valid_cidr;
use crate::error::EditorError;

/// Informational text shown while a token has no rules
pub const NO_RULES_NOTICE: &str =
    "No IP restrictions configured. This token can be used from any IP address.";

/// The rule being composed in the add row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleDraft {
    pub action: IpAccessAction,
    pub cidr: String,
    pub description: String,
}

impl RuleDraft {
    fn is_blank(&self) -> bool {
        *self == Self::default()
    }

    fn to_rule(&self) -> AccessRule {
        AccessRule {
            action: self.action,
            cidr: self.cidr.clone(),
            description: (!self.description.is_empty()).then(|| self.description.clone()),
        }
    }
}

/// Editable fields of an existing rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleField {
    Cidr,
    Description,
}

/// Observable state of the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// Draft untouched
    Idle,
    /// Draft being filled in
    Drafting,
    /// Last add was rejected
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct IpAccessControlEditor {
    draft: RuleDraft,
    error: Option<EditorError>,
    disabled: bool,
}

impl IpAccessControlEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Default::default()
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn state(&self) -> EditorState {
        if self.error.is_some() {
            EditorState::Error
        } else if self.draft.is_blank() {
            EditorState::Idle
        } else {
            EditorState::Drafting
        }
    }

    pub fn draft(&self) -> &RuleDraft {
        &self.draft
    }

    /// Validation message of the last rejected add
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn set_draft_action(&mut self, action: IpAccessAction) -> Result<(), EditorError> {
        self.ensure_enabled()?;
        self.draft.action = action;
        Ok(())
    }

    /// Update the draft CIDR; any displayed error is cleared
    pub fn set_draft_cidr(&mut self, cidr: &str) -> Result<(), EditorError> {
        self.ensure_enabled()?;
        self.draft.cidr = cidr.to_string();
        self.error = None;
        Ok(())
    }

    pub fn set_draft_description(&mut self, description: &str) -> Result<(), EditorError> {
        self.ensure_enabled()?;
        self.draft.description = description.to_string();
        Ok(())
    }

    /// Whether the add control is enabled
    pub fn can_add(&self) -> bool {
        !self.disabled && !self.draft.cidr.trim().is_empty()
    }

    /// Append the draft to `rules`
    ///
    /// On success the draft is reset and the new list returned. An invalid
    /// CIDR puts the editor in the error state and leaves the list alone.
    pub fn add_rule(&mut self, rules: &[AccessRule]) -> Result<Vec<AccessRule>, EditorError> {
        self.ensure_enabled()?;

        if !is_valid_cidr(&self.draft.cidr) {
            debug!(cidr = %self.draft.cidr, "Rejected IP access-control rule");
            self.error = Some(EditorError::InvalidCidr);
            return Err(EditorError::InvalidCidr);
        }

        self.error = None;
        let mut updated = rules.to_vec();
        updated.push(self.draft.to_rule());
        self.draft = RuleDraft::default();
        Ok(updated)
    }

    /// Drop the rule at `index`; an index past the end changes nothing
    pub fn remove_rule(
        &self,
        rules: &[AccessRule],
        index: usize,
    ) -> Result<Vec<AccessRule>, EditorError> {
        self.ensure_enabled()?;
        Ok(rules
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, rule)| rule.clone())
            .collect())
    }

    /// Set one field of the rule at `index`; an empty value unsets it
    ///
    /// Edits are not validated.
    pub fn edit_rule_field(
        &self,
        rules: &[AccessRule],
        index: usize,
        field: RuleField,
        value: &str,
    ) -> Result<Vec<AccessRule>, EditorError> {
        self.ensure_enabled()?;
        let mut updated = rules.to_vec();
        if let Some(rule) = updated.get_mut(index) {
            match field {
                RuleField::Cidr => rule.cidr = value.to_string(),
                RuleField::Description => {
                    rule.description = (!value.is_empty()).then(|| value.to_string())
                }
            }
        }
        Ok(updated)
    }

    /// Notice to display for `rules`, if any
    pub fn notice(rules: &[AccessRule]) -> Option<&'static str> {
        rules.is_empty().then_some(NO_RULES_NOTICE)
    }

    fn ensure_enabled(&self) -> Result<(), EditorError> {
        if self.disabled {
            Err(EditorError::Disabled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(action: IpAccessAction, cidr: &str) -> AccessRule {
        AccessRule::new(action, cidr, None)
    }

    fn add(editor: &mut IpAccessControlEditor, rules: &[AccessRule], cidr: &str) -> Vec<AccessRule> {
        editor.set_draft_cidr(cidr).unwrap();
        editor.add_rule(rules).unwrap()
    }

    #[test]
    fn test_add_valid_rule_resets_draft() {
        let mut editor = IpAccessControlEditor::new();
        assert_eq!(editor.state(), EditorState::Idle);

        editor.set_draft_action(IpAccessAction::Deny).unwrap();
        editor.set_draft_cidr("10.0.0.0/8").unwrap();
        editor.set_draft_description("internal").unwrap();
        assert_eq!(editor.state(), EditorState::Drafting);

        let rules = editor.add_rule(&[]).unwrap();
        assert_eq!(
            rules,
            vec![AccessRule::new(IpAccessAction::Deny, "10.0.0.0/8", Some("internal"))]
        );
        assert_eq!(editor.draft(), &RuleDraft::default());
        assert_eq!(editor.state(), EditorState::Idle);
        assert!(editor.error_message().is_none());
    }

    #[test]
    fn test_add_without_description_leaves_it_unset() {
        let mut editor = IpAccessControlEditor::new();
        let rules = add(&mut editor, &[], "192.168.1.1");
        assert_eq!(rules[0].description, None);
        assert_eq!(rules[0].action, IpAccessAction::Allow);
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut editor = IpAccessControlEditor::new();
        let rules = add(&mut editor, &[], "10.0.0.1/32");
        let rules = add(&mut editor, &rules, "10.0.0.0/8");
        let cidrs: Vec<_> = rules.iter().map(|r| r.cidr.as_str()).collect();
        assert_eq!(cidrs, vec!["10.0.0.1/32", "10.0.0.0/8"]);
    }

    #[test]
    fn test_add_invalid_rule_sets_error() {
        let mut editor = IpAccessControlEditor::new();
        let existing = vec![rule(IpAccessAction::Allow, "10.0.0.0/8")];

        editor.set_draft_cidr("10.0.0.1/33").unwrap();
        assert_eq!(editor.add_rule(&existing), Err(EditorError::InvalidCidr));
        assert_eq!(editor.state(), EditorState::Error);
        assert_eq!(
            editor.error_message().as_deref(),
            Some("Invalid CIDR notation. Examples: 192.168.1.0/24, 10.0.0.1/32, 192.168.1.1")
        );
        // Draft is kept so it can be corrected
        assert_eq!(editor.draft().cidr, "10.0.0.1/33");

        editor.set_draft_cidr("10.0.0.1/32").unwrap();
        assert!(editor.error_message().is_none());
        assert_eq!(editor.state(), EditorState::Drafting);
    }

    #[test]
    fn test_compressed_ipv6_rejected() {
        let mut editor = IpAccessControlEditor::new();
        editor.set_draft_cidr("2001:db8::1").unwrap();
        assert!(editor.add_rule(&[]).is_err());
    }

    #[test]
    fn test_can_add() {
        let mut editor = IpAccessControlEditor::new();
        assert!(!editor.can_add());
        editor.set_draft_cidr("   ").unwrap();
        assert!(!editor.can_add());
        editor.set_draft_cidr("bogus").unwrap();
        assert!(editor.can_add());
    }

    #[test]
    fn test_remove_rule() {
        let editor = IpAccessControlEditor::new();
        let rules = vec![
            rule(IpAccessAction::Allow, "10.0.0.1"),
            rule(IpAccessAction::Deny, "10.0.0.2"),
            rule(IpAccessAction::Allow, "10.0.0.3"),
        ];

        let updated = editor.remove_rule(&rules, 1).unwrap();
        assert_eq!(updated, vec![rules[0].clone(), rules[2].clone()]);

        assert_eq!(editor.remove_rule(&rules, 3).unwrap(), rules);
    }

    #[test]
    fn test_edit_rule_field() {
        let editor = IpAccessControlEditor::new();
        let rules = vec![AccessRule::new(IpAccessAction::Allow, "10.0.0.1", Some("db"))];

        let updated = editor
            .edit_rule_field(&rules, 0, RuleField::Cidr, "not a cidr")
            .unwrap();
        assert_eq!(updated[0].cidr, "not a cidr");

        let updated = editor
            .edit_rule_field(&updated, 0, RuleField::Description, "")
            .unwrap();
        assert_eq!(updated[0].description, None);

        let updated = editor
            .edit_rule_field(&updated, 0, RuleField::Cidr, "")
            .unwrap();
        assert!(updated[0].cidr.is_empty());

        assert_eq!(
            editor
                .edit_rule_field(&rules, 5, RuleField::Cidr, "10.0.0.9")
                .unwrap(),
            rules
        );
    }

    #[test]
    fn test_disabled_editor_rejects_mutations() {
        let mut editor = IpAccessControlEditor::disabled();
        let rules = vec![rule(IpAccessAction::Allow, "10.0.0.1")];

        assert_eq!(editor.set_draft_cidr("10.0.0.2"), Err(EditorError::Disabled));
        assert_eq!(editor.add_rule(&rules), Err(EditorError::Disabled));
        assert_eq!(editor.remove_rule(&rules, 0), Err(EditorError::Disabled));
        assert_eq!(
            editor.edit_rule_field(&rules, 0, RuleField::Cidr, "x"),
            Err(EditorError::Disabled)
        );
        assert!(!editor.can_add());

        editor.set_disabled(false);
        assert!(editor.set_draft_cidr("10.0.0.2").is_ok());
    }

    #[test]
    fn test_notice() {
        assert_eq!(
            IpAccessControlEditor::notice(&[]),
            Some("No IP restrictions configured. This token can be used from any IP address.")
        );
        assert_eq!(
            IpAccessControlEditor::notice(&[rule(IpAccessAction::Deny, "10.0.0.1")]),
            None
        );
    }
}
