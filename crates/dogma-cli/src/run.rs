//! Token creation from the command line

use anyhow::Context;
use tracing::{debug, warn};

use dogma_console::{NewTokenForm, NotificationDispatcher, Session, SubmitOutcome, TokenCreator};
use dogma_maintainer_client::{MaintainerClient, model::TokenDetail};

use crate::args::{Cli, RuleArg};
use crate::config::Configuration;

/// Create the token described by `cli`; returns whether it was created
pub async fn run(
    cli: &Cli,
    configuration: &Configuration,
    notifier: &dyn NotificationDispatcher,
) -> anyhow::Result<bool> {
    let client = MaintainerClient::new(configuration.client_config())?;

    // Roles only matter for the admin flag
    let session = if cli.system_admin {
        match client.current_user().await {
            Ok(user) => Session::from(user),
            Err(e) => {
                warn!("Failed to read the current user: {}", e);
                Session::default()
            }
        }
    } else {
        Session::default()
    };

    let mut form = prepare_form(cli, session)?;
    match create(&mut form, &client, notifier).await? {
        Some(token) => {
            println!("{}", render_token(&token, cli.json)?);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Fill a form from the command line arguments
pub fn prepare_form(cli: &Cli, session: Session) -> anyhow::Result<NewTokenForm> {
    let mut form = NewTokenForm::new(session);
    form.open_popover();
    form.set_app_id(&cli.app_id);

    if cli.system_admin {
        if form.is_system_admin_visible() {
            form.set_system_admin(true);
        } else {
            warn!("--system-admin ignored: the current user is not a system administrator");
        }
    }

    for rule in &cli.rules {
        add_rule(&mut form, rule).with_context(|| format!("invalid rule '{}'", rule))?;
    }
    debug!(rules = form.rules().len(), "Prepared token form");

    Ok(form)
}

fn add_rule(form: &mut NewTokenForm, rule: &RuleArg) -> anyhow::Result<()> {
    let editor = form.editor_mut();
    editor.set_draft_action(rule.action)?;
    editor.set_draft_cidr(&rule.cidr)?;
    editor.set_draft_description(rule.description.as_deref().unwrap_or_default())?;
    form.add_rule()?;
    Ok(())
}

/// Submit the form; `None` when the server refused (already notified)
pub async fn create(
    form: &mut NewTokenForm,
    creator: &dyn TokenCreator,
    notifier: &dyn NotificationDispatcher,
) -> anyhow::Result<Option<TokenDetail>> {
    match form.submit(creator, notifier).await? {
        SubmitOutcome::Created(_) => {
            let dialog = form.secret_dialog_mut();
            let token = dialog.token().cloned();
            dialog.close();
            Ok(token)
        }
        SubmitOutcome::Failed(_) => Ok(None),
    }
}

/// Human-readable or JSON rendering of a created token
pub fn render_token(token: &TokenDetail, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(token)?);
    }

    let mut lines = vec![
        format!("appId:       {}", token.app_id),
        format!("secret:      {}", token.secret.as_deref().unwrap_or("-")),
        format!("systemAdmin: {}", token.system_admin),
        format!("creation:    {}", token.creation),
    ];
    match token.ip_access_control_rules.as_deref() {
        Some(rules) if !rules.is_empty() => {
            lines.push("ipAccessControlRules:".to_string());
            for rule in rules {
                let mut line = format!("  {} {}", rule.action, rule.cidr);
                if let Some(description) = &rule.description {
                    line.push_str(&format!(" ({})", description));
                }
                lines.push(line);
            }
        }
        _ => lines.push("ipAccessControlRules: none".to_string()),
    }
    Ok(lines.join("\n"))
}
