//! Implementation of the `literal login` command.

use crate::{
    commands::{ColorChoice, Context},
    credentials::Credential,
    error::Result,
    prompt::{Prompter, TerminalPrompter},
};

/// Execute the login command.
pub async fn run(color: ColorChoice, debug: bool) -> Result<()> {
    let context = Context::load(color, debug)?;
    execute(&context, &mut TerminalPrompter).await?;
    Ok(())
}

/// Log in even when a stored credential exists, replacing it.
pub(crate) async fn execute(
    context: &Context,
    prompter: &mut dyn Prompter,
) -> Result<Credential> {
    let credential = context.store.refresh(&context.gateway, prompter).await?;
    context
        .diagnostics
        .note(format!("Logged in as profile {}", credential.profile_id));
    Ok(credential)
}
