//! Implementation of the `literal create-book` command.

use crate::{
    books::{CreatedBook, create_book},
    commands::{ColorChoice, Context},
    error::Result,
    prompt::{Prompter, TerminalPrompter},
};

/// Execute the create-book command.
pub async fn run(color: ColorChoice, debug: bool) -> Result<()> {
    let context = Context::load(color, debug)?;
    execute(&context, &mut TerminalPrompter).await?;
    Ok(())
}

/// Log in if needed, ask for the book fields and create the book.
pub(crate) async fn execute(
    context: &Context,
    prompter: &mut dyn Prompter,
) -> Result<Option<CreatedBook>> {
    let credential = context.store.get_usable(&context.gateway, prompter).await?;
    let draft = prompter.request_book_fields()?;

    let created = create_book(
        &context.gateway,
        &credential,
        &context.config,
        &context.diagnostics,
        &draft,
    )
    .await?;

    match &created {
        Some(book) => {
            let slug = book.slug.as_deref().unwrap_or(book.id.as_str());
            context
                .diagnostics
                .note(format!("Created \"{}\" ({slug})", book.title));
        }
        None => context.diagnostics.failure("No book was created."),
    }
    Ok(created)
}
