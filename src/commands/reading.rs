//! Implementation of the `literal reading` command.

use crate::{
    books::{Book, currently_reading, format_book},
    commands::{ColorChoice, Context},
    error::Result,
    palette,
    prompt::{Prompter, TerminalPrompter},
};

/// Execute the reading command.
pub async fn run(color: ColorChoice, debug: bool) -> Result<()> {
    let context = Context::load(color, debug)?;
    for line in execute(&context, &mut TerminalPrompter).await? {
        println!("{line}");
    }
    Ok(())
}

/// Log in if needed and render the current reading list.
pub(crate) async fn execute(
    context: &Context,
    prompter: &mut dyn Prompter,
) -> Result<Vec<String>> {
    let credential = context.store.get_usable(&context.gateway, prompter).await?;
    let books = currently_reading(&context.gateway, &credential).await?;
    Ok(render(&books, context.diagnostics.use_color()))
}

/// Render the reading list, one line per book.
fn render(books: &[Book], use_color: bool) -> Vec<String> {
    if books.is_empty() {
        return vec!["You are not currently reading any books.".to_string()];
    }
    let mut lines = vec![palette::fmt_heading("Currently reading:", use_color)];
    lines.extend(books.iter().map(|book| format!("  {}", format_book(book, use_color))));
    lines
}
