//! Positional query commands: `locate`, `up`, `prev`, `next` and `last`.

use std::path::Path;

use clap::Args;
use dirnav_config::CliSettings;
use dirnav_site::{Node, last, locate_by_title, next, prev, up};

use super::{SiteArgs, line};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the locate command.
#[derive(Args)]
pub(crate) struct LocateArgs {
    #[command(flatten)]
    pub(super) site: SiteArgs,

    /// Title to search for (case-insensitive).
    title: String,

    /// Print the URL instead of the directory path.
    #[arg(long)]
    url: bool,
}

impl LocateArgs {
    /// Execute the locate command.
    ///
    /// Prints nothing if no page has the given title.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or stdout is not writable.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        output.result(&self.answer()?)?;
        Ok(())
    }

    /// Path or URL of the first page titled `title`, newline-terminated.
    pub(crate) fn answer(&self) -> Result<String, CliError> {
        let ctx = self.site.context(CliSettings::default())?;
        let Some(tree) = ctx.tree() else {
            return Ok(String::new());
        };
        let found = locate_by_title(&tree, &self.title).map(|node| {
            if self.url {
                node.url(&ctx.document_root)
            } else {
                node.path.to_string_lossy().into_owned()
            }
        });
        if found.is_none() {
            tracing::debug!(title = %self.title, "no page with this title");
        }
        Ok(line(found))
    }
}

/// Page a positional query asks for, relative to the open page.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Position {
    Up,
    Prev,
    Next,
    Last,
}

impl Position {
    fn find<'a>(self, tree: &'a Node, open: Option<&Path>) -> Option<&'a Node> {
        match self {
            Self::Up => up(tree, open),
            Self::Prev => prev(tree, open),
            Self::Next => next(tree, open),
            Self::Last => last(tree, open),
        }
    }
}

/// Arguments for the up, prev, next and last commands.
#[derive(Args)]
pub(crate) struct QueryArgs {
    #[command(flatten)]
    pub(super) site: SiteArgs,
}

impl QueryArgs {
    /// Execute a positional query.
    ///
    /// Prints nothing if the query has no answer.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or stdout is not writable.
    pub(crate) fn execute(self, position: Position, output: &Output) -> Result<(), CliError> {
        output.result(&self.answer(position)?)?;
        Ok(())
    }

    /// URL of the page at `position`, newline-terminated.
    pub(crate) fn answer(&self, position: Position) -> Result<String, CliError> {
        let ctx = self.site.context(CliSettings::default())?;
        let Some(tree) = ctx.tree() else {
            return Ok(String::new());
        };
        let found = position.find(&tree, ctx.open.as_deref());
        if found.is_none() {
            tracing::debug!(?position, open = ?ctx.open, "query has no answer");
        }
        Ok(line(found.map(|node| node.url(&ctx.document_root))))
    }
}
