//! `dirnav tree` and `dirnav rebuild` command implementations.

use clap::Args;
use dirnav_config::CliSettings;

use super::{SiteArgs, line};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tree commands.
#[derive(Args)]
pub(crate) struct TreeArgs {
    #[command(flatten)]
    pub(super) site: SiteArgs,
}

impl TreeArgs {
    /// Execute the tree command.
    ///
    /// Prints nothing if the base is not a content directory.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the tree cannot be
    /// serialized.
    pub(crate) fn execute_tree(self, output: &Output) -> Result<(), CliError> {
        output.result(&self.json()?)?;
        Ok(())
    }

    /// Pretty JSON of the loaded tree, newline-terminated.
    pub(crate) fn json(&self) -> Result<String, CliError> {
        let ctx = self.site.context(CliSettings::default())?;
        let json = match ctx.tree() {
            Some(tree) => Some(serde_json::to_string_pretty(&*tree)?),
            None => None,
        };
        Ok(line(json))
    }

    /// Execute the rebuild command.
    ///
    /// # Errors
    ///
    /// Returns an error if the base is not a content directory.
    pub(crate) fn execute_rebuild(self, output: &Output) -> Result<(), CliError> {
        let ctx = self.site.context(CliSettings::default())?;

        ctx.site.invalidate_disk(&ctx.base);
        let tree = ctx
            .site
            .rebuild(&ctx.base, ctx.load_options.depth_limit)
            .ok_or_else(|| CliError::NotContent(ctx.base.clone()))?;

        output.success(&format!(
            "Rebuilt {}: {} pages",
            ctx.base.display(),
            tree.len()
        ));
        Ok(())
    }
}
