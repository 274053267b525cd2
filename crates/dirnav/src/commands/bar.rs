//! `dirnav navbar` and `dirnav titlebar` command implementations.

use clap::Args;
use dirnav_config::CliSettings;
use dirnav_site::{BreadcrumbItem, breadcrumbs, render_navbar, render_titlebar};

use super::{SiteArgs, SiteContext, line};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the breadcrumb commands.
#[derive(Args)]
pub(crate) struct BarArgs {
    #[command(flatten)]
    pub(super) site: SiteArgs,
}

impl BarArgs {
    /// Execute the navbar command.
    ///
    /// Prints nothing if the open page has no titled trail.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or stdout is not writable.
    pub(crate) fn execute_navbar(self, output: &Output) -> Result<(), CliError> {
        output.result(&self.navbar()?)?;
        Ok(())
    }

    /// Execute the titlebar command.
    ///
    /// Prints nothing if the open page has no titled trail.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or stdout is not writable.
    pub(crate) fn execute_titlebar(self, output: &Output) -> Result<(), CliError> {
        output.result(&self.titlebar()?)?;
        Ok(())
    }

    /// Linked breadcrumbs, newline-terminated.
    pub(crate) fn navbar(&self) -> Result<String, CliError> {
        let ctx = self.site.context(CliSettings::default())?;
        let items = trail(&ctx);
        Ok(bar(&items, |items| render_navbar(items, &ctx.document_root)))
    }

    /// Plain breadcrumbs, newline-terminated.
    pub(crate) fn titlebar(&self) -> Result<String, CliError> {
        let ctx = self.site.context(CliSettings::default())?;
        Ok(bar(&trail(&ctx), render_titlebar))
    }
}

fn bar(items: &[BreadcrumbItem], render: impl Fn(&[BreadcrumbItem]) -> String) -> String {
    line((!items.is_empty()).then(|| render(items)))
}

/// Breadcrumbs from the open page (or the base) up to the base.
fn trail(ctx: &SiteContext) -> Vec<BreadcrumbItem> {
    let path = ctx.open.as_deref().unwrap_or(&ctx.base);
    breadcrumbs(
        ctx.site.extractor(),
        ctx.site.index_file(),
        path,
        Some(&ctx.base),
    )
}
