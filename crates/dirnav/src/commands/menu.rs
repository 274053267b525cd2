//! `dirnav menu` and `dirnav submenu` command implementations.

use clap::Args;
use dirnav_config::CliSettings;
use dirnav_site::{render_menu, render_submenu};

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the menu commands.
#[derive(Args)]
pub(crate) struct MenuArgs {
    #[command(flatten)]
    pub(super) site: SiteArgs,

    /// List element name; only "ol" and "ul" get wrapper lists (overrides config).
    #[arg(short = 't', long)]
    list_type: Option<String>,

    /// Inline style for list elements (overrides config).
    #[arg(short, long)]
    style: Option<String>,
}

impl MenuArgs {
    /// Execute the menu command.
    ///
    /// Prints nothing if the base is not a content directory.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or stdout is not writable.
    pub(crate) fn execute_menu(self, output: &Output) -> Result<(), CliError> {
        output.result(&self.menu()?)?;
        Ok(())
    }

    /// Execute the submenu command.
    ///
    /// Prints nothing if the base is not a content directory.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or stdout is not writable.
    pub(crate) fn execute_submenu(self, output: &Output) -> Result<(), CliError> {
        output.result(&self.submenu()?)?;
        Ok(())
    }

    /// Nested menu markup for the whole tree.
    pub(crate) fn menu(&self) -> Result<String, CliError> {
        let ctx = self.site.context(self.settings())?;
        Ok(ctx
            .tree()
            .map(|tree| render_menu(&tree, ctx.open.as_deref(), &ctx.render_options()))
            .unwrap_or_default())
    }

    /// One menu level per step along the open path.
    pub(crate) fn submenu(&self) -> Result<String, CliError> {
        let ctx = self.site.context(self.settings())?;
        Ok(ctx
            .tree()
            .map(|tree| render_submenu(&tree, ctx.open.as_deref(), &ctx.render_options()))
            .unwrap_or_default())
    }

    fn settings(&self) -> CliSettings {
        CliSettings {
            list_type: self.list_type.clone(),
            style: self.style.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Commands;
    use crate::commands::tests::TestSite;

    fn menu_args(commands: Commands) -> MenuArgs {
        match commands {
            Commands::Menu(args) | Commands::Submenu(args) => args,
            _ => panic!("expected a menu command"),
        }
    }

    #[test]
    fn test_menu_lists_pages_with_configured_list_type() {
        let site = TestSite::new();
        let args = menu_args(site.parse(&["menu", "--list-type", "ul", "--open", "/about"]));

        let out = args.menu().unwrap();

        assert!(out.starts_with("<ul"), "got: {out}");
        assert!(out.contains("About"), "got: {out}");
        assert!(out.contains("Contact"), "got: {out}");
    }

    #[test]
    fn test_menu_on_untitled_base_prints_nothing() {
        let site = TestSite::new();

        let menu = menu_args(site.parse_empty(&["menu"])).menu().unwrap();
        let submenu = menu_args(site.parse_empty(&["submenu"])).submenu().unwrap();

        assert!(menu.is_empty());
        assert!(submenu.is_empty());
    }
}
