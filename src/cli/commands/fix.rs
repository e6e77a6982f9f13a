//! Fix command implementation.
//!
//! `harmonizer fix` scans the checks its fixers need, applies the fixes in
//! order, then re-scans to report what remains.

use std::collections::BTreeSet;

use crate::cli::args::{FixArgs, FixTarget};
use crate::error::Result;
use crate::fixers::{FixOptions, FixSession, UiConfirm};
use crate::scanner::{CheckKind, CheckSelection};
use crate::status::IssueCategory;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, GlobalOptions};
use super::display;

pub struct FixCommand {
    options: GlobalOptions,
    args: FixArgs,
}

impl FixCommand {
    pub fn new(options: GlobalOptions, args: FixArgs) -> Self {
        Self { options, args }
    }

    fn targets(&self) -> Vec<FixTarget> {
        if self.args.only.is_empty() {
            FixTarget::ALL.to_vec()
        } else {
            self.args.only.clone()
        }
    }
}

impl Command for FixCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.options.load_config()?;
        let scanner = self.options.scanner(&config)?;
        let theme = self.options.theme();

        let targets = self.targets();
        let checks: BTreeSet<CheckKind> = targets
            .iter()
            .flat_map(|t| t.checks().iter().copied())
            .collect();
        let selection = CheckSelection::only(checks);
        let categories: Vec<IssueCategory> = targets.iter().map(|t| t.category()).collect();

        let mut spinner = ui.start_spinner("Scanning environment...");
        let status = scanner.scan_with_cancel(&selection, &self.options.cancel);
        spinner.finish_clear();
        let status = status?;

        let session = FixSession::standard(scanner.runner(), scanner.python()).only(&categories);
        if !session.has_work(&status) {
            ui.success("Nothing to fix");
            return Ok(CommandResult::from_outcome(status.has_errors()));
        }

        let options = FixOptions {
            dry_run: self.args.dry_run,
            auto_confirm: self.args.yes || !config.fix_confirmation_required,
        };
        if options.dry_run {
            ui.show_header("Planned fixes (dry run)");
        } else {
            ui.show_header("Applying fixes");
        }

        let results = {
            let mut confirm = UiConfirm::new(&mut *ui);
            session.run(&status, options, &mut confirm, &self.options.cancel)
        };

        for result in &results {
            ui.message(&display::render_fix_result(result, &theme));
        }

        let failed = results.iter().filter(|r| !r.success).count();
        if options.dry_run {
            ui.message(&format!("{} fix(es) would be attempted", results.len()));
            return Ok(CommandResult::success());
        }

        if failed > 0 && !options.auto_confirm && !ui.is_interactive() {
            ui.warning("Fixes needing confirmation were skipped; re-run with --yes to apply them");
        }

        let after = scanner.scan_with_cancel(&selection, &self.options.cancel)?;
        ui.message("");
        ui.message(&format!("After fixes: {}", display::summary_line(&after.summary())));

        Ok(CommandResult::from_outcome(failed > 0))
    }
}
