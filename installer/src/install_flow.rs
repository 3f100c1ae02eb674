//! Command handlers for `install`, `test`, and `uninstall`.
//!
//! Handlers resolve the requested tools against the catalogue before doing
//! any work, run the per-tool operation through the batch runner, and report
//! one line per tool on stderr in request order.

use camino::Utf8Path;
use std::io::Write;

use crate::artefact::catalogue::Catalogue;
use crate::artefact::descriptor::ArtefactDescriptor;
use crate::artefact::download::ArtefactFetcher;
use crate::batch::{BatchReport, run_batch};
use crate::cli::{InstallArgs, TestArgs, ToolSelection, UninstallArgs};
use crate::error::{InstallerError, Result};
use crate::output::{
    installed_line, is_directory_in_path, path_instructions, removed_line, success_message,
    tested_line, write_stderr_line,
};
use crate::pipeline::InstallPipeline;
use crate::self_test::SelfTester;
use crate::stager::Stager;

/// Collaborators shared by every command handler.
pub struct InstallContext<'a> {
    /// Known tools.
    pub catalogue: &'a Catalogue,
    /// Binary directory handler.
    pub stager: &'a Stager,
    /// Payload source.
    pub fetcher: &'a dyn ArtefactFetcher,
    /// Self-test runner.
    pub tester: &'a dyn SelfTester,
    /// Number of tools processed in parallel.
    pub jobs: usize,
    /// Suppress progress lines. Errors are still reported.
    pub quiet: bool,
}

/// Look up one tool by name.
///
/// # Errors
///
/// Returns [`InstallerError::UnknownTool`] listing the known names.
pub fn lookup<'a>(catalogue: &'a Catalogue, name: &str) -> Result<&'a ArtefactDescriptor> {
    catalogue
        .get(name)
        .ok_or_else(|| InstallerError::UnknownTool {
            name: name.to_owned(),
            known: known_names(catalogue),
        })
}

fn known_names(catalogue: &Catalogue) -> String {
    catalogue
        .names()
        .map(|name| name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve a selection to catalogue entries, in request order.
///
/// Repeated names are collapsed so no two workers ever target the same file.
///
/// # Errors
///
/// Returns [`InstallerError::UnknownTool`] for the first unknown name.
pub fn resolve_selection<'a>(
    catalogue: &'a Catalogue,
    selection: &ToolSelection,
) -> Result<Vec<&'a ArtefactDescriptor>> {
    if selection.all {
        return Ok(catalogue.descriptors().iter().collect());
    }

    let mut resolved: Vec<&ArtefactDescriptor> = Vec::with_capacity(selection.names.len());
    for name in &selection.names {
        let descriptor = lookup(catalogue, name)?;
        if resolved.iter().any(|seen| seen.name() == descriptor.name()) {
            log::debug!("ignoring repeated tool {name}");
            continue;
        }
        resolved.push(descriptor);
    }
    Ok(resolved)
}

/// Fetch, verify, install, and (unless disabled) self-test the selected
/// tools.
///
/// # Errors
///
/// Returns [`InstallerError::UnknownTool`] before any work if a name is
/// unknown, [`InstallerError::BinDir`] if the binary directory cannot be
/// prepared, and [`InstallerError::BatchFailed`] if any tool failed.
pub fn run_install(
    context: &InstallContext<'_>,
    args: &InstallArgs,
    path_var: Option<&std::ffi::OsStr>,
    stderr: &mut dyn Write,
) -> Result<()> {
    let descriptors = resolve_selection(context.catalogue, &args.selection)?;
    context
        .stager
        .prepare()
        .map_err(|source| InstallerError::BinDir { source })?;

    if !context.quiet {
        write_stderr_line(
            stderr,
            format!(
                "Installing {} tool(s) to {}...",
                descriptors.len(),
                context.stager.bin_dir()
            ),
        );
    }

    let pipeline = InstallPipeline::new(context.fetcher, context.stager, context.tester)
        .with_self_test(!args.no_self_test);
    let report = run_batch(&descriptors, context.jobs, |descriptor| {
        pipeline.install(descriptor)
    });

    report_outcomes(&report, context.quiet, stderr, installed_line);

    if report.all_succeeded() && !context.quiet {
        let bin_dir = context.stager.bin_dir();
        write_stderr_line(stderr, "");
        write_stderr_line(stderr, success_message(report.total(), bin_dir));
        write_path_hint(bin_dir, path_var, stderr);
    }

    report.into_result().map(|_| ())
}

/// Self-test the selected tools where they are installed.
///
/// # Errors
///
/// Returns [`InstallerError::UnknownTool`] before any work if a name is
/// unknown and [`InstallerError::BatchFailed`] if any self-test failed.
pub fn run_test(context: &InstallContext<'_>, args: &TestArgs, stderr: &mut dyn Write) -> Result<()> {
    let descriptors = resolve_selection(context.catalogue, &args.selection)?;
    let pipeline = InstallPipeline::new(context.fetcher, context.stager, context.tester);

    let report = run_batch(&descriptors, context.jobs, |descriptor| {
        pipeline
            .test(descriptor.name())
            .map(|path| (descriptor.name().clone(), path))
    });

    report_outcomes(&report, context.quiet, stderr, |(name, path)| {
        tested_line(name, path)
    });

    report.into_result().map(|_| ())
}

/// Remove one installed tool.
///
/// # Errors
///
/// Returns [`InstallerError::UnknownTool`] for an unknown name and
/// [`InstallerError::Uninstall`] if nothing is installed or removal fails.
pub fn run_uninstall(
    context: &InstallContext<'_>,
    args: &UninstallArgs,
    stderr: &mut dyn Write,
) -> Result<()> {
    let descriptor = lookup(context.catalogue, &args.name)?;
    let tool = descriptor.name();
    let path = context
        .stager
        .remove(tool)
        .map_err(|source| InstallerError::Uninstall {
            tool: tool.clone(),
            source,
        })?;

    if !context.quiet {
        write_stderr_line(stderr, removed_line(tool, &path));
    }
    Ok(())
}

fn report_outcomes<T>(
    report: &BatchReport<T>,
    quiet: bool,
    stderr: &mut dyn Write,
    describe: impl Fn(&T) -> String,
) {
    for outcome in report.outcomes() {
        match outcome {
            Ok(value) if !quiet => write_stderr_line(stderr, describe(value)),
            Ok(_) => {}
            Err(err) => write_stderr_line(stderr, format!("error: {err}")),
        }
    }
}

fn write_path_hint(bin_dir: &Utf8Path, path_var: Option<&std::ffi::OsStr>, stderr: &mut dyn Write) {
    if !is_directory_in_path(bin_dir, path_var) {
        write_stderr_line(stderr, "");
        write_stderr_line(stderr, path_instructions(bin_dir));
    }
}

#[cfg(test)]
#[path = "install_flow_tests.rs"]
mod tests;
