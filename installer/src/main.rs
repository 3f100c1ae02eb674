//! git-plugins installer CLI entrypoint.
//!
//! This binary fetches the git-plugins tools from their pinned URLs, checks
//! each payload against its compiled-in SHA-256 digest, installs it into the
//! binary directory, and self-tests it with `--version`.

use clap::Parser;
use git_plugins_installer::artefact::catalogue::Catalogue;
use git_plugins_installer::artefact::download::HttpFetcher;
use git_plugins_installer::cli::{Cli, Command};
use git_plugins_installer::config::InstallerConfig;
use git_plugins_installer::dirs::{BaseDirs, SystemBaseDirs};
use git_plugins_installer::error::Result;
use git_plugins_installer::install_flow::{
    InstallContext, lookup, run_install, run_test, run_uninstall,
};
use git_plugins_installer::list::{run_info, run_list};
use git_plugins_installer::observability::init_logging;
use git_plugins_installer::output::write_stderr_line;
use git_plugins_installer::self_test::ProcessSelfTester;
use git_plugins_installer::stager::Stager;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();

    if let Err(e) = init_logging(cli.verbosity, cli.quiet) {
        write_stderr_line(&mut stderr, format!("warning: logging unavailable: {e}"));
    }

    let run_result = run(&cli, &SystemBaseDirs, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(
    cli: &Cli,
    dirs: &dyn BaseDirs,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    // Step 1: Layer configuration and resolve the binary directory
    let config = InstallerConfig::load(cli.config.as_deref(), dirs)?;
    let bin_dir = config.resolve_bin_dir(cli.bin_dir.as_deref(), dirs)?;
    log::debug!("binary directory: {bin_dir}");

    // Step 2: Validate the compiled-in catalogue before any network access
    let catalogue = Catalogue::builtin()?;
    let stager = Stager::new(bin_dir);

    // Step 3: Dispatch
    let fetcher = HttpFetcher::new(config.fetch_timeout());
    let tester = ProcessSelfTester::new(config.self_test_timeout());
    let jobs = match &cli.command {
        Command::Install(args) => config.resolve_jobs(args.jobs),
        _ => config.resolve_jobs(None),
    };
    let context = InstallContext {
        catalogue: &catalogue,
        stager: &stager,
        fetcher: &fetcher,
        tester: &tester,
        jobs,
        quiet: cli.quiet,
    };

    match &cli.command {
        Command::Install(args) => {
            let path_var = std::env::var_os("PATH");
            run_install(&context, args, path_var.as_deref(), stderr)
        }
        Command::Test(args) => run_test(&context, args, stderr),
        Command::List(args) => run_list(args, &catalogue, &stager, stdout),
        Command::Info(args) => run_info(lookup(&catalogue, &args.name)?, &stager, stdout),
        Command::Uninstall(args) => run_uninstall(&context, args, stderr),
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}
