// Shared helpers for integration tests.
//
// Provides a temporary home directory plus dotfiles repository and a fake
// executor that emulates the external tools (stow, curl, sh, sudo) on the
// real filesystem, so each integration test can run the full install task
// list in isolation.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use dotfiles_setup::config::Config;
use dotfiles_setup::error::ResourceError;
use dotfiles_setup::exec::{ExecResult, Executor};
use dotfiles_setup::logging::{Log, Logger};
use dotfiles_setup::platform::{Os, Platform};
use dotfiles_setup::tasks::{Context, Layout};

/// Timestamp used for every test run's backup directory.
pub const BACKUP_STAMP: &str = "20260101_120000";

/// Executor that performs a small, faithful subset of each tool's effect.
///
/// - `stow [--adopt|-D] -d DIR -t TARGET PKG` links, adopts, or unlinks the
///   package's top-level entries.
/// - `curl` returns a placeholder script.
/// - `sh` (the installer) creates the `$ZSH` directory, plus a stock
///   `custom/` inside it when `stock_custom` is set.
/// - `sudo pacman …` succeeds without effect.
#[derive(Debug, Default)]
pub struct FakeExecutor {
    available: HashSet<String>,
    conflict_once: Mutex<HashSet<String>>,
    conflict_always: HashSet<String>,
    stock_custom: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeExecutor {
    /// A machine with stow and curl on `PATH`.
    pub fn new() -> Self {
        Self::default().with_program("stow").with_program("curl")
    }

    /// A machine with nothing on `PATH`.
    pub fn bare() -> Self {
        Self::default()
    }

    /// Report `program` as present on `PATH`.
    pub fn with_program(mut self, program: &str) -> Self {
        self.available.insert(program.to_string());
        self
    }

    /// Make the first `stow --adopt` of `module` fail with a conflict.
    pub fn with_adopt_conflict(self, module: &str) -> Self {
        self.conflict_once
            .lock()
            .expect("lock")
            .insert(module.to_string());
        self
    }

    /// Make every `stow` invocation for `module` fail with exit code 2.
    pub fn with_persistent_conflict(mut self, module: &str) -> Self {
        self.conflict_always.insert(module.to_string());
        self
    }

    /// Have the framework installer create a stock `custom/` directory.
    pub fn with_stock_custom(mut self) -> Self {
        self.stock_custom = true;
        self
    }

    /// All recorded calls, as `"program arg1 arg2 …"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    /// Recorded calls to `program`.
    pub fn calls_to(&self, program: &str) -> Vec<String> {
        let prefix = format!("{program} ");
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(&prefix))
            .collect()
    }

    fn record(&self, program: &str, args: &[&str]) {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().expect("lock").push(line);
    }

    fn dispatch(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> ExecResult {
        self.record(program, args);
        match program {
            "stow" => self.stow(args),
            "curl" => ok("# oh-my-zsh installer\n"),
            "sh" => {
                if let Some((_, dir)) = env.iter().find(|(k, _)| *k == "ZSH") {
                    let dir = Path::new(dir);
                    std::fs::create_dir_all(dir).expect("create framework dir");
                    std::fs::write(dir.join("oh-my-zsh.sh"), "").expect("write framework");
                    if self.stock_custom {
                        std::fs::create_dir_all(dir.join("custom/plugins/example"))
                            .expect("create stock custom");
                        std::fs::write(dir.join("custom/example.zsh"), "# stock example")
                            .expect("write stock custom");
                    }
                }
                ok("")
            }
            _ => ok(""),
        }
    }

    fn stow(&self, args: &[&str]) -> ExecResult {
        let mut mode = "";
        let mut dir = PathBuf::new();
        let mut target = PathBuf::new();
        let mut package = String::new();
        let mut it = args.iter();
        while let Some(arg) = it.next() {
            match *arg {
                "--adopt" | "-D" => mode = *arg,
                "-d" => dir = PathBuf::from(it.next().expect("-d value")),
                "-t" => target = PathBuf::from(it.next().expect("-t value")),
                other => package = other.to_string(),
            }
        }

        if self.conflict_always.contains(&package) {
            return failed(2, "existing target is not owned by stow");
        }
        if mode == "--adopt" && self.conflict_once.lock().expect("lock").remove(&package) {
            return failed(1, "cannot stow over existing target");
        }

        let source = dir.join(&package);
        for entry in std::fs::read_dir(&source).expect("read package") {
            let entry = entry.expect("entry");
            let src = entry.path();
            let dst = target.join(entry.file_name());
            let linked = std::fs::read_link(&dst).is_ok_and(|l| l == src);
            match mode {
                "-D" => {
                    if linked {
                        std::fs::remove_file(&dst).expect("unlink");
                    }
                }
                _ if linked => {}
                "--adopt" if dst.is_file() && !dst.is_symlink() => {
                    std::fs::rename(&dst, &src).expect("adopt");
                    std::os::unix::fs::symlink(&src, &dst).expect("link");
                }
                _ => {
                    if dst.symlink_metadata().is_ok() {
                        return failed(1, "conflict");
                    }
                    std::os::unix::fs::symlink(&src, &dst).expect("link");
                }
            }
        }
        ok("")
    }
}

fn ok(stdout: &str) -> ExecResult {
    ExecResult {
        stdout: stdout.to_string(),
        stderr: String::new(),
        success: true,
        code: Some(0),
    }
}

fn failed(code: i32, stderr: &str) -> ExecResult {
    ExecResult {
        stdout: String::new(),
        stderr: stderr.to_string(),
        success: false,
        code: Some(code),
    }
}

fn checked(program: &str, result: ExecResult) -> Result<ExecResult> {
    if result.success {
        Ok(result)
    } else {
        Err(ResourceError::CommandFailed {
            program: program.to_string(),
            code: result.code,
            stderr: result.stderr,
        }
        .into())
    }
}

impl Executor for FakeExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        checked(program, self.dispatch(program, args, &[]))
    }

    fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult> {
        checked(program, self.dispatch(program, args, env))
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        Ok(self.dispatch(program, args, &[]))
    }

    fn which(&self, program: &str) -> bool {
        self.available.contains(program)
    }
}

/// An isolated home directory and dotfiles repository backed by a
/// [`tempfile::TempDir`].
pub struct TestEnv {
    /// Owns the temporary tree; deleted on drop.
    pub tmp: tempfile::TempDir,
    /// Repository root (`<tmp>/dotfiles`).
    pub root: PathBuf,
    /// Home directory (`<tmp>/home`).
    pub home: PathBuf,
}

impl TestEnv {
    /// Create empty `home/` and `dotfiles/` directories.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = tmp.path().join("dotfiles");
        let home = tmp.path().join("home");
        std::fs::create_dir_all(&root).expect("create repo");
        std::fs::create_dir_all(&home).expect("create home");
        Self { tmp, root, home }
    }

    /// Resolved layout for this environment.
    pub fn layout(&self) -> Layout {
        let config = Config::load(&self.root).expect("load config");
        Layout::resolve(&self.home, &config.settings, None, None, BACKUP_STAMP)
    }

    /// Build a context running on Arch Linux.
    pub fn context(&self, executor: Arc<FakeExecutor>) -> (Context, Arc<Logger>) {
        self.context_on(executor, Platform::new(Os::Linux, true), false)
    }

    /// Build a context on an explicit platform, optionally in dry-run mode.
    pub fn context_on(
        &self,
        executor: Arc<FakeExecutor>,
        platform: Platform,
        dry_run: bool,
    ) -> (Context, Arc<Logger>) {
        let config = Config::load(&self.root).expect("load config");
        let log = Arc::new(Logger::new("test"));
        let ctx = Context::new(
            Arc::new(config),
            Arc::new(platform),
            Arc::clone(&log) as Arc<dyn Log>,
            dry_run,
            executor as Arc<dyn Executor>,
            self.home.clone(),
            self.layout(),
        );
        (ctx, log)
    }

    /// Absolute path to `rel` under home.
    pub fn home_path(&self, rel: &str) -> PathBuf {
        self.home.join(rel)
    }

    /// Directory holding this run's backups.
    pub fn backup_root(&self) -> PathBuf {
        self.home.join(".dotfiles_backup").join(BACKUP_STAMP)
    }
}

/// Fluent builder for [`TestEnv`].
///
/// Allows individual tests to lay out the repository and home directory
/// before the run without modifying the shared setup.
pub struct TestEnvBuilder {
    env: TestEnv,
}

impl TestEnvBuilder {
    /// Begin building an empty environment.
    pub fn new() -> Self {
        Self { env: TestEnv::new() }
    }

    /// Write `content` to `rel` under the repository root.
    pub fn with_repo_file(self, rel: &str, content: &str) -> Self {
        write_file(&self.env.root.join(rel), content);
        self
    }

    /// Write `content` to `rel` under home.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        write_file(&self.env.home.join(rel), content);
        self
    }

    /// Create a module with a single dotfile (`<module>/.<module>rc`).
    pub fn with_module(self, module: &str) -> Self {
        let rel = format!("{module}/.{module}rc");
        self.with_repo_file(&rel, &format!("# {module}"))
    }

    /// Create the repository's Oh My Zsh custom directory with one theme.
    pub fn with_repo_custom(self) -> Self {
        self.with_repo_file("oh-my-zsh/custom/themes/mine.zsh-theme", "PROMPT='%# '")
    }

    /// Create an installed framework directory (`~/.oh-my-zsh`).
    pub fn with_framework(self) -> Self {
        self.with_home_file(".oh-my-zsh/oh-my-zsh.sh", "")
    }

    /// Write `conf/install.toml`.
    pub fn with_install_toml(self, content: &str) -> Self {
        self.with_repo_file("conf/install.toml", content)
    }

    /// Finish building and return the environment.
    pub fn build(self) -> TestEnv {
        self.env
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, content).expect("write file");
}
