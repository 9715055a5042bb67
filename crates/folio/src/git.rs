//! Recording library changes with git.
//!
//! Both helpers shell out to `git -C <repository>` with an argument vector and hand back git's
//! exit code, so a library that is not a repository just yields a non-zero code.

use std::process::Command;

use super::*;

/// Runs `git -C <path> commit [-m <message>]` and returns git's exit code.
///
/// An empty message leaves out `-m`, which lets git open its own editor. The exit code is
/// passed through untouched (`-1` if git was killed by a signal); only failing to start git at
/// all is an error.
pub fn git_commit(path: &Path, message: &str) -> Result<i32> {
  let mut command = Command::new("git");
  command.arg("-C").arg(path).arg("commit");
  if !message.is_empty() {
    command.args(["-m", message]);
  }
  debug!("Committing in {}", path.display());
  trace!("{command:?}");

  let status = command.status()?;
  let code = status.code().unwrap_or(-1);
  if code != 0 {
    warn!("git commit in {} exited with {code}", path.display());
  }
  Ok(code)
}

/// Runs `git -C <repository> add -- <paths>..` and returns git's exit code.
pub fn git_add(repository: &Path, paths: &[PathBuf]) -> Result<i32> {
  let mut command = Command::new("git");
  command.arg("-C").arg(repository).args(["add", "--"]).args(paths);
  trace!("{command:?}");
  Ok(command.status()?.code().unwrap_or(-1))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok_and(|output| output.status.success())
  }

  #[traced_test]
  #[test]
  fn test_commit_outside_repository_fails() {
    if !git_available() {
      return;
    }
    let dir = tempdir().unwrap();
    let code = git_commit(dir.path(), "Add document").unwrap();
    assert_ne!(code, 0);
  }

  #[test]
  fn test_commit_staged_change() {
    if !git_available() {
      return;
    }
    let dir = tempdir().unwrap();
    let git = |args: &[&str]| {
      Command::new("git").arg("-C").arg(dir.path()).args(args).output().unwrap().status.success()
    };
    assert!(git(&["init", "--quiet"]));
    assert!(git(&["config", "user.email", "folio@example.org"]));
    assert!(git(&["config", "user.name", "folio"]));
    assert!(git(&["config", "commit.gpgsign", "false"]));
    std::fs::write(dir.path().join("info.yaml"), "title: T\n").unwrap();
    assert_eq!(git_add(dir.path(), &[dir.path().join("info.yaml")]).unwrap(), 0);

    assert_eq!(git_commit(dir.path(), "Add T").unwrap(), 0);
    // nothing left to commit
    assert_ne!(git_commit(dir.path(), "Again").unwrap(), 0);
  }
}
