use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Check if the current process runs with an effective uid of root.
pub fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Resolve an executable the way a shell would.
///
/// Names containing a slash are checked as paths; bare names are searched
/// in `PATH`.
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    if name.contains('/') {
        let path = PathBuf::from(name);
        return is_executable(&path).then_some(path);
    }

    let search = env::var_os("PATH")?;
    env::split_paths(&search)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn finds_shell_on_path() {
        let sh = find_in_path("sh").expect("sh should be on PATH");
        assert!(sh.is_absolute());
        assert!(sh.ends_with("sh"));
    }

    #[test]
    fn missing_command() {
        assert!(find_in_path("definitely-not-a-real-command-xyz").is_none());
        assert!(find_in_path("").is_none());
    }

    #[test]
    fn absolute_path_requires_exec_bit() {
        let tmp = TempDir::new().unwrap();
        let script = tmp.path().join("tool");
        fs::write(&script, "#!/bin/sh\n").unwrap();

        fs::set_permissions(&script, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(find_in_path(script.to_str().unwrap()).is_none());

        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(find_in_path(script.to_str().unwrap()), Some(script));
    }

    #[test]
    fn directories_are_not_executables() {
        let tmp = TempDir::new().unwrap();
        assert!(find_in_path(tmp.path().to_str().unwrap()).is_none());
    }

    #[test]
    fn is_root_does_not_panic() {
        let _ = is_root();
    }
}
