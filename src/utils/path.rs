use std::env;
use std::path::{Path, PathBuf};

/// Expands a leading `~` to the home directory of the current user.
///
/// Paths of the form `~user` and paths without a resolvable home are returned unchanged.
pub fn expandtilde<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    let mut components = path.components();
    match components.next() {
        Some(first) if first.as_os_str() == "~" => match env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::path::PathBuf;

    use super::expandtilde;

    #[test]
    fn expands_home_only() {
        match env::var_os("HOME") {
            Some(home) => {
                assert_eq!(expandtilde("~/logs"), PathBuf::from(&home).join("logs"));
                assert_eq!(expandtilde("~"), PathBuf::from(&home));
            }
            None => assert_eq!(expandtilde("~/logs"), PathBuf::from("~/logs")),
        }
        assert_eq!(expandtilde("~alice/logs"), PathBuf::from("~alice/logs"));
        assert_eq!(expandtilde("/tmp/~"), PathBuf::from("/tmp/~"));
    }
}
