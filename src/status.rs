use crate::modes::Mode;
use crate::paths::{Paths, BLACKLIST_PATH, MODESET_PATH, UDEV_INTEGRATED_PATH, XORG_PATH};

/// Infers the active mode from the marker files on disk. Hybrid is what the
/// drivers fall back to when neither integrated nor nvidia files are present.
pub fn query_mode(paths: &Paths) -> Mode {
    if paths.exists(BLACKLIST_PATH) && paths.exists(UDEV_INTEGRATED_PATH) {
        Mode::Integrated
    } else if paths.exists(XORG_PATH) && paths.exists(MODESET_PATH) {
        Mode::Nvidia
    } else {
        Mode::Hybrid
    }
}

pub fn print_status(paths: &Paths) {
    println!("Current graphics mode is: {}", query_mode(paths));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files;
    use tempfile::TempDir;

    fn touch(paths: &Paths, path: &str) {
        files::create(&paths.resolve(path), "").unwrap();
    }

    #[test]
    fn empty_system_is_hybrid() {
        let dir = TempDir::new().unwrap();
        assert_eq!(query_mode(&Paths::with_root(dir.path())), Mode::Hybrid);
    }

    #[test]
    fn integrated_needs_both_markers() {
        let dir = TempDir::new().unwrap();
        let paths = Paths::with_root(dir.path());

        touch(&paths, BLACKLIST_PATH);
        assert_eq!(query_mode(&paths), Mode::Hybrid);

        touch(&paths, UDEV_INTEGRATED_PATH);
        assert_eq!(query_mode(&paths), Mode::Integrated);
    }

    #[test]
    fn modeset_alone_is_still_hybrid() {
        let dir = TempDir::new().unwrap();
        let paths = Paths::with_root(dir.path());

        touch(&paths, MODESET_PATH);
        assert_eq!(query_mode(&paths), Mode::Hybrid);

        touch(&paths, XORG_PATH);
        assert_eq!(query_mode(&paths), Mode::Nvidia);
    }
}
