use nix::unistd::geteuid;

use crate::error::{EnvyError, Result};

pub fn is_root() -> bool {
    geteuid().is_root()
}

/// Every command that touches the file set goes through this first.
pub fn ensure_root(privileged: bool) -> Result<()> {
    if privileged {
        Ok(())
    } else {
        Err(EnvyError::NotRoot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unprivileged_is_rejected() {
        assert!(matches!(ensure_root(false), Err(EnvyError::NotRoot)));
        assert!(ensure_root(true).is_ok());
    }
}
