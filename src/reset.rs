use tracing::info;

use crate::error::Result;
use crate::files::FileSet;
use crate::initramfs;
use crate::paths::Paths;

/// Removes everything EnvyControl has written, which leaves the drivers in
/// their default hybrid behaviour.
pub fn reset_to_default(paths: &Paths) -> Result<()> {
    info!("reverting to default configuration");
    FileSet::new(paths).cleanup()?;
    initramfs::rebuild(paths);
    println!("Operation completed successfully");
    println!("Please reboot your computer for changes to apply!");
    Ok(())
}

/// Puts SDDM's stock Xsetup script back in place.
pub fn reset_sddm(paths: &Paths) -> Result<()> {
    info!("restoring default SDDM Xsetup");
    FileSet::new(paths).reset_xsetup()?;
    println!("Operation completed successfully");
    Ok(())
}
