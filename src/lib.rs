//! Switches hybrid-graphics laptops between integrated, hybrid and nvidia
//! modes by managing a fixed set of modprobe, udev, X.org and display
//! manager files. Changes take effect after a reboot.

pub mod cli;
pub mod commands;
pub mod display_manager;
pub mod error;
pub mod files;
pub mod hardware;
pub mod initramfs;
pub mod logger;
pub mod modes;
pub mod paths;
pub mod permissions;
pub mod prompt;
pub mod reset;
pub mod status;
pub mod templates;

pub use error::{EnvyError, Result};
pub use modes::Mode;
