//! Settings command
//!
//! Usage: laf-server settings

use laf_store::Settings;

/// Execute settings command
pub fn execute() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    println!("{:#?}", settings);
    Ok(())
}
