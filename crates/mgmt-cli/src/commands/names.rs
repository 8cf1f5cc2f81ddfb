//! encode / decode commands

use mgmt_fs::escape;

use crate::error::Result;

pub fn run_encode(name: &str) -> Result<()> {
    println!("{}", escape::encode(name));
    Ok(())
}

pub fn run_decode(name: &str) -> Result<()> {
    println!("{}", escape::decode(name)?);
    Ok(())
}
