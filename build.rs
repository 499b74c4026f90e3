//! This build script records the current UTC time so the watch face has a sane
//! starting point until the companion app syncs the clock.

use std::{env, fs::File, io::Write, path::PathBuf};

fn main() {
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());

    // create rs file with current UTC time in milliseconds
    File::create(out.join("utc.rs"))
        .unwrap()
        .write_fmt(format_args!(
            "const BUILD_UTC_MILLIS: i64 = {:?};",
            chrono::Utc::now().timestamp_millis()
        ))
        .unwrap();

    println!("cargo:rerun-if-changed=build.rs");
}
