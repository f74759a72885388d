//! Runs every generator mode over `fixtures/request.json`.
//!
//! Each mode writes its own directory under `OUT_DIR`; `src/lib.rs` includes
//! the files from there.

use std::env;
use std::path::{Path, PathBuf};

use codegen::{EmitPaths, ModeFlags};
use ir::GenerationRequest;

const REQUEST: &str = "fixtures/request.json";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={REQUEST}");

    let request = GenerationRequest::from_file(Path::new(REQUEST))
        .unwrap_or_else(|e| panic!("{REQUEST}: {e}"));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set for build scripts"));

    let modes = [
        ("orm", ModeFlags::default()),
        ("ormapi", ModeFlags { api: true, ..Default::default() }),
        ("mctestclient", ModeFlags { client: true, ..Default::default() }),
        ("testutil", ModeFlags { testutil: true, ..Default::default() }),
        ("permtest", ModeFlags { test: true, ..Default::default() }),
    ];
    for (dir, flags) in modes {
        pipeline::compile_request(request.clone(), flags, &out_dir.join(dir), EmitPaths::default(), false)
            .unwrap_or_else(|e| panic!("generating {dir}: {e}"));
    }
}
