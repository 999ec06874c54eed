// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Side effects after generation: writing files and running `go test`.

use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;

use godoctest_gen::{GenError, GeneratedFile};
use log::{debug, info};

/// Write one generated file next to its source.
pub fn write_generated(file: &GeneratedFile) -> Result<(), GenError> {
    debug!("writing {}", file.output_path.display());
    fs::write(&file.output_path, &file.text).map_err(|source| GenError::Io {
        path: file.output_path.clone(),
        source,
    })
}

/// Run `go test` in `dir`.
///
/// With `capture` the combined output is returned instead of streamed to
/// the terminal.
pub fn go_test(dir: &Path, capture: bool) -> io::Result<(bool, Option<String>)> {
    info!("running go test in {}", dir.display());
    let mut cmd = Command::new("go");
    cmd.arg("test").current_dir(dir);

    if capture {
        let out = cmd.output()?;
        let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&out.stderr));
        Ok((out.status.success(), Some(text)))
    } else {
        let status = cmd.status()?;
        Ok((status.success(), None))
    }
}
