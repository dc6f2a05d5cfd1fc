// SPDX-License-Identifier: Apache-2.0

//! Decodes a JSON file into a document and writes it back out in the
//! encoder's canonical form.
//!
//! Usage: `bsonjson_cat <file.json>`. Exits with status 2 if the input is
//! rejected, 1 on usage or I/O errors.

use std::fs::File;
use std::io::{self, Write};
use std::process::ExitCode;

use bsonjson::{decode_from_reader, encode_container, IoReader, IoWriter};

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: bsonjson_cat <file.json>");
        return ExitCode::from(1);
    };
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot open {path}: {e}");
            return ExitCode::from(1);
        }
    };

    let root = match decode_from_reader(IoReader(io::BufReader::new(file))) {
        Ok(root) => root,
        Err(e) => {
            log::info!("Rejected {path}");
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    let stdout = io::stdout().lock();
    let mut writer = IoWriter::new(stdout);
    if let Err(e) = encode_container(&root, &mut writer) {
        eprintln!("Write failed: {e}");
        return ExitCode::from(1);
    }
    let mut stdout = writer.into_inner();
    if writeln!(stdout).and_then(|()| stdout.flush()).is_err() {
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
