//! Commands that address a single piece of content

use super::{write_json, Status};
use eyre::WrapErr;
use hashstore_store::{Address, Store};
use serde_json::json;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

pub(super) fn put(
    store: &Store,
    paths: &[PathBuf],
    json: bool,
    out: &mut dyn Write,
) -> eyre::Result<Status> {
    let mut addresses: Vec<Address> = Vec::with_capacity(paths.len());

    for path in paths {
        let address = if path.as_os_str() == "-" {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            store
                .put_reader(&mut input)
                .wrap_err("failed to store standard input")?
        } else {
            store
                .put_file(path)
                .wrap_err_with(|| format!("failed to store {}", path.display()))?
        };

        if address.is_duplicate {
            info!(digest = %address.digest, "content already stored");
        }
        if !json {
            writeln!(out, "{}  {}", address.digest, address.abspath.display())?;
        }
        addresses.push(address);
    }

    if json {
        write_json(out, &addresses)?;
    }
    Ok(Status::Success)
}

pub(super) fn get(store: &Store, digest: &str, json: bool, out: &mut dyn Write) -> eyre::Result<Status> {
    let address = store.get(digest)?;
    if json {
        write_json(out, &address)?;
    } else {
        writeln!(out, "{}", address.abspath.display())?;
    }
    Ok(Status::Success)
}

pub(super) fn cat(store: &Store, digest: &str, out: &mut dyn Write) -> eyre::Result<Status> {
    let mut file = store.open(digest)?;
    io::copy(&mut file, out).wrap_err_with(|| format!("failed to read {digest}"))?;
    Ok(Status::Success)
}

pub(super) fn exists(
    store: &Store,
    digest: &str,
    json: bool,
    out: &mut dyn Write,
) -> eyre::Result<Status> {
    let present = store.exists(digest)?;
    if json {
        write_json(out, &json!({ "digest": digest, "exists": present }))?;
    } else {
        writeln!(out, "{}", if present { "present" } else { "absent" })?;
    }

    Ok(if present { Status::Success } else { Status::Failure })
}

pub(super) fn delete(
    store: &Store,
    digest: &str,
    json: bool,
    out: &mut dyn Write,
) -> eyre::Result<Status> {
    store.delete(digest)?;
    if json {
        write_json(out, &json!({ "digest": digest, "deleted": true }))?;
    } else {
        writeln!(out, "deleted {digest}")?;
    }
    Ok(Status::Success)
}
