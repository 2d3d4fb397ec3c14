//! Commands that walk or describe the whole store

use super::{write_json, Status};
use hashstore_store::Store;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

pub(super) fn ls(store: &Store, json: bool, out: &mut dyn Write) -> eyre::Result<Status> {
    if json {
        let paths: Vec<PathBuf> = store.files().collect();
        write_json(out, &paths)?;
    } else {
        for path in store {
            writeln!(out, "{}", path.display())?;
        }
    }
    Ok(Status::Success)
}

pub(super) fn stats(store: &Store, json: bool, out: &mut dyn Write) -> eyre::Result<Status> {
    let count = store.count();
    let size = store.size();

    if json {
        write_json(out, &json!({ "count": count, "size": size }))?;
    } else {
        writeln!(out, "files: {count}")?;
        writeln!(out, "bytes: {size}")?;
    }
    Ok(Status::Success)
}

pub(super) fn verify(store: &Store, json: bool, out: &mut dyn Write) -> eyre::Result<Status> {
    let mut found = 0usize;

    if json {
        let corrupted: Vec<_> = store.corrupted().collect();
        found = corrupted.len();
        write_json(out, &corrupted)?;
    } else {
        for corruption in store.corrupted() {
            found += 1;
            writeln!(
                out,
                "{} -> {}",
                corruption.path.display(),
                corruption.expected.digest
            )?;
        }
    }

    if found > 0 {
        tracing::warn!(corrupted = found, "store verification failed");
        Ok(Status::Failure)
    } else {
        Ok(Status::Success)
    }
}

pub(super) fn sweep(
    store: &Store,
    older_than_secs: u64,
    json: bool,
    out: &mut dyn Write,
) -> eyre::Result<Status> {
    let report = store.sweep_staging(Duration::from_secs(older_than_secs))?;

    if json {
        write_json(out, &report)?;
    } else {
        writeln!(
            out,
            "removed {} staged files ({} bytes), kept {}",
            report.removed, report.bytes_reclaimed, report.skipped
        )?;
    }
    Ok(Status::Success)
}

pub(super) fn config(store: &Store, out: &mut dyn Write) -> eyre::Result<Status> {
    write_json(out, store.config())?;
    Ok(Status::Success)
}
