//! SAM header rewriting for consensus output.
//!
//! - `@PG` records are appended with automatic `PP` chaining and ID de-duplication
//! - reference dictionaries are renamed with a [`ChromosomePrefix`]

use anyhow::{Result, bail};
use bstr::BString;
use noodles::sam::Header;
use noodles::sam::header::record::value::Map;
use noodles::sam::header::record::value::map::Program;
use noodles::sam::header::record::value::map::program::tag;

use crate::cluster::ChromosomePrefix;

/// Program name written to `@PG` records.
pub const PROGRAM_NAME: &str = "mecluster";

/// ID of the program at the end of the `@PG` chain, i.e. the one no other program names as
/// its `PP`.
#[must_use]
pub fn get_last_program_id(header: &Header) -> Option<String> {
    let programs = header.programs();
    let programs = programs.as_ref();

    let is_referenced = |id: &BString| {
        programs.values().any(|pg| {
            pg.other_fields()
                .get(&tag::PREVIOUS_PROGRAM_ID)
                .is_some_and(|pp| <_ as AsRef<[u8]>>::as_ref(pp) == id.as_slice())
        })
    };

    programs
        .keys()
        .find(|id| !is_referenced(id))
        .or_else(|| programs.keys().next())
        .map(ToString::to_string)
}

/// Returns `base_id`, or `base_id.N` with the smallest `N` not yet used in the header.
#[must_use]
pub fn make_unique_program_id(header: &Header, base_id: &str) -> String {
    let programs = header.programs();
    let programs = programs.as_ref();

    if !programs.contains_key(base_id.as_bytes()) {
        return base_id.to_string();
    }

    (1..)
        .map(|i| format!("{base_id}.{i}"))
        .find(|candidate| !programs.contains_key(candidate.as_bytes()))
        .unwrap_or_else(|| base_id.to_string())
}

/// Builds a `@PG` record for this program.
///
/// # Errors
/// Returns an error if the record cannot be built.
pub fn build_program_record(
    version: &str,
    command_line: &str,
    previous_program: Option<&str>,
) -> Result<Map<Program>> {
    let mut builder = Map::<Program>::builder()
        .insert(tag::NAME, PROGRAM_NAME)
        .insert(tag::VERSION, version)
        .insert(tag::COMMAND_LINE, command_line);

    if let Some(pp) = previous_program {
        builder = builder.insert(tag::PREVIOUS_PROGRAM_ID, pp);
    }

    Ok(builder.build()?)
}

/// Appends a `@PG` record chained to the last program already in the header.
///
/// # Errors
/// Returns an error if the record cannot be added.
pub fn add_pg_record(mut header: Header, version: &str, command_line: &str) -> Result<Header> {
    let previous_program = get_last_program_id(&header);
    let id = make_unique_program_id(&header, PROGRAM_NAME);
    let record = build_program_record(version, command_line, previous_program.as_deref())?;

    header.programs_mut().add(BString::from(id), record)?;
    Ok(header)
}

/// Renames every reference sequence in the dictionary with `prefix`, keeping order and lengths.
///
/// # Errors
/// Returns an error if two references collapse onto the same name (e.g. `1` and `chr1`).
pub fn normalize_reference_names(mut header: Header, prefix: &ChromosomePrefix) -> Result<Header> {
    let original = std::mem::take(header.reference_sequences_mut());

    for (name, map) in original {
        let normalized = BString::from(prefix.normalize(&name.to_string()).into_owned());
        if header.reference_sequences_mut().insert(normalized.clone(), map).is_some() {
            bail!(
                "Adding chromosome prefix '{prefix}' to '{name}' duplicates reference '{normalized}'; use --chromosome-prefix keep"
            );
        }
    }

    Ok(header)
}
