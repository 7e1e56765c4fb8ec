//! Test data factories for playlist-ajax types

#![allow(dead_code)]

use playlist_ajax::listing::{PlaylistEntry, PlaylistIndex};
use playlist_ajax::types::{
    ControlId, FIELD_CLEAN_ID, FIELD_CLEAN_NAME, FIELD_LIKED_NAME, FIELD_NAME, FIELD_PLAYLIST,
    Field, FormDescriptor, JobStatus, ProgressSnapshot,
};

/// Create a playlist entry
pub fn make_entry(id: &str, name: &str, tracks: u64) -> PlaylistEntry {
    PlaylistEntry {
        id: id.to_string(),
        name: name.to_string(),
        tracks,
    }
}

/// Listing with a source playlist, its cleaned copy and an unrelated one
pub fn make_listing() -> PlaylistIndex {
    PlaylistIndex::from_entries(vec![
        make_entry("p1", "Road Trip", 120),
        make_entry("p2", "Cleaned: Road Trip", 37),
        make_entry("p3", "Mix", 12),
    ])
}

/// Default submit control
pub fn button() -> ControlId {
    ControlId::new("submit-btn")
}

/// Clean form selecting a playlist by id
pub fn make_clean_form(id: &str, typed: &str) -> FormDescriptor {
    FormDescriptor::new("/clean")
        .with_field(Field::hidden(FIELD_CLEAN_ID, id))
        .with_field(Field::text(FIELD_CLEAN_NAME, typed))
        .with_control(button())
}

/// Merge form with the given checked playlist ids and target name
pub fn make_merge_form(checked: &[&str], name: &str) -> FormDescriptor {
    let mut form = FormDescriptor::new("/merge")
        .with_class("merge")
        .with_field(Field::text(FIELD_NAME, name))
        .with_control(button());
    for id in ["p1", "p2", "p3"] {
        form = form.with_field(Field::checkbox(FIELD_PLAYLIST, id, checked.contains(&id)));
    }
    form
}

/// Update-liked form
pub fn make_liked_form(name: &str) -> FormDescriptor {
    FormDescriptor::new("/update_liked")
        .with_field(Field::text(FIELD_LIKED_NAME, name))
        .with_control(button())
}

/// Generic form with one text field
pub fn make_generic_form(field: &str, value: &str) -> FormDescriptor {
    FormDescriptor::new("/save_queue")
        .with_field(Field::text(field, value))
        .with_control(button())
}

/// Successful progress snapshot
pub fn make_snapshot(status: JobStatus, processed: u64, total: u64) -> ProgressSnapshot {
    ProgressSnapshot {
        ok: true,
        status,
        processed,
        total,
        ..ProgressSnapshot::default()
    }
}
