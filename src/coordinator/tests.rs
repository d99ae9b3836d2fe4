use std::path::{Path, PathBuf};
use std::time::Duration;

use super::*;
use crate::search::SearchField;
use crate::sort::SortKey;

fn track(name: &str, artist: &str, album: &str, genre: &str) -> Track {
    let mut t = Track::from_path(format!("/music/{name}.mp3"));
    t.title = name.to_string();
    t.display = format!("{artist} - {name}");
    t.artist = Some(artist.to_string());
    t.album = Some(album.to_string());
    t.genre = Some(genre.to_string());
    t.duration = Some(Duration::from_secs(100));
    t
}

fn coordinator_with(tracks: &[Track]) -> PlaylistCoordinator {
    let mut c = PlaylistCoordinator::new();
    for t in tracks {
        assert!(c.add_track(t.clone()).is_some());
    }
    c
}

fn flat_titles(c: &PlaylistCoordinator) -> Vec<&str> {
    c.flat().iter().map(|t| t.title.as_str()).collect()
}

fn artist_groups(c: &PlaylistCoordinator) -> Vec<(String, Vec<String>)> {
    c.grouped_view(Criterion::Artist)
        .map(|v| {
            v.groups()
                .map(|g| {
                    (
                        g.name().to_string(),
                        g.tracks().map(|t| t.title.clone()).collect(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Every path in the de-dup table resolves to a flat position, every view
/// carries every track exactly once, and no grouped view has an empty
/// group.
fn assert_consistent(c: &PlaylistCoordinator) {
    assert_eq!(c.len(), c.flat().len());
    for track in c.flat().iter() {
        assert_eq!(c.track_by_path(&track.path), Some(track));
    }
    for &criterion in &Criterion::ALL {
        let view = c.grouped_view(criterion).unwrap();
        assert_eq!(view.track_count(), c.len());
        assert!(view.groups().all(|g| !g.is_empty()));
        for track in c.flat().iter() {
            assert!(view.locate(track).is_some());
        }
    }
}

#[test]
fn add_track_fans_out_to_every_view() {
    let mut c = PlaylistCoordinator::new();
    let result = c.add_track(track("a", "X", "First", "Rock")).unwrap();

    assert_eq!(result.flat_index, 0);
    assert_eq!(result.grouped.len(), 3);
    for addition in result.grouped.values() {
        assert!(addition.group_created);
        assert_eq!(addition.group_index, 0);
        assert_eq!(addition.track_index, 0);
    }
    assert_consistent(&c);
}

#[test]
fn duplicate_add_is_a_none_and_changes_nothing() {
    let mut c = PlaylistCoordinator::new();
    assert!(c.add_track(track("a", "X", "First", "Rock")).is_some());

    // Same path, different metadata: still a duplicate.
    assert!(c.add_track(track("a", "Other", "Other", "Other")).is_none());
    assert_eq!(c.len(), 1);
    assert_eq!(c.grouped_view(Criterion::Artist).unwrap().len(), 1);
    assert_consistent(&c);
}

#[test]
fn spec_scenario_partial_then_full_group_removal() {
    // A(artist=X), B(artist=X), C(artist=Y).
    let mut c = coordinator_with(&[
        track("A", "X", "Al", "G"),
        track("B", "X", "Al", "G"),
        track("C", "Y", "Al", "G"),
    ]);
    assert_eq!(flat_titles(&c), vec!["A", "B", "C"]);
    assert_eq!(
        artist_groups(&c),
        vec![
            ("X".to_string(), vec!["A".to_string(), "B".to_string()]),
            ("Y".to_string(), vec!["C".to_string()]),
        ]
    );

    // Remove B: X survives with just A.
    let result = c.remove_tracks(&[1]).unwrap();
    assert_eq!(result.flat_positions, vec![1]);
    assert_eq!(flat_titles(&c), vec!["A", "C"]);
    assert_eq!(
        artist_groups(&c),
        vec![
            ("X".to_string(), vec!["A".to_string()]),
            ("Y".to_string(), vec!["C".to_string()]),
        ]
    );
    assert_consistent(&c);

    // Remove A: X is now empty and goes away entirely.
    let result = c.remove_tracks(&[0]).unwrap();
    assert!(matches!(
        result.grouped[&Criterion::Artist][0],
        RemovalEvent::GroupRemoved { .. }
    ));
    assert_eq!(flat_titles(&c), vec!["C"]);
    assert_eq!(
        artist_groups(&c),
        vec![("Y".to_string(), vec!["C".to_string()])]
    );
    assert_consistent(&c);
}

#[test]
fn remove_tracks_resolves_indices_before_mutating() {
    let mut c = coordinator_with(&[
        track("a", "X", "Al", "G"),
        track("b", "X", "Al", "G"),
        track("c", "Y", "Al", "G"),
    ]);

    // Indices 0 and 2 name a and c of the *current* order, even though
    // removing 0 first would shift 2.
    let result = c.remove_tracks(&[0, 2]).unwrap();
    let removed: Vec<&str> = result.tracks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(removed, vec!["a", "c"]);
    assert_eq!(result.flat_positions, vec![0, 2]);
    assert_eq!(flat_titles(&c), vec!["b"]);
    assert_consistent(&c);
}

#[test]
fn remove_tracks_with_bad_index_mutates_nothing() {
    let mut c = coordinator_with(&[track("a", "X", "Al", "G")]);
    let err = c.remove_tracks(&[0, 7]).unwrap_err();
    assert_eq!(err, EngineError::InvalidIndex { index: 7, len: 1 });
    assert_eq!(c.len(), 1);
    assert_consistent(&c);
}

#[test]
fn removal_purges_dedup_table_and_gap_maps() {
    let mut c = coordinator_with(&[track("a", "X", "Al", "G"), track("b", "X", "Al", "G")]);
    let path = PathBuf::from("/music/a.mp3");
    assert!(c.set_gap_before(&path, Gap::new(Duration::from_secs(1))));
    assert!(c.set_gap_after(&path, Gap::new(Duration::from_secs(2))));

    c.remove_tracks(&[0]).unwrap();
    assert!(!c.contains_path(&path));
    assert_eq!(c.gap_before(&path), None);
    assert_eq!(c.gap_after(&path), None);

    // The path can come right back in as a fresh track.
    assert!(c.add_track(track("a", "X", "Al", "G")).is_some());
    assert_consistent(&c);
}

#[test]
fn gaps_attach_only_to_known_tracks() {
    let mut c = coordinator_with(&[track("a", "X", "Al", "G")]);
    assert!(!c.set_gap_before(Path::new("/nope.mp3"), Gap::new(Duration::from_secs(1))));
    assert_eq!(c.gap_before(Path::new("/nope.mp3")), None);
}

#[test]
fn group_removal_is_tracks_only_in_other_views() {
    // Artist X spans two albums; removing group X from the artist view
    // must remove its tracks from the album view without any album group
    // being addressed explicitly.
    let mut c = coordinator_with(&[
        track("a", "X", "One", "G"),
        track("b", "X", "Two", "G"),
        track("c", "Y", "Two", "G"),
    ]);

    let result = c.remove_tracks_and_groups(&[], &["X".to_string()], Criterion::Artist);
    assert_eq!(result.tracks.len(), 2);
    assert_eq!(result.flat_positions, vec![0, 1]);

    let artist_events = &result.grouped[&Criterion::Artist];
    assert!(matches!(
        artist_events[0],
        RemovalEvent::GroupRemoved { .. }
    ));

    let album_events = &result.grouped[&Criterion::Album];
    // Album "One" dissolves (lost its only track), album "Two" survives
    // with c, so it reports a track removal.
    assert!(album_events.iter().any(|e| matches!(
        e,
        RemovalEvent::GroupRemoved { name, .. } if name == "One"
    )));
    assert!(album_events.iter().any(|e| matches!(
        e,
        RemovalEvent::TracksRemoved { group_name, .. } if group_name == "Two"
    )));

    assert_eq!(flat_titles(&c), vec!["c"]);
    assert_consistent(&c);
}

#[test]
fn mixed_selection_unions_groups_and_tracks() {
    let mut c = coordinator_with(&[
        track("a", "X", "Al", "G"),
        track("b", "Y", "Al", "G"),
        track("c", "Y", "Al", "G"),
    ]);
    let a = c.track_by_path(Path::new("/music/a.mp3")).unwrap().clone();

    let result = c.remove_tracks_and_groups(&[a], &["Y".to_string()], Criterion::Artist);
    assert_eq!(result.tracks.len(), 3);
    assert!(c.is_empty());
    assert_consistent(&c);
}

#[test]
fn flat_drag_and_drop_matches_spec_example() {
    let mut c = coordinator_with(&[
        track("A", "w", "Al", "G"),
        track("B", "x", "Al", "G"),
        track("C", "y", "Al", "G"),
        track("D", "z", "Al", "G"),
    ]);

    let mapping = c.drop_flat_tracks(&[0], 2).unwrap();
    assert_eq!(flat_titles(&c), vec!["B", "C", "A", "D"]);
    assert_eq!(mapping.get(&0), Some(&2));
    assert_eq!(mapping.get(&1), Some(&0));
    assert_eq!(mapping.get(&2), Some(&1));
    assert_consistent(&c);
}

#[test]
fn move_up_noop_at_top_is_identity() {
    let mut c = coordinator_with(&[track("a", "X", "Al", "G"), track("b", "X", "Al", "G")]);
    let mapping = c.move_flat_tracks(&[0], MoveDirection::Up).unwrap();
    assert_eq!(mapping.get(&0), Some(&0));
    assert_eq!(flat_titles(&c), vec!["a", "b"]);
}

#[test]
fn sorting_one_view_leaves_the_others_alone() {
    let mut c = coordinator_with(&[
        track("zulu", "B", "Al", "G"),
        track("alpha", "A", "Al", "G"),
    ]);
    let flat_before = flat_titles(&c)
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    let album_before = c
        .grouped_view(Criterion::Album)
        .unwrap()
        .path_order();

    c.sort(
        &SortSpec::ascending(SortKey::GroupName),
        ViewKind::Grouped(Criterion::Artist),
    );
    let artist_names: Vec<String> = c
        .grouped_view(Criterion::Artist)
        .unwrap()
        .groups()
        .map(|g| g.name().to_string())
        .collect();
    assert_eq!(artist_names, vec!["A", "B"]);

    // Flat and album views untouched.
    assert_eq!(flat_titles(&c), flat_before);
    assert_eq!(
        c.grouped_view(Criterion::Album).unwrap().path_order(),
        album_before
    );
    assert_consistent(&c);
}

#[test]
fn flat_sort_is_stable_under_constant_comparator() {
    let mut c = coordinator_with(&[
        track("b", "X", "Same", "G"),
        track("a", "X", "Same", "G"),
        track("c", "X", "Same", "G"),
    ]);
    let before = flat_titles(&c)
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    // Every track has the same album, so this comparator is constant.
    c.sort(&SortSpec::ascending(SortKey::Album), ViewKind::Flat);
    assert_eq!(flat_titles(&c), before);
}

#[test]
fn search_title_field_resolves_against_flat_target() {
    let mut c = coordinator_with(&[
        track("Blackened", "Metallica", "Justice", "Metal"),
        track("Paranoid", "Black Sabbath", "Paranoid", "Metal"),
        track("Changes", "Black Sabbath", "Vol 4", "Metal"),
    ]);

    let hits = c.search(
        &SearchQuery::new("black", vec![SearchField::Title]),
        ViewKind::Flat,
    );
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].track.title, "Blackened");
    assert_eq!(hits[0].location, Location::Flat(0));
}

#[test]
fn search_artist_field_matches_group_names_and_targets_any_view() {
    let mut c = coordinator_with(&[
        track("Blackened", "Metallica", "Justice", "Metal"),
        track("Paranoid", "Black Sabbath", "Paranoid", "Metal"),
        track("Changes", "Black Sabbath", "Vol 4", "Metal"),
    ]);

    // Artist-field query: matches the "Black Sabbath" group, contributing
    // both member tracks, located against the artist view.
    let hits = c.search(
        &SearchQuery::new("sabbath", vec![SearchField::Artist]),
        ViewKind::Grouped(Criterion::Artist),
    );
    assert_eq!(hits.len(), 2);
    assert_eq!(
        hits[0].location,
        Location::Grouped { group: 1, index: 0 }
    );
    assert_eq!(
        hits[1].location,
        Location::Grouped { group: 1, index: 1 }
    );

    // Same matches, flat target: flat indices, still ascending.
    let hits = c.search(
        &SearchQuery::new("sabbath", vec![SearchField::Artist]),
        ViewKind::Flat,
    );
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].location, Location::Flat(1));
    assert_eq!(hits[1].location, Location::Flat(2));
}

#[test]
fn search_unions_fields_without_duplicating_tracks() {
    let mut c = coordinator_with(&[track("Black Dog", "Black Sabbath", "IV", "Rock")]);

    // Matches both by title and by artist group name; one hit only.
    let hits = c.search(&SearchQuery::any_field("black"), ViewKind::Flat);
    assert_eq!(hits.len(), 1);
}

#[test]
fn blank_query_returns_nothing() {
    let c = coordinator_with(&[track("a", "X", "Al", "G")]);
    assert!(c.search(&SearchQuery::any_field("   "), ViewKind::Flat).is_empty());
}

#[test]
fn snapshot_and_re_order_round_trip() {
    let originals = [
        track("a", "X", "One", "G"),
        track("b", "Y", "Two", "G"),
        track("c", "X", "One", "G"),
    ];
    let mut c = coordinator_with(&originals);
    c.set_gap_after(Path::new("/music/b.mp3"), Gap::new(Duration::from_secs(3)));

    // Rearrange the flat view and the artist view, then snapshot.
    c.drop_flat_tracks(&[0], 3).unwrap();
    c.sort(
        &SortSpec::descending(SortKey::GroupName),
        ViewKind::Grouped(Criterion::Artist),
    );
    let snapshot = c.snapshot();

    // Rebuild from scratch: adds in arbitrary order, then re-order.
    let mut rebuilt = coordinator_with(&[
        originals[2].clone(),
        originals[0].clone(),
        originals[1].clone(),
    ]);
    rebuilt.re_order(ViewKind::Flat, &snapshot.flat);
    for &criterion in &Criterion::ALL {
        rebuilt.re_order(ViewKind::Grouped(criterion), &snapshot.views[&criterion]);
    }
    rebuilt.restore_gaps(&snapshot);

    assert_eq!(rebuilt.snapshot(), snapshot);
    assert_eq!(flat_titles(&rebuilt), flat_titles(&c));
    assert_consistent(&rebuilt);
}

#[test]
fn total_duration_tracks_the_flat_view() {
    let mut c = coordinator_with(&[track("a", "X", "Al", "G"), track("b", "X", "Al", "G")]);
    assert_eq!(c.total_duration(), Duration::from_secs(200));
    c.remove_tracks(&[0]).unwrap();
    assert_eq!(c.total_duration(), Duration::from_secs(100));
}

#[test]
fn long_add_remove_sequence_keeps_views_in_bijection() {
    let mut c = PlaylistCoordinator::new();
    for i in 0..12 {
        let artist = ["X", "Y", "Z"][i % 3];
        c.add_track(track(&format!("t{i}"), artist, "Al", "G"));
    }
    assert_consistent(&c);

    c.remove_tracks(&[0, 3, 6, 9]).unwrap();
    assert_consistent(&c);
    assert_eq!(c.len(), 8);

    c.remove_tracks_and_groups(&[], &["Y".to_string()], Criterion::Artist);
    assert_consistent(&c);

    while !c.is_empty() {
        c.remove_tracks(&[c.len() - 1]).unwrap();
        assert_consistent(&c);
    }
    assert!(c.grouped_view(Criterion::Artist).unwrap().is_empty());
}
