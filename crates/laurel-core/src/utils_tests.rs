use crate::utils::{edit_distance, similar_names};

#[test]
fn distance_basics() {
    assert_eq!(edit_distance("", ""), 0);
    assert_eq!(edit_distance("abc", ""), 3);
    assert_eq!(edit_distance("", "abc"), 3);
    assert_eq!(edit_distance("count", "count"), 0);
    assert_eq!(edit_distance("count", "cout"), 1);
    assert_eq!(edit_distance("count", "coutn"), 2);
    assert_eq!(edit_distance("kitten", "sitting"), 3);
}

#[test]
fn suggestions_are_ordered_and_capped() {
    let candidates = ["counter", "count", "cont", "mount", "total"];
    let found = similar_names("coun", candidates, 2, 3);
    assert_eq!(found, vec!["count", "cont", "mount"]);
}

#[test]
fn exact_name_is_never_suggested() {
    let found = similar_names("count", ["count", "cout"], 2, 3);
    assert_eq!(found, vec!["cout"]);
}

#[test]
fn distant_names_are_filtered() {
    let found = similar_names("x", ["completely", "unrelated"], 2, 3);
    assert!(found.is_empty());
}
