//! Plain text export over a full document

use crate::common::fixture;
use insta::assert_snapshot;
use proptest::prelude::*;
use quire_babel::formats::text::to_text;
use quire_babel::FormatRegistry;

#[test]
fn test_kitchensink_text() {
    let text = to_text(fixture("kitchensink.md").trim_end());
    assert_snapshot!(text, @r"
Quarterly Notes

Intro with bold and italic text.

Tasks

• Write code
• Read docs
• First
logo

Deep heading
Too deep
");
}

#[test]
fn test_registry_matches_encoder() {
    let source = fixture("kitchensink.md");
    let via_registry = FormatRegistry::with_defaults()
        .render("txt", &source)
        .unwrap()
        .into_bytes();
    assert_eq!(via_registry, to_text(&source).into_bytes());
}

proptest! {
    #[test]
    fn line_count_is_preserved(source in "[a-z#*`\\[\\]()!. \n-]{0,300}") {
        prop_assert_eq!(to_text(&source).split('\n').count(), source.split('\n').count());
    }

    #[test]
    fn plain_words_are_a_fixed_point(source in "[a-z ]{0,80}") {
        let once = to_text(&source);
        prop_assert_eq!(to_text(&once), once.clone());
        prop_assert_eq!(once, source);
    }
}
