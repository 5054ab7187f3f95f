//! Fixture-based tests for notation parsing and tablature rendering.
//!
//! Each .mb file in tests/fixtures/ is parsed and rendered to SVG.

use mbira::{count_measures, parse, to_svg, LayoutParams};
use std::fs;
use std::path::Path;

fn render_fixture(name: &str) -> (usize, String) {
    let fixture_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.mb", name));

    let notation = fs::read_to_string(&fixture_path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e));

    let symbols = parse(&notation)
        .unwrap_or_else(|e| panic!("Fixture {} failed to parse: {}", name, e));
    assert!(!symbols.is_empty(), "Fixture {} parsed to no symbols", name);

    let params = LayoutParams::default();
    let measures = count_measures(&symbols, &params) as usize;

    let svg = to_svg(&symbols, &params)
        .unwrap_or_else(|e| panic!("Fixture {} failed to lay out: {}", name, e));

    // Every render is a complete SVG document.
    assert!(
        svg.starts_with("<?xml version=\"1.0\"?>\n<svg"),
        "Fixture {} produced an invalid SVG header",
        name
    );
    assert!(
        svg.ends_with("</svg>\n"),
        "Fixture {} produced an unterminated SVG document",
        name
    );

    // Every measure gets a printed number.
    for measure in 1..=measures {
        assert!(
            svg.contains(&format!(">{}</text>", measure)),
            "Fixture {} is missing the label for measure {}",
            name,
            measure
        );
    }

    println!("Fixture {}: {} measures, {} bytes SVG", name, measures, svg.len());
    (measures, svg)
}

#[test]
fn test_fixture_simple_melody() {
    let (measures, _) = render_fixture("simple_melody");
    assert_eq!(measures, 4);
}

#[test]
fn test_fixture_chords() {
    let (measures, _) = render_fixture("chords");
    assert_eq!(measures, 4);
}

#[test]
fn test_fixture_rests() {
    let (measures, _) = render_fixture("rests");
    assert_eq!(measures, 3);
}

#[test]
fn test_fixture_dotted() {
    let (measures, _) = render_fixture("dotted");
    assert_eq!(measures, 2);
}

#[test]
fn test_fixture_octaves() {
    let (measures, _) = render_fixture("octaves");
    assert_eq!(measures, 4);
}

#[test]
fn test_fixture_pagination() {
    let (measures, svg) = render_fixture("pagination");
    assert_eq!(measures, 16);

    // Sixteen measures at seven per tablature means three translated groups.
    let tabs = svg.matches("<g transform=\"translate(").count();
    assert_eq!(tabs, 3);
}

#[test]
fn test_fixtures_are_deterministic() {
    let (_, first) = render_fixture("simple_melody");
    let (_, second) = render_fixture("simple_melody");
    assert_eq!(first, second);
}
