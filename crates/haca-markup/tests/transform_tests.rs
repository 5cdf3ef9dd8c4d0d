use haca_markup::{is_garble, ContentTransformer, Fragment, TransformedBody};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

const DOSSIER: &str = "SUBJECT: Dr. Elena Vance\n\
STATUS: [DATA REDACTED]\n\
Last seen near sector B4. Audio log [GARBLED] ends abruptly.\n\
[WARNING exposure to resonance patterns is not advised]\n\
Archive copy [DATA CORRUPTED]";

fn transform(raw: &str, seed: u64) -> TransformedBody {
    let mut rng = StdRng::seed_from_u64(seed);
    ContentTransformer::default().transform(raw, &mut rng)
}

/// Replace garble glyphs so bodies from different seeds compare equal
fn mask_garbles(fragments: &[Fragment]) -> Vec<Fragment> {
    fragments
        .iter()
        .map(|fragment| match fragment {
            Fragment::Garbled { .. } => Fragment::Garbled { glyphs: String::new() },
            Fragment::Warning { children } => Fragment::Warning {
                children: mask_garbles(children),
            },
            other => other.clone(),
        })
        .collect()
}

#[test]
fn dossier_classification() {
    let body = transform(DOSSIER, 1);

    assert_eq!(body.keywords(), vec!["Vance", "B4", "resonance"]);
    assert_eq!(body.line_breaks(), 4);

    let flat = body.flatten();
    assert_eq!(flat.iter().filter(|f| matches!(f, Fragment::Redacted { .. })).count(), 1);
    assert_eq!(flat.iter().filter(|f| matches!(f, Fragment::Corrupted { .. })).count(), 1);

    let garbles: Vec<_> = flat
        .iter()
        .filter_map(|f| match f {
            Fragment::Garbled { glyphs } => Some(glyphs.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(garbles.len(), 1);
    assert!(is_garble(garbles[0]));
}

#[test]
fn warning_sits_between_line_breaks() {
    let body = transform(DOSSIER, 2);
    let fragments = body.fragments();
    let idx = fragments
        .iter()
        .position(|f| matches!(f, Fragment::Warning { .. }))
        .unwrap();

    assert_eq!(fragments[idx - 1], Fragment::LineBreak);
    assert_eq!(fragments[idx + 1], Fragment::LineBreak);
    assert_eq!(
        fragments[idx],
        Fragment::Warning {
            children: vec![
                Fragment::Text("exposure to ".into()),
                Fragment::Keyword { text: "resonance".into() },
                Fragment::Text(" patterns is not advised".into()),
            ],
        }
    );
}

#[test]
fn rendered_text_keeps_markers_and_alert_glyph() {
    let rendered = transform("[DATA REDACTED] / [WARNING stay back]", 3).to_string();
    assert_eq!(rendered, "[DATA REDACTED] / ⚠ stay back");
}

#[test]
fn repeated_garbles_differ_within_one_body() {
    let body = transform("[GARBLED][GARBLED][GARBLED]", 4);
    let glyphs: Vec<_> = body
        .fragments()
        .iter()
        .filter_map(|f| match f {
            Fragment::Garbled { glyphs } => Some(glyphs.clone()),
            _ => None,
        })
        .collect();

    assert_eq!(glyphs.len(), 3);
    assert!(glyphs.iter().all(|g| is_garble(g)));
    assert!(glyphs[0] != glyphs[1] || glyphs[1] != glyphs[2]);
}

#[test]
fn body_serializes_as_tagged_json() {
    let body = transform("MIMIR\n", 5);
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "fragments": [
                { "keyword": { "text": "MIMIR" } },
                "line_break"
            ]
        })
    );
}

proptest! {
    #[test]
    fn prop_deterministic_outside_garbles(
        raw in "[A-Za-z0-9 \\[\\]\n]{0,60}( B4 | \\[GARBLED\\] | \\[DATA REDACTED\\] | \\[WARNING x\\] ){0,3}",
        a in any::<u64>(),
        b in any::<u64>(),
    ) {
        let first = transform(&raw, a);
        let second = transform(&raw, b);
        prop_assert_eq!(mask_garbles(first.fragments()), mask_garbles(second.fragments()));
    }

    #[test]
    fn prop_text_fragments_never_contain_newlines(raw in "[a-z\n\\[\\] ]{0,80}") {
        let body = transform(&raw, 0);
        for fragment in body.flatten() {
            if let Fragment::Text(text) = fragment {
                prop_assert!(!text.contains('\n'));
                prop_assert!(!text.is_empty());
            }
        }
    }

    #[test]
    fn prop_plain_text_round_trips(raw in "[a-z .,]{0,80}") {
        prop_assert_eq!(transform(&raw, 0).to_string(), raw);
    }

    #[test]
    fn prop_every_garble_has_fixed_shape(count in 1usize..6, seed in any::<u64>()) {
        let raw = vec!["[GARBLED]"; count].join(" ");
        let body = transform(&raw, seed);
        let glyphs: Vec<&str> = body
            .flatten()
            .into_iter()
            .filter_map(|fragment| match fragment {
                Fragment::Garbled { glyphs } => Some(glyphs.as_str()),
                _ => None,
            })
            .collect();
        prop_assert_eq!(glyphs.len(), count);
        for run in glyphs {
            prop_assert!(is_garble(run), "bad garble {:?}", run);
        }
    }
}
