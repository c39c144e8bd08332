#![allow(missing_docs)]

use proptest::prelude::*;
use wordembed::{
    LookupMode,
    WEResult,
    WordEmbedding,
    WordLookup,
    WordembedError,
    io::BinaryEncoder,
};

/// Encode an embedding section by hand.
fn section(
    dimension: u32,
    words: &[&str],
    has_unknown: bool,
    subform: bool,
    weights: &[f32],
) -> Vec<u8> {
    let mut enc = BinaryEncoder::new();
    enc.add_u32(dimension);
    enc.add_u32(words.len() as u32);
    for word in words {
        enc.add_str(word).unwrap();
    }
    enc.add_flag(has_unknown);
    enc.add_flag(subform);
    enc.add_f32s(weights);
    enc.into_bytes()
}

fn load(
    dimension: u32,
    words: &[&str],
    has_unknown: bool,
    subform: bool,
    weights: &[f32],
) -> WEResult<WordEmbedding<u32>> {
    WordEmbedding::from_bytes(&section(dimension, words, has_unknown, subform, weights))
}

#[test]
fn test_dictionary_words_resolve_verbatim() {
    let words = ["the", "The", "1", "cat"];
    let weights: Vec<f32> = (0..(words.len() + 1) * 2).map(|v| v as f32).collect();

    for subform in [false, true] {
        let mut embedding = load(2, &words, true, subform, &weights).unwrap();
        for (id, word) in words.iter().enumerate() {
            assert_eq!(
                embedding.lookup(word).unwrap(),
                WordLookup::Known(id as u32)
            );
        }
        assert_eq!(embedding.rows(), words.len() + 1);
    }
}

#[test]
fn test_capitalized_word_falls_back_to_lowercase() {
    let mut embedding = load(1, &["the", "a"], true, false, &[1.0, 2.0, 3.0]).unwrap();

    assert_eq!(embedding.lookup("The").unwrap(), WordLookup::Known(0));
    assert_eq!(embedding.lookup("THE").unwrap(), WordLookup::Known(0));
    assert_eq!(embedding.lookup("An").unwrap(), WordLookup::Unknown(2));
    assert_eq!(embedding.unknown_id(), Some(2));
}

#[test]
fn test_numeric_tokens_fall_back_to_leading_digit() {
    let mut embedding = load(1, &["1", "9"], false, false, &[1.0, 9.0]).unwrap();

    assert_eq!(embedding.lookup("1,000,000").unwrap(), WordLookup::Known(0));
    assert_eq!(embedding.lookup("9:45").unwrap(), WordLookup::Known(1));
    assert_eq!(embedding.lookup("19.95$").unwrap(), WordLookup::Known(0));
    assert_eq!(embedding.lookup("2024").unwrap(), WordLookup::Missing);
    assert_eq!(embedding.lookup("1a").unwrap(), WordLookup::Missing);
}

#[test]
fn test_unseen_word_without_unknown_is_missing() {
    let weights = [0.0f32; 8];
    let mut embedding = load(4, &["alpha", "beta"], false, false, &weights).unwrap();

    assert_eq!(embedding.unknown_id(), None);
    assert_eq!(embedding.lookup("gamma").unwrap(), WordLookup::Missing);
    assert_eq!(embedding.lookup_id("gamma").unwrap(), None);
    assert_eq!(embedding.get_row(2), None);
}

#[test]
fn test_cats_scenario() {
    let mut embedding = load(2, &["cat", "dog"], false, true, &[1.0, 0.0, 0.0, 1.0]).unwrap();
    assert_eq!(embedding.mode(), LookupMode::Subform);

    assert_eq!(embedding.lookup("cats").unwrap(), WordLookup::Composed(2));
    assert_eq!(embedding.subforms(2), Some(&[0][..]));
    assert_eq!(embedding.get_row(2), Some(&[1.0, 0.0][..]));
}

#[test]
fn test_composed_ids_are_stable_across_flushes() {
    let mut embedding = load(
        1,
        &["<c", "ca", "at", "t>"],
        true,
        true,
        &[1.0, 2.0, 3.0, 4.0, 0.0],
    )
    .unwrap();

    let first = embedding.lookup("cat").unwrap();
    let second = embedding.lookup("cat").unwrap();
    assert_eq!(first, WordLookup::Composed(5));
    assert_eq!(first, second);

    embedding.get_row(5).unwrap();
    embedding.flush_updates();

    assert_eq!(embedding.lookup("cat").unwrap(), first);
    assert_eq!(embedding.lookup("act").unwrap(), WordLookup::Composed(6));
    assert_eq!(embedding.rows(), 7);
}

#[test]
fn test_unmatched_word_uses_unknown_constituent() {
    let mut embedding = load(2, &["ab"], true, true, &[1.0, 1.0, 6.0, -2.0]).unwrap();

    assert_eq!(embedding.lookup("zzz").unwrap(), WordLookup::Composed(2));
    assert_eq!(embedding.subforms(2), Some(&[1][..]));
    assert_eq!(embedding.get_row(2), Some(&[6.0, -2.0][..]));
}

#[test]
fn test_flush_moves_updates_into_constituents() {
    let mut embedding = load(
        2,
        &["<a", "ab", "b>"],
        false,
        true,
        &[2.0, 0.0, 0.0, 2.0, 4.0, 4.0],
    )
    .unwrap();

    let id = embedding.lookup_id("ab!").unwrap().unwrap();
    // "<ab!>" contains "<a" and "ab"; "b>" does not occur.
    assert_eq!(embedding.subforms(id), Some(&[0, 1][..]));
    assert_eq!(embedding.get_row(id), Some(&[1.0, 1.0][..]));

    embedding
        .row_mut(id)
        .unwrap()
        .copy_from_slice(&[3.0, -1.0]);
    assert_eq!(embedding.flush_updates(), 1);
    assert!(embedding.active_ids().is_empty());

    // delta = ([3, -1] - [1, 1]) / 2 = [1, -1]
    assert_eq!(embedding.read_row(0), Some(&[3.0, -1.0][..]));
    assert_eq!(embedding.read_row(1), Some(&[1.0, 1.0][..]));
    assert_eq!(embedding.read_row(2), Some(&[4.0, 4.0][..]));

    // Stale until the next materialization.
    assert!(!embedding.store().composition(id).unwrap().is_fresh());
    assert_eq!(embedding.get_row(id), Some(&[2.0, 0.0][..]));
}

#[test]
fn test_flush_accumulates_into_shared_constituent() {
    let mut embedding = load(1, &["ca", "at", "ta"], false, true, &[1.0, 2.0, 4.0]).unwrap();

    let cat = embedding.lookup_id("cat").unwrap().unwrap();
    let tat = embedding.lookup_id("tat").unwrap().unwrap();
    assert_eq!(embedding.subforms(cat), Some(&[0, 1][..]));
    assert_eq!(embedding.subforms(tat), Some(&[1, 2][..]));

    assert_eq!(embedding.get_row(cat), Some(&[1.5][..]));
    assert_eq!(embedding.get_row(tat), Some(&[3.0][..]));
    embedding.row_mut(cat).unwrap()[0] = 3.5;
    embedding.row_mut(tat).unwrap()[0] = 5.0;

    assert_eq!(embedding.flush_updates(), 2);

    // Each row moved by 2.0 over two constituents; "at" receives both halves.
    assert_eq!(embedding.read_row(0), Some(&[2.0][..]));
    assert_eq!(embedding.read_row(1), Some(&[4.0][..]));
    assert_eq!(embedding.read_row(2), Some(&[5.0][..]));

    assert_eq!(embedding.get_row(cat), Some(&[3.0][..]));
    assert_eq!(embedding.get_row(tat), Some(&[4.5][..]));
}

#[test]
fn test_decode_failures() {
    let good = section(2, &["cat", "dog"], true, false, &[0.0; 6]);
    assert!(WordEmbedding::<u32>::from_bytes(&good).is_ok());

    for cut in [0, 3, 7, 10, good.len() - 1] {
        assert!(
            matches!(
                WordEmbedding::<u32>::from_bytes(&good[..cut]),
                Err(WordembedError::UnexpectedEof { .. })
            ),
            "truncated at {cut}"
        );
    }

    let mut bad_utf8 = good.clone();
    bad_utf8[9] = 0xff;
    assert!(matches!(
        WordEmbedding::<u32>::from_bytes(&bad_utf8),
        Err(WordembedError::InvalidUtf8 { offset: 9 })
    ));

    let zero_dim = section(0, &["cat"], false, false, &[]);
    assert!(matches!(
        WordEmbedding::<u32>::from_bytes(&zero_dim),
        Err(WordembedError::Malformed(_))
    ));

    let bad_flag = {
        let mut bytes = section(1, &["a"], false, false, &[1.0]);
        // dimension(4) + size(4) + "a"(2) -> has_unknown flag.
        bytes[10] = 7;
        bytes
    };
    assert!(matches!(
        WordEmbedding::<u32>::from_bytes(&bad_flag),
        Err(WordembedError::Malformed(_))
    ));
}

#[test]
fn test_save_load_path() {
    let mut embedding = load(2, &["cat", "dog"], true, true, &[1.0, 0.0, 0.0, 1.0, 0.5, 0.5]).unwrap();
    let id = embedding.lookup_id("cats").unwrap().unwrap();
    embedding.get_row(id).unwrap();

    tempdir::TempDir::new("embedding_test")
        .and_then(|dir| {
            let path = dir.path().join("forms.emb");

            embedding.save_path(&path).expect("failed to save embedding");

            let mut loaded = WordEmbedding::<u32>::load_path(&path).expect("failed to load embedding");

            assert_eq!(loaded.dimension(), 2);
            assert_eq!(loaded.rows(), 3);
            assert_eq!(loaded.unknown_id(), Some(2));
            assert_eq!(loaded.mode(), LookupMode::Subform);
            assert_eq!(
                loaded.dictionary().words().collect::<Vec<_>>(),
                vec!["cat", "dog"]
            );
            assert_eq!(loaded.store().matrix(), &embedding.store().matrix()[..6]);
            assert_eq!(loaded.lookup("cats").unwrap(), WordLookup::Composed(3));

            Ok(())
        })
        .unwrap();
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_subform_lookup_is_idempotent(word in "[a-e]{0,8}") {
        let mut embedding = load(
            1,
            &["ab", "bc", "cd", "de", "<a", "e>"],
            false,
            true,
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        )
        .unwrap();

        let first = embedding.lookup(&word).unwrap();
        let rows = embedding.rows();
        if let Some(id) = first.id() {
            embedding.get_row(id).unwrap();
        }
        embedding.flush_updates();

        prop_assert_eq!(embedding.lookup(&word).unwrap(), first);
        prop_assert_eq!(embedding.rows(), rows);
    }

    #[test]
    fn prop_composed_row_is_mean_of_constituents(
        word in "[a-d]{1,6}",
        values in proptest::collection::vec(-8i8..8, 8),
    ) {
        let mut weights: Vec<f32> = values.iter().map(|&v| v as f32).collect();
        // The unknown row.
        weights.extend([0.0, 0.0]);
        let mut embedding = load(2, &["ab", "ba", "cd", "<a"], true, true, &weights)
        .unwrap();

        let lookup = embedding.lookup(&word).unwrap();
        prop_assume!(matches!(lookup, WordLookup::Composed(_)));
        let id = lookup.id().unwrap();

        let subforms = embedding.subforms(id).unwrap().to_vec();
        prop_assert!(!subforms.is_empty());
        prop_assert!(subforms.windows(2).all(|w| w[0] < w[1]));

        let mut expected = [0.0f32; 2];
        for &sub in &subforms {
            let row = embedding.read_row(sub).unwrap();
            expected[0] += row[0];
            expected[1] += row[1];
        }
        let normalize = 1.0 / subforms.len() as f32;
        expected[0] *= normalize;
        expected[1] *= normalize;

        prop_assert_eq!(embedding.get_row(id).unwrap(), &expected[..]);
    }
}
