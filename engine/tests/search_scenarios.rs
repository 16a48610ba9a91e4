use engine::{
    find_duplicates, paginate, process_queries, remove_duplicates, DocumentStatus, Error,
    ExecutionMode, SearchConfig, SearchIndex,
};

fn two_documents() -> SearchIndex {
    let mut index = SearchIndex::new("").unwrap();
    index.add_document(0, "a b a", DocumentStatus::Actual, &[1]).unwrap();
    index.add_document(1, "b c", DocumentStatus::Actual, &[2]).unwrap();
    index
}

#[test]
fn single_term_relevance_is_tf_times_idf() {
    let index = two_documents();
    for mode in [ExecutionMode::Sequential, ExecutionMode::Parallel] {
        let found = index
            .find_top_documents_in(mode, "a", |_, status, _| status == DocumentStatus::Actual)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 0);
        let expected = 2.0 / 3.0 * 2f64.ln();
        assert!((found[0].relevance - expected).abs() < 1e-9);
    }
}

#[test]
fn minus_word_hides_matching_document() {
    let index = two_documents();
    assert!(index.find_top_documents("a -b").unwrap().is_empty());
    let (words, status) = index.match_document("a -b", 0).unwrap();
    assert!(words.is_empty());
    assert_eq!(status, DocumentStatus::Actual);
}

#[test]
fn adding_same_id_twice_fails() {
    let mut index = SearchIndex::new("").unwrap();
    index.add_document(5, "first", DocumentStatus::Actual, &[]).unwrap();
    assert_eq!(
        index.add_document(5, "second", DocumentStatus::Actual, &[]),
        Err(Error::InvalidDocumentId(5))
    );
    assert_eq!(index.word_frequencies(5).keys().collect::<Vec<_>>(), vec!["first"]);
}

#[test]
fn identical_word_sets_are_duplicates() {
    let mut index = SearchIndex::new("").unwrap();
    index.add_document(0, "x y", DocumentStatus::Actual, &[]).unwrap();
    index.add_document(1, "x y y y", DocumentStatus::Actual, &[]).unwrap();
    assert_eq!(find_duplicates(&index), vec![1]);
    remove_duplicates(&mut index);
    assert_eq!(index.document_ids().collect::<Vec<_>>(), vec![0]);
    assert!(index.postings("x").unwrap().contains_key(&0));
    assert!(!index.postings("y").unwrap().contains_key(&1));
}

#[test]
fn stop_word_only_query_finds_nothing() {
    let mut index = SearchIndex::new("in the").unwrap();
    index.add_document(0, "cat in the city", DocumentStatus::Actual, &[]).unwrap();
    assert!(index.find_top_documents("in the").unwrap().is_empty());
    assert_eq!(
        index.find_top_documents("the cat").unwrap(),
        index.find_top_documents("cat").unwrap()
    );
    // A stop word behind a minus sign does not exclude anything.
    assert_eq!(index.find_top_documents("cat -in").unwrap().len(), 1);
}

#[test]
fn stop_words_from_collection() {
    let index = SearchIndex::from_stop_words(vec!["in", "", "the", "in"]).unwrap();
    assert!(index.is_stop_word("in"));
    assert!(index.is_stop_word("the"));
    assert!(!index.is_stop_word(""));
}

#[test]
fn invalid_stop_words_fail_construction() {
    assert!(matches!(
        SearchIndex::new("in th\x07e"),
        Err(Error::InvalidConfiguration(_))
    ));
}

#[test]
fn custom_result_limit() {
    let mut index = SearchIndex::new("")
        .unwrap()
        .with_config(SearchConfig { max_results: 2, ..SearchConfig::default() });
    for id in 0..6 {
        index.add_document(id, "word", DocumentStatus::Actual, &[id]).unwrap();
    }
    let found = index.find_top_documents("word").unwrap();
    assert_eq!(found.iter().map(|d| d.id).collect::<Vec<_>>(), vec![5, 4]);
}

#[test]
fn removal_after_queries_updates_idf() {
    let mut index = SearchIndex::new("").unwrap();
    index.add_document(0, "a", DocumentStatus::Actual, &[]).unwrap();
    index.add_document(1, "b", DocumentStatus::Actual, &[]).unwrap();
    index.add_document(2, "a b", DocumentStatus::Actual, &[]).unwrap();
    index.remove_document(2);
    let found = index.find_top_documents("a").unwrap();
    assert_eq!(found.len(), 1);
    assert!((found[0].relevance - 2f64.ln()).abs() < 1e-9);
}

#[test]
fn batch_results_paginate() {
    let mut index = SearchIndex::new("and").unwrap();
    for (id, text) in [(1, "white cat"), (2, "black cat"), (3, "white dog"), (4, "cat and dog")] {
        index.add_document(id, text, DocumentStatus::Actual, &[id]).unwrap();
    }
    let results = process_queries(&index, &["cat", "white", "dog -cat"]).unwrap();
    let flat: Vec<_> = results.into_iter().flatten().collect();
    let pages = paginate(&flat, 2);
    assert_eq!(pages.len(), 3);
    let last = pages.iter().last().unwrap();
    assert_eq!(last.len(), 2);
    assert_eq!(last.items()[1].id, 3);
    assert!(last.to_string().starts_with("{ document_id = "));
}
