use {
    pretty_assertions::assert_eq,
    query_cost_guard::{
        config::PolicyConfig,
        fs::FilesystemDirectory,
        index::{write_term_dictionary, IndexReader, LeafReader, MemorySegment, TermStatistics},
        search::{BooleanQuery, CostGuardPolicy, CostMode, CostPolicy, Occur, Query, SearchPolicy, Verdict},
        GuardError,
    },
    std::sync::Arc,
    test_log::test,
};

const MAX_MATCHING_DOCS: i64 = 3;

fn recipes() -> Vec<MemorySegment> {
    let mut first = MemorySegment::new("_0");
    first.add_document(&[("ingredients", &["1", "cup", "peanut", "butter", "stir", "until", "smooth"])]);
    first.add_document(&[("ingredients", &["2", "cup", "flour", "knead", "until", "elastic", "low_frequency"])]);
    let mut second = MemorySegment::new("_1");
    second.add_document(&[("ingredients", &["1", "cup", "rice", "simmer", "until", "tender"])]);
    second.add_document(&[("ingredients", &["half", "cup", "sugar", "whisk", "until", "pale", "1", "minut"])]);
    vec![first, second]
}

fn memory_index() -> IndexReader {
    IndexReader::new(recipes().into_iter().map(|segment| Arc::new(segment) as Arc<dyn LeafReader>).collect())
}

fn term(text: &str) -> Query {
    Query::term("ingredients", text)
}

fn boolean(clauses: &[(Occur, Query)]) -> Query {
    clauses
        .iter()
        .cloned()
        .fold(BooleanQuery::builder(), |builder, (occur, query)| builder.add(query, occur))
        .build()
        .into()
}

/// The expansion of `-text` produced by the query parser.
fn negated(text: &str) -> Query {
    boolean(&[(Occur::MustNot, term(text)), (Occur::Must, Query::MatchAll)])
}

fn warn_only() -> CostGuardPolicy {
    CostGuardPolicy::new(MAX_MATCHING_DOCS).unwrap()
}

fn rewrite() -> CostGuardPolicy {
    warn_only().with_mode(CostMode::Rewrite)
}

#[test(tokio::test)]
async fn all_terms_expensive() {
    let reader = memory_index();
    let query = boolean(&[(Occur::Must, term("until")), (Occur::Must, term("cup"))]);

    assert_eq!(warn_only().rewrite_fulltext_query(&reader, query.clone()).await.unwrap(), query);
    assert_eq!(rewrite().rewrite_fulltext_query(&reader, query.clone()).await.unwrap(), Query::MatchAll);

    let Query::Boolean(boolean_query) = &query else {
        unreachable!()
    };
    let policy = CostPolicy::new(MAX_MATCHING_DOCS, CostMode::WarnOnly).unwrap();
    assert_eq!(policy.evaluate(&reader, boolean_query).await.unwrap(), Verdict::WarnOnly);
}

#[test(tokio::test)]
async fn one_expensive_term() {
    let reader = memory_index();
    let query = boolean(&[(Occur::Must, term("until")), (Occur::Must, term("low_frequency"))]);

    assert_eq!(warn_only().rewrite_fulltext_query(&reader, query.clone()).await.unwrap(), query);
    assert_eq!(rewrite().rewrite_fulltext_query(&reader, query.clone()).await.unwrap(), query);
}

#[test(tokio::test)]
async fn mixed_occurs_among_expensive_terms() {
    let reader = memory_index();
    let direct = boolean(&[(Occur::Must, term("until")), (Occur::MustNot, term("cup")), (Occur::Must, term("minut"))]);
    let expanded = boolean(&[(Occur::Must, term("until")), (Occur::Must, negated("cup")), (Occur::Must, term("minut"))]);

    for query in [direct, expanded] {
        assert_eq!(warn_only().rewrite_fulltext_query(&reader, query.clone()).await.unwrap(), query);

        let e = rewrite().rewrite_fulltext_query(&reader, query.clone()).await.unwrap_err();
        match e {
            GuardError::AmbiguousExpensiveQuery(text) => assert_eq!(text, query.to_string()),
            e => panic!("unexpected error: {e}"),
        }
    }
}

#[test(tokio::test)]
async fn excluding_expensive_terms() {
    let reader = memory_index();
    let query = boolean(&[(Occur::MustNot, term("until")), (Occur::MustNot, term("cup"))]);

    assert_eq!(warn_only().rewrite_fulltext_query(&reader, query.clone()).await.unwrap(), query);
    assert_eq!(rewrite().rewrite_fulltext_query(&reader, query.clone()).await.unwrap(), Query::MatchNone);

    let expanded = boolean(&[(Occur::Must, negated("until")), (Occur::Must, negated("cup"))]);
    assert_eq!(rewrite().rewrite_fulltext_query(&reader, expanded).await.unwrap(), Query::MatchNone);
}

#[test(tokio::test)]
async fn clauses_other_than_terms_pass_through() {
    let reader = memory_index();
    let queries = [
        boolean(&[(Occur::Must, term("until")), (Occur::Must, term("cup")), (Occur::Must, Query::MatchAll)]),
        boolean(&[
            (Occur::Must, term("until")),
            (Occur::Must, term("cup")),
            (Occur::Should, Query::Opaque("time:[0 TO 30]".to_string())),
        ]),
        boolean(&[(Occur::Must, term("until"))]),
        boolean(&[(Occur::Must, term("saffron")), (Occur::Must, term("truffle"))]),
        boolean(&[]),
    ];

    for query in queries {
        for policy in [warn_only(), rewrite()] {
            assert_eq!(policy.rewrite_fulltext_query(&reader, query.clone()).await.unwrap(), query);
        }
    }
}

#[test(tokio::test)]
async fn rewriting_is_idempotent_and_deterministic() {
    let reader = memory_index();
    let queries = [
        boolean(&[(Occur::Must, term("until")), (Occur::Must, term("cup"))]),
        boolean(&[(Occur::Must, term("until")), (Occur::Must, term("low_frequency"))]),
        boolean(&[(Occur::Must, term("until")), (Occur::MustNot, term("cup")), (Occur::Must, term("minut"))]),
        term("until"),
        Query::MatchNone,
    ];

    let policy = warn_only();
    for query in queries {
        let once = policy.rewrite_fulltext_query(&reader, query.clone()).await.unwrap();
        let twice = policy.rewrite_fulltext_query(&reader, once.clone()).await.unwrap();
        assert_eq!(once, twice);

        for _ in 0..3 {
            assert_eq!(policy.rewrite_fulltext_query(&reader, query.clone()).await.unwrap(), once);
        }
    }

    let all_expensive = boolean(&[(Occur::Must, term("until")), (Occur::Must, term("cup"))]);
    let once = rewrite().rewrite_fulltext_query(&reader, all_expensive).await.unwrap();
    assert_eq!(rewrite().rewrite_fulltext_query(&reader, once.clone()).await.unwrap(), once);
}

#[test]
fn construction_and_facets() {
    assert!(matches!(CostGuardPolicy::new(0), Err(GuardError::InvalidConfiguration(_))));
    assert!(matches!(CostGuardPolicy::new(-1), Err(GuardError::InvalidConfiguration(_))));
    let policy = CostGuardPolicy::new(1).unwrap();

    assert!(policy.should_compute_facets(49_999));
    assert!(!policy.should_compute_facets(50_000));
}

#[test(tokio::test)]
async fn on_disk_segments() {
    let tmp = tempfile::tempdir().unwrap();
    let directory = FilesystemDirectory::open(tmp.path()).await.unwrap();
    for segment in recipes() {
        write_term_dictionary(&directory, &segment).await.unwrap();
    }

    let reader = IndexReader::open(&directory).await.unwrap();
    assert_eq!(reader.leaves().len(), 2);
    assert_eq!(reader.max_doc(), 4);
    assert_eq!(reader.leaves()[1].doc_base(), 2);

    // Each segment alone is under the threshold; the sum is not.
    let query = boolean(&[(Occur::Must, term("until")), (Occur::Must, term("cup"))]);
    assert_eq!(rewrite().rewrite_fulltext_query(&reader, query.clone()).await.unwrap(), Query::MatchAll);

    let query = boolean(&[(Occur::Must, term("until")), (Occur::MustNot, term("cup")), (Occur::Must, term("minut"))]);
    assert!(matches!(
        rewrite().rewrite_fulltext_query(&reader, query).await,
        Err(GuardError::AmbiguousExpensiveQuery(_))
    ));

    // The open snapshot keeps answering from memory; reopening sees the truncated segment.
    std::fs::write(tmp.path().join("_1.tdict"), b"").unwrap();
    let query = boolean(&[(Occur::Must, term("until")), (Occur::Must, term("low_frequency"))]);
    assert_eq!(warn_only().rewrite_fulltext_query(&reader, query.clone()).await.unwrap(), query);
    assert!(matches!(IndexReader::open(&directory).await, Err(GuardError::IndexReadFailure(_))));
}

#[test(tokio::test)]
async fn statistics_beyond_u64_saturate() {
    let segments: Vec<Arc<dyn LeafReader>> = ["_0", "_1"]
        .into_iter()
        .map(|name| {
            let mut segment = MemorySegment::new(name);
            for text in [&b"a"[..], &b"b"[..]] {
                segment.set_term_statistics("f", text, TermStatistics::new(u64::MAX / 2 + 1, u64::MAX / 2 + 1));
            }
            Arc::new(segment) as Arc<dyn LeafReader>
        })
        .collect();
    let reader = IndexReader::new(segments);
    assert_eq!(reader.max_doc(), u64::MAX);

    let query = boolean(&[(Occur::Must, Query::term("f", "a")), (Occur::Must, Query::term("f", "b"))]);
    assert_eq!(warn_only().rewrite_fulltext_query(&reader, query.clone()).await.unwrap(), query);
    assert_eq!(rewrite().rewrite_fulltext_query(&reader, query).await.unwrap(), Query::MatchAll);
}

#[test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
async fn concurrent_searches_share_snapshot() {
    let config: PolicyConfig =
        serde_json::from_str(r#"{"max_matching_docs": 3, "mode": "rewrite"}"#).unwrap();
    let policy: Arc<dyn SearchPolicy> = Arc::from(config.build().unwrap());
    let reader = Arc::new(memory_index());

    let mut handles = Vec::new();
    for i in 0..16 {
        let policy = policy.clone();
        let reader = reader.clone();
        let query = if i % 2 == 0 {
            boolean(&[(Occur::Must, term("until")), (Occur::Must, term("cup"))])
        } else {
            boolean(&[(Occur::Must, term("until")), (Occur::Must, term("low_frequency"))])
        };
        handles.push(tokio::spawn(async move {
            policy.inspect_fulltext_query(&query)?;
            let rewritten = policy.rewrite_fulltext_query(&reader, query.clone()).await?;
            Ok::<_, GuardError>((query, rewritten))
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let (query, rewritten) = handle.await.unwrap().unwrap();
        if i % 2 == 0 {
            assert_eq!(rewritten, Query::MatchAll);
        } else {
            assert_eq!(rewritten, query);
        }
    }
}
