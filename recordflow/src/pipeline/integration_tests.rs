//! Graph-level behavior tests: fan-out fidelity, completion propagation and
//! a representative enrichment run.

use anyhow::Result;

use crate::collectors::{MetaReferenceSet, RestorationsCollector, ThesaurusCollector};
use crate::pipeline::{RecordSource, SinkNode, StageNode};
use crate::records::{
    lang, Keyword, Painting, Record, Restoration, RestorationSurvey, ThesaurusTerm,
    ALT_TERM_IDENTIFIER,
};
use crate::stages::{
    FilterCategory, FilterRuleMatcher, FilterRuleSpec, MetadataExtender, RestorationExtender,
    SortingInfoExtender, ThesaurusResolver, CATEGORY_ATTRIBUTION, CATEGORY_COLLECTION_REPOSITORY,
};
use crate::testing::{sample_painting, CollectingSink};

fn paintings(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| Record::Painting(Painting::new(lang::DE, format!("P_{i:03}"))))
        .collect()
}

fn inventory_numbers(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            record
                .clone()
                .into_painting("test")
                .map(|painting| painting.inventory_number)
                .unwrap_or_default()
        })
        .collect()
}

#[tokio::test]
async fn every_fanout_sibling_observes_the_full_sequence_in_push_order() -> Result<()> {
    let source = RecordSource::new("paintings", paintings(5));
    let sinks = [
        CollectingSink::node("first"),
        CollectingSink::node("second"),
        CollectingSink::node("third"),
    ];
    for sink in &sinks {
        source.pipe(sink.clone());
    }

    let report = source.run().await?;
    assert_eq!(report.pushed, 5);

    let expected: Vec<String> = (0..5).map(|i| format!("P_{i:03}")).collect();
    for sink in &sinks {
        assert_eq!(inventory_numbers(&sink.sink().records()), expected);
    }
    Ok(())
}

#[tokio::test]
async fn completion_reaches_every_node_exactly_once_after_all_records() -> Result<()> {
    let source = RecordSource::new("paintings", paintings(3));
    let head = StageNode::new(SortingInfoExtender::new());
    let middle = StageNode::new(MetadataExtender::new());
    let leaf = CollectingSink::node("leaf");
    let side = CollectingSink::node("side");

    source.pipe(head.clone());
    head.pipe(middle.clone());
    head.pipe(side.clone());
    middle.pipe(leaf.clone());

    source.run().await?;

    for sink in [&leaf, &side] {
        assert_eq!(sink.sink().len(), 3);
        assert_eq!(sink.sink().done_count(), 1);
    }
    Ok(())
}

#[tokio::test]
async fn stage_chains_deliver_in_wiring_order() -> Result<()> {
    let source = RecordSource::new("paintings", paintings(2));
    let sink = source
        .pipe(StageNode::new(SortingInfoExtender::new()))
        .pipe(CollectingSink::node("collector"));
    source.run().await?;

    let records = sink.sink().records();
    assert_eq!(inventory_numbers(&records), ["P_000", "P_001"]);
    for record in records {
        let painting = record.into_painting("test")?;
        assert_eq!(painting.search_sorting_number, "3000");
    }
    Ok(())
}

#[tokio::test]
async fn a_full_enrichment_graph_produces_extended_records() -> Result<()> {
    // Collector runs first: restorations feed the later painting join.
    let restorations = RestorationsCollector::new();
    {
        let mut restoration = Restoration::new(lang::DE, "P_100");
        restoration.surveys = vec![RestorationSurvey {
            kind: "Bestandsaufnahme".into(),
            text: "Firnis vergilbt".into(),
        }];
        let source = RecordSource::new(
            "restorations",
            vec![Record::Restoration(restoration)],
        );
        source.pipe(SinkNode::new(restorations.clone()));
        source.run().await?;
    }

    // Vocabulary run assembles the term tree.
    let thesaurus = ThesaurusCollector::new();
    {
        let tree = ThesaurusTerm::new("Gattung")
            .with_alt(ALT_TERM_IDENTIFIER, "a")
            .with_sub_term(
                ThesaurusTerm::new("Malerei").with_alt(ALT_TERM_IDENTIFIER, "9001"),
            );
        let source = RecordSource::new("thesaurus", vec![Record::ThesaurusRoot(tree)]);
        source.pipe(SinkNode::new(thesaurus.clone()));
        source.run().await?;
    }

    let filter_roots = [
        FilterCategory::new(CATEGORY_ATTRIBUTION).with_child(
            FilterCategory::new("attribution.cranach_elder").with_filter(FilterRuleSpec {
                name: [(lang::DE.to_string(), "(?i)cranach".to_string())].into(),
                ..FilterRuleSpec::default()
            }),
        ),
        FilterCategory::new(CATEGORY_COLLECTION_REPOSITORY).with_child(
            FilterCategory::new("collection.gotha").with_filter(FilterRuleSpec {
                collection_repository: Some("(?i)gotha".into()),
                ..FilterRuleSpec::default()
            }),
        ),
    ];

    let meta_refs = MetaReferenceSet::new();

    let mut painting = sample_painting("P_100");
    painting.keywords = vec![Keyword::new("Schlagwort", "9001")];
    painting.repository = "Herzogliches Museum Gotha".into();
    painting.titles = vec!["Bildnis eines Mannes".into()];

    let source = RecordSource::new("paintings", vec![Record::Painting(painting)]);
    let metadata = StageNode::new(MetadataExtender::new());
    let restoration_join = StageNode::new(RestorationExtender::new(restorations.clone()));
    let sorting = StageNode::new(SortingInfoExtender::new());
    let resolver = StageNode::new(ThesaurusResolver::new(&thesaurus, meta_refs.clone()));
    let matcher = StageNode::new(FilterRuleMatcher::new(&filter_roots)?);
    let sink = CollectingSink::node("paintings-out");

    source.pipe(metadata.clone());
    metadata.pipe(restoration_join.clone());
    restoration_join.pipe(sorting.clone());
    sorting.pipe(resolver.clone());
    resolver.pipe(matcher.clone());
    matcher.pipe(sink.clone());

    source.run().await?;

    let records = sink.sink().records();
    assert_eq!(records.len(), 1);
    let painting = records[0].clone().into_painting("test")?;

    assert_eq!(painting.metadata.as_ref().map(|m| m.title.as_str()), Some("Bildnis eines Mannes"));
    assert_eq!(painting.restoration_surveys.len(), 1);
    assert_eq!(painting.search_sorting_number, "3000");
    assert_eq!(painting.thesaurus_items.len(), 2);
    assert_eq!(painting.persons[0].id.as_deref(), Some("attribution.cranach_elder"));
    assert_eq!(painting.collection_repository_id.as_deref(), Some("collection.gotha"));

    // The meta references gathered during the run restrict the derived
    // vocabulary export.
    assert!(meta_refs.contains("9001"));
    let restricted = thesaurus.thesaurus().restricted_to(&meta_refs.ids());
    assert_eq!(restricted.root_terms.len(), 1);
    assert_eq!(restricted.root_terms[0].sub_terms[0].term, "Malerei");

    // Collectors release their tables at shutdown.
    restorations.release();
    assert!(restorations.is_empty());
    Ok(())
}

#[tokio::test]
async fn a_wrong_variant_aborts_the_run() {
    let source = RecordSource::new(
        "mixed",
        vec![Record::Painting(Painting::new(lang::DE, "P_001"))],
    );
    // A graphics-only stage wired into a paintings stream.
    let classifier = StageNode::new(
        crate::stages::ConditionClassifier::new().expect("default rules compile"),
    );
    source.pipe(classifier.clone());
    classifier.pipe(CollectingSink::node("out"));

    let err = source.run().await.unwrap_err();
    assert!(matches!(
        err,
        crate::errors::PipelineError::Structural { .. }
    ));
}
