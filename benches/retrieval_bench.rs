use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::sync::Arc;

use arogya::config::{DiseaseConfig, RetrievalConfig};
use arogya::models::{DiseaseRecord, KnowledgeEntry, Language};
use arogya::services::{DiseaseMatcher, LexicalRetriever, RetrievalService};
use arogya::storage::KnowledgeStore;

const TOPICS: &[&str] = &[
    "fever", "cough", "diarrhoea", "malaria", "dengue", "diabetes", "pressure", "anemia",
    "pregnancy", "vaccination", "asthma", "sleep",
];

/// ~1.2K synthetic entries spread over a small vocabulary
fn build_store() -> Arc<KnowledgeStore> {
    let entries = (0..1_200)
        .map(|i| {
            let topic = TOPICS[i % TOPICS.len()];
            let other = TOPICS[(i * 7 + 3) % TOPICS.len()];
            KnowledgeEntry::new(
                format!("kb-{i}"),
                format!("{topic} care note {i}"),
                format!(
                    "Guidance about {topic} and {other}. Drink fluids, rest and visit the health centre if {topic} continues."
                ),
                "Benchmark corpus",
            )
        })
        .collect();
    Arc::new(KnowledgeStore::from_entries(entries))
}

fn bench_retrieve(c: &mut Criterion) {
    let retriever = LexicalRetriever::new(
        build_store(),
        &RetrievalConfig {
            top_k: 3,
            min_score: 0.1,
        },
    );

    c.bench_function("retrieve_top3_1200_entries", |b| {
        b.iter(|| {
            retriever
                .retrieve(black_box("fever with cough for three days"), Language::En, 3)
                .map(|results| results.len())
        });
    });
}

fn bench_disease_search(c: &mut Criterion) {
    let records = TOPICS
        .iter()
        .enumerate()
        .map(|(i, topic)| {
            DiseaseRecord::new(format!("dis-{i}"), format!("{topic} disorder"), "General")
                .with_aliases([format!("{topic} illness")])
        })
        .collect();
    let matcher = DiseaseMatcher::new(
        records,
        &DiseaseConfig {
            min_score: 0.3,
            expansion_weight: 0.35,
            high_quality_score: 0.62,
        },
    );

    c.bench_function("disease_search_token_overlap", |b| {
        b.iter(|| matcher.search(black_box("blood sugar and pressure problems"), 3).len());
    });
}

criterion_group!(benches, bench_retrieve, bench_disease_search);
criterion_main!(benches);
