//! Offline retrieval-quality metrics: Recall@k and MRR@k.
//!
//! Runs a set of labeled queries against one indexed document and reports
//! the mean metrics per cutoff. Relevance labels are passage sequence
//! indexes, so a fixture only needs to know which passages answer which
//! query.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::Result;

use super::Retriever;

/// A query with the passage sequence indexes that answer it
#[derive(Debug, Clone)]
pub struct LabeledQuery {
    /// The query text
    pub query: String,
    /// Sequence indexes of the relevant passages
    pub relevant: Vec<u32>,
}

/// Mean metrics over a query set at one cutoff
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsAtK {
    /// The cutoff
    pub k: usize,
    /// Mean Recall@k
    pub recall: f64,
    /// Mean MRR@k
    pub mrr: f64,
}

/// Fraction of the relevant set found in the top k results.
/// An empty relevant set scores zero.
pub fn recall_at_k(relevant: &HashSet<u32>, retrieved: &[u32], k: usize) -> f64 {
    if relevant.is_empty() {
        return 0.0;
    }
    let hits = retrieved
        .iter()
        .take(k)
        .filter(|seq| relevant.contains(seq))
        .count();
    hits as f64 / relevant.len() as f64
}

/// Reciprocal rank of the first relevant result within the top k,
/// zero when none is relevant
pub fn mrr_at_k(relevant: &HashSet<u32>, retrieved: &[u32], k: usize) -> f64 {
    retrieved
        .iter()
        .take(k)
        .position(|seq| relevant.contains(seq))
        .map_or(0.0, |idx| 1.0 / (idx + 1) as f64)
}

/// Evaluate a retriever over labeled queries for one document.
///
/// Each query runs once at the largest cutoff; per-k metrics are computed
/// from that single ranking and averaged over the query set. Cutoffs above
/// the retriever's configured maximum are clamped by retrieval itself.
pub fn evaluate(
    retriever: &Retriever,
    id: &Uuid,
    queries: &[LabeledQuery],
    ks: &[usize],
) -> Result<Vec<MetricsAtK>> {
    let max_k = ks.iter().copied().max().unwrap_or(0);

    let mut rankings = Vec::with_capacity(queries.len());
    for labeled in queries {
        let retrieved: Vec<u32> = retriever
            .retrieve(id, &labeled.query, max_k)?
            .into_iter()
            .map(|s| s.passage.seq)
            .collect();
        let relevant: HashSet<u32> = labeled.relevant.iter().copied().collect();
        rankings.push((relevant, retrieved));
    }

    let mut report = Vec::with_capacity(ks.len());
    for &k in ks {
        let (mut recall_sum, mut mrr_sum) = (0.0, 0.0);
        for (relevant, retrieved) in &rankings {
            recall_sum += recall_at_k(relevant, retrieved, k);
            mrr_sum += mrr_at_k(relevant, retrieved, k);
        }
        let n = rankings.len().max(1) as f64;
        report.push(MetricsAtK {
            k,
            recall: recall_sum / n,
            mrr: mrr_sum / n,
        });
    }

    Ok(report)
}
