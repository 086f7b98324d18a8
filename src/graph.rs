//! Directed link graph with an iterative PageRank.

use std::collections::BTreeMap;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to read graph: {0}")]
    Io(#[from] io::Error),
    #[error("expected `COUNT POWER` on the first line, got {0:?}")]
    Header(String),
}

/// Pages are kept in name order so ranks come out sorted.
#[derive(Debug, Default)]
pub struct Graph {
    outgoing: BTreeMap<String, Vec<String>>,
    incoming: BTreeMap<String, Vec<String>>,
}

/// Result of [`Graph::read`]: the graph plus the iteration count requested
/// by the input and the lines that could not be parsed.
#[derive(Debug)]
pub struct GraphInput {
    pub graph: Graph,
    pub power: u32,
    pub expected: usize,
    pub rejected: Vec<String>,
    pub missing: usize,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    pub fn len(&self) -> usize {
        self.outgoing.len().max(self.incoming.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds the link `from -> to`. Repeated links are kept and count
    /// towards the out-degree of `from`.
    pub fn insert(&mut self, from: &str, to: &str) {
        self.outgoing
            .entry(from.to_string())
            .or_default()
            .push(to.to_string());
        self.outgoing.entry(to.to_string()).or_default();

        self.incoming
            .entry(to.to_string())
            .or_default()
            .push(from.to_string());
        self.incoming.entry(from.to_string()).or_default();
    }

    pub fn out_degree(&self, page: &str) -> usize {
        self.outgoing.get(page).map_or(0, Vec::len)
    }

    /// Runs `power - 1` rounds of rank propagation starting from a uniform
    /// distribution. A power of 0 or 1 returns the uniform ranks.
    pub fn page_rank(&self, power: u32) -> BTreeMap<String, f64> {
        let initial = if self.is_empty() {
            0.0
        } else {
            1.0 / self.len() as f64
        };
        let mut ranks: BTreeMap<String, f64> = self
            .outgoing
            .keys()
            .map(|page| (page.clone(), initial))
            .collect();

        for round in 1..power {
            let next: BTreeMap<String, f64> = ranks
                .keys()
                .map(|page| {
                    let rank: f64 = self
                        .incoming
                        .get(page)
                        .into_iter()
                        .flatten()
                        .map(|source| self.share(source, &ranks))
                        .sum();
                    (page.clone(), rank)
                })
                .collect();
            ranks = next;
            debug!(round, "propagated ranks");
        }
        ranks
    }

    fn share(&self, source: &str, ranks: &BTreeMap<String, f64>) -> f64 {
        match (self.out_degree(source), ranks.get(source)) {
            (0, _) | (_, None) => 0.0,
            (degree, Some(rank)) => rank / degree as f64,
        }
    }

    /// Reads `COUNT POWER` followed by `COUNT` lines of `FROM TO`.
    pub fn read<R: BufRead>(mut input: R) -> Result<GraphInput, GraphError> {
        let mut header = String::new();
        input.read_line(&mut header)?;
        let mut fields = header.split_whitespace().map(str::parse::<u32>);
        let (count, power) = match (fields.next(), fields.next()) {
            (Some(Ok(count)), Some(Ok(power))) => (count as usize, power),
            _ => return Err(GraphError::Header(header.trim().to_string())),
        };

        let mut graph = Graph::new();
        let mut rejected = Vec::new();
        let mut lines = input.lines();
        for read in 0..count {
            let Some(line) = lines.next() else {
                warn!(expected = count, read, "graph input ended early");
                return Ok(GraphInput {
                    graph,
                    power,
                    expected: count,
                    rejected,
                    missing: count - read,
                });
            };
            let line = line?;
            let mut pages = line.split_whitespace();
            match (pages.next(), pages.next(), pages.next()) {
                (Some(from), Some(to), None) => graph.insert(from, to),
                _ => rejected.push(line),
            }
        }
        Ok(GraphInput {
            graph,
            power,
            expected: count,
            rejected,
            missing: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    fn sample() -> Graph {
        let mut graph = Graph::new();
        for (from, to) in [
            ("google.com", "gmail.com"),
            ("google.com", "maps.com"),
            ("facebook.com", "ufl.edu"),
            ("ufl.edu", "google.com"),
            ("ufl.edu", "gmail.com"),
            ("maps.com", "facebook.com"),
            ("gmail.com", "maps.com"),
        ] {
            graph.insert(from, to);
        }
        graph
    }

    #[test]
    fn empty_graph_has_no_ranks() {
        assert!(Graph::new().page_rank(3).is_empty());
    }

    #[test]
    fn power_one_is_uniform() {
        let ranks = sample().page_rank(1);
        assert_eq!(ranks.len(), 5);
        for rank in ranks.values() {
            assert_close(*rank, 0.2);
        }
    }

    #[test]
    fn two_rounds_match_hand_computation() {
        let ranks = sample().page_rank(2);
        let names: Vec<&str> = ranks.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["facebook.com", "gmail.com", "google.com", "maps.com", "ufl.edu"]
        );
        assert_close(ranks["facebook.com"], 0.2);
        assert_close(ranks["gmail.com"], 0.2);
        assert_close(ranks["google.com"], 0.1);
        assert_close(ranks["maps.com"], 0.3);
        assert_close(ranks["ufl.edu"], 0.2);
    }

    #[test]
    fn duplicate_links_count_towards_out_degree() {
        let mut graph = Graph::new();
        graph.insert("a", "b");
        graph.insert("a", "b");
        graph.insert("a", "c");
        assert_eq!(graph.out_degree("a"), 3);
        let ranks = graph.page_rank(2);
        assert_close(ranks["b"], 2.0 / 9.0);
        assert_close(ranks["c"], 1.0 / 9.0);
        assert_close(ranks["a"], 0.0);
    }

    #[test]
    fn read_collects_links_and_rejects_malformed_lines() {
        let input = "3 2\na b\nb\nb a\n";
        let parsed = Graph::read(input.as_bytes()).unwrap();
        assert_eq!(parsed.power, 2);
        assert_eq!(parsed.rejected, vec!["b".to_string()]);
        assert_eq!(parsed.missing, 0);
        assert_eq!(parsed.graph.len(), 2);
    }

    #[test]
    fn read_reports_missing_lines() {
        let parsed = Graph::read("4 1\na b\n".as_bytes()).unwrap();
        assert_eq!(parsed.expected, 4);
        assert_eq!(parsed.missing, 3);
        assert!(matches!(
            Graph::read("x".as_bytes()),
            Err(GraphError::Header(_))
        ));
    }
}
