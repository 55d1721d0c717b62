//! `LogicalPlan`: the aggregate root.
//!
//! Construction is all-or-nothing: the source registry is built first (fails
//! fast on a duplicate name), then the operator graph (fails on an unresolved
//! or ambiguous reference). A constructed plan is immutable. Acyclicity is
//! checked when the execution order is first requested; the result, success
//! or failure, is cached and identical to recomputing it.

use once_cell::sync::OnceCell;

use crate::config::PlanConfig;
use crate::document::{encode_operator, encode_source, InputFormat, PlanDocument};
use crate::error::{Error, Result};
use crate::graph::{OpNode, OperatorGraph};
use crate::hash::Hash256;
use crate::id::NodeId;
use crate::operator::LogicalOperator;
use crate::properties::PlanProperties;
use crate::registry::VariantRegistry;
use crate::source::{DataSource, DataSourceRegistry};
use crate::topo;

#[derive(Debug)]
pub struct LogicalPlan {
    properties: PlanProperties,
    sources: DataSourceRegistry,
    graph: OperatorGraph,
    order: OnceCell<Result<Vec<NodeId>>>,
}

impl LogicalPlan {
    pub fn new(
        properties: PlanProperties,
        sources: Vec<Box<dyn DataSource>>,
        operators: Vec<Box<dyn LogicalOperator>>,
    ) -> Result<Self> {
        let sources = DataSourceRegistry::build(sources)?;
        let graph = OperatorGraph::build(operators)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sources = sources.len(),
            operators = graph.len(),
            "constructed logical plan"
        );

        Ok(Self {
            properties,
            sources,
            graph,
            order: OnceCell::new(),
        })
    }

    /// Resolve every element of `doc` through `registry`, then construct.
    /// Resolution errors surface before any plan state is built.
    pub fn from_document(doc: PlanDocument, registry: &VariantRegistry) -> Result<Self> {
        let PlanDocument {
            head,
            sources,
            query,
        } = doc;
        let sources = sources
            .into_iter()
            .map(|element| registry.source(element))
            .collect::<Result<Vec<_>>>()?;
        let operators = query
            .into_iter()
            .map(|element| registry.operator(element))
            .collect::<Result<Vec<_>>>()?;
        Self::new(head, sources, operators)
    }

    /// Parse a (lenient) JSON document with default settings.
    pub fn parse(text: &str, registry: &VariantRegistry) -> Result<Self> {
        Self::parse_with(text, InputFormat::Json, registry, &PlanConfig::default())
    }

    pub fn parse_with(
        text: &str,
        format: InputFormat,
        registry: &VariantRegistry,
        config: &PlanConfig,
    ) -> Result<Self> {
        let doc = PlanDocument::parse(text, format, config)?;
        Self::from_document(doc, registry)
    }

    pub fn properties(&self) -> &PlanProperties {
        &self.properties
    }

    /// All sources. Order is stable but carries no meaning.
    pub fn data_sources(&self) -> Vec<&dyn DataSource> {
        self.sources.values().collect()
    }

    pub fn data_source(&self, name: &str) -> Option<&dyn DataSource> {
        self.sources.get(name)
    }

    pub fn source_registry(&self) -> &DataSourceRegistry {
        &self.sources
    }

    pub fn graph(&self) -> &OperatorGraph {
        &self.graph
    }

    /// Node ids in execution order (every node after its inputs).
    pub fn execution_order(&self) -> Result<&[NodeId]> {
        #[cfg(feature = "tracing")]
        if self.order.get().is_some() {
            tracing::trace!("execution order served from cache");
        }
        let cached = self.order.get_or_init(|| {
            let sorted = topo::sort(self.graph.adjacency());
            #[cfg(feature = "tracing")]
            match &sorted {
                Ok(order) => tracing::debug!(nodes = order.len(), "computed execution order"),
                Err(e) => tracing::debug!(error = %e, "operator graph has no execution order"),
            }
            sorted
        });
        match cached {
            Ok(order) => Ok(order.as_slice()),
            Err(e) => Err(e.clone()),
        }
    }

    /// Operators in execution order. Never the input order unless that
    /// order was already topological.
    pub fn operators(&self) -> Result<Vec<&dyn LogicalOperator>> {
        self.execution_order()?
            .iter()
            .map(|id| {
                self.graph.node(*id).map(OpNode::operator).ok_or_else(|| {
                    Error::Invariant(format!("execution order names missing node {id}"))
                })
            })
            .collect()
    }

    /// Fail unless the plan has an execution order.
    pub fn validate(&self) -> Result<()> {
        self.execution_order().map(|_| ())
    }

    /// Canonical document: sources by name, operators in execution order.
    pub fn to_document(&self) -> Result<PlanDocument> {
        let sources = self
            .sources
            .values()
            .map(encode_source)
            .collect::<Result<Vec<_>>>()?;
        let query = self
            .operators()?
            .into_iter()
            .map(encode_operator)
            .collect::<Result<Vec<_>>>()?;
        Ok(PlanDocument {
            head: self.properties.clone(),
            sources,
            query,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        self.to_json_with(&PlanConfig::default())
    }

    pub fn to_json_with(&self, config: &PlanConfig) -> Result<String> {
        self.to_document()?.render(config)
    }

    /// blake3 of the canonical compact document. Plans that serialize the
    /// same have the same fingerprint, whatever order their input was in.
    pub fn fingerprint(&self) -> Result<Hash256> {
        Hash256::of_json(&self.to_document()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, ids, TestOp, TestSource};
    use crate::id::OperatorId;
    use serde_json::json;

    fn plan(ops: Vec<Box<dyn LogicalOperator>>) -> Result<LogicalPlan> {
        LogicalPlan::new(
            PlanProperties::new().with("version", 1),
            vec![TestSource::boxed("s1")],
            ops,
        )
    }

    #[test]
    fn operators_come_back_in_dependency_order() {
        // B (2) depends on A (1); input order is [B, A]
        let p = plan(vec![TestOp::boxed(2, &[1]), TestOp::boxed(1, &[])]).unwrap();
        assert_eq!(ids(&p.operators().unwrap()), vec![1, 2]);
    }

    #[test]
    fn duplicate_source_names_fail_construction() {
        let err = LogicalPlan::new(
            PlanProperties::new(),
            vec![TestSource::boxed("s1"), TestSource::boxed("s1")],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, Error::DuplicateSourceName("s1".into()));
    }

    #[test]
    fn cycle_fails_on_read_not_on_construction() {
        let p = plan(vec![TestOp::boxed(1, &[2]), TestOp::boxed(2, &[1])]).unwrap();
        assert!(matches!(p.operators(), Err(Error::CycleDetected { .. })));
        // cached failure is reported identically
        assert_eq!(p.validate().unwrap_err(), p.operators().unwrap_err());
        assert!(p.to_document().is_err());
    }

    #[test]
    fn repeated_reads_and_fresh_plans_agree() {
        let build = || {
            plan(vec![
                TestOp::boxed(5, &[3, 4]),
                TestOp::boxed(4, &[1]),
                TestOp::boxed(3, &[1]),
                TestOp::boxed(1, &[]),
            ])
            .unwrap()
        };
        let a = build();
        let b = build();
        let first = ids(&a.operators().unwrap());
        assert_eq!(first, ids(&a.operators().unwrap()));
        assert_eq!(first, ids(&b.operators().unwrap()));
        assert_eq!(first, vec![1, 3, 4, 5]);
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn accessors_pass_through() {
        let p = plan(vec![]).unwrap();
        assert_eq!(p.properties().version(), Some(&json!(1)));
        assert_eq!(p.data_sources().len(), 1);
        assert_eq!(p.data_source("s1").map(|s| s.kind()), Some("test"));
        assert!(p.data_source("s2").is_none());
        assert!(p.graph().is_empty());
        assert!(p.operators().unwrap().is_empty());
    }

    #[test]
    fn document_round_trip() {
        let reg = fixtures::registry();
        let text = r#"{
            head: { version: 1 },
            sources: [ { type: "test", name: "b" }, { type: "test", name: "a" } ],
            query: [
                { op: "node", "@id": 2, inputs: [1] },
                { op: "node", "@id": 1 },
            ],
        }"#;
        let p = LogicalPlan::parse(text, &reg).unwrap();
        let doc = p.to_document().unwrap();
        assert_eq!(
            doc.query,
            vec![
                json!({"op": "node", "@id": 1}),
                json!({"op": "node", "@id": 2, "inputs": [1]}),
            ]
        );

        let rendered = p.to_json_pretty().unwrap();
        let again = LogicalPlan::parse(&rendered, &reg).unwrap();
        assert_eq!(again.to_json_pretty().unwrap(), rendered);
        assert_eq!(again.properties(), p.properties());
        assert_eq!(
            again.data_sources().iter().map(|s| s.name()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn largest_operator_id_parses_in_either_mode() {
        let reg = fixtures::registry();
        let text = r#"{"head": {}, "sources": [],
            "query": [{"op": "node", "@id": 18446744073709551615}]}"#;
        let strict = PlanConfig {
            lenient_input: false,
            ..Default::default()
        };
        for config in [PlanConfig::default(), strict] {
            let p = LogicalPlan::parse_with(text, InputFormat::Json, &reg, &config).unwrap();
            let max = OperatorId::new(u64::MAX);
            assert_eq!(p.graph().node_for(max), Some(NodeId::from_index(0)));
        }
    }

    #[test]
    fn fingerprint_hashes_the_compact_canonical_document() {
        let p = plan(vec![TestOp::boxed(2, &[1]), TestOp::boxed(1, &[])]).unwrap();
        let compact = serde_json::to_vec(&p.to_document().unwrap()).unwrap();
        assert_eq!(p.fingerprint().unwrap(), Hash256::of_bytes(&compact));
        // not the pretty rendering
        let pretty = p.to_json_pretty().unwrap();
        assert_ne!(p.fingerprint().unwrap(), Hash256::of_bytes(pretty.as_bytes()));
    }

    #[test]
    fn unresolvable_elements_stop_before_construction() {
        let reg = fixtures::registry();
        let err = LogicalPlan::parse(
            r#"{head: {}, sources: [{type: "test", name: "s1"}, {type: "test", name: "s1"}], query: [{op: "warp"}]}"#,
            &reg,
        )
        .unwrap_err();
        // the unknown operator is reported, not the duplicate source
        assert!(matches!(err, Error::UnknownVariant { .. }));
    }

    #[test]
    fn dangling_reference_fails_construction() {
        let err = plan(vec![TestOp::boxed(1, &[42])]).unwrap_err();
        assert_eq!(
            err,
            Error::DanglingReference {
                node: NodeId::from_index(0),
                target: OperatorId::new(42)
            }
        );
    }

    #[test]
    fn plan_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LogicalPlan>();

        let p = std::sync::Arc::new(
            plan(vec![TestOp::boxed(2, &[1]), TestOp::boxed(1, &[])]).unwrap(),
        );
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let p = std::sync::Arc::clone(&p);
                std::thread::spawn(move || ids(&p.operators().unwrap()))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), vec![1, 2]);
        }
    }
}
