//! The schema builder: declaration bag in, validated graph out.
//!
//! The builder never stops at the first problem. Every aggregate, member,
//! and relation is validated independently; an invalid element is dropped
//! from the graph while everything else continues to be processed, and the
//! full error report is returned at the end. Callers receive either a
//! completely valid schema or the complete report, never both.

use std::collections::{HashMap, HashSet};

use canopy_foundation::path::PATH_SEPARATOR;
use canopy_foundation::{SchemaError, SchemaErrorKind, SchemaReport, TreePath, TypeRegistry};
use canopy_graph::{
    AggregateNode, EdgeAttrs, EdgeInfo, EdgeKind, GraphNode, MemberNode, Multiplicity, NodeId,
    SchemaGraph, VariationTag,
};

use crate::bag::{DeclarationBag, OptionKey};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A fully validated schema: the application name plus its graph.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompiledSchema {
    application_name: String,
    graph: SchemaGraph,
}

impl CompiledSchema {
    /// The declared application name.
    #[must_use]
    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    /// The validated schema graph.
    #[must_use]
    pub fn graph(&self) -> &SchemaGraph {
        &self.graph
    }

    /// Iterates root aggregates: those without a parent edge.
    pub fn roots(&self) -> impl Iterator<Item = &AggregateNode> {
        self.graph.aggregates().filter(|aggregate| {
            !self
                .graph
                .edges_into(&aggregate.id)
                .any(|edge| edge.kind == EdgeKind::ParentChild)
        })
    }
}

/// Compiles a [`DeclarationBag`] into a [`CompiledSchema`].
pub struct SchemaBuilder;

impl SchemaBuilder {
    /// Runs the whole build: enumerate, validate, link, construct.
    ///
    /// # Errors
    ///
    /// Returns the accumulated report when any declaration is invalid.
    /// No partial graph accompanies an error report.
    pub fn build(
        bag: &DeclarationBag,
        registry: &TypeRegistry,
    ) -> Result<CompiledSchema, SchemaReport> {
        let mut report = SchemaReport::new();

        let application_name = bag.application_name().map(str::trim).unwrap_or_default();
        if application_name.is_empty() {
            report.push(SchemaError::new(SchemaErrorKind::MissingApplicationName));
        }

        let aggregate_paths = bag.aggregate_paths();
        let mut aggregate_ids: HashSet<NodeId> = HashSet::new();
        let mut nodes: Vec<GraphNode> = Vec::new();
        let mut edges: Vec<EdgeInfo> = Vec::new();

        // Aggregates and their value members.
        for path in &aggregate_paths {
            let id = NodeId::from(path);
            if !aggregate_ids.insert(id.clone()) {
                report.push(SchemaError::at(
                    SchemaErrorKind::DuplicateAggregate(id.as_str().to_owned()),
                    path.clone(),
                ));
                continue;
            }
            nodes.push(GraphNode::Aggregate(AggregateNode {
                id: id.clone(),
                display_name: path.base_name().to_owned(),
                physical_name: path.base_name().to_owned(),
            }));

            for member_path in bag.member_paths_of(path) {
                // Reference members become edges, not member nodes.
                if bag.get_text(&member_path, OptionKey::RefTo).is_some() {
                    continue;
                }
                let Some(type_name) = bag.get_text(&member_path, OptionKey::MemberType) else {
                    report.push(SchemaError::at(
                        SchemaErrorKind::MissingMemberType(member_path.base_name().to_owned()),
                        member_path.clone(),
                    ));
                    continue;
                };
                let Some(value_type) = registry.try_resolve(type_name) else {
                    report.push(SchemaError::at(
                        SchemaErrorKind::UnknownMemberType {
                            member: member_path.base_name().to_owned(),
                            type_name: type_name.to_owned(),
                        },
                        member_path.clone(),
                    ));
                    continue;
                };

                let member_id = NodeId::from(&member_path);
                let is_key = bag.get_flag(&member_path, OptionKey::IsKey);
                let is_display_name = bag.get_flag(&member_path, OptionKey::IsDisplayName);
                let is_required = bag.get_flag(&member_path, OptionKey::IsRequired);
                nodes.push(GraphNode::Member(MemberNode {
                    id: member_id.clone(),
                    name: member_path.base_name().to_owned(),
                    value_type: value_type.clone(),
                    is_key,
                    is_display_name,
                    is_required,
                }));
                edges.push(EdgeInfo {
                    source: id.clone(),
                    target: member_id,
                    relation_name: member_path.base_name().to_owned(),
                    kind: EdgeKind::HasMember,
                    attrs: EdgeAttrs {
                        multiplicity: Multiplicity::Single,
                        variation: None,
                        is_key,
                        is_display_name,
                        is_required,
                        order: bag.order_of(&member_path),
                    },
                });
            }
        }

        // Members declared under a path that is not an aggregate would
        // otherwise vanish without a trace.
        for member_path in bag.member_paths() {
            let owner = member_path.parent();
            let resolved = owner
                .as_ref()
                .is_some_and(|parent| aggregate_ids.contains(&NodeId::from(parent)));
            if !resolved {
                let owner_name = owner.map_or_else(
                    || PATH_SEPARATOR.to_string(),
                    |parent| NodeId::from(&parent).as_str().to_owned(),
                );
                report.push(SchemaError::at(
                    SchemaErrorKind::UnresolvedEndpoint(owner_name),
                    member_path,
                ));
            }
        }

        // Parent-child edges from nesting.
        for path in &aggregate_paths {
            let Some(parent_path) = path.parent() else {
                continue;
            };
            let parent_id = NodeId::from(&parent_path);
            if !aggregate_ids.contains(&parent_id) {
                report.push(SchemaError::at(
                    SchemaErrorKind::UnresolvedEndpoint(parent_id.as_str().to_owned()),
                    path.clone(),
                ));
                continue;
            }

            let variation = match bag.get_text(path, OptionKey::VariationGroup) {
                Some(group) => match bag.get_text(path, OptionKey::VariationSwitch) {
                    Some(switch) => Some(VariationTag {
                        group: group.to_owned(),
                        switch: switch.to_owned(),
                    }),
                    None => {
                        report.push(SchemaError::at(
                            SchemaErrorKind::MissingDiscriminator(group.to_owned()),
                            path.clone(),
                        ));
                        None
                    }
                },
                None => None,
            };

            edges.push(EdgeInfo {
                source: parent_id,
                target: NodeId::from(path),
                relation_name: path.base_name().to_owned(),
                kind: EdgeKind::ParentChild,
                attrs: EdgeAttrs {
                    multiplicity: if bag.get_flag(path, OptionKey::IsArray) {
                        Multiplicity::Many
                    } else {
                        Multiplicity::Single
                    },
                    variation,
                    is_key: bag.get_flag(path, OptionKey::IsKey),
                    is_display_name: bag.get_flag(path, OptionKey::IsDisplayName),
                    is_required: bag.get_flag(path, OptionKey::IsRequired),
                    order: bag.order_of(path),
                },
            });
        }

        // Reference edges from ref-to members.
        for path in &aggregate_paths {
            let owner_id = NodeId::from(path);
            if !aggregate_ids.contains(&owner_id) {
                // Owner itself failed to build; its members were reported above.
                continue;
            }
            for member_path in bag.member_paths_of(path) {
                let Some(target_text) = bag.get_text(&member_path, OptionKey::RefTo) else {
                    continue;
                };
                let Some(target_path) = TreePath::parse(target_text) else {
                    report.push(SchemaError::at(
                        SchemaErrorKind::InvalidPath(target_text.to_owned()),
                        member_path.clone(),
                    ));
                    continue;
                };
                let target_id = NodeId::from(&target_path);
                if !aggregate_ids.contains(&target_id) {
                    report.push(SchemaError::at(
                        SchemaErrorKind::UnresolvedEndpoint(target_id.as_str().to_owned()),
                        member_path.clone(),
                    ));
                    continue;
                }
                edges.push(EdgeInfo {
                    source: owner_id.clone(),
                    target: target_id,
                    relation_name: member_path.base_name().to_owned(),
                    kind: EdgeKind::Reference,
                    attrs: EdgeAttrs {
                        multiplicity: Multiplicity::Single,
                        variation: None,
                        is_key: bag.get_flag(&member_path, OptionKey::IsKey),
                        is_display_name: bag.get_flag(&member_path, OptionKey::IsDisplayName),
                        is_required: bag.get_flag(&member_path, OptionKey::IsRequired),
                        order: bag.order_of(&member_path),
                    },
                });
            }
        }

        // Discriminator uniqueness within each (owner, group) pair.
        let mut seen: HashMap<(NodeId, String), HashSet<String>> = HashMap::new();
        for edge in &edges {
            if edge.kind != EdgeKind::ParentChild {
                continue;
            }
            let Some(tag) = &edge.attrs.variation else {
                continue;
            };
            let slot = seen
                .entry((edge.source.clone(), tag.group.clone()))
                .or_default();
            if !slot.insert(tag.switch.clone()) {
                let variant_path = TreePath::parse(edge.target.as_str());
                let error = SchemaErrorKind::DuplicateDiscriminator {
                    group: tag.group.clone(),
                    switch: tag.switch.clone(),
                };
                report.push(match variant_path {
                    Some(path) => SchemaError::at(error, path),
                    None => SchemaError::new(error),
                });
            }
        }

        let graph = match SchemaGraph::try_new(nodes, edges) {
            Ok(graph) => graph,
            Err(graph_report) => {
                report.merge(graph_report);
                return Err(report);
            }
        };

        if report.is_empty() {
            Ok(CompiledSchema {
                application_name: application_name.to_owned(),
                graph,
            })
        } else {
            Err(report)
        }
    }
}
