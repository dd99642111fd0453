use geo_types::Coord;

use crate::relate::matrix::Dimension;
use crate::relate::node_section::NodeSection;

/// Rewrites the sections of one polygon meeting at a node from touching
/// rings (shell and holes touching at a point) into self-touching form.
///
/// Each output section spans a wedge lying inside the polygon, so the
/// wedges can be merged into a node without hole interiors leaking in.
pub struct PolygonNodeConverter;

impl PolygonNodeConverter {
    /// `sections` must all belong to the same polygon.
    pub fn convert(sections: &[NodeSection]) -> Vec<NodeSection> {
        let mut sorted = sections.to_vec();
        sorted.sort_by(|a, b| a.compare_edge_angle(b));
        let sections = extract_unique(sorted);
        if sections.len() <= 1 {
            return sections;
        }

        let Some(shell_index) = sections.iter().position(NodeSection::is_shell) else {
            return convert_holes(&sections);
        };
        // several shells may meet at the node
        let mut converted = Vec::with_capacity(sections.len());
        let mut next_shell = shell_index;
        loop {
            next_shell = convert_shell_and_holes(&sections, next_shell, &mut converted);
            if next_shell == shell_index {
                break;
            }
        }
        converted
    }
}

fn convert_shell_and_holes(sections: &[NodeSection], shell_index: usize, out: &mut Vec<NodeSection>) -> usize {
    let shell = &sections[shell_index];
    let mut in_vertex = shell.vertex(0);
    let mut i = next(sections, shell_index);
    while !sections[i].is_shell() {
        let hole = &sections[i];
        out.push(create_section(shell, in_vertex, hole.vertex(1)));
        in_vertex = hole.vertex(0);
        i = next(sections, i);
    }
    out.push(create_section(shell, in_vertex, shell.vertex(1)));
    i
}

fn convert_holes(sections: &[NodeSection]) -> Vec<NodeSection> {
    let template = &sections[0];
    (0..sections.len())
        .map(|i| {
            let inext = next(sections, i);
            create_section(template, sections[i].vertex(0), sections[inext].vertex(1))
        })
        .collect()
}

fn create_section(ns: &NodeSection, v0: Option<Coord<f64>>, v1: Option<Coord<f64>>) -> NodeSection {
    NodeSection::new(
        ns.is_a(),
        Dimension::Area,
        ns.id(),
        0,
        ns.polygonal(),
        ns.is_node_at_vertex(),
        v0,
        ns.node_pt(),
        v1,
    )
}

fn extract_unique(sections: Vec<NodeSection>) -> Vec<NodeSection> {
    let mut unique: Vec<NodeSection> = Vec::with_capacity(sections.len());
    for ns in sections {
        if unique.last().map_or(true, |last| last.cmp(&ns) != std::cmp::Ordering::Equal) {
            unique.push(ns);
        }
    }
    unique
}

fn next(sections: &[NodeSection], i: usize) -> usize {
    if i + 1 >= sections.len() {
        0
    } else {
        i + 1
    }
}
