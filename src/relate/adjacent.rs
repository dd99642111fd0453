use geo::Intersects;
use geo_types::{Coord, Line, Polygon};

use crate::relate::geometry::orient_ring;
use crate::relate::matrix::{Dimension, Location};
use crate::relate::node_section::{NodeSection, NodeSections};

/// Locates points lying on the boundaries of two or more polygons of a
/// collection.
///
/// A point on an edge shared by adjacent polygons is interior to their
/// union, so it is only reported as boundary if some edge at the point
/// has the exterior on one side.
#[derive(Clone, Debug, Default)]
pub struct AdjacentEdgeLocator {
    rings: Vec<Vec<Coord<f64>>>,
}

impl AdjacentEdgeLocator {
    pub fn new<'a>(polygons: impl IntoIterator<Item = &'a Polygon<f64>>) -> Self {
        let mut rings = Vec::new();
        for poly in polygons {
            if poly.exterior().0.is_empty() {
                continue;
            }
            rings.push(orient_ring(&poly.exterior().0, true));
            for hole in poly.interiors() {
                rings.push(orient_ring(&hole.0, false));
            }
        }
        Self { rings }
    }

    pub fn locate(&self, p: Coord<f64>) -> Location {
        let mut sections = NodeSections::new(p);
        for ring in &self.rings {
            add_sections(p, ring, &mut sections);
        }
        let node = sections.create_node();
        if node.has_exterior_edge(true) {
            Location::Boundary
        } else {
            Location::Interior
        }
    }
}

fn add_sections(p: Coord<f64>, ring: &[Coord<f64>], sections: &mut NodeSections) {
    for i in 0..ring.len().saturating_sub(1) {
        let p0 = ring[i];
        let pnext = ring[i + 1];
        if p == pnext {
            // handled as the start of the next segment
            continue;
        }
        if p == p0 {
            let iprev = if i > 0 { i - 1 } else { ring.len() - 2 };
            sections.add(create_section(p, ring[iprev], pnext));
        } else if Line::new(p0, pnext).intersects(&p) {
            sections.add(create_section(p, p0, pnext));
        }
    }
}

fn create_section(p: Coord<f64>, prev: Coord<f64>, next: Coord<f64>) -> NodeSection {
    NodeSection::new(true, Dimension::Area, 1, 0, None, false, Some(prev), p, Some(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::polygon;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    fn adjacent_squares() -> Vec<Polygon<f64>> {
        vec![
            polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0), (x: 0.0, y: 0.0)],
            polygon![(x: 1.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 1.0), (x: 1.0, y: 1.0), (x: 1.0, y: 0.0)],
        ]
    }

    #[test]
    fn test_shared_edge_is_interior() {
        let polys = adjacent_squares();
        let locator = AdjacentEdgeLocator::new(&polys);
        assert_eq!(locator.locate(c(1.0, 0.5)), Location::Interior);
    }

    #[test]
    fn test_shared_vertex_on_outer_boundary() {
        let polys = adjacent_squares();
        let locator = AdjacentEdgeLocator::new(&polys);
        assert_eq!(locator.locate(c(1.0, 0.0)), Location::Boundary);
        assert_eq!(locator.locate(c(1.0, 1.0)), Location::Boundary);
    }

    #[test]
    fn test_touching_corners_are_boundary() {
        let polys = vec![
            polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0), (x: 0.0, y: 0.0)],
            polygon![(x: 1.0, y: 1.0), (x: 2.0, y: 1.0), (x: 2.0, y: 2.0), (x: 1.0, y: 2.0), (x: 1.0, y: 1.0)],
        ];
        let locator = AdjacentEdgeLocator::new(&polys);
        assert_eq!(locator.locate(c(1.0, 1.0)), Location::Boundary);
    }
}
