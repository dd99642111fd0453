use geo_relate_ng::noding::{
    IteratedNoder, McIndexNoder, Noder, NodingValidator, SegmentString, SimpleNoder, ValidatingNoder,
};
use geo_types::Coord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn c(x: f64, y: f64) -> Coord<f64> {
    Coord { x, y }
}

/// Grid segments with slopes 0, ±1 or vertical, so every intersection is
/// exactly representable.
fn random_grid_segments(rng: &mut StdRng, count: usize) -> Vec<SegmentString> {
    (0..count)
        .map(|i| {
            let x = rng.gen_range(0..20) as f64;
            let y = rng.gen_range(0..20) as f64;
            let len = rng.gen_range(1..10) as f64;
            let end = match rng.gen_range(0..4) {
                0 => c(x + len, y),
                1 => c(x, y + len),
                2 => c(x + len, y + len),
                _ => c(x + len, y - len),
            };
            SegmentString::new(vec![c(x, y), end], i)
        })
        .collect()
}

fn check_split_edge_coverage(input: &[SegmentString], output: &[SegmentString]) {
    for chain in input {
        let edges: Vec<_> = output.iter().filter(|e| e.context == chain.context).collect();
        assert!(!edges.is_empty(), "chain {} produced no edges", chain.context);
        assert_eq!(edges[0].coords[0], chain.coords[0]);
        assert_eq!(edges[edges.len() - 1].coords.last(), chain.coords.last());
        for pair in edges.windows(2) {
            assert_eq!(pair[0].coords.last(), pair[1].coords.first());
        }
    }
}

#[test]
fn test_crossing_segments_node_at_midpoint() {
    let chains = vec![
        SegmentString::new(vec![c(0.0, 0.0), c(10.0, 10.0)], 0),
        SegmentString::new(vec![c(0.0, 10.0), c(10.0, 0.0)], 1),
    ];
    let out = SimpleNoder::new().node(chains.clone()).unwrap();
    assert_eq!(out.len(), 4);
    assert!(out.iter().all(|e| e.coords.contains(&c(5.0, 5.0))));
    check_split_edge_coverage(&chains, &out);
}

#[test]
fn test_reversal_forces_node() {
    let chain = SegmentString::new(vec![c(0.0, 0.0), c(5.0, 5.0), c(10.0, 0.0), c(5.0, 5.0), c(0.0, 0.0)], 0);
    let out = ValidatingNoder::new(McIndexNoder::new()).node(vec![chain]).unwrap();
    let nodes: Vec<_> = out.iter().map(|e| e.coords[0]).collect();
    assert!(nodes.contains(&c(5.0, 5.0)));
}

#[test]
fn test_random_grid_noding_is_complete() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let chains = random_grid_segments(&mut rng, 40);
        let out = McIndexNoder::new().node(chains.clone()).unwrap();
        NodingValidator::new(&out).check_valid().unwrap();
        check_split_edge_coverage(&chains, &out);
    }
}

#[test]
fn test_indexed_and_simple_noders_agree() {
    let mut rng = StdRng::seed_from_u64(7);
    let chains = random_grid_segments(&mut rng, 60);
    let key = |s: &SegmentString| {
        (s.context, s.coords.iter().map(|c| (c.x.to_bits(), c.y.to_bits())).collect::<Vec<_>>())
    };
    let mut indexed = McIndexNoder::new().node(chains.clone()).unwrap();
    let mut simple = SimpleNoder::new().node(chains).unwrap();
    indexed.sort_by_key(key);
    simple.sort_by_key(key);
    assert_eq!(indexed, simple);
}

#[test]
fn test_iterated_noder_on_polyline_grid() {
    let mut rng = StdRng::seed_from_u64(1234);
    let chains: Vec<SegmentString> = (0..10)
        .map(|i| {
            let mut pts = vec![c(rng.gen_range(0..10) as f64, rng.gen_range(0..10) as f64)];
            for _ in 0..5 {
                let last = pts[pts.len() - 1];
                let step = rng.gen_range(1..4) as f64;
                let next = if rng.gen_bool(0.5) { c(last.x + step, last.y) } else { c(last.x, last.y + step) };
                pts.push(next);
            }
            SegmentString::new(pts, i)
        })
        .collect();
    let mut noder = IteratedNoder::new();
    let out = noder.node(chains.clone()).unwrap();
    assert!(noder.iterations() >= 1);
    NodingValidator::new(&out).check_valid().unwrap();
    check_split_edge_coverage(&chains, &out);
}
