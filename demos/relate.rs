use clap::{Parser, ValueEnum};
use geo_relate_ng::relate::RelateNG;
use geo_relate_ng::{predicate, BoundaryNodeRule, TopologyPredicate};
use geojson::GeoJson;
use std::convert::TryInto;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Print the DE-9IM relationship of two GeoJSON geometries", long_about = None)]
struct Args {
    /// GeoJSON file holding geometry A
    #[arg(short, long)]
    a: PathBuf,

    /// GeoJSON file holding geometry B
    #[arg(short, long)]
    b: PathBuf,

    /// Also test a DE-9IM pattern such as T*F**FFF*
    #[arg(short, long)]
    pattern: Option<String>,

    /// Boundary node rule for linear geometries
    #[arg(long, value_enum, default_value_t = Rule::Mod2)]
    rule: Rule,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Rule {
    Mod2,
    Endpoint,
    Multivalent,
    Monovalent,
}

impl From<Rule> for BoundaryNodeRule {
    fn from(rule: Rule) -> Self {
        match rule {
            Rule::Mod2 => BoundaryNodeRule::Mod2,
            Rule::Endpoint => BoundaryNodeRule::EndPoint,
            Rule::Multivalent => BoundaryNodeRule::MultivalentEndPoint,
            Rule::Monovalent => BoundaryNodeRule::MonovalentEndPoint,
        }
    }
}

/// Reads every geometry in a GeoJSON file into one geometry, wrapping
/// several into a collection.
fn read_geometry(path: &Path) -> Result<geo_types::Geometry<f64>, Box<dyn std::error::Error>> {
    let reader = BufReader::new(File::open(path)?);
    let geojson: GeoJson = serde_json::from_reader(reader)?;

    let mut geoms: Vec<geo_types::Geometry<f64>> = Vec::new();
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in fc.features {
                if let Some(geom) = feature.geometry {
                    geoms.push(geom.try_into()?);
                }
            }
        }
        GeoJson::Feature(feature) => {
            if let Some(geom) = feature.geometry {
                geoms.push(geom.try_into()?);
            }
        }
        GeoJson::Geometry(geom) => geoms.push(geom.try_into()?),
    }

    Ok(match geoms.len() {
        1 => geoms.remove(0),
        _ => geo_types::Geometry::GeometryCollection(geo_types::GeometryCollection::new_from(geoms)),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let a = read_geometry(&args.a)?;
    let b = read_geometry(&args.b)?;
    let rel = RelateNG::new(&a).with_boundary_node_rule(args.rule.into());

    let matrix = rel.evaluate_matrix(&b);
    println!("{}", matrix);

    let mut predicates: Vec<Box<dyn TopologyPredicate>> = vec![
        Box::new(predicate::intersects()),
        Box::new(predicate::disjoint()),
        Box::new(predicate::contains()),
        Box::new(predicate::within()),
        Box::new(predicate::covers()),
        Box::new(predicate::covered_by()),
        Box::new(predicate::crosses()),
        Box::new(predicate::overlaps()),
        Box::new(predicate::touches()),
        Box::new(predicate::equals_topo()),
    ];
    for p in predicates.iter_mut() {
        let value = rel.evaluate(&b, p.as_mut());
        println!("{:<12} {}", p.name(), value);
    }

    if let Some(pattern) = &args.pattern {
        println!("{:<12} {}", pattern, rel.evaluate_pattern(&b, pattern)?);
    }

    Ok(())
}
