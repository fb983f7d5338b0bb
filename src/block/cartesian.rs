//! Cartesian enumeration of property domains.
//!
//! Standard odometer counting: the last property varies fastest, the
//! first slowest. The order is deterministic and must match the order
//! in which state ordinals are handed out, because network and storage
//! consumers index states by ordinal alone.

use super::property::{BlockProperty, PropertyValue};

/// Lazy iterator over every combination of the given domains, each
/// visited exactly once. Zero domains yield exactly one empty
/// combination.
pub struct CartesianProduct<'a> {
    domains: Vec<&'a [PropertyValue]>,
    odometer: Vec<usize>,
    exhausted: bool,
}

impl<'a> CartesianProduct<'a> {
    pub fn new(properties: &'a [BlockProperty]) -> CartesianProduct<'a> {
        let domains: Vec<&[PropertyValue]> =
            properties.iter().map(BlockProperty::values).collect();
        // BlockProperty construction guarantees non-empty domains, so
        // only an explicitly empty slice can make the product empty.
        let exhausted = domains.iter().any(|d| d.is_empty());
        CartesianProduct {
            odometer: vec![0; domains.len()],
            domains,
            exhausted,
        }
    }

    /// Total number of combinations this iterator will yield.
    pub fn count_total(&self) -> usize {
        self.domains.iter().map(|d| d.len()).product()
    }
}

impl<'a> Iterator for CartesianProduct<'a> {
    type Item = Vec<PropertyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let combination: Vec<PropertyValue> = self
            .domains
            .iter()
            .zip(&self.odometer)
            .map(|(domain, &i)| domain[i].clone())
            .collect();

        // Advance, last digit fastest.
        self.exhausted = true;
        for i in (0..self.odometer.len()).rev() {
            self.odometer[i] += 1;
            if self.odometer[i] < self.domains[i].len() {
                self.exhausted = false;
                break;
            }
            self.odometer[i] = 0;
        }

        Some(combination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(specs: &[(&str, &[&str])]) -> Vec<BlockProperty> {
        specs
            .iter()
            .map(|(name, values)| BlockProperty::strings(*name, values).unwrap())
            .collect()
    }

    #[test]
    fn zero_properties_yield_one_empty_combination() {
        let properties = vec![];
        let combos: Vec<_> = CartesianProduct::new(&properties).collect();
        assert_eq!(combos, vec![Vec::new()]);
    }

    #[test]
    fn last_property_varies_fastest() {
        let properties = props(&[("a", &["0", "1"]), ("b", &["x", "y", "z"])]);
        let combos: Vec<Vec<String>> = CartesianProduct::new(&properties)
            .map(|c| {
                c.into_iter()
                    .map(|v| match v {
                        PropertyValue::Str(s) => s,
                        other => panic!("unexpected value {other:?}"),
                    })
                    .collect()
            })
            .collect();
        assert_eq!(
            combos,
            vec![
                vec!["0", "x"],
                vec!["0", "y"],
                vec!["0", "z"],
                vec!["1", "x"],
                vec!["1", "y"],
                vec!["1", "z"],
            ]
        );
    }

    #[test]
    fn count_matches_product_of_domain_sizes() {
        let properties = vec![
            BlockProperty::strings("dir", &["n", "s", "w", "e"]).unwrap(),
            BlockProperty::bit("upper"),
            BlockProperty::bit("open"),
        ];
        let product = CartesianProduct::new(&properties);
        assert_eq!(product.count_total(), 16);
        assert_eq!(product.count(), 16);
    }

    #[test]
    fn combinations_are_distinct() {
        let properties = props(&[("a", &["0", "1", "2"]), ("b", &["x", "y"])]);
        let combos: Vec<_> = CartesianProduct::new(&properties).collect();
        for (i, a) in combos.iter().enumerate() {
            for b in &combos[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn two_runs_are_identical() {
        let properties = props(&[("a", &["0", "1"]), ("b", &["x", "y"])]);
        let first: Vec<_> = CartesianProduct::new(&properties).collect();
        let second: Vec<_> = CartesianProduct::new(&properties).collect();
        assert_eq!(first, second);
    }
}
