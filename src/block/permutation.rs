//! Conditional component overrides.
//!
//! A permutation pairs a client-evaluated Molang condition with an
//! ordered set of component overrides. Permutations apply in insertion
//! order on the client; that order is part of the contract.

use super::component::Component;
use super::property::PropertyValue;
use crate::nbt::{Compound, Tag};

#[derive(Debug, Clone)]
pub struct Permutation {
    condition: String,
    components: Vec<Component>,
}

impl Permutation {
    pub fn new(condition: impl Into<String>) -> Permutation {
        Permutation {
            condition: condition.into(),
            components: Vec::new(),
        }
    }

    /// Condition matching one exact value of one property.
    pub fn when(property: &str, value: impl Into<PropertyValue>) -> Permutation {
        Permutation::new(state_eq(property, value))
    }

    /// Condition matching an exact assignment of several properties,
    /// joined with `&&` in the given order.
    pub fn when_all<'a, V>(assignment: impl IntoIterator<Item = (&'a str, V)>) -> Permutation
    where
        V: Into<PropertyValue>,
    {
        let parts: Vec<String> = assignment
            .into_iter()
            .map(|(name, value)| state_eq(name, value))
            .collect();
        Permutation::new(parts.join(" && "))
    }

    pub fn with(mut self, component: Component) -> Permutation {
        self.components.push(component);
        self
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn to_nbt(&self) -> Tag {
        let mut components = Compound::new();
        for component in &self.components {
            components = components.set(component.name(), component.to_nbt());
        }
        Tag::Compound(
            Compound::new()
                .set("condition", Tag::str(&self.condition))
                .set("components", components),
        )
    }
}

/// `q.block_state('<name>') == <literal>` expression fragment.
pub fn state_eq(property: &str, value: impl Into<PropertyValue>) -> String {
    format!(
        "q.block_state('{}') == {}",
        property,
        value.into().condition_literal()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::property::state_names;

    #[test]
    fn when_all_joins_in_order() {
        let p = Permutation::when_all([
            (state_names::MC_CARDINAL_DIRECTION, PropertyValue::from("north")),
            (state_names::OPEN_BIT, PropertyValue::from(true)),
        ]);
        assert_eq!(
            p.condition(),
            "q.block_state('minecraft:cardinal_direction') == 'north' && q.block_state('open_bit') == 1"
        );
    }

    #[test]
    fn override_components_keep_insertion_order() {
        let p = Permutation::when("growth", 3)
            .with(Component::custom_components())
            .with(Component::crop_tag());
        let names: Vec<&str> = p.components().iter().map(Component::name).collect();
        assert_eq!(
            names,
            vec!["minecraft:custom_components", "tag:minecraft:crop"]
        );
    }
}
