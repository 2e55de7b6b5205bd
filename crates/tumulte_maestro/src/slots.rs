//! `<slot>` extraction.

use serde::Serialize;
use tumulte_relief::{ComponentTree, TextRange};

pub const DEFAULT_SLOT: &str = "default";

/// A `<slot>` of a component template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotInfo {
    /// Value of the `name` attribute, `"default"` when absent.
    pub name: String,
    /// Names of the other attributes: the props passed to slotted content.
    pub props: Vec<String>,
    pub range: TextRange,
}

/// Every `<slot>` in the template, in document order.
pub fn extract_slots(tree: &ComponentTree) -> Vec<SlotInfo> {
    tree.root
        .descendants()
        .into_iter()
        .filter(|el| el.tag.eq_ignore_ascii_case("slot"))
        .map(|el| {
            let mut name = DEFAULT_SLOT.to_string();
            let mut props = Vec::new();
            for attr in el.attributes.iter().filter(|attr| !attr.is_spread()) {
                if attr.name == "name" {
                    name = attr.value.clone().unwrap_or_default();
                } else {
                    props.push(attr.name.to_string());
                }
            }
            SlotInfo {
                name,
                props,
                range: el.range,
            }
        })
        .collect()
}

/// Props of the first default slot.
pub fn default_slot_props(tree: &ComponentTree) -> Vec<String> {
    extract_slots(tree)
        .into_iter()
        .find(|slot| slot.name == DEFAULT_SLOT)
        .map(|slot| slot.props)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"<todo-list>
  <ul>
    <li each={ item in items }>
      <slot item={ item } index={ index } />
    </li>
  </ul>
  <slot name="footer" total={ items.length }></slot>
</todo-list>"#;

    #[test]
    fn test_extract_slots() {
        let tree = tumulte_armature::parse(SOURCE).unwrap();
        let slots = extract_slots(&tree);

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].name, "default");
        assert_eq!(slots[0].props, vec!["item", "index"]);
        assert_eq!(slots[1].name, "footer");
        assert_eq!(slots[1].props, vec!["total"]);
    }

    #[test]
    fn test_default_slot_props() {
        let tree = tumulte_armature::parse(SOURCE).unwrap();
        assert_eq!(default_slot_props(&tree), vec!["item", "index"]);

        let tree = tumulte_armature::parse("<app><slot name=\"x\" a={ 1 }/></app>").unwrap();
        assert!(default_slot_props(&tree).is_empty());
    }
}
