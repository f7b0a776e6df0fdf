//! Turns replayed semantic actions into [`Section`]s.

use gitconf_syntax::Actions;

use crate::section::Section;

/// Collects sections in the order their headers appear.
///
/// A key repeated inside one section keeps its last value.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    sections: Vec<Section>,
    key: Option<String>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn finish(self) -> Vec<Section> {
        self.sections
    }
}

impl Actions for ConfigBuilder {
    fn begin_section(&mut self, name: &str) {
        self.sections.push(Section::new(name));
        self.key = None;
    }

    fn set_section_id(&mut self, id: &str) {
        match self.sections.last_mut() {
            Some(section) => section.id = Some(id.to_string()),
            None => log::warn!("subsection id {id:?} outside of any section"),
        }
    }

    fn set_key(&mut self, key: &str) {
        self.key = Some(key.to_string());
    }

    fn add_value(&mut self, value: &str) {
        match (self.sections.last_mut(), &self.key) {
            (Some(section), Some(key)) => {
                section.values.insert(key.clone(), value.to_string());
            }
            (None, _) => log::warn!("value {value:?} outside of any section"),
            (Some(section), None) => log::warn!("value {value:?} without a key in [{section}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn last_write_wins() {
        let mut builder = ConfigBuilder::new();
        builder.begin_section("core");
        builder.set_key("editor");
        builder.add_value("vi");
        builder.set_key("editor");
        builder.add_value("vim");

        assert_eq!(
            builder.finish(),
            vec![Section::new("core").with_value("editor", "vim")]
        );
    }

    #[test]
    fn keys_do_not_leak_across_sections() {
        let mut builder = ConfigBuilder::new();
        builder.begin_section("a");
        builder.set_key("k");
        builder.begin_section("b");
        builder.add_value("v");

        assert!(builder.sections().iter().all(|s| s.values.is_empty()));
    }

    #[test]
    fn orphaned_actions_are_ignored() {
        let mut builder = ConfigBuilder::new();
        builder.set_section_id("x");
        builder.set_key("k");
        builder.add_value("v");
        assert!(builder.finish().is_empty());
    }
}
